//! Prelude module for convenient imports
//!
//! Re-exports the types needed to load, convert and store documents.
//!
//! # Example
//!
//! ```rust,no_run
//! use osrc_netconv::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let input = load_document("path/to/node_network.json")?;
//! let output = Converter::builder().build().convert(&input)?;
//! store_document("path/to/node_config.json", &output, 4)?;
//! # Ok(())
//! # }
//! ```

// Conversion entry points
pub use crate::assembler::NetworkAssembler;
pub use crate::converter::{ConvertOptions, Converter, ConverterBuilder, convert_file};
pub use crate::translator::{NodeTag, PinTable, TagRegistry, Translation, translate};

// Document models and I/O
pub use crate::document::{
    Connection, InputDocument, NetworkDocument, OutputDocument, OutputNetwork, OutputNode,
    RawNode, Wire, load_document, parse_document, store_document, to_pretty_json,
};

// Error types
pub use crate::error::{ConvertError, DocumentError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
