//! # osrc-netconv - Node Network Converter
//!
//! **osrc-netconv** turns the node networks drawn in the robot controller's
//! graphical editor into the static node configuration loaded by the
//! real-time control runtime.
//!
//! ## Core Workflow
//!
//! 1.  **Load**: Parse the editor's JSON document into an [`InputDocument`](document::InputDocument).
//! 2.  **Translate**: Every editor node is translated on its own into a runtime node
//!     record and a pin table (see [`translator`]). Virtual serial register nodes
//!     become register fragments instead.
//! 3.  **Assemble**: Per network, serial register fragments are folded into the
//!     serial device they are wired to, then every remaining wire is resolved from
//!     `(node id, pin index)` pairs into named `(node, port)` connections
//!     (see [`assembler`]).
//! 4.  **Store**: The runtime document is pretty-printed and written atomically.
//!
//! Conversion is all-or-nothing: any unknown node type, malformed payload,
//! duplicate key or unresolvable wire aborts the run before anything is written.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use osrc_netconv::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let converter = Converter::builder().with_indent(4).build();
//!     let converted = converter.convert_file("node_network.json", "node_config.json")?;
//!
//!     for (name, network) in &converted.networks {
//!         println!(
//!             "{}: {} nodes, {} connections",
//!             name,
//!             network.nodes.len(),
//!             network.connections.len()
//!         );
//!     }
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod converter;
pub mod document;
pub mod error;
pub mod expression;
pub mod naming;
pub mod prelude;
pub mod translator;

pub use converter::{ConvertOptions, Converter, ConverterBuilder, convert_file};
