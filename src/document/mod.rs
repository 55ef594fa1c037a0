//! Editor (input) and runtime (output) document models, plus JSON load/store.

pub mod input;
pub mod io;
pub mod output;

pub use input::*;
pub use io::*;
pub use output::*;
