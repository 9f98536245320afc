//! Project manifest types and parsing for `Strato.toml` files.
//!
//! A manifest describes project-level metadata independent of any source or
//! target language: the project name, the runtime the program executes
//! under, and runtime-specific options. Source projects carry one, and every
//! generated project is written with one naming its target runtime.

mod error;
mod file;
mod project;

pub use error::{Error, Result};
pub use file::{MANIFEST_FILE, StratoToml};
pub use project::{Project, RuntimeDescriptor};
