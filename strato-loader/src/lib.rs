//! Source program loading for the Strato converter.
//!
//! A source project is a directory holding a `Strato.toml` that combines the
//! project manifest with templated variable, resource, output, and config
//! tables. This crate parses that document, validates it, and lowers it to
//! the intermediate representation.
//!
//! # Architecture
//!
//! ```text
//! Strato.toml → SourceDoc (parsing) → validation diagnostics → ir::Program
//! ```
//!
//! Any error-level diagnostic aborts the load; callers never receive a
//! partially lowered program.

mod error;
mod lower;
mod schema;

use std::path::Path;

use strato_ir::Program;
use strato_manifest::{MANIFEST_FILE, Project};

pub use error::{Error, Result};
pub use lower::BUILTIN_FUNCTIONS;
pub use schema::{ConfigDecl, ResourceDecl, ResourceOptions, SourceDoc};

/// Load a source project and lower it to the intermediate representation.
///
/// Returns the project manifest and the lowered program. The IR document
/// handed to generators is `program.to_text()`.
pub fn eject(source_dir: impl AsRef<Path>) -> Result<(Project, Program)> {
    let path = source_dir.as_ref().join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| Error::io(path.clone(), e))?;
    let filename = path.display().to_string();

    let doc: SourceDoc =
        toml::from_str(&content).map_err(|e| Error::parse(e, &content, &filename))?;
    let program = lower::lower(&doc, &content, &filename)?;

    Ok((doc.project, program))
}
