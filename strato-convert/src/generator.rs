//! The uniform generator contract.

use std::path::Path;

use eyre::Result;
use strato_manifest::Project;

/// A project generator for one target language.
///
/// Implementations consume an output directory, the project manifest, and
/// the IR document, and materialize a complete project tree on disk. The
/// registry provides statically linked implementations; every other
/// language identifier is served by [`crate::PluginGenerator`].
pub trait ProjectGenerator {
    /// The canonical identifier this generator serves.
    fn language(&self) -> &str;

    /// Generate a project at `out_dir`. The IR document is never mutated;
    /// partially written output is left in place on failure.
    fn generate(&self, out_dir: &Path, project: &Project, program: &str) -> Result<()>;
}

/// Signature of a statically linked generator function.
pub type GeneratorFn = fn(&Path, &Project, &str) -> Result<()>;

/// Adapts a [`GeneratorFn`] from the registry to the generator contract.
pub(crate) struct RegistryGenerator {
    pub(crate) language: &'static str,
    pub(crate) generate: GeneratorFn,
}

impl ProjectGenerator for RegistryGenerator {
    fn language(&self) -> &str {
        self.language
    }

    fn generate(&self, out_dir: &Path, project: &Project, program: &str) -> Result<()> {
        (self.generate)(out_dir, project, program)
    }
}
