//! The conversion orchestrator.

use std::path::PathBuf;

use eyre::{Result, WrapErr};
use tracing::debug;

use crate::{
    error::ConvertError,
    generator::ProjectGenerator,
    install,
    install::{CommandInstaller, DependencyInstaller},
    plugin,
    plugin::PluginGenerator,
    registry,
};

/// The IR pseudo-target: emits the IR document instead of a project.
pub const IR_LANGUAGE: &str = "ir";

/// File written into the output directory by the IR fast path.
pub const IR_FILE: &str = "main.ir";

/// Inputs for one conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory holding the source project.
    pub source_dir: PathBuf,
    /// Requested target language, normalized before dispatch.
    pub language: String,
    /// Output directory, created on demand.
    pub out_dir: PathBuf,
    /// Skip the dependency-installation step.
    pub generate_only: bool,
    /// Enables the IR pseudo-target.
    pub dev_mode: bool,
}

/// Rewrite well-known aliases to their canonical runtime name.
///
/// Applied exactly once, before the dispatch decision, so the fast-path
/// check, the registry lookup, and the plugin lookup all see the same
/// identifier.
pub fn canonical_language(language: &str) -> &str {
    match language {
        "csharp" | "c#" => "dotnet",
        other => other,
    }
}

/// The conversion pipeline.
///
/// Owns the collaborator seams: extra plugin search directories and the
/// dependency installer, both replaceable for tests.
pub struct Converter {
    plugin_dirs: Vec<PathBuf>,
    installer: Box<dyn DependencyInstaller>,
}

impl Converter {
    /// Create a converter with the default installer and plugin search
    /// directories from the environment.
    pub fn new() -> Self {
        Self {
            plugin_dirs: plugin::search_dirs_from_env(),
            installer: Box::new(CommandInstaller),
        }
    }

    /// Replace the dependency installer.
    pub fn with_installer(mut self, installer: impl DependencyInstaller + 'static) -> Self {
        self.installer = Box::new(installer);
        self
    }

    /// Replace the plugin search directories.
    pub fn with_plugin_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.plugin_dirs = dirs;
        self
    }

    /// Convert the source project to the requested target.
    ///
    /// On failure, partially written output is left on disk; nothing is
    /// rolled back.
    pub fn convert(&self, opts: &ConvertOptions) -> Result<()> {
        let language = canonical_language(&opts.language);

        if language == IR_LANGUAGE {
            if !opts.dev_mode {
                return Err(ConvertError::UnsupportedTarget {
                    language: language.to_string(),
                }
                .into());
            }
            return self.convert_to_ir(opts);
        }

        let generator: Box<dyn ProjectGenerator> = match registry::lookup(language) {
            Some(generator) => {
                debug!(%language, "dispatching to built-in generator");
                generator
            }
            None => {
                debug!(%language, "no built-in generator, dispatching to language runtime plugin");
                Box::new(PluginGenerator::new(language, &self.plugin_dirs))
            }
        };

        std::fs::create_dir_all(&opts.out_dir).wrap_err("could not create output directory")?;

        let (project, program) =
            strato_loader::eject(&opts.source_dir).wrap_err("could not load source program")?;
        let ir_text = program.to_text();

        generator
            .generate(&opts.out_dir, &project, &ir_text)
            .wrap_err("could not generate output program")?;

        if !opts.generate_only {
            install::install_dependencies(self.installer.as_ref(), &opts.out_dir)?;
        }
        Ok(())
    }

    /// Fast path: write the IR document itself, skipping generator dispatch
    /// and dependency installation.
    fn convert_to_ir(&self, opts: &ConvertOptions) -> Result<()> {
        let (_, program) =
            strato_loader::eject(&opts.source_dir).wrap_err("could not load source program")?;

        std::fs::create_dir_all(&opts.out_dir).wrap_err("could not create output directory")?;
        let out_file = opts.out_dir.join(IR_FILE);
        std::fs::write(&out_file, program.to_text()).wrap_err("could not write output program")?;
        debug!(path = %out_file.display(), "wrote IR document");
        Ok(())
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}
