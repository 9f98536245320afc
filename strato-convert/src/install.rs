//! Post-generation dependency installation.
//!
//! After a generator succeeds, the generated project's own manifest is
//! re-read from disk (the generator may have rewritten project metadata)
//! and the dependency installer for its declared runtime runs against the
//! project root. The project root is passed explicitly; the host process
//! working directory is never changed.

use std::path::{Path, PathBuf};
use std::process::Command;

use strato_manifest::{Project, RuntimeDescriptor, StratoToml};
use tracing::info;

use crate::error::InstallError;

/// Execution context scoped to one generated project.
///
/// Holds the re-read manifest and the project root for the duration of the
/// install step; dropped when the step completes on any path.
#[derive(Debug)]
pub struct ExecutionContext {
    project: Project,
    root: PathBuf,
}

impl ExecutionContext {
    /// Build a context by re-reading the manifest inside `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, InstallError> {
        let root = root.into();
        let project = StratoToml::open_dir(&root)
            .map_err(|source| InstallError::Manifest { source })?
            .into_project();
        Ok(Self { project, root })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Installs the dependencies of a generated project.
pub trait DependencyInstaller {
    /// Install dependencies for `runtime` against the project at `root`.
    fn install(
        &self,
        ctx: &ExecutionContext,
        runtime: &RuntimeDescriptor,
        root: &Path,
    ) -> Result<(), InstallError>;
}

/// Default installer: shells out to the runtime's package manager with the
/// project root as the child working directory.
pub struct CommandInstaller;

impl CommandInstaller {
    fn command_for_runtime(runtime: &str) -> Option<(&'static str, &'static [&'static str])> {
        match runtime {
            "nodejs" => Some(("npm", &["install"])),
            "python" => Some(("python", &["-m", "pip", "install", "-r", "requirements.txt"])),
            "dotnet" => Some(("dotnet", &["restore"])),
            "go" => Some(("go", &["mod", "tidy"])),
            _ => None,
        }
    }
}

impl DependencyInstaller for CommandInstaller {
    fn install(
        &self,
        _ctx: &ExecutionContext,
        runtime: &RuntimeDescriptor,
        root: &Path,
    ) -> Result<(), InstallError> {
        let (program, args) =
            Self::command_for_runtime(&runtime.name).ok_or_else(|| {
                InstallError::UnsupportedRuntime {
                    runtime: runtime.name.clone(),
                }
            })?;
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        info!(runtime = %runtime.name, %command, root = %root.display(), "installing dependencies");

        let status = Command::new(program)
            .args(args)
            .current_dir(root)
            .status()
            .map_err(|source| InstallError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !status.success() {
            return Err(InstallError::Failed { command, status });
        }
        Ok(())
    }
}

/// Run the post-generation step against a freshly generated project.
pub(crate) fn install_dependencies(
    installer: &dyn DependencyInstaller,
    out_dir: &Path,
) -> Result<(), InstallError> {
    let ctx = ExecutionContext::new(out_dir)?;
    let runtime = ctx.project().runtime.clone();
    installer.install(&ctx, &runtime, ctx.root())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_mapping() {
        assert_eq!(
            CommandInstaller::command_for_runtime("nodejs"),
            Some(("npm", &["install"][..]))
        );
        assert_eq!(
            CommandInstaller::command_for_runtime("go"),
            Some(("go", &["mod", "tidy"][..]))
        );
        assert_eq!(CommandInstaller::command_for_runtime("cobol"), None);
    }

    #[test]
    fn test_context_requires_manifest() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ExecutionContext::new(dir.path()).unwrap_err();
        assert!(matches!(err, InstallError::Manifest { .. }));
    }

    #[test]
    fn test_context_reads_generated_manifest() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Strato.toml"),
            "[project]\nname = \"demo\"\nruntime = \"nodejs\"\n",
        )
        .unwrap();

        let ctx = ExecutionContext::new(dir.path()).unwrap();
        assert_eq!(ctx.project().runtime.name, "nodejs");
        assert_eq!(ctx.root(), dir.path());
    }

    #[test]
    fn test_unsupported_runtime_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Strato.toml"),
            "[project]\nname = \"demo\"\nruntime = \"cobol\"\n",
        )
        .unwrap();

        let err = install_dependencies(&CommandInstaller, dir.path()).unwrap_err();
        assert!(matches!(err, InstallError::UnsupportedRuntime { runtime } if runtime == "cobol"));
    }
}
