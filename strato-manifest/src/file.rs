use std::path::{Path, PathBuf};

use crate::{Error, Project, Result};

/// Name of the manifest file inside a project directory.
pub const MANIFEST_FILE: &str = "Strato.toml";

/// Represents a Strato.toml file with both raw content and parsed project.
#[derive(Debug)]
pub struct StratoToml {
    path: PathBuf,
    content: String,
    project: Project,
}

impl StratoToml {
    /// Open and parse a manifest file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content =
            std::fs::read_to_string(&path).map_err(|e| Error::io(path.clone(), e))?;
        let filename = path.display().to_string();
        let project = Project::from_document_str(&content, &filename)?;

        Ok(Self {
            path,
            content,
            project,
        })
    }

    /// Open the manifest inside a project directory.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(dir.as_ref().join(MANIFEST_FILE))
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed project.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Consume the wrapper, keeping the parsed project.
    pub fn into_project(self) -> Project {
        self.project
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "[project]\nname = \"demo\"\nruntime = \"python\"\n",
        )
        .unwrap();

        let manifest = StratoToml::open_dir(dir.path()).unwrap();
        assert_eq!(manifest.project().name, "demo");
        assert_eq!(manifest.project().runtime.name, "python");
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = StratoToml::open_dir(dir.path()).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
