//! Python project generator.
//!
//! Produces a Python project from an IR document: the translated program in
//! `__main__.py`, a `requirements.txt`, and a `Strato.toml` manifest
//! declaring the `python` runtime.

mod emit;
mod files;

use std::path::Path;

use eyre::{Result, WrapErr};
use strato_manifest::Project;

use crate::files::{GitIgnore, Requirements, StratoToml};

/// The runtime identifier written into generated manifests.
pub const RUNTIME: &str = "python";

/// Generate a Python project at `out_dir`.
pub fn generate_project(out_dir: &Path, project: &Project, program: &str) -> Result<()> {
    let program = strato_ir::parse(program).wrap_err("malformed IR document")?;
    let main = emit::emit_main(&program)?;

    std::fs::create_dir_all(out_dir)
        .wrap_err_with(|| format!("could not create '{}'", out_dir.display()))?;
    write(out_dir, "__main__.py", &main)?;
    write(out_dir, "requirements.txt", &Requirements.render())?;
    write(out_dir, ".gitignore", &GitIgnore.render())?;
    write(
        out_dir,
        strato_manifest::MANIFEST_FILE,
        &StratoToml::new(project).render()?,
    )?;
    Ok(())
}

fn write(out_dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = out_dir.join(name);
    std::fs::write(&path, content).wrap_err_with(|| format!("could not write '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generates_full_tree() {
        let dir = tempfile::TempDir::new().unwrap();
        let project = Project::new("simple", "strato");
        let program = concat!(
            "key = readFile(\"key.pub\")\n",
            "\n",
            "output result {\n",
            "    __logicalName = \"result\"\n",
            "    value = key\n",
            "}",
        );

        generate_project(dir.path(), &project, program).unwrap();

        for name in ["__main__.py", "requirements.txt", ".gitignore", "Strato.toml"] {
            assert!(dir.path().join(name).is_file(), "{} missing", name);
        }

        let main = std::fs::read_to_string(dir.path().join("__main__.py")).unwrap();
        assert!(main.contains("key = Path(\"key.pub\").read_text()"));
        assert!(main.contains("strato.export(\"result\", key)"));

        let manifest = std::fs::read_to_string(dir.path().join("Strato.toml")).unwrap();
        assert!(manifest.contains("runtime = \"python\""));
    }

    #[test]
    fn test_rejects_malformed_ir() {
        let dir = tempfile::TempDir::new().unwrap();
        let project = Project::new("simple", "strato");
        assert!(generate_project(dir.path(), &project, "output {").is_err());
    }
}
