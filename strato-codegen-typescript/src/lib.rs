//! TypeScript project generator.
//!
//! Produces a Node.js project from an IR document: the translated program
//! in `index.ts`, a `package.json`/`tsconfig.json` scaffold, and a
//! `Strato.toml` manifest declaring the `nodejs` runtime.

mod emit;
mod files;

use std::path::Path;

use eyre::{Result, WrapErr};
use strato_manifest::Project;

use crate::files::{GitIgnore, PackageJson, StratoToml, TsConfig};

/// The runtime identifier written into generated manifests.
pub const RUNTIME: &str = "nodejs";

/// Generate a TypeScript project at `out_dir`.
pub fn generate_project(out_dir: &Path, project: &Project, program: &str) -> Result<()> {
    let program = strato_ir::parse(program).wrap_err("malformed IR document")?;
    let index = emit::emit_index(&program)?;

    std::fs::create_dir_all(out_dir)
        .wrap_err_with(|| format!("could not create '{}'", out_dir.display()))?;
    write(out_dir, "index.ts", &index)?;
    write(out_dir, "package.json", &PackageJson::new(project).render())?;
    write(out_dir, "tsconfig.json", &TsConfig.render())?;
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
