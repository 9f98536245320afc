//! Scaffold files for generated Python projects.

use eyre::Result;
use strato_manifest::Project;

/// The requirements.txt file.
pub struct Requirements;

impl Requirements {
    pub fn render(&self) -> String {
        "strato>=1.0.0,<2.0.0\n".to_string()
    }
}

/// The .gitignore file for Python projects.
pub struct GitIgnore;

impl GitIgnore {
    pub fn render(&self) -> String {
        r#"# Virtual environments
venv/
.venv/

# Bytecode
__pycache__/
*.pyc

# Environment
.env

# Debug
*.log
"#
        .to_string()
    }
}

/// The generated project manifest, declaring the python runtime.
pub struct StratoToml {
    project: Project,
}

impl StratoToml {
    pub fn new(source: &Project) -> Self {
        let mut project = Project::new(&source.name, crate::RUNTIME);
        project.description = source.description.clone();
        Self { project }
    }

    pub fn render(&self) -> Result<String> {
        Ok(self.project.to_document_string()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_rewrites_runtime() {
        let project = Project::new("data-stack", "strato");
        let rendered = StratoToml::new(&project).render().unwrap();
        assert!(rendered.contains("runtime = \"python\""));
        assert!(rendered.contains("name = \"data-stack\""));
    }
}
