//! Scaffold files for generated TypeScript projects.

use eyre::Result;
use strato_manifest::Project;

const DEFAULT_DESCRIPTION: &str = "A Strato program";

/// The package.json configuration file.
pub struct PackageJson {
    name: String,
    description: String,
}

impl PackageJson {
    pub fn new(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        }
    }

    pub fn render(&self) -> String {
        format!(
            r#"{{
  "name": "{}",
  "description": "{}",
  "main": "index.ts",
  "devDependencies": {{
    "@types/node": "^20",
    "typescript": "^5.0.0"
  }},
  "dependencies": {{
    "@strato/sdk": "^1.0.0"
  }}
}}
"#,
            self.name, self.description
        )
    }
}

/// The tsconfig.json file.
pub struct TsConfig;

impl TsConfig {
    pub fn render(&self) -> String {
        r#"{
  "compilerOptions": {
    "strict": true,
    "target": "es2020",
    "module": "commonjs",
    "moduleResolution": "node",
    "outDir": "bin",
    "sourceMap": true
  },
  "files": ["index.ts"]
}
"#
        .to_string()
    }
}

/// The .gitignore file for Node.js projects.
pub struct GitIgnore;

impl GitIgnore {
    pub fn render(&self) -> String {
        r#"# Dependencies
node_modules/

# Build output
bin/

# Environment
.env
.env.local

# Debug
*.log
"#
        .to_string()
    }
}

/// The generated project manifest, declaring the nodejs runtime.
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
    fn test_package_json_carries_project_metadata() {
        let mut project = Project::new("web-app", "strato");
        project.description = Some("my stack".into());
        let rendered = PackageJson::new(&project).render();
        assert!(rendered.contains("\"name\": \"web-app\""));
        assert!(rendered.contains("\"description\": \"my stack\""));
    }

    #[test]
    fn test_manifest_rewrites_runtime() {
        let project = Project::new("web-app", "strato");
        let rendered = StratoToml::new(&project).render().unwrap();
        assert!(rendered.contains("runtime = \"nodejs\""));
        assert!(rendered.contains("name = \"web-app\""));
    }
}
