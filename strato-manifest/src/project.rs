//! Project metadata types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Project-level metadata, independent of source or target language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project name.
    pub name: String,

    /// Description for tooling output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Entry point override, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// The runtime the program executes under. Serialized last so a
    /// runtime options table does not swallow the scalar fields.
    pub runtime: RuntimeDescriptor,
}

impl Project {
    /// Create a project with the given name and runtime, no extras.
    pub fn new(name: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            main: None,
            runtime: RuntimeDescriptor::new(runtime),
        }
    }

    /// Parse a project from the `[project]` table of a manifest document.
    ///
    /// Unknown top-level sections are ignored so the same file can carry a
    /// full source program alongside the project table.
    pub fn from_document_str(content: &str, filename: &str) -> Result<Self> {
        let document: Document =
            toml::from_str(content).map_err(|e| Error::parse(e, content, filename))?;
        document.project.validate(content, filename)?;
        Ok(document.project)
    }

    /// Render this project as a complete manifest document.
    pub fn to_document_string(&self) -> Result<String> {
        toml::to_string(&DocumentRef { project: self })
            .map_err(|source| Box::new(Error::Serialize { source }))
    }

    fn validate(&self, src: &str, filename: &str) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::validation("project name must not be empty", src, filename));
        }
        if self.runtime.name.is_empty() {
            return Err(Error::validation(
                "project runtime must not be empty",
                src,
                filename,
            ));
        }
        Ok(())
    }
}

/// A runtime name plus runtime-specific options.
///
/// In manifest documents this is either a bare string (`runtime = "nodejs"`)
/// or a table with `name` and `options`. Options cross the plugin process
/// boundary as JSON and are otherwise opaque to the converter.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeDescriptor {
    pub name: String,
    pub options: BTreeMap<String, serde_json::Value>,
}

impl RuntimeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BTreeMap::new(),
        }
    }
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    project: &'a Project,
}

#[derive(Deserialize)]
struct Document {
    project: Project,
}

#[derive(Serialize, Deserialize)]
struct RuntimeTable {
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    options: BTreeMap<String, serde_json::Value>,
}

impl Serialize for RuntimeDescriptor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if self.options.is_empty() {
            serializer.serialize_str(&self.name)
        } else {
            RuntimeTable {
                name: self.name.clone(),
                options: self.options.clone(),
            }
            .serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for RuntimeDescriptor {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Name(String),
            Table(RuntimeTable),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Name(name) => RuntimeDescriptor::new(name),
            Repr::Table(table) => RuntimeDescriptor {
                name: table.name,
                options: table.options,
            },
        })
    }
}
