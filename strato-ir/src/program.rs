//! Program model.
//!
//! A [`Program`] is the unit of conversion: every variable, configuration
//! entry, resource, and output declared by a source document, in a form
//! independent of both the source format and any target language.

use serde::Serialize;

use crate::Expr;

/// A complete converted program.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    /// Plain and computed variables.
    pub variables: Vec<Variable>,
    /// Stack configuration entries.
    pub config: Vec<ConfigEntry>,
    /// Declared resources.
    pub resources: Vec<Resource>,
    /// Declared stack outputs.
    pub outputs: Vec<Output>,
}

impl Program {
    /// Render the program to its textual form.
    pub fn to_text(&self) -> String {
        crate::render::render(self)
    }

    /// Returns true if the program declares nothing at all.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
            && self.config.is_empty()
            && self.resources.is_empty()
            && self.outputs.is_empty()
    }
}

/// A named variable bound to an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub value: Expr,
}

/// A stack configuration entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigEntry {
    pub name: String,
    pub ty: ConfigType,
    /// Default value used when the stack provides none.
    pub default: Option<Expr>,
}

/// The type of a configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    String,
    Int,
    Bool,
    List,
}

impl ConfigType {
    /// Returns the type name as it appears in IR text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigType::String => "string",
            ConfigType::Int => "int",
            ConfigType::Bool => "bool",
            ConfigType::List => "list",
        }
    }

    /// Parse an IR type name.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "string" => Some(ConfigType::String),
            "int" => Some(ConfigType::Int),
            "bool" => Some(ConfigType::Bool),
            "list" => Some(ConfigType::List),
            _ => None,
        }
    }
}

/// A declared resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Logical resource name, unique within the program.
    pub name: String,
    /// Provider type token, e.g. `aws:s3/bucket:Bucket`.
    pub type_token: String,
    /// Input properties in declaration order.
    pub properties: Vec<(String, Expr)>,
    /// Names of resources this one must be created after.
    pub depends_on: Vec<String>,
}

/// A declared stack output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    /// Output name as referenced in the program.
    pub name: String,
    /// Stable name the output is exported under.
    pub logical_name: String,
    pub value: Expr,
}
