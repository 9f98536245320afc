//! Source document schema.
//!
//! The shape of a `Strato.toml` source file as parsed, before validation
//! and lowering. Tables use `BTreeMap` so rendered IR is deterministic for
//! a given document.

use std::collections::BTreeMap;

use serde::Deserialize;
use strato_manifest::Project;

/// A parsed source document: the project manifest plus the templated
/// program tables.
#[derive(Debug, Deserialize)]
pub struct SourceDoc {
    /// Project metadata.
    pub project: Project,

    /// Named variables: plain values, interpolated strings, or
    /// `{ fn = "...", args = [...] }` builtin invocations.
    #[serde(default)]
    pub variables: BTreeMap<String, toml::Value>,

    /// Declared resources.
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceDecl>,

    /// Declared stack outputs.
    #[serde(default)]
    pub outputs: BTreeMap<String, toml::Value>,

    /// Stack configuration entries.
    #[serde(default)]
    pub config: BTreeMap<String, ConfigDecl>,
}

/// A resource declaration.
#[derive(Debug, Deserialize)]
pub struct ResourceDecl {
    /// Provider type token, e.g. `aws:s3/bucket:Bucket`.
    #[serde(rename = "type")]
    pub type_token: String,

    /// Input properties.
    #[serde(default)]
    pub properties: BTreeMap<String, toml::Value>,

    #[serde(default)]
    pub options: ResourceOptions,
}

/// Resource-level options.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceOptions {
    /// Names of resources this one must be created after.
    #[serde(default, rename = "depends-on")]
    pub depends_on: Vec<String>,
}

/// A configuration entry declaration.
#[derive(Debug, Deserialize)]
pub struct ConfigDecl {
    /// Entry type: `string`, `int`, `bool`, or `list`.
    #[serde(rename = "type")]
    pub ty: String,

    /// Default value used when the stack provides none.
    #[serde(default)]
    pub default: Option<toml::Value>,
}
