//! Lowering from the source document to the intermediate representation.
//!
//! Collects every validation problem as a diagnostic instead of stopping at
//! the first one; a document with any error-level diagnostic never produces
//! a program.

use std::collections::BTreeSet;

use strato_ir::{
    ConfigEntry, ConfigType, Expr, Output, Program, Resource, Variable, is_ident,
    parse_interpolated,
};

use crate::{
    error::{Error, Result},
    schema::SourceDoc,
};

/// Builtin functions callable from variable and property expressions.
pub const BUILTIN_FUNCTIONS: &[&str] = &["readFile", "toJSON", "toBase64", "join", "secret"];

pub(crate) fn lower(doc: &SourceDoc, src: &str, filename: &str) -> Result<Program> {
    let mut lowerer = Lowerer {
        src,
        filename,
        diagnostics: Vec::new(),
    };
    let program = lowerer.run(doc);

    if lowerer.diagnostics.is_empty() {
        Ok(program)
    } else {
        Err(Box::new(Error::Diagnostics {
            count: lowerer.diagnostics.len(),
            related: lowerer.diagnostics,
        }))
    }
}

struct Lowerer<'a> {
    src: &'a str,
    filename: &'a str,
    diagnostics: Vec<Error>,
}

impl Lowerer<'_> {
    fn report(&mut self, message: impl Into<String>) {
        self.diagnostics
            .push(Error::invalid(message, self.src, self.filename));
    }

    fn run(&mut self, doc: &SourceDoc) -> Program {
        if doc.project.name.is_empty() {
            self.report("project name must not be empty");
        }
        if doc.project.runtime.name.is_empty() {
            self.report("project runtime must not be empty");
        }

        let names = self.declared_names(doc);

        let mut program = Program::default();
        for (name, value) in &doc.variables {
            let value = self.lower_value(&format!("variables.{}", name), value);
            program.variables.push(Variable {
                name: name.clone(),
                value,
            });
        }
        for (name, decl) in &doc.config {
            let location = format!("config.{}", name);
            let ty = match ConfigType::from_str(&decl.ty) {
                Some(ty) => ty,
                None => {
                    self.report(format!(
                        "unknown type '{}' in {}, expected string, int, bool, or list",
                        decl.ty, location
                    ));
                    ConfigType::String
                }
            };
            let default = decl
                .default
                .as_ref()
                .map(|value| self.lower_value(&location, value));
            program.config.push(ConfigEntry {
                name: name.clone(),
                ty,
                default,
            });
        }
        for (name, decl) in &doc.resources {
            let location = format!("resources.{}", name);
            self.check_type_token(&decl.type_token, &location);
            let mut properties = Vec::new();
            for (prop, value) in &decl.properties {
                let value = self.lower_value(&format!("{}.properties.{}", location, prop), value);
                properties.push((prop.clone(), value));
            }
            for dep in &decl.options.depends_on {
                if !doc.resources.contains_key(dep) {
                    self.report(format!(
                        "unknown resource '{}' in {}.options.depends-on",
                        dep, location
                    ));
                }
            }
            program.resources.push(Resource {
                name: name.clone(),
                type_token: decl.type_token.clone(),
                properties,
                depends_on: decl.options.depends_on.clone(),
            });
        }
        for (name, value) in &doc.outputs {
            let value = self.lower_value(&format!("outputs.{}", name), value);
            program.outputs.push(Output {
                name: name.clone(),
                logical_name: name.clone(),
                value,
            });
        }

        self.check_references(&program, &names);
        program
    }

    /// Collect declared names, reporting duplicates across sections.
    fn declared_names(&mut self, doc: &SourceDoc) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let declared = doc
            .variables
            .keys()
            .chain(doc.resources.keys())
            .chain(doc.config.keys());
        for name in declared {
            if !is_ident(name) {
                self.report(format!("invalid name '{}': use letters, digits, and underscores, starting with a letter or underscore", name));
            }
            if !names.insert(name.clone()) {
                self.report(format!("duplicate declaration of '{}'", name));
            }
        }
        names
    }

    fn check_type_token(&mut self, token: &str, location: &str) {
        let segments: Vec<&str> = token.split(':').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            self.report(format!(
                "invalid resource type '{}' in {}: expected a 'pkg:module:Member' token",
                token, location
            ));
        }
    }

    fn check_references(&mut self, program: &Program, names: &BTreeSet<String>) {
        let mut undefined: Vec<(String, String)> = Vec::new();
        let mut collect = |expr: &Expr, location: &str| {
            expr.visit_refs(&mut |traversal| {
                if !names.contains(&traversal.root) {
                    undefined.push((traversal.root.clone(), location.to_string()));
                }
            });
        };

        for variable in &program.variables {
            collect(&variable.value, &format!("variables.{}", variable.name));
        }
        for entry in &program.config {
            if let Some(default) = &entry.default {
                collect(default, &format!("config.{}", entry.name));
            }
        }
        for resource in &program.resources {
            for (prop, value) in &resource.properties {
                collect(value, &format!("resources.{}.properties.{}", resource.name, prop));
            }
        }
        for output in &program.outputs {
            collect(&output.value, &format!("outputs.{}", output.name));
        }

        for (root, location) in undefined {
            self.report(format!("undefined reference '{}' in {}", root, location));
        }
    }

    fn lower_value(&mut self, location: &str, value: &toml::Value) -> Expr {
        match value {
            toml::Value::String(s) => match parse_interpolated(s) {
                Ok(expr) => expr,
                Err(message) => {
                    self.report(format!("{} in {}", message, location));
                    Expr::literal("")
                }
            },
            toml::Value::Integer(n) => Expr::Int(*n),
            toml::Value::Float(x) => {
                if !x.is_finite() {
                    self.report(format!("non-finite float is not supported in {}", location));
                }
                Expr::Float(*x)
            }
            toml::Value::Boolean(b) => Expr::Bool(*b),
            toml::Value::Datetime(_) => {
                self.report(format!("datetime values are not supported in {}", location));
                Expr::literal("")
            }
            toml::Value::Array(items) => Expr::List(
                items
                    .iter()
                    .map(|item| self.lower_value(location, item))
                    .collect(),
            ),
            toml::Value::Table(table) => {
                if table.contains_key("fn") {
                    self.lower_call(location, table)
                } else {
                    let mut entries = Vec::new();
                    for (key, value) in table {
                        if !is_ident(key) {
                            self.report(format!("invalid object key '{}' in {}", key, location));
                            continue;
                        }
                        let value = self.lower_value(&format!("{}.{}", location, key), value);
                        entries.push((key.clone(), value));
                    }
                    Expr::Object(entries)
                }
            }
        }
    }

    fn lower_call(&mut self, location: &str, table: &toml::map::Map<String, toml::Value>) -> Expr {
        let func = match table.get("fn") {
            Some(toml::Value::String(name)) => name.clone(),
            _ => {
                self.report(format!("'fn' must be a function name string in {}", location));
                return Expr::literal("");
            }
        };
        if !BUILTIN_FUNCTIONS.contains(&func.as_str()) {
            self.report(format!(
                "unknown function '{}' in {}, expected one of: {}",
                func,
                location,
                BUILTIN_FUNCTIONS.join(", ")
            ));
        }
        for key in table.keys() {
            if key != "fn" && key != "args" {
                self.report(format!(
                    "unexpected key '{}' in function invocation at {}",
                    key, location
                ));
            }
        }
        let args = match table.get("args") {
            Some(toml::Value::Array(items)) => items
                .iter()
                .map(|item| self.lower_value(location, item))
                .collect(),
            Some(_) => {
                self.report(format!("'args' must be an array in {}", location));
                Vec::new()
            }
            None => Vec::new(),
        };
        Expr::Call { func, args }
    }
}
