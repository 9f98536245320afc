//! Intermediate representation for the Strato program converter.
//!
//! This crate defines the language-neutral program model that sits between
//! source loading and target-language code generation, together with the
//! textual form all generators consume.
//!
//! # Architecture
//!
//! ```text
//! Strato.toml → strato-loader (lowering) → Program → render() → IR text → codegen
//! ```
//!
//! The textual form is the contract: the loader renders it exactly once per
//! conversion, and generators parse it back with [`parse`]. Rendering then
//! parsing any program yields an equal program.

mod expr;
mod parse;
mod program;
mod render;

pub use expr::{Expr, StringPart, Traversal, is_ident, parse_interpolated};
pub use parse::{ParseError, parse};
pub use program::{ConfigEntry, ConfigType, Output, Program, Resource, Variable};
