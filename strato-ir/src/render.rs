//! Textual rendering of the program model.
//!
//! The output is the IR document consumed by every generator: 4-space
//! indentation, one blank line between top-level items, no trailing newline.

use crate::{
    expr::{Expr, StringPart},
    program::{ConfigEntry, Output, Program, Resource, Variable},
};

const INDENT: &str = "    ";

pub(crate) fn render(program: &Program) -> String {
    let mut blocks = Vec::new();
    for variable in &program.variables {
        blocks.push(render_variable(variable));
    }
    for entry in &program.config {
        blocks.push(render_config(entry));
    }
    for resource in &program.resources {
        blocks.push(render_resource(resource));
    }
    for output in &program.outputs {
        blocks.push(render_output(output));
    }
    blocks.join("\n\n")
}

fn render_variable(variable: &Variable) -> String {
    let mut out = String::new();
    out.push_str(&variable.name);
    out.push_str(" = ");
    write_expr(&mut out, &variable.value, 0);
    out
}

fn render_config(entry: &ConfigEntry) -> String {
    let mut out = format!("config {} \"{}\" {{\n", entry.name, entry.ty.as_str());
    if let Some(default) = &entry.default {
        out.push_str(INDENT);
        out.push_str("default = ");
        write_expr(&mut out, default, 1);
        out.push('\n');
    }
    out.push('}');
    out
}

fn render_resource(resource: &Resource) -> String {
    let mut out = format!(
        "resource {} \"{}\" {{\n",
        resource.name, resource.type_token
    );
    for (name, value) in &resource.properties {
        out.push_str(INDENT);
        out.push_str(name);
        out.push_str(" = ");
        write_expr(&mut out, value, 1);
        out.push('\n');
    }
    if !resource.depends_on.is_empty() {
        out.push_str(INDENT);
        out.push_str("options {\n");
        out.push_str(INDENT);
        out.push_str(INDENT);
        out.push_str("dependsOn = [");
        out.push_str(&resource.depends_on.join(", "));
        out.push_str("]\n");
        out.push_str(INDENT);
        out.push_str("}\n");
    }
    out.push('}');
    out
}

fn render_output(output: &Output) -> String {
    let mut out = format!("output {} {{\n", output.name);
    out.push_str(INDENT);
    out.push_str("__logicalName = \"");
    push_escaped(&mut out, &output.logical_name);
    out.push_str("\"\n");
    out.push_str(INDENT);
    out.push_str("value = ");
    write_expr(&mut out, &output.value, 1);
    out.push('\n');
    out.push('}');
    out
}

fn write_expr(out: &mut String, expr: &Expr, indent: usize) {
    match expr {
        Expr::String(parts) => {
            out.push('"');
            for part in parts {
                match part {
                    StringPart::Literal(s) => push_escaped(out, s),
                    StringPart::Interp(t) => {
                        out.push_str("${");
                        out.push_str(&t.to_string());
                        out.push('}');
                    }
                }
            }
            out.push('"');
        }
        Expr::Int(n) => out.push_str(&n.to_string()),
        Expr::Float(x) => out.push_str(&format!("{:?}", x)),
        Expr::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Expr::Ref(t) => out.push_str(&t.to_string()),
        Expr::Call { func, args } => {
            out.push_str(func);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, arg, indent);
            }
            out.push(')');
        }
        Expr::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, item, indent);
            }
            out.push(']');
        }
        Expr::Object(entries) => {
            out.push_str("{\n");
            for (name, value) in entries {
                for _ in 0..=indent {
                    out.push_str(INDENT);
                }
                out.push_str(name);
                out.push_str(" = ");
                write_expr(out, value, indent + 1);
                out.push('\n');
            }
            for _ in 0..indent {
                out.push_str(INDENT);
            }
            out.push('}');
        }
    }
}

/// Escape a literal string segment for IR text.
fn push_escaped(out: &mut String, s: &str) {
    let mut rest = s;
    while let Some(pos) = rest.find("${") {
        escape_chars(out, &rest[..pos]);
        out.push_str("$${");
        rest = &rest[pos + 2..];
    }
    escape_chars(out, rest);
}

fn escape_chars(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
}
