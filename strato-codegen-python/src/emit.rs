//! Translation from the IR program to `__main__.py`.

use eyre::{Result, bail};
use strato_ir::{ConfigType, Expr, Program, StringPart};

const INDENT: &str = "    ";

/// Emit the program body of `__main__.py`.
pub(crate) fn emit_main(program: &Program) -> Result<String> {
    let mut emitter = Emitter::default();
    let body = emitter.emit_body(program)?;

    let mut imports = Vec::new();
    if emitter.uses_base64 {
        imports.push("import base64".to_string());
    }
    if emitter.uses_json {
        imports.push("import json".to_string());
    }
    if emitter.uses_path {
        imports.push("from pathlib import Path".to_string());
    }
    if emitter.uses_sdk {
        imports.push("import strato".to_string());
    }

    let mut out = imports.join("\n");
    if !out.is_empty() {
        out.push_str("\n\n");
    }
    out.push_str(&body);
    Ok(out)
}

#[derive(Default)]
struct Emitter {
    uses_base64: bool,
    uses_json: bool,
    uses_path: bool,
    uses_sdk: bool,
}

impl Emitter {
    fn emit_body(&mut self, program: &Program) -> Result<String> {
        let mut blocks = Vec::new();

        for variable in &program.variables {
            let value = self.emit_expr(&variable.value, 0)?;
            blocks.push(format!("{} = {}", variable.name, value));
        }
        for entry in &program.config {
            self.uses_sdk = true;
            let getter = match entry.ty {
                ConfigType::String => "get_string",
                ConfigType::Int => "get_int",
                ConfigType::Bool => "get_bool",
                ConfigType::List => "get_list",
            };
            let mut line = format!("{} = strato.config.{}(\"{}\")", entry.name, getter, entry.name);
            if let Some(default) = &entry.default {
                line.push_str(" or ");
                line.push_str(&self.emit_expr(default, 0)?);
            }
            blocks.push(line);
        }
        for resource in &program.resources {
            self.uses_sdk = true;
            let mut block = format!(
                "{} = strato.Resource(\"{}\", ",
                resource.name, resource.type_token
            );
            if resource.properties.is_empty() {
                block.push_str("{}");
            } else {
                block.push_str("{\n");
                for (name, value) in &resource.properties {
                    block.push_str(INDENT);
                    block.push('"');
                    block.push_str(name);
                    block.push_str("\": ");
                    block.push_str(&self.emit_expr(value, 1)?);
                    block.push_str(",\n");
                }
                block.push('}');
            }
            if !resource.depends_on.is_empty() {
                block.push_str(&format!(
                    ", depends_on=[{}]",
                    resource.depends_on.join(", ")
                ));
            }
            block.push(')');
            blocks.push(block);
        }
        for output in &program.outputs {
            self.uses_sdk = true;
            let value = self.emit_expr(&output.value, 0)?;
            blocks.push(format!(
                "strato.export(\"{}\", {})",
                output.logical_name, value
            ));
        }

        let mut body = blocks.join("\n\n");
        if !body.is_empty() {
            body.push('\n');
        }
        Ok(body)
    }

    fn emit_expr(&mut self, expr: &Expr, indent: usize) -> Result<String> {
        Ok(match expr {
            Expr::String(parts) => emit_string(parts),
            Expr::Int(n) => n.to_string(),
            Expr::Float(x) => format!("{:?}", x),
            Expr::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            Expr::Ref(traversal) => traversal.to_string(),
            Expr::Call { func, args } => self.emit_call(func, args, indent)?,
            Expr::List(items) => {
                let items = items
                    .iter()
                    .map(|item| self.emit_expr(item, indent))
                    .collect::<Result<Vec<_>>>()?;
                format!("[{}]", items.join(", "))
            }
            Expr::Object(entries) => {
                if entries.is_empty() {
                    return Ok("{}".to_string());
                }
                let mut out = String::from("{\n");
                for (key, value) in entries {
                    for _ in 0..=indent {
                        out.push_str(INDENT);
                    }
                    out.push('"');
                    out.push_str(key);
                    out.push_str("\": ");
                    out.push_str(&self.emit_expr(value, indent + 1)?);
                    out.push_str(",\n");
                }
                for _ in 0..indent {
                    out.push_str(INDENT);
                }
                out.push('}');
                out
            }
        })
    }

    fn emit_call(&mut self, func: &str, args: &[Expr], indent: usize) -> Result<String> {
        let arg = |emitter: &mut Self, index: usize| -> Result<String> {
            match args.get(index) {
                Some(expr) => emitter.emit_expr(expr, indent),
                None => bail!("'{}' is missing argument {}", func, index + 1),
            }
        };
        Ok(match func {
            "readFile" => {
                self.uses_path = true;
                format!("Path({}).read_text()", arg(self, 0)?)
            }
            "toJSON" => {
                self.uses_json = true;
                format!("json.dumps({})", arg(self, 0)?)
            }
            "toBase64" => {
                self.uses_base64 = true;
                format!(
                    "base64.b64encode({}.encode()).decode()",
                    arg(self, 0)?
                )
            }
            "join" => format!("{}.join({})", arg(self, 0)?, arg(self, 1)?),
            "secret" => {
                self.uses_sdk = true;
                format!("strato.secret({})", arg(self, 0)?)
            }
            other => bail!("unsupported function '{}'", other),
        })
    }
}

/// Render a string literal, using an f-string when interpolated.
fn emit_string(parts: &[StringPart]) -> String {
    let interpolated = parts.iter().any(|p| matches!(p, StringPart::Interp(_)));
    let mut out = String::new();
    if interpolated {
        out.push_str("f\"");
        for part in parts {
            match part {
                StringPart::Literal(s) => {
                    for c in s.chars() {
                        match c {
                            '{' => out.push_str("{{"),
                            '}' => out.push_str("}}"),
                            _ => push_escaped_char(&mut out, c),
                        }
                    }
                }
                StringPart::Interp(t) => {
                    out.push('{');
                    out.push_str(&t.to_string());
                    out.push('}');
                }
            }
        }
        out.push('"');
    } else {
        out.push('"');
        for part in parts {
            if let StringPart::Literal(s) = part {
                for c in s.chars() {
                    push_escaped_char(&mut out, c);
                }
            }
        }
        out.push('"');
    }
    out
}

fn push_escaped_char(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '"' => out.push_str("\\\""),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        _ => out.push(c),
    }
}
