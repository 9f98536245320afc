//! Translation from the IR program to `index.ts`.

use eyre::{Result, bail};
use strato_ir::{ConfigType, Expr, Program, StringPart};

const INDENT: &str = "    ";

/// Emit the program body of `index.ts`.
pub(crate) fn emit_index(program: &Program) -> Result<String> {
    let mut emitter = Emitter::default();
    let body = emitter.emit_body(program)?;

    let mut out = String::new();
    if emitter.uses_fs {
        out.push_str("import * as fs from \"node:fs\";\n");
    }
    if emitter.uses_sdk {
        out.push_str("import * as strato from \"@strato/sdk\";\n");
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&body);
    Ok(out)
}

#[derive(Default)]
struct Emitter {
    uses_fs: bool,
    uses_sdk: bool,
}

impl Emitter {
    fn emit_body(&mut self, program: &Program) -> Result<String> {
        let mut blocks = Vec::new();

        for variable in &program.variables {
            let value = self.emit_expr(&variable.value, 0)?;
            blocks.push(format!("const {} = {};", variable.name, value));
        }
        for entry in &program.config {
            self.uses_sdk = true;
            let getter = match entry.ty {
                ConfigType::String => "getString",
                ConfigType::Int => "getNumber",
                ConfigType::Bool => "getBoolean",
                ConfigType::List => "getList",
            };
            let mut line = format!("const {} = strato.config.{}(\"{}\")", entry.name, getter, entry.name);
            if let Some(default) = &entry.default {
                line.push_str(" ?? ");
                line.push_str(&self.emit_expr(default, 0)?);
            }
            line.push(';');
            blocks.push(line);
        }
        for resource in &program.resources {
            self.uses_sdk = true;
            let mut block = format!(
                "const {} = new strato.Resource(\"{}\", ",
                resource.name, resource.type_token
            );
            if resource.properties.is_empty() {
                block.push_str("{}");
            } else {
                block.push_str("{\n");
                for (name, value) in &resource.properties {
                    block.push_str(INDENT);
                    block.push_str(name);
                    block.push_str(": ");
                    block.push_str(&self.emit_expr(value, 1)?);
                    block.push_str(",\n");
                }
                block.push('}');
            }
            if !resource.depends_on.is_empty() {
                block.push_str(&format!(
                    ", {{ dependsOn: [{}] }}",
                    resource.depends_on.join(", ")
                ));
            }
            block.push_str(");");
            blocks.push(block);
        }
        for output in &program.outputs {
            let value = self.emit_expr(&output.value, 0)?;
            blocks.push(format!("export const {} = {};", output.name, value));
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
            Expr::Bool(b) => b.to_string(),
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
                    out.push_str(key);
                    out.push_str(": ");
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
                self.uses_fs = true;
                format!("fs.readFileSync({}, \"utf8\")", arg(self, 0)?)
            }
            "toJSON" => format!("JSON.stringify({})", arg(self, 0)?),
            "toBase64" => format!("Buffer.from({}).toString(\"base64\")", arg(self, 0)?),
            "join" => format!("{}.join({})", arg(self, 1)?, arg(self, 0)?),
            "secret" => {
                self.uses_sdk = true;
                format!("strato.secret({})", arg(self, 0)?)
            }
            other => bail!("unsupported function '{}'", other),
        })
    }
}

/// Render a string literal, using a template literal when interpolated.
fn emit_string(parts: &[StringPart]) -> String {
    let interpolated = parts.iter().any(|p| matches!(p, StringPart::Interp(_)));
    let mut out = String::new();
    if interpolated {
        out.push('`');
        for part in parts {
            match part {
                StringPart::Literal(s) => push_escaped(&mut out, s, '`'),
                StringPart::Interp(t) => {
                    out.push_str("${");
                    out.push_str(&t.to_string());
                    out.push('}');
                }
            }
        }
        out.push('`');
    } else {
        out.push('"');
        for part in parts {
            if let StringPart::Literal(s) = part {
                push_escaped(&mut out, s, '"');
            }
        }
        out.push('"');
    }
    out
}

fn push_escaped(out: &mut String, s: &str, quote: char) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '$' => out.push_str(if quote == '`' { "\\$" } else { "$" }),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(text: &str) -> String {
        let index = emit_index(&strato_ir::parse(text).unwrap()).unwrap();
        index.trim_end().to_string()
    }

    #[test]
    fn test_emit_simple_program() {
        let index = emit(concat!(
            "key = readFile(\"key.pub\")\n",
            "\n",
            "output result {\n",
            "    __logicalName = \"result\"\n",
            "    value = key\n",
            "}",
        ));
        insta::assert_snapshot!(index, @r#"
        import * as fs from "node:fs";

        const key = fs.readFileSync("key.pub", "utf8");

        export const result = key;
        "#);
    }

    #[test]
    fn test_emit_resource_with_config() {
        let index = emit(concat!(
            "config zone \"string\" {\n",
            "    default = \"us-west-2a\"\n",
            "}\n",
            "\n",
            "resource bucket \"aws:s3/bucket:Bucket\" {\n",
            "    acl = \"private\"\n",
            "    zone = zone\n",
            "}\n",
            "\n",
            "output arn {\n",
            "    __logicalName = \"arn\"\n",
            "    value = bucket.arn\n",
            "}",
        ));
        insta::assert_snapshot!(index, @r#"
        import * as strato from "@strato/sdk";

        const zone = strato.config.getString("zone") ?? "us-west-2a";

        const bucket = new strato.Resource("aws:s3/bucket:Bucket", {
            acl: "private",
            zone: zone,
        });

        export const arn = bucket.arn;
        "#);
    }

    #[test]
    fn test_emit_interpolated_string() {
        let index = emit("host = \"db\"\n\nurl = \"https://${host}/index\"");
        assert!(index.contains("const url = `https://${host}/index`;"));
    }

    #[test]
    fn test_emit_join_and_base64() {
        let index = emit("joined = join(\",\", [\"a\", \"b\"])\n\nencoded = toBase64(joined)");
        assert!(index.contains("const joined = [\"a\", \"b\"].join(\",\");"));
        assert!(index.contains("const encoded = Buffer.from(joined).toString(\"base64\");"));
    }

    #[test]
    fn test_unknown_function_is_rejected() {
        let program = strato_ir::parse("x = mystery(1)").unwrap();
        assert!(emit_index(&program).is_err());
    }
}
