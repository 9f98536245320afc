//! Parser for IR text.
//!
//! Generators receive the IR document as text and parse it back into the
//! program model with [`parse`]. The grammar is small and brace-delimited;
//! indentation is not significant.

use thiserror::Error;

use crate::{
    expr::{Expr, StringPart, Traversal},
    program::{ConfigEntry, ConfigType, Output, Program, Resource, Variable},
};

/// Error produced when IR text is malformed.
#[derive(Debug, Error)]
#[error("invalid IR at line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Parse an IR document into a [`Program`].
pub fn parse(input: &str) -> Result<Program, ParseError> {
    let tokens = Lexer::new(input).tokenize()?;
    Parser { tokens, pos: 0 }.parse_program()
}

#[derive(Debug, Clone, PartialEq)]
enum TokKind {
    Ident(String),
    Str(Vec<StringPart>),
    Int(i64),
    Float(f64),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Eq,
    Comma,
    Dot,
    Eof,
}

impl TokKind {
    fn describe(&self) -> String {
        match self {
            TokKind::Ident(name) => format!("'{}'", name),
            TokKind::Str(_) => "string".into(),
            TokKind::Int(_) | TokKind::Float(_) => "number".into(),
            TokKind::LBrace => "'{'".into(),
            TokKind::RBrace => "'}'".into(),
            TokKind::LBracket => "'['".into(),
            TokKind::RBracket => "']'".into(),
            TokKind::LParen => "'('".into(),
            TokKind::RParen => "')'".into(),
            TokKind::Eq => "'='".into(),
            TokKind::Comma => "','".into(),
            TokKind::Dot => "'.'".into(),
            TokKind::Eof => "end of input".into(),
        }
    }
}

#[derive(Debug)]
struct Tok {
    kind: TokKind,
    line: usize,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    tokens: Vec<Tok>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            message: message.into(),
        }
    }

    fn push(&mut self, kind: TokKind) {
        self.tokens.push(Tok {
            kind,
            line: self.line,
        });
    }

    fn tokenize(mut self) -> Result<Vec<Tok>, ParseError> {
        while let Some(&c) = self.chars.peek() {
            match c {
                '\n' => {
                    self.line += 1;
                    self.chars.next();
                }
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                '{' => self.single(TokKind::LBrace),
                '}' => self.single(TokKind::RBrace),
                '[' => self.single(TokKind::LBracket),
                ']' => self.single(TokKind::RBracket),
                '(' => self.single(TokKind::LParen),
                ')' => self.single(TokKind::RParen),
                '=' => self.single(TokKind::Eq),
                ',' => self.single(TokKind::Comma),
                '.' => self.single(TokKind::Dot),
                '"' => self.scan_string()?,
                '-' => self.scan_number()?,
                c if c.is_ascii_digit() => self.scan_number()?,
                c if c.is_ascii_alphabetic() || c == '_' => self.scan_ident(),
                other => return Err(self.error(format!("unexpected character '{}'", other))),
            }
        }
        self.push(TokKind::Eof);
        Ok(self.tokens)
    }

    fn single(&mut self, kind: TokKind) {
        self.chars.next();
        self.push(kind);
    }

    fn scan_ident(&mut self) {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        self.push(TokKind::Ident(name));
    }

    fn scan_number(&mut self) -> Result<(), ParseError> {
        let mut text = String::new();
        if self.chars.peek() == Some(&'-') {
            text.push('-');
            self.chars.next();
        }
        let mut is_float = false;
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.chars.next();
            } else if c == '.' && !is_float {
                // Only a fraction if a digit follows; otherwise this dot
                // belongs to a traversal and numbers never precede one.
                let mut lookahead = self.chars.clone();
                lookahead.next();
                if lookahead.peek().is_some_and(|d| d.is_ascii_digit()) {
                    is_float = true;
                    text.push('.');
                    self.chars.next();
                } else {
                    break;
                }
            } else if c == 'e' || c == 'E' {
                is_float = true;
                text.push(c);
                self.chars.next();
                if let Some(&sign) = self.chars.peek() {
                    if sign == '+' || sign == '-' {
                        text.push(sign);
                        self.chars.next();
                    }
                }
            } else {
                break;
            }
        }
        if text == "-" {
            return Err(self.error("expected digits after '-'"));
        }
        if is_float {
            let value: f64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid number '{}'", text)))?;
            self.push(TokKind::Float(value));
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| self.error(format!("invalid number '{}'", text)))?;
            self.push(TokKind::Int(value));
        }
        Ok(())
    }

    fn scan_string(&mut self) -> Result<(), ParseError> {
        self.chars.next(); // opening quote
        let mut parts: Vec<StringPart> = Vec::new();
        let mut literal = String::new();
        loop {
            let c = match self.chars.next() {
                Some(c) => c,
                None => return Err(self.error("unterminated string")),
            };
            match c {
                '"' => break,
                '\n' => return Err(self.error("unterminated string")),
                '\\' => match self.chars.next() {
                    Some('n') => literal.push('\n'),
                    Some('t') => literal.push('\t'),
                    Some('"') => literal.push('"'),
                    Some('\\') => literal.push('\\'),
                    other => {
                        return Err(self.error(format!(
                            "invalid escape '\\{}'",
                            other.map(String::from).unwrap_or_default()
                        )));
                    }
                },
                '$' => match self.chars.peek() {
                    Some('$') => {
                        self.chars.next();
                        if self.chars.peek() == Some(&'{') {
                            self.chars.next();
                            literal.push_str("${");
                        } else {
                            literal.push_str("$$");
                        }
                    }
                    Some('{') => {
                        self.chars.next();
                        let mut path = String::new();
                        loop {
                            match self.chars.next() {
                                Some('}') => break,
                                Some(c) if c == '.' || c.is_ascii_alphanumeric() || c == '_' => {
                                    path.push(c);
                                }
                                _ => return Err(self.error("unterminated interpolation")),
                            }
                        }
                        let traversal = Traversal::parse(&path)
                            .ok_or_else(|| self.error(format!("invalid reference '{}'", path)))?;
                        if !literal.is_empty() {
                            parts.push(StringPart::Literal(std::mem::take(&mut literal)));
                        }
                        parts.push(StringPart::Interp(traversal));
                    }
                    _ => literal.push('$'),
                },
                other => literal.push(other),
            }
        }
        if !literal.is_empty() || parts.is_empty() {
            parts.push(StringPart::Literal(literal));
        }
        self.push(TokKind::Str(parts));
        Ok(())
    }
}

struct Parser {
    tokens: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokKind {
        &self.tokens[self.pos].kind
    }

    fn line(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].line
    }

    fn next(&mut self) -> TokKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        kind
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line(),
            message: message.into(),
        }
    }

    fn expect(&mut self, kind: TokKind) -> Result<(), ParseError> {
        let found = self.next();
        if found == kind {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                kind.describe(),
                found.describe()
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.next() {
            TokKind::Ident(name) => Ok(name),
            other => Err(self.error(format!("expected identifier, found {}", other.describe()))),
        }
    }

    /// A string token with no interpolation, e.g. a resource type token.
    fn expect_plain_string(&mut self) -> Result<String, ParseError> {
        match self.next() {
            TokKind::Str(parts) => match parts.as_slice() {
                [StringPart::Literal(s)] => Ok(s.clone()),
                _ => Err(self.error("interpolation not allowed here")),
            },
            other => Err(self.error(format!("expected string, found {}", other.describe()))),
        }
    }

    fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();
        loop {
            match self.peek() {
                TokKind::Eof => break,
                TokKind::Ident(name) => match name.as_str() {
                    "resource" => {
                        self.next();
                        program.resources.push(self.parse_resource()?);
                    }
                    "output" => {
                        self.next();
                        program.outputs.push(self.parse_output()?);
                    }
                    "config" => {
                        self.next();
                        program.config.push(self.parse_config()?);
                    }
                    _ => {
                        let name = self.expect_ident()?;
                        self.expect(TokKind::Eq)?;
                        let value = self.parse_expr()?;
                        program.variables.push(Variable { name, value });
                    }
                },
                other => {
                    return Err(self.error(format!(
                        "expected declaration, found {}",
                        other.describe()
                    )));
                }
            }
        }
        Ok(program)
    }

    fn parse_resource(&mut self) -> Result<Resource, ParseError> {
        let name = self.expect_ident()?;
        let type_token = self.expect_plain_string()?;
        self.expect(TokKind::LBrace)?;
        let mut properties = Vec::new();
        let mut depends_on = Vec::new();
        loop {
            match self.peek() {
                TokKind::RBrace => {
                    self.next();
                    break;
                }
                TokKind::Ident(name) if name == "options" => {
                    self.next();
                    depends_on = self.parse_resource_options()?;
                }
                _ => {
                    let name = self.expect_ident()?;
                    self.expect(TokKind::Eq)?;
                    let value = self.parse_expr()?;
                    properties.push((name, value));
                }
            }
        }
        Ok(Resource {
            name,
            type_token,
            properties,
            depends_on,
        })
    }

    fn parse_resource_options(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(TokKind::LBrace)?;
        let key = self.expect_ident()?;
        if key != "dependsOn" {
            return Err(self.error(format!("unknown resource option '{}'", key)));
        }
        self.expect(TokKind::Eq)?;
        self.expect(TokKind::LBracket)?;
        let mut names = Vec::new();
        loop {
            match self.peek() {
                TokKind::RBracket => {
                    self.next();
                    break;
                }
                TokKind::Comma => {
                    self.next();
                }
                _ => names.push(self.expect_ident()?),
            }
        }
        self.expect(TokKind::RBrace)?;
        Ok(names)
    }

    fn parse_output(&mut self) -> Result<Output, ParseError> {
        let name = self.expect_ident()?;
        self.expect(TokKind::LBrace)?;
        let mut logical_name = None;
        let mut value = None;
        loop {
            match self.peek() {
                TokKind::RBrace => {
                    self.next();
                    break;
                }
                _ => {
                    let key = self.expect_ident()?;
                    self.expect(TokKind::Eq)?;
                    match key.as_str() {
                        "__logicalName" => logical_name = Some(self.expect_plain_string()?),
                        "value" => value = Some(self.parse_expr()?),
                        other => {
                            return Err(self.error(format!("unknown output entry '{}'", other)));
                        }
                    }
                }
            }
        }
        let value = value.ok_or_else(|| self.error(format!("output '{}' has no value", name)))?;
        Ok(Output {
            logical_name: logical_name.unwrap_or_else(|| name.clone()),
            name,
            value,
        })
    }

    fn parse_config(&mut self) -> Result<ConfigEntry, ParseError> {
        let name = self.expect_ident()?;
        let type_name = self.expect_plain_string()?;
        let ty = ConfigType::from_str(&type_name)
            .ok_or_else(|| self.error(format!("unknown config type '{}'", type_name)))?;
        self.expect(TokKind::LBrace)?;
        let mut default = None;
        loop {
            match self.peek() {
                TokKind::RBrace => {
                    self.next();
                    break;
                }
                _ => {
                    let key = self.expect_ident()?;
                    if key != "default" {
                        return Err(self.error(format!("unknown config entry '{}'", key)));
                    }
                    self.expect(TokKind::Eq)?;
                    default = Some(self.parse_expr()?);
                }
            }
        }
        Ok(ConfigEntry { name, ty, default })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        match self.next() {
            TokKind::Str(parts) => Ok(match parts.as_slice() {
                // A string that is exactly one interpolation is a reference.
                [StringPart::Interp(t)] => Expr::Ref(t.clone()),
                _ => Expr::String(parts),
            }),
            TokKind::Int(n) => Ok(Expr::Int(n)),
            TokKind::Float(x) => Ok(Expr::Float(x)),
            TokKind::Ident(name) => match name.as_str() {
                "true" => Ok(Expr::Bool(true)),
                "false" => Ok(Expr::Bool(false)),
                _ => {
                    if *self.peek() == TokKind::LParen {
                        self.next();
                        let mut args = Vec::new();
                        loop {
                            match self.peek() {
                                TokKind::RParen => {
                                    self.next();
                                    break;
                                }
                                TokKind::Comma => {
                                    self.next();
                                }
                                _ => args.push(self.parse_expr()?),
                            }
                        }
                        Ok(Expr::Call { func: name, args })
                    } else {
                        let mut path = Vec::new();
                        while *self.peek() == TokKind::Dot {
                            self.next();
                            path.push(self.expect_ident()?);
                        }
                        Ok(Expr::Ref(Traversal { root: name, path }))
                    }
                }
            },
            TokKind::LBracket => {
                let mut items = Vec::new();
                loop {
                    match self.peek() {
                        TokKind::RBracket => {
                            self.next();
                            break;
                        }
                        TokKind::Comma => {
                            self.next();
                        }
                        _ => items.push(self.parse_expr()?),
                    }
                }
                Ok(Expr::List(items))
            }
            TokKind::LBrace => {
                let mut entries = Vec::new();
                loop {
                    match self.peek() {
                        TokKind::RBrace => {
                            self.next();
                            break;
                        }
                        _ => {
                            let key = self.expect_ident()?;
                            self.expect(TokKind::Eq)?;
                            entries.push((key, self.parse_expr()?));
                        }
                    }
                }
                Ok(Expr::Object(entries))
            }
            other => Err(self.error(format!("expected expression, found {}", other.describe()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::ConfigType;

    #[test]
    fn test_parse_variable_call() {
        let program = parse("key = readFile(\"key.pub\")").unwrap();
        assert_eq!(program.variables.len(), 1);
        assert_eq!(
            program.variables[0].value,
            Expr::Call {
                func: "readFile".into(),
                args: vec![Expr::literal("key.pub")],
            }
        );
    }

    #[test]
    fn test_parse_output() {
        let text = "output result {\n    __logicalName = \"result\"\n    value = key\n}";
        let program = parse(text).unwrap();
        assert_eq!(program.outputs.len(), 1);
        let output = &program.outputs[0];
        assert_eq!(output.name, "result");
        assert_eq!(output.logical_name, "result");
        assert_eq!(output.value, Expr::reference("key"));
    }

    #[test]
    fn test_parse_resource_with_options() {
        let text = concat!(
            "resource app \"aws:ec2/instance:Instance\" {\n",
            "    ami = image.id\n",
            "    count = 2\n",
            "    options {\n",
            "        dependsOn = [bucket, vpc]\n",
            "    }\n",
            "}",
        );
        let program = parse(text).unwrap();
        let resource = &program.resources[0];
        assert_eq!(resource.type_token, "aws:ec2/instance:Instance");
        assert_eq!(resource.properties.len(), 2);
        assert_eq!(resource.depends_on, vec!["bucket", "vpc"]);
    }

    #[test]
    fn test_parse_config() {
        let text = "config zone \"string\" {\n    default = \"us-west-2a\"\n}";
        let program = parse(text).unwrap();
        let entry = &program.config[0];
        assert_eq!(entry.name, "zone");
        assert_eq!(entry.ty, ConfigType::String);
        assert_eq!(entry.default, Some(Expr::literal("us-west-2a")));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("key = ").is_err());
        assert!(parse("resource {").is_err());
        assert!(parse("???").is_err());
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = parse("key = 1\nbroken =").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_round_trip() {
        let program = Program {
            variables: vec![
                Variable {
                    name: "key".into(),
                    value: Expr::Call {
                        func: "readFile".into(),
                        args: vec![Expr::literal("key.pub")],
                    },
                },
                Variable {
                    name: "greeting".into(),
                    value: crate::parse_interpolated("hello ${key}!").unwrap(),
                },
                Variable {
                    name: "count".into(),
                    value: Expr::Int(-3),
                },
                Variable {
                    name: "ratio".into(),
                    value: Expr::Float(2.5),
                },
            ],
            config: vec![ConfigEntry {
                name: "zone".into(),
                ty: ConfigType::String,
                default: Some(Expr::literal("us-west-2a")),
            }],
            resources: vec![Resource {
                name: "bucket".into(),
                type_token: "aws:s3/bucket:Bucket".into(),
                properties: vec![
                    ("acl".into(), Expr::literal("private")),
                    (
                        "tags".into(),
                        Expr::Object(vec![("env".into(), Expr::literal("dev"))]),
                    ),
                    (
                        "grants".into(),
                        Expr::List(vec![Expr::Bool(true), Expr::reference("zone")]),
                    ),
                ],
                depends_on: vec![],
            }],
            outputs: vec![Output {
                name: "result".into(),
                logical_name: "result".into(),
                value: Expr::Ref(Traversal {
                    root: "bucket".into(),
                    path: vec!["arn".into()],
                }),
            }],
        };
        let text = program.to_text();
        let parsed = parse(&text).expect("rendered IR should parse");
        assert_eq!(parsed, program);
    }
}
