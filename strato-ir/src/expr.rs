//! Expression model.

use serde::Serialize;

/// An expression in the program model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    /// A string literal, possibly with interpolated segments.
    String(Vec<StringPart>),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A reference to a variable, resource, or config entry, with an
    /// optional attribute path (`bucket.arn`).
    Ref(Traversal),
    /// A builtin function call (`readFile("key.pub")`).
    Call { func: String, args: Vec<Expr> },
    List(Vec<Expr>),
    /// An object literal with entries in declaration order.
    Object(Vec<(String, Expr)>),
}

impl Expr {
    /// Convenience constructor for a plain (non-interpolated) string.
    pub fn literal(s: impl Into<String>) -> Self {
        Expr::String(vec![StringPart::Literal(s.into())])
    }

    /// Convenience constructor for a bare reference.
    pub fn reference(root: impl Into<String>) -> Self {
        Expr::Ref(Traversal {
            root: root.into(),
            path: Vec::new(),
        })
    }

    /// Visit every traversal in this expression tree.
    pub fn visit_refs<'a>(&'a self, visit: &mut impl FnMut(&'a Traversal)) {
        match self {
            Expr::String(parts) => {
                for part in parts {
                    if let StringPart::Interp(t) = part {
                        visit(t);
                    }
                }
            }
            Expr::Ref(t) => visit(t),
            Expr::Call { args, .. } | Expr::List(args) => {
                for arg in args {
                    arg.visit_refs(visit);
                }
            }
            Expr::Object(entries) => {
                for (_, value) in entries {
                    value.visit_refs(visit);
                }
            }
            Expr::Int(_) | Expr::Float(_) | Expr::Bool(_) => {}
        }
    }
}

/// One segment of a string literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StringPart {
    Literal(String),
    /// A `${...}` interpolation.
    Interp(Traversal),
}

/// A dotted reference path: a root name plus attribute segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Traversal {
    pub root: String,
    pub path: Vec<String>,
}

impl Traversal {
    /// Parse a dotted path such as `bucket.arn`.
    ///
    /// Returns `None` if any segment is not a valid identifier.
    pub fn parse(s: &str) -> Option<Self> {
        let mut segments = s.split('.');
        let root = segments.next()?;
        if !is_ident(root) {
            return None;
        }
        let mut path = Vec::new();
        for segment in segments {
            if !is_ident(segment) {
                return None;
            }
            path.push(segment.to_string());
        }
        Some(Traversal {
            root: root.to_string(),
            path,
        })
    }
}

impl std::fmt::Display for Traversal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root)?;
        for segment in &self.path {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

/// Returns true for a valid identifier: letters, digits, and underscores,
/// not starting with a digit.
pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parse a source-level string into an expression, resolving `${...}`
/// interpolations.
///
/// A string that consists of exactly one interpolation becomes a plain
/// [`Expr::Ref`]; `$${` escapes a literal `${`. Returns an error message
/// for an unterminated or malformed interpolation.
pub fn parse_interpolated(input: &str) -> Result<Expr, String> {
    let mut parts: Vec<StringPart> = Vec::new();
    let mut literal = String::new();
    let mut rest = input;

    while let Some(pos) = rest.find("${") {
        if pos > 0 && rest.as_bytes()[pos - 1] == b'$' {
            // "$${" escapes a literal "${"
            literal.push_str(&rest[..pos - 1]);
            literal.push_str("${");
            rest = &rest[pos + 2..];
            continue;
        }
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| format!("unterminated interpolation in \"{}\"", input))?;
        let path = &after[..end];
        let traversal = Traversal::parse(path)
            .ok_or_else(|| format!("invalid reference '{}' in \"{}\"", path, input))?;
        if !literal.is_empty() {
            parts.push(StringPart::Literal(std::mem::take(&mut literal)));
        }
        parts.push(StringPart::Interp(traversal));
        rest = &after[end + 1..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(StringPart::Literal(literal));
    }

    match parts.as_slice() {
        [StringPart::Interp(t)] => Ok(Expr::Ref(t.clone())),
        [] => Ok(Expr::literal("")),
        _ => Ok(Expr::String(parts)),
    }
}
