use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for loader operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(strato::loader::io),
        help("a source project is a directory containing a Strato.toml")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse source program")]
    #[diagnostic(code(strato::loader::parse))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(strato::loader::invalid))]
    Invalid {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("source program has {count} error(s)")]
    #[diagnostic(code(strato::loader::diagnostics))]
    Diagnostics {
        count: usize,
        #[related]
        related: Vec<Error>,
    },
}

impl Error {
    /// Create an io error for a source path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }

    /// Create a parse error from a toml error with source context
    pub fn parse(source: toml::de::Error, src: &str, filename: &str) -> Box<Self> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: NamedSource::new(filename, src.to_string()),
            span,
            source,
        })
    }

    /// Create a validation diagnostic without a span
    pub fn invalid(message: impl Into<String>, src: &str, filename: &str) -> Self {
        Error::Invalid {
            src: NamedSource::new(filename, src.to_string()),
            span: None,
            message: message.into(),
        }
    }
}
