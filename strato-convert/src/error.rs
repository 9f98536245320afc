use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors from target dispatch.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The requested target cannot be generated. Raised for the IR
    /// pseudo-target outside dev mode.
    #[error("cannot generate programs for '{language}'")]
    UnsupportedTarget { language: String },
}

/// Errors from the plugin generator adapter.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("no language runtime plugin found for '{runtime}'")]
    NotFound { runtime: String },

    #[error("failed to start language runtime '{runtime}' at '{path}'")]
    Spawn {
        runtime: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize project manifest for '{runtime}'")]
    Serialize {
        runtime: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("language runtime '{runtime}' protocol error: {message}")]
    Protocol { runtime: String, message: String },

    /// An application-level generation error, propagated verbatim.
    #[error("{message}")]
    Generation { message: String },
}

/// Errors from the post-generation step.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The generated project's manifest is unreadable or malformed. This
    /// indicates a generator defect, not a user error.
    #[error("failed to read generated project manifest")]
    Manifest {
        #[source]
        source: Box<strato_manifest::Error>,
    },

    #[error("unable to install dependencies for runtime '{runtime}'")]
    UnsupportedRuntime { runtime: String },

    #[error("failed to run '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed with {status}")]
    Failed { command: String, status: ExitStatus },
}
