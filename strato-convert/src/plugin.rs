//! Out-of-process language runtime plugins.
//!
//! A plugin is an executable named `strato-language-<runtime>` resolved
//! from [`PLUGIN_PATH_ENV`] directories and then the process `PATH`. The
//! generation exchange is one JSON request on stdin and one JSON response
//! on stdout; the manifest crosses the boundary as a serialized string and
//! the plugin's error message, if any, is propagated verbatim.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use eyre::Result;
use serde::{Deserialize, Serialize};
use strato_manifest::Project;
use tracing::debug;

use crate::{error::PluginError, generator::ProjectGenerator};

/// Environment variable listing extra plugin search directories.
pub const PLUGIN_PATH_ENV: &str = "STRATO_PLUGIN_PATH";

/// Generator backed by an out-of-process language runtime plugin.
pub struct PluginGenerator {
    runtime: String,
    search_dirs: Vec<PathBuf>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    directory: &'a str,
    project: &'a str,
    program: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    error: Option<String>,
}

impl PluginGenerator {
    pub fn new(runtime: impl Into<String>, search_dirs: &[PathBuf]) -> Self {
        Self {
            runtime: runtime.into(),
            search_dirs: search_dirs.to_vec(),
        }
    }

    fn binary_name(&self) -> String {
        format!("strato-language-{}", self.runtime)
    }

    /// Resolve the plugin executable, searching the configured directories
    /// before the process `PATH`.
    fn resolve(&self) -> Result<PathBuf, PluginError> {
        let binary = self.binary_name();
        let path_dirs = std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
            .unwrap_or_default();

        for dir in self.search_dirs.iter().chain(path_dirs.iter()) {
            let candidate = dir.join(&binary);
            if candidate.is_file() {
                debug!(runtime = %self.runtime, path = %candidate.display(), "resolved language runtime plugin");
                return Ok(candidate);
            }
        }
        Err(PluginError::NotFound {
            runtime: self.runtime.clone(),
        })
    }

    fn invoke(&self, binary: &Path, request: &GenerateRequest) -> Result<(), PluginError> {
        let spawn_err = |source| PluginError::Spawn {
            runtime: self.runtime.clone(),
            path: binary.to_path_buf(),
            source,
        };
        let protocol_err = |message: String| PluginError::Protocol {
            runtime: self.runtime.clone(),
            message,
        };

        let mut child = Command::new(binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| protocol_err("plugin stdin not available".into()))?;
            let payload = serde_json::to_vec(request).map_err(|source| PluginError::Serialize {
                runtime: self.runtime.clone(),
                source,
            })?;
            stdin
                .write_all(&payload)
                .and_then(|()| stdin.write_all(b"\n"))
                .map_err(|e| protocol_err(format!("failed to send request: {}", e)))?;
            // dropping stdin closes the pipe and lets the plugin run
        }

        let output = child.wait_with_output().map_err(spawn_err)?;
        match serde_json::from_slice::<GenerateResponse>(&output.stdout) {
            Ok(GenerateResponse { error: Some(message) }) => {
                Err(PluginError::Generation { message })
            }
            Ok(GenerateResponse { error: None }) if output.status.success() => Ok(()),
            Ok(_) => Err(protocol_err(format!(
                "plugin exited with {} after a success response",
                output.status
            ))),
            Err(_) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(protocol_err(format!(
                    "unreadable response (exit {}): {}",
                    output.status,
                    stderr.trim()
                )))
            }
        }
    }
}

impl ProjectGenerator for PluginGenerator {
    fn language(&self) -> &str {
        &self.runtime
    }

    fn generate(&self, out_dir: &Path, project: &Project, program: &str) -> Result<()> {
        let binary = self.resolve()?;
        let manifest = serde_json::to_string(project).map_err(|source| PluginError::Serialize {
            runtime: self.runtime.clone(),
            source,
        })?;
        let directory = out_dir.display().to_string();
        let request = GenerateRequest {
            directory: &directory,
            project: &manifest,
            program,
        };
        self.invoke(&binary, &request)?;
        Ok(())
    }
}

/// Plugin search directories from [`PLUGIN_PATH_ENV`].
pub(crate) fn search_dirs_from_env() -> Vec<PathBuf> {
    std::env::var_os(PLUGIN_PATH_ENV)
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_missing_plugin() {
        let generator = PluginGenerator::new("no-such-runtime", &[]);
        let err = generator.resolve().unwrap_err();
        assert!(matches!(err, PluginError::NotFound { runtime } if runtime == "no-such-runtime"));
    }

    #[test]
    fn test_resolve_from_search_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let binary = dir.path().join("strato-language-fake");
        std::fs::write(&binary, "#!/bin/sh\n").unwrap();

        let generator = PluginGenerator::new("fake", &[dir.path().to_path_buf()]);
        assert_eq!(generator.resolve().unwrap(), binary);
    }

    #[test]
    fn test_request_wire_format() {
        let request = GenerateRequest {
            directory: "/tmp/out",
            project: "{\"name\":\"demo\"}",
            program: "key = 1",
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&request).unwrap()).unwrap();
        assert_eq!(json["directory"], "/tmp/out");
        assert_eq!(json["project"], "{\"name\":\"demo\"}");
        assert_eq!(json["program"], "key = 1");
    }

    #[test]
    fn test_response_with_error() {
        let response: GenerateResponse =
            serde_json::from_str("{\"error\": \"unsupported resource\"}").unwrap();
        assert_eq!(response.error.as_deref(), Some("unsupported resource"));

        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.error.is_none());
    }
}
