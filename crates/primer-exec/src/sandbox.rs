//! Remote sandbox protocol and HTTP transport.
//!
//! The sandbox speaks the Piston execute API: one JSON `POST` with the
//! language, a version wildcard and the source files, answered by a JSON
//! object whose `run` stage carries the exit code and captured streams.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::language::Language;

/// Version wildcard: let the sandbox pick its newest runtime.
const ANY_VERSION: &str = "*";

/// Compile-and-run request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    pub language: String,
    pub version: String,
    pub files: Vec<SourceFile>,
}

/// One source file in a [`RunRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl RunRequest {
    /// Build a single-file request for `source`.
    #[must_use]
    pub fn new(source: &str, language: &Language) -> Self {
        Self {
            language: language.runtime().to_owned(),
            version: ANY_VERSION.to_owned(),
            files: vec![SourceFile {
                name: language.file_name().to_owned(),
                content: source.to_owned(),
            }],
        }
    }
}

/// Sandbox response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunResponse {
    /// Run stage result.
    pub run: StageResult,
    /// Compile stage result (compiled languages only).
    #[serde(default)]
    pub compile: Option<StageResult>,
}

/// Result of one sandbox stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StageResult {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Signal name when the process was killed.
    #[serde(default)]
    pub signal: Option<String>,
    pub stdout: String,
    pub stderr: String,
}

/// Sandbox call error.
#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    /// Request failed (connection refused, DNS, TLS, timeout, ...).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// Sandbox answered with an error status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Transport to a compile-and-run sandbox.
pub trait Sandbox {
    /// Submit one request and return the decoded response.
    fn run(&self, request: &RunRequest) -> Result<RunResponse, SandboxError>;
}

/// Create HTTP agent with the specified timeout.
///
/// The timeout covers the whole call, from connect to the last body byte.
pub(crate) fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Piston-compatible HTTP sandbox.
pub struct PistonSandbox {
    agent: Agent,
    endpoint: String,
}

impl PistonSandbox {
    /// Create a sandbox client for `endpoint` with a bounded wait.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            endpoint: endpoint.into(),
        }
    }

    /// Execution endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Sandbox for PistonSandbox {
    fn run(&self, request: &RunRequest) -> Result<RunResponse, SandboxError> {
        let response = self.agent.post(&self.endpoint).send_json(request)?;

        let status = response.status().as_u16();
        let body = response.into_body().read_to_string()?;

        if status >= 400 {
            return Err(SandboxError::Status { status, body });
        }

        serde_json::from_str(&body).map_err(|e| SandboxError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body_shape() {
        let request = RunRequest::new("print('hi')", &Language::Python);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "language": "python",
                "version": "*",
                "files": [{"name": "main.py", "content": "print('hi')"}]
            })
        );
    }

    #[test]
    fn test_decode_response() {
        let body = r#"{
            "language": "python",
            "version": "3.10.0",
            "run": {"stdout": "hi\n", "stderr": "", "code": 0, "signal": null, "output": "hi\n"}
        }"#;
        let response: RunResponse = serde_json::from_str(body).unwrap();

        assert_eq!(
            response,
            RunResponse {
                run: StageResult {
                    code: Some(0),
                    signal: None,
                    stdout: "hi\n".to_owned(),
                    stderr: String::new(),
                },
                compile: None,
            }
        );
    }

    #[test]
    fn test_decode_response_with_compile_stage() {
        let body = r#"{
            "compile": {"stdout": "", "stderr": "error: x", "code": 1, "signal": null},
            "run": {"stdout": "", "stderr": "", "code": null, "signal": null}
        }"#;
        let response: RunResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.compile.unwrap().code, Some(1));
        assert_eq!(response.run.code, None);
    }

    #[test]
    fn test_decode_rejects_missing_run() {
        let body = r#"{"message": "runtime is unknown"}"#;
        assert!(serde_json::from_str::<RunResponse>(body).is_err());
    }

    #[test]
    fn test_decode_rejects_missing_streams() {
        let body = r#"{"run": {"code": 0}}"#;
        assert!(serde_json::from_str::<RunResponse>(body).is_err());
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is closed on test machines; connect fails fast
        let sandbox = PistonSandbox::new("http://127.0.0.1:9/execute", Duration::from_secs(2));
        let request = RunRequest::new("print('hi')", &Language::Python);

        let err = sandbox.run(&request).unwrap_err();
        assert!(
            matches!(err, SandboxError::Transport(_)),
            "Expected SandboxError::Transport, got {err:?}"
        );
    }

    #[test]
    fn test_endpoint_accessor() {
        let sandbox = PistonSandbox::new("http://localhost:2000/api/v2/execute", Duration::from_secs(1));
        assert_eq!(sandbox.endpoint(), "http://localhost:2000/api/v2/execute");
    }
}
