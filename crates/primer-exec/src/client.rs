//! Execution client: remote dispatch with local fallback.

use std::time::Duration;

use crate::approximate::approximate;
use crate::consts::DEFAULT_TIMEOUT;
use crate::language::Language;
use crate::result::{ExecutionResult, ResultOrigin};
use crate::sandbox::{PistonSandbox, RunRequest, RunResponse, Sandbox, SandboxError};

/// Dispatches snippets to a sandbox.
///
/// `execute` never fails: transport errors, error statuses, malformed
/// responses and timeouts all fall back to [`approximate`]. One call makes
/// exactly one remote attempt, and nothing is cached between calls.
pub struct ExecutionClient<S = PistonSandbox> {
    sandbox: S,
}

impl ExecutionClient<PistonSandbox> {
    /// Create a client for a Piston-compatible `endpoint` with the default
    /// timeout.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            sandbox: PistonSandbox::new(endpoint, DEFAULT_TIMEOUT),
        }
    }

    /// Set the bound on one remote call.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        let endpoint = self.sandbox.endpoint().to_owned();
        Self {
            sandbox: PistonSandbox::new(endpoint, timeout),
        }
    }
}

impl<S: Sandbox> ExecutionClient<S> {
    /// Create a client over a custom sandbox transport.
    pub fn with_sandbox(sandbox: S) -> Self {
        Self { sandbox }
    }

    /// Run `source` remotely, approximating locally if that fails.
    pub fn execute(&self, source: &str, language: &Language) -> ExecutionResult {
        let request = RunRequest::new(source, language);

        match self.sandbox.run(&request).and_then(interpret_response) {
            Ok(result) => {
                tracing::debug!(
                    language = %language,
                    success = result.is_success(),
                    "Remote execution finished"
                );
                result
            }
            Err(e) => {
                tracing::warn!(
                    language = %language,
                    error = %e,
                    "Remote execution unavailable, using local approximation"
                );
                approximate(source, language)
            }
        }
    }
}

/// Map a sandbox response to an execution result.
///
/// A failed compile stage wins over the run stage. A run exiting with 0 and
/// an empty stderr is a success carrying stdout; a non-zero exit, a
/// populated stderr or a signal is a failure.
///
/// # Errors
///
/// Returns [`SandboxError::Malformed`] when the run stage has neither an
/// exit code nor a signal.
pub fn interpret_response(response: RunResponse) -> Result<ExecutionResult, SandboxError> {
    if let Some(compile) = response.compile
        && compile.code.is_some_and(|code| code != 0)
    {
        let diagnostic = if compile.stderr.is_empty() {
            "compilation failed".to_owned()
        } else {
            compile.stderr
        };
        return Ok(ExecutionResult::failure(
            compile.stdout,
            diagnostic,
            ResultOrigin::Remote,
        ));
    }

    let run = response.run;
    match (run.code, run.signal) {
        (Some(0), _) if run.stderr.is_empty() => {
            Ok(ExecutionResult::success(run.stdout, ResultOrigin::Remote))
        }
        (Some(code), _) => {
            let diagnostic = if run.stderr.is_empty() {
                format!("process exited with code {code}")
            } else {
                run.stderr
            };
            Ok(ExecutionResult::failure(
                run.stdout,
                diagnostic,
                ResultOrigin::Remote,
            ))
        }
        (None, Some(signal)) => Ok(ExecutionResult::failure(
            run.stdout,
            format!("terminated by signal {signal}"),
            ResultOrigin::Remote,
        )),
        (None, None) => Err(SandboxError::Malformed(
            "run stage has neither exit code nor signal".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Instant;

    use super::*;
    use crate::result::ExecutionStatus;
    use crate::sandbox::StageResult;
    use pretty_assertions::assert_eq;

    /// Sandbox returning a canned response and recording requests.
    struct FakeSandbox {
        response: fn() -> Result<RunResponse, SandboxError>,
        requests: RefCell<Vec<RunRequest>>,
    }

    impl FakeSandbox {
        fn new(response: fn() -> Result<RunResponse, SandboxError>) -> Self {
            Self {
                response,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl Sandbox for FakeSandbox {
        fn run(&self, request: &RunRequest) -> Result<RunResponse, SandboxError> {
            self.requests.borrow_mut().push(request.clone());
            (self.response)()
        }
    }

    fn stage(code: Option<i32>, stdout: &str, stderr: &str) -> StageResult {
        StageResult {
            code,
            signal: None,
            stdout: stdout.to_owned(),
            stderr: stderr.to_owned(),
        }
    }

    fn run_only(run: StageResult) -> RunResponse {
        RunResponse { run, compile: None }
    }

    #[test]
    fn test_interpret_success() {
        let result = interpret_response(run_only(stage(Some(0), "hi\n", ""))).unwrap();
        assert_eq!(result, ExecutionResult::success("hi\n", ResultOrigin::Remote));
    }

    #[test]
    fn test_interpret_nonzero_exit() {
        let result =
            interpret_response(run_only(stage(Some(1), "partial", "Traceback ..."))).unwrap();
        assert_eq!(
            result,
            ExecutionResult::failure("partial", "Traceback ...", ResultOrigin::Remote)
        );
    }

    #[test]
    fn test_interpret_nonzero_exit_without_stderr() {
        let result = interpret_response(run_only(stage(Some(3), "", ""))).unwrap();
        assert_eq!(result.diagnostic.as_deref(), Some("process exited with code 3"));
    }

    #[test]
    fn test_interpret_zero_exit_with_stderr_is_failure() {
        let result = interpret_response(run_only(stage(Some(0), "out", "warning"))).unwrap();
        assert_eq!(result.status, ExecutionStatus::Failure);
        assert_eq!(result.output, "out");
        assert_eq!(result.diagnostic.as_deref(), Some("warning"));
    }

    #[test]
    fn test_interpret_signal() {
        let mut run = stage(None, "", "");
        run.signal = Some("SIGKILL".to_owned());
        let result = interpret_response(run_only(run)).unwrap();
        assert_eq!(
            result.diagnostic.as_deref(),
            Some("terminated by signal SIGKILL")
        );
    }

    #[test]
    fn test_interpret_compile_failure() {
        let response = RunResponse {
            compile: Some(stage(Some(1), "", "Main.java:3: error: ';' expected")),
            run: stage(None, "", ""),
        };
        let result = interpret_response(response).unwrap();
        assert_eq!(
            result,
            ExecutionResult::failure(
                "",
                "Main.java:3: error: ';' expected",
                ResultOrigin::Remote
            )
        );
    }

    #[test]
    fn test_interpret_compile_failure_without_stderr() {
        let response = RunResponse {
            compile: Some(stage(Some(1), "", "")),
            run: stage(None, "", ""),
        };
        let result = interpret_response(response).unwrap();
        assert_eq!(result.diagnostic.as_deref(), Some("compilation failed"));
    }

    #[test]
    fn test_interpret_successful_compile_uses_run_stage() {
        let response = RunResponse {
            compile: Some(stage(Some(0), "", "")),
            run: stage(Some(0), "42\n", ""),
        };
        let result = interpret_response(response).unwrap();
        assert_eq!(result.output, "42\n");
        assert!(result.is_success());
    }

    #[test]
    fn test_interpret_missing_code_and_signal_is_malformed() {
        let err = interpret_response(run_only(stage(None, "", ""))).unwrap_err();
        assert!(matches!(err, SandboxError::Malformed(_)));
    }

    #[test]
    fn test_execute_remote_success() {
        let client = ExecutionClient::with_sandbox(FakeSandbox::new(|| {
            Ok(run_only(stage(Some(0), "remote\n", "")))
        }));

        let result = client.execute("print('local')", &Language::Python);

        assert_eq!(result, ExecutionResult::success("remote\n", ResultOrigin::Remote));
        let requests = client.sandbox.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].language, "python");
        assert_eq!(requests[0].files[0].content, "print('local')");
    }

    #[test]
    fn test_execute_falls_back_on_error_status() {
        let client = ExecutionClient::with_sandbox(FakeSandbox::new(|| {
            Err(SandboxError::Status {
                status: 503,
                body: "overloaded".to_owned(),
            })
        }));

        let result = client.execute("print('hi')", &Language::Python);

        assert_eq!(result, ExecutionResult::success("hi", ResultOrigin::Approximated));
        assert_eq!(client.sandbox.requests.borrow().len(), 1);
    }

    #[test]
    fn test_execute_falls_back_on_malformed_response() {
        let client = ExecutionClient::with_sandbox(FakeSandbox::new(|| {
            Ok(run_only(stage(None, "", "")))
        }));

        let result = client.execute("console.log(1 + 2)", &Language::JavaScript);

        assert!(result.is_approximated());
        assert_eq!(result.output, "3");
    }

    #[test]
    fn test_execute_unreachable_endpoint_approximates() {
        let client = ExecutionClient::new("http://127.0.0.1:9/execute").timeout(Duration::from_secs(2));

        let result = client.execute("print('hi')", &Language::Python);

        assert_eq!(result, ExecutionResult::success("hi", ResultOrigin::Approximated));
    }

    /// Serve one HTTP request with `status` and `body`, returning the URL.
    fn serve_once(status: u16, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut content_length = 0usize;
            let mut chunked = false;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let header = line.trim_end().to_ascii_lowercase();
                if header.is_empty() {
                    break;
                }
                if let Some(len) = header.strip_prefix("content-length:") {
                    content_length = len.trim().parse().unwrap();
                }
                if header.starts_with("transfer-encoding:") && header.contains("chunked") {
                    chunked = true;
                }
            }
            if chunked {
                // Drain chunks up to the terminating zero-size chunk
                let mut line = String::new();
                while reader.read_line(&mut line).unwrap() > 0 {
                    let last = line.trim_end() == "0";
                    line.clear();
                    if last {
                        reader.read_line(&mut line).unwrap();
                        break;
                    }
                }
            } else {
                let mut request_body = vec![0u8; content_length];
                reader.read_exact(&mut request_body).unwrap();
            }

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        });

        format!("http://{addr}/api/v2/execute")
    }

    #[test]
    fn test_execute_over_http() {
        let endpoint = serve_once(
            200,
            r#"{"language":"python","version":"3.10.0","run":{"stdout":"hello\n","stderr":"","code":0,"signal":null}}"#,
        );
        let client = ExecutionClient::new(endpoint).timeout(Duration::from_secs(5));

        let result = client.execute("print('hello')", &Language::Python);

        assert_eq!(result, ExecutionResult::success("hello\n", ResultOrigin::Remote));
    }

    #[test]
    fn test_execute_over_http_error_status_falls_back() {
        let endpoint = serve_once(400, r#"{"message":"runtime is unknown"}"#);
        let client = ExecutionClient::new(endpoint).timeout(Duration::from_secs(5));

        let result = client.execute("print('x')", &Language::Python);

        assert_eq!(result, ExecutionResult::success("x", ResultOrigin::Approximated));
    }

    /// Accept one connection and hold it open without answering.
    fn stall_once(hold: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            thread::sleep(hold);
        });

        format!("http://{addr}/api/v2/execute")
    }

    #[test]
    fn test_execute_timeout_falls_back() {
        let endpoint = stall_once(Duration::from_secs(5));
        let client = ExecutionClient::new(endpoint).timeout(Duration::from_secs(1));

        let started = Instant::now();
        let result = client.execute("print('hi')", &Language::Python);

        assert!(result.is_approximated());
        assert_eq!(result.output, "hi");
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
