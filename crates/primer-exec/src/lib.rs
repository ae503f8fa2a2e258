//! Snippet execution for lesson pages.
//!
//! [`ExecutionClient`] sends a source snippet to a remote compile-and-run
//! sandbox and maps the outcome to an [`ExecutionResult`]. When the sandbox
//! cannot be reached, times out, or answers with something unexpected, the
//! client falls back to [`approximate`]: a textual pattern matcher that
//! recognizes simple print statements and synthesizes plausible output.
//!
//! The approximation has no notion of control flow or computation. Results
//! produced by it are marked with [`ResultOrigin::Approximated`] so callers
//! can label them.
//!
//! # Architecture
//!
//! - [`language`](Language): language identifiers and their runtime names
//! - [`sandbox`](Sandbox): request/response types and the HTTP transport
//! - [`client`](ExecutionClient): dispatch, response interpretation, fallback
//! - [`approximate`]: local fallback evaluator
//!
//! # Example
//!
//! ```no_run
//! use primer_exec::{ExecutionClient, Language};
//!
//! let client = ExecutionClient::new("https://emkc.org/api/v2/piston/execute");
//! let result = client.execute("print('hi')", &Language::Python);
//! println!("{}", result.output);
//! ```

mod approximate;
mod client;
mod consts;
mod language;
mod result;
mod sandbox;

pub use approximate::approximate;
pub use client::{ExecutionClient, interpret_response};
pub use consts::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, NO_OUTPUT_MESSAGE};
pub use language::Language;
pub use result::{ExecutionResult, ExecutionStatus, ResultOrigin};
pub use sandbox::{PistonSandbox, RunRequest, RunResponse, Sandbox, SandboxError, SourceFile, StageResult};
