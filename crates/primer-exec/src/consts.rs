//! Execution constants.

use std::time::Duration;

/// Public Piston execution endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://emkc.org/api/v2/piston/execute";

/// Default bound on one remote execution (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Output reported by the approximation when no print call is recognized.
pub const NO_OUTPUT_MESSAGE: &str = "Program executed successfully (no output)";
