//! Execution result types.

/// Whether a run succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failure,
}

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrigin {
    /// Produced by the remote sandbox.
    Remote,
    /// Synthesized by the local approximation.
    Approximated,
}

/// Outcome of one execution request.
///
/// Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    /// Program output (stdout).
    pub output: String,
    /// Error details for failed runs.
    pub diagnostic: Option<String>,
    pub origin: ResultOrigin,
}

impl ExecutionResult {
    /// Successful run with the given output.
    #[must_use]
    pub fn success(output: impl Into<String>, origin: ResultOrigin) -> Self {
        Self {
            status: ExecutionStatus::Success,
            output: output.into(),
            diagnostic: None,
            origin,
        }
    }

    /// Failed run with any output produced so far and a diagnostic.
    #[must_use]
    pub fn failure(
        output: impl Into<String>,
        diagnostic: impl Into<String>,
        origin: ResultOrigin,
    ) -> Self {
        Self {
            status: ExecutionStatus::Failure,
            output: output.into(),
            diagnostic: Some(diagnostic.into()),
            origin,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    /// Whether the result came from the local approximation.
    #[must_use]
    pub fn is_approximated(&self) -> bool {
        self.origin == ResultOrigin::Approximated
    }
}
