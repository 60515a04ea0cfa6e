//! Error types for the Smite harness.
//!
//! Two tiers exist:
//!
//! - [`AssertionFailure`] is the per-test failure signal. It is produced by the
//!   assertion engine, travels up the test body through `?`, and is always
//!   recovered at the runner's per-test boundary.
//! - [`HarnessError`] covers session-level problems (allocation failure while
//!   growing the registry, lifecycle misuse). These are fatal to the run.

use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::session::SessionState;

/// Tag recorded on a failed test descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An equality assertion (scalar or array, integer or real) did not hold.
    EqualityAssertion,
    /// The test body panicked instead of returning.
    Panic,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::EqualityAssertion => "Equality assertion error",
            ErrorKind::Panic => "Panic",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The failure signal raised by an assertion.
///
/// Returning this from a test body ends the body immediately (fail-fast); the
/// runner copies its fields onto the current descriptor.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("{kind} at line {line}. {detail}")]
#[diagnostic(code(smite::assertion::equality))]
pub struct AssertionFailure {
    pub kind: ErrorKind,
    pub line: u32,
    pub detail: String,
}

impl AssertionFailure {
    pub fn equality(line: u32, detail: String) -> Self {
        Self {
            kind: ErrorKind::EqualityAssertion,
            line,
            detail,
        }
    }
}

/// Session-level errors. None of these are recoverable mid-session.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("failed to grow the test registry to {requested} entries")]
    #[diagnostic(
        code(smite::registry::allocation),
        help("the run cannot continue with a partially grown registry")
    )]
    Allocation {
        requested: usize,
        #[source]
        source: std::collections::TryReserveError,
    },

    #[error("cannot {operation} while the session is {state}")]
    #[diagnostic(code(smite::session::state))]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("registry capacity must be greater than zero")]
    #[diagnostic(code(smite::registry::capacity))]
    InvalidCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_failure_renders_like_the_summary_line() {
        let failure = AssertionFailure::equality(42, "Expected 5 was 7.".to_string());
        assert_eq!(
            failure.to_string(),
            "Equality assertion error at line 42. Expected 5 was 7."
        );
    }

    #[test]
    fn invalid_state_names_operation_and_state() {
        let err = HarnessError::InvalidState {
            operation: "add a test",
            state: SessionState::Completed,
        };
        assert_eq!(
            err.to_string(),
            "cannot add a test while the session is completed"
        );
    }

    #[test]
    fn error_kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorKind::EqualityAssertion).unwrap();
        assert_eq!(json, "\"equality_assertion\"");
    }
}
