//! # Smite: Session
//!
//! A [`Session`] is the execution context of one complete run: the registry,
//! the counters and the lifecycle state. It is an ordinary value owned by the
//! caller, so independent sessions can coexist.
//!
//! Lifecycle: `Collecting → Running → Completed`. Tests may only be added while
//! collecting, and a session runs at most once.

use serde::Serialize;
use tracing::debug;

use crate::assertions::TestResult;
use crate::errors::HarnessError;
use crate::registry::{Registry, TestBody, TestDescriptor, TestRecord, DEFAULT_CAPACITY};
use crate::report::Reporter;

pub mod runner;

pub use runner::Runner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Collecting,
    Running,
    Completed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Collecting => "collecting",
            SessionState::Running => "running",
            SessionState::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

pub struct Session {
    pub(crate) registry: Registry,
    pub(crate) tests: usize,
    pub(crate) failures: usize,
    pub(crate) state: SessionState,
}

impl Session {
    /// Starts a session with the default registry capacity.
    pub fn begin() -> Result<Self, HarnessError> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, HarnessError> {
        let registry = Registry::with_capacity(capacity)?;
        debug!(capacity, "began test session");
        Ok(Self {
            registry,
            tests: 0,
            failures: 0,
            state: SessionState::Collecting,
        })
    }

    /// Registers a test body with its source-location metadata.
    pub fn add_test<F>(
        &mut self,
        body: F,
        name: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Result<(), HarnessError>
    where
        F: FnMut() -> TestResult + 'static,
    {
        self.add_boxed(Box::new(body), name, file, line)
    }

    pub fn add_boxed(
        &mut self,
        body: TestBody,
        name: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Result<(), HarnessError> {
        self.expect_state(SessionState::Collecting, "add a test")?;
        self.registry.add(TestDescriptor::new(body, name, file, line))?;
        self.tests += 1;
        Ok(())
    }

    /// Runs every registered test in registration order.
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> Result<SessionSummary, HarnessError> {
        Runner::new(self).run(reporter)
    }

    /// Runs the session and maps the outcome onto a process exit code.
    /// Lifecycle misuse counts as a failed run.
    pub fn run_to_exit_code(&mut self, reporter: &mut dyn Reporter) -> i32 {
        match self.run(reporter) {
            Ok(summary) => summary.exit_code(),
            Err(e) => {
                tracing::error!(error = %e, "test session could not run");
                1
            }
        }
    }

    /// Number of registered tests; unaffected by the registry release at the
    /// end of a run.
    pub fn test_count(&self) -> usize {
        self.tests
    }

    pub fn failure_count(&self) -> usize {
        self.failures
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    fn expect_state(
        &self,
        expected: SessionState,
        operation: &'static str,
    ) -> Result<(), HarnessError> {
        if self.state == expected {
            return Ok(());
        }
        Err(HarnessError::InvalidState {
            operation,
            state: self.state,
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tests", &self.tests)
            .field("failures", &self.failures)
            .field("state", &self.state)
            .finish()
    }
}

/// Aggregate result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub total: usize,
    pub failed: usize,
    pub passed: usize,
    pub tests: Vec<TestRecord>,
}

impl SessionSummary {
    pub(crate) fn new(tests: Vec<TestRecord>) -> Self {
        let failed = tests.iter().filter(|t| t.failed).count();
        Self {
            total: tests.len(),
            failed,
            passed: tests.len() - failed,
            tests,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// `0` when every test passed, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestRecord> {
        self.tests.iter().filter(|t| t.failed)
    }
}
