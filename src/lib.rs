//! Smite, a small unit-test harness.
//!
//! Tests are registered into a [`Session`], run sequentially in registration
//! order, and isolated from each other: a failing assertion ends only the
//! test it occurs in. The run yields a [`SessionSummary`] whose
//! [`exit_code`](SessionSummary::exit_code) is `0` when every test passed and
//! `1` otherwise.

#[macro_use]
mod macros;

pub mod assertions;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod report;
pub mod session;

pub use crate::assertions::{Expect, TestResult, REAL_TOLERANCE};
pub use crate::errors::{AssertionFailure, ErrorKind, HarnessError};
pub use crate::registry::{RecordedError, Registry, TestDescriptor, TestRecord, DEFAULT_CAPACITY};
pub use crate::report::{ConsoleReporter, JsonReporter, Reporter, SilentReporter};
pub use crate::session::{Runner, Session, SessionState, SessionSummary};
