//! Reporting seam between the runner and whatever renders its results.
//!
//! The runner only emits events; rendering is entirely up to the
//! [`Reporter`] implementation. Every hook has an empty default so a reporter
//! only implements what it needs.

use crate::registry::TestRecord;
use crate::session::SessionSummary;

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

pub trait Reporter {
    /// Called once, after collection, with the number of registered tests.
    fn on_session_start(&mut self, _total: usize) {}

    /// Called right before a test body is invoked.
    fn on_test_start(&mut self, _index: usize, _total: usize, _test: &TestRecord) {}

    /// Called after a test finished or was aborted; `failures` is the running
    /// failure count including this test.
    fn on_test_finished(
        &mut self,
        _index: usize,
        _total: usize,
        _test: &TestRecord,
        _failures: usize,
    ) {
    }

    fn on_session_finished(&mut self, _summary: &SessionSummary) {}
}

/// Reporter that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Integer completion percentage shown next to each test, `floor((index + 1) / total * 100)`.
pub fn progress_percentage(index: usize, total: usize) -> usize {
    if total == 0 {
        return 100;
    }
    (index + 1) * 100 / total
}
