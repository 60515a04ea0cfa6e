//! Colored terminal reporter.
//!
//! Output shape:
//!
//! ```text
//! ==================== Beginning Test Session ====================
//!
//! Collected 3 tests.
//! Running test session:
//!
//! [ 33%] - math.rs::adds PASSED
//! [ 66%] - math.rs::subtracts FAILED
//! [100%] - math.rs::divides PASSED
//!
//! ===================== Test Failures Summary =====================
//! ...
//! ```

use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{progress_percentage, Reporter};
use crate::registry::TestRecord;
use crate::session::SessionSummary;

pub struct ConsoleReporter<W: WriteColor> {
    out: W,
    quiet: bool,
    live_status: bool,
}

impl ConsoleReporter<StandardStream> {
    /// Reporter on stdout. Unless colors are off the status of a running test
    /// is shown in place and overwritten when it finishes.
    pub fn stdout(choice: ColorChoice, quiet: bool) -> Self {
        let mut reporter = Self::new(StandardStream::stdout(choice), quiet);
        reporter.live_status = choice != ColorChoice::Never;
        reporter
    }
}

impl<W: WriteColor> ConsoleReporter<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Self {
            out,
            quiet,
            live_status: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_banner(&mut self, total: usize) -> io::Result<()> {
        writeln!(self.out)?;
        write!(self.out, "{}", "=".repeat(20))?;
        self.out.set_color(ColorSpec::new().set_bold(true))?;
        write!(self.out, " Beginning Test Session ")?;
        self.out.reset()?;
        writeln!(self.out, "{}", "=".repeat(20))?;
        writeln!(self.out)?;
        writeln!(self.out, "Collected {} tests.", total)?;
        writeln!(self.out, "Running test session:")?;
        writeln!(self.out)
    }

    fn write_progress(&mut self, index: usize, total: usize, color: Color) -> io::Result<()> {
        self.out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(self.out, "[{:>3}%]", progress_percentage(index, total))?;
        self.out.reset()
    }

    fn write_running(&mut self, index: usize, total: usize, test: &TestRecord) -> io::Result<()> {
        self.write_progress(index, total, Color::Magenta)?;
        write!(self.out, " - {} ", test.qualified_name())?;
        self.out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(self.out, "RUNNING")?;
        self.out.reset()?;
        self.out.flush()
    }

    fn write_finished(
        &mut self,
        index: usize,
        total: usize,
        test: &TestRecord,
        failures: usize,
    ) -> io::Result<()> {
        if self.live_status {
            // Overwrite the RUNNING line; trailing spaces cover its longer tail.
            write!(self.out, "\r")?;
        }
        let progress_color = match (failures, test.failed) {
            (0, _) => Color::Green,
            (_, false) => Color::Yellow,
            (_, true) => Color::Red,
        };
        self.write_progress(index, total, progress_color)?;
        write!(self.out, " - {} ", test.qualified_name())?;
        if test.failed {
            self.out
                .set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(self.out, "FAILED")?;
        } else {
            self.out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(self.out, "PASSED")?;
        }
        self.out.reset()?;
        if self.live_status {
            write!(self.out, " ")?;
        }
        writeln!(self.out)
    }

    fn write_failure_summary(&mut self, summary: &SessionSummary) -> io::Result<()> {
        let red = ColorSpec::new().set_fg(Some(Color::Red)).clone();

        self.out.set_color(&red)?;
        writeln!(
            self.out,
            "{} Test Failures Summary {}",
            "=".repeat(21),
            "=".repeat(21)
        )?;
        self.out.reset()?;
        writeln!(self.out)?;

        for test in summary.failures() {
            self.out.set_color(&red)?;
            write!(self.out, "FAILED ")?;
            self.out.reset()?;
            writeln!(self.out, "{}", test.qualified_name())?;
            if let Some(error) = &test.error {
                self.out.set_color(&red)?;
                writeln!(
                    self.out,
                    "\t{} at line {}. {}",
                    error.kind, error.line, error.detail
                )?;
                self.out.reset()?;
            }
        }

        writeln!(self.out)?;
        self.out.set_color(&red)?;
        write!(self.out, "{} ", "=".repeat(16))?;
        self.out.set_color(red.clone().set_bold(true))?;
        write!(self.out, "{} Tests Failed, ", summary.failed)?;
        self.out
            .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        write!(self.out, "{} Tests Passed ", summary.passed)?;
        self.out.set_color(&red)?;
        writeln!(self.out, "{}", "=".repeat(16))?;
        self.out.reset()?;
        writeln!(self.out)
    }

    fn write_success_summary(&mut self, summary: &SessionSummary) -> io::Result<()> {
        let green = ColorSpec::new().set_fg(Some(Color::Green)).clone();
        self.out.set_color(&green)?;
        write!(self.out, "{} ", "=".repeat(24))?;
        self.out.set_color(green.clone().set_bold(true))?;
        write!(self.out, "{} Tests Passed", summary.total)?;
        self.out.set_color(&green)?;
        writeln!(self.out, " {}", "=".repeat(24))?;
        self.out.reset()?;
        writeln!(self.out)
    }
}

impl<W: WriteColor> Reporter for ConsoleReporter<W> {
    fn on_session_start(&mut self, total: usize) {
        let _ = self.write_banner(total);
    }

    fn on_test_start(&mut self, index: usize, total: usize, test: &TestRecord) {
        if self.quiet || !self.live_status {
            return;
        }
        let _ = self.write_running(index, total, test);
    }

    fn on_test_finished(&mut self, index: usize, total: usize, test: &TestRecord, failures: usize) {
        if self.quiet {
            return;
        }
        let _ = self.write_finished(index, total, test, failures);
    }

    fn on_session_finished(&mut self, summary: &SessionSummary) {
        let _ = writeln!(self.out);
        let _ = if summary.has_failures() {
            self.write_failure_summary(summary)
        } else {
            self.write_success_summary(summary)
        };
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use termcolor::Buffer;

    use super::*;
    use crate::errors::ErrorKind;
    use crate::registry::RecordedError;

    fn record(name: &str, failed: bool) -> TestRecord {
        TestRecord {
            file: "math.rs".into(),
            name: name.into(),
            line: 3,
            failed,
            error: failed.then(|| RecordedError {
                kind: ErrorKind::EqualityAssertion,
                line: 14,
                detail: "Expected 5 was 7.".into(),
            }),
        }
    }

    fn render(records: Vec<TestRecord>) -> String {
        let mut reporter = ConsoleReporter::new(Buffer::no_color(), false);
        let total = records.len();
        reporter.on_session_start(total);
        let mut failures = 0;
        for (i, r) in records.iter().enumerate() {
            reporter.on_test_start(i, total, r);
            failures += usize::from(r.failed);
            reporter.on_test_finished(i, total, r, failures);
        }
        reporter.on_session_finished(&SessionSummary::new(records));
        String::from_utf8(reporter.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn renders_banner_and_status_lines() {
        let out = render(vec![record("adds", false), record("subtracts", true)]);
        assert!(out.contains("Beginning Test Session"));
        assert!(out.contains("Collected 2 tests."));
        assert!(out.contains("[ 50%] - math.rs::adds PASSED"));
        assert!(out.contains("[100%] - math.rs::subtracts FAILED"));
        assert!(!out.contains("RUNNING"));
    }

    #[test]
    fn failure_summary_lists_only_failures() {
        let out = render(vec![record("adds", false), record("subtracts", true)]);
        let summary = out.split("Test Failures Summary").nth(1).unwrap();
        assert!(summary.contains("FAILED math.rs::subtracts"));
        assert!(summary.contains("\tEquality assertion error at line 14. Expected 5 was 7."));
        assert!(!summary.contains("math.rs::adds"));
        assert!(summary.contains("1 Tests Failed, 1 Tests Passed"));
    }

    #[test]
    fn success_summary_counts_tests() {
        let out = render(vec![record("adds", false)]);
        assert!(out.contains("1 Tests Passed"));
        assert!(!out.contains("Test Failures Summary"));
    }

    #[test]
    fn live_status_follows_the_color_choice() {
        assert!(ConsoleReporter::stdout(ColorChoice::Always, false).live_status);
        assert!(!ConsoleReporter::stdout(ColorChoice::Never, false).live_status);
    }

    #[test]
    fn quiet_mode_skips_status_lines() {
        let mut reporter = ConsoleReporter::new(Buffer::no_color(), true);
        let r = record("adds", false);
        reporter.on_session_start(1);
        reporter.on_test_finished(0, 1, &r, 0);
        reporter.on_session_finished(&SessionSummary::new(vec![r]));
        let out = String::from_utf8(reporter.into_inner().into_inner()).unwrap();
        assert!(!out.contains("PASSED"));
        assert!(out.contains("1 Tests Passed"));
    }
}
