use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use tracing::{debug, info, warn};

use crate::errors::{ErrorKind, HarnessError};
use crate::registry::{RecordedError, TestDescriptor};
use crate::report::Reporter;
use crate::session::{Session, SessionState, SessionSummary};

/// Drives a [`Session`]: runs each test behind a failure-isolation boundary,
/// tallies the outcomes and finalizes the session.
pub struct Runner<'s> {
    session: &'s mut Session,
}

impl<'s> Runner<'s> {
    pub fn new(session: &'s mut Session) -> Self {
        Self { session }
    }

    pub fn run(self, reporter: &mut dyn Reporter) -> Result<SessionSummary, HarnessError> {
        let session = self.session;
        session.expect_state(SessionState::Collecting, "run the session")?;
        session.state = SessionState::Running;

        let total = session.registry.len();
        reporter.on_session_start(total);

        for index in 0..total {
            let Some(current) = session.registry.get_mut(index) else {
                break;
            };
            current.failed = false;
            current.error = None;
            reporter.on_test_start(index, total, &current.record());

            debug!(test = %current.name, file = %current.file, "running test");
            run_isolated(current);

            if current.failed {
                session.failures += 1;
            }
            reporter.on_test_finished(index, total, &current.record(), session.failures);
        }

        Ok(finalize(session, reporter))
    }
}

/// Invokes the body of `current` and records any failure onto it. Neither an
/// assertion failure nor a panic escapes this function.
fn run_isolated(current: &mut TestDescriptor) {
    let body = &mut current.body;
    let outcome = with_silenced_panics(|| panic::catch_unwind(AssertUnwindSafe(|| body())));

    let error = match outcome {
        Ok(Ok(())) => return,
        Ok(Err(failure)) => RecordedError {
            kind: failure.kind,
            line: failure.line,
            detail: failure.detail,
        },
        Err(payload) => {
            let detail = panic_message(payload.as_ref());
            warn!(test = %current.name, %detail, "test body panicked");
            RecordedError {
                kind: ErrorKind::Panic,
                line: current.line,
                detail,
            }
        }
    };
    current.failed = true;
    current.error = Some(error);
}

fn finalize(session: &mut Session, reporter: &mut dyn Reporter) -> SessionSummary {
    let summary = SessionSummary::new(session.registry.records());
    info!(
        total = summary.total,
        failed = summary.failed,
        "test session finished"
    );
    reporter.on_session_finished(&summary);

    session.registry.release();
    session.state = SessionState::Completed;
    debug!("released test registry");
    summary
}

static INSTALL_SILENCING_HOOK: Once = Once::new();

thread_local! {
    static INSIDE_ISOLATED_BODY: Cell<bool> = const { Cell::new(false) };
}

// The default hook would print every caught panic to stderr in the middle of
// the report. The wrapping hook is installed once per process and stays quiet
// only on a thread that is inside an isolated body; every other panic reaches
// the hook that was installed before it.
fn with_silenced_panics<R>(f: impl FnOnce() -> R) -> R {
    INSTALL_SILENCING_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !INSIDE_ISOLATED_BODY.with(Cell::get) {
                previous(info);
            }
        }));
    });

    INSIDE_ISOLATED_BODY.with(|inside| inside.set(true));
    let result = f();
    INSIDE_ISOLATED_BODY.with(|inside| inside.set(false));
    result
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("Test panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("Test panicked: {}", s)
    } else {
        "Test panicked.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::assertions::{assert_equal_int, TestResult};
    use crate::report::SilentReporter;

    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
    }

    impl Reporter for EventLog {
        fn on_session_start(&mut self, total: usize) {
            self.events.push(format!("start {total}"));
        }
        fn on_test_start(&mut self, index: usize, _total: usize, test: &crate::TestRecord) {
            self.events.push(format!("begin {index} {}", test.name));
        }
        fn on_test_finished(
            &mut self,
            index: usize,
            _total: usize,
            test: &crate::TestRecord,
            failures: usize,
        ) {
            self.events
                .push(format!("end {index} {} {} {failures}", test.name, test.failed));
        }
        fn on_session_finished(&mut self, summary: &SessionSummary) {
            self.events.push(format!("finish {}", summary.failed));
        }
    }

    #[test]
    fn empty_session_succeeds() {
        let mut session = Session::begin().unwrap();
        let summary = session.run(&mut SilentReporter).unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn failing_assertion_skips_the_rest_of_the_body() {
        let reached = Rc::new(RefCell::new(false));
        let flag = reached.clone();

        let mut session = Session::begin().unwrap();
        session
            .add_test(
                move || -> TestResult {
                    assert_equal_int(5, 7, 77)?;
                    *flag.borrow_mut() = true;
                    Ok(())
                },
                "stops_early",
                "runner.rs",
                70,
            )
            .unwrap();

        let summary = session.run(&mut SilentReporter).unwrap();
        assert!(!*reached.borrow());
        let error = summary.tests[0].error.as_ref().unwrap();
        assert_eq!(error.line, 77);
        assert_eq!(error.detail, "Expected 5 was 7.");
    }

    #[test]
    fn panic_is_isolated_and_recorded() {
        let mut session = Session::begin().unwrap();
        session
            .add_test(|| panic!("boom"), "panics", "runner.rs", 10)
            .unwrap();
        session.add_test(|| Ok(()), "after", "runner.rs", 20).unwrap();

        let summary = session.run(&mut SilentReporter).unwrap();
        assert_eq!(summary.failed, 1);
        let error = summary.tests[0].error.as_ref().unwrap();
        assert_eq!(error.kind, ErrorKind::Panic);
        assert_eq!(error.line, 10);
        assert_eq!(error.detail, "Test panicked: boom");
        assert!(!summary.tests[1].failed);
    }

    #[test]
    fn reporter_sees_events_in_order() {
        let mut session = Session::begin().unwrap();
        session.add_test(|| Ok(()), "first", "runner.rs", 1).unwrap();
        session
            .add_test(|| assert_equal_int(1, 2, 2), "second", "runner.rs", 2)
            .unwrap();

        let mut log = EventLog::default();
        session.run(&mut log).unwrap();
        assert_eq!(
            log.events,
            [
                "start 2",
                "begin 0 first",
                "end 0 first false 0",
                "begin 1 second",
                "end 1 second true 1",
                "finish 1",
            ]
        );
    }

    #[test]
    fn run_releases_the_registry() {
        let mut session = Session::begin().unwrap();
        session.add_test(|| Ok(()), "t", "runner.rs", 1).unwrap();
        session.run(&mut SilentReporter).unwrap();
        assert_eq!(session.registry().capacity(), 0);
        assert!(session.registry().is_empty());
    }
}
