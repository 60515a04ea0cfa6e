//! Machine-readable reporter: one JSON document per session.

use std::io::Write;

use tracing::error;

use super::Reporter;
use crate::session::SessionSummary;

pub struct JsonReporter<W: Write> {
    out: W,
}

impl JsonReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn on_session_finished(&mut self, summary: &SessionSummary) {
        let written = serde_json::to_writer_pretty(&mut self.out, summary)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out));
        if let Err(e) = written {
            error!(error = %e, "failed to write JSON report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::registry::{RecordedError, TestRecord};

    #[test]
    fn writes_summary_with_records() {
        let records = vec![
            TestRecord {
                file: "a.rs".into(),
                name: "ok".into(),
                line: 1,
                failed: false,
                error: None,
            },
            TestRecord {
                file: "a.rs".into(),
                name: "bad".into(),
                line: 2,
                failed: true,
                error: Some(RecordedError {
                    kind: ErrorKind::EqualityAssertion,
                    line: 9,
                    detail: "Expected 1 was 2.".into(),
                }),
            },
        ];
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.on_session_finished(&SessionSummary::new(records));

        let json: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["tests"][0].get("error"), None);
        assert_eq!(json["tests"][1]["error"]["kind"], "equality_assertion");
        assert_eq!(json["tests"][1]["error"]["detail"], "Expected 1 was 2.");
    }
}
