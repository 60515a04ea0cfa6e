//! Entry point for test binaries.
//!
//! A test binary only has to register its tests:
//!
//! ```no_run
//! use smite::{add_test, assert_equal_int, TestResult};
//!
//! fn arithmetic() -> TestResult {
//!     assert_equal_int!(4, 2 + 2);
//!     Ok(())
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     smite::cli::run(|session| {
//!         add_test!(session, arithmetic)?;
//!         Ok(())
//!     })
//! }
//! ```

use std::process::ExitCode;

use clap::Parser;
use miette::Report;

use crate::cli::args::{HarnessArgs, HarnessCommand, OutputFormat};
use crate::config::HarnessConfig;
use crate::errors::HarnessError;
use crate::logging;
use crate::report::{ConsoleReporter, JsonReporter, Reporter};
use crate::session::Session;

pub mod args;

/// Parses the process arguments, registers tests through `register`, runs the
/// session and returns the process exit code.
pub fn run<F>(register: F) -> ExitCode
where
    F: FnOnce(&mut Session) -> Result<(), HarnessError>,
{
    run_with_args(HarnessCommand::parse().harness, register)
}

pub fn run_with_args<F>(args: HarnessArgs, register: F) -> ExitCode
where
    F: FnOnce(&mut Session) -> Result<(), HarnessError>,
{
    logging::init();
    let config = HarnessConfig::from_args(&args);

    match run_session(&config, register) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{:?}", Report::new(e));
            ExitCode::FAILURE
        }
    }
}

fn run_session<F>(config: &HarnessConfig, register: F) -> Result<i32, HarnessError>
where
    F: FnOnce(&mut Session) -> Result<(), HarnessError>,
{
    let mut session = Session::with_capacity(config.initial_capacity)?;
    register(&mut session)?;

    let mut reporter: Box<dyn Reporter> = match config.format {
        OutputFormat::Pretty => Box::new(ConsoleReporter::stdout(
            config.color_choice(),
            config.quiet,
        )),
        OutputFormat::Json => Box::new(JsonReporter::stdout()),
    };
    let summary = session.run(reporter.as_mut())?;
    Ok(summary.exit_code())
}
