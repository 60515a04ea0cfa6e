//! Harness configuration shared by the entry point and the reporters.

use termcolor::ColorChoice;

use crate::cli::args::{ColorMode, HarnessArgs, OutputFormat};
use crate::registry::DEFAULT_CAPACITY;

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "SMITE_LOG";

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub color: ColorMode,
    pub use_colors: bool,
    pub format: OutputFormat,
    pub quiet: bool,
    pub initial_capacity: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            use_colors: atty::is(atty::Stream::Stdout),
            format: OutputFormat::Pretty,
            quiet: false,
            initial_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl HarnessConfig {
    pub fn from_args(args: &HarnessArgs) -> Self {
        let defaults = Self::default();
        let use_colors = match args.color {
            ColorMode::Auto => defaults.use_colors,
            ColorMode::Always => true,
            ColorMode::Never => false,
        };
        Self {
            color: args.color,
            use_colors,
            format: args.format,
            quiet: args.quiet,
            initial_capacity: args.capacity.unwrap_or(defaults.initial_capacity),
        }
    }

    /// `always` forces escape codes even when stdout is not a terminal.
    pub fn color_choice(&self) -> ColorChoice {
        match self.color {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto if self.use_colors => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
        }
    }
}
