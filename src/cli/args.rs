//! Command-line arguments accepted by every Smite test binary.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Args, Parser, ValueEnum};

/// Top-level command of a test binary that takes no options of its own.
#[derive(Debug, Clone, Parser)]
#[command(name = "smite", version, about = "Runs the registered unit tests.")]
pub struct HarnessCommand {
    #[command(flatten)]
    pub harness: HarnessArgs,
}

/// Options shared by every test binary; flatten into a custom parser to add
/// more.
#[derive(Debug, Clone, Args)]
pub struct HarnessArgs {
    /// When to colorize the output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// How to render results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Only print the session summary.
    #[arg(short, long)]
    pub quiet: bool,

    /// Initial registry capacity (and growth increment).
    #[arg(long)]
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored status lines and a failure summary.
    Pretty,
    /// A single JSON document on stdout.
    Json,
}
