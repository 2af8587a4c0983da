//! Command line interface for flutter_release.
//!
//! Parses arguments, then either opens the release window or runs the
//! pipeline headless with colored terminal output.

mod args;
pub mod commands;
mod output;

pub use args::{Args, Command, ConfigAction, ConfigOverrides};
pub use commands::{confirmation_summary, execute_command};
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
