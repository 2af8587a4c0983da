//! Command execution functions.
//!
//! Each subcommand returns its exit code; errors are printed here together
//! with their recovery suggestions and turned into exit code 1.

mod check;
mod config;
mod helpers;
mod release;

use crate::cli::{Args, Command, OutputManager};
use crate::error::Result;

use check::execute_check;
use config::execute_config;
pub use release::confirmation_summary;
use release::execute_release;

/// Execute the main command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    let output = OutputManager::new(args.quiet);

    if let Err(validation_error) = args.validate() {
        output.error(&format!("Invalid arguments: {}", validation_error));
        return Ok(1);
    }

    let command = args.command();
    let result = match &command {
        Command::Gui => execute_gui(&args),
        Command::Release { yes, overrides } => execute_release(&args, *yes, overrides, &output).await,
        Command::Check { project } => execute_check(&args, project.as_deref(), &output).await,
        Command::Config { action } => execute_config(&args, action, &output),
    };

    match result {
        Ok(exit_code) => Ok(exit_code),
        Err(e) => {
            output.error(&format!("Command '{}' failed: {}", command.name(), e));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&format!("• {}", suggestion));
                }
            }

            Ok(1)
        }
    }
}

#[cfg(feature = "gui")]
fn execute_gui(args: &Args) -> Result<i32> {
    crate::gui::launch(args.config.clone(), args.api_url.clone())?;
    Ok(0)
}

#[cfg(not(feature = "gui"))]
fn execute_gui(_args: &Args) -> Result<i32> {
    Err(crate::error::CliError::InvalidArguments {
        reason: "this build has no window; rebuild with the 'gui' feature or use 'release'".to_string(),
    }
    .into())
}
