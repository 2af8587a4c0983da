//! Headless release command.

use super::helpers::{load_config, prompt_confirmation};
use crate::cli::{Args, ConfigOverrides, OutputManager};
use crate::config::ReleaseRequest;
use crate::error::{CliError, Result};
use crate::events::{self, Emitter};
use crate::pipeline::{ReleasePipeline, ReleaseStep};
use crate::process::SystemRunner;

/// Summary shown before a release starts
pub fn confirmation_summary(request: &ReleaseRequest) -> Vec<String> {
    let mut lines = vec![format!(
        "Release {} of {}?",
        request.version.tag(),
        request.project.root().display()
    )];
    lines.push("This will:".to_string());
    for step in ReleaseStep::ALL {
        lines.push(format!("  {}. {}", step.number(), step.title()));
    }
    if request.prerelease {
        lines.push("The release is marked as a pre-release.".to_string());
    }
    if request.draft {
        lines.push("The release is created as a draft.".to_string());
    }
    lines
}

/// Execute release command
pub(super) async fn execute_release(
    args: &Args,
    yes: bool,
    overrides: &ConfigOverrides,
    output: &OutputManager,
) -> Result<i32> {
    let mut config = load_config(&args.config)?;
    overrides.apply(&mut config);
    let request = config.to_request()?;

    let summary = confirmation_summary(&request);
    if !yes {
        for line in &summary {
            let _ = output.println(line);
        }
        if !prompt_confirmation("Continue")? {
            return Err(CliError::Cancelled.into());
        }
    }

    let (tx, mut rx) = events::channel();
    let pipeline = ReleasePipeline::new(SystemRunner, Emitter::new(tx)).with_api_url(args.api_url.as_str());

    let run = async move {
        // Dropping the pipeline closes the channel and ends the printer.
        let run = pipeline.run(&request).await;
        drop(pipeline);
        run
    };
    let printer = async {
        while let Some(event) = rx.recv().await {
            let _ = output.event(&event);
        }
    };
    let (run, ()) = tokio::join!(run, printer);

    Ok(if run.succeeded() { 0 } else { 1 })
}
