//! Environment check command.

use super::helpers::load_config;
use crate::cli::{Args, OutputManager};
use crate::environment::check_environment;
use crate::error::Result;
use crate::events::{self, Emitter, PipelineEvent};
use crate::process::SystemRunner;
use std::path::{Path, PathBuf};

/// Execute check command
pub(super) async fn execute_check(args: &Args, project: Option<&Path>, output: &OutputManager) -> Result<i32> {
    let project_dir = match project {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from(load_config(&args.config)?.project_path),
    };

    let (tx, mut rx) = events::channel();
    let emitter = Emitter::new(tx);

    let check = async move {
        let report = check_environment(&SystemRunner, &emitter, &project_dir).await;
        emitter.emit(PipelineEvent::CheckFinished {
            ok: report.is_ready(),
        });
        report
    };
    let printer = async {
        while let Some(event) = rx.recv().await {
            let _ = output.event(&event);
        }
    };
    let (report, ()) = tokio::join!(check, printer);

    Ok(if report.is_ready() { 0 } else { 1 })
}
