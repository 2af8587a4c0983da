//! Background worker for the release window.
//!
//! One job at a time runs on its own OS thread with a current-thread tokio
//! runtime. Results travel back only as events; every event also asks the
//! window to repaint so it drains the channel promptly.

use crate::config::ReleaseRequest;
use crate::environment::check_environment;
use crate::events::{Emitter, EventSender, PipelineEvent};
use crate::pipeline::{ReleasePipeline, ReleaseStep, RunStatus};
use crate::process::SystemRunner;
use eframe::egui;
use std::path::PathBuf;
use std::thread::JoinHandle;

/// Work the window can hand off
#[derive(Debug)]
pub enum Job {
    /// Run the whole release pipeline
    Release {
        /// Validated form
        request: ReleaseRequest,
        /// GitHub REST API base
        api_url: String,
    },
    /// Check the toolchain and the project directory
    CheckEnvironment(PathBuf),
}

impl Job {
    /// Event that ends this job when it could not run at all
    fn aborted(&self, message: String) -> PipelineEvent {
        match self {
            Job::Release { .. } => PipelineEvent::Finished(RunStatus::Failed {
                step: ReleaseStep::ALL[0],
                message,
            }),
            Job::CheckEnvironment(_) => PipelineEvent::CheckFinished { ok: false },
        }
    }
}

/// Start `job` on a new worker thread
pub fn spawn(job: Job, sender: EventSender, ctx: egui::Context) -> std::io::Result<JoinHandle<()>> {
    let emitter = Emitter::new(sender).with_waker(move || ctx.request_repaint());

    std::thread::Builder::new()
        .name("release-worker".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let message = format!("Failed to start worker runtime: {}", e);
                    emitter.error(message.clone());
                    emitter.emit(job.aborted(message));
                    return;
                }
            };
            runtime.block_on(run_job(job, emitter));
        })
}

async fn run_job(job: Job, emitter: Emitter) {
    match job {
        Job::Release { request, api_url } => {
            let run = ReleasePipeline::new(SystemRunner, emitter)
                .with_api_url(api_url)
                .run(&request)
                .await;
            log::debug!("release worker finished: {:?}", run.status);
        }
        Job::CheckEnvironment(project_dir) => {
            let report = check_environment(&SystemRunner, &emitter, &project_dir).await;
            emitter.emit(PipelineEvent::CheckFinished {
                ok: report.is_ready(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReleaseConfig;

    #[test]
    fn test_aborted_release_fails_first_step() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pubspec.yaml"), "name: demo\nversion: 1.0.0\n").unwrap();
        let request = ReleaseConfig {
            github_token: "ghp_test".to_string(),
            version: "1.0.1".to_string(),
            project_path: dir.path().display().to_string(),
            ..Default::default()
        }
        .to_request()
        .unwrap();

        let job = Job::Release {
            request,
            api_url: "https://api.github.com".to_string(),
        };
        match job.aborted("no runtime".to_string()) {
            PipelineEvent::Finished(RunStatus::Failed { step, message }) => {
                assert_eq!(step, ReleaseStep::ALL[0]);
                assert_eq!(message, "no runtime");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_aborted_check_reports_not_ready() {
        let job = Job::CheckEnvironment(PathBuf::from("."));
        assert!(matches!(
            job.aborted("no runtime".to_string()),
            PipelineEvent::CheckFinished { ok: false }
        ));
    }
}
