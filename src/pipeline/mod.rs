//! Release pipeline.
//!
//! Runs the five release steps strictly in order against one project. The
//! first failing step ends the run; later steps never start. Progress goes
//! out through an [`Emitter`], so the same pipeline drives both the window
//! and the terminal front end.

mod phases;
mod run;

pub use run::{ReleaseRun, ReleaseStep, RunStatus};

use crate::config::ReleaseRequest;
use crate::error::ReleaseError;
use crate::events::{self, Emitter, PipelineEvent};
use crate::git::GitConfig;
use crate::github::DEFAULT_API_URL;
use crate::process::CommandRunner;

/// Sequential release orchestrator
#[derive(Debug)]
pub struct ReleasePipeline<R> {
    runner: R,
    emitter: Emitter,
    api_url: String,
    git_config: GitConfig,
}

impl<R: CommandRunner> ReleasePipeline<R> {
    /// Create a pipeline that runs commands through `runner`
    pub fn new(runner: R, emitter: Emitter) -> Self {
        Self {
            runner,
            emitter,
            api_url: DEFAULT_API_URL.to_string(),
            git_config: GitConfig::default(),
        }
    }

    /// Use a different GitHub REST API base
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override branch names, remote and commit message
    pub fn with_git_config(mut self, git_config: GitConfig) -> Self {
        self.git_config = git_config;
        self
    }

    /// Command runner in use
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Execute every step for `request`.
    ///
    /// Never returns an error: a failure is reported through the returned
    /// run's status, after being logged and emitted as [`PipelineEvent::Finished`].
    pub async fn run(&self, request: &ReleaseRequest) -> ReleaseRun {
        let (record_tx, mut record_rx) = events::channel();
        let emitter = self.emitter.tee(record_tx);

        emitter.info(format!(
            "Starting release {} of {}",
            request.version.tag(),
            request.project.root().display()
        ));

        let status = match self.execute(request, &emitter).await {
            Ok(release_url) => {
                emitter.success("Release complete!");
                if let Some(url) = &release_url {
                    emitter.info(format!("Release page: {}", url));
                }
                RunStatus::Succeeded { release_url }
            }
            Err((step, e)) => {
                emitter.error(format!("Release failed at {}: {}", step, e));
                for suggestion in e.recovery_suggestions() {
                    emitter.info(format!("  {}", suggestion));
                }
                RunStatus::Failed {
                    step,
                    message: e.to_string(),
                }
            }
        };
        emitter.emit(PipelineEvent::Finished(status));
        drop(emitter);

        let mut run = ReleaseRun::new();
        while let Ok(event) = record_rx.try_recv() {
            run.apply(&event);
        }
        run
    }

    /// Run the steps in order, returning the release URL or the failing step
    async fn execute(
        &self,
        request: &ReleaseRequest,
        emitter: &Emitter,
    ) -> Result<Option<String>, (ReleaseStep, ReleaseError)> {
        let mut outputs = phases::StepOutputs::default();

        for step in ReleaseStep::ALL {
            emitter.emit(PipelineEvent::StepStarted(step));
            emitter.info(step.to_string());

            let result = match step {
                ReleaseStep::UpdateVersion => self.update_version(request, emitter),
                ReleaseStep::PrepareBuild => self.prepare_build(request, emitter).await,
                ReleaseStep::BuildArtifacts => {
                    self.build_artifacts(request, emitter, &mut outputs).await
                }
                ReleaseStep::PublishSource => self.publish_source(request, emitter).await,
                ReleaseStep::CreateRelease => {
                    self.create_release(request, emitter, &mut outputs).await
                }
            };
            result.map_err(|e| (step, e))?;

            emitter.emit(PipelineEvent::StepCompleted(step));
        }

        Ok(outputs.release_url)
    }
}
