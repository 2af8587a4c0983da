//! Release run state.

use crate::events::{LogLine, PipelineEvent};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

/// The five ordered release steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseStep {
    /// Rewrite the manifest version
    UpdateVersion,
    /// Clean, fetch dependencies, run code generation
    PrepareBuild,
    /// Build release APKs and collect them
    BuildArtifacts,
    /// Commit, tag and push
    PublishSource,
    /// Create the GitHub release and upload assets
    CreateRelease,
}

impl ReleaseStep {
    /// All steps in execution order
    pub const ALL: [ReleaseStep; 5] = [
        ReleaseStep::UpdateVersion,
        ReleaseStep::PrepareBuild,
        ReleaseStep::BuildArtifacts,
        ReleaseStep::PublishSource,
        ReleaseStep::CreateRelease,
    ];

    /// 1-based position in the pipeline
    pub fn number(self) -> usize {
        self as usize + 1
    }

    /// Human-readable step name
    pub fn title(self) -> &'static str {
        match self {
            ReleaseStep::UpdateVersion => "Update version",
            ReleaseStep::PrepareBuild => "Prepare build",
            ReleaseStep::BuildArtifacts => "Build APK",
            ReleaseStep::PublishSource => "Commit, tag and push",
            ReleaseStep::CreateRelease => "Create GitHub release",
        }
    }
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.number(), Self::ALL.len(), self.title())
    }
}

/// Overall status of a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// Not started
    #[default]
    Pending,
    /// A step is executing
    Running,
    /// All steps completed
    Succeeded {
        /// Release page, when the API returned one
        release_url: Option<String>,
    },
    /// A step failed; later steps did not run
    Failed {
        /// Step that failed
        step: ReleaseStep,
        /// Error message
        message: String,
    },
}

impl RunStatus {
    /// Whether the run has ended
    pub fn is_finished(&self) -> bool {
        matches!(self, RunStatus::Succeeded { .. } | RunStatus::Failed { .. })
    }
}

/// Transient state of one pipeline execution.
///
/// Built by folding [`PipelineEvent`]s, so the worker and a front end can
/// each keep an identical copy from the same event stream.
#[derive(Debug, Clone, Default)]
pub struct ReleaseRun {
    /// Step currently executing (or last executed)
    pub current_step: Option<ReleaseStep>,
    /// Steps that completed
    pub completed: Vec<ReleaseStep>,
    /// Overall status
    pub status: RunStatus,
    /// Log lines in emission order
    pub log: Vec<LogLine>,
    /// Artifacts collected by the build step
    pub artifacts: Vec<PathBuf>,
    /// When the first step started
    pub started_at: Option<DateTime<Local>>,
    /// When the run ended
    pub finished_at: Option<DateTime<Local>>,
}

impl ReleaseRun {
    /// Fresh run
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event
    pub fn apply(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Log(line) => self.log.push(line.clone()),
            PipelineEvent::StepStarted(step) => {
                if self.started_at.is_none() {
                    self.started_at = Some(Local::now());
                }
                self.current_step = Some(*step);
                self.status = RunStatus::Running;
            }
            PipelineEvent::StepCompleted(step) => {
                if !self.completed.contains(step) {
                    self.completed.push(*step);
                }
            }
            PipelineEvent::ArtifactsCollected(paths) => self.artifacts = paths.clone(),
            PipelineEvent::Finished(status) => {
                self.status = status.clone();
                self.finished_at = Some(Local::now());
            }
            PipelineEvent::CheckFinished { .. } => {}
        }
    }

    /// Whether the run completed every step
    pub fn succeeded(&self) -> bool {
        matches!(self.status, RunStatus::Succeeded { .. })
    }

    /// Step that failed, if any
    pub fn failed_step(&self) -> Option<ReleaseStep> {
        match &self.status {
            RunStatus::Failed { step, .. } => Some(*step),
            _ => None,
        }
    }
}
