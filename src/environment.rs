//! Development environment check.

use crate::events::Emitter;
use crate::process::{CommandRunner, CommandSpec, run_logged};
use crate::project::{FlutterProject, MANIFEST_FILE};
use std::path::Path;

/// What the environment check found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentReport {
    /// `flutter --version` succeeded
    pub flutter: bool,
    /// `git --version` succeeded
    pub git: bool,
    /// The project directory has a manifest
    pub project: bool,
    /// Project name read from the manifest
    pub project_name: Option<String>,
}

impl EnvironmentReport {
    /// Whether everything needed for a release is present
    pub fn is_ready(&self) -> bool {
        self.flutter && self.git && self.project
    }
}

/// Check the toolchain and the project, stopping at the first missing piece
pub async fn check_environment<R: CommandRunner>(
    runner: &R,
    emitter: &Emitter,
    project_dir: &Path,
) -> EnvironmentReport {
    let mut report = EnvironmentReport::default();
    emitter.info("Checking development environment...");

    report.flutter = run_logged(runner, &CommandSpec::new("flutter", ["--version"], project_dir), emitter)
        .await
        .is_ok();
    if !report.flutter {
        emitter.error("Flutter: not installed or not on PATH");
        return report;
    }
    emitter.success("Flutter: installed");

    report.git = run_logged(runner, &CommandSpec::new("git", ["--version"], project_dir), emitter)
        .await
        .is_ok();
    if !report.git {
        emitter.error("Git: not installed or not on PATH");
        return report;
    }
    emitter.success("Git: installed");

    match FlutterProject::open(project_dir) {
        Ok(project) => {
            report.project = true;
            emitter.success("Flutter project: found");
            report.project_name = project.name();
            match &report.project_name {
                Some(name) => emitter.info(format!("Project name: {}", name)),
                None => emitter.warn("Could not read project name from manifest"),
            }
        }
        Err(_) => {
            emitter.error(format!(
                "Flutter project: no {} in {}",
                MANIFEST_FILE,
                project_dir.display()
            ));
            return report;
        }
    }

    emitter.success("Environment check complete");
    report
}
