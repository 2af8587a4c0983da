//! The individual release steps.

use super::ReleasePipeline;
use crate::artifacts::{collect_into, locate_built_apks};
use crate::config::ReleaseRequest;
use crate::error::Result;
use crate::events::{Emitter, PipelineEvent};
use crate::git::GitPublisher;
use crate::github::{GitHubReleaseConfig, GitHubReleaseManager};
use crate::process::{CommandRunner, CommandSpec, run_logged};
use crate::project::MANIFEST_FILE;
use crate::version::update_manifest_version;
use std::path::PathBuf;

/// Values a step hands to the steps after it
#[derive(Debug, Default)]
pub(super) struct StepOutputs {
    /// APKs copied into the dist directory
    pub artifacts: Vec<PathBuf>,
    /// Release page returned by the API
    pub release_url: Option<String>,
}

impl<R: CommandRunner> ReleasePipeline<R> {
    pub(super) fn update_version(&self, request: &ReleaseRequest, emitter: &Emitter) -> Result<()> {
        if request.version.has_prerelease_suffix() && !request.prerelease {
            emitter.warn(format!(
                "{} looks like a pre-release but the pre-release flag is off",
                request.version.tag()
            ));
        }

        let update = update_manifest_version(&request.project.manifest(), &request.version)?;
        emitter.success(format!(
            "Updated {} version: {} -> {}",
            MANIFEST_FILE, update.previous, update.written
        ));
        Ok(())
    }

    pub(super) async fn prepare_build(&self, request: &ReleaseRequest, emitter: &Emitter) -> Result<()> {
        let root = request.project.root();

        run_logged(&self.runner, &CommandSpec::new("flutter", ["clean"], root), emitter).await?;
        run_logged(&self.runner, &CommandSpec::new("flutter", ["pub", "get"], root), emitter).await?;

        if request.project.has_codegen() {
            emitter.info("build.yaml found, running code generation");
            let codegen = CommandSpec::new(
                "flutter",
                ["packages", "pub", "run", "build_runner", "build", "--delete-conflicting-outputs"],
                root,
            );
            if let Err(e) = run_logged(&self.runner, &codegen, emitter).await {
                emitter.warn(format!("Code generation failed, continuing build: {}", e));
            }
        }

        Ok(())
    }

    pub(super) async fn build_artifacts(
        &self,
        request: &ReleaseRequest,
        emitter: &Emitter,
        outputs: &mut StepOutputs,
    ) -> Result<()> {
        let project = &request.project;
        run_logged(
            &self.runner,
            &CommandSpec::new("flutter", ["build", "apk", "--release"], project.root()),
            emitter,
        )
        .await?;

        let built = locate_built_apks(project)?;
        emitter.success(format!("Found {} release APK(s)", built.len()));
        for apk in &built {
            emitter.info(format!("  {} ({:.1} MB)", apk.file_name(), apk.size_mb()));
        }

        let dist = project.dist_dir();
        let collected = collect_into(&built, &dist)?;
        for apk in &collected {
            emitter.info(format!("Copied {} to {}", apk.file_name(), dist.display()));
        }

        outputs.artifacts = collected.into_iter().map(|apk| apk.path).collect();
        emitter.emit(PipelineEvent::ArtifactsCollected(outputs.artifacts.clone()));
        Ok(())
    }

    pub(super) async fn publish_source(&self, request: &ReleaseRequest, emitter: &Emitter) -> Result<()> {
        let publisher = GitPublisher::new(
            &self.runner,
            emitter,
            request.project.root(),
            self.git_config.clone(),
        );
        let published = publisher.publish(MANIFEST_FILE, &request.version.tag()).await?;

        emitter.success(format!(
            "Pushed {} and tag {}",
            published.pushed_branch, published.tag
        ));
        Ok(())
    }

    pub(super) async fn create_release(
        &self,
        request: &ReleaseRequest,
        emitter: &Emitter,
        outputs: &mut StepOutputs,
    ) -> Result<()> {
        let publisher = GitPublisher::new(
            &self.runner,
            emitter,
            request.project.root(),
            self.git_config.clone(),
        );
        let slug = publisher.remote_slug().await?;
        emitter.info(format!("Repository: {}", slug));

        let manager = GitHubReleaseManager::new(GitHubReleaseConfig {
            owner: slug.owner.clone(),
            repo: slug.repo.clone(),
            draft: request.draft,
            prerelease: request.prerelease,
            notes: request.notes.clone(),
            token: request.token.clone(),
            api_url: self.api_url.clone(),
        })?;

        let tag = request.version.tag();
        let release = manager.create_release(&tag).await?;
        emitter.success(format!("Created release {} (id {})", tag, release.release_id));

        let uploaded = manager
            .upload_artifacts(&release, &outputs.artifacts, emitter)
            .await?;
        emitter.success(format!("Uploaded {} asset(s)", uploaded.len()));

        outputs.release_url = Some(release.html_url);
        Ok(())
    }
}
