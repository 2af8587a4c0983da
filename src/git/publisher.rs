//! Commit, tag and push a release.

use crate::error::{GitError, Result};
use crate::events::Emitter;
use crate::process::{CommandRunner, CommandSpec, run_logged};
use std::path::{Path, PathBuf};

use super::config::GitConfig;
use super::remote::{RepoSlug, parse_remote_url};

/// Result of publishing a release to the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Commit message used
    pub commit_message: String,
    /// Tag created
    pub tag: String,
    /// Branch that was pushed
    pub pushed_branch: String,
}

/// Runs the git side of a release in one repository
pub struct GitPublisher<'a, R> {
    runner: &'a R,
    emitter: &'a Emitter,
    repo_dir: PathBuf,
    config: GitConfig,
}

impl<'a, R: CommandRunner> GitPublisher<'a, R> {
    /// Create a publisher for the repository at `repo_dir`
    pub fn new(runner: &'a R, emitter: &'a Emitter, repo_dir: &Path, config: GitConfig) -> Self {
        Self {
            runner,
            emitter,
            repo_dir: repo_dir.to_path_buf(),
            config,
        }
    }

    fn git<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("git", args, &self.repo_dir)
    }

    /// Stage the manifest plus optional files, commit, tag and push.
    ///
    /// The branch push falls back once to the configured fallback branch.
    pub async fn publish(&self, manifest: &str, tag: &str) -> Result<PublishResult> {
        run_logged(self.runner, &self.git(["add", manifest]), self.emitter).await?;

        for path in &self.config.optional_paths {
            if run_logged(self.runner, &self.git(["add", path.as_str()]), self.emitter)
                .await
                .is_err()
            {
                self.emitter
                    .warn(format!("Could not stage {}, continuing", path));
            }
        }

        let commit_message = self.config.commit_message(tag);
        run_logged(
            self.runner,
            &self.git(["commit", "-m", commit_message.as_str()]),
            self.emitter,
        )
        .await?;

        run_logged(self.runner, &self.git(["tag", tag]), self.emitter).await?;

        let pushed_branch = self.push_branch().await?;

        run_logged(
            self.runner,
            &self.git(["push", self.config.default_remote.as_str(), tag]),
            self.emitter,
        )
        .await?;

        Ok(PublishResult {
            commit_message,
            tag: tag.to_string(),
            pushed_branch,
        })
    }

    async fn push_branch(&self) -> Result<String> {
        let remote = self.config.default_remote.as_str();
        let primary = self.config.primary_branch.as_str();
        let fallback = self.config.fallback_branch.as_str();

        if run_logged(self.runner, &self.git(["push", remote, primary]), self.emitter)
            .await
            .is_ok()
        {
            return Ok(primary.to_string());
        }

        self.emitter.warn(format!(
            "Push to {} failed, trying {}...",
            primary, fallback
        ));

        run_logged(self.runner, &self.git(["push", remote, fallback]), self.emitter)
            .await
            .map(|()| fallback.to_string())
            .map_err(|_| {
                GitError::PushFailed {
                    branches: vec![primary.to_string(), fallback.to_string()],
                }
                .into()
            })
    }

    /// Resolve the owner/repo of the configured remote
    pub async fn remote_slug(&self) -> Result<RepoSlug> {
        let remote = self.config.default_remote.as_str();
        let output = self
            .runner
            .capture(&self.git(["remote", "get-url", remote]))
            .await?;

        if !output.outcome.success() {
            return Err(GitError::RemoteUnavailable {
                remote: remote.to_string(),
            }
            .into());
        }

        parse_remote_url(output.stdout.trim())
    }
}
