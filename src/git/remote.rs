//! Remote URL parsing.

use crate::error::{GitError, Result};
use std::fmt;

/// GitHub `owner/repo` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Parse owner/repo from a git remote URL
///
/// Supports Git URL formats:
/// - SSH SCP-like: git@github.com:owner/repo.git
/// - HTTPS/SSH protocol: https://github.com/owner/repo.git, ssh://git@host/owner/repo
///
/// The host is not checked, so GitHub Enterprise remotes work too.
pub fn parse_remote_url(url: &str) -> Result<RepoSlug> {
    let unsupported = || GitError::UnsupportedRemote {
        url: url.to_string(),
    };

    let trimmed = url.trim();
    let path = if let Some((_, rest)) = trimmed.split_once("://") {
        // Drop the authority part
        rest.split_once('/').map(|(_, path)| path).ok_or_else(unsupported)?
    } else if let Some((_, path)) = trimmed.split_once(':') {
        path
    } else {
        return Err(unsupported().into());
    };

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());

    match (segments.next(), segments.next()) {
        (Some(repo), Some(owner)) => Ok(RepoSlug {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }),
        _ => Err(unsupported().into()),
    }
}
