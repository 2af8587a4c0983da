//! Git operations for release workflows.
//!
//! Everything goes through the `git` CLI via [`CommandRunner`](crate::process::CommandRunner),
//! so the user's credentials, hooks and signing configuration apply unchanged.

mod config;
mod publisher;
mod remote;

pub use config::GitConfig;
pub use publisher::{GitPublisher, PublishResult};
pub use remote::{RepoSlug, parse_remote_url};
