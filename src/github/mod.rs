//! GitHub integration for release operations

mod release_manager;

pub use release_manager::{
    DEFAULT_API_URL, GitHubReleaseConfig, GitHubReleaseManager, GitHubReleaseResult, UploadedAsset,
};
