//! GitHub Release management: create a release, upload its assets

use crate::error::{GitHubError, Result};
use crate::events::Emitter;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio_util::io::ReaderStream;

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Configuration for GitHub releases
#[derive(Clone)]
pub struct GitHubReleaseConfig {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Whether to create a draft release
    pub draft: bool,
    /// Whether to mark the release as a pre-release
    pub prerelease: bool,
    /// Release body
    pub notes: String,
    /// GitHub token
    pub token: String,
    /// REST API base URL
    pub api_url: String,
}

impl std::fmt::Debug for GitHubReleaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubReleaseConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("draft", &self.draft)
            .field("prerelease", &self.prerelease)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

/// Result of GitHub release operation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitHubReleaseResult {
    /// Release ID
    #[serde(rename = "id")]
    pub release_id: u64,
    /// Release page URL
    pub html_url: String,
    /// Asset upload URL template (`.../assets{?name,label}`)
    pub upload_url: String,
    /// Whether this was a draft
    #[serde(default)]
    pub draft: bool,
    /// Whether this was a prerelease
    #[serde(default)]
    pub prerelease: bool,
}

impl GitHubReleaseResult {
    /// Upload URL with the URI template suffix removed
    pub fn upload_endpoint(&self) -> &str {
        self.upload_url
            .split_once('{')
            .map_or(self.upload_url.as_str(), |(base, _)| base)
    }
}

/// An uploaded release asset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedAsset {
    /// Asset file name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Public download URL
    #[serde(default)]
    pub browser_download_url: String,
}

#[derive(Serialize)]
struct CreateReleaseBody<'a> {
    tag_name: &'a str,
    name: String,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

/// GitHub release manager
#[derive(Debug)]
pub struct GitHubReleaseManager {
    client: reqwest::Client,
    config: GitHubReleaseConfig,
}

impl GitHubReleaseManager {
    /// Create new GitHub release manager
    pub fn new(config: GitHubReleaseConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("token {}", config.token))
            .map_err(GitHubError::from)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("flutter_release/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(GitHubError::from)?;

        Ok(Self { client, config })
    }

    /// Releases endpoint of the configured repository
    fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            self.config.repo
        )
    }

    /// Create a GitHub release for `tag`
    pub async fn create_release(&self, tag: &str) -> Result<GitHubReleaseResult> {
        let body = CreateReleaseBody {
            tag_name: tag,
            name: format!("Release {}", tag),
            body: &self.config.notes,
            draft: self.config.draft,
            prerelease: self.config.prerelease,
        };

        let response = self
            .client
            .post(self.releases_url())
            .json(&body)
            .send()
            .await
            .map_err(GitHubError::from)?;

        let response = expect_created(response, "create release").await?;
        let release = response
            .json::<GitHubReleaseResult>()
            .await
            .map_err(GitHubError::from)?;
        Ok(release)
    }

    /// Upload one artifact to a release, streaming it from disk
    pub async fn upload_artifact(&self, release: &GitHubReleaseResult, path: &Path) -> Result<UploadedAsset> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GitHubError::InvalidAssetName {
                path: path.to_path_buf(),
            })?;

        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();

        let response = self
            .client
            .post(release.upload_endpoint())
            .query(&[("name", name)])
            .header(CONTENT_TYPE, detect_content_type(path))
            .header(CONTENT_LENGTH, size)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(GitHubError::from)?;

        let response = expect_created(response, "upload asset").await?;
        let asset = response
            .json::<UploadedAsset>()
            .await
            .map_err(GitHubError::from)?;
        Ok(asset)
    }

    /// Upload artifacts in order, stopping at the first failure
    pub async fn upload_artifacts<P: AsRef<Path>>(
        &self,
        release: &GitHubReleaseResult,
        artifact_paths: &[P],
        emitter: &Emitter,
    ) -> Result<Vec<UploadedAsset>> {
        let mut uploaded = Vec::with_capacity(artifact_paths.len());

        for path in artifact_paths {
            let path = path.as_ref();
            let display_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            emitter.info(format!("Uploading {}", display_name));

            match self.upload_artifact(release, path).await {
                Ok(asset) => {
                    emitter.success(format!("Uploaded {} ({} bytes)", asset.name, asset.size));
                    uploaded.push(asset);
                }
                Err(e) => {
                    emitter.error(format!("Upload of {} failed: {}", display_name, e));
                    return Err(e);
                }
            }
        }

        Ok(uploaded)
    }
}

async fn expect_created(response: reqwest::Response, operation: &'static str) -> Result<reqwest::Response> {
    if response.status() == StatusCode::CREATED {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(GitHubError::UnexpectedStatus {
        operation,
        status,
        body,
    }
    .into())
}

/// Detect MIME type for release artifacts
fn detect_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("apk") => "application/vnd.android.package-archive",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}
