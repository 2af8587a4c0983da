//! Error types for flutter_release operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for flutter_release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for all flutter_release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Configuration file errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Version string errors
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Project manifest errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Subprocess errors
    #[error("{0}")]
    Command(#[from] CommandError),

    /// Build artifact errors
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Git operation errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// GitHub API errors
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Configuration file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for a release config
    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        /// Config file path
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Config file could not be written
    #[error("Failed to save config file {path}: {reason}")]
    SaveFailed {
        /// Config file path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// A required field is empty
    #[error("Missing required field: {field}")]
    MissingField {
        /// Field name
        field: &'static str,
    },
}

/// Version string errors
#[derive(Error, Debug)]
pub enum VersionError {
    /// Version string does not match the accepted pattern
    #[error("Invalid version '{version}': expected a form like 1.0.0 or 1.0.0-beta.1")]
    InvalidVersion {
        /// Version string
        version: String,
    },
}

/// Project manifest (pubspec.yaml) errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No pubspec.yaml in the project directory
    #[error("No pubspec.yaml found in {path}")]
    NotFound {
        /// Project directory that was searched
        path: PathBuf,
    },

    /// Manifest has no version field to update
    #[error("No 'version:' field in {path}")]
    VersionFieldMissing {
        /// Manifest path
        path: PathBuf,
    },

    /// Manifest could not be read or written
    #[error("Failed to update {path}: {reason}")]
    UpdateFailed {
        /// Manifest path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

/// Subprocess errors
#[derive(Error, Debug)]
pub enum CommandError {
    /// Executable is not on PATH
    #[error("Command not found: {program}")]
    NotFound {
        /// Program name
        program: String,
    },

    /// Process could not be started or awaited
    #[error("Failed to run '{command}': {source}")]
    SpawnFailed {
        /// Full command line
        command: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Process exited unsuccessfully
    #[error("Command '{command}' failed with exit code {}", code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Failed {
        /// Full command line
        command: String,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
    },
}

/// Build artifact errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// None of the known output directories exist
    #[error("No APK output directory found under {project}")]
    OutputDirMissing {
        /// Project root
        project: PathBuf,
    },

    /// Output directory exists but holds no release APK
    #[error("No release APK found in {dir}")]
    NoneFound {
        /// Directory that was scanned
        dir: PathBuf,
    },

    /// Copying an artifact into the dist directory failed
    #[error("Failed to copy {from} to {to}: {source}")]
    CopyFailed {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Invalid glob pattern built from a project path
    #[error("Invalid artifact pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    /// `git remote get-url origin` failed
    #[error("Could not read URL of remote '{remote}'")]
    RemoteUnavailable {
        /// Remote name
        remote: String,
    },

    /// Remote URL does not name an owner/repo pair
    #[error("Could not parse owner/repo from remote URL '{url}'")]
    UnsupportedRemote {
        /// Remote URL
        url: String,
    },

    /// Push failed on both the primary and fallback branch
    #[error("Git push failed on branches {branches:?}")]
    PushFailed {
        /// Branches that were attempted
        branches: Vec<String>,
    },
}

/// GitHub API errors
#[derive(Error, Debug)]
pub enum GitHubError {
    /// Transport-level failure
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Token cannot be used as a header value
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    /// API answered with an unexpected status
    #[error("{operation} returned {status}: {body}")]
    UnexpectedStatus {
        /// Operation name
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Artifact file name is not valid UTF-8
    #[error("Invalid asset file name: {path}")]
    InvalidAssetName {
        /// Artifact path
        path: PathBuf,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// User declined the confirmation prompt
    #[error("Release cancelled by user")]
    Cancelled,
}

impl ReleaseError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Config(ConfigError::MissingField { field }) => vec![
                format!("Set '{}' in the config file or pass it on the command line", field),
                "GitHub tokens can be created at https://github.com/settings/tokens (scope: repo)"
                    .to_string(),
            ],
            ReleaseError::Version(VersionError::InvalidVersion { .. }) => vec![
                "Use MAJOR.MINOR.PATCH, optionally with a pre-release suffix: 1.2.0-beta.1"
                    .to_string(),
            ],
            ReleaseError::Manifest(ManifestError::NotFound { .. }) => vec![
                "Point --project at the Flutter project root (the directory with pubspec.yaml)"
                    .to_string(),
            ],
            ReleaseError::Command(CommandError::NotFound { program }) => vec![
                format!("Install '{}' and make sure it is on PATH", program),
                "Run 'flutter_release check' to verify the environment".to_string(),
            ],
            ReleaseError::Git(GitError::UnsupportedRemote { .. })
            | ReleaseError::Git(GitError::RemoteUnavailable { .. }) => vec![
                "Verify git remote URL: git remote -v".to_string(),
                "Set origin to the GitHub repository: git remote set-url origin <url>".to_string(),
            ],
            ReleaseError::Git(GitError::PushFailed { .. }) => vec![
                "Check that you can push manually: git push origin HEAD".to_string(),
                "The local commit and tag are kept; push them once the remote is reachable"
                    .to_string(),
            ],
            ReleaseError::GitHub(GitHubError::UnexpectedStatus { status: 401, .. })
            | ReleaseError::GitHub(GitHubError::UnexpectedStatus { status: 403, .. }) => vec![
                "Check that the GitHub token is valid and has the 'repo' scope".to_string(),
            ],
            ReleaseError::GitHub(GitHubError::UnexpectedStatus { status: 422, .. }) => vec![
                "A release for this tag may already exist; bump the version or delete it"
                    .to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let err = ReleaseError::from(CommandError::Failed {
            command: "flutter pub get".to_string(),
            code: Some(1),
        });
        assert_eq!(
            err.to_string(),
            "Command 'flutter pub get' failed with exit code 1"
        );

        let err = CommandError::Failed {
            command: "git push".to_string(),
            code: None,
        };
        assert!(err.to_string().ends_with("exit code none"));
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = ReleaseError::from(ConfigError::MissingField {
            field: "github_token",
        });
        let suggestions = err.recovery_suggestions();
        assert!(suggestions[0].contains("github_token"));

        let err = ReleaseError::from(GitHubError::UnexpectedStatus {
            operation: "create release",
            status: 401,
            body: String::new(),
        });
        assert!(err.recovery_suggestions()[0].contains("token"));

        let err = ReleaseError::from(CliError::Cancelled);
        assert_eq!(err.recovery_suggestions().len(), 1);
    }
}
