//! Persistent release configuration.
//!
//! The form state is stored as a flat JSON object so it can be edited by hand
//! and shared between the window and the terminal front end.

use crate::error::{ConfigError, Result};
use crate::project::{FlutterProject, detect_project_root};
use crate::version::ReleaseVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default config location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "scripts/config.json";

/// Release notes used when the user leaves the field empty
pub const DEFAULT_RELEASE_NOTES: &str = "Automated release";

/// User-editable release settings
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// GitHub personal access token with `repo` scope
    pub github_token: String,
    /// Version to release, with or without a leading `v`
    pub version: String,
    /// Flutter project root
    pub project_path: String,
    /// Release body
    pub release_notes: String,
    /// Mark the GitHub release as a pre-release
    pub is_prerelease: bool,
    /// Create the GitHub release as a draft
    pub is_draft: bool,
}

impl fmt::Debug for ReleaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseConfig")
            .field("github_token", &mask_token(&self.github_token))
            .field("version", &self.version)
            .field("project_path", &self.project_path)
            .field("release_notes", &self.release_notes)
            .field("is_prerelease", &self.is_prerelease)
            .field("is_draft", &self.is_draft)
            .finish()
    }
}

/// Mask a secret for display, keeping only its length visible
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        String::new()
    } else {
        "*".repeat(token.chars().count().min(12))
    }
}

impl ReleaseConfig {
    /// Load a config file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let config = serde_json::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(config))
    }

    /// Save the config, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            reason: format!("Failed to serialize config: {}", e),
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                reason: format!("Failed to create directory {}: {}", parent.display(), e),
            })?;
        }

        // Write to temporary file first (atomic operation)
        let temp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::SaveFailed {
                path: path.to_path_buf(),
                reason: format!("Failed to create temp file: {}", e),
            })?;

            file.write_all(serialized.as_bytes())
                .and_then(|()| file.write_all(b"\n"))
                .and_then(|()| file.sync_all())
                .map_err(|e| ConfigError::SaveFailed {
                    path: path.to_path_buf(),
                    reason: format!("Failed to write config: {}", e),
                })?;
        }

        fs::rename(&temp_path, path).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            reason: format!("Failed to rename temp file: {}", e),
        })?;

        Ok(())
    }

    /// Fill an empty project path with the project detected from `cwd`
    pub fn with_detected_project(mut self, cwd: &Path) -> Self {
        if self.project_path.trim().is_empty() {
            self.project_path = detect_project_root(cwd).display().to_string();
        }
        self
    }

    /// Release notes, falling back to the default text
    pub fn notes_or_default(&self) -> &str {
        let notes = self.release_notes.trim();
        if notes.is_empty() {
            DEFAULT_RELEASE_NOTES
        } else {
            notes
        }
    }

    /// Validate the form into a [`ReleaseRequest`]
    pub fn to_request(&self) -> Result<ReleaseRequest> {
        let token = self.github_token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingField {
                field: "github_token",
            }
            .into());
        }

        if self.version.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "version" }.into());
        }
        let version = ReleaseVersion::parse(&self.version)?;

        if self.project_path.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "project_path",
            }
            .into());
        }
        let project = FlutterProject::open(PathBuf::from(self.project_path.trim()))?;

        Ok(ReleaseRequest {
            token: token.to_string(),
            version,
            project,
            notes: self.notes_or_default().to_string(),
            prerelease: self.is_prerelease,
            draft: self.is_draft,
        })
    }
}

/// A validated release request, ready for the pipeline
#[derive(Clone)]
pub struct ReleaseRequest {
    /// GitHub token
    pub token: String,
    /// Version being released
    pub version: ReleaseVersion,
    /// Project being released
    pub project: FlutterProject,
    /// Release body
    pub notes: String,
    /// Pre-release flag
    pub prerelease: bool,
    /// Draft flag
    pub draft: bool,
}

impl fmt::Debug for ReleaseRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseRequest")
            .field("token", &mask_token(&self.token))
            .field("version", &self.version)
            .field("project", &self.project)
            .field("prerelease", &self.prerelease)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReleaseConfig {
        ReleaseConfig {
            github_token: "ghp_secret".to_string(),
            version: "1.2.0-beta.1".to_string(),
            project_path: "/work/invest_ledger".to_string(),
            release_notes: "修复若干问题\nFixes".to_string(),
            is_prerelease: true,
            is_draft: false,
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scripts").join("config.json");

        let config = sample();
        config.save(&path).unwrap();

        let loaded = ReleaseConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_json_keys_are_flat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        sample().save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        for key in [
            "github_token",
            "version",
            "project_path",
            "release_notes",
            "is_prerelease",
            "is_draft",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert!(raw.contains("修复若干问题"));
    }

    #[test]
    fn test_missing_file_and_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert!(ReleaseConfig::load(&path).unwrap().is_none());

        std::fs::write(&path, r#"{"version": "1.0.0"}"#).unwrap();
        let loaded = ReleaseConfig::load(&path).unwrap().unwrap();
        assert_eq!(loaded.version, "1.0.0");
        assert!(loaded.github_token.is_empty());
        assert!(!loaded.is_draft);

        std::fs::write(&path, "not json").unwrap();
        assert!(ReleaseConfig::load(&path).is_err());
    }

    #[test]
    fn test_debug_masks_token() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("**********"));
    }

    #[test]
    fn test_to_request_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pubspec.yaml"), "name: demo\nversion: 1.0.0+1\n").unwrap();

        let mut config = sample();
        config.project_path = dir.path().display().to_string();
        config.release_notes = "  ".to_string();

        let request = config.to_request().unwrap();
        assert_eq!(request.version.tag(), "v1.2.0-beta.1");
        assert_eq!(request.notes, DEFAULT_RELEASE_NOTES);
        assert!(request.prerelease);

        let mut bad = config.clone();
        bad.github_token = " ".to_string();
        assert!(bad.to_request().is_err());

        let mut bad = config.clone();
        bad.version = "1.0".to_string();
        assert!(bad.to_request().is_err());

        let mut bad = config;
        bad.project_path = dir.path().join("missing").display().to_string();
        assert!(bad.to_request().is_err());
    }

    #[test]
    fn test_with_detected_project_keeps_explicit_path() {
        let config = sample().with_detected_project(Path::new("/elsewhere"));
        assert_eq!(config.project_path, "/work/invest_ledger");

        let dir = tempfile::tempdir().unwrap();
        let config = ReleaseConfig::default().with_detected_project(dir.path());
        assert!(!config.project_path.is_empty());
    }
}
