//! Release version handling.
//!
//! A release version is the user-entered string, validated against the
//! `MAJOR.MINOR.PATCH[-PRERELEASE]` form with an optional leading `v`.
//! The git tag always carries the `v`, the manifest never does.

mod updater;

pub use updater::{ManifestUpdate, read_project_name, update_manifest_version};

use crate::error::{Result, VersionError};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?\d+\.\d+\.\d+(-[a-zA-Z0-9\-\.]+)?$").expect("version regex is valid")
});

/// Check a version string without constructing a [`ReleaseVersion`]
pub fn is_valid_version(input: &str) -> bool {
    VERSION_RE.is_match(input.trim())
}

/// A validated release version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    bare: String,
}

impl ReleaseVersion {
    /// Validate and normalize a user-entered version string
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !VERSION_RE.is_match(trimmed) {
            return Err(VersionError::InvalidVersion {
                version: input.to_string(),
            }
            .into());
        }

        let bare = trimmed.strip_prefix('v').unwrap_or(trimmed).to_string();
        Ok(Self { bare })
    }

    /// Version without the `v` prefix, as written to the manifest
    pub fn bare(&self) -> &str {
        &self.bare
    }

    /// Git tag and release tag name
    pub fn tag(&self) -> String {
        format!("v{}", self.bare)
    }

    /// Whether the version carries a pre-release suffix (`1.0.0-beta.1`)
    ///
    /// Falls back to a plain `-` check for suffixes semver itself rejects.
    pub fn has_prerelease_suffix(&self) -> bool {
        match semver::Version::parse(&self.bare) {
            Ok(version) => !version.pre.is_empty(),
            Err(_) => self.bare.contains('-'),
        }
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_release_and_prerelease() {
        assert!(is_valid_version("1.0.0"));
        assert!(is_valid_version("1.0.0-beta.1"));
        assert!(is_valid_version("v2.10.3"));
        assert!(is_valid_version("  0.0.1-rc-2  "));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_valid_version("abc"));
        assert!(!is_valid_version("1.0"));
        assert!(!is_valid_version("1.0.0+5"));
        assert!(!is_valid_version("V1.0.0"));
        assert!(!is_valid_version(""));
    }

    #[test]
    fn test_tag_and_bare() {
        let version = ReleaseVersion::parse("v1.2.3").unwrap();
        assert_eq!(version.bare(), "1.2.3");
        assert_eq!(version.tag(), "v1.2.3");

        let version = ReleaseVersion::parse("1.2.3-beta.1").unwrap();
        assert_eq!(version.tag(), "v1.2.3-beta.1");
        assert_eq!(version.to_string(), "v1.2.3-beta.1");
    }

    #[test]
    fn test_parse_error_keeps_input() {
        let err = ReleaseVersion::parse("1.0").unwrap_err();
        assert!(err.to_string().contains("'1.0'"));
    }

    #[test]
    fn test_prerelease_suffix() {
        assert!(ReleaseVersion::parse("1.0.0-beta.1").unwrap().has_prerelease_suffix());
        assert!(!ReleaseVersion::parse("1.0.0").unwrap().has_prerelease_suffix());
        assert!(ReleaseVersion::parse("1.0.0-beta..1").unwrap().has_prerelease_suffix());
    }
}
