//! Manifest version rewriting.
//!
//! Flutter keeps `version: <name>+<build>` in pubspec.yaml. The name comes from
//! the release version; the build number (Android `versionCode`) must grow on
//! every release, so it is taken from the current line and incremented.

use crate::error::{ManifestError, Result};
use crate::version::ReleaseVersion;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VERSION_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^version:[ \t]*([^\r\n]*)").expect("version line regex is valid")
});

/// Result of a manifest version update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestUpdate {
    /// Manifest that was modified
    pub path: PathBuf,
    /// Value of the version field before the update
    pub previous: String,
    /// Value written, e.g. `1.2.0+8`
    pub written: String,
}

/// Rewrite the `version:` line of a pubspec manifest
pub fn update_manifest_version(manifest: &Path, version: &ReleaseVersion) -> Result<ManifestUpdate> {
    let content = std::fs::read_to_string(manifest).map_err(|e| ManifestError::UpdateFailed {
        path: manifest.to_path_buf(),
        reason: format!("Failed to read file: {}", e),
    })?;

    let (updated, previous, written) = rewrite_version_line(&content, version).ok_or_else(|| {
        ManifestError::VersionFieldMissing {
            path: manifest.to_path_buf(),
        }
    })?;

    std::fs::write(manifest, updated).map_err(|e| ManifestError::UpdateFailed {
        path: manifest.to_path_buf(),
        reason: format!("Failed to write file: {}", e),
    })?;

    Ok(ManifestUpdate {
        path: manifest.to_path_buf(),
        previous,
        written,
    })
}

/// Returns the new content, the previous value and the written value.
fn rewrite_version_line(content: &str, version: &ReleaseVersion) -> Option<(String, String, String)> {
    let caps = VERSION_LINE_RE.captures(content)?;
    let whole = caps.get(0)?;
    let previous = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();

    let build = next_build_number(&previous);
    let written = format!("{}+{}", version.bare(), build);

    let mut updated = String::with_capacity(content.len() + 8);
    updated.push_str(&content[..whole.start()]);
    updated.push_str("version: ");
    updated.push_str(&written);
    updated.push_str(&content[whole.end()..]);

    Some((updated, previous, written))
}

/// Build number to write: the previous `+N` plus one, or 1 when there is none.
///
/// Not a fixed `+1`: Android only installs an update whose versionCode
/// increases.
fn next_build_number(previous: &str) -> u64 {
    previous
        .split_once('+')
        .and_then(|(_, build)| build.trim().parse::<u64>().ok())
        .map_or(1, |build| build.saturating_add(1))
}

/// Read the `name:` field of a pubspec manifest
pub fn read_project_name(content: &str) -> Option<String> {
    static NAME_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^name:[ \t]*([^\r\n]+)").expect("name regex is valid"));

    NAME_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}
