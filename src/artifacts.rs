//! Release artifact discovery.
//!
//! After `flutter build apk --release` the APKs land in one of a few
//! Gradle/Flutter output directories. They are found by extension, debug
//! builds are filtered out, and the survivors are copied into the project's
//! dist directory for upload.

use crate::error::{ArtifactError, Result};
use crate::project::FlutterProject;
use std::path::{Path, PathBuf};

/// A built, installable package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Location on disk
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

impl Artifact {
    /// File name component
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Size in mebibytes, for display
    pub fn size_mb(&self) -> f64 {
        self.size as f64 / (1024.0 * 1024.0)
    }
}

/// List release APKs directly inside `dir`, sorted by file name
pub fn find_release_apks(dir: &Path) -> Result<Vec<Artifact>> {
    let pattern = format!("{}/*.apk", glob::Pattern::escape(&dir.to_string_lossy()));

    let mut artifacts: Vec<Artifact> = glob::glob(&pattern)
        .map_err(ArtifactError::from)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && is_release_apk(path))
        .map(|path| {
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            Artifact { path, size }
        })
        .collect();

    artifacts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(artifacts)
}

fn is_release_apk(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| !name.contains("debug"))
}

/// Locate the APKs produced by the last release build.
///
/// The first output directory that holds at least one release APK wins.
pub fn locate_built_apks(project: &FlutterProject) -> Result<Vec<Artifact>> {
    let existing: Vec<PathBuf> = project
        .apk_output_dirs()
        .into_iter()
        .filter(|dir| dir.is_dir())
        .collect();

    let Some(first) = existing.first().cloned() else {
        return Err(ArtifactError::OutputDirMissing {
            project: project.root().to_path_buf(),
        }
        .into());
    };

    for dir in &existing {
        let apks = find_release_apks(dir)?;
        if !apks.is_empty() {
            return Ok(apks);
        }
    }

    Err(ArtifactError::NoneFound { dir: first }.into())
}

/// Copy artifacts into `dist`, returning the copies
pub fn collect_into(artifacts: &[Artifact], dist: &Path) -> Result<Vec<Artifact>> {
    std::fs::create_dir_all(dist)?;

    artifacts
        .iter()
        .map(|artifact| {
            let dest = dist.join(artifact.file_name());
            if dest != artifact.path {
                std::fs::copy(&artifact.path, &dest).map_err(|source| ArtifactError::CopyFailed {
                    from: artifact.path.clone(),
                    to: dest.clone(),
                    source,
                })?;
            }
            Ok(Artifact {
                path: dest,
                size: artifact.size,
            })
        })
        .collect()
}
