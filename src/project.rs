//! Flutter project layout.
//!
//! Knows where the manifest, optional code-generation config, Android build
//! outputs and the dist directory live relative to the project root.

use crate::error::{ManifestError, Result};
use std::path::{Path, PathBuf};

/// Project manifest file name
pub const MANIFEST_FILE: &str = "pubspec.yaml";

/// Android Gradle script committed alongside the manifest when present
pub const GRADLE_SCRIPT: &str = "android/app/build.gradle.kts";

/// Directories searched for release APKs, in priority order
const APK_OUTPUT_DIRS: &[&str] = &[
    "android/app/build/outputs/apk/release",
    "build/app/outputs/flutter-apk",
    "build/app/outputs/apk/release",
];

/// An opened Flutter project with a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlutterProject {
    root: PathBuf,
}

impl FlutterProject {
    /// Open a project directory, requiring a `pubspec.yaml`
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !root.join(MANIFEST_FILE).is_file() {
            return Err(ManifestError::NotFound {
                path: root.to_path_buf(),
            }
            .into());
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to `pubspec.yaml`
    pub fn manifest(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Whether the project uses build_runner code generation
    pub fn has_codegen(&self) -> bool {
        self.root.join("build.yaml").is_file()
    }

    /// Candidate APK output directories, in priority order
    pub fn apk_output_dirs(&self) -> Vec<PathBuf> {
        APK_OUTPUT_DIRS.iter().map(|dir| self.root.join(dir)).collect()
    }

    /// Directory release artifacts are collected into
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join("build")
    }

    /// Read the project name from the manifest
    pub fn name(&self) -> Option<String> {
        std::fs::read_to_string(self.manifest())
            .ok()
            .and_then(|content| crate::version::read_project_name(&content))
    }
}

/// Find the Flutter project root starting from `start`.
///
/// A `scripts` directory directly inside a project resolves to its parent.
/// Otherwise the nearest ancestor holding a manifest wins. Falls back to
/// `start` itself.
pub fn detect_project_root(start: &Path) -> PathBuf {
    if start.file_name().is_some_and(|name| name == "scripts")
        && let Some(parent) = start.parent()
        && parent.join(MANIFEST_FILE).is_file()
    {
        return parent.to_path_buf();
    }

    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .unwrap_or(start)
        .to_path_buf()
}
