//! # flutter_release
//!
//! Build, version and publish Flutter APK releases to GitHub.
//!
//! A release runs five steps in order against one Flutter project:
//!
//! 1. rewrite the `version:` line of `pubspec.yaml`
//! 2. `flutter clean`, `flutter pub get` and optional code generation
//! 3. `flutter build apk --release`, then collect the APKs into `build/`
//! 4. commit, tag and push with `git`
//! 5. create the GitHub release and upload the APKs
//!
//! The first failing step ends the run. Progress is reported as
//! [`events::PipelineEvent`]s so the same pipeline drives the desktop window
//! and the terminal.
//!
//! ## Usage
//!
//! ```bash
//! flutter_release                                  # open the window
//! flutter_release release --version 1.2.0 --yes    # release from the terminal
//! flutter_release check                            # verify flutter, git and the project
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifacts;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod events;
pub mod git;
pub mod github;
#[cfg(feature = "gui")]
pub mod gui;
pub mod pipeline;
pub mod process;
pub mod project;
pub mod version;

pub use cli::Args;
pub use config::{ReleaseConfig, ReleaseRequest};
pub use error::{CliError, ReleaseError, Result};
pub use events::{Emitter, PipelineEvent};
pub use pipeline::{ReleasePipeline, ReleaseRun, ReleaseStep, RunStatus};
pub use process::{CommandRunner, SystemRunner};
pub use project::FlutterProject;
pub use version::ReleaseVersion;
