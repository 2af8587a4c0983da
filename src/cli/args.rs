//! Command line argument parsing and validation.
//!
//! With no subcommand the tool opens the release window. The `release`,
//! `check` and `config` subcommands run the same pipeline headless.

use crate::config::{DEFAULT_CONFIG_PATH, ReleaseConfig};
use crate::github::DEFAULT_API_URL;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Build, tag and publish Flutter APK releases to GitHub
#[derive(Parser, Debug)]
#[command(
    name = "flutter_release",
    version,
    about = "Build, tag and publish Flutter APK releases to GitHub",
    long_about = "Build a release APK, bump the pubspec version, push a tag and create a GitHub release.

Usage:
  flutter_release                      open the release window
  flutter_release release --version 1.2.0 --notes \"Bug fixes\"
  flutter_release check --project ../my_app
  flutter_release config show"
)]
pub struct Args {
    /// Config file holding the release form
    #[arg(long = "config", id = "config_file", global = true, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// GitHub REST API base URL
    #[arg(long, global = true, value_name = "URL", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand (defaults to `gui`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Open the release window
    Gui,

    /// Run a release from the terminal
    Release {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Check that flutter, git and the project are available
    Check {
        /// Flutter project directory
        #[arg(long, value_name = "DIR")]
        project: Option<PathBuf>,
    },

    /// Show or save the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Command {
    /// Command name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Gui => "gui",
            Command::Release { .. } => "release",
            Command::Check { .. } => "check",
            Command::Config { .. } => "config",
        }
    }
}

/// `config` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective config with the token masked
    Show,
    /// Merge the given values into the config file
    Save {
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
}

/// Values that override the config file for one invocation
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// GitHub personal access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Version to release, e.g. 1.2.0 or 1.2.0-beta.1
    #[arg(long)]
    pub version: Option<String>,

    /// Flutter project directory
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Release notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Mark the release as a pre-release
    #[arg(long, overrides_with = "no_prerelease")]
    pub prerelease: bool,

    /// Clear the pre-release flag
    #[arg(long)]
    pub no_prerelease: bool,

    /// Create the release as a draft
    #[arg(long, overrides_with = "no_draft")]
    pub draft: bool,

    /// Clear the draft flag
    #[arg(long)]
    pub no_draft: bool,
}

impl ConfigOverrides {
    /// Apply the given values on top of `config`
    pub fn apply(&self, config: &mut ReleaseConfig) {
        if let Some(token) = &self.token {
            config.github_token = token.clone();
        }
        if let Some(version) = &self.version {
            config.version = version.clone();
        }
        if let Some(project) = &self.project {
            config.project_path = project.display().to_string();
        }
        if let Some(notes) = &self.notes {
            config.release_notes = notes.clone();
        }
        if self.prerelease {
            config.is_prerelease = true;
        } else if self.no_prerelease {
            config.is_prerelease = false;
        }
        if self.draft {
            config.is_draft = true;
        } else if self.no_draft {
            config.is_draft = false;
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Subcommand to run, `gui` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Gui)
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("--api-url must not be empty".to_string());
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(format!("--api-url must be an http(s) URL, got '{}'", self.api_url));
        }
        Ok(())
    }
}
