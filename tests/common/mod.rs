//! Shared fixtures for integration tests.

#![allow(dead_code)]

use flutter_release::error::Result;
use flutter_release::events::Emitter;
use flutter_release::process::{CapturedOutput, CommandOutcome, CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const MANIFEST: &str = "name: invest_ledger\ndescription: Ledger app\nversion: 1.0.0+7\n\nenvironment:\n  sdk: '>=3.0.0 <4.0.0'\n";

/// Create a Flutter project skeleton in a temp dir
pub fn flutter_project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pubspec.yaml"), MANIFEST).unwrap();
    dir
}

/// Runner that records every command instead of spawning it.
///
/// Commands whose display starts with one of the `failures` prefixes exit
/// with code 1. `flutter build apk` drops the configured APKs into the
/// Flutter output directory.
#[derive(Default)]
pub struct ScriptedRunner {
    calls: Mutex<Vec<CommandSpec>>,
    failures: Vec<String>,
    remote_url: Option<String>,
    apks: Vec<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, prefix: &str) -> Self {
        self.failures.push(prefix.to_string());
        self
    }

    pub fn with_remote(mut self, url: &str) -> Self {
        self.remote_url = Some(url.to_string());
        self
    }

    pub fn producing_apks(mut self, names: &[&str]) -> Self {
        self.apks = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Command lines run so far
    pub fn commands(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|spec| spec.display()).collect()
    }

    fn record(&self, spec: &CommandSpec) -> bool {
        self.calls.lock().unwrap().push(spec.clone());
        let line = spec.display();
        !self.failures.iter().any(|prefix| line.starts_with(prefix.as_str()))
    }

    fn build_outputs(&self, cwd: &Path) {
        let out: PathBuf = cwd.join("build/app/outputs/flutter-apk");
        std::fs::create_dir_all(&out).unwrap();
        for name in &self.apks {
            std::fs::write(out.join(name), b"PK\x03\x04apk").unwrap();
        }
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec, emitter: &Emitter) -> Result<CommandOutcome> {
        let ok = self.record(spec);
        if ok && spec.program == "flutter" && spec.args.first().map(String::as_str) == Some("build") {
            self.build_outputs(&spec.cwd);
        }
        emitter.info(format!("(scripted) {}", spec));
        Ok(CommandOutcome {
            code: Some(if ok { 0 } else { 1 }),
        })
    }

    async fn capture(&self, spec: &CommandSpec) -> Result<CapturedOutput> {
        let ok = self.record(spec);
        let stdout = match (&self.remote_url, spec.args.as_slice()) {
            (Some(url), [remote, get_url, ..]) if remote == "remote" && get_url == "get-url" => {
                format!("{}\n", url)
            }
            _ => String::new(),
        };
        let code = if ok && !stdout.is_empty() { 0 } else { 1 };
        Ok(CapturedOutput {
            outcome: CommandOutcome { code: Some(code) },
            stdout,
        })
    }
}
