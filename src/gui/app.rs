//! The release form, its buttons and the log view.

use super::worker::{self, Job};
use crate::cli::confirmation_summary;
use crate::config::{ReleaseConfig, ReleaseRequest};
use crate::events::{self, EventReceiver, LogLevel, LogLine, PipelineEvent};
use crate::pipeline::{ReleaseRun, ReleaseStep, RunStatus};
use crate::project::{FlutterProject, MANIFEST_FILE};
use eframe::egui::{self, Color32, RichText};
use std::path::PathBuf;

const TOKEN_URL: &str = "https://github.com/settings/tokens";

/// What the worker is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activity {
    Releasing,
    Checking,
}

/// Modal message shown over the form
#[derive(Debug, Clone)]
struct Dialog {
    title: String,
    message: String,
    is_error: bool,
}

/// Deferred user actions, applied after the frame is laid out
enum Action {
    CheckEnvironment,
    SaveConfig,
    RequestRelease,
    ConfirmRelease,
    CancelRelease,
    ClearLog,
    CloseDialog,
}

/// Release window state
pub struct ReleaseApp {
    form: ReleaseConfig,
    config_path: PathBuf,
    api_url: String,
    log: Vec<LogLine>,
    status: (String, Color32),
    run: ReleaseRun,
    activity: Option<Activity>,
    events: Option<EventReceiver>,
    pending: Option<ReleaseRequest>,
    dialog: Option<Dialog>,
    startup_check: bool,
}

impl ReleaseApp {
    /// Create the window state, loading the form from `config_path`
    pub fn new(config_path: PathBuf, api_url: String) -> Self {
        let mut log = Vec::new();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let form = match ReleaseConfig::load(&config_path) {
            Ok(Some(config)) => config,
            Ok(None) => ReleaseConfig::default(),
            Err(e) => {
                log::warn!("{}", e);
                log.push(LogLine::now(LogLevel::Warning, format!("Failed to load config: {}", e)));
                ReleaseConfig::default()
            }
        }
        .with_detected_project(&cwd);

        Self {
            form,
            config_path,
            api_url,
            log,
            status: ("Ready".to_string(), Color32::DARK_GREEN),
            run: ReleaseRun::new(),
            activity: None,
            events: None,
            pending: None,
            dialog: None,
            startup_check: true,
        }
    }

    fn is_busy(&self) -> bool {
        self.activity.is_some()
    }

    fn push_log(&mut self, level: LogLevel, message: impl Into<String>) {
        let line = LogLine::now(level, message);
        match level {
            LogLevel::Warning => log::warn!("{}", line.message),
            LogLevel::Error => log::error!("{}", line.message),
            LogLevel::Info | LogLevel::Success => log::info!("{}", line.message),
        }
        self.log.push(line);
    }

    fn set_status(&mut self, text: impl Into<String>, color: Color32) {
        self.status = (text.into(), color);
    }

    fn show_dialog(&mut self, title: &str, message: impl Into<String>, is_error: bool) {
        self.dialog = Some(Dialog {
            title: title.to_string(),
            message: message.into(),
            is_error,
        });
    }

    fn start(&mut self, ctx: &egui::Context, job: Job, activity: Activity) {
        let (tx, rx) = events::channel();
        match worker::spawn(job, tx, ctx.clone()) {
            Ok(_) => {
                self.events = Some(rx);
                self.activity = Some(activity);
            }
            Err(e) => {
                self.push_log(LogLevel::Error, format!("Failed to start worker: {}", e));
                self.set_status("Failed", Color32::RED);
            }
        }
    }

    fn check_environment(&mut self, ctx: &egui::Context) {
        if self.is_busy() {
            return;
        }
        self.set_status("Checking environment...", Color32::LIGHT_BLUE);
        let project_dir = PathBuf::from(self.form.project_path.trim());
        self.start(ctx, Job::CheckEnvironment(project_dir), Activity::Checking);
    }

    /// Pick the project directory with the native folder dialog
    fn browse_project(&mut self) {
        let current = PathBuf::from(self.form.project_path.trim());
        let mut dialog = rfd::FileDialog::new().set_title("Select Flutter project");
        if current.is_dir() {
            dialog = dialog.set_directory(&current);
        }
        if let Some(dir) = dialog.pick_folder() {
            self.set_project_path(dir);
        }
    }

    fn set_project_path(&mut self, dir: PathBuf) {
        self.form.project_path = dir.display().to_string();
        if FlutterProject::open(&dir).is_err() {
            self.push_log(
                LogLevel::Warning,
                format!("No {} in {}", MANIFEST_FILE, dir.display()),
            );
        }
    }

    fn save_config(&mut self) {
        match self.form.save(&self.config_path) {
            Ok(()) => {
                self.push_log(
                    LogLevel::Success,
                    format!("Config saved to {}", self.config_path.display()),
                );
                self.show_dialog("Saved", "Config saved", false);
            }
            Err(e) => {
                self.push_log(LogLevel::Error, format!("Failed to save config: {}", e));
                self.show_dialog("Error", format!("Failed to save config: {}", e), true);
            }
        }
    }

    fn request_release(&mut self) {
        if self.is_busy() {
            return;
        }
        match self.form.to_request() {
            Ok(request) => self.pending = Some(request),
            Err(e) => self.show_dialog("Error", e.to_string(), true),
        }
    }

    fn confirm_release(&mut self, ctx: &egui::Context) {
        let Some(request) = self.pending.take() else {
            return;
        };
        self.run = ReleaseRun::new();
        self.set_status("Releasing...", Color32::LIGHT_BLUE);
        let job = Job::Release {
            request,
            api_url: self.api_url.clone(),
        };
        self.start(ctx, job, Activity::Releasing);
    }

    /// Drain worker events into the log and the status label
    fn drain_events(&mut self) {
        let Some(mut rx) = self.events.take() else {
            return;
        };

        let mut finished = false;
        loop {
            match rx.try_recv() {
                Ok(event) => finished |= self.handle_event(event),
                Err(tokio::sync::mpsc::error::TryRecvError::Empty) => break,
                Err(tokio::sync::mpsc::error::TryRecvError::Disconnected) => {
                    if !finished && self.is_busy() {
                        self.push_log(LogLevel::Error, "Worker stopped unexpectedly");
                        self.set_status("Failed", Color32::RED);
                    }
                    finished = true;
                    break;
                }
            }
        }

        if finished {
            self.activity = None;
        } else {
            self.events = Some(rx);
        }
    }

    /// Apply one event; returns true when it ends the current job
    fn handle_event(&mut self, event: PipelineEvent) -> bool {
        self.run.apply(&event);
        match event {
            PipelineEvent::Log(line) => {
                self.log.push(line);
                false
            }
            PipelineEvent::StepStarted(step) => {
                self.set_status(format!("{}...", step), Color32::LIGHT_BLUE);
                false
            }
            PipelineEvent::StepCompleted(_) | PipelineEvent::ArtifactsCollected(_) => false,
            PipelineEvent::Finished(RunStatus::Succeeded { release_url }) => {
                self.set_status("Release succeeded", Color32::DARK_GREEN);
                let mut message = "The release was published.".to_string();
                if let Some(url) = release_url {
                    message.push_str(&format!("\n\n{}", url));
                }
                self.show_dialog("Success", message, false);
                true
            }
            PipelineEvent::Finished(RunStatus::Failed { step, message }) => {
                self.set_status("Release failed", Color32::RED);
                self.show_dialog(
                    "Release failed",
                    format!("{} failed:\n{}\n\nSee the log for details.", step, message),
                    true,
                );
                true
            }
            PipelineEvent::Finished(_) => true,
            PipelineEvent::CheckFinished { ok } => {
                if ok {
                    self.set_status("Ready", Color32::DARK_GREEN);
                } else {
                    self.set_status("Environment check failed", Color32::RED);
                }
                true
            }
        }
    }

    fn form_ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("release_form")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("Project path:");
                ui.horizontal(|ui| {
                    ui.add(egui::TextEdit::singleline(&mut self.form.project_path).desired_width(460.0));
                    if ui.button("Browse").clicked() {
                        self.browse_project();
                    }
                });
                ui.end_row();

                ui.label("GitHub token:");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.form.github_token)
                            .password(true)
                            .desired_width(360.0),
                    );
                    ui.hyperlink_to("Create token", TOKEN_URL)
                        .on_hover_text("Create a personal access token with the 'repo' scope");
                });
                ui.end_row();

                ui.label("Version:");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.form.version)
                            .hint_text("1.0.0")
                            .desired_width(200.0),
                    );
                    ui.weak("(e.g. 1.0.0 or 1.0.0-beta.1)");
                });
                ui.end_row();

                ui.label("Release notes:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.form.release_notes)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );
                ui.end_row();
            });

        ui.add_space(6.0);
        ui.group(|ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.form.is_prerelease, "Pre-release");
                ui.checkbox(&mut self.form.is_draft, "Draft");
            });
        });
    }

    fn buttons_ui(&self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        let idle = !self.is_busy();
        ui.horizontal(|ui| {
            if ui.add_enabled(idle, egui::Button::new("Check environment")).clicked() {
                actions.push(Action::CheckEnvironment);
            }
            if ui.add_enabled(idle, egui::Button::new("Save config")).clicked() {
                actions.push(Action::SaveConfig);
            }
            if ui
                .add_enabled(idle, egui::Button::new(RichText::new("Start release").strong()))
                .clicked()
            {
                actions.push(Action::RequestRelease);
            }
            if ui.button("Clear log").clicked() {
                actions.push(Action::ClearLog);
            }
        });
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.is_busy() {
                ui.spinner();
            }
            let (text, color) = &self.status;
            ui.colored_label(*color, text);
            if self.activity == Some(Activity::Releasing) {
                ui.weak(format!(
                    "({}/{} steps done)",
                    self.run.completed.len(),
                    ReleaseStep::ALL.len()
                ));
            } else if !self.run.artifacts.is_empty() {
                ui.weak(format!("({} APK(s) collected)", self.run.artifacts.len()));
            }
        });
    }

    fn log_ui(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Output log").strong());
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for line in &self.log {
                        ui.label(RichText::new(line.to_string()).monospace().color(level_color(line.level)));
                    }
                });
        });
    }

    fn confirm_ui(&self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let Some(request) = &self.pending else {
            return;
        };
        egui::Window::new("Confirm release")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                for line in confirmation_summary(request) {
                    ui.label(line);
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Release").clicked() {
                        actions.push(Action::ConfirmRelease);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(Action::CancelRelease);
                    }
                });
            });
    }

    fn dialog_ui(&self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let Some(dialog) = &self.dialog else {
            return;
        };
        egui::Window::new(dialog.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let color = if dialog.is_error { Color32::RED } else { ui.visuals().text_color() };
                ui.colored_label(color, dialog.message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    actions.push(Action::CloseDialog);
                }
            });
    }
}

fn level_color(level: LogLevel) -> Color32 {
    match level {
        LogLevel::Info => Color32::GRAY,
        LogLevel::Success => Color32::from_rgb(0x2e, 0xa0, 0x43),
        LogLevel::Warning => Color32::from_rgb(0xd9, 0x8e, 0x04),
        LogLevel::Error => Color32::from_rgb(0xd7, 0x3a, 0x49),
    }
}

impl eframe::App for ReleaseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.startup_check {
            self.startup_check = false;
            self.check_environment(ctx);
        }
        self.drain_events();

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("title").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.vertical_centered(|ui| {
                ui.heading(super::WINDOW_TITLE);
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!self.is_busy(), |ui| self.form_ui(ui));
            ui.add_space(10.0);
            self.buttons_ui(ui, &mut actions);
            ui.add_space(6.0);
            self.status_ui(ui);
            ui.add_space(6.0);
            self.log_ui(ui);
        });

        self.confirm_ui(ctx, &mut actions);
        self.dialog_ui(ctx, &mut actions);

        for action in actions {
            match action {
                Action::CheckEnvironment => self.check_environment(ctx),
                Action::SaveConfig => self.save_config(),
                Action::RequestRelease => self.request_release(),
                Action::ConfirmRelease => self.confirm_release(ctx),
                Action::CancelRelease => {
                    self.pending = None;
                    self.push_log(LogLevel::Info, "Release cancelled");
                }
                Action::ClearLog => self.log.clear(),
                Action::CloseDialog => self.dialog = None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSender;
    use crate::github::DEFAULT_API_URL;
    use tempfile::TempDir;

    fn project_dir() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "name: demo_app\nversion: 1.0.0+3\n",
        )
        .unwrap();
        dir
    }

    fn busy_app(dir: &TempDir, activity: Activity) -> (ReleaseApp, EventSender) {
        let mut app = ReleaseApp::new(dir.path().join("scripts/config.json"), DEFAULT_API_URL.to_string());
        app.form.project_path = dir.path().display().to_string();
        let (tx, rx) = events::channel();
        app.events = Some(rx);
        app.activity = Some(activity);
        (app, tx)
    }

    #[test]
    fn test_failed_release_ends_job_with_error_dialog() {
        let dir = project_dir();
        let (mut app, tx) = busy_app(&dir, Activity::Releasing);

        tx.send(PipelineEvent::StepStarted(ReleaseStep::ALL[0])).unwrap();
        tx.send(PipelineEvent::StepCompleted(ReleaseStep::ALL[0])).unwrap();
        tx.send(PipelineEvent::StepStarted(ReleaseStep::ALL[1])).unwrap();
        tx.send(PipelineEvent::Log(LogLine::now(LogLevel::Error, "flutter clean exited 1")))
            .unwrap();
        tx.send(PipelineEvent::Finished(RunStatus::Failed {
            step: ReleaseStep::ALL[1],
            message: "flutter clean failed".to_string(),
        }))
        .unwrap();

        app.drain_events();

        assert!(!app.is_busy());
        assert!(app.events.is_none());
        assert_eq!(app.status, ("Release failed".to_string(), Color32::RED));
        let dialog = app.dialog.as_ref().unwrap();
        assert!(dialog.is_error);
        assert!(dialog.message.contains("flutter clean failed"));
        assert!(app.log.iter().any(|line| line.message == "flutter clean exited 1"));
        assert_eq!(app.run.completed, vec![ReleaseStep::ALL[0]]);
        assert_eq!(app.run.failed_step(), Some(ReleaseStep::ALL[1]));
    }

    #[test]
    fn test_successful_release_shows_url() {
        let dir = project_dir();
        let (mut app, tx) = busy_app(&dir, Activity::Releasing);

        tx.send(PipelineEvent::Finished(RunStatus::Succeeded {
            release_url: Some("https://github.com/acme/app/releases/tag/v1.1.0".to_string()),
        }))
        .unwrap();
        app.drain_events();

        assert!(!app.is_busy());
        assert_eq!(app.status.0, "Release succeeded");
        let dialog = app.dialog.as_ref().unwrap();
        assert!(!dialog.is_error);
        assert!(dialog.message.contains("releases/tag/v1.1.0"));
    }

    #[test]
    fn test_failed_check_ends_job_without_dialog() {
        let dir = project_dir();
        let (mut app, tx) = busy_app(&dir, Activity::Checking);

        tx.send(PipelineEvent::CheckFinished { ok: false }).unwrap();
        app.drain_events();

        assert!(!app.is_busy());
        assert!(app.events.is_none());
        assert_eq!(app.status, ("Environment check failed".to_string(), Color32::RED));
        assert!(app.dialog.is_none());
    }

    #[test]
    fn test_dropped_worker_is_reported() {
        let dir = project_dir();
        let (mut app, tx) = busy_app(&dir, Activity::Releasing);

        tx.send(PipelineEvent::StepStarted(ReleaseStep::ALL[0])).unwrap();
        drop(tx);
        app.drain_events();

        assert!(!app.is_busy());
        assert!(app.events.is_none());
        assert_eq!(app.status, ("Failed".to_string(), Color32::RED));
        assert_eq!(
            app.log.last().map(|line| line.message.as_str()),
            Some("Worker stopped unexpectedly")
        );
    }

    #[test]
    fn test_job_stays_open_until_finished() {
        let dir = project_dir();
        let (mut app, tx) = busy_app(&dir, Activity::Releasing);

        tx.send(PipelineEvent::StepStarted(ReleaseStep::ALL[0])).unwrap();
        app.drain_events();

        assert!(app.is_busy());
        assert!(app.events.is_some());
        assert_eq!(app.status.0, format!("{}...", ReleaseStep::ALL[0]));

        tx.send(PipelineEvent::Finished(RunStatus::Succeeded { release_url: None }))
            .unwrap();
        app.drain_events();
        assert!(!app.is_busy());
    }

    #[test]
    fn test_no_second_job_while_busy() {
        let dir = project_dir();
        let (mut app, _tx) = busy_app(&dir, Activity::Checking);
        app.form.github_token = "ghp_test".to_string();
        app.form.version = "1.1.0".to_string();
        assert!(app.form.to_request().is_ok());

        app.request_release();
        assert!(app.pending.is_none());

        let status = app.status.clone();
        app.check_environment(&egui::Context::default());
        assert_eq!(app.status, status);
        assert_eq!(app.activity, Some(Activity::Checking));
    }

    #[test]
    fn test_idle_request_opens_confirmation() {
        let dir = project_dir();
        let (mut app, tx) = busy_app(&dir, Activity::Checking);
        tx.send(PipelineEvent::CheckFinished { ok: true }).unwrap();
        app.drain_events();
        assert_eq!(app.status.0, "Ready");

        app.form.github_token = "ghp_test".to_string();
        app.form.version = "1.1.0".to_string();
        app.request_release();
        assert!(app.pending.is_some());
        assert!(app.dialog.is_none());
    }

    #[test]
    fn test_set_project_path_warns_without_manifest() {
        let dir = project_dir();
        let empty = tempfile::tempdir().unwrap();
        let (mut app, _tx) = busy_app(&dir, Activity::Checking);
        let before = app.log.len();

        app.set_project_path(dir.path().to_path_buf());
        assert_eq!(app.log.len(), before);

        app.set_project_path(empty.path().to_path_buf());
        assert_eq!(app.form.project_path, empty.path().display().to_string());
        assert_eq!(app.log.len(), before + 1);
        assert_eq!(app.log[before].level, LogLevel::Warning);
    }
}
