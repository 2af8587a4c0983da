//! Events flowing from the release worker to a front end.
//!
//! The worker never touches UI state directly. Everything it wants to show
//! (log lines, step transitions, the final outcome) goes through an unbounded
//! channel; the window or the terminal printer drains it on its own thread.

use crate::pipeline::{ReleaseStep, RunStatus};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Sender half of the event channel
pub type EventSender = UnboundedSender<PipelineEvent>;

/// Receiver half of the event channel
pub type EventReceiver = UnboundedReceiver<PipelineEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Severity of a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Progress and subprocess output
    Info,
    /// A command or step completed
    Success,
    /// Something went wrong but the run continues
    Warning,
    /// A failure; usually ends the run
    Error,
}

impl LogLevel {
    /// Severity tag
    pub fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// Glyph shown before the message
    pub fn prefix(self) -> &'static str {
        match self {
            LogLevel::Info => "ℹ",
            LogLevel::Success => "✓",
            LogLevel::Warning => "⚠",
            LogLevel::Error => "✗",
        }
    }
}

/// One timestamped log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// Local time the line was emitted
    pub timestamp: DateTime<Local>,
    /// Severity
    pub level: LogLevel,
    /// Message text
    pub message: String,
}

impl LogLine {
    /// Create a line stamped with the current local time
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.prefix(),
            self.message
        )
    }
}

/// Event emitted by the release worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A log line
    Log(LogLine),
    /// A pipeline step started
    StepStarted(ReleaseStep),
    /// A pipeline step completed
    StepCompleted(ReleaseStep),
    /// Artifacts were collected into the dist directory
    ArtifactsCollected(Vec<PathBuf>),
    /// The release run ended
    Finished(RunStatus),
    /// An environment check ended
    CheckFinished {
        /// Whether every check passed
        ok: bool,
    },
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Emits events to any number of channels and mirrors log lines to the `log` facade
#[derive(Clone, Default)]
pub struct Emitter {
    senders: Vec<EventSender>,
    waker: Option<Waker>,
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("senders", &self.senders.len())
            .finish()
    }
}

impl Emitter {
    /// Emitter that forwards to `sender`
    pub fn new(sender: EventSender) -> Self {
        Self {
            senders: vec![sender],
            waker: None,
        }
    }

    /// Emitter that only writes to the `log` facade
    pub fn silent() -> Self {
        Self::default()
    }

    /// Call `waker` after every emitted event (e.g. to request a repaint)
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Copy of this emitter that also sends every event to `sender`
    pub fn tee(&self, sender: EventSender) -> Self {
        let mut emitter = self.clone();
        emitter.senders.push(sender);
        emitter
    }

    /// Emit an event
    pub fn emit(&self, event: PipelineEvent) {
        // A closed receiver means that front end went away; keep working.
        for sender in &self.senders {
            let _ = sender.send(event.clone());
        }
        if let Some(waker) = &self.waker {
            waker();
        }
    }

    /// Emit a log line at `level`
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let line = LogLine::now(level, message);
        match level {
            LogLevel::Info | LogLevel::Success => log::info!("{}", line.message),
            LogLevel::Warning => log::warn!("{}", line.message),
            LogLevel::Error => log::error!("{}", line.message),
        }
        self.emit(PipelineEvent::Log(line));
    }

    /// Info line
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Success line
    pub fn success(&self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Warning line
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Error line
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emitter_forwards_and_wakes() {
        let (tx, mut rx) = channel();
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = wakes.clone();
        let emitter = Emitter::new(tx).with_waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        emitter.warn("push to main failed");
        emitter.emit(PipelineEvent::CheckFinished { ok: true });

        match rx.try_recv().unwrap() {
            PipelineEvent::Log(line) => {
                assert_eq!(line.level, LogLevel::Warning);
                assert_eq!(line.message, "push to main failed");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(rx.try_recv().unwrap(), PipelineEvent::CheckFinished { ok: true });
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_tee_reaches_both_receivers() {
        let (tx, mut rx) = channel();
        let (record_tx, mut record_rx) = channel();
        let emitter = Emitter::new(tx).tee(record_tx);

        emitter.info("hello");
        assert!(matches!(rx.try_recv(), Ok(PipelineEvent::Log(_))));
        assert!(matches!(record_rx.try_recv(), Ok(PipelineEvent::Log(_))));

        let recorder_only = Emitter::silent().tee(channel().0);
        recorder_only.info("no panic");
    }

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        Emitter::new(tx).error("still fine");
        Emitter::silent().info("no channel");
    }

    #[test]
    fn test_log_line_display() {
        let line = LogLine::now(LogLevel::Success, "Built");
        let rendered = line.to_string();
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] ✓ Built"));
        assert_eq!(LogLevel::Error.tag(), "ERROR");
    }
}
