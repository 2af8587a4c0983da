//! Colored terminal output for release operations
//!
//! Renders pipeline events and command results with consistent colors

use crate::events::{LogLevel, LogLine, PipelineEvent};
use crate::pipeline::RunStatus;
use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            quiet: self.quiet,
        }
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OutputManager {
    /// Create a new output manager; `quiet` keeps only warnings and errors
    pub fn new(quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
        }
    }

    fn colored_line(&self, glyph: &str, glyph_spec: &ColorSpec, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(glyph_spec);
        let _ = write!(&mut buffer, "{}", glyph);
        let _ = buffer.reset();
        let _ = writeln!(&mut buffer, " {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print an info message (normal output)
    pub fn info(&self, message: &str) -> std::io::Result<()> {
        self.colored_line("ℹ", ColorSpec::new().set_fg(Some(Color::Cyan)), message)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.colored_line(
            "✓",
            ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true),
            message,
        )
    }

    /// Print a warning message (shown in quiet mode)
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        let mut buffer = self.bufwtr.buffer();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(&mut buffer, "⚠");
        let _ = buffer.reset();
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        let _ = writeln!(&mut buffer, " {}", message);
        let _ = buffer.reset();
        self.bufwtr.print(&buffer)
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
            || write!(&mut buffer, "✗").is_err()
            || buffer.reset().is_err()
            || buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red))).is_err()
            || writeln!(&mut buffer, " {}", message).is_err()
            || buffer.reset().is_err()
            || bufwtr.print(&buffer).is_err()
        {
            println!("[STDERR ERROR] ✗ {}", message);
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer);
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = writeln!(&mut buffer, "═══ {} ═══", title);
        let _ = buffer.reset();
        self.bufwtr.print(&buffer)
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "    {}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        let _ = writeln!(&mut buffer, "{}", message);
        self.bufwtr.print(&buffer)
    }

    /// Print one timestamped log line in its level's color
    pub fn log_line(&self, line: &LogLine) -> std::io::Result<()> {
        let stamp = line.timestamp.format("%H:%M:%S").to_string();
        let message = format!("[{}] {}", stamp, line.message);
        match line.level {
            LogLevel::Info => self.info(&message),
            LogLevel::Success => self.success(&message),
            LogLevel::Warning => self.warn(&message),
            LogLevel::Error => {
                self.error(&message);
                Ok(())
            }
        }
    }

    /// Render a pipeline event
    pub fn event(&self, event: &PipelineEvent) -> std::io::Result<()> {
        match event {
            PipelineEvent::Log(line) => self.log_line(line),
            PipelineEvent::StepStarted(step) => self.section(&step.to_string()),
            PipelineEvent::StepCompleted(_) | PipelineEvent::ArtifactsCollected(_) => Ok(()),
            PipelineEvent::Finished(RunStatus::Succeeded { .. }) => self.section("Release succeeded"),
            PipelineEvent::Finished(RunStatus::Failed { step, .. }) => {
                self.section(&format!("Release failed at step {}", step.number()))
            }
            PipelineEvent::Finished(_) => Ok(()),
            PipelineEvent::CheckFinished { ok: true } => self.section("Environment ready"),
            PipelineEvent::CheckFinished { ok: false } => self.section("Environment incomplete"),
        }
    }
}
