//! Subprocess execution.
//!
//! [`CommandRunner`] is the seam between the pipeline and the outside world:
//! [`SystemRunner`] spawns real processes and streams their output into the
//! event log, tests substitute a scripted runner.

use crate::error::{CommandError, Result};
use crate::events::Emitter;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// A command to run: program, arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name, resolved on PATH
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
}

impl CommandSpec {
    /// Build a spec from a program and its arguments
    pub fn new<I, S>(program: &str, args: I, cwd: &Path) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
        }
    }

    /// Full command line, for logs and error messages
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit status of a streamed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl CommandOutcome {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Output of a captured (non-streamed) command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit status
    pub outcome: CommandOutcome,
    /// Standard output, lossily decoded
    pub stdout: String,
}

/// Runs external commands on behalf of the pipeline
pub trait CommandRunner {
    /// Run a command, streaming every stdout/stderr line to `emitter`
    fn run(&self, spec: &CommandSpec, emitter: &Emitter) -> impl Future<Output = Result<CommandOutcome>>;

    /// Run a command quietly and capture its stdout
    fn capture(&self, spec: &CommandSpec) -> impl Future<Output = Result<CapturedOutput>>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(spec: &CommandSpec) -> Result<Command> {
        // which resolves `flutter.bat` and friends on Windows.
        let program = which::which(&spec.program).map_err(|_| CommandError::NotFound {
            program: spec.program.clone(),
        })?;

        let mut command = Command::new(program);
        command
            .args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        Ok(command)
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, spec: &CommandSpec, emitter: &Emitter) -> Result<CommandOutcome> {
        let spawn_failed = |source| CommandError::SpawnFailed {
            command: spec.display(),
            source,
        };

        let mut child = Self::command(spec)?
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_failed)?;

        let mut stdout = child.stdout.take().map(OutputLines::new);
        let mut stderr = child.stderr.take().map(OutputLines::new);

        // Interleave both streams in arrival order until each hits EOF.
        while stdout.is_some() || stderr.is_some() {
            tokio::select! {
                line = async { stdout.as_mut()?.next_line().await.transpose() }, if stdout.is_some() => {
                    match line {
                        Some(Ok(line)) => emit_output(emitter, &line),
                        Some(Err(e)) => {
                            emitter.warn(format!("Failed to read command output: {}", e));
                            stdout = None;
                        }
                        None => stdout = None,
                    }
                }
                line = async { stderr.as_mut()?.next_line().await.transpose() }, if stderr.is_some() => {
                    match line {
                        Some(Ok(line)) => emit_output(emitter, &line),
                        Some(Err(e)) => {
                            emitter.warn(format!("Failed to read command output: {}", e));
                            stderr = None;
                        }
                        None => stderr = None,
                    }
                }
            }
        }

        let status = child.wait().await.map_err(spawn_failed)?;
        Ok(CommandOutcome {
            code: status.code(),
        })
    }

    async fn capture(&self, spec: &CommandSpec) -> Result<CapturedOutput> {
        let output = Self::command(spec)?
            .output()
            .await
            .map_err(|source| CommandError::SpawnFailed {
                command: spec.display(),
                source,
            })?;

        Ok(CapturedOutput {
            outcome: CommandOutcome {
                code: output.status.code(),
            },
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// Line reader over a child's output pipe.
///
/// Lines are split on raw bytes and decoded lossily, so output in a non-UTF-8
/// console encoding never ends the read before EOF. A cancelled read keeps its
/// partial line in `buf` and the next call continues it.
struct OutputLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> OutputLines<R> {
    fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
        }
    }

    /// Next line without its terminator, `None` at EOF
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        let read = self.reader.read_until(b'\n', &mut self.buf).await?;
        if read == 0 && self.buf.is_empty() {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        Ok(Some(line))
    }
}

fn emit_output(emitter: &Emitter, line: &str) {
    let line = line.trim_end();
    if !line.is_empty() {
        emitter.info(line);
    }
}

/// Run a command, logging the invocation and its result.
///
/// A non-zero exit becomes [`CommandError::Failed`].
pub async fn run_logged<R: CommandRunner>(runner: &R, spec: &CommandSpec, emitter: &Emitter) -> Result<()> {
    emitter.info(format!("Running: {}", spec));

    let outcome = match runner.run(spec, emitter).await {
        Ok(outcome) => outcome,
        Err(e) => {
            emitter.error(format!("Could not run command: {}", e));
            return Err(e);
        }
    };

    if outcome.success() {
        emitter.success("Command succeeded");
        Ok(())
    } else {
        let err = CommandError::Failed {
            command: spec.display(),
            code: outcome.code,
        };
        emitter.error(err.to_string());
        Err(err.into())
    }
}
