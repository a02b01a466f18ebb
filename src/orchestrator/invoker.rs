//! Child process execution for external tools.

use super::command::Invocation;
use super::error::{Context, Error, FailureKind, Result};
use crate::cli::{OutputManager, WriteResultExt};
use std::collections::VecDeque;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lines of stderr kept as the diagnostic of a tagged invocation.
pub const STDERR_TAIL_LINES: usize = 20;

/// How long to wait for output pipes to drain after the child is gone.
const STREAM_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// How a child's standard streams are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Child shares the orchestrator's terminal.
    Inherit,
    /// Output is piped and re-emitted line by line with this tag, so
    /// concurrent children stay readable.
    Tagged(String),
}

/// What a finished child left behind.
#[derive(Debug)]
pub struct InvocationOutput {
    /// Exit status, uninterpreted
    pub status: ExitStatus,
    /// Last stderr lines (tagged mode only)
    pub diagnostic: Vec<String>,
}

/// Runs invocations one child at a time per call.
///
/// Cloning is cheap; every clone shares the same cancellation token.
#[derive(Debug, Clone)]
pub struct Invoker {
    timeout: Option<Duration>,
    cancel: CancellationToken,
    output: OutputManager,
}

enum Waited {
    Exited(std::io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

impl Invoker {
    /// Creates an invoker.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-invocation limit, `None` for no limit
    /// * `cancel` - Cancelling kills the running child
    /// * `output` - Where command lines and tagged output go
    pub fn new(timeout: Option<Duration>, cancel: CancellationToken, output: OutputManager) -> Self {
        Self {
            timeout,
            cancel,
            output,
        }
    }

    /// Echoes the command line, runs the child to completion and returns its
    /// exit status without judging it.
    ///
    /// On Unix the child leads its own process group so a timeout or
    /// cancellation can kill everything it spawned.
    ///
    /// # Errors
    ///
    /// [`Error::ToolInvocationFailure`] when the child cannot be launched,
    /// times out, or the run is cancelled while it is running.
    pub async fn run(&self, invocation: &Invocation, mode: &OutputMode) -> Result<InvocationOutput> {
        let line = invocation.command_line();
        let echoed = match mode {
            OutputMode::Inherit => self.output.command(&line),
            OutputMode::Tagged(tag) => self.output.tagged_command(tag, &line),
        };
        echoed.log_failure();

        let mut std_command = std::process::Command::new(&invocation.program);
        std_command.args(&invocation.args).current_dir(&invocation.cwd);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            std_command.process_group(0);
        }

        let mut command = Command::from(std_command);
        // The child is not in the terminal's foreground group: a read from an
        // inherited tty would stop it with SIGTTIN until the timeout fires.
        command.kill_on_drop(true).stdin(Stdio::null());

        match mode {
            OutputMode::Inherit => {
                command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            OutputMode::Tagged(_) => {
                command.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        log::debug!(
            "Spawning {} in {}",
            invocation.program,
            invocation.cwd.display()
        );
        let mut child = command.spawn().map_err(|e| Error::ToolInvocationFailure {
            command: line.clone(),
            kind: FailureKind::Launch {
                reason: e.to_string(),
            },
        })?;
        let pid = child.id();

        let streams = match mode {
            OutputMode::Tagged(tag) => Some(self.forward_streams(&mut child, tag)?),
            OutputMode::Inherit => None,
        };

        let waited = tokio::select! {
            status = child.wait() => Waited::Exited(status),
            _ = deadline(self.timeout) => Waited::TimedOut,
            _ = self.cancel.cancelled() => Waited::Cancelled,
        };

        let result = match waited {
            Waited::Exited(Ok(status)) => Ok(status),
            Waited::Exited(Err(e)) => Err(FailureKind::Launch {
                reason: format!("waiting for child failed: {e}"),
            }),
            Waited::TimedOut => {
                let limit = self.timeout.unwrap_or_default();
                log::warn!("`{line}` exceeded {}s, killing it", limit.as_secs());
                terminate(&mut child, pid).await;
                Err(FailureKind::timeout(limit))
            }
            Waited::Cancelled => {
                log::warn!("Cancelling `{line}`");
                terminate(&mut child, pid).await;
                Err(FailureKind::Cancelled)
            }
        };

        let diagnostic = match streams {
            Some(streams) => streams.finish().await,
            None => Vec::new(),
        };

        let status = result.map_err(|kind| Error::ToolInvocationFailure {
            command: line,
            kind,
        })?;
        log::debug!("{} finished: {status}", invocation.program);

        Ok(InvocationOutput { status, diagnostic })
    }

    fn forward_streams(&self, child: &mut Child, tag: &str) -> Result<Streams> {
        let stdout = child.stdout.take().context("child stdout was not piped")?;
        let stderr = child.stderr.take().context("child stderr was not piped")?;

        let output = self.output.clone();
        let stdout_tag = tag.to_string();
        let stdout = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                output.tool_stdout(&stdout_tag, &line).log_failure();
            }
        });

        let output = self.output.clone();
        let stderr_tag = tag.to_string();
        let stderr = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
            while let Ok(Some(line)) = lines.next_line().await {
                output.tool_stderr(&stderr_tag, &line).log_failure();
                if tail.len() == STDERR_TAIL_LINES {
                    tail.pop_front();
                }
                tail.push_back(line);
            }
            tail.into_iter().collect()
        });

        Ok(Streams { stdout, stderr })
    }
}

struct Streams {
    stdout: JoinHandle<()>,
    stderr: JoinHandle<Vec<String>>,
}

impl Streams {
    async fn finish(self) -> Vec<String> {
        let _ = tokio::time::timeout(STREAM_DRAIN_TIMEOUT, self.stdout).await;
        match tokio::time::timeout(STREAM_DRAIN_TIMEOUT, self.stderr).await {
            Ok(Ok(tail)) => tail,
            _ => Vec::new(),
        }
    }
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending::<()>().await,
    }
}

/// Kills the child and, on Unix, its whole process group.
async fn terminate(child: &mut Child, pid: Option<u32>) {
    #[cfg(unix)]
    {
        if let Some(pid) = pid {
            use nix::sys::signal::{Signal, killpg};
            use nix::unistd::Pid;

            if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                log::debug!("killpg({pid}) failed: {e}");
            }
        }
    }
    #[cfg(not(unix))]
    let _ = pid;

    if let Err(e) = child.kill().await {
        log::debug!("Failed to kill child process: {e}");
    }
}
