//! Shell command execution.

use crate::error::{Result, SherylError};
use crate::shell::CancelToken;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Shell used to run step commands.
pub const SHELL: &str = "/bin/sh";

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const KILL_GRACE: Duration = Duration::from_secs(2);

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Process id of the spawned shell.
    pub pid: u32,

    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Combined stdout and stderr, in the order they were written.
    pub output: Vec<u8>,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,

    /// Whether the command was killed because the run was cancelled.
    pub cancelled: bool,
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Complete environment as `KEY=VALUE` entries. Nothing is inherited.
    pub env: Vec<String>,

    /// Token that aborts the wait and kills the process group.
    pub cancel: Option<CancelToken>,
}

impl CommandOptions {
    /// Options with the given environment and cancel token.
    pub fn new(env: &[String], cancel: &CancelToken) -> Self {
        Self {
            cwd: None,
            env: env.to_vec(),
            cancel: Some(cancel.clone()),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

/// Execute a shell command and capture its combined output.
///
/// The child runs in its own process group with stdin closed. A non-zero
/// exit is reported through [`CommandResult::success`], not as an error.
///
/// # Errors
///
/// Returns `SpawnFailed` if the shell cannot be started or waited on.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    let spawn_failed = |e: std::io::Error| SherylError::SpawnFailed {
        command: command.to_string(),
        message: e.to_string(),
    };

    let (mut reader, writer) = std::io::pipe().map_err(spawn_failed)?;
    let writer_err = writer.try_clone().map_err(spawn_failed)?;

    let mut cmd = Command::new(SHELL);
    cmd.arg("-c").arg(command);
    cmd.env_clear();
    for entry in &options.env {
        if let Some((key, value)) = entry.split_once('=') {
            cmd.env(key, value);
        }
    }
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    cmd.stdin(Stdio::null()).stdout(writer).stderr(writer_err);

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let spawned = cmd.spawn();
    // Release the parent's copies of the write end so the reader sees EOF.
    drop(cmd);
    let mut child = spawned.map_err(spawn_failed)?;
    let pid = child.id();
    tracing::debug!("Spawned pid {} for `{}`", pid, command);

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = reader.read_to_end(&mut buf) {
            tracing::warn!("Failed to read command output: {}", e);
        }
        let _ = tx.send(buf);
    });

    let mut cancelled = false;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break Some(status),
            Ok(None) => {}
            Err(e) => {
                terminate(&mut child);
                return Err(spawn_failed(e));
            }
        }
        if options.is_cancelled() {
            terminate(&mut child);
            cancelled = true;
            break None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    let output = collect_output(&rx, pid, options, &mut cancelled);
    let exit_code = status.and_then(|s| s.code());

    Ok(CommandResult {
        pid,
        exit_code,
        output,
        duration: start.elapsed(),
        success: !cancelled && status.is_some_and(|s| s.success()),
        cancelled,
    })
}

/// Wait for the output pipe to close.
///
/// Background jobs started by the shell hold the pipe open after the shell
/// itself exits, so the wait keeps watching the cancel token. Once cancelled,
/// the process group is killed and the pipe gets [`KILL_GRACE`] to close.
fn collect_output(
    rx: &mpsc::Receiver<Vec<u8>>,
    pid: u32,
    options: &CommandOptions,
    cancelled: &mut bool,
) -> Vec<u8> {
    let mut killed_at = cancelled.then(Instant::now);

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(buf) => return buf,
            Err(RecvTimeoutError::Disconnected) => return Vec::new(),
            Err(RecvTimeoutError::Timeout) => {}
        }

        match killed_at {
            Some(at) if at.elapsed() >= KILL_GRACE => {
                tracing::warn!("Output of pid {} still open after kill; dropping it", pid);
                return Vec::new();
            }
            Some(_) => {}
            None if options.is_cancelled() => {
                kill_group(pid);
                *cancelled = true;
                killed_at = Some(Instant::now());
            }
            None => {}
        }
    }
}

/// Kill the child's whole process group and reap it.
fn terminate(child: &mut Child) {
    kill_group(child.id());
    let _ = child.kill();
    let _ = child.wait();
}

/// Send SIGKILL to the process group led by `pid`.
fn kill_group(pid: u32) {
    #[cfg(unix)]
    {
        if let Ok(pgid) = i32::try_from(pid) {
            // SAFETY: plain syscall on a process group we created.
            unsafe {
                libc::kill(-pgid, libc::SIGKILL);
            }
        }
    }
    #[cfg(not(unix))]
    let _ = pid;
}
