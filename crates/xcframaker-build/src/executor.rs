//! Command execution with a durable build log.
//!
//! Every invocation appends one entry to `build.log`:
//!
//! ```text
//! ==> /usr/bin/xcodebuild archive -scheme Widgets ...
//! <captured stdout and stderr>
//! <== ok
//! ```
//!
//! The status line is `<== ok`, `<== failed (<status>)` for strict tasks, or
//! `<== failed (<status>), tolerated` for tolerant ones.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{BuildError, Result};
use crate::process::{ProcessOutput, ProcessRunner};
use crate::task::BuildTask;

/// Append-only log of every command a run attempted.
#[derive(Debug)]
pub struct BuildLog {
    path: PathBuf,
    file: File,
}

impl BuildLog {
    /// Open (or create) the log for appending.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| BuildError::Log {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one complete entry and flush it.
    pub fn record(&mut self, command: &str, output: &str, status: &str) -> Result<()> {
        let mut entry = format!("==> {command}\n");
        entry.push_str(output);
        if !output.is_empty() && !output.ends_with('\n') {
            entry.push('\n');
        }
        entry.push_str("<== ");
        entry.push_str(status);
        entry.push('\n');

        self.file
            .write_all(entry.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|source| BuildError::Log {
                path: self.path.clone(),
                source,
            })
    }
}

/// Result of a task that did not abort its unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded(ProcessOutput),
    /// A tolerant task failed; the failure has been logged.
    Tolerated(ProcessOutput),
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded(_))
    }

    pub fn output(&self) -> &ProcessOutput {
        match self {
            StepOutcome::Succeeded(out) | StepOutcome::Tolerated(out) => out,
        }
    }
}

/// Runs tasks through a [`ProcessRunner`] and records them in a [`BuildLog`].
pub struct CommandExecutor<R> {
    runner: R,
    log: BuildLog,
}

impl<R: ProcessRunner> CommandExecutor<R> {
    pub fn new(runner: R, log: BuildLog) -> Self {
        Self { runner, log }
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Log a step performed in-process rather than by a child program.
    pub fn record(&mut self, command: &str, output: &str, status: &str) -> Result<()> {
        self.log.record(command, output, status)
    }

    /// Run `task`, log it, and apply its failure policy.
    ///
    /// A strict failure returns [`BuildError::StepFailed`]; a tolerant one
    /// returns [`StepOutcome::Tolerated`]. A program that cannot be started
    /// counts as a failed run. Log write errors are always returned.
    pub fn execute(&mut self, task: &BuildTask) -> Result<StepOutcome> {
        let command = task.to_string();
        debug!(%command, tolerant = task.is_tolerant(), "running");

        let (output, status) = match self.runner.run(task) {
            Ok(output) if output.success() => {
                self.log.record(&command, &output.combined(), "ok")?;
                return Ok(StepOutcome::Succeeded(output));
            }
            Ok(output) => {
                let status = output.status_label();
                (output, status)
            }
            Err(e) => {
                let output = ProcessOutput {
                    code: None,
                    stdout: String::new(),
                    stderr: format!("could not start {}: {e}", task.program().display()),
                };
                (output, "not started".to_string())
            }
        };

        if task.is_tolerant() {
            self.log
                .record(&command, &output.combined(), &format!("failed ({status}), tolerated"))?;
            warn!(%command, %status, "tolerated step failed");
            Ok(StepOutcome::Tolerated(output))
        } else {
            self.log
                .record(&command, &output.combined(), &format!("failed ({status})"))?;
            Err(BuildError::StepFailed { command, status })
        }
    }
}
