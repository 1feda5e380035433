//! The raw process-execution primitive.

use std::io;
use std::process::{Command, Stdio};

use crate::task::BuildTask;

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.clone();
        if !out.is_empty() && !out.ends_with('\n') && !self.stderr.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.stderr);
        out
    }

    /// Short description of how the process ended.
    pub fn status_label(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs a [`BuildTask`] to completion and captures its output.
///
/// Implementations report only spawn problems as `Err`; a non-zero exit is a
/// successful run with an unsuccessful [`ProcessOutput`].
pub trait ProcessRunner {
    fn run(&self, task: &BuildTask) -> io::Result<ProcessOutput>;
}

/// Runs tasks as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, task: &BuildTask) -> io::Result<ProcessOutput> {
        let mut command = Command::new(task.program());
        command
            .args(task.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = task.working_dir() {
            command.current_dir(dir);
        }

        let output = command.output()?;
        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
