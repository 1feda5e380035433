//! A recording [`ProcessRunner`] for tests.
//!
//! `ScriptedRunner` never starts a process. It records every task it is
//! asked to run and answers from rules registered up front; a task that no
//! rule matches succeeds with empty output. Clones share state, so a test
//! can hand one clone to the pipeline and inspect the calls through another.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::process::{ProcessOutput, ProcessRunner};
use crate::task::BuildTask;

type Matcher = Box<dyn Fn(&BuildTask) -> bool + Send>;

enum Response {
    Fail(i32),
    Stdout(String),
    SpawnError,
}

struct Rule {
    matches: Matcher,
    response: Response,
}

#[derive(Default)]
struct State {
    calls: Vec<BuildTask>,
    rules: Vec<Rule>,
}

#[derive(Clone, Default)]
pub struct ScriptedRunner {
    state: Arc<Mutex<State>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, matches: Matcher, response: Response) -> &Self {
        self.state().rules.push(Rule { matches, response });
        self
    }

    /// Tasks matching `predicate` exit with status 1.
    pub fn fail_when(&self, predicate: impl Fn(&BuildTask) -> bool + Send + 'static) -> &Self {
        self.push(Box::new(predicate), Response::Fail(1))
    }

    /// Tasks matching `predicate` succeed and print `stdout`.
    pub fn respond_when(
        &self,
        predicate: impl Fn(&BuildTask) -> bool + Send + 'static,
        stdout: impl Into<String>,
    ) -> &Self {
        self.push(Box::new(predicate), Response::Stdout(stdout.into()))
    }

    /// Tasks matching `predicate` cannot be started.
    pub fn missing_when(&self, predicate: impl Fn(&BuildTask) -> bool + Send + 'static) -> &Self {
        self.push(Box::new(predicate), Response::SpawnError)
    }

    /// Every task run so far, in order.
    pub fn calls(&self) -> Vec<BuildTask> {
        self.state().calls.clone()
    }

    /// Tasks run so far whose program is named `name`.
    pub fn calls_to(&self, name: &str) -> Vec<BuildTask> {
        self.state()
            .calls
            .iter()
            .filter(|t| t.program_name() == name)
            .cloned()
            .collect()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, task: &BuildTask) -> io::Result<ProcessOutput> {
        let mut state = self.state();
        state.calls.push(task.clone());

        // First matching rule wins.
        let response = state.rules.iter().find(|r| (r.matches)(task)).map(|r| &r.response);
        match response {
            None => Ok(ProcessOutput {
                code: Some(0),
                ..ProcessOutput::default()
            }),
            Some(Response::Stdout(stdout)) => Ok(ProcessOutput {
                code: Some(0),
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            Some(Response::Fail(code)) => Ok(ProcessOutput {
                code: Some(*code),
                stdout: String::new(),
                stderr: format!("{}: scripted failure\n", task.program_name()),
            }),
            Some(Response::SpawnError) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", task.program_name()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_tasks_succeed_silently() {
        let runner = ScriptedRunner::new();
        let out = runner.run(&BuildTask::strict("true")).unwrap();
        assert!(out.success());
        assert!(out.stdout.is_empty());
    }

    #[test]
    fn first_matching_rule_wins() {
        let runner = ScriptedRunner::new();
        runner
            .respond_when(|t| t.has_arg("--version"), "Swift version 5.9")
            .fail_when(|t| t.program_name() == "swift");

        assert_eq!(
            runner.run(&BuildTask::strict("swift").arg("--version")).unwrap().stdout,
            "Swift version 5.9"
        );
        assert!(!runner.run(&BuildTask::strict("swift").arg("build")).unwrap().success());
    }

    #[test]
    fn clones_share_recorded_calls() {
        let runner = ScriptedRunner::new();
        let handle = runner.clone();
        runner.run(&BuildTask::strict("xcodebuild").arg("archive")).unwrap();
        runner.run(&BuildTask::strict("cp")).unwrap();

        assert_eq!(handle.calls().len(), 2);
        assert_eq!(handle.calls_to("xcodebuild").len(), 1);
    }

    #[test]
    fn missing_programs_fail_to_spawn() {
        let runner = ScriptedRunner::new();
        runner.missing_when(|_| true);
        assert!(runner.run(&BuildTask::strict("xcode-select")).is_err());
    }
}
