//! Scripted [`CommandRunner`] for hook tests.

use crate::process::{CommandOutput, CommandRunner, RunError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

/// Replays queued results in order and records every invocation as
/// `"program arg1 arg2"`. Once the queue is empty every call is `NotFound`.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    results: RefCell<VecDeque<Result<CommandOutput, RunError>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, result: Result<CommandOutput, RunError>) -> Self {
        self.results.borrow_mut().push_back(result);
        self
    }

    pub fn then_exit(self, code: i32, stdout: &str, stderr: &str) -> Self {
        self.then(Ok(CommandOutput {
            code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }))
    }

    pub fn then_not_found(self, program: &str) -> Self {
        self.then(Err(RunError::NotFound {
            program: program.to_string(),
        }))
    }

    pub fn then_timeout(self, program: &str) -> Self {
        self.then(Err(RunError::TimedOut {
            program: program.to_string(),
            timeout: Duration::from_secs(1),
        }))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: &Path,
        _timeout: Duration,
    ) -> Result<CommandOutput, RunError> {
        let mut call = program.to_string();
        for arg in args {
            call.push(' ');
            call.push_str(arg);
        }
        self.calls.borrow_mut().push(call);

        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RunError::NotFound {
                    program: program.to_string(),
                })
            })
    }
}
