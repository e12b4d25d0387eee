//! Workspace check after an edit: `moon run :lint`, or `cargo check` when moon
//! is not installed.

use hook_support::{CommandOutput, CommandRunner, RunError};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub const CHECK_TIMEOUT: Duration = Duration::from_secs(30);

const LINT: (&str, &[&str]) = ("moon", &["run", ":lint"]);
const CARGO_CHECK: (&str, &[&str]) = ("cargo", &["check", "--workspace", "--all-targets"]);

pub const UNAVAILABLE_MESSAGE: &str = "Could not run Rust compiler check";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub has_issues: bool,
    pub output: String,
}

impl CheckOutcome {
    fn clean() -> Self {
        Self {
            has_issues: false,
            output: String::new(),
        }
    }

    fn issues(output: impl Into<String>) -> Self {
        Self {
            has_issues: true,
            output: output.into(),
        }
    }

    fn from_exit(output: CommandOutput) -> Self {
        if output.success() {
            return Self::clean();
        }
        let stderr = output.stderr.trim();
        if stderr.is_empty() {
            Self::issues(output.stdout.trim())
        } else {
            Self::issues(stderr)
        }
    }
}

pub fn timed_out_message() -> String {
    format!("Rust check timed out after {} seconds", CHECK_TIMEOUT.as_secs())
}

/// Never fails: a check that cannot run is itself reported as an issue.
pub fn run_check(project_dir: &Path, runner: &dyn CommandRunner) -> CheckOutcome {
    let (program, args) = LINT;
    match runner.run(program, args, project_dir, CHECK_TIMEOUT) {
        Ok(output) => CheckOutcome::from_exit(output),
        Err(RunError::TimedOut { .. }) => CheckOutcome::issues(timed_out_message()),
        Err(err) => {
            debug!(%err, "falling back to cargo check");
            run_cargo_check(project_dir, runner)
        }
    }
}

fn run_cargo_check(project_dir: &Path, runner: &dyn CommandRunner) -> CheckOutcome {
    let (program, args) = CARGO_CHECK;
    match runner.run(program, args, project_dir, CHECK_TIMEOUT) {
        Ok(output) => CheckOutcome::from_exit(output),
        Err(err) => {
            warn!(%err, "no compiler check available");
            CheckOutcome::issues(UNAVAILABLE_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hook_support::testing::ScriptedRunner;

    fn check(runner: &ScriptedRunner) -> CheckOutcome {
        run_check(Path::new("/work/tram"), runner)
    }

    // -- Primary tier ---------------------------------------------------------

    #[test]
    fn clean_lint_has_no_issues() {
        let runner = ScriptedRunner::new().then_exit(0, "Tasks: 1 completed", "");
        assert_eq!(check(&runner), CheckOutcome::clean());
        assert_eq!(runner.calls(), ["moon run :lint"]);
    }

    #[test]
    fn failed_lint_prefers_stderr() {
        let runner = ScriptedRunner::new().then_exit(1, "stdout text", "\nwarning: unused\n");
        let outcome = check(&runner);
        assert!(outcome.has_issues);
        assert_eq!(outcome.output, "warning: unused");
    }

    #[test]
    fn failed_lint_falls_back_to_stdout() {
        let runner = ScriptedRunner::new().then_exit(1, "  error: boom  ", "   ");
        assert_eq!(check(&runner), CheckOutcome::issues("error: boom"));
    }

    #[test]
    fn lint_timeout_is_reported_without_fallback() {
        let runner = ScriptedRunner::new().then_timeout("moon");
        let outcome = check(&runner);
        assert!(outcome.has_issues);
        assert_eq!(outcome.output, "Rust check timed out after 30 seconds");
        assert_eq!(runner.calls().len(), 1);
    }

    // -- Fallback tier --------------------------------------------------------

    #[test]
    fn missing_moon_runs_cargo_check_once() {
        let runner = ScriptedRunner::new()
            .then_not_found("moon")
            .then_exit(101, "", "error[E0425]: cannot find value `x`");
        let outcome = check(&runner);
        assert!(outcome.has_issues);
        assert_eq!(outcome.output, "error[E0425]: cannot find value `x`");
        assert_eq!(
            runner.calls(),
            ["moon run :lint", "cargo check --workspace --all-targets"]
        );
    }

    #[test]
    fn clean_cargo_check() {
        let runner = ScriptedRunner::new()
            .then_not_found("moon")
            .then_exit(0, "", "Finished dev profile");
        assert_eq!(check(&runner), CheckOutcome::clean());
    }

    #[test]
    fn launch_error_also_falls_back() {
        let runner = ScriptedRunner::new()
            .then(Err(RunError::Io {
                program: "moon".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            }))
            .then_exit(0, "", "");
        assert_eq!(check(&runner), CheckOutcome::clean());
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn both_tiers_unavailable() {
        let runner = ScriptedRunner::new()
            .then_not_found("moon")
            .then_not_found("cargo");
        assert_eq!(check(&runner), CheckOutcome::issues(UNAVAILABLE_MESSAGE));
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn cargo_check_timeout_is_unavailable() {
        let runner = ScriptedRunner::new()
            .then_not_found("moon")
            .then_timeout("cargo");
        assert_eq!(check(&runner), CheckOutcome::issues(UNAVAILABLE_MESSAGE));
    }
}
