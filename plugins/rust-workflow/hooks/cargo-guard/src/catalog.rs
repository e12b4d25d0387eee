//! Task discovery from `just --list` and `moon query tasks`.
//!
//! Discovery only enriches the deny message. Every failure degrades to an
//! empty list.

use hook_support::CommandRunner;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

pub const LIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Keeps the deny message readable in large moon workspaces.
const MOON_TASK_LIMIT: usize = 10;

static MOON_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9_-]*):([A-Za-z0-9_-]+)").expect("invalid moon target pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// `just` recipes, the primary entry point.
    Just,
    /// `moon` tasks behind the recipes.
    Moon,
}

impl TaskKind {
    fn program(self) -> &'static str {
        match self {
            TaskKind::Just => "just",
            TaskKind::Moon => "moon",
        }
    }

    fn list_args(self) -> &'static [&'static str] {
        match self {
            TaskKind::Just => &["--list"],
            TaskKind::Moon => &["query", "tasks"],
        }
    }

    /// Command that runs a listed task by name.
    pub fn invocation(self, name: &str) -> String {
        match self {
            TaskKind::Just => format!("just {name}"),
            TaskKind::Moon => format!("moon run {name}"),
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            TaskKind::Just => "Available just commands:",
            TaskKind::Moon => "Available moon tasks:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub name: String,
    pub description: Option<String>,
}

impl TaskDescriptor {
    fn new(name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
        }
    }
}

pub fn list_tasks(
    kind: TaskKind,
    project_dir: &Path,
    runner: &dyn CommandRunner,
) -> Vec<TaskDescriptor> {
    let program = kind.program();
    let output = match runner.run(program, kind.list_args(), project_dir, LIST_TIMEOUT) {
        Ok(output) if output.success() => output,
        Ok(output) => {
            debug!(program, code = ?output.code, "task listing failed");
            return Vec::new();
        }
        Err(err) => {
            debug!(%err, "task listing unavailable");
            return Vec::new();
        }
    };

    match kind {
        TaskKind::Just => parse_just_list(&output.stdout),
        TaskKind::Moon => parse_moon_tasks(&output.stdout),
    }
}

/// Bulleted section for the deny message, `None` when there is nothing to show.
pub fn format_section(kind: TaskKind, tasks: &[TaskDescriptor]) -> Option<String> {
    if tasks.is_empty() {
        return None;
    }

    let mut section = kind.heading().to_string();
    for task in tasks {
        section.push_str(&format!("\n• `{}`", kind.invocation(&task.name)));
        if let Some(description) = &task.description {
            section.push_str(&format!(" - {description}"));
        }
    }
    Some(section)
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// `just --list` prints one recipe per line as `name [params] [# description]`
/// under an `Available recipes:` header, optionally split into `[group]`s.
pub fn parse_just_list(stdout: &str) -> Vec<TaskDescriptor> {
    let mut tasks = Vec::new();
    let mut seen = HashSet::new();

    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() || is_just_header(line) {
            continue;
        }

        let Some(name) = line.split_whitespace().next() else {
            continue;
        };
        if name.starts_with('#') {
            continue;
        }

        let description = line.split_once('#').map(|(_, rest)| rest);
        if seen.insert(name.to_string()) {
            tasks.push(TaskDescriptor::new(name, description));
        }
    }

    tasks
}

fn is_just_header(line: &str) -> bool {
    line.starts_with("Available recipes:") || (line.starts_with('[') && line.ends_with(']'))
}

/// `moon query tasks` output is looser; any `project:task` target on a line
/// counts, skipping status and summary lines.
pub fn parse_moon_tasks(stdout: &str) -> Vec<TaskDescriptor> {
    let mut tasks = Vec::new();
    let mut seen = HashSet::new();

    for line in stdout.lines() {
        let line = line.trim();
        if !line.contains(':') || line.starts_with('✓') || line.starts_with("Tasks:") {
            continue;
        }

        let Some(caps) = MOON_TARGET.captures(line) else {
            continue;
        };
        let name = format!("{}:{}", &caps[1], &caps[2]);

        if seen.insert(name.clone()) {
            tasks.push(TaskDescriptor::new(name, None));
            if tasks.len() == MOON_TASK_LIMIT {
                break;
            }
        }
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use hook_support::testing::ScriptedRunner;

    fn names(tasks: &[TaskDescriptor]) -> Vec<&str> {
        tasks.iter().map(|t| t.name.as_str()).collect()
    }

    // -- just -----------------------------------------------------------------

    const JUST_LIST: &str = "\
Available recipes:
    build CRATE='' # Build workspace or specific crate
    check          # Format, lint, build, test pipeline
    run *ARGS      # Run the CLI application
    test CRATE=''
";

    #[test]
    fn parses_just_recipes() {
        let tasks = parse_just_list(JUST_LIST);
        assert_eq!(names(&tasks), ["build", "check", "run", "test"]);
        assert_eq!(
            tasks[0].description.as_deref(),
            Some("Build workspace or specific crate")
        );
        assert_eq!(tasks[3].description, None);
    }

    #[test]
    fn skips_just_group_headers() {
        let stdout = "Available recipes:\n    [dev]\n    fmt # Format\n    [release]\n    dist\n";
        assert_eq!(names(&parse_just_list(stdout)), ["fmt", "dist"]);
    }

    #[test]
    fn description_splits_on_first_hash() {
        let tasks = parse_just_list("tag # bump #patch version\n");
        assert_eq!(tasks[0].description.as_deref(), Some("bump #patch version"));
    }

    #[test]
    fn just_duplicates_keep_first() {
        let tasks = parse_just_list("build # first\nlint\nbuild # second\n");
        assert_eq!(names(&tasks), ["build", "lint"]);
        assert_eq!(tasks[0].description.as_deref(), Some("first"));
    }

    #[test]
    fn empty_just_output() {
        assert!(parse_just_list("").is_empty());
        assert!(parse_just_list("Available recipes:\n\n").is_empty());
    }

    // -- moon -----------------------------------------------------------------

    #[test]
    fn parses_moon_targets() {
        let stdout = "\
Tasks: 4
tram:build | cargo build
tram:test | cargo test
:lint
✓ cache: hit
";
        let tasks = parse_moon_tasks(stdout);
        assert_eq!(names(&tasks), ["tram:build", "tram:test", ":lint"]);
        assert!(tasks.iter().all(|t| t.description.is_none()));
    }

    #[test]
    fn moon_duplicates_keep_first() {
        let stdout = "tram:build\ntram-core:test\ntram:build\n";
        assert_eq!(
            names(&parse_moon_tasks(stdout)),
            ["tram:build", "tram-core:test"]
        );
    }

    #[test]
    fn moon_caps_at_ten_unique() {
        let stdout: String = (0..15)
            .flat_map(|i| [format!("app:task{i}"), format!("app:task{i}")])
            .collect::<Vec<_>>()
            .join("\n");
        let tasks = parse_moon_tasks(&stdout);
        assert_eq!(tasks.len(), 10);
        assert_eq!(tasks[0].name, "app:task0");
        assert_eq!(tasks[9].name, "app:task9");
    }

    #[test]
    fn moon_ignores_lines_without_targets() {
        assert!(parse_moon_tasks("no colon here\nurl http://\n").is_empty());
    }

    // -- list_tasks -----------------------------------------------------------

    #[test]
    fn runs_listing_command() {
        let runner = ScriptedRunner::new().then_exit(0, JUST_LIST, "");
        let tasks = list_tasks(TaskKind::Just, Path::new("/work"), &runner);
        assert_eq!(tasks.len(), 4);
        assert_eq!(runner.calls(), ["just --list"]);

        let runner = ScriptedRunner::new().then_exit(0, "tram:build\n", "");
        let tasks = list_tasks(TaskKind::Moon, Path::new("/work"), &runner);
        assert_eq!(names(&tasks), ["tram:build"]);
        assert_eq!(runner.calls(), ["moon query tasks"]);
    }

    #[test]
    fn failures_yield_empty_list() {
        let runner = ScriptedRunner::new().then_not_found("just");
        assert!(list_tasks(TaskKind::Just, Path::new("."), &runner).is_empty());

        let runner = ScriptedRunner::new().then_timeout("moon");
        assert!(list_tasks(TaskKind::Moon, Path::new("."), &runner).is_empty());

        let runner = ScriptedRunner::new().then_exit(1, JUST_LIST, "error: no justfile");
        assert!(list_tasks(TaskKind::Just, Path::new("."), &runner).is_empty());
    }

    // -- format_section -------------------------------------------------------

    #[test]
    fn formats_bullets() {
        let tasks = parse_just_list(JUST_LIST);
        let section = format_section(TaskKind::Just, &tasks[..2]).unwrap();
        assert_eq!(
            section,
            "Available just commands:\n\
             • `just build` - Build workspace or specific crate\n\
             • `just check` - Format, lint, build, test pipeline"
        );

        let tasks = parse_moon_tasks(":lint\n");
        let section = format_section(TaskKind::Moon, &tasks).unwrap();
        assert_eq!(section, "Available moon tasks:\n• `moon run :lint`");
    }

    #[test]
    fn empty_section_is_none() {
        assert!(format_section(TaskKind::Just, &[]).is_none());
    }
}
