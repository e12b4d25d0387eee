//! PreToolUse hook that denies direct `cargo` invocations in Bash commands and
//! points the agent at the equivalent `just` recipe or `moon` task.
//!
//! The deny reason lists the tasks actually available in the project (from
//! `just --list` and `moon query tasks`), falling back to a static list when
//! neither tool answers.

mod catalog;
mod classify;

use catalog::{format_section, list_tasks, TaskKind};
use classify::{classify, Classification};
use hook_support::{init_tracing, CommandRunner, HookConfig, HookInput, SystemRunner};
use serde_json::{json, Value};
use std::path::Path;
use std::process;
use tracing::debug;

const FALLBACK_COMMANDS: &str = "\
Available commands:
• `just --list` - Show all available development commands
• `moon query tasks` - Show moon task definitions
• `just check` - Format, lint, build, test pipeline
• `just build [CRATE]` - Build workspace or specific crate
• `just test [CRATE]` - Run tests
• `just run [ARGS]` - Run the CLI application";

const ORCHESTRATION_BENEFITS: &str = "\
Using the task orchestration provides:
- Intelligent caching and incremental builds
- Proper dependency resolution between crates
- Parallel execution where possible
- Consistent development workflows";

fn main() {
    init_tracing();

    let input = match HookInput::from_stdin() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let config = HookConfig::resolve(&input);
    if let Some(output) = evaluate(&input, &config, &SystemRunner) {
        println!("{output}");
    }

    process::exit(0);
}

/// Returns the deny decision for a blocked command, `None` to allow.
fn evaluate(input: &HookInput, config: &HookConfig, runner: &dyn CommandRunner) -> Option<Value> {
    if input.tool_name != "Bash" {
        return None;
    }
    let command = input.command()?;

    let Classification::Blocked { suggestion } = classify(command) else {
        return None;
    };
    debug!(command, %suggestion, "denying direct cargo usage");

    let commands = available_commands(&config.project_dir, runner);
    Some(json!({
        "hookSpecificOutput": {
            "hookEventName": "PreToolUse",
            "permissionDecision": "deny",
            "permissionDecisionReason": deny_reason(command, &suggestion, &commands)
        }
    }))
}

fn available_commands(project_dir: &Path, runner: &dyn CommandRunner) -> String {
    let sections: Vec<String> = [TaskKind::Just, TaskKind::Moon]
        .into_iter()
        .filter_map(|kind| format_section(kind, &list_tasks(kind, project_dir, runner)))
        .collect();

    if sections.is_empty() {
        FALLBACK_COMMANDS.to_string()
    } else {
        sections.join("\n\n")
    }
}

fn deny_reason(command: &str, suggestion: &str, commands: &str) -> String {
    format!(
        "Direct cargo usage detected: `{}`\n\n\
         This project uses moon task orchestration through just recipes. {suggestion}\n\n\
         {commands}\n\n\
         {ORCHESTRATION_BENEFITS}",
        command.trim()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
