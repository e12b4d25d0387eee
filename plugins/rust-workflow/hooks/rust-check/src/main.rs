//! PostToolUse hook that checks the workspace after a Rust file is edited and
//! blocks with the compiler diagnostics for that file.
//!
//! Diagnostics for other files are filtered out so the agent only sees what it
//! just broke. When the check fails but nothing can be attributed to the edited
//! file, the agent is pointed at `just check` instead.

mod check;
mod extract;

use check::run_check;
use extract::{extract, mentions_diagnostics, render};
use hook_support::{init_tracing, CommandRunner, HookConfig, HookInput, SystemRunner};
use serde_json::{json, Value};
use std::path::Path;
use std::process;
use tracing::debug;

const EDIT_TOOLS: &[&str] = &["Edit", "MultiEdit", "Write"];

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

fn evaluate(input: &HookInput, config: &HookConfig, runner: &dyn CommandRunner) -> Option<Value> {
    if !input.succeeded() || !EDIT_TOOLS.contains(&input.tool_name.as_str()) {
        return None;
    }
    let file_path = input.file_path().filter(|p| is_rust_file(p))?;

    let outcome = run_check(&config.project_dir, runner);
    if !outcome.has_issues {
        debug!(file_path, "check clean");
        return None;
    }

    feedback(file_path, &outcome.output)
}

fn is_rust_file(path: &str) -> bool {
    path.ends_with(".rs")
}

/// Block decision for a failed check, `None` when the output has nothing that
/// looks like a diagnostic.
fn feedback(file_path: &str, output: &str) -> Option<Value> {
    let file_name = Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string());

    let blocks = extract(output, file_path);
    if !blocks.is_empty() {
        debug!(
            file_path,
            count = blocks.len(),
            first = blocks[0].header(),
            "diagnostics for edited file"
        );
        return Some(json!({
            "decision": "block",
            "reason": format!(
                "Rust compiler issues detected in {file_name}:\n\n{}\n\nPlease fix these issues immediately.",
                render(&blocks)
            ),
            "hookSpecificOutput": {
                "hookEventName": "PostToolUse",
                "additionalContext": format!(
                    "The file {file_path} has compilation issues that need to be addressed."
                )
            }
        }));
    }

    if mentions_diagnostics(output) {
        return Some(json!({
            "decision": "block",
            "reason": format!(
                "Rust compiler issues detected in workspace after editing {file_name}. \
                 Please run 'just check' to see all issues and fix them."
            ),
            "hookSpecificOutput": {
                "hookEventName": "PostToolUse",
                "additionalContext": "There are compilation issues in the workspace that may be related to recent changes."
            }
        }));
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
