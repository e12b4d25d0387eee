//! Detects direct `cargo` invocations that bypass the task orchestration.

use regex::{Regex, RegexSet};
use std::sync::LazyLock;

/// Subcommands with a sanctioned equivalent, in priority order. When a command
/// line contains several, the earliest entry here is the one reported.
const REDIRECTS: &[(&str, &str)] = &[
    ("build", "just build"),
    ("test", "just test"),
    ("check", "just check"),
    ("clippy", "just check"),
    ("fmt", "just check"),
    ("run", "just run"),
    ("clean", "just clean"),
    ("doc", "moon run :doc (if configured)"),
    ("bench", "moon run :bench (if configured)"),
    ("publish", "moon run :publish (if configured)"),
];

const DISCOVERY_SUGGESTION: &str =
    "Use 'just --list' or 'moon query tasks' to find the appropriate task";

/// `cargo` as a standalone word, then any `+toolchain` / `--flag` tokens (a
/// flag may carry a quoted value such as `--config 'build.jobs=4'`), then the
/// whitespace in front of the subcommand.
const CARGO_PREFIX: &str =
    r#"(?i)(?:^|[^\w-])cargo(?:\s+[+-]\S*(?:\s+'[^']*'|\s+"[^"]*")?)*\s+"#;

static REDIRECT_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new(
        REDIRECTS
            .iter()
            .map(|(subcommand, _)| format!(r"{CARGO_PREFIX}{subcommand}\b")),
    )
    .expect("invalid redirect patterns")
});

static ANY_SUBCOMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"{CARGO_PREFIX}\w")).expect("invalid cargo pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Allowed,
    Blocked { suggestion: String },
}

pub fn classify(command: &str) -> Classification {
    let normalized = normalize(command);

    // RegexSet reports matches in pattern order, so the first one is the
    // highest-priority rule.
    if let Some(index) = REDIRECT_SET.matches(&normalized).iter().next() {
        let (_, equivalent) = REDIRECTS[index];
        return Classification::Blocked {
            suggestion: format!("Use '{equivalent}' instead of direct cargo usage"),
        };
    }

    if ANY_SUBCOMMAND.is_match(&normalized) {
        return Classification::Blocked {
            suggestion: DISCOVERY_SUGGESTION.to_string(),
        };
    }

    Classification::Allowed
}

fn normalize(command: &str) -> String {
    command.split_whitespace().collect::<Vec<_>>().join(" ")
}
