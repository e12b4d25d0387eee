//! Per-run configuration, read from the environment once at startup.

use crate::input::HookInput;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Set by the agent to the root of the project it is working in.
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// Log filter for the hooks, e.g. `debug`. Defaults to `warn`.
pub const LOG_ENV: &str = "RUST_WORKFLOW_HOOKS_LOG";

/// Logs go to stderr. Stdout is reserved for the decision JSON.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    pub project_dir: PathBuf,
}

impl HookConfig {
    pub fn resolve(input: &HookInput) -> Self {
        Self::from_sources(env::var(PROJECT_DIR_ENV).ok(), input.cwd.as_deref())
    }

    /// Project directory precedence: environment, then the payload's `cwd`,
    /// then the current directory. Empty values count as unset.
    fn from_sources(env_dir: Option<String>, cwd: Option<&str>) -> Self {
        let project_dir = env_dir
            .filter(|d| !d.is_empty())
            .or_else(|| cwd.filter(|d| !d.is_empty()).map(String::from))
            .unwrap_or_else(|| ".".to_string());

        Self {
            project_dir: PathBuf::from(project_dir),
        }
    }
}
