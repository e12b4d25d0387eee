//! Hook payload read from stdin.
//!
//! Only the fields the hooks look at are modelled. Anything else in the
//! payload is ignored, and missing fields fall back to empty values so that an
//! unexpected event shape reads as "not applicable" rather than as an error.

use serde::Deserialize;
use serde_json::Value;
use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to read stdin: {0}")]
    Read(#[from] io::Error),
    #[error("Invalid JSON input: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Value,
    #[serde(default)]
    pub tool_response: Value,
    #[serde(default)]
    pub cwd: Option<String>,
}

impl HookInput {
    pub fn parse(input: &str) -> Result<Self, HookError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_stdin() -> Result<Self, HookError> {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Self::parse(&input)
    }

    /// Shell command of a `Bash` tool call, if present and non-empty.
    pub fn command(&self) -> Option<&str> {
        self.input_str("command")
    }

    /// Target path of a file-modifying tool call, if present and non-empty.
    pub fn file_path(&self) -> Option<&str> {
        self.input_str("file_path")
    }

    /// Whether the tool reported success. Absent means it did not.
    pub fn succeeded(&self) -> bool {
        self.tool_response
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    fn input_str(&self, key: &str) -> Option<&str> {
        match self.tool_input.get(key).and_then(|v| v.as_str()) {
            Some(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}
