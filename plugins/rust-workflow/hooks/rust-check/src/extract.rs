//! Picks the compiler diagnostics that belong to one file out of raw
//! `cargo`/`clippy` output.
//!
//! Output is read one line at a time by a small state machine. A diagnostic
//! starts at a severity header (`warning: ...`, `error[E0308]: ...`, or the
//! short form `src/lib.rs:3:5: warning: ...`) and runs to the next blank line. It is kept when the header or its `-->` locus line
//! names the edited file. The locus has the final say: a header that mentions
//! the file but points somewhere else is dropped.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:warning|error)(?:\[[A-Za-z0-9]+\])?:").expect("invalid header pattern")
});

/// One diagnostic, header line first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticBlock {
    lines: Vec<String>,
}

impl DiagnosticBlock {
    pub fn header(&self) -> &str {
        &self.lines[0]
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

pub fn extract(output: &str, edited_file: &str) -> Vec<DiagnosticBlock> {
    let mut extractor = Extractor::new(edited_file);
    for line in output.lines() {
        extractor.feed(line);
    }
    extractor.finish()
}

/// Blocks separated by one blank line. Nothing follows the last block, even
/// when it was closed by a blank line in the output; callers add their own
/// spacing after it.
pub fn render(blocks: &[DiagnosticBlock]) -> String {
    blocks
        .iter()
        .map(|block| block.lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whether the output carries any diagnostic at all, for whichever file.
pub fn mentions_diagnostics(output: &str) -> bool {
    let lower = output.to_lowercase();
    lower.contains("warning:") || lower.contains("error:")
}

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Header,
    Locus,
    Continuation,
    Other,
}

fn line_kind(line: &str) -> LineKind {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        LineKind::Blank
    } else if trimmed.starts_with("-->") {
        LineKind::Locus
    } else if is_continuation(line) || is_sub_diagnostic(line) {
        // Snippets quote source, so `let error: u8` must not open a block.
        LineKind::Continuation
    } else if HEADER.is_match(line) {
        LineKind::Header
    } else {
        LineKind::Other
    }
}

/// Snippet and gutter lines: indented, `12 | code`, `| ^^^`, `= note: ...`
/// and `...` elisions.
fn is_continuation(line: &str) -> bool {
    if line.starts_with([' ', '\t']) || line.starts_with("...") {
        return true;
    }
    let after_line_number = line.trim_start_matches(|c: char| c.is_ascii_digit());
    let gutter = after_line_number.trim_start();
    gutter.starts_with('|') || gutter.starts_with('=')
}

/// Flush-left `help:` and `note:` lines belong to the diagnostic above them.
fn is_sub_diagnostic(line: &str) -> bool {
    line.starts_with("help:") || line.starts_with("note:")
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between diagnostics, or inside one that was rejected.
    Idle,
    /// Header seen without a file reference; waiting for the locus line.
    Pending,
    /// Inside a diagnostic attributed to the edited file.
    Capturing,
}

struct Target<'a> {
    path: &'a str,
    name: &'a str,
}

impl<'a> Target<'a> {
    fn new(path: &'a str) -> Self {
        let name = Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path);
        Self { path, name }
    }

    fn is_named_in(&self, line: &str) -> bool {
        (!self.name.is_empty() && line.contains(self.name))
            || (!self.path.is_empty() && line.contains(self.path))
    }
}

struct Extractor<'a> {
    target: Target<'a>,
    state: State,
    current: Vec<String>,
    blocks: Vec<DiagnosticBlock>,
}

impl<'a> Extractor<'a> {
    fn new(edited_file: &'a str) -> Self {
        Self {
            target: Target::new(edited_file),
            state: State::Idle,
            current: Vec::new(),
            blocks: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        match (line_kind(line), self.state) {
            (LineKind::Header, state) => {
                // A new header ends a diagnostic that had no blank line after it.
                if state == State::Capturing {
                    self.emit();
                }
                self.current = vec![line.to_string()];
                self.state = if self.target.is_named_in(line) {
                    State::Capturing
                } else {
                    State::Pending
                };
            }
            (LineKind::Locus, State::Pending | State::Capturing) => {
                if self.target.is_named_in(line) {
                    self.current.push(line.to_string());
                    self.state = State::Capturing;
                } else {
                    self.discard();
                }
            }
            (LineKind::Continuation, State::Capturing) => self.current.push(line.to_string()),
            (LineKind::Blank, State::Capturing) => self.emit(),
            // The locus has to come straight after the header.
            (_, State::Pending) => self.discard(),
            _ => {}
        }
    }

    fn finish(mut self) -> Vec<DiagnosticBlock> {
        if self.state == State::Capturing {
            self.emit();
        }
        self.blocks
    }

    fn emit(&mut self) {
        let lines = std::mem::take(&mut self.current);
        if !lines.is_empty() {
            self.blocks.push(DiagnosticBlock { lines });
        }
        self.state = State::Idle;
    }

    fn discard(&mut self) {
        self.current.clear();
        self.state = State::Idle;
    }
}
