//! Shared plumbing for the rust-workflow hooks: hook payload parsing, run
//! configuration, logging setup and the subprocess seam.

pub mod config;
pub mod input;
pub mod process;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{init_tracing, HookConfig};
pub use input::{HookError, HookInput};
pub use process::{CommandOutput, CommandRunner, RunError, SystemRunner};
