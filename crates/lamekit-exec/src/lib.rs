//! # lamekit-exec
//!
//! External encoder plumbing for the lamekit pipeline.
//!
//! This crate provides:
//!
//! - **Argument composition** ([`args`]) -- the fixed argument layout and its
//!   shell-quoted rendering for diagnostics.
//! - **Staging** ([`Stager`]) -- single-flight copy of the bundled encoder to
//!   an executable temporary location.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running the encoder.
//! - **Output handling** ([`output`], [`interpret`]) -- output path
//!   allocation and size-based classification of a finished run.

pub mod args;
pub mod command;
pub mod interpret;
pub mod output;
pub mod stager;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use interpret::{classify, record_outcome};
pub use output::resolve_output_path;
pub use stager::{StagedExecutable, Stager};
