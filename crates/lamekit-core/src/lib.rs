//! lamekit-core: shared types, errors and configuration.
//!
//! This crate is the foundational dependency for the other lamekit crates,
//! providing the unified error type, encoder configuration, and the
//! descriptors and result record that flow through an invocation.

pub mod config;
pub mod error;
pub mod invocation;

// Re-export the most commonly used items at the crate root.
pub use config::EncoderConfig;
pub use error::{Error, ErrorKind, Result};
pub use invocation::{InputDescriptor, InvocationResult, OutputDescriptor, Stage};
