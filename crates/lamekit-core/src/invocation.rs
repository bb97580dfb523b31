//! Descriptors and result record for a single encoder invocation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};

/// The file to encode and the arguments that precede it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    /// Path to the input file. Must exist.
    pub path: PathBuf,
    /// Opaque encoder arguments placed before the input path.
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl InputDescriptor {
    /// Create a descriptor with no parameters.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parameters: Vec::new(),
        }
    }

    /// Builder: set the input parameters.
    pub fn with_parameters(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.parameters = params.into_iter().map(Into::into).collect();
        self
    }

    /// Check that the path is set and points at an existing file.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() || !self.path.exists() {
            return Err(Error::validation("input.path not set or not found"));
        }
        Ok(())
    }
}

/// Where the encoder writes, and the arguments that precede the output path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    /// Explicit output path. Takes precedence over `postfix`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Suffix for a generated output file, used only when `path` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postfix: Option<String>,
    /// Opaque encoder arguments placed before the output path.
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl OutputDescriptor {
    /// Write to an explicit path.
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Write to a generated file ending in `postfix`.
    pub fn with_postfix(postfix: impl Into<String>) -> Self {
        Self {
            postfix: Some(postfix.into()),
            ..Default::default()
        }
    }

    /// Builder: set the output parameters.
    pub fn with_parameters(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.parameters = params.into_iter().map(Into::into).collect();
        self
    }

    /// The explicit path, ignoring an empty one.
    pub fn explicit_path(&self) -> Option<&Path> {
        self.path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// The postfix, ignoring an empty one.
    pub fn postfix(&self) -> Option<&str> {
        self.postfix.as_deref().filter(|p| !p.is_empty())
    }

    /// Check that at least one of `path` / `postfix` can produce an output path.
    pub fn validate(&self) -> Result<()> {
        if self.explicit_path().is_none() && self.postfix().is_none() {
            return Err(Error::validation("output.path and output.postfix not set"));
        }
        Ok(())
    }
}

/// Stage of the invocation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Staging,
    Composing,
    Executing,
    Interpreting,
    Delivered,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Validating => "validating",
            Stage::Staging => "staging",
            Stage::Composing => "composing",
            Stage::Executing => "executing",
            Stage::Interpreting => "interpreting",
            Stage::Delivered => "delivered",
        };
        f.write_str(s)
    }
}

/// Terminal outcome of one invocation.
///
/// Built up while the pipeline runs and handed to the caller once; there is
/// no way to mutate it after delivery since the caller receives it by value.
#[derive(Debug)]
pub struct InvocationResult {
    /// Set if and only if some stage failed.
    pub error: Option<Error>,
    /// Size of the output file in bytes (0 when unknown or failed).
    pub output_size: u64,
    /// Resolved output path (empty only when validation failed).
    pub output_path: PathBuf,
    /// Captured encoder stdout.
    pub stdout: String,
    /// Captured encoder stderr.
    pub stderr: String,
    /// Shell-quoted rendering of the executed command, for diagnostics.
    pub command: String,
    /// Encoder exit code, when the process ran to completion.
    pub exit_code: Option<i32>,
    /// Last stage the pipeline entered.
    pub stage: Stage,
}

impl Default for InvocationResult {
    fn default() -> Self {
        Self {
            error: None,
            output_size: 0,
            output_path: PathBuf::new(),
            stdout: String::new(),
            stderr: String::new(),
            command: String::new(),
            exit_code: None,
            stage: Stage::Validating,
        }
    }
}

impl InvocationResult {
    /// Whether the encoder produced a non-empty output file.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Failure class, if the invocation failed.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(Error::kind)
    }

    /// Record `err` as the outcome, zeroing the output size.
    pub fn fail(&mut self, err: Error) {
        self.output_size = 0;
        self.error = Some(err);
    }
}
