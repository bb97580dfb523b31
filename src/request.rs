//! JSON invocation requests.
//!
//! A request mirrors the options object callers hand to the encoder:
//!
//! ```json
//! {
//!   "input":  { "path": "/tmp/in.wav", "parameters": ["--silent"] },
//!   "output": { "postfix": ".mp3", "parameters": ["-V", "2"] }
//! }
//! ```

use serde::{Deserialize, Serialize};

use lamekit_core::{Error, InputDescriptor, OutputDescriptor, Result};

/// An input/output descriptor pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    #[serde(default)]
    pub input: InputDescriptor,
    #[serde(default)]
    pub output: OutputDescriptor,
}

impl InvocationRequest {
    /// Deserialize a request from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("request parse error: {e}")))
    }
}
