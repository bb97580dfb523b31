//! Encoder configuration.
//!
//! [`EncoderConfig`] is deserialized from JSON and tells the pipeline where
//! the bundled encoder lives, where to stage it, where auto-named outputs go,
//! which mode the staged copy receives, and how long a run may take. Every
//! field defaults sensibly so an empty `{}` document is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::Error;

/// Mode granted to the staged encoder: read/write/execute for owner, group
/// and world, matching the mode the encoder is bundled with.
pub const EXECUTABLE_FILE_PERMISSION: u32 = 0o777;

/// Default encoder timeout: 5 minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Bundled encoder location relative to the directory of the running binary.
const BUNDLED_RELATIVE_PATH: &str = "bin/lame";

/// Highest value a unix mode (permission bits plus setuid/setgid/sticky) can take.
const MAX_MODE: u32 = 0o7777;

/// Owner execute bit.
const OWNER_EXECUTE: u32 = 0o100;

/// Configuration for the encoder pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Path to the read-only bundled encoder. Defaults to `bin/lame` next to
    /// the running executable.
    pub bundled_path: Option<PathBuf>,
    /// Directory the encoder is staged into. Defaults to the system temp dir.
    pub staging_dir: Option<PathBuf>,
    /// Directory auto-named outputs are created in. Defaults to the system
    /// temp dir.
    pub output_dir: Option<PathBuf>,
    /// Unix mode applied to the staged encoder.
    pub executable_file_permission: u32,
    /// Maximum encoder run time before the process is killed.
    #[serde(with = "duration_secs", rename = "timeout_secs")]
    pub timeout: Duration,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            bundled_path: None,
            staging_dir: None,
            output_dir: None,
            executable_file_permission: EXECUTABLE_FILE_PERMISSION,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Serde helpers to (de)serialize `Duration` as whole seconds.
mod duration_secs {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl EncoderConfig {
    /// Deserialize an `EncoderConfig` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Err(e) = check_permission(self.executable_file_permission) {
            warnings.push(e.to_string());
        }

        if self.timeout.is_zero() {
            warnings.push("timeout_secs is 0; every run will time out immediately".into());
        }

        if let Some(ref bundled) = self.bundled_path {
            if !bundled.exists() {
                warnings.push(format!(
                    "bundled_path {} does not exist",
                    bundled.display()
                ));
            }
        }

        for (name, dir) in [
            ("staging_dir", &self.staging_dir),
            ("output_dir", &self.output_dir),
        ] {
            if let Some(dir) = dir {
                if !dir.is_dir() {
                    warnings.push(format!("{name} {} is not a directory", dir.display()));
                }
            }
        }

        warnings
    }

    /// The bundled encoder path, resolving the default against the directory
    /// of the running executable.
    pub fn bundled_binary(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.bundled_path {
            return Ok(path.clone());
        }
        let exe = std::env::current_exe()?;
        let dir = exe.parent().ok_or_else(|| {
            Error::staging(&exe, "running executable has no parent directory")
        })?;
        Ok(dir.join(BUNDLED_RELATIVE_PATH))
    }

    /// Directory the encoder is staged into.
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Directory auto-named outputs are created in.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Check a unix mode against the platform permission model.
///
/// The mode must fit in the twelve mode bits and must grant the owner
/// execute permission, otherwise the staged encoder could not be run.
pub fn check_permission(mode: u32) -> Result<u32> {
    if mode > MAX_MODE {
        return Err(Error::validation(format!(
            "executable_file_permission {mode:#o} exceeds {MAX_MODE:#o}"
        )));
    }
    if mode & OWNER_EXECUTE == 0 {
        return Err(Error::validation(format!(
            "executable_file_permission {mode:#o} does not grant owner execute"
        )));
    }
    Ok(mode)
}
