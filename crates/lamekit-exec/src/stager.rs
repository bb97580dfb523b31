//! Staging of the bundled encoder.
//!
//! The bundled encoder lives in a read-only location, so before the first
//! run it is copied to a uniquely named file in a writable directory and
//! made executable. A [`Stager`] remembers that copy for as long as it
//! lives; share one behind an `Arc` to stage at most once per process.
//!
//! The record is guarded by an async mutex held across the whole
//! check-copy-chmod sequence. Concurrent first callers queue on it and find
//! the finished record instead of copying again.

use std::path::{Path, PathBuf};

use lamekit_core::config::{check_permission, EXECUTABLE_FILE_PERMISSION};
use lamekit_core::{EncoderConfig, Error, Result};
use tokio::sync::Mutex;

/// Name prefix of staged encoder copies.
const STAGED_PREFIX: &str = "lame-";

/// A staged copy of the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedExecutable {
    /// Where the copy lives.
    pub location: PathBuf,
    /// Whether the copy has been made executable.
    pub ready: bool,
}

/// Copies the bundled encoder to an executable location, once.
#[derive(Debug)]
pub struct Stager {
    bundled: PathBuf,
    staging_dir: PathBuf,
    mode: u32,
    staged: Mutex<Option<StagedExecutable>>,
}

impl Stager {
    /// Create a stager copying `bundled` into `staging_dir`.
    pub fn new(bundled: impl Into<PathBuf>, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundled: bundled.into(),
            staging_dir: staging_dir.into(),
            mode: EXECUTABLE_FILE_PERMISSION,
            staged: Mutex::new(None),
        }
    }

    /// Create a stager from the encoder configuration.
    pub fn from_config(config: &EncoderConfig) -> Result<Self> {
        Ok(Self::new(config.bundled_binary()?, config.staging_dir())
            .with_permission(config.executable_file_permission))
    }

    /// Builder: set the unix mode granted to the staged copy.
    pub fn with_permission(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// The bundled encoder this stager copies from.
    pub fn bundled(&self) -> &Path {
        &self.bundled
    }

    /// Snapshot of the current staged record, if any.
    pub async fn staged(&self) -> Option<StagedExecutable> {
        self.staged.lock().await.clone()
    }

    /// Return the location of a runnable encoder copy, staging it first if
    /// there is none or the previous copy disappeared from disk.
    ///
    /// # Errors
    ///
    /// - [`Error::Staging`] if the bundled encoder is missing or the copy
    ///   fails.
    /// - [`Error::Permission`] if the copy cannot be made executable.
    ///
    /// A failure leaves no record behind, so the next call tries again.
    pub async fn ensure_ready(&self) -> Result<PathBuf> {
        let mut staged = self.staged.lock().await;

        if let Some(record) = staged.as_ref() {
            if record.ready && tokio::fs::try_exists(&record.location).await.unwrap_or(false) {
                tracing::debug!("Using staged encoder at {}", record.location.display());
                return Ok(record.location.clone());
            }
            tracing::warn!(
                "Staged encoder at {} is gone; staging again",
                record.location.display()
            );
            *staged = None;
        }

        let location = self.stage().await?;
        *staged = Some(StagedExecutable {
            location: location.clone(),
            ready: true,
        });
        Ok(location)
    }

    async fn stage(&self) -> Result<PathBuf> {
        if !tokio::fs::try_exists(&self.bundled).await.unwrap_or(false) {
            return Err(Error::staging(&self.bundled, "bundled encoder not found"));
        }

        let location = self.allocate().await?;

        if let Err(e) = tokio::fs::copy(&self.bundled, &location).await {
            discard(&location).await;
            return Err(Error::staging(
                &location,
                format!("failed to copy {} to {}: {e}", self.bundled.display(), location.display()),
            ));
        }

        if let Err(e) = grant_execute(&location, self.mode).await {
            discard(&location).await;
            return Err(e);
        }

        tracing::info!(
            "Staged encoder {} at {}",
            self.bundled.display(),
            location.display()
        );
        Ok(location)
    }

    /// Reserve a fresh, uniquely named file in the staging directory.
    async fn allocate(&self) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .map_err(|e| {
                Error::staging(&self.staging_dir, format!("failed to create staging dir: {e}"))
            })?;

        let temp = tempfile::Builder::new()
            .prefix(STAGED_PREFIX)
            .tempfile_in(&self.staging_dir)
            .map_err(|e| {
                Error::staging(&self.staging_dir, format!("failed to create temp file: {e}"))
            })?;

        temp.into_temp_path().keep().map_err(|e| {
            Error::staging(&self.staging_dir, format!("failed to keep temp file: {e}"))
        })
    }
}

#[cfg(unix)]
async fn grant_execute(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = check_permission(mode).map_err(|e| Error::permission(path, e.to_string()))?;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .map_err(|e| Error::permission(path, format!("failed to set mode {mode:#o}: {e}")))
}

#[cfg(not(unix))]
async fn grant_execute(path: &Path, mode: u32) -> Result<()> {
    // No execute bit to grant; still reject a nonsensical mode.
    check_permission(mode).map_err(|e| Error::permission(path, e.to_string()))?;
    Ok(())
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::debug!("Could not remove half-staged {}: {e}", path.display());
    }
}
