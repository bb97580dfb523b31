//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which lays out a scratch directory holding a
//! mock "bundled" encoder script, an input file, and separate staging and
//! output directories, then builds an [`Encoder`] pointed at them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use lamekit::{Encoder, EncoderConfig};
use tempfile::TempDir;

/// Install a test-friendly tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "lamekit=debug,lamekit_exec=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Mock encoder that writes `n` bytes to its last argument and exits 0.
pub fn writes_bytes(n: usize) -> String {
    format!(
        "#!/bin/sh\nfor last; do :; done\nhead -c {n} /dev/zero > \"$last\"\necho \"wrote {n}\"\nexit 0\n"
    )
}

/// Mock encoder that truncates its output to zero bytes and exits 0.
pub fn writes_nothing() -> String {
    "#!/bin/sh\nfor last; do :; done\n: > \"$last\"\nexit 0\n".into()
}

/// Mock encoder that complains on stderr and exits 1 without output.
pub fn fails_loudly() -> String {
    "#!/bin/sh\necho \"Could not find input\" >&2\nexit 1\n".into()
}

/// Mock encoder that never finishes in time.
pub fn hangs() -> String {
    "#!/bin/sh\nsleep 30\n".into()
}

/// Mock encoder that records each argument on its own line in `record`,
/// then writes a small output file.
pub fn records_args(record: &Path) -> String {
    format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\nfor last; do :; done\nprintf 'ID3' > \"$last\"\n",
        record.display()
    )
}

/// Scratch layout plus an encoder configured against it.
pub struct TestHarness {
    pub dir: TempDir,
    pub bundled: PathBuf,
    pub input: PathBuf,
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
    pub encoder: Encoder,
}

impl TestHarness {
    /// Create a harness whose bundled encoder is `script`.
    pub fn new(script: &str) -> Self {
        Self::with_timeout(script, Duration::from_secs(30))
    }

    /// Create a harness with a custom encoder timeout.
    pub fn with_timeout(script: &str, timeout: Duration) -> Self {
        init_tracing();

        let dir = tempfile::tempdir().expect("failed to create scratch dir");
        let bundled = dir.path().join("bin").join("lame");
        std::fs::create_dir_all(bundled.parent().unwrap()).unwrap();
        std::fs::write(&bundled, script).unwrap();

        let input = dir.path().join("input song.wav");
        std::fs::write(&input, b"RIFF....WAVEfmt ").unwrap();

        let staging_dir = dir.path().join("stage");
        let output_dir = dir.path().join("out");

        let config = EncoderConfig {
            bundled_path: Some(bundled.clone()),
            staging_dir: Some(staging_dir.clone()),
            output_dir: Some(output_dir.clone()),
            timeout,
            ..Default::default()
        };
        let encoder = Encoder::new(config).expect("failed to build encoder");

        Self {
            dir,
            bundled,
            input,
            staging_dir,
            output_dir,
            encoder,
        }
    }

    /// Path inside the scratch dir.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Files staged so far.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.staging_dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Files in the output dir.
    pub fn output_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.output_dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}
