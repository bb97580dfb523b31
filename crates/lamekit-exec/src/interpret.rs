//! Classification of a finished encoder run.
//!
//! The encoder's exit status does not reliably signal failure: some bad
//! invocations exit zero and leave an empty output file behind. The output
//! file is therefore authoritative and the exit status only informative.

use std::path::Path;

use lamekit_core::{Error, InvocationResult, Result};

use crate::command::ToolOutput;

/// Size of the output file, or why it does not count as output.
///
/// # Errors
///
/// - [`Error::EmptyOutput`] if the path is missing, not a file, or empty.
/// - [`Error::Io`] if the file exists but cannot be inspected.
pub async fn classify(output_path: &Path) -> Result<u64> {
    match tokio::fs::metadata(output_path).await {
        Ok(meta) if meta.is_file() && meta.len() >= 1 => Ok(meta.len()),
        Ok(_) => Err(Error::EmptyOutput {
            path: output_path.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::EmptyOutput {
            path: output_path.to_path_buf(),
        }),
        Err(e) => Err(Error::from(e)),
    }
}

/// Fold a finished run into `result`: capture the streams and exit code,
/// then classify the output file at `result.output_path`.
pub async fn record_outcome(result: &mut InvocationResult, run: ToolOutput) {
    result.stdout = run.stdout;
    result.stderr = run.stderr;
    result.exit_code = run.status.code();

    match classify(&result.output_path).await {
        Ok(size) => {
            if !run.status.success() {
                tracing::debug!(
                    "Encoder exited with {} but wrote {size} bytes to {}",
                    run.status,
                    result.output_path.display()
                );
            }
            result.output_size = size;
        }
        Err(e) => result.fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use lamekit_core::ErrorKind;

    #[cfg(unix)]
    fn exit_status(code: i32) -> std::process::ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[tokio::test]
    async fn classify_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = classify(&dir.path().join("out.mp3")).await.unwrap_err();
        assert_matches!(err, Error::EmptyOutput { .. });
    }

    #[tokio::test]
    async fn classify_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp3");
        std::fs::write(&path, b"").unwrap();
        let err = classify(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyOutput);
    }

    #[tokio::test]
    async fn classify_directory_is_not_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = classify(dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyOutput);
    }

    #[tokio::test]
    async fn classify_non_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp3");
        std::fs::write(&path, b"ID3").unwrap();
        assert_eq!(classify(&path).await.unwrap(), 3);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn zero_exit_with_empty_output_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp3");
        std::fs::write(&path, b"").unwrap();

        let mut result = InvocationResult {
            output_path: path,
            ..Default::default()
        };
        let run = ToolOutput {
            status: exit_status(0),
            stdout: String::new(),
            stderr: "Warning: unsupported audio format\n".into(),
        };
        record_outcome(&mut result, run).await;

        assert_eq!(result.error_kind(), Some(ErrorKind::EmptyOutput));
        assert_eq!(result.output_size, 0);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stderr.contains("unsupported audio format"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_with_output_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp3");
        std::fs::write(&path, vec![0u8; 128]).unwrap();

        let mut result = InvocationResult {
            output_path: path,
            ..Default::default()
        };
        let run = ToolOutput {
            status: exit_status(1),
            stdout: "done".into(),
            stderr: String::new(),
        };
        record_outcome(&mut result, run).await;

        assert!(result.is_success());
        assert_eq!(result.output_size, 128);
        assert_eq!(result.exit_code, Some(1));
        assert_eq!(result.stdout, "done");
    }
}
