//! Submission of jobs to the secondary tool, with an optional wait.

use std::process::Stdio;

use tokio::process::Command;

use crate::config::EdbConfig;
use crate::error::BridgeError;
use crate::job::{self, DownloadJob};
use crate::progress::ProgressReporter;
use crate::supervisor;
use crate::watch;

/// How a job should be submitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitOptions {
    /// Pass `--quiet` so the daemon does not raise its new-job dialog.
    pub quiet: bool,
    /// Block until the file is fully on disk. Requires a folder and file
    /// name, since the wait needs a known final path to observe.
    pub wait: bool,
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success,
    Failed {
        reason: String,
        /// Exit code of the failed submission process, when it ran at all
        /// (None = could not be launched, or killed by a signal).
        code: Option<i32>,
    },
}

impl DownloadOutcome {
    /// Process exit code to surface to callers; a failure propagates the
    /// secondary tool's own nonzero code when one exists.
    pub fn exit_code(&self) -> i32 {
        match self {
            DownloadOutcome::Success => 0,
            DownloadOutcome::Failed { code, .. } => code.unwrap_or(1),
        }
    }
}

/// Submits a job to the download manager and, when asked, waits for the file
/// to finish arriving.
///
/// The submission client returns as soon as the daemon has enqueued the job,
/// so a zero exit from it never means the transfer is done; only the wait
/// provides that guarantee. Submission failures come back as
/// `DownloadOutcome::Failed` and are not retried here; retry, if any, belongs
/// to the caller. Concurrent calls for the same target path are unsupported.
pub async fn submit_and_await(
    cfg: &EdbConfig,
    job: &DownloadJob,
    opts: SubmitOptions,
) -> Result<DownloadOutcome, BridgeError> {
    let target = job::build(cfg, job, opts.quiet);

    // Contract check before any process or filesystem interaction.
    let wait_path = if opts.wait {
        if job.folder.is_none() || job.file_name.is_none() {
            return Err(BridgeError::WaitRequiresTarget);
        }
        target.file_path.clone()
    } else {
        None
    };

    supervisor::ensure_running(cfg);

    tracing::info!("submitting: {}", target.command.join(" "));
    let status = match Command::new(&target.command[0])
        .args(&target.command[1..])
        .stdin(Stdio::null())
        .status()
        .await
    {
        Ok(status) => status,
        Err(err) => {
            return Ok(DownloadOutcome::Failed {
                reason: format!("failed to launch {}: {}", target.command[0], err),
                code: None,
            });
        }
    };

    if !status.success() {
        return Ok(DownloadOutcome::Failed {
            reason: format!(
                "{} exited with {}",
                target.command[0],
                status
                    .code()
                    .map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
            ),
            code: status.code(),
        });
    }

    if let Some(path) = wait_path {
        tracing::info!("waiting for download to finish: {}", path.display());
        let expected = job.expected_size;
        let mut reporter = ProgressReporter::new(cfg.progress_interval());
        let state = watch::await_completion(&path, expected, |allocated| {
            reporter.report(allocated, expected);
        })
        .await?;
        let current = watch::file_disk_sizes(&path)
            .map(|s| s.allocated)
            .unwrap_or(0);
        reporter.finish(current, expected);
        tracing::debug!(?state, "download finished");
    }

    Ok(DownloadOutcome::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cfg_with_command(command: &str) -> EdbConfig {
        EdbConfig {
            uget_command: command.to_string(),
            ..EdbConfig::default()
        }
    }

    #[tokio::test]
    async fn wait_without_file_name_is_config_error() {
        // The executable does not exist; validation must trip before any
        // launch is attempted.
        let cfg = cfg_with_command("/nonexistent/uget-gtk");
        let mut job = DownloadJob::new("https://example.com/x");
        job.folder = Some(PathBuf::from("/downloads"));

        let err = submit_and_await(
            &cfg,
            &job,
            SubmitOptions {
                quiet: true,
                wait: true,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BridgeError::WaitRequiresTarget));
    }

    #[tokio::test]
    async fn wait_without_folder_is_config_error() {
        let cfg = cfg_with_command("/nonexistent/uget-gtk");
        let mut job = DownloadJob::new("https://example.com/x");
        job.file_name = Some("x.bin".to_string());

        let err = submit_and_await(
            &cfg,
            &job,
            SubmitOptions {
                quiet: false,
                wait: true,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, BridgeError::WaitRequiresTarget));
    }

    #[tokio::test]
    async fn successful_submission_without_wait() {
        let cfg = cfg_with_command("true");
        let job = DownloadJob::new("https://example.com/x");

        let outcome = submit_and_await(&cfg, &job, SubmitOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome, DownloadOutcome::Success);
        assert_eq!(outcome.exit_code(), 0);
    }

    #[tokio::test]
    async fn nonzero_submission_is_failed_outcome() {
        let cfg = cfg_with_command("false");
        let job = DownloadJob::new("https://example.com/x");

        let outcome = submit_and_await(&cfg, &job, SubmitOptions::default())
            .await
            .unwrap();
        match &outcome {
            DownloadOutcome::Failed { reason, code } => {
                assert!(reason.contains("false"));
                assert_eq!(*code, Some(1));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(outcome.exit_code(), 1);
    }

    #[tokio::test]
    async fn failure_exit_code_is_propagated() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("uget-stub.sh");
        std::fs::write(&script, "#!/bin/sh\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let cfg = cfg_with_command(script.to_str().unwrap());
        let job = DownloadJob::new("https://example.com/x");

        let outcome = submit_and_await(&cfg, &job, SubmitOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.exit_code(), 3);
    }

    #[tokio::test]
    async fn unlaunchable_submission_is_failed_outcome() {
        let cfg = cfg_with_command("/nonexistent/uget-gtk");
        let job = DownloadJob::new("https://example.com/x");

        let outcome = submit_and_await(&cfg, &job, SubmitOptions::default())
            .await
            .unwrap();
        match &outcome {
            DownloadOutcome::Failed { code, .. } => assert!(code.is_none()),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(outcome.exit_code(), 1);
    }
}
