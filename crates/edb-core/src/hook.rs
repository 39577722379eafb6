//! External-downloader hook: the entry point the primary tool invokes.
//!
//! When registered as the primary tool's external downloader, this runs as a
//! short-lived process handed a temporary file path and per-download
//! metadata. The primary tool blocks on it and resumes post-processing only
//! after it exits, so the hook may not return until the file is actually on
//! disk, even though the daemon it submits to returns immediately.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::config::EdbConfig;
use crate::error::BridgeError;
use crate::job::{self, DownloadJob};
use crate::progress::ProgressReporter;
use crate::supervisor;
use crate::watch;

/// What the primary tool hands over for one transfer.
#[derive(Debug, Clone)]
pub struct HookRequest {
    /// Temporary target path chosen by the primary tool (folder + name, the
    /// name possibly not yet final).
    pub path: PathBuf,
    pub url: String,
    /// `filesize` from the source metadata, when reported.
    pub expected_size: Option<u64>,
    /// User-Agent from the source's HTTP headers, when present.
    pub user_agent: Option<String>,
}

/// Runs the hook to completion and returns the exit code to hand back to the
/// primary tool (0 = the file is fully on disk).
pub async fn run(cfg: &EdbConfig, req: &HookRequest) -> Result<i32, BridgeError> {
    match req.expected_size {
        Some(size) => tracing::info!("expected file size: {} bytes", size),
        None => tracing::warn!("unknown expected file size, using block size only"),
    }

    // The daemon writes under the transliterated name, so that is the path to
    // probe and watch, whatever name the primary tool proposed.
    let (folder, file_name) = split_target(&req.path)?;
    let target_path = folder.join(&file_name);

    // Fast path: a finished file from an earlier run satisfies the request
    // without any submission or event. No content check is done; a stale
    // leftover of the right size passes.
    let existing = match watch::file_disk_sizes(&target_path) {
        Ok(sizes) => Some(sizes),
        Err(err) if err.kind() == io::ErrorKind::NotFound => None,
        Err(source) => {
            return Err(BridgeError::Stat {
                path: target_path.clone(),
                source,
            })
        }
    };

    match existing {
        Some(sizes) if watch::is_downloaded(sizes, req.expected_size) => {
            tracing::info!("{} already downloaded", target_path.display());
            return Ok(0);
        }
        Some(_) => {
            // Partially present: a daemon job is presumably still writing it,
            // so resubmitting would only collide. Just wait.
            tracing::info!("file already exists, waiting for download");
        }
        None => {
            let mut download = DownloadJob::new(req.url.clone());
            download.folder = Some(folder);
            download.file_name = Some(file_name);
            download.user_agent = req.user_agent.clone();
            download.expected_size = req.expected_size;

            let target = job::build(cfg, &download, true);
            supervisor::ensure_running(cfg);

            tracing::info!("submitting: {}", target.command.join(" "));
            match Command::new(&target.command[0])
                .args(&target.command[1..])
                .stdin(Stdio::null())
                .status()
                .await
            {
                Ok(status) if status.success() => {
                    tracing::info!("submission return code: 0");
                }
                Ok(status) => {
                    tracing::warn!("submission failed: {}", status);
                    return Ok(status.code().unwrap_or(1));
                }
                Err(err) => {
                    tracing::warn!("failed to launch {}: {}", target.command[0], err);
                    return Ok(1);
                }
            }
        }
    }

    let expected = req.expected_size;
    let mut reporter = ProgressReporter::new(cfg.progress_interval());
    watch::await_completion(&target_path, expected, |allocated| {
        reporter.report(allocated, expected);
    })
    .await?;

    let current = watch::file_disk_sizes(&target_path)
        .map(|s| s.allocated)
        .unwrap_or(0);
    reporter.finish(current, expected);

    Ok(0)
}

/// Folder (absolute, defaulting to the working directory) and transliterated
/// file name for the primary tool's target path.
fn split_target(path: &Path) -> Result<(PathBuf, String), BridgeError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BridgeError::WatchFolder {
            folder: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"),
        })?;

    let folder = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => std::env::current_dir().map_err(|source| BridgeError::WatchFolder {
            folder: PathBuf::from("."),
            source,
        })?,
    };

    Ok((folder, job::clean_file_name(file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_transliterates_name() {
        let (folder, name) = split_target(Path::new("/downloads/Ep 1: Título.mp4")).unwrap();
        assert_eq!(folder, PathBuf::from("/downloads"));
        assert_eq!(name, "Ep 1: Titulo.mp4");
    }

    #[test]
    fn split_bare_name_uses_cwd() {
        let (folder, name) = split_target(Path::new("ep.mp4")).unwrap();
        assert_eq!(folder, std::env::current_dir().unwrap());
        assert_eq!(name, "ep.mp4");
    }
}
