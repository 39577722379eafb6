//! Completion detection for downloads performed by an external tool.
//!
//! The secondary tool returns as soon as a job is enqueued in its daemon, so
//! the only completion signal available is the filesystem. The watcher arms a
//! directory-level subscription and re-runs the size heuristic on every event
//! that touches the target name. There is no timeout: if the daemon never
//! produces the file, the wait blocks indefinitely.

mod sizes;

pub use sizes::{file_disk_sizes, is_downloaded, DiskSizes};

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use notify::event::{AccessKind, AccessMode};
use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::BridgeError;

/// Where a watched download stands. Transitions are monotonic: once
/// `Complete` is reached the watch is torn down, nothing revisits `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    /// The target satisfied the heuristic before any event was consumed,
    /// typically a finished download left over from a prior run.
    AlreadyComplete,
    /// Watch armed, awaiting directory events.
    Pending,
    /// The heuristic was satisfied after at least one event.
    Complete,
}

/// Blocks the calling task until the file at `path` is fully on disk.
///
/// The containing directory is watched rather than the file itself: the file
/// may not exist yet, and downloaders commonly write to a temporary name and
/// rename into place on completion. A missing target file while pending is an
/// expected transient state; a missing or unreadable directory is a caller
/// error and fatal. Every heuristic check reports the currently allocated
/// bytes through `on_progress`, whether or not it completed the wait.
///
/// Concurrent waits on the same path are unsupported (the watchers would race
/// over events); waits on different paths are independent.
pub async fn await_completion<F>(
    path: &Path,
    expected_size: Option<u64>,
    mut on_progress: F,
) -> Result<CompletionState, BridgeError>
where
    F: FnMut(u64),
{
    // Fast path: a prior run may have left the finished file behind, in which
    // case no event will ever arrive for it.
    if check_target(path, expected_size, &mut on_progress)? == Some(true) {
        return Ok(CompletionState::AlreadyComplete);
    }

    let (folder, file_name) = split_watch_target(path)?;

    // Resolve symlinks up-front; the event source reports paths under the
    // real directory. Failure here means the directory itself is unusable.
    let folder = folder
        .canonicalize()
        .map_err(|source| BridgeError::WatchFolder {
            folder: folder.clone(),
            source,
        })?;
    let target = folder.join(&file_name);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut watcher =
        notify::recommended_watcher(move |event: Result<notify::Event, notify::Error>| {
            // A closed receiver means the wait already returned; drop the event.
            let _ = tx.send(event);
        })?;
    watcher.watch(&folder, RecursiveMode::NonRecursive)?;

    let mut state = CompletionState::Pending;
    while let Some(event) = rx.recv().await {
        let event = event?;
        if !is_relevant(&event.kind) {
            continue;
        }
        // The folder may carry unrelated traffic; only the target name counts.
        if !event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
        {
            continue;
        }

        if check_target(&target, expected_size, &mut on_progress)? == Some(true) {
            state = CompletionState::Complete;
            break;
        }
        // Not complete yet (or not even created yet): keep waiting.
    }

    if state == CompletionState::Complete {
        Ok(state)
    } else {
        // The event stream ended without completion; the backend died.
        Err(BridgeError::Watch(notify::Error::generic(
            "directory event stream ended before the download completed",
        )))
    }
}

/// Runs the heuristic once. `Ok(None)` means the file does not exist yet,
/// which while pending is not an error.
fn check_target<F>(
    path: &Path,
    expected_size: Option<u64>,
    on_progress: &mut F,
) -> Result<Option<bool>, BridgeError>
where
    F: FnMut(u64),
{
    match file_disk_sizes(path) {
        Ok(sizes) => {
            on_progress(sizes.allocated);
            Ok(Some(is_downloaded(sizes, expected_size)))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(BridgeError::Stat {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Splits the target into the directory to watch and the name to match.
fn split_watch_target(path: &Path) -> Result<(PathBuf, OsString), BridgeError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| BridgeError::WatchFolder {
            folder: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "target has no file name"),
        })?
        .to_os_string();

    let folder = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => std::env::current_dir().map_err(|source| BridgeError::WatchFolder {
            folder: PathBuf::from("."),
            source,
        })?,
    };

    Ok((folder, file_name))
}

/// Event kinds worth re-checking: creation, any modification (data, size,
/// rename-into-place), and close-after-write.
fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Modify(_)
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
    )
}
