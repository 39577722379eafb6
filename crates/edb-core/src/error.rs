//! Error taxonomy for the downloader bridge.

use std::path::PathBuf;

use crate::primary::PrimaryError;

/// Errors surfaced by the bridge.
///
/// Submission failures are deliberately absent: a nonzero exit from the
/// download manager's client is reported as a `DownloadOutcome::Failed`, an
/// outcome of the job rather than a fault in the bridge itself.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Waiting needs a folder and file name, otherwise there is no path to
    /// observe. Raised before any process is spawned.
    #[error("waiting for a download requires a folder and file name")]
    WaitRequiresTarget,

    /// The directory to watch is missing or unreadable. Caller error, fatal;
    /// distinct from the target *file* not existing yet, which is a normal
    /// transient state while a download is pending.
    #[error("cannot watch download folder {folder}: {source}")]
    WatchFolder {
        folder: PathBuf,
        source: std::io::Error,
    },

    /// The event subscription itself failed.
    #[error("filesystem watch failed: {0}")]
    Watch(#[from] notify::Error),

    /// A stat on the target failed with something other than not-found.
    #[error("cannot stat {path}: {source}")]
    Stat {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The primary downloader failed for a reason other than an unsupported
    /// URL, so the fallback never ran.
    #[error("primary downloader failed: {0}")]
    Primary(#[from] PrimaryError),

    /// Both the primary downloader and the fallback were exhausted.
    #[error("both downloaders failed for {url}: yt-dlp: {primary}; uget: {secondary}")]
    BothFailed {
        url: String,
        primary: String,
        secondary: String,
    },
}
