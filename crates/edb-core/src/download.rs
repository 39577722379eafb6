//! Top-level download entry: primary tool first, secondary bridge fallback.

use std::path::{Path, PathBuf};

use crate::config::EdbConfig;
use crate::dispatcher::{self, DownloadOutcome, SubmitOptions};
use crate::error::BridgeError;
use crate::job::{self, DownloadJob};
use crate::primary::{self, PrimaryError, PrimaryOptions};

/// Downloads one enclosure URL, preferring the metadata-aware primary tool.
///
/// Only an unsupported-URL rejection routes to the secondary bridge; any
/// other primary failure is terminal as-is. There is no third strategy: when
/// the bridge also fails, a single combined error names both tools.
pub async fn download(
    cfg: &EdbConfig,
    url: &str,
    path: Option<&Path>,
    livestreams: bool,
) -> Result<(), BridgeError> {
    let folder: PathBuf = path.map_or_else(|| cfg.download_dir.clone(), Path::to_path_buf);

    let opts = PrimaryOptions {
        // Percent signs are template syntax to the primary tool; escape any
        // literal ones in the folder.
        output: Some(folder.display().to_string().replace('%', "%%")),
        format: Some("bestvideo+bestaudio/best".to_string()),
        add_metadata: true,
        skip_livestreams: !livestreams,
        verbose: true,
        external_downloader: cfg.external_downloader.clone(),
    };

    let primary_err = match primary::run(cfg, url, &opts).await {
        Ok(()) => return Ok(()),
        Err(PrimaryError::Unsupported) => PrimaryError::Unsupported,
        Err(err) => return Err(BridgeError::Primary(err)),
    };

    tracing::debug!(
        "primary downloader rejected {}, falling back to the download manager",
        url
    );

    // The wait needs a known final path, so derive the name the daemon will
    // pick anyway (the URL's last path segment). With no derivable name the
    // job is still submitted, but fire-and-forget.
    let file_name = job::file_name_from_url(url);
    let wait = file_name.is_some();
    if !wait {
        tracing::warn!("no file name derivable from {}, submitting without waiting", url);
    }

    let mut fallback = DownloadJob::new(url.to_string());
    fallback.folder = Some(folder);
    fallback.file_name = file_name;

    let combined = |secondary: String| BridgeError::BothFailed {
        url: url.to_string(),
        primary: primary_err.to_string(),
        secondary,
    };

    match dispatcher::submit_and_await(cfg, &fallback, SubmitOptions { quiet: true, wait }).await {
        Ok(DownloadOutcome::Success) => Ok(()),
        Ok(DownloadOutcome::Failed { reason, .. }) => Err(combined(reason)),
        Err(err) => Err(combined(err.to_string())),
    }
}
