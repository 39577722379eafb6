//! `edb download <url>` – primary downloader with fallback.

use anyhow::Result;
use edb_core::config::EdbConfig;
use edb_core::download;
use std::path::Path;

pub async fn run_download(
    cfg: &EdbConfig,
    url: &str,
    path: Option<&Path>,
    livestreams: bool,
) -> Result<()> {
    download::download(cfg, url, path, livestreams).await?;
    println!("Downloaded: {url}");
    Ok(())
}
