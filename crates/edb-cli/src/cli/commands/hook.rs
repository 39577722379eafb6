//! `edb hook` – external-downloader entry point for the primary tool.

use anyhow::Result;
use edb_core::config::EdbConfig;
use edb_core::hook::{self, HookRequest};
use std::path::PathBuf;

pub async fn run_hook(
    cfg: &EdbConfig,
    path: PathBuf,
    url: String,
    filesize: Option<u64>,
    user_agent: Option<String>,
) -> Result<i32> {
    let req = HookRequest {
        path,
        url,
        expected_size: filesize,
        user_agent,
    };
    Ok(hook::run(cfg, &req).await?)
}
