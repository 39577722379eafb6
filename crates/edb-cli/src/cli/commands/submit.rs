//! `edb submit <url>` – direct submission to the download manager.

use anyhow::Result;
use edb_core::config::EdbConfig;
use edb_core::dispatcher::{self, DownloadOutcome, SubmitOptions};
use edb_core::job::DownloadJob;
use std::path::PathBuf;

pub async fn run_submit(
    cfg: &EdbConfig,
    url: String,
    folder: Option<PathBuf>,
    filename: Option<String>,
    http_user_agent: Option<String>,
    expected_size: Option<u64>,
    quiet: bool,
    wait: bool,
) -> Result<i32> {
    let mut job = DownloadJob::new(url);
    job.folder = folder;
    job.file_name = filename;
    job.user_agent = http_user_agent;
    job.expected_size = expected_size;

    let outcome = dispatcher::submit_and_await(cfg, &job, SubmitOptions { quiet, wait }).await?;
    match &outcome {
        DownloadOutcome::Success => println!("Submitted: {}", job.url),
        DownloadOutcome::Failed { reason, .. } => eprintln!("Submission failed: {reason}"),
    }
    Ok(outcome.exit_code())
}
