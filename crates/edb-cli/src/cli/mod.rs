//! CLI for the edb feed enclosure downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use edb_core::config;
use std::path::PathBuf;

use commands::{run_download, run_hook, run_submit};

/// Top-level CLI for the enclosure downloader bridge.
#[derive(Debug, Parser)]
#[command(name = "edb")]
#[command(about = "edb: feed enclosure downloader bridge", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a URL with the metadata-aware downloader, falling back to
    /// the download manager when the URL is unsupported.
    Download {
        /// URL to download.
        url: String,

        /// Download save location (default: configured folder).
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Allow live streams.
        #[arg(long, overrides_with = "no_livestreams")]
        livestreams: bool,

        /// Skip live streams.
        #[arg(long = "no-livestreams", overrides_with = "livestreams")]
        no_livestreams: bool,
    },

    /// Submit a job directly to the download manager daemon.
    Submit {
        /// URL to download.
        url: String,

        /// Target folder for the download.
        #[arg(long)]
        folder: Option<PathBuf>,

        /// Target file name (transliterated to ASCII before hand-off).
        #[arg(long)]
        filename: Option<String>,

        /// HTTP User-Agent header for the transfer.
        #[arg(long = "http-user-agent")]
        http_user_agent: Option<String>,

        /// Suppress the daemon's new-job dialog.
        #[arg(long)]
        quiet: bool,

        /// Wait for the download to finish (requires --folder and --filename).
        #[arg(long)]
        wait: bool,

        /// Expected final size in bytes, if known.
        #[arg(long)]
        expected_size: Option<u64>,
    },

    /// External-downloader entry point invoked by the primary tool.
    #[command(hide = true)]
    Hook {
        /// Temporary target path chosen by the primary tool.
        #[arg(long)]
        path: PathBuf,

        /// Source URL to transfer.
        #[arg(long)]
        url: String,

        /// Expected file size in bytes, when the source reported one.
        #[arg(long)]
        filesize: Option<u64>,

        /// User-Agent from the source's HTTP headers.
        #[arg(long = "user-agent")]
        user_agent: Option<String>,
    },
}

impl CliCommand {
    /// Parses the command line, loads config, and runs the subcommand.
    /// Returns the process exit code to surface.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download {
                url,
                path,
                livestreams,
                no_livestreams,
            } => {
                let livestreams = if no_livestreams {
                    false
                } else if livestreams {
                    true
                } else {
                    cfg.livestreams
                };
                run_download(&cfg, &url, path.as_deref(), livestreams).await?;
                Ok(0)
            }
            CliCommand::Submit {
                url,
                folder,
                filename,
                http_user_agent,
                quiet,
                wait,
                expected_size,
            } => {
                run_submit(
                    &cfg,
                    url,
                    folder,
                    filename,
                    http_user_agent,
                    expected_size,
                    quiet,
                    wait,
                )
                .await
            }
            CliCommand::Hook {
                path,
                url,
                filesize,
                user_agent,
            } => run_hook(&cfg, path, url, filesize, user_agent).await,
        }
    }
}

#[cfg(test)]
mod tests;
