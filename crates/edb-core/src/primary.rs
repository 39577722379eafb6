//! Wrapper around the metadata-aware primary downloader (yt-dlp).
//!
//! The primary tool resolves a source URL into an actual media stream and
//! performs its own post-processing (muxing, metadata embedding). This module
//! only builds its invocation, runs it, and classifies the failure modes the
//! fallback layer cares about.

use std::fmt;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::EdbConfig;

/// Default output name template of the primary tool, appended when the caller
/// hands over a folder instead of a full template.
const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s [%(id)s].%(ext)s";

/// Marker the primary tool prints when it has no extractor for a URL.
const UNSUPPORTED_URL_MARKER: &str = "Unsupported URL";

/// Options for one primary-downloader invocation.
#[derive(Debug, Clone, Default)]
pub struct PrimaryOptions {
    /// Output template or folder; folder-only values are completed with the
    /// tool's default name template.
    pub output: Option<String>,
    /// `--format` selector.
    pub format: Option<String>,
    /// Embed source metadata into the result.
    pub add_metadata: bool,
    /// Skip live streams via a match filter.
    pub skip_livestreams: bool,
    /// Verbose tool output (captured into the log).
    pub verbose: bool,
    /// External downloader to register via `--downloader`, e.g. an `edb hook`
    /// wrapper, so transfers route back through the bridge inside the primary
    /// tool's own pipeline.
    pub external_downloader: Option<String>,
}

/// Failure modes of a primary run, split so the fallback layer can pick out
/// the unsupported-URL case.
#[derive(Debug)]
pub enum PrimaryError {
    /// The tool has no extractor for this URL; the fallback may take over.
    Unsupported,
    /// The tool ran and exited nonzero for some other reason.
    Exit(Option<i32>),
    /// The tool could not be launched at all.
    Launch(std::io::Error),
}

impl fmt::Display for PrimaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryError::Unsupported => write!(f, "unsupported URL"),
            PrimaryError::Exit(Some(code)) => write!(f, "exited with status {}", code),
            PrimaryError::Exit(None) => write!(f, "terminated by signal"),
            PrimaryError::Launch(e) => write!(f, "failed to launch: {}", e),
        }
    }
}

impl std::error::Error for PrimaryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PrimaryError::Launch(e) => Some(e),
            PrimaryError::Unsupported | PrimaryError::Exit(_) => None,
        }
    }
}

/// Completes an output value the way the tool treats templates: a folder gets
/// the default name template appended, anything else passes through.
pub fn resolve_output_template(output: &str) -> String {
    let path = Path::new(output);
    if output.ends_with('/') || path.is_dir() {
        return path.join(DEFAULT_OUTPUT_TEMPLATE).display().to_string();
    }
    output.to_string()
}

/// Builds the primary tool's argument vector for one URL.
pub fn build_args(opts: &PrimaryOptions, url: &str) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(name) = &opts.external_downloader {
        args.push("--downloader".to_string());
        args.push(name.clone());
    }
    if let Some(output) = &opts.output {
        args.push("-o".to_string());
        args.push(resolve_output_template(output));
    }
    if let Some(format) = &opts.format {
        args.push("--format".to_string());
        args.push(format.clone());
    }
    if opts.skip_livestreams {
        args.push("--match-filter".to_string());
        args.push("!is_live".to_string());
    }
    if opts.add_metadata {
        args.push("--add-metadata".to_string());
    }
    if opts.verbose {
        args.push("--verbose".to_string());
    }

    args.push("--".to_string());
    args.push(url.to_string());
    args
}

/// Runs the primary downloader to completion for one URL.
///
/// Both output streams are captured and logged; stderr is additionally
/// scanned to classify the unsupported-URL rejection.
pub async fn run(cfg: &EdbConfig, url: &str, opts: &PrimaryOptions) -> Result<(), PrimaryError> {
    let args = build_args(opts, url);
    tracing::info!("running: {} {}", cfg.ytdlp_command, args.join(" "));

    let output = Command::new(&cfg.ytdlp_command)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(PrimaryError::Launch)?;

    if !output.stdout.is_empty() {
        tracing::debug!(
            "{} stdout: {}",
            cfg.ytdlp_command,
            String::from_utf8_lossy(&output.stdout).trim_end()
        );
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.is_empty() {
        tracing::debug!("{} stderr: {}", cfg.ytdlp_command, stderr.trim_end());
    }

    if output.status.success() {
        return Ok(());
    }
    if stderr.contains(UNSUPPORTED_URL_MARKER) {
        return Err(PrimaryError::Unsupported);
    }
    Err(PrimaryError::Exit(output.status.code()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_url_only() {
        let args = build_args(&PrimaryOptions::default(), "https://example.com/v");
        assert_eq!(args, vec!["--", "https://example.com/v"]);
    }

    #[test]
    fn args_full() {
        let opts = PrimaryOptions {
            output: Some("/media/out.mp4".to_string()),
            format: Some("bestvideo+bestaudio/best".to_string()),
            add_metadata: true,
            skip_livestreams: true,
            verbose: true,
            external_downloader: Some("edb-hook".to_string()),
        };
        let args = build_args(&opts, "https://example.com/v");
        assert_eq!(
            args,
            vec![
                "--downloader",
                "edb-hook",
                "-o",
                "/media/out.mp4",
                "--format",
                "bestvideo+bestaudio/best",
                "--match-filter",
                "!is_live",
                "--add-metadata",
                "--verbose",
                "--",
                "https://example.com/v",
            ]
        );
    }

    #[test]
    fn output_template_trailing_slash() {
        assert_eq!(
            resolve_output_template("/media/"),
            format!("/media/{}", DEFAULT_OUTPUT_TEMPLATE)
        );
    }

    #[test]
    fn output_template_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_output_template(dir.path().to_str().unwrap());
        assert!(resolved.ends_with(DEFAULT_OUTPUT_TEMPLATE));
    }

    #[test]
    fn output_template_file_passthrough() {
        assert_eq!(resolve_output_template("/media/out.mp4"), "/media/out.mp4");
        assert_eq!(resolve_output_template("name only"), "name only");
    }
}
