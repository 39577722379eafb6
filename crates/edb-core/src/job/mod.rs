//! Download job model and command construction for the secondary tool.
//!
//! A job is built once, turned into a `ResolvedTarget`, and consumed by a
//! single dispatch; nothing here touches the filesystem beyond reading the
//! current directory to absolutize a relative folder.

mod from_url;
mod sanitize;

pub use from_url::file_name_from_url;
pub use sanitize::clean_file_name;

use std::path::{Path, PathBuf};

use crate::config::EdbConfig;

/// A single download request. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub url: String,
    /// Target folder; absolutized during `build`.
    pub folder: Option<PathBuf>,
    /// Desired file name; transliterated to ASCII during `build`.
    pub file_name: Option<String>,
    pub user_agent: Option<String>,
    /// Final size in bytes, when the source reported one.
    pub expected_size: Option<u64>,
}

impl DownloadJob {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            folder: None,
            file_name: None,
            user_agent: None,
            expected_size: None,
        }
    }
}

/// Derived invocation for the secondary tool, plus the on-disk path the
/// completion watcher has to observe. Never mutated after `build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Full argument vector, executable first.
    pub command: Vec<String>,
    /// Predicted final path (absolute folder + cleaned file name), when
    /// enough of the job is known to predict one.
    pub file_path: Option<PathBuf>,
}

/// Builds the secondary tool invocation for a job. Deterministic for a given
/// input and working directory.
///
/// The folder is made absolute (uGet misinterprets relative folder paths) and
/// the file name is transliterated up-front, so the name handed to the daemon
/// is exactly the name later seen in directory events.
pub fn build(cfg: &EdbConfig, job: &DownloadJob, quiet: bool) -> ResolvedTarget {
    let mut command = vec![cfg.uget_command.clone()];
    let mut file_path: Option<PathBuf> = None;

    if quiet {
        command.push("--quiet".to_string());
    }

    if let Some(folder) = &job.folder {
        let abs_folder = absolutize(folder);
        command.push(format!("--folder={}", abs_folder.display()));
        file_path = Some(abs_folder);
    }

    if let Some(name) = &job.file_name {
        let clean_name = clean_file_name(name);
        command.push(format!("--filename={clean_name}"));
        file_path = Some(match file_path {
            Some(folder) => folder.join(&clean_name),
            None => PathBuf::from(&clean_name),
        });
    }

    if let Some(agent) = &job.user_agent {
        command.push(format!("--http-user-agent={agent}"));
    }

    command.push("--".to_string());
    command.push(job.url.clone());

    ResolvedTarget { command, file_path }
}

/// Lexical absolutization: prefix the working directory, no symlink
/// resolution and no requirement that the path exists yet.
fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    }
}
