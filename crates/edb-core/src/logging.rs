//! Logging init: file sink under the XDG state dir, stderr fallback.

use anyhow::Result;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Writer that is either a file or stderr (used when file clone fails).
enum FileOrStderr {
    File(fs::File),
    Stderr,
}

impl io::Write for FileOrStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileOrStderr::File(f) => f.write(buf),
            FileOrStderr::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileOrStderr::File(f) => f.flush(),
            FileOrStderr::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct FileMakeWriter(fs::File);

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileOrStderr;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(FileOrStderr::File)
            .unwrap_or(FileOrStderr::Stderr)
    }
}

/// Initialize structured logging to `~/.local/state/edb/edb.log`, falling
/// back to stderr when the state dir cannot be used. Never fails: a download
/// must not be blocked by an unwritable log file.
pub fn init() {
    match open_log_file() {
        Ok((file, path)) => {
            init_with(BoxMakeWriter::new(FileMakeWriter(file)));
            tracing::info!("edb logging to {}", path.display());
        }
        Err(err) => {
            init_with(BoxMakeWriter::new(io::stderr));
            tracing::warn!("log file unavailable ({err:#}), logging to stderr");
        }
    }
}

fn init_with(writer: BoxMakeWriter) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,edb=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

fn open_log_file() -> Result<(fs::File, PathBuf)> {
    let log_dir = xdg::BaseDirectories::with_prefix("edb")?.get_state_home();
    fs::create_dir_all(&log_dir)?;

    let path = log_dir.join("edb.log");
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}
