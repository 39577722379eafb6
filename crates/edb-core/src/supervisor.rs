//! Best-effort supervision of the secondary download-manager daemon.

use std::process::{Command, Stdio};

use crate::config::EdbConfig;

/// Makes sure a daemon instance is available, without ever blocking.
///
/// Launching uGet when no instance is running would tie up the caller until
/// the GUI exits, so the daemon is always spawned detached in its own session
/// with its output discarded. The application enforces its own
/// single-instance behavior, so redundant launches are tolerated rather than
/// prevented here. Spawn failures are logged and swallowed: a missing daemon
/// shows up later as a submission failure, which is the layer that owns that
/// error.
///
/// No ordering guarantee exists between this call and a submission made right
/// after it; the daemon's submission path is expected to cope with being hit
/// during startup.
pub fn ensure_running(cfg: &EdbConfig) {
    let mut command = Command::new(&cfg.uget_command);
    command
        .arg("--quiet")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // New session, so the daemon is not part of our process group and
        // survives us.
        unsafe {
            command.pre_exec(|| {
                libc::setsid();
                Ok(())
            });
        }
    }

    match command.spawn() {
        Ok(child) => {
            tracing::debug!(pid = child.id(), "spawned download manager daemon");
        }
        Err(err) => {
            tracing::warn!("failed to spawn {}: {}", cfg.uget_command, err);
        }
    }
}
