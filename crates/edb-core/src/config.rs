use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/edb/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdbConfig {
    /// Default folder for downloads when none is given on the command line.
    pub download_dir: PathBuf,
    /// Executable for the secondary download manager, used both for the
    /// long-lived daemon and for short-lived submission clients.
    pub uget_command: String,
    /// Executable for the primary metadata-aware downloader.
    pub ytdlp_command: String,
    /// Minimum seconds between progress log lines while waiting on a download.
    pub progress_interval_secs: f64,
    /// Whether `edb download` allows live streams by default.
    pub livestreams: bool,
    /// External downloader to register with the primary tool via
    /// `--downloader`, typically a wrapper that invokes `edb hook`. When
    /// unset, the primary tool transfers with its own pipeline.
    #[serde(default)]
    pub external_downloader: Option<String>,
}

impl Default for EdbConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
            uget_command: "uget-gtk".to_string(),
            ytdlp_command: "yt-dlp".to_string(),
            progress_interval_secs: 1.0,
            livestreams: true,
            external_downloader: None,
        }
    }
}

impl EdbConfig {
    /// Progress throttle interval as a `Duration`.
    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs_f64(self.progress_interval_secs.max(0.0))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("edb")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EdbConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = EdbConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: EdbConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = EdbConfig::default();
        assert_eq!(cfg.download_dir, PathBuf::from("."));
        assert_eq!(cfg.uget_command, "uget-gtk");
        assert_eq!(cfg.ytdlp_command, "yt-dlp");
        assert!((cfg.progress_interval_secs - 1.0).abs() < 1e-9);
        assert!(cfg.livestreams);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = EdbConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: EdbConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.download_dir, cfg.download_dir);
        assert_eq!(parsed.uget_command, cfg.uget_command);
        assert_eq!(parsed.ytdlp_command, cfg.ytdlp_command);
        assert_eq!(parsed.livestreams, cfg.livestreams);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            download_dir = "/srv/media"
            uget_command = "uget"
            ytdlp_command = "youtube-dl"
            progress_interval_secs = 0.5
            livestreams = false
        "#;
        let cfg: EdbConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.download_dir, PathBuf::from("/srv/media"));
        assert_eq!(cfg.uget_command, "uget");
        assert_eq!(cfg.ytdlp_command, "youtube-dl");
        assert_eq!(cfg.progress_interval(), Duration::from_millis(500));
        assert!(!cfg.livestreams);
        assert!(cfg.external_downloader.is_none());
    }

    #[test]
    fn config_toml_external_downloader() {
        let toml = r#"
            download_dir = "."
            uget_command = "uget-gtk"
            ytdlp_command = "yt-dlp"
            progress_interval_secs = 1.0
            livestreams = true
            external_downloader = "edb-hook"
        "#;
        let cfg: EdbConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.external_downloader.as_deref(), Some("edb-hook"));
    }

    #[test]
    fn negative_interval_clamped() {
        let cfg = EdbConfig {
            progress_interval_secs: -2.0,
            ..EdbConfig::default()
        };
        assert_eq!(cfg.progress_interval(), Duration::ZERO);
    }
}
