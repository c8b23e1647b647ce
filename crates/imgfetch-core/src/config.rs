use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public SearXNG instance used when the config does not name one.
pub const DEFAULT_SEARX_URL: &str = "https://search.himmelstein.info";

/// Global configuration loaded from `~/.config/imgfetch/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgfetchConfig {
    /// Base URL of the SearXNG instance queried for images.
    pub searx_url: String,
    /// `User-Agent` header sent with search and image requests.
    pub user_agent: String,
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds (search pages and image bodies).
    pub timeout_secs: u64,
    /// Maximum number of result pages requested while filling a batch.
    pub max_pages: u32,
    /// Image bodies larger than this are rejected.
    pub max_image_bytes: u64,
    /// Directory under which per-query output directories are created.
    pub output_root: PathBuf,
    /// Number of images requested when `--number` is not given.
    pub default_count: usize,
    /// Also replace path separators and control characters in query directory names.
    pub sanitize_query_dirs: bool,
}

impl Default for ImgfetchConfig {
    fn default() -> Self {
        Self {
            searx_url: DEFAULT_SEARX_URL.to_string(),
            user_agent: format!("imgfetch/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: 15,
            timeout_secs: 60,
            max_pages: 5,
            max_image_bytes: 32 * 1024 * 1024,
            output_root: PathBuf::from("images"),
            default_count: 5,
            sanitize_query_dirs: false,
        }
    }
}

impl ImgfetchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgfetchConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<ImgfetchConfig> {
    if !path.exists() {
        let default_cfg = ImgfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ImgfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
