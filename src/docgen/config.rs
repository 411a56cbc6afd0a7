//! # Site Configuration
//!
//! Describes where the host keeps its content and uploads, and how verbosely the tool
//! logs. Stored as `.docgen/config.json` under the site root; every key is optional.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `content_dir` | `wp-content` | Shared-content root, relative to the site root |
//! | `uploads_dir` | `wp-content/uploads` | Uploads root, relative to the site root |
//! | `log_level` | `info` | Default `tracing` filter |
//! | `log_file` | platform data dir | Append-only audit log |
//!
//! The directory settings record itself is not stored here: it goes through
//! [`crate::store::SettingsStore`].

use crate::error::{DocgenError, Result};
use crate::model::SiteLayout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_DIRNAME: &str = ".docgen";
const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_CONTENT_DIR: &str = "wp-content";
const DEFAULT_UPLOADS_DIR: &str = "wp-content/uploads";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from(DEFAULT_UPLOADS_DIR)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            uploads_dir: default_uploads_dir(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

impl SiteConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(DocgenError::Io)?;
        let config: SiteConfig =
            serde_json::from_str(&content).map_err(DocgenError::Serialization)?;
        Ok(config)
    }

    /// Resolves the allowed roots against `site_root`. Absolute entries are kept as is.
    pub fn layout(&self, site_root: &Path) -> SiteLayout {
        SiteLayout {
            site_root: site_root.to_path_buf(),
            content_root: site_root.join(&self.content_dir),
            uploads_root: site_root.join(&self.uploads_dir),
        }
    }
}
