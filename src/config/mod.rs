//! Configuration management for snap-pm

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::{ConfigError, Section, WidgetType};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub layout: LayoutConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site root, e.g. `https://moodle.example.edu`
    pub wwwroot: String,
    /// Session key; prefixes every cache entry
    pub sesskey: String,
    /// Page context id sent with every widget request
    pub context_id: u64,
    /// When set the panel redirects to the site policy instead of refreshing
    pub site_policy_accept_reqd: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            wwwroot: "http://localhost".to_string(),
            sesskey: String::new(),
            context_id: 1,
            site_policy_accept_reqd: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("snap-pm/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewports at least this wide do not page sections
    pub breakpoint_px: u32,
    /// Added to a section's rendered height when paging
    pub section_padding_px: u32,
    /// Tab transition duration
    pub transition_ms: u64,
    /// Terminal cell size used to express the terminal as logical pixels
    pub px_per_column: u32,
    pub px_per_row: u32,
    /// Widget regions present on this page layout
    pub regions: Vec<WidgetType>,
    /// Whether the page has a badge region
    pub badges_region: bool,
    /// Update sections in page order (courses is always first and not listed)
    pub update_sections: Vec<Section>,
    /// Course ids known to the page
    pub course_ids: Vec<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 992,
            section_padding_px: 200,
            transition_ms: 700,
            px_per_column: 8,
            px_per_row: 16,
            regions: WidgetType::ALL.to_vec(),
            badges_region: true,
            update_sections: vec![
                Section::Deadlines,
                Section::Grading,
                Section::Messages,
                Section::Forumposts,
            ],
            course_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Override for the cache directory (defaults to the platform cache dir)
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl SiteConfig {
    /// `host[:port]` of the site root; names the per-origin storage area
    pub fn origin(&self) -> Result<String, ConfigError> {
        let url = url::Url::parse(&self.wwwroot)
            .map_err(|_| ConfigError::InvalidWwwroot(self.wwwroot.clone()))?;
        let host = url
            .host_str()
            .ok_or_else(|| ConfigError::InvalidWwwroot(self.wwwroot.clone()))?;
        Ok(match url.port() {
            Some(port) => format!("{}_{}", host, port),
            None => host.to_string(),
        })
    }

    /// Where the panel sends people who still have to accept the site policy
    pub fn policy_url(&self) -> String {
        format!("{}/user/policy.php", self.wwwroot.trim_end_matches('/'))
    }
}

impl Config {
    /// Load configuration from default location or create default
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Ok(Self::load_from(&config_path)?)
    }

    /// Load configuration from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "snap-pm") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }

    /// Directory holding the per-origin session storage files
    pub fn cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache.dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "snap-pm")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".snap-pm-cache"))
    }
}
