use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{FleetError, FleetResult};

pub const DEFAULT_PAGE_SIZE: usize = 25;
pub const DEFAULT_AUTO_REFRESH_PERIOD_MS: u64 = 60_000;
pub const DEFAULT_END_REACHED_THRESHOLD: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_auto_refresh_period_ms")]
    pub auto_refresh_period_ms: u64,
    /// Number of items from the end of the loaded list at which the next
    /// page is requested.
    #[serde(default = "default_end_reached_threshold")]
    pub end_reached_threshold: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_auto_refresh_period_ms() -> u64 {
    DEFAULT_AUTO_REFRESH_PERIOD_MS
}

fn default_end_reached_threshold() -> usize {
    DEFAULT_END_REACHED_THRESHOLD
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            auto_refresh_period_ms: DEFAULT_AUTO_REFRESH_PERIOD_MS,
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/fleet/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("fleet/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("fleet\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load from the platform config path, falling back to defaults when the
    /// file is missing or invalid.
    pub fn load() -> Self {
        Self::config_path()
            .filter(|path| path.exists())
            .and_then(|path| Self::from_file(&path).ok())
            .unwrap_or_default()
    }

    pub fn from_file(path: &Path) -> FleetResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> FleetResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FleetError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FleetResult<()> {
        if self.page_size == 0 {
            return Err(FleetError::Config("page_size must be greater than 0".into()));
        }
        if self.auto_refresh_period_ms == 0 {
            return Err(FleetError::Config(
                "auto_refresh_period_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    pub fn auto_refresh_period(&self) -> Duration {
        Duration::from_millis(self.auto_refresh_period_ms)
    }
}
