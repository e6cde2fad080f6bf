//! # Configuration
//!
//! Filter definitions can be supplied as `filters.json` in a config directory:
//!
//! ```text
//! {
//!   "filters": [
//!     { "key": "status", "label": "Status", "multiselect": true,
//!       "options": [{ "label": "Pending", "value": "Pending" }] }
//!   ]
//! }
//! ```
//!
//! A missing file is not an error: the built-in ticket catalog is used.
//! The CLI looks in `--config <DIR>` (or `FILTERSTATE_CONFIG`), falling back
//! to the OS config directory.

use crate::error::{FilterError, Result};
use crate::registry::{FilterDefinition, Registry};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILENAME: &str = "filters.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    #[serde(default = "default_filters")]
    pub filters: Vec<FilterDefinition>,
}

fn default_filters() -> Vec<FilterDefinition> {
    Registry::tickets().definitions().to_vec()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filters: default_filters(),
        }
    }
}

impl FilterConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "no filter config, using built-in catalog");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(FilterError::Io)?;
        let config: FilterConfig =
            serde_json::from_str(&content).map_err(FilterError::Serialization)?;
        info!(
            path = %config_path.display(),
            filters = config.filters.len(),
            "loaded filter config"
        );
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(FilterError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(FilterError::Serialization)?;
        fs::write(config_path, content).map_err(FilterError::Io)?;
        Ok(())
    }

    /// Validate the definitions and build the registry.
    pub fn into_registry(self) -> Result<Registry> {
        Registry::new(self.filters)
    }
}

/// OS-specific config directory (e.g. `~/.config/filterstate`).
pub fn default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "filterstate").map(|dirs| dirs.config_dir().to_path_buf())
}
