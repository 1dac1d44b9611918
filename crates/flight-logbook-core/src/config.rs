// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::view::SortKey;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogbookConfig {
    /// Flight log CSV
    pub csv_path: Option<PathBuf>,
    /// Colon-delimited airport database used for KML export
    pub airports_path: Option<PathBuf>,
    pub kml_output: PathBuf,
    pub document_name: String,
    /// Rows shown per ranking
    pub top_n: usize,
    /// Column name or alias; an unknown one fails at load.
    pub default_sort: SortKey,
    pub default_ascending: bool,
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            airports_path: None,
            kml_output: PathBuf::from("my-flight-log.kml"),
            document_name: "My Flight Log".to_string(),
            top_n: 5,
            default_sort: SortKey::Date,
            default_ascending: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(crate::get_config_root().join("config.json"))
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// A missing file is not an error; it yields the defaults.
    pub fn load(&self) -> Result<LogbookConfig> {
        if !self.config_path.exists() {
            return Ok(LogbookConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config.json")?;

        serde_json::from_str(&content).context("Failed to parse config.json")
    }

    pub fn save(&self, config: &LogbookConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config.json")
    }
}
