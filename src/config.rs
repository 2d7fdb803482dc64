// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! User configuration loaded from `<config_dir>/docpack/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::package::DEFAULT_FILENAME;

/// Output document settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Filename offered when downloading (`.docx` is enforced).
    pub filename: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

/// When the save button is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnableConfig {
    /// Disable saving while the document is blank.
    pub require_content: bool,
}

impl Default for EnableConfig {
    fn default() -> Self {
        Self {
            require_content: true,
        }
    }
}

/// Which download mechanism to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMechanism {
    /// Native dialog when available, otherwise the download link.
    #[default]
    Auto,
    Native,
    Link,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub mechanism: SaveMechanism,
    /// Target of the download link; the user's download directory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
    /// Write packages here without prompting (replaces the download).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearConfig {
    /// Ask before discarding the current document.
    pub confirm: bool,
}

/// Global configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocPackConfig {
    pub document: DocumentConfig,
    pub enable: EnableConfig,
    pub save: SaveConfig,
    pub clear: ClearConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("No configuration directory for this user")?;
    Ok(base.join("docpack").join("config.toml"))
}

/// Load configuration from the default location, creating it when missing.
pub fn load_or_init() -> Result<DocPackConfig> {
    load_or_init_at(&config_path()?)
}

/// Load configuration from `path`, writing the defaults there first if it does not exist.
pub fn load_or_init_at(path: &Path) -> Result<DocPackConfig> {
    if !path.exists() {
        let default_cfg = DocPackConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)
            .with_context(|| format!("Failed to write default config {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let cfg: DocPackConfig =
        toml::from_str(&data).with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(?cfg, "loaded config from {}", path.display());
    Ok(cfg)
}
