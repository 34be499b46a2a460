//! Configuration file management for fitplan.
//!
//! Provides a TOML-based config file at `~/.config/fitplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fitplan_core::Catalog;
use fitplan_core::catalog::HttpCatalogClient;
use fitplan_core::catalog::http::DEFAULT_BASE_URL;

pub const ENV_CATALOG_URL: &str = "FITPLAN_CATALOG_URL";
pub const ENV_CATALOG_TIMEOUT_SECS: &str = "FITPLAN_CATALOG_TIMEOUT_SECS";
pub const ENV_API_KEY: &str = "FITPLAN_API_KEY";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Catalog::DEFAULT_TIMEOUT.as_secs(),
            api_key: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the fitplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/fitplan` or `~/.config/fitplan`,
/// including on macOS.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("fitplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fitplan")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load the config file at `path`. A missing file yields `Ok(None)`.
pub fn load_config_from(path: &Path) -> Result<Option<ConfigFile>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

pub fn load_config() -> Result<Option<ConfigFile>> {
    load_config_from(&config_path())
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since it may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitplanConfig {
    pub catalog_url: String,
    pub catalog_timeout: Duration,
    pub api_key: Option<String>,
    pub bind: String,
    pub port: u16,
}

impl FitplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Catalog URL: `cli_catalog_url` > `FITPLAN_CATALOG_URL` > `catalog.base_url` > [`DEFAULT_BASE_URL`]
    /// - Timeout: `FITPLAN_CATALOG_TIMEOUT_SECS` > `catalog.timeout_secs` > 10s
    /// - API key: `FITPLAN_API_KEY` > `catalog.api_key` > none
    /// - Bind address and port come from the file or defaults; `serve` flags override them.
    pub fn resolve(cli_catalog_url: Option<&str>) -> Result<Self> {
        let file_config = load_config()?.unwrap_or_default();

        let catalog_url = if let Some(url) = cli_catalog_url {
            url.to_string()
        } else if let Ok(url) = std::env::var(ENV_CATALOG_URL) {
            url
        } else {
            file_config.catalog.base_url
        };

        let timeout_secs = match std::env::var(ENV_CATALOG_TIMEOUT_SECS) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{ENV_CATALOG_TIMEOUT_SECS} is not a whole number of seconds: {raw}"))?,
            Err(_) => file_config.catalog.timeout_secs,
        };

        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .or(file_config.catalog.api_key)
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            catalog_url,
            catalog_timeout: Duration::from_secs(timeout_secs),
            api_key,
            bind: file_config.server.bind,
            port: file_config.server.port,
        })
    }

    /// Build the catalog client described by this configuration.
    pub fn catalog(&self) -> Result<Catalog> {
        let mut client = HttpCatalogClient::new(self.catalog_url.clone())
            .context("failed to build catalog HTTP client")?;
        if let Some(key) = &self.api_key {
            client = client.with_api_key(key.clone());
        }
        Ok(Catalog::new(client).with_timeout(self.catalog_timeout))
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
