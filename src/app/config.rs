use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_SERVER_URL, DEFAULT_TEXT_EXTENSION, HTTP_REQUEST_TIMEOUT_SECS,
    UI_REFRESH_INTERVAL_MS,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upload server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: HttpConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Upload server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the tempfiles instance
    pub base_url: String,
    /// API token sent as a bearer token; anonymous when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Extension preselected on the text tab
    pub default_extension: String,
    /// Terminal event poll interval
    pub tick_rate_ms: u64,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            default_extension: DEFAULT_TEXT_EXTENSION.to_string(),
            tick_rate_ms: UI_REFRESH_INTERVAL_MS,
        }
    }
}

/// Load configuration from multiple sources
///
/// An explicit `path` replaces the global and local files.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    match path {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(Toml::file(path));
        }
        None => {
            if let Ok(config_dir) = get_config_dir() {
                let global_config = config_dir.join("config.toml");
                if global_config.exists() {
                    figment = figment.merge(Toml::file(&global_config));
                }
            }

            let local_config = PathBuf::from(".tempfiles/config.toml");
            if local_config.exists() {
                figment = figment.merge(Toml::file(&local_config));
            }
        }
    }

    // TEMPFILES_SERVER__BASE_URL -> server.base_url
    figment = figment.merge(Env::prefixed("TEMPFILES_").split("__"));

    figment
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tempfiles") {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join("tempfiles"))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
///
/// Returns the path of the file and whether it was created.
pub fn init_config() -> Result<(PathBuf, bool)> {
    let config_file = get_config_dir()?.join("config.toml");

    if config_file.exists() {
        return Ok((config_file, false));
    }

    save_config(&Config::default(), &config_file)?;
    Ok((config_file, true))
}
