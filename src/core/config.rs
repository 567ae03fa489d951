//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.roadtrip/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoadtripConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub delete_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub credentials_file: Option<String>,
    pub web_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_WEB_URL: &str = "http://localhost:5173";
pub const DEFAULT_DELETE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub web_url: String,
    pub delete_timeout: Duration,
    pub request_timeout: Duration,
    pub credentials_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.roadtrip/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".roadtrip"))
}

/// Returns the path to `~/.roadtrip/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.roadtrip/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RoadtripConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RoadtripConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RoadtripConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<RoadtripConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(RoadtripConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RoadtripConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Roadtrip Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [api]
# base_url = "http://localhost:8080"   # Or set ROADTRIP_API_URL env var
# delete_timeout_secs = 10             # Or set ROADTRIP_DELETE_TIMEOUT_SECS
# request_timeout_secs = 30

# [general]
# credentials_file = "credentials.json"   # Path relative to ~/.roadtrip/
# web_url = "http://localhost:5173"       # Shown on the Login / Sign Up screens
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Environment overrides, captured once so resolution stays a pure function.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub api_url: Option<String>,
    pub delete_timeout_secs: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("ROADTRIP_API_URL").ok(),
            delete_timeout_secs: std::env::var("ROADTRIP_DELETE_TIMEOUT_SECS").ok(),
        }
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_api_url` is from the `--api-url` flag (None = not specified).
pub fn resolve(
    config: &RoadtripConfig,
    env: &EnvOverrides,
    cli_api_url: Option<&str>,
) -> ResolvedConfig {
    // API base URL: CLI → env → config → default
    let api_base_url = cli_api_url
        .map(|s| s.to_string())
        .or_else(|| env.api_url.clone())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    let api_base_url = api_base_url.trim_end_matches('/').to_string();

    // Delete timeout: env → config → default. Zero is rejected.
    let delete_timeout_secs = env
        .delete_timeout_secs
        .as_deref()
        .and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!("Ignoring ROADTRIP_DELETE_TIMEOUT_SECS={raw:?}: {e}");
                None
            }
        })
        .or(config.api.delete_timeout_secs)
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_DELETE_TIMEOUT_SECS);

    let request_timeout_secs = config
        .api
        .request_timeout_secs
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    // The HTTP client timeout also bounds DELETE, so it must not undercut the delete budget
    let request_timeout_secs = if request_timeout_secs < delete_timeout_secs {
        warn!("request_timeout_secs={request_timeout_secs} raised to {delete_timeout_secs}");
        delete_timeout_secs
    } else {
        request_timeout_secs
    };

    // Credentials file is relative to ~/.roadtrip/ unless absolute
    let credentials_file = config.general.credentials_file.as_ref().map(|file| {
        let path = PathBuf::from(file);
        if path.is_absolute() {
            path
        } else {
            config_dir().map(|d| d.join(&path)).unwrap_or(path)
        }
    });

    ResolvedConfig {
        api_base_url,
        web_url: config
            .general
            .web_url
            .clone()
            .unwrap_or_else(|| DEFAULT_WEB_URL.to_string()),
        delete_timeout: Duration::from_secs(delete_timeout_secs),
        request_timeout: Duration::from_secs(request_timeout_secs),
        credentials_file,
    }
}
