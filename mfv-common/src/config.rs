//! Configuration loading and config file resolution
//!
//! Settings sources priority:
//! 1. Command-line arguments (applied by the binary after loading)
//! 2. Environment variables (`MFV_NCBI_API_KEY`, `MFV_REGISTRY_URL`)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "MFV_CONFIG";

/// Environment variable overriding `registry.api_key`
pub const API_KEY_ENV_VAR: &str = "MFV_NCBI_API_KEY";

/// Environment variable overriding `registry.base_url`
pub const REGISTRY_URL_ENV_VAR: &str = "MFV_REGISTRY_URL";

/// NCBI E-utilities base URL
pub const DEFAULT_REGISTRY_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Floor between two outbound registry requests (NCBI allows 3 req/sec without a key)
pub const MIN_REGISTRY_INTERVAL_MS: u64 = 335;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "manifest-validator/0.1.0";
const CONFIG_DIR_NAME: &str = "manifest-validator";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration loaded from TOML file
///
/// Every field has a built-in default, so an empty file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Taxonomy registry connection settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Taxonomy registry connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// E-utilities base URL (no trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Minimum delay between two registry requests, in milliseconds
    ///
    /// Values below [`MIN_REGISTRY_INTERVAL_MS`] are raised to it.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// NCBI API key (optional)
    #[serde(default)]
    pub api_key: Option<String>,

    /// `tool` parameter identifying this program to NCBI (optional)
    #[serde(default)]
    pub tool: Option<String>,

    /// Contact `email` parameter sent to NCBI (optional)
    #[serde(default)]
    pub email: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_interval_ms: default_min_interval_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            api_key: None,
            tool: None,
            email: None,
        }
    }
}

impl RegistryConfig {
    /// Effective minimum interval between registry requests
    pub fn min_interval(&self) -> Duration {
        if self.min_interval_ms < MIN_REGISTRY_INTERVAL_MS {
            warn!(
                configured_ms = self.min_interval_ms,
                floor_ms = MIN_REGISTRY_INTERVAL_MS,
                "Registry interval below floor, using floor"
            );
            return Duration::from_millis(MIN_REGISTRY_INTERVAL_MS);
        }
        Duration::from_millis(self.min_interval_ms)
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_min_interval_ms() -> u64 {
    MIN_REGISTRY_INTERVAL_MS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Where a config file path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` flag
    CommandLine,
    /// `MFV_CONFIG` environment variable
    Environment,
    /// Platform user config directory
    DefaultLocation,
}

impl ConfigSource {
    /// Explicitly requested files must load; the default location may be absent
    pub fn is_explicit(self) -> bool {
        !matches!(self, ConfigSource::DefaultLocation)
    }
}

/// Resolve the config file path
///
/// **Priority:** command line → environment → user config directory.
/// Returns `None` when no candidate exists at all.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<(PathBuf, ConfigSource)> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some((path.to_path_buf(), ConfigSource::CommandLine));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some((PathBuf::from(path), ConfigSource::Environment));
        }
    }

    // Priority 3: Platform config directory
    default_config_path()
        .filter(|p| p.exists())
        .map(|p| (p, ConfigSource::DefaultLocation))
}

/// `~/.config/manifest-validator/config.toml` (or the platform equivalent)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// No config file found
    BuiltInDefaults,
    /// Loaded from a file
    File { path: PathBuf, source: ConfigSource },
    /// Default-location file could not be used; built-in defaults applied
    Fallback { path: PathBuf, reason: String },
}

/// Loaded configuration plus its origin
///
/// Loading happens before the tracing subscriber exists, so the origin is
/// kept and reported through [`LoadedConfig::log_origin`] afterwards.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub origin: ConfigOrigin,
}

impl LoadedConfig {
    /// Emit the config origin; call once tracing is initialised
    pub fn log_origin(&self) {
        match &self.origin {
            ConfigOrigin::BuiltInDefaults => info!("No config file found, using built-in defaults"),
            ConfigOrigin::File { path, source } => {
                info!(path = %path.display(), source = ?source, "Loaded config file")
            }
            ConfigOrigin::Fallback { path, reason } => warn!(
                path = %path.display(),
                "Config file unusable ({}); using built-in defaults",
                reason
            ),
        }
    }
}

/// Load configuration from the resolved file, then apply environment overrides
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    load_config_from(resolve_config_path(cli_arg))
}

/// Load configuration from an already resolved path
///
/// A file found only at the default location degrades to built-in defaults
/// when it cannot be read; an explicitly requested file is an error.
pub fn load_config_from(resolved: Option<(PathBuf, ConfigSource)>) -> Result<LoadedConfig> {
    let (mut config, origin) = match resolved {
        Some((path, source)) => match load_toml_config(&path) {
            Ok(config) => (config, ConfigOrigin::File { path, source }),
            Err(e) if source.is_explicit() => return Err(e),
            Err(e) => (
                TomlConfig::default(),
                ConfigOrigin::Fallback {
                    path,
                    reason: e.to_string(),
                },
            ),
        },
        None => (TomlConfig::default(), ConfigOrigin::BuiltInDefaults),
    };

    apply_env_overrides(&mut config);
    Ok(LoadedConfig { config, origin })
}

/// Overlay `MFV_NCBI_API_KEY` and `MFV_REGISTRY_URL` onto a loaded config
pub fn apply_env_overrides(config: &mut TomlConfig) {
    if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
        if !key.trim().is_empty() {
            config.registry.api_key = Some(key.trim().to_string());
        }
    }

    if let Ok(url) = std::env::var(REGISTRY_URL_ENV_VAR) {
        if !url.trim().is_empty() {
            config.registry.base_url = url.trim().trim_end_matches('/').to_string();
        }
    }
}
