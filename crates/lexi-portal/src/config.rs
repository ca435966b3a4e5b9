// Configuration loading and parsing (portal.toml).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "LEXI_PORTAL_BASE_URL";

const CONFIG_FILE: &str = "portal.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout. Absent means requests never time out.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Treat non-2xx responses as errors. Off by default: the backend's
    /// error bodies are decoded like any other response, so a failed search
    /// shows as an empty result list.
    #[serde(default)]
    pub strict_status: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            request_timeout_secs: None,
            strict_status: false,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConfig {
    /// Length of the window filled by the "last N days" shortcut.
    #[serde(default = "default_date_range_days")]
    pub default_date_range_days: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            default_date_range_days: default_date_range_days(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_directory")]
    pub directory: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            directory: default_log_directory(),
            filter: default_log_filter(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_date_range_days() -> u32 {
    30
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filter() -> String {
    "lexi_portal=info,warn".to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate a single config file.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let text = read_file(path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load `config/portal.toml` relative to `base_dir`.
///
/// This is the lower-level primitive that does not copy defaults or fall
/// back to other locations.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    load_config_file(&base_dir.join("config").join(CONFIG_FILE))
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Per-user config file location, e.g. `~/.config/lexi-portal/portal.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "lexi-portal")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Resolve the configuration for a run started in `base_dir`.
///
/// Order: `base_dir/config/portal.toml` (seeded from `defaults/`), then the
/// per-user file, then built-in defaults. `user_file` is injectable for
/// tests.
pub fn resolve_config(base_dir: &Path, user_file: Option<&Path>) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;

    let local = base_dir.join("config").join(CONFIG_FILE);
    if local.exists() {
        return load_config_file(&local);
    }
    if let Some(path) = user_file.filter(|p| p.exists()) {
        return load_config_file(path);
    }
    Ok(Config::default())
}

/// Convenience wrapper: resolves config relative to the current working
/// directory and applies the environment override.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    let user_file = user_config_path();
    let mut config = resolve_config(&cwd, user_file.as_deref())?;
    apply_env_override(&mut config, std::env::var(BASE_URL_ENV).ok())?;
    Ok(config)
}

/// Replace the base URL when an override is given, re-validating it.
pub fn apply_env_override(config: &mut Config, base_url: Option<String>) -> Result<(), ConfigError> {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
        validate(config)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = &config.api.base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("must start with http:// or https://, got {url:?}"),
        });
    }

    if config.api.request_timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError {
            field: "api.request_timeout_secs".into(),
            message: "must be greater than 0 when set".into(),
        });
    }

    if config.search.default_date_range_days == 0 {
        return Err(ConfigError::ValidationError {
            field: "search.default_date_range_days".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.logging.directory.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.directory".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
