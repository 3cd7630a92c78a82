use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE_URL: &str = "https://connectapi.garmin.com";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Connection settings handed to the Garmin session.
#[derive(Debug, Clone)]
pub struct GarminConfig {
    pub api_base_url: String,
    /// Token given directly in config or environment
    pub access_token: Option<String>,
    /// File holding the OAuth access token when `access_token` is unset
    pub token_file: PathBuf,
    pub page_size: u32,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Garmin Connect API base URL
    pub api_base_url: ConfigValue<String>,
    /// Path of the file holding the access token
    pub token_file: ConfigValue<PathBuf>,
    /// Access token, never written out by `config show`
    #[serde(skip_serializing)]
    pub access_token: Option<ConfigValue<String>>,
    /// Workouts fetched per listing request
    pub page_size: ConfigValue<u32>,
    /// Default functional threshold power for imports
    pub ftp: ConfigValue<Option<i64>>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_base_url: Option<String>,
    token_file: Option<PathBuf>,
    access_token: Option<String>,
    page_size: Option<u32>,
    ftp: Option<i64>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`], reading environment variables through `env`.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Start with defaults
        let mut api_base_url =
            ConfigValue::new(DEFAULT_API_BASE_URL.to_string(), ConfigSource::Default);
        let mut token_file =
            ConfigValue::new(Self::default_data_dir().join("token"), ConfigSource::Default);
        let mut access_token = None;
        let mut page_size = ConfigValue::new(DEFAULT_PAGE_SIZE, ConfigSource::Default);
        let mut ftp = ConfigValue::new(None, ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(url) = file_config.api_base_url {
                api_base_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(file) = file_config.token_file {
                token_file = ConfigValue::new(resolve_relative(&path, file), ConfigSource::File);
            }
            if let Some(token) = file_config.access_token {
                access_token = Some(ConfigValue::new(token, ConfigSource::File));
            }
            if let Some(size) = file_config.page_size {
                page_size = ConfigValue::new(size, ConfigSource::File);
            }
            if let Some(value) = file_config.ftp {
                ftp = ConfigValue::new(Some(value), ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Some(url) = env("GARMIN_API_URL") {
            api_base_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Some(file) = env("GARMIN_TOKEN_FILE") {
            token_file = ConfigValue::new(PathBuf::from(file), ConfigSource::Environment);
        }
        if let Some(token) = env("GARMIN_ACCESS_TOKEN") {
            access_token = Some(ConfigValue::new(token, ConfigSource::Environment));
        }
        if let Some(size) = env("GARMIN_PAGE_SIZE") {
            let parsed = size
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("GARMIN_PAGE_SIZE", size.clone()))?;
            page_size = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Some(value) = env("GARMIN_FTP") {
            let parsed = value
                .parse()
                .map_err(|_| ConfigError::InvalidEnv("GARMIN_FTP", value.clone()))?;
            ftp = ConfigValue::new(Some(parsed), ConfigSource::Environment);
        }

        if page_size.value == 0 {
            return Err(ConfigError::InvalidValue(
                "page_size",
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_base_url,
            token_file,
            access_token,
            page_size,
            ftp,
            config_file,
        })
    }

    /// Settings for opening a Garmin session.
    pub fn garmin(&self) -> GarminConfig {
        GarminConfig {
            api_base_url: self.api_base_url.value.clone(),
            access_token: self.access_token.as_ref().map(|t| t.value.clone()),
            token_file: self.token_file.value.clone(),
            page_size: self.page_size.value,
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/garmin-workouts/
    /// - macOS: ~/Library/Application Support/garmin-workouts/
    /// - Windows: %APPDATA%/garmin-workouts/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("garmin-workouts")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/garmin-workouts/
    /// - macOS: ~/Library/Application Support/garmin-workouts/
    /// - Windows: %APPDATA%/garmin-workouts/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("garmin-workouts")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve_relative(config_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&path))
            .unwrap_or(path)
    } else {
        path
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(&'static str, String),
    InvalidValue(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(var, value) => {
                write!(f, "Invalid value '{}' for environment variable {}", value, var)
            }
            ConfigError::InvalidValue(key, reason) => {
                write!(f, "Invalid config value '{}': {}", key, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
