use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::media::DEFAULT_JPEG_QUALITY;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_DATABASE_URL: &str = "sqlite://storefront.db?mode=rwc";
const DEFAULT_MEDIA_ROOT: &str = "media";
const CONFIG_DIR: &str = "config";

/// Product image settings
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    /// JPEG quality used when re-encoding uploads (1-100)
    #[serde(default = "default_jpeg_quality")]
    #[validate(range(min = 1, max = 100))]
    pub jpeg_quality: u8,

    /// Optional lower bound on the source resolution
    #[serde(default)]
    pub min_width: Option<u32>,
    #[serde(default)]
    pub min_height: Option<u32>,

    /// Optional upper bound on the source resolution
    #[serde(default)]
    pub max_width: Option<u32>,
    #[serde(default)]
    pub max_height: Option<u32>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
        }
    }
}

/// Media storage configuration
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Directory normalized images are written to
    #[serde(default = "default_media_root")]
    #[validate(length(min = 1))]
    pub root: String,

    #[serde(default)]
    #[validate]
    pub image: ImageConfig,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
            image: ImageConfig::default(),
        }
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1))]
    pub database_url: String,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    #[validate(range(min = 1))]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// Media storage and image normalization
    #[serde(default)]
    #[validate]
    pub media: MediaConfig,
}

impl AppConfig {
    /// Creates a new configuration with default tuning
    pub fn new(database_url: String, media_root: String, environment: String) -> Self {
        Self {
            database_url,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
            media: MediaConfig {
                root: media_root,
                ..Default::default()
            },
        }
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_media_root() -> String {
    DEFAULT_MEDIA_ROOT.to_string()
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("storefront={},sea_orm=warn", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let filter = EnvFilter::new(filter_directive);
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from(Path::new(CONFIG_DIR))
}

/// Same as [`load_config`], reading files from `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let config = Config::builder()
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("environment", run_env.as_str())?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(&run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::TempDir;

    fn base_config() -> AppConfig {
        AppConfig::new(
            "sqlite://storefront.db?mode=memory".into(),
            "media".into(),
            "development".into(),
        )
    }

    #[test]
    fn new_config_uses_defaults() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.environment, "development");
        assert_eq!(cfg.media.image.jpeg_quality, 90);
        assert_eq!(cfg.media.image.min_width, None);
        assert_eq!(cfg.db_max_connections, 10);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut cfg = base_config();
        cfg.log_level = "loud".into();
        let errors = cfg.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("log_level"));
    }

    #[test]
    fn out_of_range_jpeg_quality_is_rejected() {
        let mut cfg = base_config();
        cfg.media.image.jpeg_quality = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn files_in_the_config_directory_are_layered() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
                database_url = "sqlite://from-file.db?mode=rwc"
                log_json = true

                [media]
                root = "/srv/media"

                [media.image]
                jpeg_quality = 75
                min_width = 100
                min_height = 100
            "#,
        )
        .unwrap();

        let cfg = load_config_from(dir.path()).unwrap();
        assert_eq!(cfg.database_url, "sqlite://from-file.db?mode=rwc");
        assert!(cfg.log_json);
        assert_eq!(cfg.media.root, "/srv/media");
        assert_eq!(cfg.media.image.jpeg_quality, 75);
        assert_eq!(cfg.media.image.min_width, Some(100));
        assert_eq!(cfg.media.image.max_width, None);
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("default.toml"), "log_level = \"chatty\"\n").unwrap();

        assert_matches!(load_config_from(dir.path()), Err(AppConfigError::Validation(_)));
    }
}
