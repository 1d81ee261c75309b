use crate::{
    ConfigError, ConfigErrorResult, LoggingConfig, RetryConfig, SessionConfig, StorageConfig,
};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub retry: RetryConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for SF_CONFIG_DIR env var, else use ./.storefront/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply SF_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        // Auto-create config directory
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: SF_CONFIG_DIR env var > ./.storefront/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("SF_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".storefront"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.session.validate()?;
        self.retry.validate()?;
        self.storage.validate()?;

        Ok(())
    }

    /// Path of the customer-facing store's persisted identity record.
    pub fn customer_cache_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?
            .join(&self.storage.dir)
            .join(format!("{}.json", self.storage.customer_key)))
    }

    /// Path of the admin-facing store's persisted identity record.
    pub fn admin_cache_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?
            .join(&self.storage.dir)
            .join(format!("{}.json", self.storage.admin_key)))
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  session: attempts={}, retry_delay={}ms, fetch_timeout={}s",
            self.session.profile_fetch_attempts,
            self.session.profile_retry_delay_ms,
            self.session.fetch_timeout_secs
        );

        info!(
            "  retry: attempts={}, initial={}ms, max={}s, backoff={}x",
            self.retry.max_attempts,
            self.retry.initial_delay_ms,
            self.retry.max_delay_secs,
            self.retry.backoff_multiplier
        );

        info!(
            "  storage: dir={}, keys={}/{}",
            self.storage.dir, self.storage.customer_key, self.storage.admin_key
        );

        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Session
        Self::apply_env_parse(
            "SF_SESSION_PROFILE_FETCH_ATTEMPTS",
            &mut self.session.profile_fetch_attempts,
        );
        Self::apply_env_parse(
            "SF_SESSION_PROFILE_RETRY_DELAY_MS",
            &mut self.session.profile_retry_delay_ms,
        );
        Self::apply_env_parse(
            "SF_SESSION_FETCH_TIMEOUT_SECS",
            &mut self.session.fetch_timeout_secs,
        );

        // Retry
        Self::apply_env_parse("SF_RETRY_MAX_ATTEMPTS", &mut self.retry.max_attempts);
        Self::apply_env_parse(
            "SF_RETRY_INITIAL_DELAY_MS",
            &mut self.retry.initial_delay_ms,
        );
        Self::apply_env_parse("SF_RETRY_MAX_DELAY_SECS", &mut self.retry.max_delay_secs);
        Self::apply_env_parse(
            "SF_RETRY_BACKOFF_MULTIPLIER",
            &mut self.retry.backoff_multiplier,
        );
        Self::apply_env_bool("SF_RETRY_JITTER", &mut self.retry.jitter);

        // Storage
        Self::apply_env_string("SF_STORAGE_DIR", &mut self.storage.dir);
        Self::apply_env_string("SF_STORAGE_CUSTOMER_KEY", &mut self.storage.customer_key);
        Self::apply_env_string("SF_STORAGE_ADMIN_KEY", &mut self.storage.admin_key);

        // Logging
        Self::apply_env_parse("SF_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("SF_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("SF_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
