use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_STORAGE_DIR: &str = "identity";
pub const DEFAULT_CUSTOMER_KEY: &str = "customer-auth";
pub const DEFAULT_ADMIN_KEY: &str = "admin-auth";

/// Where the persisted identity records live.
///
/// Each store owns one serialized record under its own key; the keys must
/// differ so an admin session wipe can never touch the customer record.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for identity records, relative to the config dir
    pub dir: String,
    /// File stem for the customer-facing store's record
    pub customer_key: String,
    /// File stem for the admin-facing store's record
    pub admin_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_STORAGE_DIR.to_string(),
            customer_key: DEFAULT_CUSTOMER_KEY.to_string(),
            admin_key: DEFAULT_ADMIN_KEY.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if std::path::Path::new(&self.dir).is_absolute() || self.dir.contains("..") {
            return Err(ConfigError::storage(
                "storage.dir must be relative and cannot contain '..'",
            ));
        }

        for (name, key) in [
            ("storage.customer_key", &self.customer_key),
            ("storage.admin_key", &self.admin_key),
        ] {
            if key.is_empty() {
                return Err(ConfigError::storage(format!("{} cannot be empty", name)));
            }
            if key.contains('/') || key.contains('\\') || key.contains("..") {
                return Err(ConfigError::storage(format!(
                    "{} must be a plain file stem, got {}",
                    name, key
                )));
            }
        }

        if self.customer_key == self.admin_key {
            return Err(ConfigError::storage(
                "storage.customer_key and storage.admin_key must differ",
            ));
        }

        Ok(())
    }
}
