//! Configuration validation logic
//!
//! Each configuration section validates itself; [`Settings::validate`]
//! reports the first failing section.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, LoggerSettings, ServerConfig, Settings, StorageConfig,
};

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Hard ceiling on the configurable image size (64 MiB).
const MAX_IMAGE_KIB_CEILING: u64 = 64 * 1024;

impl ServerConfig {
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// # Validation Rules
    /// - URL must be a PostgreSQL connection string
    /// - Pool sizes must be positive and min must not exceed max
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

impl StorageConfig {
    /// # Validation Rules
    /// - Public directory must be set
    /// - Max image size must be between 1 KiB and 64 MiB
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.public_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "storage.public_dir",
                "Public directory is required for category images.",
            ));
        }

        if self.max_image_kib == 0 || self.max_image_kib > MAX_IMAGE_KIB_CEILING {
            return Err(ConfigError::ValidationError {
                field: "storage.max_image_kib".to_string(),
                message: format!(
                    "Max image size must be between 1 and {} KiB.",
                    MAX_IMAGE_KIB_CEILING
                ),
            });
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings, returning the first error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.storage.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/resto".to_string();
        settings
    }

    fn field_of(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_settings_valid() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_server_port_zero() {
        let mut settings = valid_settings();
        settings.server.port = 0;
        assert_eq!(field_of(settings.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_database_url_required() {
        let settings = Settings::default();
        assert_eq!(field_of(settings.validate().unwrap_err()), "database.url");
    }

    #[test]
    fn test_database_url_must_be_postgres() {
        let mut settings = valid_settings();
        settings.database.url = "mysql://localhost/resto".to_string();
        assert_eq!(field_of(settings.validate().unwrap_err()), "database.url");
    }

    #[test]
    fn test_database_min_exceeds_max() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 5;
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "database.min_connections"
        );
    }

    #[test]
    fn test_storage_max_image_bounds() {
        let mut settings = valid_settings();
        settings.storage.max_image_kib = 0;
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "storage.max_image_kib"
        );

        settings.storage.max_image_kib = MAX_IMAGE_KIB_CEILING + 1;
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "storage.max_image_kib"
        );

        settings.storage.max_image_kib = MAX_IMAGE_KIB_CEILING;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_storage_public_dir_required() {
        let mut settings = valid_settings();
        settings.storage.public_dir = std::path::PathBuf::new();
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "storage.public_dir"
        );
    }

    #[test]
    fn test_logger_invalid_level() {
        let mut settings = valid_settings();
        settings.logger.level = "verbose".to_string();
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger.level");
    }

    #[test]
    fn test_logger_needs_an_output() {
        let mut settings = valid_settings();
        settings.logger.console.enabled = false;
        settings.logger.file.enabled = false;
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger");
    }

    #[test]
    fn test_logger_file_enabled_empty_path() {
        let mut settings = valid_settings();
        settings.logger.file.enabled = true;
        settings.logger.file.path = "  ".to_string();
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "logger.file.path"
        );
    }
}
