//! Layered configuration loading.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

const CONFIG_DIR_ENV: &str = "RESTO_CONFIG_DIR";

const CONFIG_FILE_ENV: &str = "RESTO_CONFIG_FILE";

const DEFAULT_CONFIG_DIR: &str = "config";

/// Prefix for overrides such as `RESTO_STORAGE__PUBLIC_DIR`.
const ENV_PREFIX: &str = "RESTO";

const ENV_SEPARATOR: &str = "__";

/// Where the TOML layers come from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    /// `default.toml` (required), `{env}.toml` and `local.toml` (optional)
    Layered(PathBuf),
    /// One explicit file; no layering
    Single(PathBuf),
}

/// Loads [`Settings`] from TOML layers plus `RESTO_*` environment variables.
#[derive(Debug)]
pub struct ConfigLoader {
    source: Source,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Builds a loader from `RESTO_CONFIG_DIR`, `RESTO_CONFIG_FILE` and
    /// `RESTO_APP_ENV`.
    ///
    /// # Errors
    ///
    /// `RESTO_CONFIG_DIR` and `RESTO_CONFIG_FILE` are mutually exclusive.
    pub fn new() -> Result<Self, ConfigError> {
        let dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        let source = match (dir, file) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::mutual_exclusivity(
                    "RESTO_CONFIG_DIR and RESTO_CONFIG_FILE cannot both be set. \
                     Use RESTO_CONFIG_DIR for layered configuration or \
                     RESTO_CONFIG_FILE for a single configuration file.",
                ));
            }
            (None, Some(file)) => Source::Single(file),
            (Some(dir), None) => Source::Layered(dir),
            (None, None) => Source::Layered(PathBuf::from(DEFAULT_CONFIG_DIR)),
        };

        Ok(Self {
            source,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Loads exactly `path` (plus environment overrides), as `--config` does.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Single(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Overrides the environment used to pick `{env}.toml`.
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Builds, deserializes and validates the settings.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let settings = self.load_unvalidated()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Builds and deserializes without validation, for callers that apply
    /// further overrides first.
    pub fn load_unvalidated(&self) -> Result<Settings, ConfigError> {
        self.build_config()?.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = match &self.source {
            Source::Single(file) => add_file(Config::builder(), file, true)?,
            Source::Layered(dir) => {
                let builder = add_file(Config::builder(), &dir.join("default.toml"), true)?;
                let env_file = dir.join(format!("{}.toml", self.environment.as_str()));
                let builder = add_file(builder, &env_file, false)?;
                add_file(builder, &dir.join("local.toml"), false)?
            }
        };

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()
            .map_err(ConfigError::from)
    }
}

fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if required && !path.exists() {
        return Err(ConfigError::file_not_found(format!(
            "Required configuration file not found: {}",
            path.display()
        )));
    }

    Ok(builder.add_source(File::from(path).format(FileFormat::Toml).required(required)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Env vars are process-global; serialize the tests that touch them.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    const BASE: &str = r#"
[server]
host = "127.0.0.1"
port = 8000

[database]
url = "postgres://localhost/resto"

[storage]
public_dir = "public"
max_image_kib = 2048
"#;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    struct EnvGuard {
        saved: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            let mut guard = Self { saved: Vec::new() };
            for key in [CONFIG_DIR_ENV, CONFIG_FILE_ENV, AppEnvironment::ENV_VAR] {
                guard.remove(key);
            }
            guard
        }

        fn set(&mut self, key: &str, value: &str) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::set_var(key, value);
            }
        }

        fn remove(&mut self, key: &str) {
            self.saved.push((key.to_string(), std::env::var(key).ok()));
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, original) in self.saved.iter().rev() {
                unsafe {
                    match original {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    #[test]
    fn test_default_source_is_config_dir() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();

        let loader = ConfigLoader::new().unwrap();
        assert_eq!(loader.source, Source::Layered(PathBuf::from("config")));
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_mutual_exclusivity() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/etc/resto");
        env.set(CONFIG_FILE_ENV, "/etc/resto/app.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains("RESTO_CONFIG_DIR"));
            }
            other => panic!("Expected MutualExclusivityError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_default_toml() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());

        match ConfigLoader::new().unwrap().load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("default.toml")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_layered_precedence() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let mut env = EnvGuard::new();
        let dir = setup_config_dir(&[
            ("default.toml", BASE),
            ("production.toml", "[server]\nport = 9000\n"),
            ("local.toml", "[storage]\nmax_image_kib = 1024\n"),
        ]);
        env.set(CONFIG_DIR_ENV, dir.path().to_str().unwrap());
        env.set(AppEnvironment::ENV_VAR, "production");
        env.set("RESTO_SERVER__HOST", "0.0.0.0");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.storage.max_image_kib, 1024);
        assert_eq!(settings.database.url, "postgres://localhost/resto");
    }

    #[test]
    fn test_single_file_mode_skips_layers() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = setup_config_dir(&[
            ("app.toml", BASE),
            ("local.toml", "[server]\nport = 1234\n"),
        ]);

        let settings = ConfigLoader::from_file(dir.path().join("app.toml"))
            .load()
            .unwrap();
        assert_eq!(settings.server.port, 8000);
    }

    #[test]
    fn test_load_rejects_invalid_settings() {
        let _lock = TEST_MUTEX.lock().unwrap();
        let _env = EnvGuard::new();
        let dir = setup_config_dir(&[("app.toml", "[server]\nport = 8000\n")]);

        let loader = ConfigLoader::from_file(dir.path().join("app.toml"));
        assert!(matches!(
            loader.load(),
            Err(ConfigError::ValidationError { ref field, .. }) if field == "database.url"
        ));
        assert!(loader.load_unvalidated().is_ok());
    }
}
