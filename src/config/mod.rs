//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file when
//! present) with the `LEGAL_INTAKE` prefix. Nested values are separated by
//! double underscores:
//!
//! - `LEGAL_INTAKE__SERVER__PORT=8080` -> `server.port`
//! - `LEGAL_INTAKE__AI__GEMINI_API_KEY=...` -> `ai.gemini_api_key`
//! - `LEGAL_INTAKE__STORAGE__BACKEND=postgres` -> `storage.backend`
//! - `LEGAL_INTAKE__STORAGE__DATABASE__URL=...` -> `storage.database.url`
//!
//! ```no_run
//! use legal_intake::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod server;
mod storage;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, LogFormat, ServerConfig};
pub use storage::{DatabaseConfig, StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LEGAL_INTAKE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "LEGAL_INTAKE__AI__GEMINI_API_KEY",
        "LEGAL_INTAKE__AI__PRIMARY_PROVIDER",
        "LEGAL_INTAKE__AI__OPENAI_API_KEY",
        "LEGAL_INTAKE__SERVER__PORT",
        "LEGAL_INTAKE__SERVER__LOG_FORMAT",
        "LEGAL_INTAKE__STORAGE__BACKEND",
        "LEGAL_INTAKE__STORAGE__DATABASE__URL",
    ];

    fn set_minimal_env() {
        env::set_var("LEGAL_INTAKE__AI__GEMINI_API_KEY", "gm-test-key");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert!(config.ai.has_gemini());
        assert_eq!(config.ai.primary_provider, AiProvider::Gemini);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_primary_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("LEGAL_INTAKE__AI__PRIMARY_PROVIDER", "openai");
        env::set_var("LEGAL_INTAKE__AI__GEMINI_API_KEY", "gm-test-key");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.primary_provider, AiProvider::OpenAI);
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn test_server_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("LEGAL_INTAKE__SERVER__PORT", "3000");
        env::set_var("LEGAL_INTAKE__SERVER__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert!(!config.is_production());
    }

    #[test]
    fn test_postgres_backend_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("LEGAL_INTAKE__STORAGE__BACKEND", "postgres");
        env::set_var(
            "LEGAL_INTAKE__STORAGE__DATABASE__URL",
            "postgres://intake@localhost/intake",
        );
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        let db = config.storage.postgres().expect("postgres section");
        assert_eq!(db.url, "postgres://intake@localhost/intake");
        assert!(config.validate().is_ok());
    }
}
