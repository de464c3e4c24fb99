use config::{Config, ConfigError, Environment};
use serde::Deserialize;

use crate::postgres::PostgresConfig;

/// Settings of the service read from environment variables, e.g. `DB_HOST` or `USE_IN_MEMORY_DB`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppSettings {
    pub use_in_memory_db: bool,
    pub db_host: String,
    pub db_username: String,
    pub db_password: String,
    pub http_host: String,
    pub http_port: u16,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::default())
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("use_in_memory_db", false)?
            .set_default("db_host", "127.0.0.1")?
            .set_default("db_username", "postgres")?
            .set_default("db_password", "postgres")?
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8080)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn postgres_config(&self) -> PostgresConfig {
        PostgresConfig {
            hostname: self.db_host.clone(),
            username: self.db_username.clone(),
            password: self.db_password.clone(),
        }
    }
}
