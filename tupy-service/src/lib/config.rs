use std::env;

use config::builder::DefaultState;
use config::Config as ConfigSource;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: String,
    pub access_token_exp_minutes: i64,
}

impl JwtConfig {
    /// One year.
    pub const MAX_ACCESS_TOKEN_EXP_MINUTES: i64 = 525_600;
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub origins: Vec<String>,
}

/// Account provisioned by the `create-admin-user` binary.
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, CORS__ORIGINS=a,b, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            );

        Self::build(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigSource::builder()
            .set_default("service.title", "Tupy Backend")?
            .set_default("service.version", env!("CARGO_PKG_VERSION"))?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9000)?
            .set_default("server.debug", false)?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.algorithm", "HS256")?
            .set_default("jwt.access_token_exp_minutes", 60)?
            .set_default("cors.origins", Vec::<String>::new())?
            .set_default("admin.email", "admin@example.com")?
            .set_default("admin.first_name", "Admin")?
            .set_default("admin.last_name", "User")
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if !(1..=JwtConfig::MAX_ACCESS_TOKEN_EXP_MINUTES)
            .contains(&self.jwt.access_token_exp_minutes)
        {
            return Err(ConfigError::Message(format!(
                "jwt.access_token_exp_minutes must be between 1 and {}",
                JwtConfig::MAX_ACCESS_TOKEN_EXP_MINUTES
            )));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".into(),
            ));
        }
        // Credentialed CORS cannot answer with a wildcard origin.
        if self.cors.origins.iter().any(|origin| origin == "*") {
            return Err(ConfigError::Message(
                "cors.origins must list explicit origins, not \"*\"".into(),
            ));
        }
        Ok(())
    }
}
