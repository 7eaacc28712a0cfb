use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

/// Which counters a reconciliation pass recomputes.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileScope {
    /// Only the counter the removal just decremented.
    Touched,
    /// Every reconcilable counter of the affected blog.
    All,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CounterConfig {
    /// Chance in `[0, 1]` that a removal triggers a reconciliation pass.
    pub reconcile_probability: f64,
    pub reconcile_scope: ReconcileScope,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub counters: CounterConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3001)?
            .set_default("database.url", "sqlite://inkpost.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.token_ttl_minutes", 30)?
            .set_default("counters.reconcile_probability", 0.01)?
            .set_default("counters.reconcile_scope", "touched")?
            .add_source(File::with_name("config/inkpost").required(false))
            // Override from environment (e.g., INKPOST__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("INKPOST").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set".to_owned(),
            ));
        }
        if self.auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "auth.token_ttl_minutes must be positive".to_owned(),
            ));
        }
        let p = self.counters.reconcile_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::Message(format!(
                "counters.reconcile_probability must be within [0, 1], got {}",
                p
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
