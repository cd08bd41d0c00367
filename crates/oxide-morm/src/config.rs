//! Client configuration.

use oxide_morm_core::{Compiler, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Default size of the connection pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection URL variable read by [`ClientConfig::from_env`].
pub const URL_VAR: &str = "DATABASE_URL";

/// Engine name variable read by [`ClientConfig::from_env`].
pub const ENGINE_VAR: &str = "MORM_ENGINE";

/// Database name variable read by [`ClientConfig::from_env`].
pub const DATABASE_VAR: &str = "MORM_DATABASE";

/// Pool size variable read by [`ClientConfig::from_env`].
pub const MAX_CONNECTIONS_VAR: &str = "MORM_MAX_CONNECTIONS";

/// Settings for a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Target engine.
    pub engine: Engine,
    /// Connection URL, e.g. `sqlite://app.db`.
    pub url: String,
    /// Database that statements are scoped to (SQL Server only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl ClientConfig {
    /// Creates a configuration with default pool settings.
    pub fn new(engine: Engine, url: impl Into<String>) -> Self {
        Self {
            engine,
            url: url.into(),
            database: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Sets the database name.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Sets the pool size.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Parses a JSON configuration.
    ///
    /// ```
    /// use oxide_morm::{ClientConfig, Engine};
    ///
    /// let config = ClientConfig::from_json(r#"{"engine": "sqlite", "url": "sqlite::memory:"}"#).unwrap();
    /// assert_eq!(config.engine, Engine::Sqlite);
    /// assert_eq!(config.max_connections, 5);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration from the environment.
    ///
    /// `DATABASE_URL` is required. `MORM_ENGINE` defaults to `sqlite`;
    /// `MORM_DATABASE` and `MORM_MAX_CONNECTIONS` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup(URL_VAR).ok_or_else(|| ClientError::Config(format!("{URL_VAR} is not set")))?;

        let engine = match lookup(ENGINE_VAR) {
            Some(name) => Engine::from_name(&name)
                .ok_or_else(|| ClientError::Config(format!("unknown engine '{name}' in {ENGINE_VAR}")))?,
            None => Engine::Sqlite,
        };

        let mut config = Self::new(engine, url);
        if let Some(database) = lookup(DATABASE_VAR) {
            config = config.with_database(database);
        }
        if let Some(max) = lookup(MAX_CONNECTIONS_VAR) {
            let max = max.parse::<u32>().map_err(|_| {
                ClientError::Config(format!("{MAX_CONNECTIONS_VAR} must be a positive integer, got '{max}'"))
            })?;
            config = config.with_max_connections(max);
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ClientError::Config("connection URL is empty".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ClientError::Config("max_connections must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Builds the compiler for this configuration.
    pub fn compiler(&self) -> Result<Compiler> {
        let compiler = Compiler::new(self.engine)?;
        Ok(match &self.database {
            Some(database) => compiler.with_database(database.clone()),
            None => compiler,
        })
    }
}
