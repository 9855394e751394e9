//! Process-wide configuration
//!
//! Connection settings for the three stores, the HTTP listener and the chart
//! refresh period. Loaded once at startup from an optional YAML file, then
//! overridden from the environment so credentials never live in the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Relational store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MySqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Upper bound of the connection pool
    pub max_connections: u32,
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "academicworld".to_string(),
            max_connections: 8,
        }
    }
}

/// Graph store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "neo4j://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "academicworld".to_string(),
            max_connections: 8,
        }
    }
}

/// Document store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017/".to_string(),
            database: "academicworld".to_string(),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8050,
        }
    }
}

impl ServerConfig {
    /// Listener address, `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub mysql: MySqlConfig,
    pub neo4j: Neo4jConfig,
    pub mongo: MongoConfig,
    pub server: ServerConfig,
    /// Seconds between ranking-chart refreshes (hourly when unset)
    pub refresh_interval_secs: Option<u64>,
}

impl DashboardConfig {
    /// Default refresh period of the ranking charts
    pub const DEFAULT_REFRESH_SECS: u64 = 60 * 60;

    /// Read a YAML file; missing sections fall back to defaults
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `SCHOLARBOARD_*` overrides from any key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SCHOLARBOARD_MYSQL_PASSWORD") {
            self.mysql.password = v;
        }
        if let Some(v) = lookup("SCHOLARBOARD_NEO4J_PASSWORD") {
            self.neo4j.password = v;
        }
        if let Some(v) = lookup("SCHOLARBOARD_MONGO_URI") {
            self.mongo.uri = v;
        }
        if let Some(v) = lookup("SCHOLARBOARD_PORT") {
            self.server.port = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SCHOLARBOARD_PORT".to_string(),
                value: v.clone(),
            })?;
        }
        Ok(())
    }

    /// Refresh period of the ranking charts
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(
            self.refresh_interval_secs
                .filter(|s| *s > 0)
                .unwrap_or(Self::DEFAULT_REFRESH_SECS),
        )
    }
}
