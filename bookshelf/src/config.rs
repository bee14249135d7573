//! Server configuration.
//!
//! Defaults reproduce the fixed deployment: port 8000 on all interfaces and the
//! `NewBook` database on `mongodb://mongo-service:27017`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// MongoDB connection string
    #[serde(default = "default_mongo_uri")]
    pub mongo_uri: String,

    /// Database holding the `Book` collection
    #[serde(default = "default_database")]
    pub database: String,

    /// Connect and server-selection timeout for the store client, in seconds
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Deadline for each store operation, in seconds
    #[serde(default = "default_timeout_secs")]
    pub operation_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_mongo_uri() -> String {
    "mongodb://mongo-service:27017".to_string()
}

fn default_database() -> String {
    "NewBook".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            mongo_uri: default_mongo_uri(),
            database: default_database(),
            connect_timeout_secs: default_timeout_secs(),
            operation_timeout_secs: default_timeout_secs(),
        }
    }
}

impl ServerConfig {
    /// Parses a JSON configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr(), "0.0.0.0:8000");
        assert_eq!(config.mongo_uri, "mongodb://mongo-service:27017");
        assert_eq!(config.database, "NewBook");
        assert_eq!(config.operation_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ServerConfig::from_json(r#"{ "port": 9000, "database": "Shelf" }"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database, "Shelf");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }
}
