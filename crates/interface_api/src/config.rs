//! API configuration

use serde::Deserialize;

use infra_db::DEFAULT_DATABASE_URL;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Upper bound of the connection pool
    pub db_max_connections: u32,
    /// Log level
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Origin allowed by CORS; any origin when unset
    pub cors_allowed_origin: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: 10,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            cors_allowed_origin: None,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    ///
    /// `DATABASE_URL`, when set, overrides `API_DATABASE_URL`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let mut loaded = Self::from_environment(config::Environment::with_prefix("API"))?;
        if let Ok(url) = std::env::var("DATABASE_URL") {
            loaded.database_url = url;
        }
        Ok(loaded)
    }

    fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> ApiConfig {
        let source = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_environment(config::Environment::with_prefix("API").source(Some(source)))
            .unwrap()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = load(&[]);

        assert_eq!(config.server_addr(), "0.0.0.0:5000");
        assert_eq!(config.database_url, "postgres://localhost/beneficiarios");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.cors_allowed_origin.is_none());
    }

    #[test]
    fn test_prefixed_variables_override_defaults() {
        let config = load(&[
            ("API_PORT", "8081"),
            ("API_LOG_FORMAT", "json"),
            ("API_DB_MAX_CONNECTIONS", "3"),
            ("API_CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
        ]);

        assert_eq!(config.port, 8081);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.db_max_connections, 3);
        assert_eq!(config.cors_allowed_origin.as_deref(), Some("http://localhost:3000"));
    }
}
