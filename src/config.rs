use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://database/casetrack.db";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub paths: PathsConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    /// Load the sample cases on startup when the database is empty
    pub seed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
    /// Built frontend bundle, served in production
    pub frontend_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub templates_dir: PathBuf,
    pub uploads_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            body_limit_bytes: 10 * 1024 * 1024,
            frontend_dir: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            uploads_dir: PathBuf::from("uploads"),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional `config.*` file and
    /// `CASETRACK_*` environment variables, in that order.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(config::File::with_name("config").required(false))
    }

    fn load_with<F>(file: F) -> anyhow::Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::defaults_from_env())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("CASETRACK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Built-in defaults, with the conventional `PORT` and `DATABASE_URL`
    /// variables applied underneath every other layer.
    fn defaults_from_env() -> Self {
        let mut defaults = Self::default();
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            defaults.server.port = port;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                defaults.database.url = url;
            }
        }
        defaults
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Origins allowed by CORS. Production serves the frontend itself, so no
    /// cross-origin access is granted there.
    pub fn cors_origins(&self) -> &[String] {
        if self.environment.is_production() {
            &[]
        } else {
            &self.cors.allowed_origins
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server_address(), "127.0.0.1:3001");
        assert_eq!(config.server.body_limit_bytes, 10_485_760);
        assert_eq!(config.database.url, "sqlite://database/casetrack.db");
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert!(!config.seed);
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let file = config::File::from_str(
            r#"
            environment = "production"
            seed = true

            [server]
            port = 8080
            frontend_dir = "frontend/dist"

            [rate_limit]
            max_requests = 5
            "#,
            FileFormat::Toml,
        );

        let config = AppConfig::load_with(file).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.frontend_dir, Some(PathBuf::from("frontend/dist")));
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 900);
        assert!(config.seed);
        assert!(config.cors_origins().is_empty());
    }

    #[test]
    fn test_development_keeps_cors_origins() {
        let config = AppConfig::default();
        assert_eq!(config.cors_origins(), ["http://localhost:5173".to_string()]);
    }
}
