//! Server configuration

use std::time::Duration;

use crate::error::BoxError;

/// Local front-ends that are always allowed alongside the configured origins
const DEV_ORIGINS: [&str; 2] = ["http://localhost:3002", "http://localhost:3003"];

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL (env: DATABASE_URL, or assembled from DB_* vars)
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
    /// Pool size
    pub db_max_connections: u32,
    /// Pool acquire timeout
    pub db_acquire_timeout: Duration,
    /// Pool idle timeout
    pub db_idle_timeout: Duration,
    /// Allowed CORS origins (CLIENT_URL, ADMIN_URL, MOBILE_URL + local dev origins)
    pub cors_origins: Vec<String>,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let database_url = match var("DATABASE_URL").filter(|s| !s.is_empty()) {
            Some(url) => url,
            None => Self::database_url_from_parts(&var),
        };

        let mut cors_origins: Vec<String> = ["CLIENT_URL", "ADMIN_URL", "MOBILE_URL"]
            .into_iter()
            .filter_map(|name| var(name).filter(|s| !s.is_empty()))
            .collect();
        cors_origins.extend(DEV_ORIGINS.iter().map(|s| s.to_string()));

        Ok(Self {
            database_url,
            http_port: parse_or(&var, "HTTP_PORT", 5000),
            jwt_secret: Self::require_secret(&var, "JWT_SECRET", &environment)?,
            db_max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 5),
            db_acquire_timeout: Duration::from_millis(parse_or(&var, "DB_ACQUIRE_TIMEOUT_MS", 30_000)),
            db_idle_timeout: Duration::from_millis(parse_or(&var, "DB_IDLE_TIMEOUT_MS", 10_000)),
            cors_origins,
            log_json: var("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            environment,
        })
    }

    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(
        var: &impl Fn(&str) -> Option<String>,
        name: &str,
        environment: &str,
    ) -> Result<String, BoxError> {
        let val = match var(name) {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn database_url_from_parts(var: &impl Fn(&str) -> Option<String>) -> String {
        let host = var("DB_HOST").unwrap_or_else(|| "localhost".into());
        let port = var("DB_PORT").unwrap_or_else(|| "5432".into());
        let user = var("DB_USER").unwrap_or_else(|| "postgres".into());
        let name = var("DB_NAME").unwrap_or_else(|| "plate".into());
        match var("DB_PASSWORD").filter(|s| !s.is_empty()) {
            Some(password) => format!("postgres://{user}:{password}@{host}:{port}/{name}"),
            None => format!("postgres://{user}@{host}:{port}/{name}"),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_or<T: std::str::FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T {
    var(name).and_then(|v| v.parse().ok()).unwrap_or(default)
}
