use std::env;
use std::net::IpAddr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Take the client address from the first X-Forwarded-For entry when present
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; when set it wins over the individual parts below
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
    pub whitelisted_ips: Vec<IpAddr>,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

const DEV_SECRET: &str = "change-me-development-secret";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("ENVIRONMENT").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("TRUST_FORWARDED_FOR") {
            self.server.trust_forwarded_for = v.parse().unwrap_or(self.server.trust_forwarded_for);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("HOST") {
            self.database.host = v;
        }
        if let Ok(v) = env::var("DB_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Ok(v) = env::var("USERNAME") {
            self.database.username = v;
        }
        if let Ok(v) = env::var("PASSWORD") {
            self.database.password = v;
        }
        if let Ok(v) = env::var("DATABASE") {
            self.database.database = v;
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECRET_KEY") {
            self.security.secret_key = v;
        }
        if let Ok(v) = env::var("ALGORITHM") {
            self.security.algorithm = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.access_token_expire_minutes =
                v.parse().unwrap_or(self.security.access_token_expire_minutes);
        }
        if let Ok(v) = env::var("WHITELISTED_IPS") {
            self.security.whitelisted_ips = parse_ip_list(&v);
        }
        if let Ok(v) = env::var("CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Pagination overrides
        if let Ok(v) = env::var("PAGINATION_DEFAULT_LIMIT") {
            self.pagination.default_limit = v.parse().unwrap_or(self.pagination.default_limit);
        }
        if let Ok(v) = env::var("PAGINATION_MAX_LIMIT") {
            self.pagination.max_limit = v.parse().unwrap_or(self.pagination.max_limit);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 8000,
                trust_forwarded_for: false,
            },
            database: DatabaseConfig {
                url: None,
                host: "127.0.0.1".to_string(),
                port: 3306,
                username: "root".to_string(),
                password: String::new(),
                database: "portfolio".to_string(),
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                secret_key: DEV_SECRET.to_string(),
                algorithm: "HS256".to_string(),
                access_token_expire_minutes: 30,
                whitelisted_ips: parse_ip_list("127.0.0.1,192.168.1.100"),
                cors_origins: vec!["*".to_string()],
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 100,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.trust_forwarded_for = true;
        config.database.connect_timeout_secs = 10;
        config.security.secret_key = String::new();
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.trust_forwarded_for = true;
        config.database.connect_timeout_secs = 10;
        config.security.secret_key = String::new();
        config.security.whitelisted_ips = vec![];
        config.security.cors_origins = vec![];
        config
    }

    /// Whether any origin may call the API
    pub fn cors_allows_any(&self) -> bool {
        self.security.cors_origins.iter().any(|o| o == "*")
    }
}

/// Parse a comma separated list of addresses, dropping entries that do not parse
pub fn parse_ip_list(raw: &str) -> Vec<IpAddr> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<IpAddr>() {
            Ok(ip) => Some(ip),
            Err(_) => {
                tracing::warn!("Ignoring invalid whitelist entry: {}", s);
                None
            }
        })
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.security.algorithm, "HS256");
        assert_eq!(config.security.access_token_expire_minutes, 30);
        assert_eq!(config.security.whitelisted_ips.len(), 2);
        assert!(config.cors_allows_any());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.secret_key.is_empty());
        assert!(config.security.whitelisted_ips.is_empty());
        assert!(!config.cors_allows_any());
        assert!(config.server.trust_forwarded_for);
    }

    #[test]
    fn parses_ip_lists_and_skips_garbage() {
        let ips = parse_ip_list(" 127.0.0.1, not-an-ip ,::1,,10.0.0.7");
        let expected: Vec<IpAddr> = vec![
            "127.0.0.1".parse().unwrap(),
            "::1".parse().unwrap(),
            "10.0.0.7".parse().unwrap(),
        ];
        assert_eq!(ips, expected);
    }

    #[test]
    fn password_is_never_serialized() {
        let mut config = AppConfig::development();
        config.database.password = "hunter2".to_string();
        config.security.secret_key = "s3cret".to_string();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("s3cret"));
    }
}
