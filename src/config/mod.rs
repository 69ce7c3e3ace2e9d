use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
    pub enable_cors: bool,
}

/// Lifetimes for the in-memory presence and OTP maps. Both are advisory
/// process-local caches that reset on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub presence_ttl_secs: u64,
    pub presence_sweep_secs: u64,
    pub otp_ttl_secs: u64,
    pub otp_sweep_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        // Cache overrides
        if let Ok(v) = env::var("PRESENCE_TTL_SECS") {
            self.cache.presence_ttl_secs = v.parse().unwrap_or(self.cache.presence_ttl_secs);
        }
        if let Ok(v) = env::var("PRESENCE_SWEEP_SECS") {
            self.cache.presence_sweep_secs = v.parse().unwrap_or(self.cache.presence_sweep_secs);
        }
        if let Ok(v) = env::var("OTP_TTL_SECS") {
            self.cache.otp_ttl_secs = v.parse().unwrap_or(self.cache.otp_ttl_secs);
        }
        if let Ok(v) = env::var("OTP_SWEEP_SECS") {
            self.cache.otp_sweep_secs = v.parse().unwrap_or(self.cache.otp_sweep_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                // Payment slips arrive as base64 strings, so allow large bodies
                max_request_size_bytes: 50 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 30,
                bcrypt_cost: 10,
                enable_cors: true,
            },
            cache: CacheConfig {
                presence_ttl_secs: 60,
                presence_sweep_secs: 15,
                otp_ttl_secs: 5 * 60,
                otp_sweep_secs: 60,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                run_migrations: true,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 50 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 24 * 7,
                bcrypt_cost: 10,
                enable_cors: true,
            },
            cache: CacheConfig {
                presence_ttl_secs: 60,
                presence_sweep_secs: 15,
                otp_ttl_secs: 5 * 60,
                otp_sweep_secs: 60,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                run_migrations: false,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 50 * 1024 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(), // must come from JWT_SECRET
                jwt_expiry_hours: 24 * 7,
                bcrypt_cost: 12,
                enable_cors: true,
            },
            cache: CacheConfig {
                presence_ttl_secs: 60,
                presence_sweep_secs: 15,
                otp_ttl_secs: 5 * 60,
                otp_sweep_secs: 60,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.database.run_migrations);
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.cache.presence_ttl_secs, 60);
        assert_eq!(config.cache.otp_ttl_secs, 300);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.database.run_migrations);
        // No baked-in secret outside development
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.bcrypt_cost, 12);
    }
}
