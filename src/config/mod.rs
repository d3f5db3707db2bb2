use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Placeholder admin credentials used when ADMIN_USER / ADMIN_PASS are unset.
pub const DEFAULT_ADMIN_USER: &str = "admin";
pub const DEFAULT_ADMIN_PASS: &str = "changeme";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:` for a private in-memory database
    pub path: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
    /// Upper bound on a single store call; `None` waits indefinitely
    pub query_timeout_ms: Option<u64>,
    pub enable_slow_query_warning: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub admin_user: String,
    #[serde(skip_serializing)]
    pub admin_pass: String,
}

impl SecurityConfig {
    /// True while either half of the pair is still the shipped default.
    pub fn uses_placeholder_credentials(&self) -> bool {
        self.admin_user == DEFAULT_ADMIN_USER || self.admin_pass == DEFAULT_ADMIN_PASS
    }
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
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("STATIC_DIR") {
            self.server.static_dir = PathBuf::from(v);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_PATH") {
            self.database.path = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_BUSY_TIMEOUT_SECS") {
            self.database.busy_timeout_secs = v.parse().unwrap_or(self.database.busy_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_QUERY_TIMEOUT_MS") {
            // 0 disables the bound
            self.database.query_timeout_ms = v.parse().ok().filter(|ms| *ms > 0);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_SLOW_QUERY_WARNING") {
            self.database.enable_slow_query_warning = v.parse().unwrap_or(self.database.enable_slow_query_warning);
        }
        if let Ok(v) = env::var("DATABASE_SLOW_QUERY_THRESHOLD_MS") {
            self.database.slow_query_threshold_ms = v.parse().unwrap_or(self.database.slow_query_threshold_ms);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("ADMIN_USER") {
            if !v.is_empty() {
                self.security.admin_user = v;
            }
        }
        if let Ok(v) = env::var("ADMIN_PASS") {
            if !v.is_empty() {
                self.security.admin_pass = v;
            }
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                static_dir: PathBuf::from("public"),
            },
            database: DatabaseConfig {
                path: "db/menu.db".to_string(),
                max_connections: 1,
                busy_timeout_secs: 5,
                query_timeout_ms: None,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 100,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                admin_user: DEFAULT_ADMIN_USER.to_string(),
                admin_pass: DEFAULT_ADMIN_PASS.to_string(),
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.database.query_timeout_ms = Some(10_000);
        config.database.slow_query_threshold_ms = 500;
        config.security.enable_cors = false;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.database.query_timeout_ms = Some(5_000);
        config.database.slow_query_threshold_ms = 1000;
        config.api.enable_request_logging = false;
        config.security.enable_cors = false;
        config
    }

    /// Config for an isolated in-memory store, used by tests.
    pub fn in_memory() -> Self {
        let mut config = Self::development();
        config.database.path = ":memory:".to_string();
        config.api.enable_request_logging = false;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
