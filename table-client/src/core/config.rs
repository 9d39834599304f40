use std::path::PathBuf;

/// Client configuration
///
/// # Environment variables
///
/// Every option can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | API_URL | http://localhost:3000 | Backend base URL |
/// | DATA_DIR | ./data | Local storage directory |
/// | REQUEST_TIMEOUT_MS | 30000 | HTTP request timeout (ms) |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// API_URL=https://api.example.com DATA_DIR=/var/lib/table-client cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL for the catalog and table APIs
    pub api_url: String,
    /// Directory holding the local key-value store and logs
    pub data_dir: String,
    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the base URL and data directory
    ///
    /// Mostly used by tests.
    pub fn with_overrides(api_url: impl Into<String>, data_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.api_url = api_url.into();
        config.data_dir = data_dir.into();
        config
    }

    /// Path of the local key-value store file
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("table-client.redb")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
