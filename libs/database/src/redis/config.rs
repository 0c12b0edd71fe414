#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv};

/// Redis configuration
///
/// Holds the Redis connection settings. It can be constructed manually or
/// loaded from environment variables (with the `config` feature).
///
/// # Example
///
/// ```ignore
/// use database::redis::RedisConfig;
///
/// // Manual construction
/// let config = RedisConfig::new("redis://127.0.0.1:6379");
///
/// // From environment variables (requires `config` feature)
/// let config = RedisConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct RedisConfig {
    /// Redis connection URL (required)
    pub url: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from a connection URL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Get a reference to the Redis URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

/// Load RedisConfig from environment variables
///
/// Environment variables:
/// - `REDIS_URL` or `REDIS_HOST` (required) - Redis connection string
#[cfg(feature = "config")]
impl FromEnv for RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        // Try REDIS_URL first, fall back to REDIS_HOST (for compatibility)
        let url = std::env::var("REDIS_URL")
            .or_else(|_| std::env::var("REDIS_HOST"))
            .map_err(|_| ConfigError::MissingEnvVar("REDIS_URL or REDIS_HOST".to_string()))?;

        Ok(Self { url })
    }
}
