//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use blog_core::PaginationConfig;
use blog_infra::database::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use blog_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations on startup.
    pub run_migrations: bool,
    pub pagination: PaginationConfig,
    /// Sample posts created at startup in in-memory mode.
    pub seed_sample_posts: u32,
    #[cfg(feature = "rate-limit")]
    pub comment_rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 100),
            min_connections: parse_or("DB_MIN_CONNECTIONS", 10),
            connect_timeout: Duration::from_secs(parse_or("DB_CONNECT_TIMEOUT_SECS", 8)),
        });

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            default_limit: parse_or("PAGE_DEFAULT_LIMIT", defaults.default_limit).max(1),
            max_limit: parse_or("PAGE_MAX_LIMIT", defaults.max_limit).max(1),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            pagination,
            seed_sample_posts: parse_or("SEED_SAMPLE_POSTS", 0),
            #[cfg(feature = "rate-limit")]
            comment_rate_limit: RateLimitConfig {
                max_requests: parse_or("COMMENT_RATE_LIMIT_MAX", 5),
                window: Duration::from_secs(parse_or("COMMENT_RATE_LIMIT_WINDOW_SECS", 60)),
            },
        }
    }
}

/// Read and parse `key`, falling back to `default` when unset or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
