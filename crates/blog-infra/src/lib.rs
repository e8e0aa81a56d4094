//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `rate-limit` - Comment throttling via governor
//! - `test-utils` - In-memory fixtures for downstream tests

pub mod clock;
pub mod database;
pub mod memory;
pub mod seed;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use clock::{FixedClock, SystemClock};
pub use database::DatabaseConnections;
pub use memory::MemoryDatabase;

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
