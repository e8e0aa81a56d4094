use chrono::{DateTime, Utc};

/// Source of the reference instant for visibility checks and timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
