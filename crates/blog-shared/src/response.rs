//! Standardized API response types.

use serde::{Deserialize, Serialize};

/// Error body: `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    // Common error constructors
    pub fn not_found() -> Self {
        Self::new("Not found.")
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(detail)
    }

    pub fn too_many_requests(retry_after_secs: u64) -> Self {
        Self::new(format!(
            "Request was throttled. Expected available in {} seconds.",
            retry_after_secs
        ))
    }

    pub fn internal_error() -> Self {
        Self::new("A server error occurred.")
    }
}

/// Limit/offset page. `next` and `previous` are absolute URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}
