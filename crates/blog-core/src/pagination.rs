//! Limit/offset pagination.
//!
//! A [`Page`] carries the total match count, the requested window and the
//! neighbouring windows as cursors. Cursors are plain offsets; rendering
//! them as links is left to the HTTP layer.

use serde::{Deserialize, Serialize};

/// Default page size when the client omits `limit`.
pub const DEFAULT_LIMIT: u64 = 10;

/// Upper bound applied to client-supplied limits.
pub const MAX_LIMIT: u64 = 100;

/// Server-side pagination defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

/// A window over an ordered collection. `limit` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl PageRequest {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: limit.max(1),
            offset,
        }
    }

    /// Build a request from raw query parameters.
    ///
    /// A missing, non-numeric or zero `limit` falls back to the configured
    /// default and large limits are clamped to `max_limit`. A missing or
    /// non-numeric `offset` means 0.
    pub fn from_params(limit: Option<&str>, offset: Option<&str>, config: &PaginationConfig) -> Self {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|&l| l > 0)
            .map(|l| l.min(config.max_limit))
            .unwrap_or(config.default_limit);
        let offset = offset
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);

        Self::new(limit, offset)
    }

    /// The following window, if `count` leaves anything after this one.
    pub fn next(&self, count: u64) -> Option<PageRequest> {
        let end = self.offset.saturating_add(self.limit);
        (end < count).then(|| PageRequest::new(self.limit, end))
    }

    /// The preceding window, if this one does not start at the beginning.
    ///
    /// Computed from the requested offset even when it lies past the end.
    pub fn previous(&self) -> Option<PageRequest> {
        (self.offset > 0).then(|| PageRequest::new(self.limit, self.offset.saturating_sub(self.limit)))
    }

    fn bounds(&self, len: usize) -> (usize, usize) {
        let start = usize::try_from(self.offset).unwrap_or(usize::MAX).min(len);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        (start, start.saturating_add(limit).min(len))
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of matching records before slicing.
    pub count: u64,
    pub results: Vec<T>,
    pub request: PageRequest,
    pub next: Option<PageRequest>,
    pub previous: Option<PageRequest>,
}

impl<T> Page<T> {
    /// Wrap a window the store already sliced.
    pub fn from_window(count: u64, results: Vec<T>, request: PageRequest) -> Self {
        Self {
            count,
            results,
            next: request.next(count),
            previous: request.previous(),
            request,
        }
    }
}

/// Slice an already filtered and ordered sequence.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let count = items.len() as u64;
    let (start, end) = request.bounds(items.len());
    let results = items.into_iter().skip(start).take(end - start).collect();
    Page::from_window(count, results, request)
}
