//! Query state and caching
//!
//! Tracks the data/loading/error triple for each remote query and caches
//! resolved values with per-query staleness windows.

mod cache;

pub use cache::QueryCache;

use crate::beacon::FetchError;
use std::time::Duration;

/// How long each query's cached value stays fresh before a re-fetch
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    /// The catalog changes rarely
    pub catalog_stale_after: Duration,
    /// Rates move, so conversions expire much sooner
    pub conversion_stale_after: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            catalog_stale_after: Duration::from_secs(60 * 60),
            conversion_stale_after: Duration::from_secs(5 * 60),
        }
    }
}

/// Observable state of one remote query
///
/// At most one of `is_loading` and `error` is set at a time: starting a
/// fetch clears the previous error, and settling clears the loading flag.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
}

impl<T> QueryState<T> {
    pub fn idle() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }

    /// Mark a fetch as in flight. Previously resolved data stays visible
    /// until the fetch settles.
    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Settle the query with a fetch outcome
    pub fn resolve(&mut self, result: Result<T, FetchError>) {
        self.is_loading = false;
        match result {
            Ok(value) => {
                self.data = Some(value);
                self.error = None;
            }
            Err(error) => {
                self.data = None;
                self.error = Some(error);
            }
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
