//! Keyed cache with in-flight request sharing

use crate::beacon::FetchError;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

type SharedFetch<T> = Shared<BoxFuture<'static, Result<T, FetchError>>>;

/// Cached value with fetch-time tracking
#[derive(Clone)]
struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

impl<T> Cached<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    fn is_stale(&self, stale_after: Duration) -> bool {
        self.fetched_at.elapsed() >= stale_after
    }
}

struct Entry<T> {
    cached: Option<Cached<T>>,
    inflight: Option<SharedFetch<T>>,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            cached: None,
            inflight: None,
        }
    }
}

/// Cache of resolved query values, keyed by query identity.
///
/// A fresh entry is served without running the fetcher. A missing or stale
/// entry triggers one fetch; callers that arrive while it is in flight
/// await the same shared future instead of issuing a duplicate request.
/// Errors propagate to every waiter but are never cached, so the next
/// call retries.
pub struct QueryCache<T: Clone> {
    entries: Arc<Mutex<HashMap<String, Entry<T>>>>,
    stale_after: Duration,
}

impl<T: Clone + Send + Sync + 'static> QueryCache<T> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            stale_after,
        }
    }

    /// Resolve `key`, running `fetcher` only when no fresh value exists.
    ///
    /// The fetcher future is dropped unpolled on a cache hit, so building
    /// it at the call site costs nothing.
    pub async fn fetch<F>(&self, key: &str, fetcher: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let fetch = {
            let mut entries = self.entries.lock().unwrap();
            let entry = entries.entry(key.to_string()).or_default();

            // Fresh hit: answer from cache
            if let Some(cached) = &entry.cached {
                if !cached.is_stale(self.stale_after) {
                    return Ok(cached.value.clone());
                }
            }

            // Join the fetch already in flight for this key
            if let Some(inflight) = &entry.inflight {
                inflight.clone()
            } else {
                let entries = Arc::clone(&self.entries);
                let key = key.to_string();
                let fetch: SharedFetch<T> = async move {
                    let result = fetcher.await;

                    // Settle the entry: clear the in-flight marker, store
                    // successful values with their fetch time
                    let mut entries = entries.lock().unwrap();
                    if let Some(entry) = entries.get_mut(&key) {
                        entry.inflight = None;
                        if let Ok(value) = &result {
                            entry.cached = Some(Cached::new(value.clone()));
                        }
                    }
                    result
                }
                .boxed()
                .shared();

                entry.inflight = Some(fetch.clone());
                fetch
            }
        };

        fetch.await
    }
}

impl<T: Clone> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            stale_after: self.stale_after,
        }
    }
}
