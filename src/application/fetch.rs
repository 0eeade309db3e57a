//! Staleness and single-flight bookkeeping for route refreshes.
//!
//! Every visit to a route bumps that route's generation. A refresh carries
//! the generation it was issued under and may only write into the document
//! while its route is still active and no newer refresh for the route exists.
//! Independently, starting a new fetch for a key cancels the previous fetch
//! for the same key.

use std::{collections::HashMap, future::Future, hash::Hash};

use tokio_util::sync::CancellationToken;

use super::ports::ApiError;
use crate::domain::routes::Route;

#[derive(Debug, Default)]
pub struct Generations {
    counters: HashMap<Route, u64>,
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation for `route` and return it.
    pub fn advance(&mut self, route: &Route) -> u64 {
        let counter = self.counters.entry(route.clone()).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn current(&self, route: &Route) -> u64 {
        self.counters.get(route).copied().unwrap_or(0)
    }

    pub fn is_current(&self, route: &Route, generation: u64) -> bool {
        self.current(route) == generation
    }
}

/// Permission to fetch and apply data for one route visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    pub route: Route,
    pub generation: u64,
}

/// Registration of one in-flight fetch.
#[derive(Debug, Clone)]
pub struct FetchLease {
    id: u64,
    pub token: CancellationToken,
}

/// Cancellation tokens of the in-flight fetch per key.
#[derive(Debug)]
pub struct FetchSlots<K> {
    next_id: u64,
    in_flight: HashMap<K, FetchLease>,
}

impl<K> Default for FetchSlots<K> {
    fn default() -> Self {
        Self {
            next_id: 0,
            in_flight: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> FetchSlots<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the fetch currently registered under `key` (if any) and
    /// register a fresh lease for the caller.
    pub fn begin(&mut self, key: &K) -> FetchLease {
        self.next_id += 1;
        let lease = FetchLease {
            id: self.next_id,
            token: CancellationToken::new(),
        };
        if let Some(previous) = self.in_flight.insert(key.clone(), lease.clone()) {
            previous.token.cancel();
        }
        lease
    }

    /// Release `key` if `lease` still owns it.
    pub fn finish(&mut self, key: &K, lease: &FetchLease) {
        if self.in_flight.get(key).is_some_and(|current| current.id == lease.id) {
            self.in_flight.remove(key);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Await `fetch` unless `token` is cancelled first.
pub async fn cancellable<T, F>(token: &CancellationToken, fetch: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ApiError::Cancelled),
        result = fetch => result,
    }
}
