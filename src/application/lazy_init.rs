//! One-time setup guard per route.

use std::collections::HashMap;

use crate::domain::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitState {
    #[default]
    Uninitialized,
    Initialized,
}

/// Initialization state of every route for the lifetime of one console.
/// States only move from `Uninitialized` to `Initialized`.
#[derive(Debug, Default)]
pub struct InitLedger {
    states: HashMap<Route, InitState>,
}

impl InitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, route: &Route) -> InitState {
        self.states.get(route).copied().unwrap_or_default()
    }

    pub fn is_initialized(&self, route: &Route) -> bool {
        self.state(route) == InitState::Initialized
    }

    pub fn initialized_count(&self) -> usize {
        self.states
            .values()
            .filter(|state| **state == InitState::Initialized)
            .count()
    }
}

/// Run `setup` for `route` unless it already ran.
///
/// The route is marked initialized before `setup` is invoked, so work that
/// `setup` hands back for later (asynchronous preloads) can never trigger a
/// second setup when the route is revisited before it completes.
pub fn ensure_initialized<R>(
    ledger: &mut InitLedger,
    route: &Route,
    setup: impl FnOnce() -> R,
) -> Option<R> {
    if ledger.is_initialized(route) {
        return None;
    }
    ledger.states.insert(route.clone(), InitState::Initialized);
    Some(setup())
}
