//! Route transitions over the document.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{
    fetch::{Generations, RefreshTicket},
    lazy_init::{InitLedger, ensure_initialized},
    metrics::{NAVIGATIONS_TOTAL, UNRESOLVED_ROUTES_TOTAL},
    ports::RouteStore,
    registry::SectionRegistry,
};
use crate::{
    domain::routes::Route,
    presentation::document::{Document, SectionHandle},
};

/// Outcome of one navigation signal.
#[derive(Debug)]
pub enum Navigation<S> {
    /// The route's section is the only visible one; the caller must run the
    /// refresh described by `ticket`.
    Entered {
        route: Route,
        section: SectionHandle,
        /// Value returned by the one-time setup, present on the first visit only.
        setup: Option<S>,
        ticket: RefreshTicket,
    },
    /// No section matched. Nothing in the document changed.
    Unresolved { route: Route },
}

impl<S> Navigation<S> {
    pub fn route(&self) -> &Route {
        match self {
            Navigation::Entered { route, .. } | Navigation::Unresolved { route } => route,
        }
    }

    pub fn is_entered(&self) -> bool {
        matches!(self, Navigation::Entered { .. })
    }
}

pub struct Router {
    registry: SectionRegistry,
    store: Arc<dyn RouteStore>,
    ledger: InitLedger,
    generations: Generations,
    current: Option<Route>,
}

impl Router {
    pub fn new(registry: SectionRegistry, store: Arc<dyn RouteStore>) -> Self {
        Self {
            registry,
            store,
            ledger: InitLedger::new(),
            generations: Generations::new(),
            current: None,
        }
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &InitLedger {
        &self.ledger
    }

    /// Route whose section is currently visible.
    pub fn current(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    /// Route to open on startup: the remembered route, else the navigation
    /// signal, else the default route.
    pub fn initial_route(&self, fragment: Option<&str>) -> Route {
        match self.store.last_route() {
            Ok(Some(saved)) if !saved.trim().is_empty() => Route::from_fragment(Some(&saved)),
            Ok(_) => Route::from_fragment(fragment),
            Err(err) => {
                warn!(error = %err, "failed to read the last visited route");
                Route::from_fragment(fragment)
            }
        }
    }

    /// Apply a navigation signal: remember the route, show its section alone,
    /// update heading and menu, and run the one-time setup on first entry.
    pub fn navigate<S>(
        &mut self,
        document: &mut Document,
        route: Route,
        setup: impl FnOnce(&mut Document, SectionHandle) -> S,
    ) -> Navigation<S> {
        metrics::counter!(NAVIGATIONS_TOTAL).increment(1);

        if let Err(err) = self.store.save_route(route.as_str()) {
            warn!(route = %route, error = %err, "failed to remember the last visited route");
        }

        let section = match self.registry.resolve_section(document, &route) {
            Ok(section) => section,
            Err(err) => {
                metrics::counter!(UNRESOLVED_ROUTES_TOTAL).increment(1);
                warn!(route = %route, error = %err, "navigation ignored: route has no section");
                return Navigation::Unresolved { route };
            }
        };

        document.show_only(section);
        document.set_heading(self.registry.title_for(&route));
        document.set_active_nav(&route.fragment());

        let setup = ensure_initialized(&mut self.ledger, &route, || setup(document, section));
        if setup.is_some() {
            debug!(route = %route, "route initialized");
        }

        let generation = self.generations.advance(&route);
        self.current = Some(route.clone());

        Navigation::Entered {
            ticket: RefreshTicket {
                route: route.clone(),
                generation,
            },
            route,
            section,
            setup,
        }
    }

    /// New refresh ticket for the visible route, superseding earlier ones.
    pub fn reissue(&mut self) -> Option<RefreshTicket> {
        let route = self.current.clone()?;
        let generation = self.generations.advance(&route);
        Some(RefreshTicket { route, generation })
    }

    /// New refresh ticket for `route` when it is the visible route.
    pub fn reissue_for(&mut self, route: &Route) -> Option<RefreshTicket> {
        if self.current.as_ref() != Some(route) {
            return None;
        }
        self.reissue()
    }

    /// Whether data fetched under `ticket` may still be written.
    pub fn is_current(&self, ticket: &RefreshTicket) -> bool {
        self.current.as_ref() == Some(&ticket.route)
            && self.generations.is_current(&ticket.route, ticket.generation)
    }
}
