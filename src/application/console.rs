//! The admin console: router, lazy setup, refresh and reordering over one
//! document.
//!
//! All document state lives behind a single mutex that is never held across
//! a network call. Refreshes fetch without the lock and re-check their
//! ticket before writing, so a late response for a route the user already
//! left is dropped instead of rendered.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::{
    error::ConsoleError,
    fetch::{FetchSlots, RefreshTicket},
    metrics::{
        REFRESH_FAILURES_TOTAL, REFRESH_MS, REORDER_COMMITS_TOTAL, REORDER_FAILURES_TOTAL,
        STALE_RESPONSES_TOTAL,
    },
    ports::{AdminApi, ApiError, Notification, Notifier, RouteStore},
    registry::SectionRegistry,
    reorder::{DragSession, GestureError, ReorderController, ReorderPlan},
    router::{Navigation, Router},
    sections::{self, SetupTask},
};
use crate::{
    config::UiSettings,
    domain::{
        ordering::{ItemId, ListKind},
        routes::Route,
    },
    presentation::{
        document::{Document, ListNode},
        outline::outline,
    },
    util::lock::mutex_lock,
};

const MISSING_ENDPOINT_TIMEOUT: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Data was rendered; the listed reorderable lists got fresh handlers.
    Applied { lists: Vec<ListKind> },
    /// The route was left or revisited before the data arrived.
    Stale,
    /// A newer fetch for the same route superseded this one.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationReport {
    Entered {
        route: Route,
        first_visit: bool,
        refresh: RefreshOutcome,
    },
    Unresolved {
        route: Route,
    },
}

impl NavigationReport {
    pub fn route(&self) -> &Route {
        match self {
            NavigationReport::Entered { route, .. } | NavigationReport::Unresolved { route } => {
                route
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    Saved { list: ListKind, items: usize },
    Failed { list: ListKind, error: ApiError },
}

/// Where a dragged item lands relative to the item under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPosition {
    Before,
    After,
}

struct ConsoleState {
    document: Document,
    router: Router,
    reorder: ReorderController,
    fetches: FetchSlots<Route>,
    selected_page: Option<String>,
}

pub struct AdminConsole {
    api: Arc<dyn AdminApi>,
    notifier: Arc<dyn Notifier>,
    ui: UiSettings,
    state: Mutex<ConsoleState>,
}

impl AdminConsole {
    pub fn new(
        api: Arc<dyn AdminApi>,
        store: Arc<dyn RouteStore>,
        notifier: Arc<dyn Notifier>,
        ui: UiSettings,
    ) -> Self {
        Self::with_registry(SectionRegistry::standard(), api, store, notifier, ui)
    }

    pub fn with_registry(
        registry: SectionRegistry,
        api: Arc<dyn AdminApi>,
        store: Arc<dyn RouteStore>,
        notifier: Arc<dyn Notifier>,
        ui: UiSettings,
    ) -> Self {
        let document = registry.build_document();
        Self {
            api,
            notifier,
            ui,
            state: Mutex::new(ConsoleState {
                document,
                router: Router::new(registry, store),
                reorder: ReorderController::new(),
                fetches: FetchSlots::new(),
                selected_page: None,
            }),
        }
    }

    fn lock(&self, op: &'static str) -> MutexGuard<'_, ConsoleState> {
        mutex_lock(&self.state, "application::console", op)
    }

    pub(crate) fn api(&self) -> &dyn AdminApi {
        self.api.as_ref()
    }

    /// Deliver a notification. A failing sink is logged and otherwise ignored.
    pub fn notify(&self, notification: Notification) {
        let notification = match notification.timeout {
            Some(_) => notification,
            None => notification.with_timeout(self.ui.toast_timeout),
        };
        if let Err(err) = self.notifier.notify(&notification) {
            warn!(error = %err, title = %notification.title, "notification dropped");
        }
    }

    /// Open the remembered route (or `fragment`, or the default route). When
    /// the chosen route has no section the default route is tried instead.
    pub async fn start(&self, fragment: Option<&str>) -> Result<NavigationReport, ConsoleError> {
        let route = self.lock("start").router.initial_route(fragment);
        self.enter_with_fallback(route, Route::default_route()).await
    }

    /// Open the route named by `signal`. An unknown route falls back to the
    /// route remembered before this call, then to the default route.
    pub async fn open(&self, signal: &str) -> Result<NavigationReport, ConsoleError> {
        let remembered = self.lock("open").router.initial_route(None);
        self.enter_with_fallback(Route::from_fragment(Some(signal)), remembered)
            .await
    }

    async fn enter_with_fallback(
        &self,
        route: Route,
        fallback: Route,
    ) -> Result<NavigationReport, ConsoleError> {
        let report = self.navigate_to(route).await;
        let NavigationReport::Unresolved { route } = report else {
            return Ok(report);
        };
        let mut tried = vec![route];
        for candidate in [fallback, Route::default_route()] {
            if tried.contains(&candidate) {
                continue;
            }
            match self.navigate_to(candidate).await {
                NavigationReport::Unresolved { route } => tried.push(route),
                entered => return Ok(entered),
            }
        }
        Err(ConsoleError::NoSection(tried[0].to_string()))
    }

    /// Handle a navigation signal such as `#/buttons`.
    pub async fn navigate(&self, signal: Option<&str>) -> NavigationReport {
        self.navigate_to(Route::from_fragment(signal)).await
    }

    pub async fn navigate_to(&self, route: Route) -> NavigationReport {
        match self.visit(route) {
            Navigation::Unresolved { route } => NavigationReport::Unresolved { route },
            Navigation::Entered {
                route,
                setup,
                ticket,
                ..
            } => {
                let first_visit = setup.is_some();
                let tasks = setup.unwrap_or_default();
                let (_, refresh) =
                    tokio::join!(self.run_setup_tasks(&route, tasks), self.refresh(ticket));
                NavigationReport::Entered {
                    route,
                    first_visit,
                    refresh,
                }
            }
        }
    }

    /// Synchronous part of a navigation: everything up to and including the
    /// one-time setup. The returned ticket must be passed to [`Self::refresh`].
    pub fn visit(&self, route: Route) -> Navigation<Vec<SetupTask>> {
        let mut guard = self.lock("visit");
        let ConsoleState {
            document,
            router,
            reorder,
            ..
        } = &mut *guard;

        let setup_route = route.clone();
        let navigation = router.navigate(document, route, |document, handle| {
            document
                .section_mut(handle)
                .map(|section| sections::setup_section(&setup_route, section))
                .unwrap_or_default()
        });

        if navigation.is_entered() {
            let dragged = reorder.session().map(|session| session.list);
            if reorder
                .discard(dragged.and_then(|list| document.list_mut(list)))
                .is_some()
            {
                info!(route = %navigation.route(), "drag discarded by navigation");
            }
        }
        navigation
    }

    async fn run_setup_tasks(&self, route: &Route, tasks: Vec<SetupTask>) {
        if tasks.is_empty() {
            return;
        }
        let api = self.api();
        let preloaded = join_all(
            tasks
                .into_iter()
                .map(|task| sections::run_setup_task(api, task)),
        )
        .await;

        let mut guard = self.lock("setup.apply");
        let ConsoleState {
            document, router, ..
        } = &mut *guard;
        let Ok(handle) = router.registry().resolve_section(document, route) else {
            return;
        };
        if let Some(section) = document.section_mut(handle) {
            for result in &preloaded {
                sections::apply_preloaded(section, result);
            }
        }
    }

    /// Fetch and render the data of `ticket`'s route, then attach reorder
    /// handlers to the lists that were re-rendered.
    pub async fn refresh(&self, ticket: RefreshTicket) -> RefreshOutcome {
        let (lease, selected) = {
            let mut state = self.lock("refresh.begin");
            (
                state.fetches.begin(&ticket.route),
                state.selected_page.clone(),
            )
        };

        let started = Instant::now();
        let data = sections::fetch(
            self.api(),
            &ticket.route,
            selected.as_deref(),
            &lease.token,
        )
        .await;
        metrics::histogram!(REFRESH_MS).record(started.elapsed().as_secs_f64() * 1000.0);

        let mut guard = self.lock("refresh.apply");
        let state = &mut *guard;
        state.fetches.finish(&ticket.route, &lease);

        if data.is_cancelled() {
            debug!(route = %ticket.route, generation = ticket.generation, "refresh superseded");
            return RefreshOutcome::Cancelled;
        }
        if !state.router.is_current(&ticket) {
            metrics::counter!(STALE_RESPONSES_TOTAL).increment(1);
            debug!(route = %ticket.route, generation = ticket.generation, "stale refresh dropped");
            return RefreshOutcome::Stale;
        }
        for failure in data.failures() {
            metrics::counter!(REFRESH_FAILURES_TOTAL).increment(1);
            warn!(route = %ticket.route, error = %failure, "refresh failed; showing placeholder");
        }

        let ConsoleState {
            document,
            router,
            reorder,
            selected_page,
            ..
        } = state;
        let Ok(handle) = router.registry().resolve_section(document, &ticket.route) else {
            warn!(route = %ticket.route, "section vanished before refresh could render");
            return RefreshOutcome::Stale;
        };

        let rerendered = router.registry().lists_for(&ticket.route);
        let dragged = reorder.session().map(|session| session.list);
        if let Some(list) = dragged.filter(|list| rerendered.contains(list)) {
            reorder.discard(document.list_mut(list));
            debug!(list = %list, "drag discarded by re-render");
        }

        let Some(section) = document.section_mut(handle) else {
            return RefreshOutcome::Stale;
        };
        let applied = sections::apply(section, data, self.ui.row_height);
        if applied.selection_lost {
            *selected_page = None;
        }

        for list in &applied.lists {
            if let Some(node) = document.list_mut(*list) {
                reorder.attach(node);
            }
        }
        RefreshOutcome::Applied {
            lists: applied.lists,
        }
    }

    /// Refresh the visible route again, superseding any refresh in flight.
    pub async fn reload(&self) -> Option<RefreshOutcome> {
        let ticket = self.lock("reload").router.reissue()?;
        Some(self.refresh(ticket).await)
    }

    /// Re-fetch the route that shows `list`. Nothing happens while that
    /// route is hidden; its next visit refreshes it.
    pub(crate) async fn reload_list(&self, list: ListKind) -> Option<RefreshOutcome> {
        let ticket = {
            let mut state = self.lock("reload_list");
            let route = state.router.registry().route_of_list(list)?;
            state.router.reissue_for(&route)
        };
        match ticket {
            Some(ticket) => Some(self.refresh(ticket).await),
            None => {
                debug!(list = %list, "list hidden; refresh deferred to its next visit");
                None
            }
        }
    }

    fn with_list<T>(
        &self,
        op: &'static str,
        list: ListKind,
        f: impl FnOnce(&mut ReorderController, &mut ListNode) -> T,
    ) -> Result<T, ConsoleError> {
        let mut guard = self.lock(op);
        let ConsoleState {
            document,
            router,
            reorder,
            ..
        } = &mut *guard;
        let owner = router.registry().route_of_list(list);
        if owner.is_none() || owner.as_ref() != router.current() {
            return Err(ConsoleError::ListHidden(list));
        }
        let node = document
            .list_mut(list)
            .ok_or(ConsoleError::ListNotRendered(list))?;
        Ok(f(reorder, node))
    }

    pub fn drag_start(&self, list: ListKind, item: ItemId) -> Result<(), ConsoleError> {
        self.with_list("drag.start", list, |reorder, node| reorder.drag_start(node, item))?
            .map_err(ConsoleError::from)
    }

    pub fn drag_over(
        &self,
        list: ListKind,
        over: ItemId,
        pointer_y: f64,
    ) -> Result<bool, ConsoleError> {
        self.with_list("drag.over", list, |reorder, node| {
            reorder.drag_over(node, over, pointer_y)
        })
    }

    pub fn drop_dragged(&self) -> bool {
        self.lock("drag.drop").reorder.drop_dragged()
    }

    /// Finish the gesture on `list` and persist the resulting order.
    /// Returns `None` when no drag of that list was in progress.
    pub async fn drag_end(&self, list: ListKind) -> Result<Option<ReorderOutcome>, ConsoleError> {
        let plan = self.with_list("drag.end", list, |reorder, node| reorder.drag_end(node))?;
        match plan {
            Some(plan) => Ok(Some(self.persist(plan).await)),
            None => Ok(None),
        }
    }

    /// Pointer position that drops onto `anchor` at `position`.
    pub fn pointer_for(
        &self,
        list: ListKind,
        anchor: ItemId,
        position: DropPosition,
    ) -> Result<Option<f64>, ConsoleError> {
        self.with_list("drag.pointer", list, |_, node| {
            node.item(anchor).map(|item| {
                let bounds = item.bounds();
                match position {
                    DropPosition::Before => bounds.top + bounds.height * 0.25,
                    DropPosition::After => bounds.top + bounds.height * 0.75,
                }
            })
        })
    }

    /// Complete gesture: start on `moved`, hover `anchor`, drop, end.
    pub async fn drag(
        &self,
        list: ListKind,
        moved: ItemId,
        anchor: ItemId,
        position: DropPosition,
    ) -> Result<Option<ReorderOutcome>, ConsoleError> {
        self.drag_start(list, moved)?;
        let Some(pointer_y) = self.pointer_for(list, anchor, position)? else {
            let mut guard = self.lock("drag.abort");
            let ConsoleState {
                document, reorder, ..
            } = &mut *guard;
            reorder.discard(document.list_mut(list));
            return Err(GestureError::UnknownItem { list, item: anchor }.into());
        };
        self.drag_over(list, anchor, pointer_y)?;
        self.drop_dragged();
        self.drag_end(list).await
    }

    async fn persist(&self, plan: ReorderPlan) -> ReorderOutcome {
        let ReorderPlan { list, request } = plan;
        let items = request.items.len();
        match self.api.reorder(list, &request).await {
            Ok(()) => {
                metrics::counter!(REORDER_COMMITS_TOTAL).increment(1);
                info!(list = %list, items, "order saved");
                self.reload_list(list).await;
                self.notify(Notification::success("Saved").with_message(match list {
                    ListKind::Buttons => "Button order updated",
                    ListKind::Groups => "Group order updated",
                }));
                ReorderOutcome::Saved { list, items }
            }
            Err(error) => {
                metrics::counter!(REORDER_FAILURES_TOTAL).increment(1);
                warn!(list = %list, error = %error, "failed to save order");
                let notification = match &error {
                    ApiError::MissingEndpoint { path } => Notification::error("Reordering")
                        .with_message(format!(
                            "Add the POST /{} endpoint to persist the order",
                            path.trim_start_matches('/')
                        ))
                        .with_timeout(MISSING_ENDPOINT_TIMEOUT),
                    other => Notification::error("Reordering failed").with_message(format!(
                        "Could not save the new order ({}); drag again to retry",
                        other.detail()
                    )),
                };
                self.notify(notification);
                ReorderOutcome::Failed { list, error }
            }
        }
    }

    pub fn selected_page(&self) -> Option<String> {
        self.lock("selected_page").selected_page.clone()
    }

    /// Select the page shown in the page editor. The editor re-renders when
    /// the pages section is visible.
    pub async fn select_page(&self, slug: Option<&str>) -> Option<RefreshOutcome> {
        let on_pages = {
            let mut state = self.lock("select_page");
            state.selected_page = slug
                .map(str::trim)
                .filter(|slug| !slug.is_empty())
                .map(str::to_string);
            state.router.current().map(Route::as_str) == Some("pages")
        };
        if on_pages { self.reload().await } else { None }
    }

    pub(crate) fn set_selected_page(&self, slug: Option<String>) {
        self.lock("set_selected_page").selected_page = slug;
    }

    pub(crate) fn update_document<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Document) -> T,
    ) -> T {
        f(&mut self.lock(op).document)
    }

    pub fn current_route(&self) -> Option<Route> {
        self.lock("current_route").router.current().cloned()
    }

    pub fn is_initialized(&self, route: &Route) -> bool {
        self.lock("is_initialized").router.ledger().is_initialized(route)
    }

    pub fn drag_session(&self) -> Option<DragSession> {
        self.lock("drag_session").reorder.session().copied()
    }

    pub fn row_height(&self) -> f64 {
        self.ui.row_height
    }

    /// Copy of the current document.
    pub fn document(&self) -> Document {
        self.lock("document").document.clone()
    }

    pub fn outline(&self) -> String {
        outline(&self.lock("outline").document)
    }
}
