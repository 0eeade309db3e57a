#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use kiosk_admin::{
    application::{
        console::AdminConsole,
        ports::{AdminApi, ApiError, Notification, NotificationKind, Notifier, NotifyError},
    },
    config::UiSettings,
    domain::ordering::{ItemId, ListKind},
    infra::store::MemoryRouteStore,
};
use kiosk_admin_api_types::{
    Block, BlockCreateRequest, BlockUpdateRequest, Button, ButtonGroup, ButtonGroupAssignment,
    ButtonGroupWriteRequest, ButtonWriteRequest, EntityId, ExitPasswordRequest,
    ExitPasswordStatus, MenuButton, MenuNode, Page, PageCreateRequest, PageUpdateRequest,
    ReorderEntry, ReorderRequest, SettingsUpdateRequest, SiteConfig, UploadResponse,
};
use tokio::sync::Notify;

pub const ROW_HEIGHT: f64 = 40.0;

/// Holds a `GET` until released, signalling when the request arrived.
#[derive(Clone, Default)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

#[derive(Default)]
struct Backend {
    buttons: Vec<Button>,
    groups: Vec<ButtonGroup>,
    pages: Vec<Page>,
    config: SiteConfig,
    exit_password_set: bool,
    next_id: EntityId,
}

/// In-memory backend with scripted failures.
#[derive(Default)]
pub struct FakeApi {
    backend: Mutex<Backend>,
    calls: Mutex<Vec<String>>,
    reorders: Mutex<Vec<(ListKind, Vec<ReorderEntry>)>>,
    reorder_failure: Mutex<Option<ApiError>>,
    read_failures: Mutex<HashMap<&'static str, ApiError>>,
    gates: Mutex<HashMap<&'static str, Gate>>,
}

pub fn button(id: EntityId, title: &str, order_index: i64) -> Button {
    Button {
        id,
        title: title.to_string(),
        target_slug: title.to_lowercase(),
        order_index,
        bg_color: None,
        text_color: None,
        icon_path: None,
        group_id: None,
    }
}

pub fn group(id: EntityId, title: &str, order_index: i64) -> ButtonGroup {
    ButtonGroup {
        id,
        title: title.to_string(),
        order_index,
        bg_color: None,
        text_color: None,
    }
}

pub fn page(id: EntityId, slug: &str, title: &str) -> Page {
    Page {
        id,
        slug: slug.to_string(),
        title: title.to_string(),
        is_home: false,
        blocks: Vec::new(),
    }
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.backend.lock().expect("backend").next_id = 100;
        api
    }

    pub fn with_buttons(self, buttons: Vec<Button>) -> Self {
        self.backend.lock().expect("backend").buttons = buttons;
        self
    }

    pub fn with_groups(self, groups: Vec<ButtonGroup>) -> Self {
        self.backend.lock().expect("backend").groups = groups;
        self
    }

    pub fn with_pages(self, pages: Vec<Page>) -> Self {
        self.backend.lock().expect("backend").pages = pages;
        self
    }

    pub fn with_config(self, config: SiteConfig) -> Self {
        self.backend.lock().expect("backend").config = config;
        self
    }

    pub fn fail_reorder(&self, error: ApiError) {
        *self.reorder_failure.lock().expect("failure") = Some(error);
    }

    pub fn fail_read(&self, call: &'static str, error: ApiError) {
        self.read_failures
            .lock()
            .expect("failures")
            .insert(call, error);
    }

    pub fn clear_read_failures(&self) {
        self.read_failures.lock().expect("failures").clear();
    }

    /// Hold the next `call` until the returned gate is released.
    pub fn gate(&self, call: &'static str) -> Gate {
        let gate = Gate::default();
        self.gates
            .lock()
            .expect("gates")
            .insert(call, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls").clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn reorders(&self) -> Vec<(ListKind, Vec<(EntityId, i64)>)> {
        self.reorders
            .lock()
            .expect("reorders")
            .iter()
            .map(|(list, items)| {
                (
                    *list,
                    items.iter().map(|e| (e.id, e.order_index)).collect(),
                )
            })
            .collect()
    }

    pub fn button_ids(&self) -> Vec<EntityId> {
        let mut buttons = self.backend.lock().expect("backend").buttons.clone();
        buttons.sort_by_key(|b| b.order_index);
        buttons.iter().map(|b| b.id).collect()
    }

    async fn read(&self, call: &'static str) -> Result<(), ApiError> {
        self.calls.lock().expect("calls").push(call.to_string());
        let gate = self.gates.lock().expect("gates").remove(call);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match self.read_failures.lock().expect("failures").get(call) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("calls").push(call);
    }

    fn next_id(&self) -> EntityId {
        let mut backend = self.backend.lock().expect("backend");
        backend.next_id += 1;
        backend.next_id
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn list_buttons(&self) -> Result<Vec<Button>, ApiError> {
        self.read("list_buttons").await?;
        Ok(self.backend.lock().expect("backend").buttons.clone())
    }

    async fn list_groups(&self) -> Result<Vec<ButtonGroup>, ApiError> {
        self.read("list_groups").await?;
        Ok(self.backend.lock().expect("backend").groups.clone())
    }

    async fn menu(&self) -> Result<Vec<MenuNode>, ApiError> {
        self.read("menu").await?;
        let backend = self.backend.lock().expect("backend");
        Ok(backend
            .groups
            .iter()
            .map(|group| MenuNode {
                kind: "group".to_string(),
                id: Some(group.id),
                title: group.title.clone(),
                order_index: Some(group.order_index),
                items: backend
                    .buttons
                    .iter()
                    .filter(|b| b.group_id == Some(group.id))
                    .map(|b| MenuButton {
                        id: b.id,
                        title: b.title.clone(),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn list_pages(&self) -> Result<Vec<Page>, ApiError> {
        self.read("list_pages").await?;
        Ok(self.backend.lock().expect("backend").pages.clone())
    }

    async fn page(&self, slug: &str) -> Result<Page, ApiError> {
        self.read("page").await?;
        self.backend
            .lock()
            .expect("backend")
            .pages
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("pages/{slug}")))
    }

    async fn site_config(&self) -> Result<SiteConfig, ApiError> {
        self.read("site_config").await?;
        Ok(self.backend.lock().expect("backend").config.clone())
    }

    async fn exit_password_status(&self) -> Result<ExitPasswordStatus, ApiError> {
        self.read("exit_password_status").await?;
        Ok(ExitPasswordStatus {
            exit_password_set: self.backend.lock().expect("backend").exit_password_set,
        })
    }

    async fn reorder(&self, list: ListKind, request: &ReorderRequest) -> Result<(), ApiError> {
        self.record(format!("reorder {list}"));
        self.reorders
            .lock()
            .expect("reorders")
            .push((list, request.items.clone()));
        if let Some(err) = self.reorder_failure.lock().expect("failure").clone() {
            return Err(err);
        }
        let mut backend = self.backend.lock().expect("backend");
        for entry in &request.items {
            match list {
                ListKind::Buttons => {
                    if let Some(b) = backend.buttons.iter_mut().find(|b| b.id == entry.id) {
                        b.order_index = entry.order_index;
                    }
                }
                ListKind::Groups => {
                    if let Some(g) = backend.groups.iter_mut().find(|g| g.id == entry.id) {
                        g.order_index = entry.order_index;
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete_item(&self, list: ListKind, id: ItemId) -> Result<(), ApiError> {
        self.record(format!("delete {list} {id}"));
        let mut backend = self.backend.lock().expect("backend");
        let removed = match list {
            ListKind::Buttons => {
                let before = backend.buttons.len();
                backend.buttons.retain(|b| b.id != id.get());
                before != backend.buttons.len()
            }
            ListKind::Groups => {
                let before = backend.groups.len();
                backend.groups.retain(|g| g.id != id.get());
                for b in &mut backend.buttons {
                    if b.group_id == Some(id.get()) {
                        b.group_id = None;
                    }
                }
                before != backend.groups.len()
            }
        };
        if removed {
            Ok(())
        } else {
            Err(ApiError::NotFound(list.item_path(id)))
        }
    }

    async fn create_button(&self, request: &ButtonWriteRequest) -> Result<Button, ApiError> {
        self.record("create_button".to_string());
        let id = self.next_id();
        let mut backend = self.backend.lock().expect("backend");
        let button = Button {
            id,
            title: request.title.clone(),
            target_slug: request.target_slug.clone(),
            order_index: backend.buttons.len() as i64 + 1,
            bg_color: Some(request.bg_color.clone()),
            text_color: Some(request.text_color.clone()),
            icon_path: request.icon_path.clone(),
            group_id: request.group_id,
        };
        backend.buttons.push(button.clone());
        Ok(button)
    }

    async fn update_button(
        &self,
        id: EntityId,
        request: &ButtonWriteRequest,
    ) -> Result<Button, ApiError> {
        self.record(format!("update_button {id}"));
        let mut backend = self.backend.lock().expect("backend");
        let button = backend
            .buttons
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("admin/buttons/{id}")))?;
        button.title = request.title.clone();
        button.target_slug = request.target_slug.clone();
        button.group_id = request.group_id;
        Ok(button.clone())
    }

    async fn assign_group(
        &self,
        id: EntityId,
        request: &ButtonGroupAssignment,
    ) -> Result<Button, ApiError> {
        self.record(format!("assign_group {id}"));
        let mut backend = self.backend.lock().expect("backend");
        let button = backend
            .buttons
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("admin/buttons/{id}")))?;
        button.group_id = request.group_id;
        Ok(button.clone())
    }

    async fn create_group(
        &self,
        request: &ButtonGroupWriteRequest,
    ) -> Result<ButtonGroup, ApiError> {
        self.record("create_group".to_string());
        let id = self.next_id();
        let mut backend = self.backend.lock().expect("backend");
        let created = group(id, &request.title, backend.groups.len() as i64 + 1);
        backend.groups.push(created.clone());
        Ok(created)
    }

    async fn update_group(
        &self,
        id: EntityId,
        request: &ButtonGroupWriteRequest,
    ) -> Result<ButtonGroup, ApiError> {
        self.record(format!("update_group {id}"));
        let mut backend = self.backend.lock().expect("backend");
        let found = backend
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("admin/button-groups/{id}")))?;
        found.title = request.title.clone();
        Ok(found.clone())
    }

    async fn create_page(&self, request: &PageCreateRequest) -> Result<Page, ApiError> {
        self.record("create_page".to_string());
        if self
            .backend
            .lock()
            .expect("backend")
            .pages
            .iter()
            .any(|p| p.slug == request.slug)
        {
            return Err(ApiError::Conflict(request.slug.clone()));
        }
        let id = self.next_id();
        let mut created = page(id, &request.slug, &request.title);
        created.is_home = request.is_home;
        self.backend
            .lock()
            .expect("backend")
            .pages
            .push(created.clone());
        Ok(created)
    }

    async fn update_page(&self, slug: &str, request: &PageUpdateRequest) -> Result<Page, ApiError> {
        self.record(format!("update_page {slug}"));
        let mut backend = self.backend.lock().expect("backend");
        let found = backend
            .pages
            .iter_mut()
            .find(|p| p.slug == slug)
            .ok_or_else(|| ApiError::NotFound(format!("admin/pages/{slug}")))?;
        if let Some(title) = &request.title {
            found.title = title.clone();
        }
        if let Some(is_home) = request.is_home {
            found.is_home = is_home;
        }
        Ok(found.clone())
    }

    async fn delete_page(&self, slug: &str) -> Result<(), ApiError> {
        self.record(format!("delete_page {slug}"));
        self.backend
            .lock()
            .expect("backend")
            .pages
            .retain(|p| p.slug != slug);
        Ok(())
    }

    async fn create_block(&self, request: &BlockCreateRequest) -> Result<Block, ApiError> {
        self.record("create_block".to_string());
        let id = self.next_id();
        let block = Block {
            id,
            page_id: request.page_id,
            kind: request.kind,
            content: request.content.clone(),
        };
        let mut backend = self.backend.lock().expect("backend");
        if let Some(found) = backend.pages.iter_mut().find(|p| p.id == request.page_id) {
            found.blocks.push(block.clone());
        }
        Ok(block)
    }

    async fn update_block(
        &self,
        id: EntityId,
        request: &BlockUpdateRequest,
    ) -> Result<Block, ApiError> {
        self.record(format!("update_block {id}"));
        let mut backend = self.backend.lock().expect("backend");
        let block = backend
            .pages
            .iter_mut()
            .flat_map(|p| p.blocks.iter_mut())
            .find(|b| b.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("admin/blocks/{id}")))?;
        block.kind = request.kind;
        block.content = request.content.clone();
        Ok(block.clone())
    }

    async fn delete_block(&self, id: EntityId) -> Result<(), ApiError> {
        self.record(format!("delete_block {id}"));
        for found in &mut self.backend.lock().expect("backend").pages {
            found.blocks.retain(|b| b.id != id);
        }
        Ok(())
    }

    async fn save_settings(&self, request: &SettingsUpdateRequest) -> Result<(), ApiError> {
        self.record("save_settings".to_string());
        let mut backend = self.backend.lock().expect("backend");
        if let Some(name) = &request.org_name {
            backend.config.org_name = name.clone();
        }
        if let Some(show) = request.show_weather {
            backend.config.show_weather = Some(show);
        }
        if let Some(city) = &request.weather_city {
            backend.config.weather_city = Some(city.clone());
        }
        Ok(())
    }

    async fn set_exit_password(
        &self,
        request: &ExitPasswordRequest,
    ) -> Result<ExitPasswordStatus, ApiError> {
        self.record("set_exit_password".to_string());
        let mut backend = self.backend.lock().expect("backend");
        backend.exit_password_set = !request.clear && request.password.is_some();
        Ok(ExitPasswordStatus {
            exit_password_set: backend.exit_password_set,
        })
    }

    async fn upload(&self, file_name: &str, _bytes: Vec<u8>) -> Result<UploadResponse, ApiError> {
        self.record(format!("upload {file_name}"));
        Ok(UploadResponse {
            path: format!("/media/{file_name}"),
        })
    }
}

/// Notifier that keeps everything it was asked to show.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
    broken: bool,
}

impl RecordingNotifier {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().expect("seen").clone()
    }

    pub fn of_kind(&self, kind: NotificationKind) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.kind == kind).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.seen
            .lock()
            .expect("seen")
            .push(notification.clone());
        if self.broken {
            return Err(NotifyError("toast container missing".to_string()));
        }
        Ok(())
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub store: Arc<MemoryRouteStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub console: AdminConsole,
}

pub fn ui() -> UiSettings {
    UiSettings {
        row_height: ROW_HEIGHT,
        toast_timeout: Duration::from_millis(3000),
    }
}

pub fn harness(api: FakeApi) -> Harness {
    harness_with(api, MemoryRouteStore::new(), RecordingNotifier::default())
}

pub fn harness_with(
    api: FakeApi,
    store: MemoryRouteStore,
    notifier: RecordingNotifier,
) -> Harness {
    let api = Arc::new(api);
    let store = Arc::new(store);
    let notifier = Arc::new(notifier);
    let console = AdminConsole::new(api.clone(), store.clone(), notifier.clone(), ui());
    Harness {
        api,
        store,
        notifier,
        console,
    }
}

/// Four buttons in stored order 1, 2, 3, 4 and two groups.
pub fn stocked_api() -> FakeApi {
    FakeApi::new()
        .with_buttons(vec![
            button(1, "Visit", 1),
            button(2, "Map", 2),
            button(3, "Events", 3),
            button(4, "Cafe", 4),
        ])
        .with_groups(vec![group(10, "Museum", 1), group(11, "City", 2)])
        .with_pages(vec![page(1, "home", "Welcome")])
}

pub fn list_ids(console: &AdminConsole, list: ListKind) -> Vec<EntityId> {
    console
        .document()
        .list(list)
        .map(|node| node.ids().into_iter().map(ItemId::get).collect())
        .unwrap_or_default()
}
