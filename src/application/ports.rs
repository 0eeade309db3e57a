//! Port traits describing the console's external collaborators: the admin
//! REST backend, the last-route store, and the notification sink.

use std::time::Duration;

use async_trait::async_trait;
use kiosk_admin_api_types::{
    Block, BlockCreateRequest, BlockUpdateRequest, Button, ButtonGroup, ButtonGroupAssignment,
    ButtonGroupWriteRequest, ButtonWriteRequest, EntityId, ExitPasswordRequest,
    ExitPasswordStatus, MenuNode, Page, PageCreateRequest, PageUpdateRequest, ReorderRequest,
    SettingsUpdateRequest, SiteConfig, UploadResponse,
};
use thiserror::Error;

use crate::domain::ordering::{ItemId, ListKind};

/// Key under which the last visited route is stored.
pub const LAST_ROUTE_KEY: &str = "admin:lastRoute";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("endpoint `{path}` is not available")]
    MissingEndpoint { path: String },
    #[error("resource already exists: {0}")]
    Conflict(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("request was superseded")]
    Cancelled,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    /// Server-provided detail worth showing to the user, if any.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Status { body, .. } if !body.trim().is_empty() => body.trim().to_string(),
            other => other.to_string(),
        }
    }
}

/// Admin REST backend.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_buttons(&self) -> Result<Vec<Button>, ApiError>;
    async fn list_groups(&self) -> Result<Vec<ButtonGroup>, ApiError>;
    async fn menu(&self) -> Result<Vec<MenuNode>, ApiError>;
    async fn list_pages(&self) -> Result<Vec<Page>, ApiError>;
    async fn page(&self, slug: &str) -> Result<Page, ApiError>;
    async fn site_config(&self) -> Result<SiteConfig, ApiError>;
    async fn exit_password_status(&self) -> Result<ExitPasswordStatus, ApiError>;

    /// `POST <resource>/reorder`. A backend without the endpoint answers
    /// with [`ApiError::MissingEndpoint`].
    async fn reorder(&self, list: ListKind, request: &ReorderRequest) -> Result<(), ApiError>;
    /// `DELETE <resource>/<id>`; deleting an already deleted item succeeds.
    async fn delete_item(&self, list: ListKind, id: ItemId) -> Result<(), ApiError>;

    async fn create_button(&self, request: &ButtonWriteRequest) -> Result<Button, ApiError>;
    async fn update_button(
        &self,
        id: EntityId,
        request: &ButtonWriteRequest,
    ) -> Result<Button, ApiError>;
    async fn assign_group(
        &self,
        id: EntityId,
        request: &ButtonGroupAssignment,
    ) -> Result<Button, ApiError>;

    async fn create_group(&self, request: &ButtonGroupWriteRequest)
    -> Result<ButtonGroup, ApiError>;
    async fn update_group(
        &self,
        id: EntityId,
        request: &ButtonGroupWriteRequest,
    ) -> Result<ButtonGroup, ApiError>;

    async fn create_page(&self, request: &PageCreateRequest) -> Result<Page, ApiError>;
    async fn update_page(&self, slug: &str, request: &PageUpdateRequest)
    -> Result<Page, ApiError>;
    async fn delete_page(&self, slug: &str) -> Result<(), ApiError>;

    async fn create_block(&self, request: &BlockCreateRequest) -> Result<Block, ApiError>;
    async fn update_block(
        &self,
        id: EntityId,
        request: &BlockUpdateRequest,
    ) -> Result<Block, ApiError>;
    async fn delete_block(&self, id: EntityId) -> Result<(), ApiError>;

    async fn save_settings(&self, request: &SettingsUpdateRequest) -> Result<(), ApiError>;
    async fn set_exit_password(
        &self,
        request: &ExitPasswordRequest,
    ) -> Result<ExitPasswordStatus, ApiError>;

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, ApiError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("route store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("route store is corrupt: {0}")]
    Corrupt(String),
}

/// Best-effort persistence of the last visited route across restarts.
pub trait RouteStore: Send + Sync {
    fn last_route(&self) -> Result<Option<String>, StoreError>;
    fn save_route(&self, route: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }
}

/// Transient, dismissible message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: Option<String>,
    pub kind: NotificationKind,
    pub timeout: Option<Duration>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: None,
            kind,
            timeout: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title)
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Error)]
#[error("notification sink unavailable: {0}")]
pub struct NotifyError(pub String);

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}
