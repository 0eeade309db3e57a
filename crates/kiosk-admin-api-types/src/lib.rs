//! Request and response shapes exchanged with the kiosk content backend.
//!
//! Field names follow the backend's JSON exactly. Optional response fields
//! default so that older backends (or partially populated rows) still decode.

use serde::{Deserialize, Serialize};

/// Backend-assigned integer identifier shared by every entity.
pub type EntityId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Image,
    Video,
    Pdf,
    #[serde(other)]
    Unknown,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Video => "video",
            BlockKind::Pdf => "pdf",
            BlockKind::Unknown => "unknown",
        }
    }

    pub fn is_media(self) -> bool {
        matches!(self, BlockKind::Image | BlockKind::Video | BlockKind::Pdf)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl BlockContent {
    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            path: None,
        }
    }

    pub fn path(path: impl Into<String>) -> Self {
        Self {
            html: None,
            path: Some(path.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: EntityId,
    pub page_id: EntityId,
    pub kind: BlockKind,
    #[serde(default)]
    pub content: BlockContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: EntityId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub target_slug: String,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub icon_path: Option<String>,
    #[serde(default)]
    pub group_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonGroup {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
}

/// Entry of `GET /home/menu`: either a group with its buttons or a
/// standalone button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub kind: String,
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order_index: Option<i64>,
    #[serde(default)]
    pub items: Vec<MenuButton>,
}

impl MenuNode {
    pub fn is_group(&self) -> bool {
        self.kind == "group"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuButton {
    pub id: EntityId,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub logo_path: Option<String>,
}

/// Public kiosk configuration returned by `GET /config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub show_weather: Option<bool>,
    #[serde(default)]
    pub weather_city: Option<String>,
    #[serde(default)]
    pub exit_password_set: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kiosk_exit_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_weather: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitPasswordRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub clear: bool,
}

impl ExitPasswordRequest {
    pub fn set(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
            clear: false,
        }
    }

    pub fn clear() -> Self {
        Self {
            password: None,
            clear: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitPasswordStatus {
    #[serde(default)]
    pub exit_password_set: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonWriteRequest {
    pub title: String,
    pub target_slug: String,
    pub bg_color: String,
    pub text_color: String,
    pub icon_path: Option<String>,
    pub group_id: Option<EntityId>,
}

/// Partial update that only moves a button in or out of a group.
/// `group_id` is always serialized so that `null` detaches the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonGroupAssignment {
    pub group_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonGroupWriteRequest {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCreateRequest {
    pub slug: String,
    pub title: String,
    pub is_home: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_home: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCreateRequest {
    pub page_id: EntityId,
    pub kind: BlockKind,
    pub content: BlockContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockUpdateRequest {
    pub kind: BlockKind,
    pub content: BlockContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: EntityId,
    pub order_index: i64,
}

/// Body of `POST <resource>/reorder`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub path: String,
}
