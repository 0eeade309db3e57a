//! In-memory document the console renders into.
//!
//! Sections, the heading, the side navigation, and the panels inside each
//! section mirror the admin page layout. List items carry their backend id
//! as render-time metadata so gestures never have to match on visible text.

use std::collections::BTreeMap;

use crate::domain::ordering::{ItemId, ListKind};

/// Handle to a section inside one [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionHandle(usize);

#[derive(Debug, Clone, Default)]
pub struct SectionNode {
    /// Direct child of the view container.
    pub in_view: bool,
    /// `data-route` attribute.
    pub data_route: Option<String>,
    pub element_id: Option<String>,
    pub visible: bool,
    /// Controls wired by one-time setup, in binding order.
    pub bindings: Vec<&'static str>,
    pub(crate) panels: BTreeMap<PanelId, Panel>,
}

impl SectionNode {
    pub fn in_view(route: &str) -> Self {
        Self {
            in_view: true,
            data_route: Some(route.to_string()),
            element_id: Some(format!("section-{route}")),
            ..Self::default()
        }
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(&id)
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.get_mut(&id)
    }

    pub fn set_panel(&mut self, id: PanelId, panel: Panel) {
        self.panels.insert(id, panel);
    }

    pub fn remove_panel(&mut self, id: PanelId) -> Option<Panel> {
        self.panels.remove(&id)
    }

    pub fn panels(&self) -> impl Iterator<Item = (PanelId, &Panel)> {
        self.panels.iter().map(|(id, panel)| (*id, panel))
    }

    pub fn bind(&mut self, control: &'static str) {
        self.bindings.push(control);
    }

    pub fn binding_count(&self, control: &str) -> usize {
        self.bindings.iter().filter(|c| **c == control).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PanelId {
    Notice,
    Settings,
    Pages,
    PageEditor,
    ButtonForm,
    Buttons,
    Groups,
    Uploader,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Loading(String),
    Empty(String),
    Unavailable(String),
    Text(String),
    Rows(Vec<Row>),
    List(ListNode),
    Settings(SettingsForm),
    ButtonForm(ButtonForm),
    PageEditor(PageEditor),
    Uploader(Uploader),
}

/// Static (non-reorderable) list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: i64,
    pub title: String,
    pub detail: Option<String>,
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub org_name: String,
    pub logo_path: Option<String>,
    pub weather_options: Vec<String>,
    pub weather_city: Option<String>,
    pub show_weather: bool,
    pub exit_password_set: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonForm {
    pub palette: Vec<String>,
    pub target_options: Vec<Choice>,
    pub group_options: Vec<Choice>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageEditor {
    pub heading: String,
    pub info: Option<String>,
    pub blocks: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Uploader {
    pub kinds: Vec<String>,
    pub last_uploaded: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    /// Whether a pointer at `y` falls in the upper half of the box.
    pub fn is_upper_half(&self, y: f64) -> bool {
        (y - self.top) < self.height / 2.0
    }
}

/// Marker for gesture handlers registered on a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerBinding {
    pub attachment: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub id: ItemId,
    pub title: String,
    pub badge: String,
    pub icon: Option<String>,
    pub detail: Option<String>,
    pub draggable: bool,
    pub dragging: bool,
    handlers: Option<HandlerBinding>,
    bounds: Bounds,
}

impl ListItem {
    pub fn new(id: ItemId, title: impl Into<String>, badge: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            badge: badge.into(),
            icon: None,
            detail: None,
            draggable: false,
            dragging: false,
            handlers: None,
            bounds: Bounds {
                top: 0.0,
                height: 0.0,
            },
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn handlers(&self) -> Option<HandlerBinding> {
        self.handlers
    }
}

/// Rendered reorderable list. Every refresh builds a new node, so handler
/// registrations never survive a re-render.
#[derive(Debug, Clone, PartialEq)]
pub struct ListNode {
    pub kind: ListKind,
    items: Vec<ListItem>,
    row_height: f64,
}

impl ListNode {
    pub fn new(kind: ListKind, items: Vec<ListItem>, row_height: f64) -> Self {
        let mut node = Self {
            kind,
            items,
            row_height,
        };
        node.relayout();
        node
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut ListItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Register handlers on `id` unless it already has some. Returns whether
    /// a registration happened.
    pub fn register_handlers(&mut self, id: ItemId, binding: HandlerBinding) -> bool {
        match self.item_mut(id) {
            Some(item) if item.handlers.is_none() => {
                item.handlers = Some(binding);
                item.draggable = true;
                true
            }
            _ => false,
        }
    }

    /// Move `moved` directly before (or after) `anchor`. Returns whether the
    /// order changed.
    pub fn move_relative(&mut self, moved: ItemId, anchor: ItemId, before: bool) -> bool {
        if moved == anchor {
            return false;
        }
        let (Some(from), Some(_)) = (self.position(moved), self.position(anchor)) else {
            return false;
        };
        let original = self.ids();
        let item = self.items.remove(from);
        let Some(anchor_at) = self.position(anchor) else {
            self.items.insert(from, item);
            return false;
        };
        let to = if before { anchor_at } else { anchor_at + 1 };
        self.items.insert(to, item);
        self.relayout();
        self.ids() != original
    }

    fn relayout(&mut self) {
        let row_height = self.row_height;
        for (index, item) in self.items.iter_mut().enumerate() {
            item.bounds = Bounds {
                top: index as f64 * row_height,
                height: row_height,
            };
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub href: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    sections: Vec<SectionNode>,
    heading: String,
    nav: Vec<NavItem>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_section(&mut self, section: SectionNode) -> SectionHandle {
        self.sections.push(section);
        SectionHandle(self.sections.len() - 1)
    }

    pub fn add_nav_item(&mut self, href: impl Into<String>, label: impl Into<String>) {
        self.nav.push(NavItem {
            href: href.into(),
            label: label.into(),
            active: false,
        });
    }

    pub fn section(&self, handle: SectionHandle) -> Option<&SectionNode> {
        self.sections.get(handle.0)
    }

    pub fn section_mut(&mut self, handle: SectionHandle) -> Option<&mut SectionNode> {
        self.sections.get_mut(handle.0)
    }

    pub fn handles(&self) -> impl Iterator<Item = SectionHandle> + '_ {
        (0..self.sections.len()).map(SectionHandle)
    }

    /// `#view > section[data-route="<route>"]`
    pub fn find_in_view(&self, route: &str) -> Option<SectionHandle> {
        self.sections
            .iter()
            .position(|s| s.in_view && s.data_route.as_deref() == Some(route))
            .map(SectionHandle)
    }

    /// `#<id>`
    pub fn find_by_element_id(&self, id: &str) -> Option<SectionHandle> {
        self.sections
            .iter()
            .position(|s| s.element_id.as_deref() == Some(id))
            .map(SectionHandle)
    }

    /// `[data-route="<route>"]` anywhere in the document.
    pub fn find_by_data_route(&self, route: &str) -> Option<SectionHandle> {
        self.sections
            .iter()
            .position(|s| s.data_route.as_deref() == Some(route))
            .map(SectionHandle)
    }

    /// Hide every section, then show `target`.
    pub fn show_only(&mut self, target: SectionHandle) {
        for section in &mut self.sections {
            section.visible = false;
        }
        if let Some(section) = self.sections.get_mut(target.0) {
            section.visible = true;
        }
    }

    pub fn visible_sections(&self) -> Vec<SectionHandle> {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.visible)
            .map(|(index, _)| SectionHandle(index))
            .collect()
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn set_heading(&mut self, heading: impl Into<String>) {
        self.heading = heading.into();
    }

    pub fn nav(&self) -> &[NavItem] {
        &self.nav
    }

    /// Mark exactly the menu items whose target equals `href` as active.
    pub fn set_active_nav(&mut self, href: &str) {
        for item in &mut self.nav {
            item.active = item.href == href;
        }
    }

    /// First panel with `id` in any section.
    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.sections.iter().find_map(|section| section.panel(id))
    }

    pub fn panel_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.sections
            .iter_mut()
            .find_map(|section| section.panel_mut(id))
    }

    pub fn list(&self, kind: ListKind) -> Option<&ListNode> {
        self.sections
            .iter()
            .flat_map(|s| s.panels.values())
            .find_map(|panel| match panel {
                Panel::List(list) if list.kind == kind => Some(list),
                _ => None,
            })
    }

    pub fn list_mut(&mut self, kind: ListKind) -> Option<&mut ListNode> {
        self.sections
            .iter_mut()
            .flat_map(|s| s.panels.values_mut())
            .find_map(|panel| match panel {
                Panel::List(list) if list.kind == kind => Some(list),
                _ => None,
            })
    }
}
