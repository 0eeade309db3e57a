//! Orderable list entries and dense position assignment.

use std::fmt;
use std::str::FromStr;

use kiosk_admin_api_types::{Button, ButtonGroup, EntityId, ReorderEntry};

use super::error::DomainError;

/// Backend identifier carried on every rendered list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub EntityId);

impl ItemId {
    pub fn get(self) -> EntityId {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<EntityId>()
            .map(ItemId)
            .map_err(|err| DomainError::validation(format!("invalid item id `{s}`: {err}")))
    }
}

/// Reorderable collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListKind {
    Buttons,
    Groups,
}

impl ListKind {
    pub const ALL: [ListKind; 2] = [ListKind::Buttons, ListKind::Groups];

    pub fn as_str(self) -> &'static str {
        match self {
            ListKind::Buttons => "buttons",
            ListKind::Groups => "groups",
        }
    }

    /// Resource that returns the list in stored order.
    pub fn list_path(self) -> &'static str {
        match self {
            ListKind::Buttons => "home/buttons",
            ListKind::Groups => "admin/button-groups",
        }
    }

    pub fn reorder_path(self) -> &'static str {
        match self {
            ListKind::Buttons => "admin/buttons/reorder",
            ListKind::Groups => "admin/button-groups/reorder",
        }
    }

    pub fn item_path(self, id: ItemId) -> String {
        match self {
            ListKind::Buttons => format!("admin/buttons/{id}"),
            ListKind::Groups => format!("admin/button-groups/{id}"),
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            ListKind::Buttons => "buttons",
            ListKind::Groups => "button groups",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "buttons" => Ok(ListKind::Buttons),
            "groups" | "button-groups" => Ok(ListKind::Groups),
            other => Err(DomainError::validation(format!(
                "unknown list `{other}` (expected buttons or groups)"
            ))),
        }
    }
}

/// Entity that carries a persisted position within its list.
pub trait Orderable {
    fn item_id(&self) -> ItemId;
    fn position(&self) -> i64;
    fn label(&self) -> &str;
}

impl Orderable for Button {
    fn item_id(&self) -> ItemId {
        ItemId(self.id)
    }

    fn position(&self) -> i64 {
        self.order_index
    }

    fn label(&self) -> &str {
        &self.title
    }
}

impl Orderable for ButtonGroup {
    fn item_id(&self) -> ItemId {
        ItemId(self.id)
    }

    fn position(&self) -> i64 {
        self.order_index
    }

    fn label(&self) -> &str {
        &self.title
    }
}

/// Stable sort by stored position; equal positions keep backend order.
pub fn sort_by_position<T: Orderable>(items: &mut [T]) {
    items.sort_by_key(Orderable::position);
}

/// Assign positions `1..=N` following the given visual order.
pub fn assign_positions<I>(ids: I) -> Vec<ReorderEntry>
where
    I: IntoIterator<Item = ItemId>,
{
    ids.into_iter()
        .zip(1_i64..)
        .map(|(id, order_index)| ReorderEntry {
            id: id.get(),
            order_index,
        })
        .collect()
}

/// Check that positions form a contiguous `1..=N` sequence with unique ids.
pub fn ensure_dense(entries: &[ReorderEntry]) -> Result<(), DomainError> {
    let mut seen = std::collections::HashSet::with_capacity(entries.len());
    for (expected, entry) in (1_i64..).zip(entries) {
        if entry.order_index != expected {
            return Err(DomainError::invariant(format!(
                "item {} has position {} where {expected} was expected",
                entry.id, entry.order_index
            )));
        }
        if !seen.insert(entry.id) {
            return Err(DomainError::invariant(format!(
                "item {} appears twice in the ordering",
                entry.id
            )));
        }
    }
    Ok(())
}
