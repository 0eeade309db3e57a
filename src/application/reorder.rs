//! Drag-and-drop reordering of rendered lists.
//!
//! The controller only touches the document; persisting the resulting
//! [`ReorderPlan`] and reporting the outcome is the console's job.

use kiosk_admin_api_types::ReorderRequest;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    domain::ordering::{ItemId, ListKind, assign_positions, ensure_dense},
    presentation::document::{HandlerBinding, ListNode},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GestureError {
    #[error("item {item} is not part of the {list} list")]
    UnknownItem { list: ListKind, item: ItemId },
    #[error("item {item} has no drag handlers attached")]
    NotAttached { item: ItemId },
    #[error("a drag of item {item} is already in progress")]
    AlreadyDragging { item: ItemId },
}

/// In-progress gesture. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub list: ListKind,
    pub item: ItemId,
    pub dropped: bool,
}

/// Bulk update derived from the final visual order of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    pub list: ListKind,
    pub request: ReorderRequest,
}

#[derive(Debug, Default)]
pub struct ReorderController {
    session: Option<DragSession>,
    attachments: u64,
}

impl ReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Register gesture handlers on every item of `list` that has none yet.
    /// Returns the number of items that received handlers.
    pub fn attach(&mut self, list: &mut ListNode) -> usize {
        self.attachments += 1;
        let binding = HandlerBinding {
            attachment: self.attachments,
        };
        let registered = list
            .ids()
            .into_iter()
            .filter(|id| list.register_handlers(*id, binding))
            .count();
        trace!(list = %list.kind, registered, "reorder handlers attached");
        registered
    }

    pub fn drag_start(&mut self, list: &mut ListNode, item: ItemId) -> Result<(), GestureError> {
        if let Some(active) = self.session {
            return Err(GestureError::AlreadyDragging { item: active.item });
        }
        let kind = list.kind;
        let node = list
            .item_mut(item)
            .ok_or(GestureError::UnknownItem { list: kind, item })?;
        if node.handlers().is_none() {
            return Err(GestureError::NotAttached { item });
        }
        node.dragging = true;
        self.session = Some(DragSession {
            list: kind,
            item,
            dropped: false,
        });
        debug!(list = %kind, item = %item, "drag started");
        Ok(())
    }

    /// Move the dragged item next to `over`: before it when `pointer_y` is in
    /// the upper half of `over`'s box, after it otherwise. Returns whether the
    /// live order changed.
    pub fn drag_over(&mut self, list: &mut ListNode, over: ItemId, pointer_y: f64) -> bool {
        let Some(session) = self.session.filter(|s| s.list == list.kind && !s.dropped) else {
            return false;
        };
        if session.item == over {
            return false;
        }
        let Some(target) = list.item(over) else {
            return false;
        };
        let before = target.bounds().is_upper_half(pointer_y);
        list.move_relative(session.item, over, before)
    }

    /// Finalize the gesture; the order is left as drag-over arranged it.
    pub fn drop_dragged(&mut self) -> bool {
        match self.session.as_mut() {
            Some(session) => {
                session.dropped = true;
                true
            }
            None => false,
        }
    }

    /// Close the gesture and derive positions `1..=N` from the list's
    /// current order.
    pub fn drag_end(&mut self, list: &mut ListNode) -> Option<ReorderPlan> {
        let session = self.session.filter(|s| s.list == list.kind)?;
        self.session = None;
        if let Some(item) = list.item_mut(session.item) {
            item.dragging = false;
        }

        let items = assign_positions(list.ids());
        debug_assert!(ensure_dense(&items).is_ok());
        debug!(list = %list.kind, items = items.len(), "drag ended");
        Some(ReorderPlan {
            list: list.kind,
            request: ReorderRequest { items },
        })
    }

    /// Drop the current gesture without producing a plan.
    pub fn discard(&mut self, list: Option<&mut ListNode>) -> Option<DragSession> {
        let session = self.session.take()?;
        if let Some(item) = list.and_then(|list| list.item_mut(session.item)) {
            item.dragging = false;
        }
        debug!(list = %session.list, item = %session.item, "drag discarded");
        Some(session)
    }
}
