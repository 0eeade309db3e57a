//! Admin mutations. Each one validates its input, calls the backend once,
//! reports the outcome through the notification sink, and re-synchronises
//! the visible section from the backend after a success.

pub mod blocks;
pub mod buttons;
pub mod groups;
pub mod media;
pub mod pages;
pub mod settings;

use tracing::{info, warn};

use super::{
    console::AdminConsole,
    error::AdminError,
    ports::{ApiError, Notification},
};
use crate::domain::{
    error::DomainError,
    ordering::{ItemId, ListKind},
};

/// Trim `value`, mapping blank input to `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn required(value: &str, field: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

impl AdminConsole {
    pub(crate) fn reject<T>(&self, error: DomainError) -> Result<T, AdminError> {
        self.notify(Notification::error("Check the form").with_message(error.message()));
        Err(AdminError::Validation(error))
    }

    /// Report the result of a backend mutation and reload on success.
    pub(crate) async fn conclude<T>(
        &self,
        action: &'static str,
        success: Notification,
        result: Result<T, ApiError>,
    ) -> Result<T, AdminError> {
        match result {
            Ok(value) => {
                info!(action, "admin change saved");
                self.reload().await;
                self.notify(success);
                Ok(value)
            }
            Err(err) => Err(self.report_failure(action, err)),
        }
    }

    pub(crate) fn report_failure(&self, action: &'static str, err: ApiError) -> AdminError {
        warn!(action, error = %err, "admin change failed");
        self.notify(Notification::error(format!("{action} failed")).with_message(err.detail()));
        AdminError::api(action, err)
    }

    /// Delete an item of a reorderable list. An item that is already gone
    /// counts as deleted.
    pub async fn delete_item(&self, list: ListKind, id: ItemId) -> Result<(), AdminError> {
        let result = match self.api().delete_item(list, id).await {
            Err(ApiError::NotFound(_)) => Ok(()),
            other => other,
        };
        if let Err(err) = result {
            return Err(self.report_failure("Delete", err));
        }
        info!(action = "Delete", list = %list, id = %id, "admin change saved");
        self.reload_list(list).await;
        let message = match list {
            ListKind::Buttons => "Button removed",
            ListKind::Groups => "Group removed; its buttons are ungrouped",
        };
        self.notify(Notification::success("Deleted").with_message(message));
        Ok(())
    }
}
