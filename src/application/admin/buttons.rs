use kiosk_admin_api_types::{Button, ButtonGroupAssignment, ButtonWriteRequest, EntityId};

use super::{non_blank, required};
use crate::{
    application::{console::AdminConsole, error::AdminError, ports::Notification},
    domain::{
        content::{DEFAULT_BUTTON_BG, Foreground},
        error::DomainError,
    },
};

/// Contents of the button editor.
#[derive(Debug, Clone, Default)]
pub struct ButtonCommand {
    pub title: String,
    pub target_slug: String,
    /// Background colour; the default blue when absent.
    pub bg_color: Option<String>,
    pub foreground: Foreground,
    pub icon_path: Option<String>,
    pub group_id: Option<EntityId>,
}

impl ButtonCommand {
    fn into_request(self) -> Result<ButtonWriteRequest, DomainError> {
        let title = required(&self.title, "button title")?;
        let target_slug = required(&self.target_slug, "target page")?;
        let bg_color = non_blank(self.bg_color).unwrap_or_else(|| DEFAULT_BUTTON_BG.to_string());
        if !is_hex_color(&bg_color) {
            return Err(DomainError::validation(format!(
                "`{bg_color}` is not a #rrggbb colour"
            )));
        }
        Ok(ButtonWriteRequest {
            title,
            target_slug,
            bg_color,
            text_color: self.foreground.hex().to_string(),
            icon_path: non_blank(self.icon_path),
            group_id: self.group_id,
        })
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl AdminConsole {
    pub async fn create_button(&self, command: ButtonCommand) -> Result<Button, AdminError> {
        let request = match command.into_request() {
            Ok(request) => request,
            Err(err) => return self.reject(err),
        };
        let result = self.api().create_button(&request).await;
        self.conclude(
            "Create button",
            Notification::success("Button created").with_message(request.title.clone()),
            result,
        )
        .await
    }

    pub async fn update_button(
        &self,
        id: EntityId,
        command: ButtonCommand,
    ) -> Result<Button, AdminError> {
        let request = match command.into_request() {
            Ok(request) => request,
            Err(err) => return self.reject(err),
        };
        let result = self.api().update_button(id, &request).await;
        self.conclude(
            "Update button",
            Notification::success("Saved").with_message(request.title.clone()),
            result,
        )
        .await
    }

    /// Detach a button from its group; the button itself stays.
    pub async fn remove_from_group(&self, id: EntityId) -> Result<Button, AdminError> {
        let result = self
            .api()
            .assign_group(id, &ButtonGroupAssignment { group_id: None })
            .await;
        self.conclude(
            "Remove from group",
            Notification::success("Removed from group"),
            result,
        )
        .await
    }
}
