use kiosk_admin_api_types::{ButtonGroup, ButtonGroupWriteRequest, EntityId};

use super::required;
use crate::application::{console::AdminConsole, error::AdminError, ports::Notification};

impl AdminConsole {
    pub async fn create_group(&self, title: &str) -> Result<ButtonGroup, AdminError> {
        let title = match required(title, "group title") {
            Ok(title) => title,
            Err(err) => return self.reject(err),
        };
        let result = self
            .api()
            .create_group(&ButtonGroupWriteRequest {
                title: title.clone(),
            })
            .await;
        self.conclude(
            "Create group",
            Notification::success("Group created").with_message(title),
            result,
        )
        .await
    }

    pub async fn rename_group(&self, id: EntityId, title: &str) -> Result<ButtonGroup, AdminError> {
        let title = match required(title, "group title") {
            Ok(title) => title,
            Err(err) => return self.reject(err),
        };
        let result = self
            .api()
            .update_group(id, &ButtonGroupWriteRequest { title })
            .await;
        self.conclude("Rename group", Notification::success("Saved"), result)
            .await
    }
}
