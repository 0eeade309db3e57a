use kiosk_admin_api_types::{Page, PageCreateRequest, PageUpdateRequest};
use time::OffsetDateTime;
use tracing::info;

use super::{non_blank, required};
use crate::{
    application::{
        console::AdminConsole,
        error::AdminError,
        ports::{ApiError, Notification},
    },
    domain::content::generated_page_slug,
};

/// Changes to an existing page. Absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct PageCommand {
    pub title: Option<String>,
    pub is_home: Option<bool>,
}

impl AdminConsole {
    /// Create a page with a generated slug and select it. When the backend
    /// already has a page under that slug, the existing page is selected.
    pub async fn create_page(&self, title: &str, is_home: bool) -> Result<Page, AdminError> {
        let title = match required(title, "page title") {
            Ok(title) => title,
            Err(err) => return self.reject(err),
        };
        let request = PageCreateRequest {
            slug: generated_page_slug(OffsetDateTime::now_utc()),
            title,
            is_home,
        };

        let page = match self.api().create_page(&request).await {
            Ok(page) => page,
            Err(ApiError::Conflict(_)) => {
                info!(slug = %request.slug, "page exists; loading it");
                match self.api().page(&request.slug).await {
                    Ok(page) => page,
                    Err(err) => return Err(self.report_failure("Create page", err)),
                }
            }
            Err(err) => return Err(self.report_failure("Create page", err)),
        };

        self.set_selected_page(Some(page.slug.clone()));
        self.reload().await;
        self.notify(Notification::success("Page created").with_message(page.title.clone()));
        Ok(page)
    }

    pub async fn update_page(&self, slug: &str, command: PageCommand) -> Result<Page, AdminError> {
        let title = non_blank(command.title);
        let request = PageUpdateRequest {
            title,
            is_home: command.is_home,
        };
        let result = self.api().update_page(slug, &request).await;
        self.conclude("Update page", Notification::success("Saved"), result)
            .await
    }

    pub async fn make_home(&self, slug: &str) -> Result<Page, AdminError> {
        let result = self
            .api()
            .update_page(
                slug,
                &PageUpdateRequest {
                    title: None,
                    is_home: Some(true),
                },
            )
            .await;
        self.conclude(
            "Set home page",
            Notification::success("Home page set").with_message(slug.to_string()),
            result,
        )
        .await
    }

    /// Delete a page; the editor is cleared when it showed that page.
    pub async fn delete_page(&self, slug: &str) -> Result<(), AdminError> {
        let result = match self.api().delete_page(slug).await {
            Err(ApiError::NotFound(_)) => Ok(()),
            other => other,
        };
        if result.is_ok() && self.selected_page().as_deref() == Some(slug) {
            self.set_selected_page(None);
        }
        self.conclude("Delete page", Notification::success("Page deleted"), result)
            .await
    }
}
