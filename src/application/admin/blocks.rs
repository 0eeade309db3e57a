use kiosk_admin_api_types::{
    Block, BlockContent, BlockCreateRequest, BlockKind, BlockUpdateRequest, EntityId,
};

use crate::{
    application::{
        console::AdminConsole,
        error::AdminError,
        ports::{ApiError, Notification},
    },
    domain::{content::normalize_alignment, error::DomainError},
};

/// Contents of the block editor: rich text for text blocks, a media path
/// for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDraft {
    pub kind: BlockKind,
    pub body: String,
}

impl BlockDraft {
    pub fn text(html: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Text,
            body: html.into(),
        }
    }

    pub fn media(kind: BlockKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            body: path.into(),
        }
    }

    pub(crate) fn into_content(self) -> Result<(BlockKind, BlockContent), DomainError> {
        match self.kind {
            BlockKind::Text => Ok((
                BlockKind::Text,
                BlockContent::html(normalize_alignment(&self.body)),
            )),
            kind if kind.is_media() => {
                let path = self.body.trim();
                if path.is_empty() {
                    return Err(DomainError::validation(format!(
                        "a {} block needs a file path",
                        kind.as_str()
                    )));
                }
                Ok((kind, BlockContent::path(path)))
            }
            kind => Err(DomainError::validation(format!(
                "blocks of kind `{}` cannot be edited",
                kind.as_str()
            ))),
        }
    }
}

impl AdminConsole {
    /// Append a block to the selected page.
    pub async fn add_block(&self, draft: BlockDraft) -> Result<Block, AdminError> {
        let Some(slug) = self.selected_page() else {
            self.notify(Notification::error("Select a page first"));
            return Err(AdminError::NoPageSelected);
        };
        let (kind, content) = match draft.into_content() {
            Ok(parts) => parts,
            Err(err) => return self.reject(err),
        };

        let page = match self.api().page(&slug).await {
            Ok(page) => page,
            Err(ApiError::NotFound(_)) => {
                self.set_selected_page(None);
                self.notify(Notification::error("Select a page first"));
                return Err(AdminError::NoPageSelected);
            }
            Err(err) => return Err(self.report_failure("Add block", err)),
        };

        let request = BlockCreateRequest {
            page_id: page.id,
            kind,
            content,
        };
        let result = self.api().create_block(&request).await;
        self.conclude(
            "Add block",
            Notification::success("Block added").with_message(page.title),
            result,
        )
        .await
    }

    pub async fn update_block(&self, id: EntityId, draft: BlockDraft) -> Result<Block, AdminError> {
        let (kind, content) = match draft.into_content() {
            Ok(parts) => parts,
            Err(err) => return self.reject(err),
        };
        let result = self
            .api()
            .update_block(id, &BlockUpdateRequest { kind, content })
            .await;
        self.conclude("Update block", Notification::success("Saved"), result)
            .await
    }

    pub async fn delete_block(&self, id: EntityId) -> Result<(), AdminError> {
        let result = match self.api().delete_block(id).await {
            Err(ApiError::NotFound(_)) => Ok(()),
            other => other,
        };
        self.conclude("Delete block", Notification::success("Block deleted"), result)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_drafts_are_normalised() {
        let (kind, content) = BlockDraft::text(r#"<p class="ql-align-right">x</p>"#)
            .into_content()
            .expect("text");
        assert_eq!(kind, BlockKind::Text);
        let html = content.html.expect("html");
        assert!(html.contains("text-align: right"));
        assert!(content.path.is_none());
    }

    #[test]
    fn media_drafts_need_a_path() {
        let (kind, content) = BlockDraft::media(BlockKind::Pdf, " /media/menu.pdf ")
            .into_content()
            .expect("pdf");
        assert_eq!(kind, BlockKind::Pdf);
        assert_eq!(content.path.as_deref(), Some("/media/menu.pdf"));

        assert!(BlockDraft::media(BlockKind::Image, "  ").into_content().is_err());
        assert!(BlockDraft::media(BlockKind::Unknown, "/x").into_content().is_err());
    }
}
