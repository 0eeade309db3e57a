use kiosk_admin_api_types::{Block, BlockKind};
use tracing::info;

use super::blocks::BlockDraft;
use crate::{
    application::{console::AdminConsole, error::AdminError, ports::Notification},
    domain::error::DomainError,
    presentation::document::{Panel, PanelId},
};

impl AdminConsole {
    /// Upload a file and return its server path. The path is also shown in
    /// the uploader panel.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, AdminError> {
        if file_name.trim().is_empty() || bytes.is_empty() {
            return self.reject(DomainError::validation("choose a file to upload"));
        }
        let uploaded = match self.api().upload(file_name.trim(), bytes).await {
            Ok(uploaded) => uploaded,
            Err(err) => return Err(self.report_failure("Upload", err)),
        };
        info!(path = %uploaded.path, "file uploaded");

        let path = uploaded.path;
        self.update_document("upload.record", |document| {
            if let Some(Panel::Uploader(uploader)) = document.panel_mut(PanelId::Uploader) {
                uploader.last_uploaded = Some(path.clone());
            }
        });
        self.notify(Notification::success("File uploaded").with_message(path.clone()));
        Ok(path)
    }

    /// Upload a file and attach it to the selected page as a `kind` block.
    pub async fn upload_block(
        &self,
        kind: BlockKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Block, AdminError> {
        if self.selected_page().is_none() {
            self.notify(Notification::error("Select a page first"));
            return Err(AdminError::NoPageSelected);
        }
        let path = self.upload(file_name, bytes).await?;
        self.add_block(BlockDraft::media(kind, path)).await
    }

    /// Attach an external URL to the selected page as a `kind` block.
    pub async fn attach_url(&self, kind: BlockKind, url: &str) -> Result<Block, AdminError> {
        self.add_block(BlockDraft::media(kind, url)).await
    }
}
