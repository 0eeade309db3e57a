//! REST adapter for the kiosk content backend.

use async_trait::async_trait;
use kiosk_admin_api_types::{
    Block, BlockCreateRequest, BlockUpdateRequest, Button, ButtonGroup, ButtonGroupAssignment,
    ButtonGroupWriteRequest, ButtonWriteRequest, EntityId, ExitPasswordRequest,
    ExitPasswordStatus, MenuNode, Page, PageCreateRequest, PageUpdateRequest, ReorderRequest,
    SettingsUpdateRequest, SiteConfig, UploadResponse,
};
use reqwest::{
    Client, Method, RequestBuilder, Response, StatusCode,
    header::{COOKIE, HeaderValue},
    multipart::{Form, Part},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};
use url::Url;

use super::error::InfraError;
use crate::{
    application::ports::{AdminApi, ApiError},
    config::ApiSettings,
    domain::ordering::{ItemId, ListKind},
};

#[cfg(test)]
mod tests;

#[derive(Clone, Debug)]
pub struct HttpAdminApi {
    client: Client,
    base: Url,
    cookie: Option<HeaderValue>,
}

impl HttpAdminApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::http(format!("failed to build client: {err}")))?;
        let cookie = settings
            .token
            .as_deref()
            .map(|token| {
                HeaderValue::from_str(&format!("access_token=\"Bearer {token}\""))
                    .map_err(|err| InfraError::configuration(format!("invalid api token: {err}")))
            })
            .transpose()?;
        Ok(Self {
            client,
            base: settings.base_url.clone(),
            cookie,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("kiosk-admin/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::InvalidRequest(format!("bad path `{path}`: {err}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        debug!(%method, %url, "admin api request");
        let builder = self.client.request(method, url);
        Ok(match &self.cookie {
            Some(cookie) => builder.header(COOKIE, cookie.clone()),
            None => builder,
        })
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Self::send(self.request(Method::GET, path)?).await?;
        Self::handle(path, response).await
    }

    /// Fetch a collection. A body that is not a JSON array is read as an
    /// empty collection.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let value: serde_json::Value = self.get(path).await?;
        if !value.is_array() {
            warn!(path, "collection endpoint returned a non-array body");
            return Ok(Vec::new());
        }
        serde_json::from_value(value).map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = Self::send(self.request(method, path)?.json(body)).await?;
        Self::handle(path, response).await
    }

    async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut request = self.request(method, path)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = Self::send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(path, status, text));
        }
        Ok(())
    }

    async fn handle<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(status_error(path, status, text));
        }
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn status_error(path: &str, status: StatusCode, body: String) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound(path.to_string()),
        StatusCode::CONFLICT => ApiError::Conflict(body),
        _ => ApiError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// Statuses with which a backend signals that it has no reorder endpoint.
fn is_missing_endpoint(err: &ApiError) -> bool {
    match err {
        ApiError::NotFound(_) => true,
        ApiError::Status { status, .. } => matches!(*status, 405 | 501),
        _ => false,
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn list_buttons(&self) -> Result<Vec<Button>, ApiError> {
        self.get_list(ListKind::Buttons.list_path()).await
    }

    async fn list_groups(&self) -> Result<Vec<ButtonGroup>, ApiError> {
        self.get_list(ListKind::Groups.list_path()).await
    }

    async fn menu(&self) -> Result<Vec<MenuNode>, ApiError> {
        self.get_list("home/menu").await
    }

    async fn list_pages(&self) -> Result<Vec<Page>, ApiError> {
        self.get_list("admin/pages").await
    }

    async fn page(&self, slug: &str) -> Result<Page, ApiError> {
        self.get(&format!("pages/{slug}")).await
    }

    async fn site_config(&self) -> Result<SiteConfig, ApiError> {
        self.get("config").await
    }

    async fn exit_password_status(&self) -> Result<ExitPasswordStatus, ApiError> {
        self.get("admin/kiosk/exit-password/status").await
    }

    async fn reorder(&self, list: ListKind, request: &ReorderRequest) -> Result<(), ApiError> {
        let path = list.reorder_path();
        match self.send_unit(Method::POST, path, Some(request)).await {
            Err(err) if is_missing_endpoint(&err) => Err(ApiError::MissingEndpoint {
                path: path.to_string(),
            }),
            other => other,
        }
    }

    async fn delete_item(&self, list: ListKind, id: ItemId) -> Result<(), ApiError> {
        self.send_unit::<()>(Method::DELETE, &list.item_path(id), None)
            .await
    }

    async fn create_button(&self, request: &ButtonWriteRequest) -> Result<Button, ApiError> {
        self.send_json(Method::POST, "admin/buttons", request).await
    }

    async fn update_button(
        &self,
        id: EntityId,
        request: &ButtonWriteRequest,
    ) -> Result<Button, ApiError> {
        self.send_json(Method::PUT, &format!("admin/buttons/{id}"), request)
            .await
    }

    async fn assign_group(
        &self,
        id: EntityId,
        request: &ButtonGroupAssignment,
    ) -> Result<Button, ApiError> {
        self.send_json(Method::PUT, &format!("admin/buttons/{id}"), request)
            .await
    }

    async fn create_group(
        &self,
        request: &ButtonGroupWriteRequest,
    ) -> Result<ButtonGroup, ApiError> {
        self.send_json(Method::POST, "admin/button-groups", request)
            .await
    }

    async fn update_group(
        &self,
        id: EntityId,
        request: &ButtonGroupWriteRequest,
    ) -> Result<ButtonGroup, ApiError> {
        self.send_json(Method::PUT, &format!("admin/button-groups/{id}"), request)
            .await
    }

    async fn create_page(&self, request: &PageCreateRequest) -> Result<Page, ApiError> {
        self.send_json(Method::POST, "admin/pages", request).await
    }

    async fn update_page(
        &self,
        slug: &str,
        request: &PageUpdateRequest,
    ) -> Result<Page, ApiError> {
        self.send_json(Method::PUT, &format!("admin/pages/{slug}"), request)
            .await
    }

    async fn delete_page(&self, slug: &str) -> Result<(), ApiError> {
        self.send_unit::<()>(Method::DELETE, &format!("admin/pages/{slug}"), None)
            .await
    }

    async fn create_block(&self, request: &BlockCreateRequest) -> Result<Block, ApiError> {
        self.send_json(Method::POST, "admin/blocks", request).await
    }

    async fn update_block(
        &self,
        id: EntityId,
        request: &BlockUpdateRequest,
    ) -> Result<Block, ApiError> {
        self.send_json(Method::PUT, &format!("admin/blocks/{id}"), request)
            .await
    }

    async fn delete_block(&self, id: EntityId) -> Result<(), ApiError> {
        self.send_unit::<()>(Method::DELETE, &format!("admin/blocks/{id}"), None)
            .await
    }

    async fn save_settings(&self, request: &SettingsUpdateRequest) -> Result<(), ApiError> {
        self.send_unit(Method::PUT, "admin/settings", Some(request))
            .await
    }

    async fn set_exit_password(
        &self,
        request: &ExitPasswordRequest,
    ) -> Result<ExitPasswordStatus, ApiError> {
        self.send_json(Method::POST, "admin/kiosk/exit-password", request)
            .await
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let response = Self::send(self.request(Method::POST, "upload")?.multipart(form)).await?;
        Self::handle("upload", response).await
    }
}
