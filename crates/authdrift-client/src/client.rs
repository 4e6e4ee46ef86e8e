//! Drive API client over reqwest.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use tracing::instrument;

use crate::error::ClientError;
use crate::types::{ApiResponse, DriveRecipient, InviteRole, LinkScope, LinkType, ShareRef};

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com";

/// API version segment.
const API_VERSION: &str = "v1.0";

/// Client for one identity's view of the drive API.
///
/// Holds exactly one opaque bearer credential; the probe binds one client
/// per identity for the whole run and never mixes them.
#[derive(Debug, Clone)]
pub struct DriveClient {
    http: Client,
    bearer: String,
    base_url: String,
}

impl DriveClient {
    /// Create a client for the given bearer token.
    ///
    /// # Errors
    /// Returns an error if the HTTP client fails to build.
    pub fn new(bearer: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            http,
            bearer: bearer.into(),
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Set a custom base URL (for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_VERSION}{path}", self.base_url)
    }

    /// Run a request and capture status + body without judging the status.
    async fn exchange(&self, request: RequestBuilder) -> Result<ApiResponse, ClientError> {
        let response = request.bearer_auth(&self.bearer).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::Null)
        };
        Ok(ApiResponse { status, body })
    }

    /// Fetch the signed-in account (`GET /me`).
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<ApiResponse, ClientError> {
        self.exchange(self.http.get(self.url("/me"))).await
    }

    /// Upload a new file at the drive root (`PUT /me/drive/root:/{name}:/content`).
    #[instrument(skip(self, content))]
    pub async fn create_file(
        &self,
        name: &str,
        content: &str,
    ) -> Result<ApiResponse, ClientError> {
        let path = format!("/me/drive/root:/{name}:/content");
        self.exchange(self.http.put(self.url(&path)).body(content.to_owned()))
            .await
    }

    /// Fetch item metadata (`GET /me/drive/items/{id}`).
    #[instrument(skip(self))]
    pub async fn item_metadata(&self, item_id: &str) -> Result<ApiResponse, ClientError> {
        let path = format!("/me/drive/items/{item_id}");
        self.exchange(self.http.get(self.url(&path))).await
    }

    /// Replace file content (`PUT /me/drive/items/{id}/content`).
    #[instrument(skip(self, content))]
    pub async fn replace_content(
        &self,
        item_id: &str,
        content: &str,
    ) -> Result<ApiResponse, ClientError> {
        let path = format!("/me/drive/items/{item_id}/content");
        self.exchange(self.http.put(self.url(&path)).body(content.to_owned()))
            .await
    }

    /// Delete an item (`DELETE /me/drive/items/{id}`).
    ///
    /// Present for API completeness; the scenario runner never dispatches
    /// it - delete scenarios are probed through a metadata read so shared
    /// fixtures survive the run.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, item_id: &str) -> Result<ApiResponse, ClientError> {
        let path = format!("/me/drive/items/{item_id}");
        self.exchange(self.http.delete(self.url(&path))).await
    }

    /// Create a sharing link (`POST /me/drive/items/{id}/createLink`).
    #[instrument(skip(self))]
    pub async fn create_link(
        &self,
        item_id: &str,
        link_type: LinkType,
        scope: LinkScope,
    ) -> Result<ApiResponse, ClientError> {
        let path = format!("/me/drive/items/{item_id}/createLink");
        let payload = serde_json::json!({
            "type": link_type.as_str(),
            "scope": scope.as_str(),
        });
        self.exchange(self.http.post(self.url(&path)).json(&payload))
            .await
    }

    /// Invite specific users to an item (`POST /me/drive/items/{id}/invite`).
    #[instrument(skip(self, emails))]
    pub async fn invite(
        &self,
        item_id: &str,
        emails: &[String],
        role: InviteRole,
    ) -> Result<ApiResponse, ClientError> {
        let path = format!("/me/drive/items/{item_id}/invite");
        let recipients: Vec<DriveRecipient> = emails
            .iter()
            .map(|email| DriveRecipient { email: email.clone() })
            .collect();
        let payload = serde_json::json!({
            "recipients": recipients,
            "requireSignIn": true,
            "sendInvitation": true,
            "roles": [role.as_str()],
        });
        self.exchange(self.http.post(self.url(&path)).json(&payload))
            .await
    }

    /// List permissions on an item (`GET /me/drive/items/{id}/permissions`).
    #[instrument(skip(self))]
    pub async fn permissions(&self, item_id: &str) -> Result<ApiResponse, ClientError> {
        let path = format!("/me/drive/items/{item_id}/permissions");
        self.exchange(self.http.get(self.url(&path))).await
    }

    /// Fetch item metadata through a sharing reference
    /// (`GET /shares/{ref}/driveItem`).
    #[instrument(skip(self))]
    pub async fn item_via_share(&self, share: &ShareRef) -> Result<ApiResponse, ClientError> {
        let path = format!("/shares/{share}/driveItem");
        self.exchange(self.http.get(self.url(&path))).await
    }

    /// Replace content through a sharing reference
    /// (`PUT /shares/{ref}/driveItem/content`).
    #[instrument(skip(self, content))]
    pub async fn replace_via_share(
        &self,
        share: &ShareRef,
        content: &str,
    ) -> Result<ApiResponse, ClientError> {
        let path = format!("/shares/{share}/driveItem/content");
        self.exchange(self.http.put(self.url(&path)).body(content.to_owned()))
            .await
    }

    /// Create a link through a sharing reference
    /// (`POST /shares/{ref}/driveItem/createLink`).
    #[instrument(skip(self))]
    pub async fn create_link_via_share(
        &self,
        share: &ShareRef,
        link_type: LinkType,
        scope: LinkScope,
    ) -> Result<ApiResponse, ClientError> {
        let path = format!("/shares/{share}/driveItem/createLink");
        let payload = serde_json::json!({
            "type": link_type.as_str(),
            "scope": scope.as_str(),
        });
        self.exchange(self.http.post(self.url(&path)).json(&payload))
            .await
    }
}
