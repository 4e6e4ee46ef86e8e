//! Wire types for the drive API surface.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Raw result of one remote call: the HTTP status plus whatever body came
/// back (JSON when parseable, null otherwise). Non-2xx statuses are data
/// here, not errors - the harness classifies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    /// Whether the call landed in the success class.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    /// Deserialize the body into a typed view, if it fits.
    #[must_use]
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.body.clone()).ok()
    }
}

/// Signed-in account metadata (`GET /me`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
    #[serde(default)]
    pub mail: Option<String>,
}

impl AccountInfo {
    /// Best-effort address for display, preferring the principal name.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.user_principal_name.as_deref().or(self.mail.as_deref())
    }
}

/// A file or folder item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Link flavor requested from `createLink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    View,
    Edit,
}

impl LinkType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

/// Audience of a sharing link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkScope {
    Anonymous,
    Organization,
}

impl LinkScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Organization => "organization",
        }
    }
}

/// Role granted by a direct invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteRole {
    Read,
    Write,
}

impl InviteRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Sharing link payload inside a permission record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingLink {
    pub web_url: String,
    #[serde(rename = "type", default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// One permission record on an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    pub id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub link: Option<SharingLink>,
}

/// Invite recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveRecipient {
    pub email: String,
}

/// Encoded sharing reference: lets a non-owner reach an item through a link
/// instead of the owner's item id (`GET /shares/{ref}/driveItem`).
///
/// The wire form is the service's share-id convention: `u!` followed by the
/// unpadded URL-safe base64 of the link URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRef(String);

impl ShareRef {
    /// Encode a sharing link URL into a share reference.
    ///
    /// # Errors
    /// Returns `ClientError::InvalidShareUrl` for an empty or whitespace URL.
    pub fn from_url(web_url: &str) -> Result<Self, ClientError> {
        let trimmed = web_url.trim();
        if trimmed.is_empty() {
            return Err(ClientError::InvalidShareUrl("empty link url".into()));
        }
        let encoded = URL_SAFE_NO_PAD.encode(trimmed.as_bytes());
        Ok(Self(format!("u!{encoded}")))
    }

    /// Wrap an already-encoded share id.
    #[must_use]
    pub fn from_encoded(share_id: impl Into<String>) -> Self {
        Self(share_id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ShareRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
