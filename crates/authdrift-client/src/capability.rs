//! Capability surface the scenario runner dispatches through.

use async_trait::async_trait;

use crate::client::DriveClient;
use crate::error::ClientError;
use crate::types::{ApiResponse, LinkScope, LinkType, ShareRef};

/// The operations a bound identity can attempt on a resource.
///
/// One concrete instance is bound per identity at setup; the runner only
/// ever selects an instance and dispatches - it never branches on identity
/// beyond that selection. Keeping this a trait also lets harness tests
/// substitute scripted fakes for the HTTP client.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Fetch item metadata by primary id.
    async fn fetch(&self, item_id: &str) -> Result<ApiResponse, ClientError>;

    /// Fetch item metadata through a sharing reference.
    async fn fetch_shared(&self, share: &ShareRef) -> Result<ApiResponse, ClientError>;

    /// Replace item content by primary id.
    async fn replace(&self, item_id: &str, content: &str) -> Result<ApiResponse, ClientError>;

    /// Replace item content through a sharing reference.
    async fn replace_shared(
        &self,
        share: &ShareRef,
        content: &str,
    ) -> Result<ApiResponse, ClientError>;

    /// Create a sharing link by primary id.
    async fn create_link(
        &self,
        item_id: &str,
        link_type: LinkType,
        scope: LinkScope,
    ) -> Result<ApiResponse, ClientError>;

    /// Create a sharing link through a sharing reference.
    async fn create_link_shared(
        &self,
        share: &ShareRef,
        link_type: LinkType,
        scope: LinkScope,
    ) -> Result<ApiResponse, ClientError>;
}

#[async_trait]
impl ResourceClient for DriveClient {
    async fn fetch(&self, item_id: &str) -> Result<ApiResponse, ClientError> {
        self.item_metadata(item_id).await
    }

    async fn fetch_shared(&self, share: &ShareRef) -> Result<ApiResponse, ClientError> {
        self.item_via_share(share).await
    }

    async fn replace(&self, item_id: &str, content: &str) -> Result<ApiResponse, ClientError> {
        self.replace_content(item_id, content).await
    }

    async fn replace_shared(
        &self,
        share: &ShareRef,
        content: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.replace_via_share(share, content).await
    }

    async fn create_link(
        &self,
        item_id: &str,
        link_type: LinkType,
        scope: LinkScope,
    ) -> Result<ApiResponse, ClientError> {
        DriveClient::create_link(self, item_id, link_type, scope).await
    }

    async fn create_link_shared(
        &self,
        share: &ShareRef,
        link_type: LinkType,
        scope: LinkScope,
    ) -> Result<ApiResponse, ClientError> {
        self.create_link_via_share(share, link_type, scope).await
    }
}
