//! HTTP client for a Graph-style drive API.
//!
//! The probe treats the remote service as a black box: every operation
//! returns the raw status and body in an [`ApiResponse`] envelope, and only
//! transport failures surface as errors. Classification of statuses into
//! authorization outcomes happens upstream, in the harness.

pub mod capability;
pub mod client;
pub mod error;
pub mod types;

pub use capability::ResourceClient;
pub use client::DriveClient;
pub use error::ClientError;
pub use types::{
    AccountInfo, ApiResponse, DriveItem, DriveRecipient, InviteRole, LinkScope, LinkType,
    PermissionGrant, ShareRef, SharingLink,
};
