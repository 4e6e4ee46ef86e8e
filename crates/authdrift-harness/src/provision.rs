//! Environment provisioning: one live fixture per enumerated visibility,
//! created and shared by the owner identity exclusively.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use authdrift_client::{
    AccountInfo, DriveClient, DriveItem, InviteRole, LinkScope, LinkType, PermissionGrant, ShareRef,
};
use authdrift_core::Visibility;

use crate::error::HarnessError;

/// A provisioned live resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub item_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    /// Link-derived handle for non-owner access, when this visibility
    /// produces one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_ref: Option<ShareRef>,
}

/// Fixtures keyed by visibility; shared read-only across identity passes.
pub type FixtureSet = BTreeMap<Visibility, Fixture>;

/// Provisioning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Prefix for fixture file names.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Address the direct-invite fixture is shared with.
    pub collaborator_email: String,
}

fn default_file_prefix() -> String {
    "authdrift_probe".into()
}

/// Creates fixtures as the owner. Fixtures must be owner-created for the
/// ownership rules to mean anything.
pub struct Provisioner {
    owner: DriveClient,
    config: ProvisionConfig,
}

impl Provisioner {
    #[must_use]
    pub const fn new(owner: DriveClient, config: ProvisionConfig) -> Self {
        Self { owner, config }
    }

    /// Create one fixture per visibility and apply its sharing state.
    ///
    /// # Errors
    /// Any creation or sharing failure is fatal and aborts the run before
    /// scenarios execute.
    pub async fn provision(
        &self,
        visibilities: &[Visibility],
    ) -> Result<FixtureSet, HarnessError> {
        match self.owner.me().await {
            Ok(response) if response.is_success() => {
                if let Some(account) = response.parse::<AccountInfo>() {
                    info!(owner = account.address().unwrap_or("unknown"), "provisioning as owner");
                }
            }
            Ok(response) => {
                warn!(status = response.status, "owner account probe not successful");
            }
            Err(err) => {
                warn!(error = %err, "owner account probe failed");
            }
        }

        let mut fixtures = FixtureSet::new();
        for &visibility in visibilities {
            let fixture = self.provision_one(visibility).await?;
            info!(
                visibility = visibility.as_str(),
                item_id = fixture.item_id.as_str(),
                shared = fixture.share_ref.is_some(),
                "fixture ready"
            );
            fixtures.insert(visibility, fixture);
        }
        Ok(fixtures)
    }

    async fn provision_one(&self, visibility: Visibility) -> Result<Fixture, HarnessError> {
        let name = format!("{}_{}.txt", self.config.file_prefix, visibility);
        let content = format!("{visibility} fixture for differential authorization probing");

        let created = self
            .owner
            .create_file(&name, &content)
            .await
            .map_err(|err| HarnessError::setup(visibility, err.to_string()))?;
        if !created.is_success() {
            return Err(HarnessError::setup(
                visibility,
                format!("create returned status {}", created.status),
            ));
        }
        let item: DriveItem = created.parse().ok_or_else(|| {
            HarnessError::setup(visibility, "create response missing item payload")
        })?;

        let mut fixture = Fixture {
            item_id: item.id,
            name: item.name,
            web_url: item.web_url,
            share_ref: None,
        };

        match visibility {
            Visibility::Private => {}
            Visibility::PublicViewLink | Visibility::Public => {
                self.apply_link(&mut fixture, visibility, LinkType::View, LinkScope::Anonymous)
                    .await?;
            }
            Visibility::PublicEditLink => {
                self.apply_link(&mut fixture, visibility, LinkType::Edit, LinkScope::Anonymous)
                    .await?;
            }
            Visibility::OrgPublic => {
                self.apply_link(&mut fixture, visibility, LinkType::Edit, LinkScope::Organization)
                    .await?;
            }
            Visibility::DirectInvite => {
                let invited = self
                    .owner
                    .invite(
                        &fixture.item_id,
                        &[self.config.collaborator_email.clone()],
                        InviteRole::Write,
                    )
                    .await
                    .map_err(|err| HarnessError::setup(visibility, err.to_string()))?;
                if !invited.is_success() {
                    return Err(HarnessError::setup(
                        visibility,
                        format!("invite returned status {}", invited.status),
                    ));
                }
            }
        }

        Ok(fixture)
    }

    async fn apply_link(
        &self,
        fixture: &mut Fixture,
        visibility: Visibility,
        link_type: LinkType,
        scope: LinkScope,
    ) -> Result<(), HarnessError> {
        let response = self
            .owner
            .create_link(&fixture.item_id, link_type, scope)
            .await
            .map_err(|err| HarnessError::setup(visibility, err.to_string()))?;
        if !response.is_success() {
            return Err(HarnessError::setup(
                visibility,
                format!("createLink returned status {}", response.status),
            ));
        }

        let grant: PermissionGrant = response.parse().ok_or_else(|| {
            HarnessError::setup(visibility, "createLink response missing permission payload")
        })?;
        let link = grant.link.ok_or_else(|| {
            HarnessError::setup(visibility, "createLink response missing link payload")
        })?;
        let share_ref = ShareRef::from_url(&link.web_url)
            .map_err(|err| HarnessError::setup(visibility, err.to_string()))?;
        fixture.share_ref = Some(share_ref);
        Ok(())
    }
}
