//! Core data model: identities, visibilities, actions, outcomes, scenarios.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role under which a request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    /// Creates and owns every fixture.
    Owner,
    /// Receives a direct invite on the invite fixture.
    InvitedCollaborator,
    /// Same organization as the owner, no direct grant.
    OrgMember,
    /// No relationship to the owner at all.
    UnrelatedUser,
}

impl Identity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::InvitedCollaborator => "invited_collaborator",
            Self::OrgMember => "org_member",
            Self::UnrelatedUser => "unrelated_user",
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sharing configuration a fixture is provisioned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// No sharing applied.
    Private,
    /// Anonymous view-only link exists.
    PublicViewLink,
    /// Anonymous edit link exists.
    PublicEditLink,
    /// Collaborator invited directly with a write role.
    DirectInvite,
    /// Organization-scoped link, usable inside the owner's org.
    OrgPublic,
    /// Readable by anyone, owner-only mutation.
    Public,
}

impl Visibility {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicViewLink => "public_view_link",
            Self::PublicEditLink => "public_edit_link",
            Self::DirectInvite => "direct_invite",
            Self::OrgPublic => "org_public",
            Self::Public => "public",
        }
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation attempted on a fixture.
///
/// `Delete` is never dispatched destructively: the runner substitutes a
/// metadata read so shared fixtures survive the run. The substitution is a
/// known coverage gap for the delete-deny rules and is kept visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
    Delete,
    Share,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
            Self::Share => "share",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-valued policy decision. Expected outcomes can only ever be one of
/// these; the four-valued [`Outcome`] is reserved for what actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of what the remote service actually did.
///
/// `Unknown` marks a response status outside the classification table;
/// `Error` marks a transport failure or missing fixture. Neither is ever
/// folded into `Deny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Allow,
    Deny,
    Unknown,
    Error,
}

impl Outcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Unknown => "unknown",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Decision> for Outcome {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Allow => Self::Allow,
            Decision::Deny => Self::Deny,
        }
    }
}

/// Derived facts the policy engine decides on.
///
/// Always computed from (identity, visibility) by [`crate::derive_context`],
/// never supplied ad hoc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    /// Requesting identity owns the fixture.
    pub is_owner: bool,
    /// Identity holds an effective grant for this visibility (link or invite).
    pub has_permission: bool,
    /// Identity belongs to the owner's organization.
    pub same_organization: bool,
}

/// One concrete (identity, visibility, action) test case with its
/// precomputed expected decision. Immutable once generated; `id` is the
/// 1-based position in the fixed enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u32,
    pub identity: Identity,
    pub visibility: Visibility,
    pub action: Action,
    pub context: AccessContext,
    pub expected: Decision,
}

/// Reconciled record for one executed scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub scenario: Scenario,
    pub actual: Outcome,
    pub passed: bool,
    pub tested_by: Identity,
    pub timestamp: DateTime<Utc>,
}

impl TestResult {
    /// Record an outcome for a scenario, stamping the comparison.
    #[must_use]
    pub fn record(scenario: Scenario, actual: Outcome, tested_by: Identity) -> Self {
        let passed = Outcome::from(scenario.expected) == actual;
        Self {
            scenario,
            actual,
            passed,
            tested_by,
            timestamp: Utc::now(),
        }
    }
}
