//! Scenario matrix: full (identity, visibility, action) enumeration with
//! derived context and precomputed expected decisions.

use serde::{Deserialize, Serialize};

use crate::model::{AccessContext, Action, Identity, Scenario, Visibility};
use crate::policy::PolicyEngine;

/// Fixed action enumeration order (innermost loop).
pub const ACTIONS: [Action; 4] = [Action::Read, Action::Write, Action::Delete, Action::Share];

/// Which slice of the model a run enumerates.
///
/// `Personal` matches a consumer drive (anonymous links, direct invites);
/// `Organization` adds org-membership identities and org/public visibility
/// classes. Both share the one rule table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixProfile {
    #[default]
    Personal,
    Organization,
}

impl MatrixProfile {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Organization => "organization",
        }
    }

    /// Identity enumeration order (outermost loop).
    #[must_use]
    pub const fn identities(self) -> &'static [Identity] {
        match self {
            Self::Personal => &[
                Identity::Owner,
                Identity::InvitedCollaborator,
                Identity::UnrelatedUser,
            ],
            Self::Organization => &[
                Identity::Owner,
                Identity::InvitedCollaborator,
                Identity::OrgMember,
                Identity::UnrelatedUser,
            ],
        }
    }

    /// Visibility enumeration order (middle loop).
    #[must_use]
    pub const fn visibilities(self) -> &'static [Visibility] {
        match self {
            Self::Personal => &[
                Visibility::Private,
                Visibility::PublicViewLink,
                Visibility::PublicEditLink,
                Visibility::DirectInvite,
            ],
            Self::Organization => &[
                Visibility::Private,
                Visibility::DirectInvite,
                Visibility::OrgPublic,
                Visibility::Public,
            ],
        }
    }
}

impl std::fmt::Display for MatrixProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the context facts for an (identity, visibility) pair.
///
/// Link permission is visibility-inherent: holding a view or edit link
/// grants it to any identity. Invite permission is identity-bound, and
/// org-public permission follows organization membership.
#[must_use]
pub fn derive_context(identity: Identity, visibility: Visibility) -> AccessContext {
    let is_owner = identity == Identity::Owner;
    let same_organization = matches!(identity, Identity::Owner | Identity::OrgMember);
    let has_permission = match visibility {
        Visibility::PublicViewLink | Visibility::PublicEditLink | Visibility::Public => true,
        Visibility::DirectInvite => identity == Identity::InvitedCollaborator,
        Visibility::OrgPublic => same_organization,
        Visibility::Private => false,
    };
    AccessContext {
        is_owner,
        has_permission,
        same_organization,
    }
}

/// Generator for the full scenario set of a profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioMatrix {
    profile: MatrixProfile,
    engine: PolicyEngine,
}

impl ScenarioMatrix {
    #[must_use]
    pub const fn new(profile: MatrixProfile) -> Self {
        Self {
            profile,
            engine: PolicyEngine::new(),
        }
    }

    #[must_use]
    pub const fn profile(&self) -> MatrixProfile {
        self.profile
    }

    /// Enumerate every scenario: identity-major, visibility-mid,
    /// action-minor, ids sequential from 1. Idempotent - repeated calls
    /// produce identical sequences.
    #[must_use]
    pub fn generate(&self) -> Vec<Scenario> {
        let identities = self.profile.identities();
        let visibilities = self.profile.visibilities();
        let mut scenarios =
            Vec::with_capacity(identities.len() * visibilities.len() * ACTIONS.len());

        let mut id = 0u32;
        for &identity in identities {
            for &visibility in visibilities {
                for action in ACTIONS {
                    id += 1;
                    let context = derive_context(identity, visibility);
                    let expected = self.engine.evaluate(identity, visibility, action, context);
                    scenarios.push(Scenario {
                        id,
                        identity,
                        visibility,
                        action,
                        context,
                        expected,
                    });
                }
            }
        }
        scenarios
    }
}

/// Render the scenario set as a CSV table, one row per scenario in
/// generation order.
#[must_use]
pub fn render_table(scenarios: &[Scenario]) -> String {
    let mut out = String::from(
        "scenario_id,identity,visibility,action,is_owner,has_permission,same_organization,expected\n",
    );
    for s in scenarios {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            s.id,
            s.identity,
            s.visibility,
            s.action,
            s.context.is_owner,
            s.context.has_permission,
            s.context.same_organization,
            s.expected,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Decision;

    #[test]
    fn personal_matrix_has_48_scenarios() {
        let scenarios = ScenarioMatrix::new(MatrixProfile::Personal).generate();
        assert_eq!(scenarios.len(), 48);
        assert_eq!(scenarios.first().map(|s| s.id), Some(1));
        assert_eq!(scenarios.last().map(|s| s.id), Some(48));
    }

    #[test]
    fn organization_matrix_has_64_scenarios() {
        let scenarios = ScenarioMatrix::new(MatrixProfile::Organization).generate();
        assert_eq!(scenarios.len(), 64);
    }

    #[test]
    fn generation_is_deterministic() {
        let matrix = ScenarioMatrix::new(MatrixProfile::Personal);
        assert_eq!(matrix.generate(), matrix.generate());
    }

    #[test]
    fn enumeration_order_is_identity_major_action_minor() {
        let scenarios = ScenarioMatrix::new(MatrixProfile::Personal).generate();
        // First block: owner over private, all four actions.
        assert_eq!(scenarios[0].identity, Identity::Owner);
        assert_eq!(scenarios[0].visibility, Visibility::Private);
        assert_eq!(scenarios[0].action, Action::Read);
        assert_eq!(scenarios[3].action, Action::Share);
        // Visibility advances after the action loop completes.
        assert_eq!(scenarios[4].visibility, Visibility::PublicViewLink);
        // Identity advances after 16 scenarios (4 visibilities x 4 actions).
        assert_eq!(scenarios[16].identity, Identity::InvitedCollaborator);
    }

    #[test]
    fn link_permission_is_visibility_inherent() {
        for identity in [Identity::InvitedCollaborator, Identity::UnrelatedUser] {
            assert!(derive_context(identity, Visibility::PublicViewLink).has_permission);
            assert!(derive_context(identity, Visibility::PublicEditLink).has_permission);
        }
    }

    #[test]
    fn invite_permission_is_identity_bound() {
        assert!(derive_context(Identity::InvitedCollaborator, Visibility::DirectInvite).has_permission);
        assert!(!derive_context(Identity::UnrelatedUser, Visibility::DirectInvite).has_permission);
        assert!(!derive_context(Identity::OrgMember, Visibility::DirectInvite).has_permission);
    }

    #[test]
    fn org_membership_follows_identity() {
        assert!(derive_context(Identity::OrgMember, Visibility::OrgPublic).same_organization);
        assert!(derive_context(Identity::OrgMember, Visibility::OrgPublic).has_permission);
        assert!(!derive_context(Identity::UnrelatedUser, Visibility::OrgPublic).has_permission);
    }

    #[test]
    fn expected_decisions_are_frozen_into_scenarios() {
        let scenarios = ScenarioMatrix::new(MatrixProfile::Personal).generate();
        let engine = PolicyEngine::new();
        for s in &scenarios {
            assert_eq!(
                s.expected,
                engine.evaluate(s.identity, s.visibility, s.action, s.context),
                "scenario {}",
                s.id
            );
        }
        // Owner scenarios are all allows.
        assert!(scenarios
            .iter()
            .filter(|s| s.identity == Identity::Owner)
            .all(|s| s.expected == Decision::Allow));
    }

    #[test]
    fn table_has_header_and_one_row_per_scenario() {
        let scenarios = ScenarioMatrix::new(MatrixProfile::Personal).generate();
        let table = render_table(&scenarios);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 49);
        assert!(lines[0].starts_with("scenario_id,identity"));
        assert_eq!(lines[1], "1,owner,private,read,true,false,true,allow");
    }
}
