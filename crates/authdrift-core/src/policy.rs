//! Declarative authorization policy, evaluated as an ordered decision table.
//!
//! Rules are `(name, decision, predicate)` triples checked top to bottom;
//! the first matching rule wins and a terminal catch-all denies anything
//! unmatched. Ownership is checked before any visibility rule, and each
//! visibility class carries its own deny fallback, so adding a class cannot
//! widen an existing one's grants.

use crate::model::{AccessContext, Action, Decision, Identity, Visibility};

/// One row of the decision table.
pub struct PolicyRule {
    /// Stable rule name, suitable for logs and reports.
    pub name: &'static str,
    /// Decision issued when the predicate matches.
    pub decision: Decision,
    predicate: fn(Identity, Visibility, Action, AccessContext) -> bool,
}

impl PolicyRule {
    /// Whether this rule matches the request.
    #[must_use]
    pub fn applies(
        &self,
        identity: Identity,
        visibility: Visibility,
        action: Action,
        context: AccessContext,
    ) -> bool {
        (self.predicate)(identity, visibility, action, context)
    }
}

impl std::fmt::Debug for PolicyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyRule")
            .field("name", &self.name)
            .field("decision", &self.decision)
            .finish_non_exhaustive()
    }
}

const fn is_read_write(action: Action) -> bool {
    matches!(action, Action::Read | Action::Write)
}

/// Default rule table. Order is binding.
static RULES: &[PolicyRule] = &[
    // Ownership subsumes every visibility rule.
    PolicyRule {
        name: "owner.full_access",
        decision: Decision::Allow,
        predicate: |_, _, _, ctx| ctx.is_owner,
    },
    // Private: explicit invitees may read and write, nobody else anything.
    // Delete/share stay owner-only even with a grant.
    PolicyRule {
        name: "private.invitee_read_write",
        decision: Decision::Allow,
        predicate: |_, v, a, ctx| v == Visibility::Private && ctx.has_permission && is_read_write(a),
    },
    PolicyRule {
        name: "private.deny",
        decision: Decision::Deny,
        predicate: |_, v, _, _| v == Visibility::Private,
    },
    // View link: read only, never write/delete/share, even with the link.
    PolicyRule {
        name: "view_link.read",
        decision: Decision::Allow,
        predicate: |_, v, a, ctx| {
            v == Visibility::PublicViewLink && ctx.has_permission && a == Action::Read
        },
    },
    PolicyRule {
        name: "view_link.deny",
        decision: Decision::Deny,
        predicate: |_, v, _, _| v == Visibility::PublicViewLink,
    },
    // Edit link: read and write, no delete/share.
    PolicyRule {
        name: "edit_link.read_write",
        decision: Decision::Allow,
        predicate: |_, v, a, ctx| {
            v == Visibility::PublicEditLink && ctx.has_permission && is_read_write(a)
        },
    },
    PolicyRule {
        name: "edit_link.deny",
        decision: Decision::Deny,
        predicate: |_, v, _, _| v == Visibility::PublicEditLink,
    },
    // Direct invite: the invited collaborator reads and writes.
    PolicyRule {
        name: "direct_invite.read_write",
        decision: Decision::Allow,
        predicate: |_, v, a, ctx| {
            v == Visibility::DirectInvite && ctx.has_permission && is_read_write(a)
        },
    },
    PolicyRule {
        name: "direct_invite.deny",
        decision: Decision::Deny,
        predicate: |_, v, _, _| v == Visibility::DirectInvite,
    },
    // Org-public: members of the owner's organization read and write.
    PolicyRule {
        name: "org_public.member_read_write",
        decision: Decision::Allow,
        predicate: |_, v, a, ctx| {
            v == Visibility::OrgPublic && ctx.same_organization && is_read_write(a)
        },
    },
    PolicyRule {
        name: "org_public.deny",
        decision: Decision::Deny,
        predicate: |_, v, _, _| v == Visibility::OrgPublic,
    },
    // Fully public: anyone reads, only the owner mutates.
    PolicyRule {
        name: "public.read",
        decision: Decision::Allow,
        predicate: |_, v, a, _| v == Visibility::Public && a == Action::Read,
    },
    PolicyRule {
        name: "public.deny",
        decision: Decision::Deny,
        predicate: |_, v, _, _| v == Visibility::Public,
    },
    // Anything unmatched is denied.
    PolicyRule {
        name: "default.deny",
        decision: Decision::Deny,
        predicate: |_, _, _, _| true,
    },
];

/// Pure decision function over the ordered rule table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEngine;

impl PolicyEngine {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluate a request. Total: every input yields exactly one decision.
    #[must_use]
    pub fn evaluate(
        &self,
        identity: Identity,
        visibility: Visibility,
        action: Action,
        context: AccessContext,
    ) -> Decision {
        self.explain(identity, visibility, action, context).0
    }

    /// Evaluate and report which rule decided, for logs and diagnostics.
    #[must_use]
    pub fn explain(
        &self,
        identity: Identity,
        visibility: Visibility,
        action: Action,
        context: AccessContext,
    ) -> (Decision, &'static str) {
        for rule in RULES {
            if rule.applies(identity, visibility, action, context) {
                return (rule.decision, rule.name);
            }
        }
        // The table ends in a catch-all; this arm is unreachable but keeps
        // the function total without panicking.
        (Decision::Deny, "default.deny")
    }

    /// The rule table, in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &'static [PolicyRule] {
        RULES
    }
}
