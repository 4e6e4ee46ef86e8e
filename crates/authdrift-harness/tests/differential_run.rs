//! Full differential run against a mocked drive service.
//!
//! The mock models a service whose enforcement matches the policy on
//! every probe the harness can actually make. The five expected
//! mismatches are the delete-as-read substitution: delete scenarios with
//! an expected deny are probed as reads, and the service legitimately
//! allows those reads wherever a read grant exists.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use authdrift_client::{DriveClient, ResourceClient, ShareRef};
use authdrift_core::{Action, Identity, MatrixProfile, Outcome, RunReport, ScenarioMatrix};
use authdrift_harness::{ProvisionConfig, Provisioner, RunExport, RunnerConfig, ScenarioRunner};

const OWNER: &str = "owner-token";
const COLLAB: &str = "collab-token";
const UNRELATED: &str = "unrelated-token";

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn item_json(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({"id": id, "name": name})
}

async fn mount_provisioning(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1.0/me"))
        .and(header("authorization", bearer(OWNER)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "u-owner",
            "userPrincipalName": "owner@example.com",
        })))
        .mount(server)
        .await;

    for (visibility, id) in [
        ("private", "item-private"),
        ("public_view_link", "item-view"),
        ("public_edit_link", "item-edit"),
        ("direct_invite", "item-invite"),
    ] {
        let name = format!("probe_{visibility}.txt");
        Mock::given(method("PUT"))
            .and(path(format!("/v1.0/me/drive/root:/{name}:/content")))
            .and(header("authorization", bearer(OWNER)))
            .respond_with(ResponseTemplate::new(201).set_body_json(item_json(id, &name)))
            .mount(server)
            .await;
    }

    for (id, flavor) in [("item-view", "view"), ("item-edit", "edit")] {
        Mock::given(method("POST"))
            .and(path(format!("/v1.0/me/drive/items/{id}/createLink")))
            .and(header("authorization", bearer(OWNER)))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": format!("perm-{flavor}"),
                "roles": [if flavor == "view" { "read" } else { "write" }],
                "link": {
                    "webUrl": format!("https://drive.example.com/s/{flavor}"),
                    "type": flavor,
                    "scope": "anonymous",
                },
            })))
            .mount(server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/v1.0/me/drive/items/item-invite/invite"))
        .and(header("authorization", bearer(OWNER)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"id": "perm-invite", "roles": ["write"]}]
        })))
        .mount(server)
        .await;
}

async fn mount_owner_access(server: &MockServer) {
    // The owner reads, writes, and shares every item through primary ids.
    Mock::given(method("GET"))
        .and(path_regex(r"^/v1\.0/me/drive/items/[^/]+$"))
        .and(header("authorization", bearer(OWNER)))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json("item", "probe.txt")))
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/v1\.0/me/drive/items/[^/]+/content$"))
        .and(header("authorization", bearer(OWNER)))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json("item", "probe.txt")))
        .mount(server)
        .await;
    // Share scenarios on the items whose provisioning mounted no link mock;
    // item-view and item-edit keep their specific createLink responses.
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1\.0/me/drive/items/item-(private|invite)/createLink$"))
        .and(header("authorization", bearer(OWNER)))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "perm-x",
            "link": {"webUrl": "https://drive.example.com/s/x", "type": "view"},
        })))
        .mount(server)
        .await;
}

async fn mount_collaborator_access(server: &MockServer) {
    // Direct invite grants the collaborator read/write on the invited item.
    Mock::given(method("GET"))
        .and(path("/v1.0/me/drive/items/item-invite"))
        .and(header("authorization", bearer(COLLAB)))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json("item-invite", "probe_direct_invite.txt")))
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1.0/me/drive/items/item-invite/content"))
        .and(header("authorization", bearer(COLLAB)))
        .respond_with(ResponseTemplate::new(200).set_body_json(item_json("item-invite", "probe_direct_invite.txt")))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1.0/me/drive/items/item-invite/createLink"))
        .and(header("authorization", bearer(COLLAB)))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": "accessDenied"}
        })))
        .mount(server)
        .await;

    // Everything else under another user's drive is invisible. The
    // collaborator matcher excludes item-invite so the grants above stay
    // unambiguous.
    Mock::given(path_regex(r"^/v1\.0/me/drive/items/item-(private|view|edit)(/.*)?$"))
        .and(header("authorization", bearer(COLLAB)))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": "itemNotFound"}
        })))
        .mount(server)
        .await;
    Mock::given(path_regex(r"^/v1\.0/me/drive/.*"))
        .and(header("authorization", bearer(UNRELATED)))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": "itemNotFound"}
        })))
        .mount(server)
        .await;
}

async fn mount_share_access(server: &MockServer) {
    let view = ShareRef::from_url("https://drive.example.com/s/view").unwrap();
    let edit = ShareRef::from_url("https://drive.example.com/s/edit").unwrap();
    let denied = ResponseTemplate::new(403).set_body_json(serde_json::json!({
        "error": {"code": "accessDenied"}
    }));

    for (share, writable) in [(view, false), (edit, true)] {
        Mock::given(method("GET"))
            .and(path(format!("/v1.0/shares/{share}/driveItem")))
            .respond_with(ResponseTemplate::new(200).set_body_json(item_json("shared", "probe.txt")))
            .mount(server)
            .await;
        let write_response = if writable {
            ResponseTemplate::new(200).set_body_json(item_json("shared", "probe.txt"))
        } else {
            denied.clone()
        };
        Mock::given(method("PUT"))
            .and(path(format!("/v1.0/shares/{share}/driveItem/content")))
            .respond_with(write_response)
            .mount(server)
            .await;
        // Re-sharing through a link is never allowed.
        Mock::given(method("POST"))
            .and(path(format!("/v1.0/shares/{share}/driveItem/createLink")))
            .respond_with(denied.clone())
            .mount(server)
            .await;
    }
}

fn clients_for(server: &MockServer) -> BTreeMap<Identity, Arc<dyn ResourceClient>> {
    let mut clients: BTreeMap<Identity, Arc<dyn ResourceClient>> = BTreeMap::new();
    for (identity, token) in [
        (Identity::Owner, OWNER),
        (Identity::InvitedCollaborator, COLLAB),
        (Identity::UnrelatedUser, UNRELATED),
    ] {
        let client = DriveClient::new(token)
            .unwrap()
            .with_base_url(server.uri());
        clients.insert(identity, Arc::new(client));
    }
    clients
}

#[tokio::test]
async fn full_personal_run_reconciles_against_the_policy() {
    let server = MockServer::start().await;
    mount_provisioning(&server).await;
    mount_owner_access(&server).await;
    mount_collaborator_access(&server).await;
    mount_share_access(&server).await;

    let owner = DriveClient::new(OWNER).unwrap().with_base_url(server.uri());
    let provisioner = Provisioner::new(
        owner,
        ProvisionConfig {
            file_prefix: "probe".into(),
            collaborator_email: "collab@example.com".into(),
        },
    );

    let profile = MatrixProfile::Personal;
    let fixtures = provisioner.provision(profile.visibilities()).await.unwrap();
    assert_eq!(fixtures.len(), 4);

    let scenarios = ScenarioMatrix::new(profile).generate();
    let runner = ScenarioRunner::new(
        clients_for(&server),
        fixtures.clone(),
        RunnerConfig {
            pacing: Duration::ZERO,
            ..RunnerConfig::default()
        },
    );
    let results = runner.run(&scenarios).await;
    assert_eq!(results.len(), 48);

    let report = RunReport::from_results(&results);
    assert_eq!(report.total, 48);
    assert_eq!(report.errored, 0);
    assert_eq!(report.unclassified, 0);

    // The only mismatches a policy-conformant service shows are the
    // delete-as-read substitutions: non-owner delete scenarios with an
    // expected deny succeed as reads wherever a read grant exists.
    assert_eq!(report.failed, 5);
    for failure in report.top_failures(5) {
        assert_eq!(failure.scenario.action, Action::Delete);
        assert_eq!(failure.actual, Outcome::Allow);
        assert_ne!(failure.tested_by, Identity::Owner);
    }
    assert_eq!(report.failures_by_action.len(), 1);
    assert_eq!(report.failures_by_action[0].key, Action::Delete);
    assert_eq!(report.failures_by_action[0].count, 5);

    // Owner pass is clean and runs first.
    assert!(results[..16].iter().all(|r| r.tested_by == Identity::Owner));
    assert!(results[..16].iter().all(|r| r.passed));

    // Export round-trips the run and splits cleanly per identity.
    let export = RunExport::new(fixtures, results);
    assert_eq!(export.summary.failed, 5);
    let collab_export = export.for_identity(Identity::InvitedCollaborator);
    assert_eq!(collab_export.summary.total, 16);
    assert_eq!(collab_export.summary.failed, 3);
    let unrelated_export = export.for_identity(Identity::UnrelatedUser);
    assert_eq!(unrelated_export.summary.failed, 2);
}

#[tokio::test]
async fn missing_fixture_yields_error_outcomes_not_denies() {
    let server = MockServer::start().await;
    mount_provisioning(&server).await;
    mount_owner_access(&server).await;
    mount_collaborator_access(&server).await;
    mount_share_access(&server).await;

    let owner = DriveClient::new(OWNER).unwrap().with_base_url(server.uri());
    let provisioner = Provisioner::new(
        owner,
        ProvisionConfig {
            file_prefix: "probe".into(),
            collaborator_email: "collab@example.com".into(),
        },
    );

    // Provision everything except the direct-invite fixture.
    let fixtures = provisioner
        .provision(&[
            authdrift_core::Visibility::Private,
            authdrift_core::Visibility::PublicViewLink,
            authdrift_core::Visibility::PublicEditLink,
        ])
        .await
        .unwrap();

    let scenarios = ScenarioMatrix::new(MatrixProfile::Personal).generate();
    let runner = ScenarioRunner::new(
        clients_for(&server),
        fixtures,
        RunnerConfig {
            pacing: Duration::ZERO,
            ..RunnerConfig::default()
        },
    );
    let results = runner.run(&scenarios).await;

    let invite_results: Vec<_> = results
        .iter()
        .filter(|r| r.scenario.visibility == authdrift_core::Visibility::DirectInvite)
        .collect();
    assert_eq!(invite_results.len(), 12);
    for result in invite_results {
        assert_eq!(result.actual, Outcome::Error);
        assert!(!result.passed);
    }

    let report = RunReport::from_results(&results);
    assert_eq!(report.errored, 12);
}
