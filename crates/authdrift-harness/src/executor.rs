//! Scenario execution and response classification.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use authdrift_client::{ApiResponse, ClientError, LinkScope, LinkType, ResourceClient};
use authdrift_core::{Action, Identity, Outcome, Scenario, TestResult};

use crate::provision::{Fixture, FixtureSet};

/// Map a protocol status onto the policy vocabulary.
///
/// Anything outside the two known classes stays `Unknown`; it is never
/// collapsed into allow or deny.
#[must_use]
pub const fn classify_status(status: u16) -> Outcome {
    match status {
        200 | 201 => Outcome::Allow,
        400 | 401 | 403 | 404 => Outcome::Deny,
        _ => Outcome::Unknown,
    }
}

/// Runner settings.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Delay between consecutive remote calls.
    pub pacing: Duration,
    /// Body written by write probes.
    pub probe_content: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            pacing: Duration::from_millis(750),
            probe_content: "updated by authdrift probe".into(),
        }
    }
}

/// Executes scenarios sequentially against the live service.
pub struct ScenarioRunner {
    clients: BTreeMap<Identity, Arc<dyn ResourceClient>>,
    fixtures: FixtureSet,
    config: RunnerConfig,
}

impl ScenarioRunner {
    #[must_use]
    pub const fn new(
        clients: BTreeMap<Identity, Arc<dyn ResourceClient>>,
        fixtures: FixtureSet,
        config: RunnerConfig,
    ) -> Self {
        Self {
            clients,
            fixtures,
            config,
        }
    }

    /// Execute one scenario. Never fails: setup defects and transport
    /// errors become the `error` outcome on the result.
    pub async fn execute(&self, scenario: &Scenario) -> TestResult {
        let Some(client) = self.clients.get(&scenario.identity) else {
            warn!(scenario = scenario.id, identity = scenario.identity.as_str(), "no client bound for identity");
            return TestResult::record(scenario.clone(), Outcome::Error, scenario.identity);
        };
        let Some(fixture) = self.fixtures.get(&scenario.visibility) else {
            warn!(
                scenario = scenario.id,
                visibility = scenario.visibility.as_str(),
                "no fixture provisioned for visibility"
            );
            return TestResult::record(scenario.clone(), Outcome::Error, scenario.identity);
        };

        let actual = match self.dispatch(client.as_ref(), scenario, fixture).await {
            Ok(response) => {
                let outcome = classify_status(response.status);
                debug!(
                    scenario = scenario.id,
                    status = response.status,
                    outcome = outcome.as_str(),
                    "dispatched"
                );
                outcome
            }
            Err(err) => {
                warn!(scenario = scenario.id, error = %err, "dispatch failed");
                Outcome::Error
            }
        };

        TestResult::record(scenario.clone(), actual, scenario.identity)
    }

    /// Route the action to the remote operation.
    ///
    /// Non-owners go through the sharing reference when one exists - that
    /// is how a non-owner legitimately reaches a shared resource; the
    /// primary item id is a capability only the owner holds. `Delete` is
    /// dispatched as a metadata read on purpose (shared fixtures must
    /// survive the run), so delete-deny rules are only probed with read
    /// semantics.
    async fn dispatch(
        &self,
        client: &dyn ResourceClient,
        scenario: &Scenario,
        fixture: &Fixture,
    ) -> Result<ApiResponse, ClientError> {
        let shared = if scenario.identity == Identity::Owner {
            None
        } else {
            fixture.share_ref.as_ref()
        };

        match scenario.action {
            Action::Read | Action::Delete => match shared {
                Some(share) => client.fetch_shared(share).await,
                None => client.fetch(&fixture.item_id).await,
            },
            Action::Write => match shared {
                Some(share) => client.replace_shared(share, &self.config.probe_content).await,
                None => client.replace(&fixture.item_id, &self.config.probe_content).await,
            },
            Action::Share => match shared {
                Some(share) => {
                    client
                        .create_link_shared(share, LinkType::View, LinkScope::Anonymous)
                        .await
                }
                None => {
                    client
                        .create_link(&fixture.item_id, LinkType::View, LinkScope::Anonymous)
                        .await
                }
            },
        }
    }

    /// Execute the full scenario list, grouped into identity passes with
    /// the owner first, pacing between remote calls. Per-scenario failures
    /// never abort the run; each scenario is attempted exactly once.
    pub async fn run(&self, scenarios: &[Scenario]) -> Vec<TestResult> {
        let mut passes: Vec<Identity> = Vec::new();
        for scenario in scenarios {
            if !passes.contains(&scenario.identity) {
                passes.push(scenario.identity);
            }
        }
        // Owner-created sharing state must be committed before anyone else
        // reaches for it.
        passes.sort_by_key(|identity| *identity != Identity::Owner);

        let mut results = Vec::with_capacity(scenarios.len());
        for identity in passes {
            let pass: Vec<&Scenario> =
                scenarios.iter().filter(|s| s.identity == identity).collect();
            info!(identity = identity.as_str(), scenarios = pass.len(), "starting identity pass");
            for scenario in pass {
                results.push(self.execute(scenario).await);
                tokio::time::sleep(self.config.pacing).await;
            }
        }
        info!(total = results.len(), "run complete");
        results
    }
}
