//! `authdrift run` - provision fixtures and execute the differential run.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tracing::info;

use authdrift_client::{DriveClient, ResourceClient};
use authdrift_core::{Identity, RunReport, ScenarioMatrix};
use authdrift_harness::{ProvisionConfig, Provisioner, RunExport, RunnerConfig, ScenarioRunner};

use crate::config::RunConfig;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the run configuration (JSON).
    #[arg(long)]
    pub config: PathBuf,

    /// Directory for exported results.
    #[arg(long, default_value = "results")]
    pub out: PathBuf,

    /// Also write one export per identity pass.
    #[arg(long)]
    pub per_identity: bool,
}

pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = RunConfig::load(&args.config)?;
    let profile = config.profile;
    let scenarios = ScenarioMatrix::new(profile).generate();
    info!(profile = %profile, scenarios = scenarios.len(), "matrix generated");

    // One client per identity, bound for the whole run.
    let mut clients: BTreeMap<Identity, Arc<dyn ResourceClient>> = BTreeMap::new();
    for &identity in profile.identities() {
        let token = config.load_token(identity)?;
        let client = DriveClient::new(token)
            .context("building drive client")?
            .with_base_url(config.base_url.clone());
        clients.insert(identity, Arc::new(client));
    }

    // Fixtures are created by the owner exclusively.
    let owner_token = config.load_token(Identity::Owner)?;
    let owner = DriveClient::new(owner_token)
        .context("building owner client")?
        .with_base_url(config.base_url.clone());
    let provisioner = Provisioner::new(
        owner,
        ProvisionConfig {
            file_prefix: config.file_prefix.clone(),
            collaborator_email: config.collaborator_email.clone(),
        },
    );
    let fixtures = provisioner
        .provision(profile.visibilities())
        .await
        .context("environment provisioning failed, aborting before any scenario")?;

    // Let just-created sharing state propagate before probing it.
    info!(settle_ms = config.settle_ms, "waiting for sharing state to settle");
    tokio::time::sleep(Duration::from_millis(config.settle_ms)).await;

    let runner = ScenarioRunner::new(
        clients,
        fixtures.clone(),
        RunnerConfig {
            pacing: Duration::from_millis(config.pacing_ms),
            ..RunnerConfig::default()
        },
    );
    let results = runner.run(&scenarios).await;

    let report = RunReport::from_results(&results);
    print!("{}", report.render_summary(config.top_failures));

    let export = RunExport::new(fixtures, results);
    export.write_json(&args.out.join("run.json"))?;
    if args.per_identity {
        for &identity in profile.identities() {
            export
                .for_identity(identity)
                .write_json(&args.out.join(format!("run_{identity}.json")))?;
        }
    }

    Ok(())
}
