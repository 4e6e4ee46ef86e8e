//! `authdrift scenarios` - emit the scenario matrix.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use tracing::info;

use authdrift_core::{render_table, MatrixProfile, ScenarioMatrix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Personal,
    Organization,
}

impl From<ProfileArg> for MatrixProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Personal => Self::Personal,
            ProfileArg::Organization => Self::Organization,
        }
    }
}

#[derive(Debug, Args)]
pub struct ScenariosArgs {
    /// Matrix profile to enumerate.
    #[arg(long, value_enum, default_value_t = ProfileArg::Personal)]
    pub profile: ProfileArg,

    /// Write the CSV table here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &ScenariosArgs) -> anyhow::Result<()> {
    let profile = MatrixProfile::from(args.profile);
    let scenarios = ScenarioMatrix::new(profile).generate();
    let table = render_table(&scenarios);

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            std::fs::write(path, &table)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(
                path = %path.display(),
                scenarios = scenarios.len(),
                profile = %profile,
                "scenario table written"
            );
        }
        None => print!("{table}"),
    }
    Ok(())
}
