//! Run configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use authdrift_core::{Identity, MatrixProfile};

/// Configuration for a differential run, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base URL of the drive API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer-token file per identity. Tokens are opaque; acquiring them
    /// is the operator's job.
    pub tokens: BTreeMap<Identity, PathBuf>,

    /// Address invited on the direct-invite fixture.
    pub collaborator_email: String,

    /// Prefix for fixture file names.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Which matrix profile to enumerate.
    #[serde(default)]
    pub profile: MatrixProfile,

    /// Delay between remote calls, in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Delay after provisioning before the first scenario, in milliseconds,
    /// so just-created sharing state can propagate.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// How many failing scenarios to show in the console summary.
    #[serde(default = "default_top_failures")]
    pub top_failures: usize,
}

fn default_base_url() -> String {
    "https://graph.microsoft.com".into()
}

fn default_file_prefix() -> String {
    "authdrift_probe".into()
}

fn default_pacing_ms() -> u64 {
    750
}

fn default_settle_ms() -> u64 {
    3000
}

fn default_top_failures() -> usize {
    10
}

impl RunConfig {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Read the bearer token for an identity from its configured file.
    pub fn load_token(&self, identity: Identity) -> anyhow::Result<String> {
        let path = self
            .tokens
            .get(&identity)
            .with_context(|| format!("no token file configured for identity {identity}"))?;
        let token = std::fs::read_to_string(path)
            .with_context(|| format!("reading token file {}", path.display()))?;
        let token = token.trim();
        anyhow::ensure!(!token.is_empty(), "token file {} is empty", path.display());
        Ok(token.to_owned())
    }
}
