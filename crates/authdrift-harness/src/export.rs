//! Structured export of a run's results.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use authdrift_core::{Identity, TestResult};

use crate::error::HarnessError;
use crate::provision::FixtureSet;

/// Headline numbers for a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub timestamp: DateTime<Utc>,
}

/// Full structured record of a run: summary, the fixtures it ran against,
/// and every reconciled result in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct RunExport {
    pub summary: RunSummary,
    pub fixtures: FixtureSet,
    pub results: Vec<TestResult>,
}

impl RunExport {
    /// Assemble an export from a finished run.
    #[must_use]
    pub fn new(fixtures: FixtureSet, results: Vec<TestResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            summary: RunSummary {
                total,
                passed,
                failed: total - passed,
                timestamp: Utc::now(),
            },
            fixtures,
            results,
        }
    }

    /// Narrow the export to one identity's pass, recomputing the summary.
    /// Fixtures are shared state and stay in full.
    #[must_use]
    pub fn for_identity(&self, identity: Identity) -> Self {
        let results: Vec<TestResult> = self
            .results
            .iter()
            .filter(|r| r.tested_by == identity)
            .cloned()
            .collect();
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            summary: RunSummary {
                total,
                passed,
                failed: total - passed,
                timestamp: self.summary.timestamp,
            },
            fixtures: self.fixtures.clone(),
            results,
        }
    }

    /// Pretty-printed JSON rendering.
    ///
    /// # Errors
    /// Returns an error if encoding fails.
    pub fn to_json_pretty(&self) -> Result<String, HarnessError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the export to disk, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error on encoding or filesystem failure.
    pub fn write_json(&self, path: &Path) -> Result<(), HarnessError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        info!(path = %path.display(), "results exported");
        Ok(())
    }
}
