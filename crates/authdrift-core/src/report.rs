//! Aggregation of executed scenarios into a run report.

use serde::Serialize;

use crate::model::{Action, Identity, Outcome, TestResult, Visibility};

/// Failure count for one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureCount<K> {
    pub key: K,
    pub count: usize,
}

/// Aggregate view over a run's results.
///
/// Pure function of the result list. Failure tables are sorted by
/// descending count; ties keep first-seen (generation) order, so the
/// report is deterministic for a deterministic run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Scenarios whose actual outcome was `unknown` - response statuses the
    /// classification table refuses to collapse into allow or deny.
    pub unclassified: usize,
    /// Scenarios whose actual outcome was `error` - harness-side defects
    /// (transport failure, missing fixture), not authorization results.
    pub errored: usize,
    pub failures_by_identity: Vec<FailureCount<Identity>>,
    pub failures_by_action: Vec<FailureCount<Action>>,
    pub failures_by_visibility: Vec<FailureCount<Visibility>>,
    failures: Vec<TestResult>,
}

fn count_failures<K, F>(failures: &[&TestResult], key_of: F) -> Vec<FailureCount<K>>
where
    K: PartialEq + Copy,
    F: Fn(&TestResult) -> K,
{
    let mut counts: Vec<FailureCount<K>> = Vec::new();
    for result in failures {
        let key = key_of(result);
        match counts.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.count += 1,
            None => counts.push(FailureCount { key, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

impl RunReport {
    /// Aggregate a result list.
    #[must_use]
    pub fn from_results(results: &[TestResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = total - passed;
        let unclassified = results.iter().filter(|r| r.actual == Outcome::Unknown).count();
        let errored = results.iter().filter(|r| r.actual == Outcome::Error).count();

        let failures: Vec<&TestResult> = results.iter().filter(|r| !r.passed).collect();
        let failures_by_identity = count_failures(&failures, |r| r.scenario.identity);
        let failures_by_action = count_failures(&failures, |r| r.scenario.action);
        let failures_by_visibility = count_failures(&failures, |r| r.scenario.visibility);

        Self {
            total,
            passed,
            failed,
            unclassified,
            errored,
            failures_by_identity,
            failures_by_action,
            failures_by_visibility,
            failures: failures.into_iter().cloned().collect(),
        }
    }

    /// The first `n` failing scenarios, in generation order.
    #[must_use]
    pub fn top_failures(&self, n: usize) -> &[TestResult] {
        &self.failures[..self.failures.len().min(n)]
    }

    /// Console rendering of the aggregate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn render_summary(&self, top: usize) -> String {
        let mut out = String::new();
        let pct = |n: usize| {
            if self.total == 0 {
                0.0
            } else {
                n as f64 / self.total as f64 * 100.0
            }
        };
        out.push_str(&format!("total scenarios: {}\n", self.total));
        out.push_str(&format!("passed: {} ({:.1}%)\n", self.passed, pct(self.passed)));
        out.push_str(&format!("failed: {} ({:.1}%)\n", self.failed, pct(self.failed)));
        if self.unclassified > 0 {
            out.push_str(&format!(
                "unclassified responses: {} (statuses outside the classification table)\n",
                self.unclassified
            ));
        }
        if self.errored > 0 {
            out.push_str(&format!(
                "harness errors: {} (not authorization outcomes)\n",
                self.errored
            ));
        }

        if self.failed == 0 {
            out.push_str("no mismatches - observed behavior matches the policy\n");
            return out;
        }

        out.push_str("\nfailures by identity:\n");
        for entry in &self.failures_by_identity {
            out.push_str(&format!("  {}: {}\n", entry.key, entry.count));
        }
        out.push_str("failures by action:\n");
        for entry in &self.failures_by_action {
            out.push_str(&format!("  {}: {}\n", entry.key, entry.count));
        }
        out.push_str("failures by visibility:\n");
        for entry in &self.failures_by_visibility {
            out.push_str(&format!("  {}: {}\n", entry.key, entry.count));
        }

        out.push_str("\nexample mismatches:\n");
        for result in self.top_failures(top) {
            let s = &result.scenario;
            out.push_str(&format!(
                "  #{} {} {} {}: expected {}, actual {} (tested by {})\n",
                s.id, s.identity, s.action, s.visibility, s.expected, result.actual, result.tested_by,
            ));
        }
        out
    }
}
