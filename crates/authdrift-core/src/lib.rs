//! authdrift core - policy decisions, scenario enumeration, result aggregation.
//!
//! This crate holds the pure half of the probe: the declarative authorization
//! policy (an ordered decision table), the scenario matrix derived from it,
//! and the aggregation of expected-vs-actual results. Nothing here performs
//! I/O; the harness crate drives remote calls and feeds results back in.

pub mod matrix;
pub mod model;
pub mod policy;
pub mod report;

pub use matrix::{derive_context, render_table, MatrixProfile, ScenarioMatrix, ACTIONS};
pub use model::{AccessContext, Action, Decision, Identity, Outcome, Scenario, TestResult, Visibility};
pub use policy::PolicyEngine;
pub use report::RunReport;
