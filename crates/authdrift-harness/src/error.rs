//! Harness error taxonomy.
//!
//! Only `Setup` may terminate a run, and only before any scenario has
//! executed. Everything that goes wrong per scenario (missing fixture,
//! transport failure, unclassifiable status) is folded into that
//! scenario's outcome instead of propagating.

use authdrift_core::Visibility;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// Fixture creation or sharing-state application failed. Fatal: a
    /// partial fixture set makes every scenario on the missing visibility
    /// meaningless.
    #[error("fixture setup failed for {visibility}: {reason}")]
    Setup {
        visibility: Visibility,
        reason: String,
    },

    /// Result export could not be written.
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),

    /// Result export could not be encoded.
    #[error("export encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HarnessError {
    pub(crate) fn setup(visibility: Visibility, reason: impl Into<String>) -> Self {
        Self::Setup {
            visibility,
            reason: reason.into(),
        }
    }
}
