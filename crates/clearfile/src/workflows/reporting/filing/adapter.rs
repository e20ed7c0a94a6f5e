use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::FilingSnapshot;
use crate::workflows::reporting::domain::{DemoOutcome, FilingStatus};

/// Terminal outcome of one transmission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilingOutcome {
    Accepted { receipt_id: String },
    Rejected { code: String, message: String },
    NeedsReview { message: String },
}

impl FilingOutcome {
    pub const fn status(&self) -> FilingStatus {
        match self {
            FilingOutcome::Accepted { .. } => FilingStatus::Accepted,
            FilingOutcome::Rejected { .. } => FilingStatus::Rejected,
            FilingOutcome::NeedsReview { .. } => FilingStatus::NeedsReview,
        }
    }
}

/// Pluggable transport to the regulator. Implementations must not influence
/// attempt counting or report transitions; the orchestrator owns those. The
/// production transport is expected to batch files and poll acknowledgments
/// behind this same call shape.
pub trait FilingAdapter: Send + Sync {
    fn submit(&self, snapshot: &FilingSnapshot) -> Result<FilingOutcome, AdapterError>;
}

/// Transport-layer failure before any regulator outcome was produced.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("filing transport unavailable: {0}")]
    Transport(String),
}

/// Mock transport used outside production. Honors the snapshot's one-shot
/// demo directive when armed and otherwise returns the configured default.
pub struct MockFilingAdapter {
    default_outcome: DemoOutcome,
}

impl MockFilingAdapter {
    pub fn accepting() -> Self {
        Self {
            default_outcome: DemoOutcome::Accept,
        }
    }

    pub fn with_default(default_outcome: DemoOutcome) -> Self {
        Self { default_outcome }
    }
}

impl FilingAdapter for MockFilingAdapter {
    fn submit(&self, snapshot: &FilingSnapshot) -> Result<FilingOutcome, AdapterError> {
        let directive = snapshot
            .demo_outcome
            .as_ref()
            .unwrap_or(&self.default_outcome);
        Ok(materialize(directive))
    }
}

fn materialize(directive: &DemoOutcome) -> FilingOutcome {
    match directive {
        DemoOutcome::Accept => FilingOutcome::Accepted {
            receipt_id: format!("rcpt_{}", Uuid::new_v4().simple()),
        },
        DemoOutcome::Reject { code, message } => FilingOutcome::Rejected {
            code: code.clone(),
            message: message.clone(),
        },
        DemoOutcome::NeedsReview { message } => FilingOutcome::NeedsReview {
            message: message.clone(),
        },
    }
}
