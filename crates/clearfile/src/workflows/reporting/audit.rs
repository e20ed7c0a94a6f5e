use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::ReportId;

/// Who performed a state-changing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActor {
    Preparer,
    Party,
    Operator,
    System,
}

impl AuditActor {
    pub const fn label(self) -> &'static str {
        match self {
            AuditActor::Preparer => "preparer",
            AuditActor::Party => "party",
            AuditActor::Operator => "operator",
            AuditActor::System => "system",
        }
    }
}

/// Append-only record of a state-changing action. Retained five years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor: AuditActor,
    pub action: String,
    pub report_id: ReportId,
    pub details: BTreeMap<String, String>,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(actor: AuditActor, action: &str, report_id: ReportId) -> Self {
        Self {
            actor,
            action: action.to_string(),
            report_id,
            details: BTreeMap::new(),
            recorded_at: Utc::now(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Write-only audit trail from the core's perspective.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}
