use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{PartyId, ReportId};

/// Category of a notification intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PartyInvite,
    PartySubmitted,
    InternalAlert,
    FilingReceipt,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::PartyInvite => "party_invite",
            NotificationKind::PartySubmitted => "party_submitted",
            NotificationKind::InternalAlert => "internal_alert",
            NotificationKind::FilingReceipt => "filing_receipt",
        }
    }
}

/// An outbox entry. Immutable once written; delivery happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub report_id: ReportId,
    pub party_id: Option<PartyId>,
    pub created_at: DateTime<Utc>,
}

/// Append-only sink for notification intents. The outbox guarantees that
/// read order equals insertion order and performs no delivery, retry, or
/// dedup of its own.
pub trait NotificationOutbox: Send + Sync {
    fn enqueue(&self, event: NotificationEvent) -> Result<(), OutboxError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OutboxError {
    #[error("notification outbox unavailable: {0}")]
    Unavailable(String),
}
