use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::determination::DeterminationVerdict;

/// Identifier wrapper for compliance reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(pub String);

/// Identifier wrapper for transaction parties attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartyId(pub String);

/// Lifecycle status of a compliance report.
///
/// `exempt` and `filed` are terminal; `exempt` can only be left through an
/// explicit reopen back to `draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    DeterminationComplete,
    Collecting,
    ReadyToFile,
    Filed,
    Exempt,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::DeterminationComplete => "determination_complete",
            ReportStatus::Collecting => "collecting",
            ReportStatus::ReadyToFile => "ready_to_file",
            ReportStatus::Filed => "filed",
            ReportStatus::Exempt => "exempt",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Selects how the filing deadline is derived from the closing date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineRule {
    ThirtyDaysAfterClosing,
    EndOfFollowingMonth,
}

/// Derive the filing deadline for a closing date. The deadline is always
/// computed from the closing date; it is never hand-edited.
pub fn filing_deadline_for(closing_date: NaiveDate, rule: DeadlineRule) -> NaiveDate {
    match rule {
        DeadlineRule::ThirtyDaysAfterClosing => closing_date + Duration::days(30),
        DeadlineRule::EndOfFollowingMonth => {
            let mut year = closing_date.year();
            let mut month = closing_date.month() + 2;
            if month > 12 {
                month -= 12;
                year += 1;
            }
            let first_of_month_after_next = NaiveDate::from_ymd_opt(year, month, 1)
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(closing_date));
            first_of_month_after_next - Duration::days(1)
        }
    }
}

/// Intake payload captured when a report is opened for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportIntake {
    pub property_address: String,
    pub preparer_email: String,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
}

/// The unit of compliance work. Never deleted; retained for five years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_id: ReportId,
    pub status: ReportStatus,
    pub property_address: String,
    pub preparer_email: String,
    /// Last wizard step saved by the UI collaborator.
    pub wizard_step: u32,
    /// Opaque questionnaire snapshot owned by the wizard UI. The core never
    /// interprets its shape outside the determination input contract.
    pub wizard_data: Option<serde_json::Value>,
    pub determination: Option<DeterminationVerdict>,
    pub closing_date: Option<NaiveDate>,
    /// Always derived from `closing_date` via the configured deadline rule.
    pub filing_deadline: Option<NaiveDate>,
    /// Written only by the filing orchestrator.
    pub filing_status: Option<FilingStatus>,
    pub filed_at: Option<DateTime<Utc>>,
    pub receipt_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Role a participant plays in the reported transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Transferee,
    Transferor,
    BeneficialOwner,
    Trustee,
    Settlor,
    Beneficiary,
}

impl PartyRole {
    pub const fn label(self) -> &'static str {
        match self {
            PartyRole::Transferee => "transferee",
            PartyRole::Transferor => "transferor",
            PartyRole::BeneficialOwner => "beneficial_owner",
            PartyRole::Trustee => "trustee",
            PartyRole::Settlor => "settlor",
            PartyRole::Beneficiary => "beneficiary",
        }
    }
}

impl fmt::Display for PartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Legal form of a party; selects the required-field checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyEntityType {
    Individual,
    Entity,
    Trust,
}

impl PartyEntityType {
    pub const fn label(self) -> &'static str {
        match self {
            PartyEntityType::Individual => "individual",
            PartyEntityType::Entity => "entity",
            PartyEntityType::Trust => "trust",
        }
    }
}

/// Collection progress for a single party. A party may only regress to
/// `corrections_requested` from `submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyStatus {
    Pending,
    LinkSent,
    Opened,
    Submitted,
    CorrectionsRequested,
}

impl PartyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PartyStatus::Pending => "pending",
            PartyStatus::LinkSent => "link_sent",
            PartyStatus::Opened => "opened",
            PartyStatus::Submitted => "submitted",
            PartyStatus::CorrectionsRequested => "corrections_requested",
        }
    }
}

impl fmt::Display for PartyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-form structured payload submitted by a party. Its expected shape is
/// keyed by the party's entity type (see the completion checklists).
pub type PartyData = BTreeMap<String, serde_json::Value>;

/// A field-scoped validation failure surfaced to the submitting party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Request line for issuing a party link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyLinkSpec {
    pub role: PartyRole,
    pub entity_type: PartyEntityType,
    pub display_name: String,
    pub email: String,
}

/// One participant in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportParty {
    pub party_id: PartyId,
    pub role: PartyRole,
    pub entity_type: PartyEntityType,
    pub display_name: String,
    pub email: String,
    pub status: PartyStatus,
    pub party_data: PartyData,
    pub completion_percentage: u8,
    pub has_validation_errors: bool,
    pub validation_errors: Vec<FieldError>,
    pub correction_note: Option<String>,
    pub confirmation_id: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl ReportParty {
    pub fn is_complete_submission(&self) -> bool {
        self.status == PartyStatus::Submitted && !self.has_validation_errors
    }
}

/// Time-limited capability token scoped to exactly one party on one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyLink {
    pub token: String,
    pub party_id: PartyId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PartyLink {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Link material returned to the caller after issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedLink {
    pub party_id: PartyId,
    pub role: PartyRole,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Which regulator endpoint a filing submission targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingEnvironment {
    Staging,
    Production,
}

impl FilingEnvironment {
    pub const fn label(self) -> &'static str {
        match self {
            FilingEnvironment::Staging => "staging",
            FilingEnvironment::Production => "production",
        }
    }
}

impl fmt::Display for FilingEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a filing submission attempt series. `accepted` is terminal and
/// immutable; `rejected` and `needs_review` allow an explicit operator retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Queued,
    Submitted,
    Accepted,
    Rejected,
    NeedsReview,
}

impl FilingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            FilingStatus::Queued => "queued",
            FilingStatus::Submitted => "submitted",
            FilingStatus::Accepted => "accepted",
            FilingStatus::Rejected => "rejected",
            FilingStatus::NeedsReview => "needs_review",
        }
    }

    pub const fn is_in_flight(self) -> bool {
        matches!(self, FilingStatus::Queued | FilingStatus::Submitted)
    }

    pub const fn is_retryable(self) -> bool {
        matches!(self, FilingStatus::Rejected | FilingStatus::NeedsReview)
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One-shot outcome override honored by the mock transport, consumed
/// atomically when the next attempt is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DemoOutcome {
    Accept,
    Reject { code: String, message: String },
    NeedsReview { message: String },
}

/// The active transmission attempt series for a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingSubmission {
    pub status: FilingStatus,
    /// Strictly increasing across the report's whole filing history.
    pub attempts: u32,
    pub environment: FilingEnvironment,
    pub receipt_id: Option<String>,
    pub rejection_code: Option<String>,
    pub rejection_message: Option<String>,
    pub queued_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Immutable record of a completed attempt, retained when a retry supersedes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingAttempt {
    pub attempt: u32,
    pub status: FilingStatus,
    pub receipt_id: Option<String>,
    pub rejection_code: Option<String>,
    pub rejection_message: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}
