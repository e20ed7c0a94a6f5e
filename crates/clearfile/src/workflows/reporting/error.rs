use super::audit::AuditError;
use super::determination::IncompleteAnswers;
use super::domain::{FieldError, FilingEnvironment, FilingStatus, ReportStatus};
use super::filing::AdapterError;
use super::outbox::OutboxError;
use super::repository::StoreError;

/// Error taxonomy for the reporting core. Every variant is scoped to a single
/// report or party operation; nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    #[error(transparent)]
    IncompleteAnswers(#[from] IncompleteAnswers),
    #[error("invalid report transition from {from} to {to}")]
    InvalidTransition {
        from: ReportStatus,
        to: ReportStatus,
    },
    /// Expired and unknown tokens are deliberately indistinguishable.
    #[error("party link is invalid or expired")]
    TokenInvalid,
    #[error("party data failed validation ({} issue(s))", errors.len())]
    ValidationFailed { errors: Vec<FieldError> },
    #[error("party submission incomplete: {completion}% of required fields, {required}% needed")]
    SubmissionIncomplete { completion: u8, required: u8 },
    #[error("party has already submitted")]
    PartyAlreadySubmitted,
    #[error("party not found on this report")]
    PartyNotFound,
    #[error("corrections may only be requested for a submitted party")]
    CorrectionsUnavailable,
    #[error("a filing attempt is already in flight for this report")]
    ConcurrentFilingInProgress,
    #[error("a prior filing attempt exists; retry to create a new attempt")]
    RetryRequired,
    #[error("filing retry unavailable while the active attempt is {status}")]
    RetryUnavailable { status: FilingStatus },
    #[error("no filing attempt exists for this report")]
    NoFilingAttempt,
    #[error("demo filing outcomes are not available in the {0} environment")]
    DemoOutcomeUnavailable(FilingEnvironment),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Outbox(#[from] OutboxError),
    #[error(transparent)]
    Audit(#[from] AuditError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}
