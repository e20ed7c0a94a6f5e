//! Real-estate transaction reporting: reportability determination, party
//! data collection over capability links, and filing orchestration against
//! a pluggable regulator transport.

pub mod audit;
pub mod determination;
pub mod domain;
pub mod error;
pub mod filing;
pub mod outbox;
pub mod parties;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod state;

#[cfg(test)]
mod tests;

pub use audit::{AuditActor, AuditEntry, AuditError, AuditSink};
pub use determination::{
    determine, BuyerType, DeterminationAnswers, DeterminationVerdict, EntityExemption,
    ExemptionSetKind, FinancingType, IncompleteAnswers, LenderAmlStatus, PropertyType,
    TransactionExemption, TrustExemption,
};
pub use domain::{
    filing_deadline_for, DeadlineRule, DemoOutcome, FieldError, FilingAttempt, FilingEnvironment,
    FilingStatus, FilingSubmission, IssuedLink, PartyData, PartyEntityType, PartyId, PartyLink,
    PartyLinkSpec, PartyRole, PartyStatus, Report, ReportId, ReportIntake, ReportParty,
    ReportStatus,
};
pub use error::ReportingError;
pub use filing::{
    AdapterError, FilingAdapter, FilingOutcome, FilingSnapshot, MockFilingAdapter, PartySummary,
};
pub use outbox::{NotificationEvent, NotificationKind, NotificationOutbox, OutboxError};
pub use parties::{CompletionAssessment, RequiredField, MIN_SUBMISSION_COMPLETION};
pub use repository::{ReportAggregate, ReportStore, StoreError};
pub use router::reporting_router;
pub use service::{
    FilingReport, MissingCategory, MissingItem, PartyFieldView, PartySubmissionReceipt, PartyView,
    ReadyCheck, ReportOverview, ReportService, ReportingConfig,
};
