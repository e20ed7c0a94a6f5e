//! Filing attempt lifecycle. The orchestration here is adapter-independent:
//! swapping transports changes nothing about attempt counting or report
//! transitions.

mod adapter;

pub use adapter::{AdapterError, FilingAdapter, FilingOutcome, MockFilingAdapter};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::determination::DeterminationVerdict;
use super::domain::{
    DemoOutcome, FieldError, FilingAttempt, FilingEnvironment, FilingStatus, FilingSubmission,
    PartyEntityType, PartyRole, ReportId, ReportStatus,
};
use super::error::ReportingError;
use super::repository::ReportAggregate;
use super::state;

/// Point-in-time view of a report handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingSnapshot {
    pub report_id: ReportId,
    pub attempt: u32,
    pub environment: FilingEnvironment,
    pub property_address: String,
    pub closing_date: Option<NaiveDate>,
    pub filing_deadline: Option<NaiveDate>,
    pub determination: DeterminationVerdict,
    pub parties: Vec<PartySummary>,
    /// One-shot demo directive, already consumed from the aggregate when the
    /// snapshot was built. Only the mock transport reads it.
    pub demo_outcome: Option<DemoOutcome>,
}

/// Party line within a filing snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySummary {
    pub role: PartyRole,
    pub entity_type: PartyEntityType,
    pub display_name: String,
}

/// Move the report's filing submission into `submitted` and build the
/// snapshot for the transport. Runs inside the store's transactional update
/// so the in-flight guard and the demo-outcome take are atomic.
pub(crate) fn begin_attempt(
    aggregate: &mut ReportAggregate,
    environment: FilingEnvironment,
    retry: bool,
    now: DateTime<Utc>,
) -> Result<FilingSnapshot, ReportingError> {
    let verdict = match &aggregate.report.determination {
        Some(verdict) if verdict.is_reportable => verdict.clone(),
        _ => {
            return Err(ReportingError::InvalidTransition {
                from: aggregate.report.status,
                to: ReportStatus::Filed,
            })
        }
    };

    if aggregate.report.status != ReportStatus::ReadyToFile {
        return Err(ReportingError::InvalidTransition {
            from: aggregate.report.status,
            to: ReportStatus::Filed,
        });
    }

    let ownership_total = aggregate.beneficial_ownership_total();
    if ownership_total > 100.0 {
        return Err(ReportingError::ValidationFailed {
            errors: vec![FieldError {
                field: "ownership_percentage".to_string(),
                message: format!(
                    "combined beneficial ownership is {ownership_total:.1}%, above 100%"
                ),
            }],
        });
    }

    if let Some(submission) = aggregate.filing.as_mut() {
        if submission.status.is_in_flight() {
            return Err(ReportingError::ConcurrentFilingInProgress);
        }
        if !retry {
            return Err(ReportingError::RetryRequired);
        }
        if !submission.status.is_retryable() {
            return Err(ReportingError::RetryUnavailable {
                status: submission.status,
            });
        }

        aggregate.filing_history.push(FilingAttempt {
            attempt: submission.attempts,
            status: submission.status,
            receipt_id: submission.receipt_id.take(),
            rejection_code: submission.rejection_code.take(),
            rejection_message: submission.rejection_message.take(),
            resolved_at: submission.resolved_at.take(),
        });
        submission.attempts += 1;
        submission.status = FilingStatus::Queued;
        submission.queued_at = now;
    } else {
        if retry {
            return Err(ReportingError::NoFilingAttempt);
        }
        aggregate.filing = Some(FilingSubmission {
            status: FilingStatus::Queued,
            attempts: 1,
            environment,
            receipt_id: None,
            rejection_code: None,
            rejection_message: None,
            queued_at: now,
            resolved_at: None,
        });
    }

    let demo_outcome = aggregate.demo_outcome.take();

    let Some(submission) = aggregate.filing.as_mut() else {
        return Err(ReportingError::NoFilingAttempt);
    };
    submission.status = FilingStatus::Submitted;
    aggregate.report.filing_status = Some(FilingStatus::Submitted);

    Ok(FilingSnapshot {
        report_id: aggregate.report.report_id.clone(),
        attempt: submission.attempts,
        environment: submission.environment,
        property_address: aggregate.report.property_address.clone(),
        closing_date: aggregate.report.closing_date,
        filing_deadline: aggregate.report.filing_deadline,
        determination: verdict,
        parties: aggregate
            .parties
            .iter()
            .map(|party| PartySummary {
                role: party.role,
                entity_type: party.entity_type,
                display_name: party.display_name.clone(),
            })
            .collect(),
        demo_outcome,
    })
}

/// Apply the transport outcome to the submission and, on acceptance, to the
/// report itself. `accepted` is terminal and immutable. The submission
/// outcome is recorded unconditionally: a dispatched attempt always resolves,
/// and a regulator receipt is never dropped because the report drifted out of
/// `ready_to_file` while the attempt was in transit.
pub(crate) fn record_outcome(
    aggregate: &mut ReportAggregate,
    outcome: &FilingOutcome,
    now: DateTime<Utc>,
) -> Result<(), ReportingError> {
    let Some(submission) = aggregate.filing.as_mut() else {
        return Err(ReportingError::NoFilingAttempt);
    };

    submission.resolved_at = Some(now);
    match outcome {
        FilingOutcome::Accepted { receipt_id } => {
            submission.status = FilingStatus::Accepted;
            submission.receipt_id = Some(receipt_id.clone());
            aggregate.report.filing_status = Some(FilingStatus::Accepted);
            aggregate.report.receipt_id = Some(receipt_id.clone());
            if state::transition(&mut aggregate.report, ReportStatus::Filed).is_ok() {
                aggregate.report.filed_at = Some(now);
            }
        }
        FilingOutcome::Rejected { code, message } => {
            submission.status = FilingStatus::Rejected;
            submission.rejection_code = Some(code.clone());
            submission.rejection_message = Some(message.clone());
            aggregate.report.filing_status = Some(FilingStatus::Rejected);
        }
        FilingOutcome::NeedsReview { message } => {
            submission.status = FilingStatus::NeedsReview;
            submission.rejection_message = Some(message.clone());
            aggregate.report.filing_status = Some(FilingStatus::NeedsReview);
        }
    }

    Ok(())
}
