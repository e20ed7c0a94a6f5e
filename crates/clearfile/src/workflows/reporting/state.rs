//! The authoritative transition table for report status. Every mutation of
//! `Report.status` funnels through `transition` so illegal edges fail with
//! `InvalidTransition` and leave the status untouched.

use super::domain::{Report, ReportStatus};
use super::error::ReportingError;
use super::repository::ReportAggregate;

pub(crate) fn ensure_transition(from: ReportStatus, to: ReportStatus) -> Result<(), ReportingError> {
    use ReportStatus::*;

    let legal = matches!(
        (from, to),
        (Draft, DeterminationComplete)
            | (Draft, Exempt)
            // Re-running determination after answers change recomputes fully.
            | (DeterminationComplete, DeterminationComplete)
            | (DeterminationComplete, Exempt)
            | (DeterminationComplete, Collecting)
            | (Collecting, ReadyToFile)
            // Late correction request re-opens collection.
            | (ReadyToFile, Collecting)
            | (ReadyToFile, Filed)
            // Exempt is terminal except for an explicit reopen.
            | (Exempt, Draft)
    );

    if legal {
        Ok(())
    } else {
        Err(ReportingError::InvalidTransition { from, to })
    }
}

pub(crate) fn transition(report: &mut Report, to: ReportStatus) -> Result<(), ReportingError> {
    ensure_transition(report.status, to)?;
    report.status = to;
    Ok(())
}

/// The collection gate: every required role is represented and every party on
/// the report has submitted cleanly. A single failing party blocks the whole
/// report. Evaluated synchronously inside the submission handler against one
/// aggregate snapshot.
pub(crate) fn collection_complete(aggregate: &ReportAggregate) -> bool {
    let required = aggregate.required_roles();
    if required.is_empty() || aggregate.parties.is_empty() {
        return false;
    }

    let roles_covered = required.iter().all(|role| aggregate.role_covered(*role));
    let all_submitted = aggregate
        .parties
        .iter()
        .all(|party| party.is_complete_submission());

    roles_covered && all_submitted
}
