//! Reportability determination: a pure rules engine turning questionnaire
//! answers into a verdict with a reasoned explanation.

mod answers;
mod exemptions;
mod rules;

pub use answers::{
    BuyerType, DeterminationAnswers, FinancingType, LenderAmlStatus, PropertyType,
};
pub use exemptions::{EntityExemption, ExemptionSetKind, TransactionExemption, TrustExemption};

use serde::{Deserialize, Serialize};

use super::domain::PartyRole;

/// Raised when determination runs before every required answer is set. The
/// caller re-prompts; missing answers are never silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("determination answers incomplete: missing {}", missing.join(", "))]
pub struct IncompleteAnswers {
    pub missing: Vec<&'static str>,
}

/// Outcome of a determination run. Re-running determination replaces the
/// verdict wholesale; it is never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterminationVerdict {
    pub is_reportable: bool,
    /// Cites the first disqualifying condition found, not all of them.
    pub reason: String,
    pub exemption_code: Option<String>,
    pub required_parties: Vec<PartyRole>,
    /// Which buyer exemption checklist was consulted, when one was.
    pub evaluated_set: Option<ExemptionSetKind>,
    /// Policy choice: an unverified lender AML program does not exempt, but
    /// the caller must surface a warning.
    pub lender_aml_unknown: bool,
}

/// Evaluate a questionnaire answer set. Pure and deterministic: identical
/// input always yields an identical verdict.
pub fn determine(answers: &DeterminationAnswers) -> Result<DeterminationVerdict, IncompleteAnswers> {
    rules::evaluate(answers)
}
