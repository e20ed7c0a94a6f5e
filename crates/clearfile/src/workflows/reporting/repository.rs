use serde::{Deserialize, Serialize};

use super::domain::{
    DemoOutcome, FilingAttempt, FilingSubmission, PartyId, PartyLink, PartyRole, Report, ReportId,
    ReportParty,
};
use super::error::ReportingError;

/// Everything persisted for one report: the report row, its parties, the
/// capability links, the active filing submission, and prior attempts.
/// The store mutates an aggregate only as a whole, under one lock, so guard
/// evaluations always see a consistent snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportAggregate {
    pub report: Report,
    pub parties: Vec<ReportParty>,
    pub links: Vec<PartyLink>,
    pub filing: Option<FilingSubmission>,
    pub filing_history: Vec<FilingAttempt>,
    /// One-shot override armed by the demo hook, consumed when the next
    /// attempt is dispatched.
    pub demo_outcome: Option<DemoOutcome>,
}

impl ReportAggregate {
    pub fn new(report: Report) -> Self {
        Self {
            report,
            parties: Vec::new(),
            links: Vec::new(),
            filing: None,
            filing_history: Vec::new(),
            demo_outcome: None,
        }
    }

    pub fn party(&self, id: &PartyId) -> Option<&ReportParty> {
        self.parties.iter().find(|party| &party.party_id == id)
    }

    pub fn party_mut(&mut self, id: &PartyId) -> Option<&mut ReportParty> {
        self.parties.iter_mut().find(|party| &party.party_id == id)
    }

    pub fn required_roles(&self) -> &[PartyRole] {
        self.report
            .determination
            .as_ref()
            .map(|verdict| verdict.required_parties.as_slice())
            .unwrap_or(&[])
    }

    pub fn role_covered(&self, role: PartyRole) -> bool {
        self.parties.iter().any(|party| party.role == role)
    }

    /// Combined declared ownership across every beneficial-owner party.
    /// Individual shares are validated per party; only the sum is a
    /// report-level concern.
    pub fn beneficial_ownership_total(&self) -> f64 {
        self.parties
            .iter()
            .filter(|party| party.role == PartyRole::BeneficialOwner)
            .filter_map(|party| party.party_data.get("ownership_percentage"))
            .filter_map(serde_json::Value::as_f64)
            .sum()
    }
}

/// Storage abstraction for report aggregates. `update` is the transactional
/// read-modify-write required by the collection gate, the single-attempt
/// invariant, and the atomic demo-outcome take.
pub trait ReportStore: Send + Sync {
    fn insert(&self, aggregate: ReportAggregate) -> Result<(), StoreError>;

    fn fetch(&self, id: &ReportId) -> Result<Option<ReportAggregate>, StoreError>;

    /// Resolve a party-link token to its report without leaking whether the
    /// token exists versus has expired.
    fn find_report_by_token(&self, token: &str) -> Result<Option<ReportId>, StoreError>;

    /// Apply `op` to the aggregate under the store's lock for that report.
    /// When `op` fails the aggregate is left unchanged. Returns the updated
    /// aggregate for callers that need the post-transition view.
    fn update(
        &self,
        id: &ReportId,
        op: &mut dyn FnMut(&mut ReportAggregate) -> Result<(), ReportingError>,
    ) -> Result<ReportAggregate, ReportingError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("report not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
