use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::workflows::reporting::audit::{AuditEntry, AuditError, AuditSink};
use crate::workflows::reporting::determination::{
    BuyerType, DeterminationAnswers, FinancingType, LenderAmlStatus, PropertyType,
};
use crate::workflows::reporting::domain::{
    DemoOutcome, PartyData, PartyEntityType, PartyLinkSpec, PartyRole, ReportId, ReportIntake,
};
use crate::workflows::reporting::error::ReportingError;
use crate::workflows::reporting::filing::{
    AdapterError, FilingAdapter, FilingOutcome, FilingSnapshot, MockFilingAdapter,
};
use crate::workflows::reporting::outbox::{NotificationEvent, NotificationOutbox, OutboxError};
use crate::workflows::reporting::repository::{ReportAggregate, StoreError};
// Re-exported so sibling test modules get the trait methods through the glob.
pub(super) use crate::workflows::reporting::repository::ReportStore;
use crate::workflows::reporting::router::reporting_router;
use crate::workflows::reporting::service::{ReportService, ReportingConfig};
use crate::workflows::reporting::IssuedLink;

#[derive(Default)]
pub(super) struct MemoryStore {
    pub(super) aggregates: Mutex<HashMap<ReportId, ReportAggregate>>,
}

impl ReportStore for MemoryStore {
    fn insert(&self, aggregate: ReportAggregate) -> Result<(), StoreError> {
        let mut guard = self.aggregates.lock().expect("store mutex poisoned");
        if guard.contains_key(&aggregate.report.report_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(aggregate.report.report_id.clone(), aggregate);
        Ok(())
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<ReportAggregate>, StoreError> {
        let guard = self.aggregates.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_report_by_token(&self, token: &str) -> Result<Option<ReportId>, StoreError> {
        let guard = self.aggregates.lock().expect("store mutex poisoned");
        Ok(guard
            .values()
            .find(|aggregate| aggregate.links.iter().any(|link| link.token == token))
            .map(|aggregate| aggregate.report.report_id.clone()))
    }

    fn update(
        &self,
        id: &ReportId,
        op: &mut dyn FnMut(&mut ReportAggregate) -> Result<(), ReportingError>,
    ) -> Result<ReportAggregate, ReportingError> {
        let mut guard = self.aggregates.lock().expect("store mutex poisoned");
        let current = guard.get(id).ok_or(StoreError::NotFound)?;
        let mut draft = current.clone();
        op(&mut draft)?;
        guard.insert(id.clone(), draft.clone());
        Ok(draft)
    }
}

#[derive(Default)]
pub(super) struct MemoryOutbox {
    events: Mutex<Vec<NotificationEvent>>,
}

impl MemoryOutbox {
    pub(super) fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("outbox mutex poisoned").clone()
    }
}

impl NotificationOutbox for MemoryOutbox {
    fn enqueue(&self, event: NotificationEvent) -> Result<(), OutboxError> {
        self.events
            .lock()
            .expect("outbox mutex poisoned")
            .push(event);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryAudit {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

/// Transport that fails before producing any regulator outcome.
pub(super) struct OfflineAdapter;

impl FilingAdapter for OfflineAdapter {
    fn submit(&self, _snapshot: &FilingSnapshot) -> Result<FilingOutcome, AdapterError> {
        Err(AdapterError::Transport("gateway offline".to_string()))
    }
}

pub(super) type TestService<F = MockFilingAdapter> =
    ReportService<MemoryStore, MemoryOutbox, MemoryAudit, F>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryStore>,
    Arc<MemoryOutbox>,
    Arc<MemoryAudit>,
) {
    build_service_with_adapter(MockFilingAdapter::accepting(), ReportingConfig::default())
}

pub(super) fn build_service_with_adapter<F: FilingAdapter + 'static>(
    adapter: F,
    config: ReportingConfig,
) -> (
    Arc<TestService<F>>,
    Arc<MemoryStore>,
    Arc<MemoryOutbox>,
    Arc<MemoryAudit>,
) {
    let store = Arc::new(MemoryStore::default());
    let outbox = Arc::new(MemoryOutbox::default());
    let audit = Arc::new(MemoryAudit::default());
    let service = Arc::new(ReportService::new(
        store.clone(),
        outbox.clone(),
        audit.clone(),
        Arc::new(adapter),
        config,
    ));
    (service, store, outbox, audit)
}

pub(super) fn rejecting_adapter() -> MockFilingAdapter {
    MockFilingAdapter::with_default(DemoOutcome::Reject {
        code: "E-DUP-042".to_string(),
        message: "duplicate submission on file".to_string(),
    })
}

pub(super) fn intake() -> ReportIntake {
    ReportIntake {
        property_address: "418 Linden Ave, Des Moines, IA".to_string(),
        preparer_email: "closer@titleco.example".to_string(),
        closing_date: Some(NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")),
    }
}

pub(super) fn reportable_entity_answers() -> DeterminationAnswers {
    DeterminationAnswers {
        property_type: Some(PropertyType::Residential),
        financing: Some(FinancingType::Cash),
        buyer_type: Some(BuyerType::Entity),
        closing_date: Some(NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")),
        ..DeterminationAnswers::default()
    }
}

pub(super) fn reportable_trust_answers() -> DeterminationAnswers {
    DeterminationAnswers {
        property_type: Some(PropertyType::Residential),
        financing: Some(FinancingType::Cash),
        buyer_type: Some(BuyerType::Trust),
        is_statutory_trust: Some(false),
        closing_date: Some(NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")),
        ..DeterminationAnswers::default()
    }
}

pub(super) fn individual_buyer_answers() -> DeterminationAnswers {
    DeterminationAnswers {
        property_type: Some(PropertyType::Residential),
        financing: Some(FinancingType::Financed),
        lender_aml_status: Some(LenderAmlStatus::NoProgram),
        buyer_type: Some(BuyerType::Individual),
        ..DeterminationAnswers::default()
    }
}

pub(super) fn individual_data() -> PartyData {
    let mut data = PartyData::new();
    data.insert("legal_name".to_string(), json!("Jordan Ellis"));
    data.insert("date_of_birth".to_string(), json!("1982-04-12"));
    data.insert(
        "residential_address".to_string(),
        json!("12 Court Ave, Des Moines, IA"),
    );
    data.insert("contact_email".to_string(), json!("jordan@example.com"));
    data
}

pub(super) fn entity_data() -> PartyData {
    let mut data = PartyData::new();
    data.insert("legal_name".to_string(), json!("Linden Holdings LLC"));
    data.insert("ein".to_string(), json!("12-3456789"));
    data.insert("formation_state".to_string(), json!("IA"));
    data.insert("authorized_signer".to_string(), json!("Casey Moran"));
    data
}

pub(super) fn entity_party_specs() -> Vec<PartyLinkSpec> {
    vec![
        PartyLinkSpec {
            role: PartyRole::Transferee,
            entity_type: PartyEntityType::Entity,
            display_name: "Linden Holdings LLC".to_string(),
            email: "ops@lindenholdings.example".to_string(),
        },
        PartyLinkSpec {
            role: PartyRole::Transferor,
            entity_type: PartyEntityType::Individual,
            display_name: "Jordan Ellis".to_string(),
            email: "jordan@example.com".to_string(),
        },
        PartyLinkSpec {
            role: PartyRole::BeneficialOwner,
            entity_type: PartyEntityType::Individual,
            display_name: "Casey Moran".to_string(),
            email: "casey@example.com".to_string(),
        },
    ]
}

/// Data matching each spec in `entity_party_specs`, keyed by issuance order.
pub(super) fn data_for_link(link: &IssuedLink) -> PartyData {
    match link.role {
        PartyRole::Transferee => entity_data(),
        _ => individual_data(),
    }
}

/// Create a report, run an entity determination, and issue all party links.
pub(super) fn collecting_report<F: FilingAdapter + 'static>(
    service: &TestService<F>,
) -> (ReportId, Vec<IssuedLink>) {
    let report = service.create_report(intake()).expect("report created");
    service
        .run_determination(&report.report_id, &reportable_entity_answers())
        .expect("determination runs");
    let links = service
        .issue_party_links(&report.report_id, entity_party_specs(), None)
        .expect("links issued");
    (report.report_id, links)
}

/// Drive a report all the way to `ready_to_file`.
pub(super) fn ready_report<F: FilingAdapter + 'static>(
    service: &TestService<F>,
) -> (ReportId, Vec<IssuedLink>) {
    let (report_id, links) = collecting_report(service);
    for link in &links {
        service
            .save_party(&link.token, data_for_link(link))
            .expect("party saved");
        service.submit_party(&link.token).expect("party submitted");
    }
    (report_id, links)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn test_router() -> (axum::Router, Arc<MemoryStore>) {
    let (service, store, _, _) = build_service();
    (reporting_router(service), store)
}
