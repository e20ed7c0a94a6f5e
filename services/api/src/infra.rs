use chrono::NaiveDate;
use clearfile::workflows::reporting::{
    AuditEntry, AuditError, AuditSink, NotificationEvent, NotificationOutbox, OutboxError,
    ReportAggregate, ReportId, ReportStore, ReportingError, StoreError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local report store. One mutex guards the whole map, which gives
/// `update` the per-report transactional semantics the workflow relies on.
#[derive(Default)]
pub(crate) struct InMemoryReportStore {
    aggregates: Mutex<HashMap<ReportId, ReportAggregate>>,
}

impl ReportStore for InMemoryReportStore {
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

/// Notification outbox that retains intents in memory. A delivery worker
/// would drain this table in a durable deployment.
#[derive(Default)]
pub(crate) struct InMemoryOutbox {
    events: Mutex<Vec<NotificationEvent>>,
}

impl InMemoryOutbox {
    pub(crate) fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("outbox mutex poisoned").clone()
    }
}

impl NotificationOutbox for InMemoryOutbox {
    fn enqueue(&self, event: NotificationEvent) -> Result<(), OutboxError> {
        info!(
            kind = event.kind.label(),
            recipient = %event.recipient,
            report_id = %event.report_id.0,
            "notification queued"
        );
        self.events
            .lock()
            .expect("outbox mutex poisoned")
            .push(event);
        Ok(())
    }
}

/// Audit sink that mirrors every entry to the tracing pipeline while keeping
/// the append-only trail in memory.
#[derive(Default)]
pub(crate) struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub(crate) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        info!(
            actor = entry.actor.label(),
            action = %entry.action,
            report_id = %entry.report_id.0,
            "audit entry recorded"
        );
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
