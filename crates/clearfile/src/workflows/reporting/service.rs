use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::audit::{AuditActor, AuditEntry, AuditSink};
use super::determination::{self, DeterminationAnswers, DeterminationVerdict};
use super::domain::{
    filing_deadline_for, DeadlineRule, FieldError, FilingEnvironment, FilingStatus, IssuedLink,
    PartyData, PartyEntityType, PartyId, PartyLinkSpec, PartyRole, PartyStatus, Report, ReportId,
    ReportIntake, ReportParty, ReportStatus,
};
#[cfg(feature = "demo-hooks")]
use super::domain::DemoOutcome;
use super::error::ReportingError;
use super::filing::{self, FilingAdapter, FilingOutcome, FilingSnapshot};
use super::outbox::{NotificationEvent, NotificationKind, NotificationOutbox};
use super::parties::completion::{self, MIN_SUBMISSION_COMPLETION};
use super::parties::links;
use super::repository::{ReportAggregate, ReportStore, StoreError};
use super::state;

/// Policy knobs the service needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct ReportingConfig {
    pub environment: FilingEnvironment,
    pub deadline_rule: DeadlineRule,
    pub link_ttl_days: i64,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            environment: FilingEnvironment::Staging,
            deadline_rule: DeadlineRule::ThirtyDaysAfterClosing,
            link_ttl_days: 14,
        }
    }
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PARTY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("rpt-{id:06}"))
}

fn next_party_id() -> PartyId {
    let id = PARTY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PartyId(format!("pty-{id:06}"))
}

fn next_confirmation_id() -> String {
    format!("cnf_{}", Uuid::new_v4().simple())
}

/// Service composing the determination engine, state machine, party tracker,
/// and filing orchestrator over pluggable storage, outbox, audit, and
/// transport collaborators.
pub struct ReportService<S, O, A, F> {
    store: Arc<S>,
    outbox: Arc<O>,
    audit: Arc<A>,
    adapter: Arc<F>,
    config: ReportingConfig,
}

impl<S, O, A, F> ReportService<S, O, A, F>
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    pub fn new(
        store: Arc<S>,
        outbox: Arc<O>,
        audit: Arc<A>,
        adapter: Arc<F>,
        config: ReportingConfig,
    ) -> Self {
        Self {
            store,
            outbox,
            audit,
            adapter,
            config,
        }
    }

    /// Open a new report for a transaction. Reports are never deleted.
    pub fn create_report(&self, intake: ReportIntake) -> Result<Report, ReportingError> {
        let report = Report {
            report_id: next_report_id(),
            status: ReportStatus::Draft,
            property_address: intake.property_address,
            preparer_email: intake.preparer_email,
            wizard_step: 0,
            wizard_data: None,
            determination: None,
            closing_date: intake.closing_date,
            filing_deadline: None,
            filing_status: None,
            filed_at: None,
            receipt_id: None,
            created_at: Utc::now(),
        };

        self.store.insert(ReportAggregate::new(report.clone()))?;
        self.audit.record(
            AuditEntry::new(AuditActor::Preparer, "report_created", report.report_id.clone())
                .with_detail("property_address", report.property_address.clone()),
        )?;

        Ok(report)
    }

    /// Persist the wizard's debounced autosave snapshot. The core treats the
    /// payload as opaque; callers flush pending autosaves before running
    /// determination.
    pub fn save_wizard(
        &self,
        report_id: &ReportId,
        step: u32,
        data: serde_json::Value,
    ) -> Result<(), ReportingError> {
        self.store.update(report_id, &mut |aggregate| {
            aggregate.report.wizard_step = step;
            aggregate.report.wizard_data = Some(data.clone());
            Ok(())
        })?;

        self.audit.record(
            AuditEntry::new(AuditActor::Preparer, "wizard_saved", report_id.clone())
                .with_detail("step", step.to_string()),
        )?;

        Ok(())
    }

    /// Run the determination engine and move the report to
    /// `determination_complete` or `exempt`. Re-running recomputes the
    /// verdict wholesale.
    pub fn run_determination(
        &self,
        report_id: &ReportId,
        answers: &DeterminationAnswers,
    ) -> Result<DeterminationVerdict, ReportingError> {
        let verdict = determination::determine(answers)?;
        let deadline_rule = self.config.deadline_rule;

        self.store.update(report_id, &mut |aggregate| {
            let target = if verdict.is_reportable {
                ReportStatus::DeterminationComplete
            } else {
                ReportStatus::Exempt
            };
            state::transition(&mut aggregate.report, target)?;

            aggregate.report.determination = Some(verdict.clone());
            if let Some(closing) = answers.closing_date {
                aggregate.report.closing_date = Some(closing);
            }
            aggregate.report.filing_deadline = if verdict.is_reportable {
                aggregate
                    .report
                    .closing_date
                    .map(|closing| filing_deadline_for(closing, deadline_rule))
            } else {
                None
            };
            Ok(())
        })?;

        self.audit.record(
            AuditEntry::new(AuditActor::Preparer, "determination_run", report_id.clone())
                .with_detail("is_reportable", verdict.is_reportable.to_string())
                .with_detail(
                    "exemption_code",
                    verdict.exemption_code.clone().unwrap_or_default(),
                ),
        )?;

        Ok(verdict)
    }

    /// Explicitly reopen an exempt report for re-determination.
    pub fn reopen_determination(&self, report_id: &ReportId) -> Result<(), ReportingError> {
        self.store.update(report_id, &mut |aggregate| {
            state::transition(&mut aggregate.report, ReportStatus::Draft)?;
            aggregate.report.determination = None;
            Ok(())
        })?;

        self.audit.record(AuditEntry::new(
            AuditActor::Preparer,
            "determination_reopened",
            report_id.clone(),
        ))?;

        Ok(())
    }

    /// Issue capability links for transaction parties. Once every required
    /// role is represented the report moves to `collecting`.
    pub fn issue_party_links(
        &self,
        report_id: &ReportId,
        specs: Vec<PartyLinkSpec>,
        expires_in_days: Option<i64>,
    ) -> Result<Vec<IssuedLink>, ReportingError> {
        let ttl_days = expires_in_days.unwrap_or(self.config.link_ttl_days);
        let now = Utc::now();
        let mut issued: Vec<IssuedLink> = Vec::new();
        let mut invites: Vec<(PartyId, String, String, String)> = Vec::new();

        self.store.update(report_id, &mut |aggregate| {
            if !matches!(
                aggregate.report.status,
                ReportStatus::DeterminationComplete | ReportStatus::Collecting
            ) {
                return Err(ReportingError::InvalidTransition {
                    from: aggregate.report.status,
                    to: ReportStatus::Collecting,
                });
            }

            issued.clear();
            invites.clear();

            for spec in &specs {
                let party_id = next_party_id();
                let assessment = completion::assess(spec.entity_type, &PartyData::new());
                aggregate.parties.push(ReportParty {
                    party_id: party_id.clone(),
                    role: spec.role,
                    entity_type: spec.entity_type,
                    display_name: spec.display_name.clone(),
                    email: spec.email.clone(),
                    status: PartyStatus::LinkSent,
                    party_data: PartyData::new(),
                    completion_percentage: assessment.completion_percentage,
                    has_validation_errors: assessment.has_validation_errors(),
                    validation_errors: assessment.validation_errors,
                    correction_note: None,
                    confirmation_id: None,
                    submitted_at: None,
                });

                let link = links::issue(party_id.clone(), now, ttl_days);
                issued.push(IssuedLink {
                    party_id: party_id.clone(),
                    role: spec.role,
                    token: link.token.clone(),
                    expires_at: link.expires_at,
                });
                invites.push((
                    party_id,
                    spec.email.clone(),
                    spec.display_name.clone(),
                    link.token.clone(),
                ));
                aggregate.links.push(link);
            }

            let all_roles_covered = aggregate
                .required_roles()
                .to_vec()
                .into_iter()
                .all(|role| aggregate.role_covered(role));
            if aggregate.report.status == ReportStatus::DeterminationComplete && all_roles_covered {
                state::transition(&mut aggregate.report, ReportStatus::Collecting)?;
            }

            Ok(())
        })?;

        for (party_id, email, display_name, token) in invites {
            self.outbox.enqueue(NotificationEvent {
                kind: NotificationKind::PartyInvite,
                recipient: email,
                subject: "Information needed for a real-estate filing".to_string(),
                body: format!(
                    "{display_name}, please complete your section using secure link token {token}."
                ),
                report_id: report_id.clone(),
                party_id: Some(party_id),
                created_at: Utc::now(),
            })?;
        }

        self.audit.record(
            AuditEntry::new(AuditActor::Preparer, "party_links_issued", report_id.clone())
                .with_detail("count", issued.len().to_string()),
        )?;

        Ok(issued)
    }

    /// Resolve a party link to the party's own scoped view. Marks the party
    /// `opened` on first use. Fails closed on unknown or expired tokens.
    pub fn party_by_token(&self, token: &str) -> Result<PartyView, ReportingError> {
        let report_id = self
            .store
            .find_report_by_token(token)?
            .ok_or(ReportingError::TokenInvalid)?;

        let now = Utc::now();
        let mut view: Option<PartyView> = None;
        let mut first_open = false;

        self.store.update(&report_id, &mut |aggregate| {
            let party_id = links::resolve(&aggregate.links, token, now)?.party_id.clone();
            let party = aggregate
                .party_mut(&party_id)
                .ok_or(ReportingError::TokenInvalid)?;

            if matches!(party.status, PartyStatus::Pending | PartyStatus::LinkSent) {
                party.status = PartyStatus::Opened;
                first_open = true;
            }
            view = Some(PartyView::of(party));
            Ok(())
        })?;

        if first_open {
            self.audit.record(AuditEntry::new(
                AuditActor::Party,
                "party_link_opened",
                report_id,
            ))?;
        }

        view.ok_or(ReportingError::TokenInvalid)
    }

    /// Replace a party's data and rescore completion and validation.
    pub fn save_party(&self, token: &str, data: PartyData) -> Result<PartyView, ReportingError> {
        let report_id = self
            .store
            .find_report_by_token(token)?
            .ok_or(ReportingError::TokenInvalid)?;

        let now = Utc::now();
        let mut view: Option<PartyView> = None;

        self.store.update(&report_id, &mut |aggregate| {
            let party_id = links::resolve(&aggregate.links, token, now)?.party_id.clone();
            let party = aggregate
                .party_mut(&party_id)
                .ok_or(ReportingError::TokenInvalid)?;

            if party.status == PartyStatus::Submitted {
                return Err(ReportingError::PartyAlreadySubmitted);
            }

            let assessment = completion::assess(party.entity_type, &data);
            party.party_data = data.clone();
            party.completion_percentage = assessment.completion_percentage;
            party.has_validation_errors = assessment.has_validation_errors();
            party.validation_errors = assessment.validation_errors;
            if matches!(party.status, PartyStatus::Pending | PartyStatus::LinkSent) {
                party.status = PartyStatus::Opened;
            }
            view = Some(PartyView::of(party));
            Ok(())
        })?;

        let view = view.ok_or(ReportingError::TokenInvalid)?;
        self.audit.record(
            AuditEntry::new(AuditActor::Party, "party_data_saved", report_id)
                .with_detail("completion", view.completion_percentage.to_string()),
        )?;

        Ok(view)
    }

    /// Submit a party's section. Both gates must pass independently: minimum
    /// completion and zero validation errors. The collection gate for the
    /// whole report is re-evaluated synchronously in the same transactional
    /// update, so sibling submissions never race it to a stale answer.
    pub fn submit_party(&self, token: &str) -> Result<PartySubmissionReceipt, ReportingError> {
        let report_id = self
            .store
            .find_report_by_token(token)?
            .ok_or(ReportingError::TokenInvalid)?;

        let now = Utc::now();
        let mut receipt: Option<PartySubmissionReceipt> = None;
        let mut submitted_party: Option<(PartyId, String)> = None;
        let mut became_ready = false;

        self.store.update(&report_id, &mut |aggregate| {
            let party_id = links::resolve(&aggregate.links, token, now)?.party_id.clone();
            let party = aggregate
                .party_mut(&party_id)
                .ok_or(ReportingError::TokenInvalid)?;

            if party.status == PartyStatus::Submitted {
                return Err(ReportingError::PartyAlreadySubmitted);
            }

            let assessment = completion::assess(party.entity_type, &party.party_data);
            if assessment.has_validation_errors() {
                return Err(ReportingError::ValidationFailed {
                    errors: assessment.validation_errors,
                });
            }
            if assessment.completion_percentage < MIN_SUBMISSION_COMPLETION {
                return Err(ReportingError::SubmissionIncomplete {
                    completion: assessment.completion_percentage,
                    required: MIN_SUBMISSION_COMPLETION,
                });
            }

            let confirmation_id = next_confirmation_id();
            party.status = PartyStatus::Submitted;
            party.completion_percentage = assessment.completion_percentage;
            party.has_validation_errors = false;
            party.validation_errors = Vec::new();
            party.correction_note = None;
            party.confirmation_id = Some(confirmation_id.clone());
            party.submitted_at = Some(now);
            submitted_party = Some((party_id, party.display_name.clone()));
            receipt = Some(PartySubmissionReceipt {
                confirmation_id,
                submitted_at: now,
            });

            if aggregate.report.status == ReportStatus::Collecting
                && state::collection_complete(aggregate)
            {
                state::transition(&mut aggregate.report, ReportStatus::ReadyToFile)?;
                became_ready = true;
            }

            Ok(())
        })?;

        let receipt = receipt.ok_or(ReportingError::TokenInvalid)?;
        if let Some((party_id, display_name)) = submitted_party {
            let updated = self.store.fetch(&report_id)?.ok_or(StoreError::NotFound)?;
            self.outbox.enqueue(NotificationEvent {
                kind: NotificationKind::PartySubmitted,
                recipient: updated.report.preparer_email.clone(),
                subject: format!("{display_name} submitted their section"),
                body: format!(
                    "Party {display_name} completed submission {}.",
                    receipt.confirmation_id
                ),
                report_id: report_id.clone(),
                party_id: Some(party_id),
                created_at: Utc::now(),
            })?;

            self.audit.record(
                AuditEntry::new(AuditActor::Party, "party_submitted", report_id.clone())
                    .with_detail("ready_to_file", became_ready.to_string()),
            )?;
        }

        Ok(receipt)
    }

    /// Request corrections from a party that already submitted. Re-opens
    /// collection when the report had reached `ready_to_file`.
    pub fn request_corrections(
        &self,
        report_id: &ReportId,
        party_id: &PartyId,
        note: Option<String>,
    ) -> Result<(), ReportingError> {
        let mut invite: Option<(String, String)> = None;

        self.store.update(report_id, &mut |aggregate| {
            // A dispatched attempt must resolve against the party data it
            // snapshotted; corrections wait until the outcome lands.
            if aggregate
                .filing
                .as_ref()
                .is_some_and(|submission| submission.status.is_in_flight())
            {
                return Err(ReportingError::ConcurrentFilingInProgress);
            }

            let reopen = aggregate.report.status == ReportStatus::ReadyToFile;

            let party = aggregate
                .party_mut(party_id)
                .ok_or(ReportingError::PartyNotFound)?;
            if party.status != PartyStatus::Submitted {
                return Err(ReportingError::CorrectionsUnavailable);
            }

            party.status = PartyStatus::CorrectionsRequested;
            party.correction_note = note.clone();
            party.confirmation_id = None;
            party.submitted_at = None;
            invite = Some((party.email.clone(), party.display_name.clone()));

            if reopen {
                state::transition(&mut aggregate.report, ReportStatus::Collecting)?;
            }
            Ok(())
        })?;

        if let Some((email, display_name)) = invite {
            self.outbox.enqueue(NotificationEvent {
                kind: NotificationKind::PartyInvite,
                recipient: email,
                subject: "Corrections requested on your filing section".to_string(),
                body: format!(
                    "{display_name}, corrections were requested: {}",
                    note.unwrap_or_else(|| "please review your submission".to_string())
                ),
                report_id: report_id.clone(),
                party_id: Some(party_id.clone()),
                created_at: Utc::now(),
            })?;
        }

        self.audit.record(
            AuditEntry::new(AuditActor::Preparer, "corrections_requested", report_id.clone())
                .with_detail("party_id", party_id.0.clone()),
        )?;

        Ok(())
    }

    /// Side-effect-free readiness report for the filing gate.
    pub fn ready_check(&self, report_id: &ReportId) -> Result<ReadyCheck, ReportingError> {
        let aggregate = self.store.fetch(report_id)?.ok_or(StoreError::NotFound)?;
        let mut missing = Vec::new();

        match &aggregate.report.determination {
            None => missing.push(MissingItem {
                category: MissingCategory::Determination,
                field: "determination".to_string(),
                party_id: None,
                message: "determination has not been run".to_string(),
            }),
            Some(verdict) if !verdict.is_reportable => missing.push(MissingItem {
                category: MissingCategory::Determination,
                field: "determination".to_string(),
                party_id: None,
                message: "report is exempt; there is nothing to file".to_string(),
            }),
            Some(_) => {
                for role in aggregate.required_roles() {
                    if !aggregate.role_covered(*role) {
                        missing.push(MissingItem {
                            category: MissingCategory::Parties,
                            field: role.label().to_string(),
                            party_id: None,
                            message: format!("no party link issued for the {role} role"),
                        });
                    }
                }
            }
        }

        for party in &aggregate.parties {
            if party.status != PartyStatus::Submitted {
                missing.push(MissingItem {
                    category: MissingCategory::Parties,
                    field: "status".to_string(),
                    party_id: Some(party.party_id.clone()),
                    message: format!(
                        "{} has not submitted (currently {})",
                        party.display_name, party.status
                    ),
                });
            }
            for error in &party.validation_errors {
                missing.push(MissingItem {
                    category: MissingCategory::Parties,
                    field: error.field.clone(),
                    party_id: Some(party.party_id.clone()),
                    message: error.message.clone(),
                });
            }
        }

        let ownership_total = aggregate.beneficial_ownership_total();
        if ownership_total > 100.0 {
            missing.push(MissingItem {
                category: MissingCategory::Parties,
                field: "ownership_percentage".to_string(),
                party_id: None,
                message: format!(
                    "combined beneficial ownership is {ownership_total:.1}%, above 100%"
                ),
            });
        }

        if aggregate.report.status == ReportStatus::Filed {
            missing.push(MissingItem {
                category: MissingCategory::Filing,
                field: "status".to_string(),
                party_id: None,
                message: "report has already been filed".to_string(),
            });
        }

        Ok(ReadyCheck {
            ready: missing.is_empty() && aggregate.report.status == ReportStatus::ReadyToFile,
            missing,
        })
    }

    /// Transmit the report to the regulator through the configured adapter.
    pub fn file_report(&self, report_id: &ReportId) -> Result<FilingReport, ReportingError> {
        self.dispatch(report_id, false)
    }

    /// Explicit operator retry after a rejection or review outcome.
    pub fn retry_filing(&self, report_id: &ReportId) -> Result<FilingReport, ReportingError> {
        self.dispatch(report_id, true)
    }

    fn dispatch(&self, report_id: &ReportId, retry: bool) -> Result<FilingReport, ReportingError> {
        let environment = self.config.environment;
        let now = Utc::now();
        let mut snapshot_slot: Option<FilingSnapshot> = None;

        self.store.update(report_id, &mut |aggregate| {
            snapshot_slot = Some(filing::begin_attempt(aggregate, environment, retry, now)?);
            Ok(())
        })?;
        let snapshot = snapshot_slot.ok_or(ReportingError::NoFilingAttempt)?;

        // A dispatched attempt always runs to a terminal outcome; a transport
        // failure lands in needs_review for the operator instead of wedging
        // the attempt in flight.
        let outcome = match self.adapter.submit(&snapshot) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(report_id = %report_id.0, attempt = snapshot.attempt, error = %err, "filing transport failed");
                FilingOutcome::NeedsReview {
                    message: format!("transport failure: {err}"),
                }
            }
        };

        let resolved_at = Utc::now();
        let updated = self.store.update(report_id, &mut |aggregate| {
            filing::record_outcome(aggregate, &outcome, resolved_at)
        })?;

        match &outcome {
            FilingOutcome::Accepted { receipt_id } => {
                self.outbox.enqueue(NotificationEvent {
                    kind: NotificationKind::FilingReceipt,
                    recipient: updated.report.preparer_email.clone(),
                    subject: "Filing accepted by the regulator".to_string(),
                    body: format!("Receipt {receipt_id} issued for {}.", report_id.0),
                    report_id: report_id.clone(),
                    party_id: None,
                    created_at: Utc::now(),
                })?;
            }
            FilingOutcome::Rejected { code, message } => {
                self.outbox.enqueue(NotificationEvent {
                    kind: NotificationKind::InternalAlert,
                    recipient: updated.report.preparer_email.clone(),
                    subject: format!("Filing rejected ({code})"),
                    body: message.clone(),
                    report_id: report_id.clone(),
                    party_id: None,
                    created_at: Utc::now(),
                })?;
            }
            FilingOutcome::NeedsReview { message } => {
                self.outbox.enqueue(NotificationEvent {
                    kind: NotificationKind::InternalAlert,
                    recipient: updated.report.preparer_email.clone(),
                    subject: "Filing needs manual review".to_string(),
                    body: message.clone(),
                    report_id: report_id.clone(),
                    party_id: None,
                    created_at: Utc::now(),
                })?;
            }
        }

        let action = if retry { "filing_retried" } else { "filing_submitted" };
        self.audit.record(
            AuditEntry::new(AuditActor::Operator, action, report_id.clone())
                .with_detail("attempt", snapshot.attempt.to_string())
                .with_detail("outcome", outcome.status().label()),
        )?;

        Ok(FilingReport::of(&updated))
    }

    /// Arm a one-shot outcome for the next mock-transport attempt. Only
    /// compiled into demo/staging builds; additionally refused at runtime
    /// outside a staging filing environment.
    #[cfg(feature = "demo-hooks")]
    pub fn set_filing_outcome(
        &self,
        report_id: &ReportId,
        outcome: DemoOutcome,
    ) -> Result<(), ReportingError> {
        if self.config.environment == FilingEnvironment::Production {
            return Err(ReportingError::DemoOutcomeUnavailable(
                FilingEnvironment::Production,
            ));
        }

        self.store.update(report_id, &mut |aggregate| {
            aggregate.demo_outcome = Some(outcome.clone());
            Ok(())
        })?;

        self.audit.record(AuditEntry::new(
            AuditActor::Operator,
            "demo_outcome_armed",
            report_id.clone(),
        ))?;

        Ok(())
    }

    /// Sanitized status view for the preparer-facing UI.
    pub fn report_overview(&self, report_id: &ReportId) -> Result<ReportOverview, ReportingError> {
        let aggregate = self.store.fetch(report_id)?.ok_or(StoreError::NotFound)?;
        Ok(ReportOverview::of(&aggregate))
    }
}

/// The view a party sees of its own record, and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyView {
    pub party_id: PartyId,
    pub role: PartyRole,
    pub entity_type: PartyEntityType,
    pub display_name: String,
    pub status: &'static str,
    pub completion_percentage: u8,
    pub validation_errors: Vec<FieldError>,
    pub fields: Vec<PartyFieldView>,
    pub party_data: PartyData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction_note: Option<String>,
}

impl PartyView {
    fn of(party: &ReportParty) -> Self {
        let fields = completion::required_fields(party.entity_type)
            .iter()
            .map(|field| PartyFieldView {
                key: field.key,
                label: field.label,
                filled: party
                    .party_data
                    .get(field.key)
                    .map(|value| !value.is_null())
                    .unwrap_or(false),
            })
            .collect();

        Self {
            party_id: party.party_id.clone(),
            role: party.role,
            entity_type: party.entity_type,
            display_name: party.display_name.clone(),
            status: party.status.label(),
            completion_percentage: party.completion_percentage,
            validation_errors: party.validation_errors.clone(),
            fields,
            party_data: party.party_data.clone(),
            correction_note: party.correction_note.clone(),
        }
    }
}

/// Checklist line in a party view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyFieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub filled: bool,
}

/// Returned by `submit_party`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartySubmissionReceipt {
    pub confirmation_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// Grouping for ready-check findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCategory {
    Determination,
    Parties,
    Filing,
}

/// One actionable gap blocking the filing gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingItem {
    pub category: MissingCategory,
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_id: Option<PartyId>,
    pub message: String,
}

/// Result of the side-effect-free readiness probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadyCheck {
    pub ready: bool,
    pub missing: Vec<MissingItem>,
}

/// Outcome summary returned by filing operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilingReport {
    pub status: &'static str,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_message: Option<String>,
}

impl FilingReport {
    fn of(aggregate: &ReportAggregate) -> Self {
        match &aggregate.filing {
            Some(submission) => Self {
                status: submission.status.label(),
                attempts: submission.attempts,
                receipt_id: submission.receipt_id.clone(),
                rejection_code: submission.rejection_code.clone(),
                rejection_message: submission.rejection_message.clone(),
            },
            None => Self {
                status: FilingStatus::Queued.label(),
                attempts: 0,
                receipt_id: None,
                rejection_code: None,
                rejection_message: None,
            },
        }
    }
}

/// Per-party progress line in the preparer overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyProgress {
    pub party_id: PartyId,
    pub role: PartyRole,
    pub display_name: String,
    pub status: &'static str,
    pub completion_percentage: u8,
    pub has_validation_errors: bool,
}

/// Filing summary line in the preparer overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilingView {
    pub status: &'static str,
    pub attempts: u32,
    pub environment: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_message: Option<String>,
}

/// Sanitized report view for the preparer-facing UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOverview {
    pub report_id: ReportId,
    pub status: &'static str,
    pub property_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing_deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub determination: Option<DeterminationVerdict>,
    pub parties: Vec<PartyProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filing: Option<FilingView>,
}

impl ReportOverview {
    fn of(aggregate: &ReportAggregate) -> Self {
        Self {
            report_id: aggregate.report.report_id.clone(),
            status: aggregate.report.status.label(),
            property_address: aggregate.report.property_address.clone(),
            closing_date: aggregate.report.closing_date,
            filing_deadline: aggregate.report.filing_deadline,
            determination: aggregate.report.determination.clone(),
            parties: aggregate
                .parties
                .iter()
                .map(|party| PartyProgress {
                    party_id: party.party_id.clone(),
                    role: party.role,
                    display_name: party.display_name.clone(),
                    status: party.status.label(),
                    completion_percentage: party.completion_percentage,
                    has_validation_errors: party.has_validation_errors,
                })
                .collect(),
            filing: aggregate.filing.as_ref().map(|submission| FilingView {
                status: submission.status.label(),
                attempts: submission.attempts,
                environment: submission.environment.label(),
                receipt_id: submission.receipt_id.clone(),
                rejection_code: submission.rejection_code.clone(),
                rejection_message: submission.rejection_message.clone(),
            }),
        }
    }
}
