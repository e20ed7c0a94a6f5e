use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::audit::AuditSink;
use super::determination::DeterminationAnswers;
#[cfg(feature = "demo-hooks")]
use super::domain::DemoOutcome;
use super::domain::{PartyData, PartyId, PartyLinkSpec, ReportId, ReportIntake};
use super::error::ReportingError;
use super::filing::FilingAdapter;
use super::outbox::NotificationOutbox;
use super::repository::{ReportStore, StoreError};
use super::service::ReportService;

/// Router builder exposing the reporting endpoints: preparer lifecycle,
/// party capability links, and filing operations.
pub fn reporting_router<S, O, A, F>(service: Arc<ReportService<S, O, A, F>>) -> Router
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    let router = Router::new()
        .route("/api/v1/reports", post(create_handler::<S, O, A, F>))
        .route(
            "/api/v1/reports/:report_id",
            get(overview_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/reports/:report_id/wizard",
            put(wizard_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/reports/:report_id/determination",
            post(determination_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/reports/:report_id/determination/reopen",
            post(reopen_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/reports/:report_id/parties",
            post(issue_links_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/reports/:report_id/parties/:party_id/corrections",
            post(corrections_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/reports/:report_id/ready-check",
            get(ready_check_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/reports/:report_id/filing",
            post(file_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/reports/:report_id/filing/retry",
            post(retry_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/party-links/:token",
            get(party_view_handler::<S, O, A, F>).put(party_save_handler::<S, O, A, F>),
        )
        .route(
            "/api/v1/party-links/:token/submit",
            post(party_submit_handler::<S, O, A, F>),
        );

    #[cfg(feature = "demo-hooks")]
    let router = router.route(
        "/api/v1/reports/:report_id/filing/demo-outcome",
        post(demo_outcome_handler::<S, O, A, F>),
    );

    router.with_state(service)
}

/// Map domain failures onto HTTP statuses. Token failures stay deliberately
/// vague so a caller probing the link space learns nothing.
fn error_response(error: ReportingError) -> Response {
    let status = match &error {
        ReportingError::TokenInvalid | ReportingError::Store(StoreError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ReportingError::PartyNotFound => StatusCode::NOT_FOUND,
        ReportingError::IncompleteAnswers(_)
        | ReportingError::ValidationFailed { .. }
        | ReportingError::SubmissionIncomplete { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ReportingError::InvalidTransition { .. }
        | ReportingError::PartyAlreadySubmitted
        | ReportingError::CorrectionsUnavailable
        | ReportingError::ConcurrentFilingInProgress
        | ReportingError::RetryRequired
        | ReportingError::RetryUnavailable { .. }
        | ReportingError::NoFilingAttempt
        | ReportingError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        ReportingError::DemoOutcomeUnavailable(_) => StatusCode::FORBIDDEN,
        ReportingError::Store(StoreError::Unavailable(_))
        | ReportingError::Outbox(_)
        | ReportingError::Audit(_)
        | ReportingError::Adapter(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        ReportingError::ValidationFailed { errors } => json!({
            "error": error.to_string(),
            "validation_errors": errors,
        }),
        ReportingError::IncompleteAnswers(incomplete) => json!({
            "error": error.to_string(),
            "missing": incomplete.missing,
        }),
        _ => json!({
            "error": error.to_string(),
        }),
    };

    (status, axum::Json(payload)).into_response()
}

async fn create_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    axum::Json(intake): axum::Json<ReportIntake>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.create_report(intake) {
        Ok(report) => (StatusCode::CREATED, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn overview_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.report_overview(&ReportId(report_id)) {
        Ok(overview) => (StatusCode::OK, axum::Json(overview)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WizardSaveRequest {
    pub step: u32,
    pub data: serde_json::Value,
}

async fn wizard_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
    axum::Json(request): axum::Json<WizardSaveRequest>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.save_wizard(&ReportId(report_id), request.step, request.data) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

async fn determination_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
    axum::Json(answers): axum::Json<DeterminationAnswers>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.run_determination(&ReportId(report_id), &answers) {
        Ok(verdict) => (StatusCode::OK, axum::Json(verdict)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn reopen_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.reopen_determination(&ReportId(report_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct IssueLinksRequest {
    pub parties: Vec<PartyLinkSpec>,
    #[serde(default)]
    pub expires_in_days: Option<i64>,
}

async fn issue_links_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
    axum::Json(request): axum::Json<IssueLinksRequest>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.issue_party_links(&ReportId(report_id), request.parties, request.expires_in_days)
    {
        Ok(links) => (StatusCode::CREATED, axum::Json(links)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CorrectionsRequest {
    #[serde(default)]
    pub note: Option<String>,
}

async fn corrections_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path((report_id, party_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<CorrectionsRequest>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.request_corrections(&ReportId(report_id), &PartyId(party_id), request.note) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

async fn ready_check_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.ready_check(&ReportId(report_id)) {
        Ok(check) => (StatusCode::OK, axum::Json(check)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn file_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.file_report(&ReportId(report_id)) {
        Ok(filing) => (StatusCode::OK, axum::Json(filing)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn retry_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.retry_filing(&ReportId(report_id)) {
        Ok(filing) => (StatusCode::OK, axum::Json(filing)).into_response(),
        Err(error) => error_response(error),
    }
}

#[cfg(feature = "demo-hooks")]
async fn demo_outcome_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(report_id): Path<String>,
    axum::Json(outcome): axum::Json<DemoOutcome>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.set_filing_outcome(&ReportId(report_id), outcome) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

async fn party_view_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(token): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.party_by_token(&token) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn party_save_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(token): Path<String>,
    axum::Json(data): axum::Json<PartyData>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.save_party(&token, data) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn party_submit_handler<S, O, A, F>(
    State(service): State<Arc<ReportService<S, O, A, F>>>,
    Path(token): Path<String>,
) -> Response
where
    S: ReportStore + 'static,
    O: NotificationOutbox + 'static,
    A: AuditSink + 'static,
    F: FilingAdapter + 'static,
{
    match service.submit_party(&token) {
        Ok(receipt) => (StatusCode::OK, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}
