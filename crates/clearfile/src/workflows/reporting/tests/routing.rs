use super::common::*;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::workflows::reporting::router::reporting_router;
#[cfg(feature = "demo-hooks")]
use crate::workflows::reporting::service::ReportingConfig;

fn json_request(method: &str, uri: &str, payload: serde_json::Value) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&payload).expect("serializable"),
        ))
        .expect("request builds")
}

fn empty_request(method: &str, uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn create_route_returns_created_report() {
    let (router, _) = test_router();

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/reports",
            serde_json::to_value(intake()).expect("serializable"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("draft")));
    assert!(payload
        .get("report_id")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .starts_with("rpt-"));
}

#[tokio::test]
async fn unknown_report_returns_not_found() {
    let (router, _) = test_router();

    let response = router
        .oneshot(empty_request("GET", "/api/v1/reports/rpt-404404"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_party_token_returns_not_found() {
    let (router, _) = test_router();

    let response = router
        .oneshot(empty_request("GET", "/api/v1/party-links/pl_bogus"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("error"),
        Some(&json!("party link is invalid or expired"))
    );
}

#[tokio::test]
async fn incomplete_determination_answers_return_unprocessable() {
    let (service, _, _, _) = build_service();
    let report = service.create_report(intake()).expect("report created");
    let router = reporting_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/reports/{}/determination", report.report_id.0),
            json!({}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    let missing = payload
        .get("missing")
        .and_then(serde_json::Value::as_array)
        .expect("missing list");
    assert!(missing.contains(&json!("property_type")));
}

#[tokio::test]
async fn determination_route_returns_verdict() {
    let (service, _, _, _) = build_service();
    let report = service.create_report(intake()).expect("report created");
    let router = reporting_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/reports/{}/determination", report.report_id.0),
            serde_json::to_value(reportable_entity_answers()).expect("serializable"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("is_reportable"), Some(&json!(true)));
}

#[tokio::test]
async fn filing_before_ready_returns_conflict() {
    let (service, _, _, _) = build_service();
    let (report_id, _) = collecting_report(&service);
    let router = reporting_router(service);

    let response = router
        .oneshot(empty_request(
            "POST",
            &format!("/api/v1/reports/{}/filing", report_id.0),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn party_save_and_submit_routes_drive_the_collection_flow() {
    let (service, _, _, _) = build_service();
    let (report_id, links) = collecting_report(&service);
    let router = reporting_router(service);

    for link in &links {
        let response = router
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/v1/party-links/{}", link.token),
                serde_json::to_value(data_for_link(link)).expect("serializable"),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(empty_request(
                "POST",
                &format!("/api/v1/party-links/{}/submit", link.token),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router
        .oneshot(empty_request(
            "GET",
            &format!("/api/v1/reports/{}/ready-check", report_id.0),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("ready"), Some(&json!(true)));
}

#[cfg(feature = "demo-hooks")]
#[tokio::test]
async fn demo_outcome_route_is_refused_in_production() {
    use crate::workflows::reporting::domain::FilingEnvironment;
    use crate::workflows::reporting::filing::MockFilingAdapter;

    let config = ReportingConfig {
        environment: FilingEnvironment::Production,
        ..ReportingConfig::default()
    };
    let (service, _, _, _) = build_service_with_adapter(MockFilingAdapter::accepting(), config);
    let (report_id, _) = ready_report(&service);
    let router = reporting_router(service);

    let response = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/reports/{}/filing/demo-outcome", report_id.0),
            json!({"outcome": "accept"}),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
