use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryAuditSink, InMemoryOutbox, InMemoryReportStore};
use crate::routes::with_reporting_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use clearfile::config::AppConfig;
use clearfile::error::AppError;
use clearfile::telemetry;
use clearfile::workflows::reporting::{MockFilingAdapter, ReportService, ReportingConfig};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryReportStore::default());
    let outbox = Arc::new(InMemoryOutbox::default());
    let audit = Arc::new(InMemoryAuditSink::default());
    // The mock transport stands in for the regulator gateway until the real
    // batch transport lands; outcomes still flow through the orchestrator.
    let adapter = Arc::new(MockFilingAdapter::accepting());
    let reporting_config = ReportingConfig {
        environment: config.environment.filing_environment(),
        deadline_rule: config.filing.deadline_rule,
        link_ttl_days: config.filing.link_ttl_days,
    };
    let report_service = Arc::new(ReportService::new(
        store,
        outbox,
        audit,
        adapter,
        reporting_config,
    ));

    let app = with_reporting_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "transaction reporting service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
