use crate::cli::ServeArgs;
use crate::infra::{
    load_settings_document, AppState, InMemoryProposalStore, InMemorySettingsStore,
    OutboxDispatcher,
};
use crate::routes::with_triage_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use reply_triage::config::AppConfig;
use reply_triage::error::AppError;
use reply_triage::telemetry;
use reply_triage::workflows::triage::{resolve, RuleSettings, TriageService};
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
    if let Some(path) = args.settings.take() {
        config.triage.settings_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    // Refuse to start on a settings file that would fail at evaluation time.
    let document = load_settings_document(config.triage.settings_path.as_deref())?;
    let resolved = resolve(&document.clone().unwrap_or_default(), &RuleSettings::defaults())?;
    info!(
        location_keywords = resolved.rules.location_keywords.len(),
        auto_send = resolved.auto_send,
        "triage settings loaded"
    );
    resolved.log_warnings();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let outbox = OutboxDispatcher::default();
    let triage_service = Arc::new(TriageService::new(
        Arc::new(InMemorySettingsStore::seeded(document)),
        Arc::new(InMemoryProposalStore::default()),
        Arc::new(outbox.clone()),
    ));

    let app = with_triage_routes(triage_service, outbox)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "reply triage service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
