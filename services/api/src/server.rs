use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryHouseholdRepository};
use crate::routes::with_grant_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use grant_disbursement::config::AppConfig;
use grant_disbursement::error::AppError;
use grant_disbursement::grants::{GrantService, SnapshotImporter};
use grant_disbursement::telemetry;
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

    let repository = Arc::new(InMemoryHouseholdRepository::default());
    let grant_service = Arc::new(GrantService::new(repository));

    if let Some(seed) = &config.seed {
        let snapshot = SnapshotImporter::from_paths(&seed.households, &seed.occupants)?;
        let (households, occupants) = grant_service.seed(snapshot)?;
        info!(
            households,
            occupants,
            source = %seed.households.display(),
            "seeded household registry"
        );
    }

    let app = with_grant_routes(grant_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grant disbursement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
