use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use tracing::info;

use scheme_finder::accounts::SessionManager;
use scheme_finder::alerts::AlertSubscriptions;
use scheme_finder::config::AppConfig;
use scheme_finder::error::AppError;
use scheme_finder::storage::FileStore;
use scheme_finder::telemetry;

use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState};
use crate::routes::with_app_routes;

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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (catalog, imported) = load_catalog(config.catalog.csv_path.as_deref())?;
    let storage = Arc::new(FileStore::open(&config.storage.data_dir)?);
    let session = Arc::new(SessionManager::open(storage.clone())?);
    let alerts = Arc::new(AlertSubscriptions::new(storage));

    let app = with_app_routes(Arc::new(catalog), session, alerts)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, catalog_imported = imported, "scheme finder service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
