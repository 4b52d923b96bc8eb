//! HTTP trigger: any request runs both importers and returns the merged report.
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::importer::Importer;
use crate::model::ImportReport;

pub fn router(importer: Arc<Importer>) -> Router {
    Router::new()
        .route("/favicon.ico", get(favicon))
        .fallback(trigger_import)
        .with_state(importer)
}

/// Browsers ask for this alongside every page load; don't start a run for it.
async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Always 200: per-importer failures live in the body.
async fn trigger_import(State(importer): State<Arc<Importer>>) -> Json<ImportReport> {
    Json(importer.run().await)
}

pub async fn serve<F>(listener: TcpListener, importer: Arc<Importer>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = ?listener.local_addr().ok(), "listening for import triggers");
    axum::serve(listener, router(importer))
        .with_graceful_shutdown(shutdown)
        .await
}
