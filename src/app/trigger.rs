use crate::app::handle_invocation;
use crate::config::FunctionConfig;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::Router;
use std::sync::Arc;

async fn transfer_gcs_to_drive(State(config): State<Arc<FunctionConfig>>) -> impl IntoResponse {
    tracing::info!("Starting relocation function");
    let status = handle_invocation(&config).await;
    tracing::info!("Relocation function finished");

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], status)
}

async fn healthz() -> &'static str {
    "ok"
}

/// `/` (any method) runs one relocation pass; `/healthz` never touches storage.
pub fn router(config: Arc<FunctionConfig>) -> Router {
    Router::new()
        .route("/", any(transfer_gcs_to_drive))
        .route("/healthz", get(healthz))
        .with_state(config)
}
