use anyhow::Context;
use gcs_drive_mover::app::router;
use gcs_drive_mover::utils::logger;
use gcs_drive_mover::FunctionConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_function_logger();

    let config = FunctionConfig::from_env().context("reading function environment")?;
    let port = config.port;
    let app = router(Arc::new(config));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("binding port {}", port))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
