// Application layer: wires config, credentials and clients into one relocation pass.

#[cfg(feature = "function")]
pub mod trigger;

#[cfg(feature = "function")]
pub use trigger::router;

use crate::adapters::auth::{DRIVE_SCOPE, STORAGE_SCOPE};
use crate::adapters::{http_client, DriveHost, GcsStore, ServiceAccountKey, ServiceAccountTokenProvider};
use crate::config::{FunctionConfig, MoverConfig};
use crate::core::engine::RelocationEngine;
use crate::core::{AccessTokenProvider, RelocationReport};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use reqwest::Client;
use std::sync::Arc;

fn service_account_tokens(config: &MoverConfig, client: Client) -> Result<ServiceAccountTokenProvider> {
    let key = ServiceAccountKey::from_file(&config.source.credentials_file)?;
    let mut tokens = ServiceAccountTokenProvider::new(key, &[STORAGE_SCOPE, DRIVE_SCOPE], client)?;
    if let Some(token_uri) = &config.endpoints.token {
        tokens = tokens.with_token_uri(token_uri.as_str());
    }
    Ok(tokens)
}

/// Authenticates once and runs every configured rule. A key that cannot be
/// loaded fails each rule rather than the whole pass.
pub async fn relocate(config: &MoverConfig) -> Result<RelocationReport> {
    config.validate()?;

    let client = http_client(&config.http)?;
    let tokens = match service_account_tokens(config, client.clone()) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::error!("❌ Service account unusable: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            return Ok(RelocationReport::failed(&config.rules, &e.to_string()));
        }
    };
    tracing::debug!(
        "Using service account {} for gs://{}",
        tokens.client_email(),
        config.source.bucket
    );
    let tokens: Arc<dyn AccessTokenProvider> = Arc::new(tokens);

    let store = GcsStore::new(
        client.clone(),
        tokens.clone(),
        &config.endpoints.storage,
        config.source.bucket.as_str(),
    )?;
    let host = DriveHost::new(client, tokens, &config.endpoints.upload)?;

    let engine = RelocationEngine::new(store, host, config.rules.clone());
    Ok(engine.run().await)
}

/// Renders a pass as the plain-text status and whether any line is a failure.
pub fn render_status(result: Result<RelocationReport>) -> (String, bool) {
    match result {
        Ok(report) => (report.to_string(), report.has_failures()),
        Err(e) => {
            tracing::error!("❌ Relocation could not start: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            (format!("🚨 Error occurred: {}", e), true)
        }
    }
}

/// Runs one pass and renders the outcome as the plain-text status the
/// trigger returns. Never fails; setup errors become a single error line.
pub async fn transfer_status(config: &MoverConfig) -> String {
    render_status(relocate(config).await).0
}

/// Entry point for one cloud function invocation.
pub async fn handle_invocation(function_config: &FunctionConfig) -> String {
    match function_config.resolve() {
        Ok(config) => transfer_status(&config).await,
        Err(e) => render_status(Err(e)).0,
    }
}
