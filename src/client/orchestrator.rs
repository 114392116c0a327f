use std::sync::Arc;

use http::Method;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::client::envelope::{classify, decode, request_headers};
use crate::client::token_manager::TokenManager;
use crate::cache::CacheStore;
use crate::config::client::ClientConfig;
use crate::document::FiscalDocument;
use crate::error::{AtolError, Result};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::{run_with_token_refresh, CallError};
use crate::transport::Transport;

#[derive(Debug, Deserialize)]
struct SubmitBody {
    uuid: Option<String>,
}

/// Submits documents, refreshing the token once if the server rejects it.
pub struct RequestOrchestrator<T, C> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    tokens: TokenManager<T, C>,
}

impl<T: Transport, C: CacheStore> RequestOrchestrator<T, C> {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<T>, tokens: TokenManager<T, C>) -> Self {
        Self { config, transport, tokens }
    }

    /// Registers `document`, returning the server-assigned uuid.
    pub async fn send<D: FiscalDocument + ?Sized>(&self, document: &D) -> Result<String> {
        let payload = document.serialize()?;
        let operation = payload.operation();
        let url = self.config.operation_url(operation);
        let body = payload.to_json();

        let metrics = get_metrics().await;
        let start = get_instant();
        metrics.document_requests.with_label_values(&[operation.as_str()]).inc();

        let (url, body, login) = (url.as_str(), body.as_str(), self.config.login.as_str());
        let result = run_with_token_refresh(
            move || self.post(url, body),
            move || async move {
                get_metrics().await.bad_token_retries.inc();
                self.tokens.invalidate(login).await;
            },
        )
        .await;

        metrics.document_duration.with_label_values(&[operation.as_str()]).observe(start.elapsed().as_secs_f64());
        match &result {
            Ok(uuid) => info!("{} accepted, uuid {}", operation, uuid),
            Err(e) => {
                metrics.document_failures.with_label_values(&[operation.as_str(), e.reason()]).inc();
                warn!("{} rejected: {}", operation, e);
            }
        }
        result
    }

    async fn post(&self, url: &str, body: &str) -> std::result::Result<String, CallError> {
        let token = self.tokens.get_token(&self.config.login, &self.config.password).await?;
        debug!("POST {} {}", url, body);
        let response = self
            .transport
            .request(Method::POST, url, request_headers(Some(&token), true)?, Some(body.to_owned()))
            .await
            .map_err(AtolError::from)?;

        let status = response.status;
        let data = classify(decode::<SubmitBody>(&response)?, self.config.bad_token_code)?;
        let uuid = data.uuid.filter(|uuid| !uuid.is_empty()).ok_or(AtolError::Decode {
            status,
            reason: "response carries no uuid".to_owned(),
        })?;
        Ok(uuid)
    }
}
