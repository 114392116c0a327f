use std::sync::Arc;

use http::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::client::envelope::{decode, request_headers};
use crate::config::client::ClientConfig;
use crate::error::{AtolError, Result};
use crate::observability::metrics::get_metrics;
use crate::transport::Transport;

pub const TOKEN_CACHE_PREFIX: &str = "atol.token";
/// Server-side token validity.
pub const TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;

pub fn cache_key(login: &str) -> String {
    format!("{}{}", TOKEN_CACHE_PREFIX, login)
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: Option<String>,
}

/// Acquires tokens and keeps them in the shared cache.
pub struct TokenManager<T, C> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    cache: Arc<C>,
}

impl<T, C> Clone for TokenManager<T, C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: self.transport.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<T: Transport, C: CacheStore> TokenManager<T, C> {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<T>, cache: Arc<C>) -> Self {
        Self { config, transport, cache }
    }

    /// Cached token for `login`, or a fresh one from the server.
    pub async fn get_token(&self, login: &str, password: &str) -> Result<String> {
        let key = cache_key(login);
        if let Some(token) = self.cache.get(&key).await {
            debug!("token for '{}' served from cache", login);
            return Ok(token);
        }

        let metrics = get_metrics().await;
        metrics.token_fetches.inc();
        info!("requesting token for '{}'", login);

        let body = json!({ "login": login, "pass": password }).to_string();
        let response = self
            .transport
            .request(Method::POST, &self.config.token_url(), request_headers(None, true)?, Some(body))
            .await
            .inspect_err(|_| metrics.token_fetch_failures.inc())?;

        let envelope = decode::<TokenBody>(&response).inspect_err(|_| metrics.token_fetch_failures.inc())?;
        if let Some(err) = envelope.error {
            metrics.token_fetch_failures.inc();
            return Err(err.into_auth_error());
        }
        let token = envelope
            .data
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                metrics.token_fetch_failures.inc();
                AtolError::Decode { status: response.status, reason: "response carries no token".to_owned() }
            })?;

        self.cache.set(&key, token.clone(), TOKEN_TTL_SECONDS).await;
        debug!("token for '{}' cached for {} seconds", login, TOKEN_TTL_SECONDS);
        Ok(token)
    }

    /// Drops the cached token; the next `get_token` asks the server again.
    pub async fn invalidate(&self, login: &str) {
        self.cache.delete(&cache_key(login)).await;
        get_metrics().await.token_invalidations.inc();
        info!("token for '{}' invalidated", login);
    }
}
