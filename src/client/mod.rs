//! # Service client
//!
//! - `token_manager`: token acquisition and caching
//! - `orchestrator`: document submission with one token-refresh retry
//! - `report`: report fetching
//! - `envelope`: response envelope and request headers

pub mod envelope;
pub mod orchestrator;
pub mod report;
pub mod token_manager;

use std::sync::Arc;

use crate::cache::{CacheStore, InMemoryCache};
use crate::config::client::ClientConfig;
use crate::document::FiscalDocument;
use crate::error::{AtolError, Result};
use crate::transport::{ReqwestTransport, Transport};

pub use orchestrator::RequestOrchestrator;
pub use report::{Report, ReportFetcher, ReportPayload, ReportStatus};
pub use token_manager::TokenManager;

/// Client of one merchant account: immutable config plus injected transport
/// and token cache. The cache may be shared between clients.
pub struct AtolClient<T = ReqwestTransport, C = InMemoryCache> {
    config: Arc<ClientConfig>,
    tokens: TokenManager<T, C>,
    orchestrator: RequestOrchestrator<T, C>,
    reports: ReportFetcher<T, C>,
}

impl<T: Transport, C: CacheStore> AtolClient<T, C> {
    pub fn new(config: ClientConfig, transport: Arc<T>, cache: Arc<C>) -> Self {
        let config = Arc::new(config);
        let tokens = TokenManager::new(config.clone(), transport.clone(), cache);
        let orchestrator = RequestOrchestrator::new(config.clone(), transport.clone(), tokens.clone());
        let reports = ReportFetcher::new(config.clone(), transport, tokens.clone());
        Self { config, tokens, orchestrator, reports }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Token of the configured login, cached or fresh.
    pub async fn token(&self) -> Result<String> {
        self.tokens.get_token(&self.config.login, &self.config.password).await
    }

    pub async fn invalidate_token(&self) {
        self.tokens.invalidate(&self.config.login).await
    }

    pub async fn send<D: FiscalDocument + ?Sized>(&self, document: &D) -> Result<String> {
        self.orchestrator.send(document).await
    }

    pub async fn report(&self, uuid: &str) -> Result<Report> {
        self.reports.get_report(uuid).await
    }
}

impl AtolClient<ReqwestTransport, InMemoryCache> {
    /// reqwest transport and a private in-memory cache.
    pub fn with_defaults(config: ClientConfig, timeout_ms: u64) -> Result<Self> {
        let transport = ReqwestTransport::new(timeout_ms).map_err(AtolError::from)?;
        Ok(Self::new(config, Arc::new(transport), Arc::new(InMemoryCache::new())))
    }
}
