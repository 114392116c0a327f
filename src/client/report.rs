use std::sync::Arc;

use http::Method;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::client::envelope::{decode, request_headers};
use crate::client::token_manager::TokenManager;
use crate::config::client::ClientConfig;
use crate::error::{AtolError, Result, ValidationError};
use crate::observability::metrics::get_metrics;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Still queued or being printed.
    Wait,
    Done,
    Fail,
}

/// Fiscal attributes assigned when the document was registered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub fns_site: String,
    pub fn_number: String,
    pub shift_number: i64,
    pub receipt_datetime: String,
    pub fiscal_receipt_number: i64,
    pub fiscal_document_number: i64,
    pub ecr_registration_number: String,
    pub fiscal_document_attribute: i64,
}

/// Processing result of a submitted document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Report {
    uuid: String,
    status: ReportStatus,
    #[serde(default)]
    payload: Option<ReportPayload>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    group_code: Option<String>,
    #[serde(default)]
    daemon_code: Option<String>,
    #[serde(default)]
    device_code: Option<String>,
    #[serde(default)]
    external_id: Option<String>,
    #[serde(default)]
    callback_url: Option<String>,
}

impl Report {
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    pub fn payload(&self) -> Option<&ReportPayload> {
        self.payload.as_ref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn group_code(&self) -> Option<&str> {
        self.group_code.as_deref()
    }

    pub fn daemon_code(&self) -> Option<&str> {
        self.daemon_code.as_deref()
    }

    pub fn device_code(&self) -> Option<&str> {
        self.device_code.as_deref()
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn callback_url(&self) -> Option<&str> {
        self.callback_url.as_deref()
    }
}

/// Fetches reports of previously submitted documents.
///
/// Unlike `RequestOrchestrator`, a rejected token is not refreshed here: the
/// server error is returned as `AtolError::Client`.
pub struct ReportFetcher<T, C> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    tokens: TokenManager<T, C>,
}

impl<T: Transport, C: CacheStore> ReportFetcher<T, C> {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<T>, tokens: TokenManager<T, C>) -> Self {
        Self { config, transport, tokens }
    }

    pub async fn get_report(&self, uuid: &str) -> Result<Report> {
        let metrics = get_metrics().await;
        metrics.report_requests.inc();
        self.fetch(uuid)
            .await
            .inspect(|report| info!("report {} status {:?}", report.uuid(), report.status()))
            .inspect_err(|e| {
                metrics.report_failures.with_label_values(&[e.reason()]).inc();
                warn!("report {} failed: {}", uuid, e);
            })
    }

    async fn fetch(&self, uuid: &str) -> Result<Report> {
        check_uuid(uuid)?;
        let token = self.tokens.get_token(&self.config.login, &self.config.password).await?;
        let url = self.config.report_url(uuid);
        debug!("GET {}", url);
        let response = self
            .transport
            .request(Method::GET, &url, request_headers(Some(&token), false)?, None)
            .await
            .map_err(AtolError::from)?;

        // error answers may lack report fields, check `error` first
        let envelope = decode::<Map<String, Value>>(&response)?;
        if let Some(err) = envelope.error {
            return Err(err.into_client_error());
        }
        serde_json::from_value(Value::Object(envelope.data)).map_err(|e| AtolError::Decode {
            status: response.status,
            reason: e.to_string(),
        })
    }
}

/// A uuid becomes one path segment of the report url.
pub fn check_uuid(uuid: &str) -> std::result::Result<(), ValidationError> {
    if uuid.is_empty() || !uuid.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::InvalidValue {
            field: "uuid",
            reason: format!("'{}' is not a single url path segment", uuid),
        });
    }
    Ok(())
}
