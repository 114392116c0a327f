//! HTTP transport collaborator.

pub mod http_client;

use std::future::Future;

use http::{HeaderMap, Method};

use crate::error::TransportError;

pub use http_client::ReqwestTransport;

/// Raw HTTP answer; the status is informational, the body is classified by
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request. Implementations must report connection-level failures
/// as `TransportError` and return every HTTP answer, whatever its status, as
/// `RawResponse`.
pub trait Transport: Send + Sync {
    fn request(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<String>,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}
