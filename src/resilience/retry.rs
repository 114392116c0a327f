use std::future::Future;

use tracing::{error, warn};

use crate::client::envelope::ApiError;
use crate::error::AtolError;

/// Outcome of one authenticated call.
#[derive(Debug)]
pub enum CallError {
    /// The server refused the token; the call may be repeated with a new one.
    BadToken(ApiError),
    Fatal(AtolError),
}

impl From<AtolError> for CallError {
    fn from(err: AtolError) -> Self {
        CallError::Fatal(err)
    }
}

/// Total attempts: the first call plus one retry after a token refresh.
pub const TOKEN_REFRESH_ATTEMPTS: u32 = 2;

/// Runs `operation`; on `BadToken` runs `refresh` and tries once more.
/// A bad token on the last attempt becomes `AtolError::Client`.
pub async fn run_with_token_refresh<F, Fut, R, RFut, T>(mut operation: F, mut refresh: R) -> Result<T, AtolError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CallError>>,
    R: FnMut() -> RFut,
    RFut: Future<Output = ()>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(CallError::BadToken(e)) if attempt < TOKEN_REFRESH_ATTEMPTS => {
                warn!("attempt {attempt}/{TOKEN_REFRESH_ATTEMPTS} rejected token (code {}): {}", e.code, e.text);
                refresh().await;
                attempt += 1;
            }
            Err(CallError::BadToken(e)) => {
                error!("token rejected again after refresh (code {}): {}", e.code, e.text);
                return Err(e.into_client_error());
            }
            Err(CallError::Fatal(e)) => return Err(e),
        }
    }
}
