use serde::Deserialize;

use crate::config::settings::SettingsConfig;
use crate::document::Operation;

pub const DEFAULT_API_VERSION: &str = "v4";
/// Server error code meaning "token invalid or expired".
pub const DEFAULT_BAD_TOKEN_CODE: i64 = 11;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub client: ClientConfig,
}

/// Immutable connection settings of one merchant account.
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// e.g. `https://online.atol.ru`
    pub host: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    pub group_code: String,
    pub login: String,
    pub password: String,
    #[serde(default = "default_bad_token_code")]
    pub bad_token_code: i64,
}

impl ClientConfig {
    pub fn new(
        host: impl Into<String>,
        group_code: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            group_code: group_code.into(),
            login: login.into(),
            password: password.into(),
            bad_token_code: DEFAULT_BAD_TOKEN_CODE,
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_bad_token_code(mut self, code: i64) -> Self {
        self.bad_token_code = code;
        self
    }

    fn base_url(&self) -> String {
        format!("{}/possystem/{}", self.host.trim_end_matches('/'), self.api_version)
    }

    pub fn token_url(&self) -> String {
        format!("{}/getToken", self.base_url())
    }

    pub fn operation_url(&self, operation: Operation) -> String {
        format!("{}/{}/{}", self.base_url(), self.group_code, operation.as_str())
    }

    pub fn report_url(&self, uuid: &str) -> String {
        format!("{}/{}/report/{}", self.base_url(), self.group_code, uuid)
    }
}

// password stays out of logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("api_version", &self.api_version)
            .field("group_code", &self.group_code)
            .field("login", &self.login)
            .field("password", &"***")
            .field("bad_token_code", &self.bad_token_code)
            .finish()
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_bad_token_code() -> i64 {
    DEFAULT_BAD_TOKEN_CODE
}
