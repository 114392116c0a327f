//! Configuration validation with aggregated errors.

use tracing::{error, info};

use crate::config::client::{ClientConfig, ServiceConfig};
use crate::config::settings::SettingsConfig;

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_client(&cfg.client, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be > 0".to_string());
    }

    if let Some(logging) = &settings.logging {
        let level = logging.level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' must be one of trace, debug, info, warn, error",
                logging.level
            ));
        }
    }
}

/// CLIENT VALIDATION
fn validate_client(client: &ClientConfig, errors: &mut Vec<String>) {
    if !(client.host.starts_with("http://") || client.host.starts_with("https://")) {
        errors.push(format!(
            "client.host '{}' must start with http:// or https://",
            client.host
        ));
    }
    if client.api_version.is_empty() || client.api_version.contains('/') {
        errors.push(format!(
            "client.api_version '{}' must be a single path segment",
            client.api_version
        ));
    }
    if client.group_code.is_empty() || client.group_code.contains('/') {
        errors.push(format!(
            "client.group_code '{}' must be a single non-empty path segment",
            client.group_code
        ));
    }
    if client.login.is_empty() {
        errors.push("client.login must not be empty".to_string());
    }
    if client.password.is_empty() {
        errors.push("client.password must not be empty".to_string());
    }
}
