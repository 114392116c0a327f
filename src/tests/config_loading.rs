#[cfg(test)]
mod test {

    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::config::client::{DEFAULT_API_VERSION, DEFAULT_BAD_TOKEN_CODE};
    use crate::config::proc_loader::{file_to_config, parse_config};
    use crate::config::settings::{LogFormat, DEFAULT_HTTP_TIMEOUT_MS};

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[tokio::test]
    async fn loads_yaml_and_expands_env_vars() {
        std::env::set_var("ATOL_CLIENT_TEST_PASSWORD", "from-env");
        let file = write_config(
            r#"
settings:
  http:
    timeout_ms: 1500
  logging:
    level: debug
    format: json
client:
  host: https://testonline.atol.ru
  group_code: ${ATOL_CLIENT_TEST_GROUP:group_default}
  login: merchant
  password: ${ATOL_CLIENT_TEST_PASSWORD}
"#,
        );

        let cfg = file_to_config(file.path()).await.unwrap();

        assert_eq!(cfg.settings.http.timeout_ms, 1500);
        let logging = cfg.settings.logging.unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);
        assert_eq!(cfg.client.group_code, "group_default");
        assert_eq!(cfg.client.password, "from-env");
        assert_eq!(cfg.client.api_version, DEFAULT_API_VERSION);
        assert_eq!(cfg.client.bad_token_code, DEFAULT_BAD_TOKEN_CODE);
    }

    #[test]
    fn defaults_apply_when_settings_are_absent() {
        let cfg = parse_config(
            "client: { host: 'http://localhost', api_version: v5, group_code: g, login: l, password: p, bad_token_code: 4 }"
                .to_owned(),
        )
        .unwrap();

        assert_eq!(cfg.settings.http.timeout_ms, DEFAULT_HTTP_TIMEOUT_MS);
        assert_eq!(cfg.settings.logging.unwrap().level, "info");
        assert_eq!(cfg.client.api_version, "v5");
        assert_eq!(cfg.client.bad_token_code, 4);
    }

    #[test]
    fn validation_reports_every_problem() {
        let err = parse_config(
            r#"
settings:
  http: { timeout_ms: 0 }
  logging: { level: loud, format: compact }
client: { host: "online.atol.ru", group_code: "a/b", login: "", password: "" }
"#
            .to_owned(),
        )
        .unwrap_err()
        .to_string();

        assert!(err.contains("total errors: 6"), "{}", err);
        for field in ["timeout_ms", "logging.level", "client.host", "client.group_code", "client.login", "client.password"] {
            assert!(err.contains(field), "missing '{}' in {}", field, err);
        }
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_path() {
        let err = file_to_config(std::path::Path::new("/nonexistent/atol.yaml")).await.unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/atol.yaml"));
    }
}
