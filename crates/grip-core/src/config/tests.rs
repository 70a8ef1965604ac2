use super::*;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults_match_local_backend() {
    let config = GripConfig::default();
    assert_eq!(config.analysis.endpoint, "http://127.0.0.1:8002/ask");
    assert_eq!(config.analysis.timeout_secs, 30);
    assert_eq!(config.analysis.document_field, "pdf_file");
    assert_eq!(config.documents.max_bytes, 10 * 1024 * 1024);
    assert_eq!(config.documents.allowed_content_types, vec!["application/pdf"]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_yaml_keeps_defaults() {
    let yaml = r#"
analysis:
  endpoint: https://contracts.example.com/ask
documents:
  max_bytes: 2048
"#;
    let config: GripConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.analysis.endpoint, "https://contracts.example.com/ask");
    assert_eq!(config.analysis.timeout_secs, 30);
    assert_eq!(config.documents.max_bytes, 2048);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_validation_rejects_bad_endpoint() {
    let mut config = GripConfig::default();
    config.analysis.endpoint = "ftp://example.com/ask".to_string();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, AnalysisError::ConfigError(ref m) if m.contains("http(s)")));
}

#[test]
fn test_validation_rejects_zero_timeout() {
    let mut config = GripConfig::default();
    config.analysis.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_env_overrides() {
    let vars: HashMap<&str, &str> = HashMap::from([
        (ENDPOINT_ENV, " http://10.0.0.5:9000/ask "),
        (TIMEOUT_ENV, "5"),
    ]);
    let mut config = GripConfig::default();
    ConfigLoader::apply_overrides(&mut config, |k| vars.get(k).map(|v| v.to_string())).unwrap();
    assert_eq!(config.analysis.endpoint, "http://10.0.0.5:9000/ask");
    assert_eq!(config.analysis.timeout_secs, 5);
}

#[test]
fn test_env_override_rejects_non_numeric_timeout() {
    let mut config = GripConfig::default();
    let result = ConfigLoader::apply_overrides(&mut config, |k| {
        (k == TIMEOUT_ENV).then(|| "soon".to_string())
    });
    assert!(result.is_err());
    assert_eq!(config.analysis.timeout_secs, 30);
}

#[tokio::test]
async fn test_load_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "analysis:\n  timeout_secs: 12\n  document_field: contract\nlogging:\n  level: debug"
    )
    .unwrap();

    let config = load_config(Some(file.path()), &ConfigOverrides::default())
        .await
        .unwrap();
    assert_eq!(config.analysis.timeout_secs, 12);
    assert_eq!(config.analysis.document_field, "contract");
    assert_eq!(config.logging.level, "debug");
}

#[tokio::test]
async fn test_missing_optional_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ConfigLoader::from_optional_file(dir.path().join("grip.yaml"))
        .await
        .unwrap();
    assert_eq!(config.documents, DocumentPolicy::default());
}

#[tokio::test]
async fn test_missing_required_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::from_file(dir.path().join("absent.yaml"))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::ConfigError(_)));
}

#[test]
fn test_invalid_yaml() {
    let err = ConfigLoader::from_str("analysis: [unclosed").unwrap_err();
    assert!(matches!(err, AnalysisError::ConfigError(ref m) if m.contains("YAML")));
}

#[tokio::test]
async fn test_overrides_apply_before_validation() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "analysis:\n  endpoint: ftp://contracts.internal/ask").unwrap();

    let err = load_config(Some(file.path()), &ConfigOverrides::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::ConfigError(_)));

    let overrides = ConfigOverrides {
        endpoint: Some("http://127.0.0.1:9100/ask".to_string()),
        timeout_secs: Some(8),
    };
    let config = load_config(Some(file.path()), &overrides).await.unwrap();
    assert_eq!(config.analysis.endpoint, "http://127.0.0.1:9100/ask");
    assert_eq!(config.analysis.timeout_secs, 8);
}

#[tokio::test]
async fn test_override_can_still_fail_validation() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "analysis:\n  timeout_secs: 20").unwrap();

    let overrides = ConfigOverrides {
        timeout_secs: Some(0),
        ..Default::default()
    };
    let err = load_config(Some(file.path()), &overrides).await.unwrap_err();
    assert!(matches!(err, AnalysisError::ConfigError(_)));
}

#[test]
fn test_from_str_leaves_validation_to_caller() {
    let config = ConfigLoader::from_str("analysis:\n  timeout_secs: 0").unwrap();
    assert_eq!(config.analysis.timeout_secs, 0);
    assert!(config.validate().is_err());
}
