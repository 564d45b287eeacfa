use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_empty_config() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert_eq!(config.dialect, Dialect::DuckDb);
    assert!(config.overrides.is_empty());
    assert_eq!(config.script, ScriptCallShapes::default());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
dialect: bigquery
overrides:
  core.transport_steps:
    - core.measured_carbonverses
  platform.events:
    - posthog.events
    - raw_events
script:
  remote_query_receiver: pandas
  query_member_prefix: sql
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.dialect, Dialect::BigQuery);
    assert_eq!(config.overrides.len(), 2);
    assert_eq!(
        config.overrides["platform.events"],
        vec!["posthog.events".to_string(), "raw_events".to_string()]
    );
    assert_eq!(config.script.remote_query_receiver, "pandas");
    assert_eq!(config.script.remote_query_member, "read_gbq");
    assert_eq!(config.script.query_member_prefix, "sql");
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("materialization: table");
    assert!(result.is_err());
}

#[test]
fn test_load_from_dir_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.dialect, Dialect::DuckDb);
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("lea.yaml"), "dialect: bigquery\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.dialect, Dialect::BigQuery);
}

#[test]
fn test_load_invalid_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("lea.yml"), "dialect: oracle\n").unwrap();
    let result = Config::load_from_dir(dir.path());
    assert!(matches!(result, Err(CoreError::ConfigParseError { .. })));
}
