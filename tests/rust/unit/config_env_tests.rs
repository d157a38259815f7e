use pathmap::config::{CliConfig, ConfigError, ResolverConfig};
use serial_test::serial;
use std::env;
use std::io::Write;

const VARS: [&str; 4] = [
    "PATHMAP_MAX_PATH_DEPTH",
    "PATHMAP_VALIDATE_TREAT",
    "PATHMAP_LOG",
    "PATHMAP_MODEL",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();
    let config = ResolverConfig::from_env().unwrap();
    assert_eq!(config, ResolverConfig::default());
}

#[test]
#[serial]
fn test_from_env_reads_variables() {
    clear_env();
    env::set_var("PATHMAP_MAX_PATH_DEPTH", "12");
    env::set_var("PATHMAP_VALIDATE_TREAT", "true");
    env::set_var("PATHMAP_LOG", "pathmap=trace");
    env::set_var("PATHMAP_MODEL", "model.yaml");

    let config = ResolverConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.max_path_depth, 12);
    assert!(config.validate_treat_targets);
    assert_eq!(config.log_filter, "pathmap=trace");
    assert_eq!(config.model_path.as_deref(), Some("model.yaml"));
}

#[test]
#[serial]
fn test_from_env_rejects_bad_values() {
    clear_env();
    env::set_var("PATHMAP_MAX_PATH_DEPTH", "deep");
    let result = ResolverConfig::from_env();
    clear_env();
    match result {
        Err(ConfigError::Parse { field, value, .. }) => {
            assert_eq!(field, "PATHMAP_MAX_PATH_DEPTH");
            assert_eq!(value, "deep");
        }
        other => panic!("expected a parse error, got {:?}", other),
    }

    env::set_var("PATHMAP_MAX_PATH_DEPTH", "0");
    let result = ResolverConfig::from_env();
    clear_env();
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn test_from_cli_validates() {
    let cli = CliConfig {
        max_path_depth: 2048,
        validate_treat_targets: false,
        log_filter: "info".to_string(),
        model_path: None,
    };
    assert!(matches!(
        ResolverConfig::from_cli(cli),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn test_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_path_depth: 5\nvalidate_treat_targets: true").unwrap();

    let config = ResolverConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.max_path_depth, 5);
    assert!(config.validate_treat_targets);
    // unspecified fields keep their defaults
    assert_eq!(config.log_filter, "info");
}

#[test]
fn test_from_missing_yaml_file() {
    let result = ResolverConfig::from_yaml_file("/nonexistent/pathmap.yaml");
    assert!(matches!(result, Err(ConfigError::Parse { field, .. }) if field == "yaml_file"));
}
