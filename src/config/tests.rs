use super::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_empty_config_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.validation_options(), ValidationOptions::default());
    assert!(config.output.pretty);
    assert_eq!(config.output.log_level, "warn");
}

#[test]
fn test_parse_full_config() {
    let content = r#"
[registry]
path = "ops/operations.json"

[validation]
max_suggestions = 5
max_edit_distance = 2
fallback_operations = 10

[output]
pretty = false
log_level = "debug"
"#;

    let config = Config::parse(content).unwrap();
    assert_eq!(config.registry.path, Some(PathBuf::from("ops/operations.json")));
    assert_eq!(
        config.validation_options(),
        ValidationOptions {
            max_suggestions: 5,
            max_edit_distance: 2,
            fallback_operations: 10,
        }
    );
    assert!(!config.output.pretty);
    assert_eq!(config.output.log_level, "debug");
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::parse("[validation]\nmax_suggestions = 1\n").unwrap();
    assert_eq!(config.validation.max_suggestions, 1);
    assert_eq!(config.validation.max_edit_distance, 3);
    assert_eq!(config.validation.fallback_operations, 5);
}

#[test]
fn test_unknown_keys_are_rejected() {
    let err = Config::parse("[validation]\nmax_suggestion = 1\n").unwrap_err();
    assert!(err.contains("max_suggestion"), "{}", err);
}

#[test]
fn test_discover_walks_up_from_input_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "[registry]\npath = \"operations.json\"\n",
    )
    .unwrap();
    let nested = dir.path().join("src").join("scenes");
    std::fs::create_dir_all(&nested).unwrap();
    let input = nested.join("intro.json");
    std::fs::write(&input, "{}").unwrap();

    let config = Config::discover(&input).unwrap();
    assert_eq!(config.root.as_deref(), Some(dir.path()));
    assert_eq!(
        config.registry_path(),
        Some(dir.path().join("operations.json"))
    );
}

#[test]
fn test_discover_without_file_is_default() {
    let dir = TempDir::new().unwrap();
    let config = Config::discover(dir.path()).unwrap();
    assert_eq!(config, Config::default());
    assert!(config.registry_path().is_none());
}

#[test]
fn test_load_reports_path_on_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    std::fs::write(&path, "[output]\npretty = \"yes\"\n").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains(CONFIG_FILE));
}

#[test]
fn test_load_registry_from_configured_path() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("operations.json"),
        r#"{ "blink": { "parameters": [ { "name": "times", "type": "ParameterType:number" } ] } }"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "[registry]\npath = \"operations.json\"\n",
    )
    .unwrap();

    let config = Config::discover(dir.path()).unwrap();
    let registry = config.load_registry().unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["blink"]);
}

#[test]
fn test_missing_registry_file_is_an_error() {
    let config = Config {
        registry: RegistryConfig {
            path: Some(PathBuf::from("/nonexistent/operations.json")),
        },
        ..Config::default()
    };
    assert!(matches!(
        config.load_registry(),
        Err(ConfigError::Registry(RegistryError::Io { .. }))
    ));
}
