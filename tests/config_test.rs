use std::fs;

use tempfile::tempdir;

use focusbrowser::config::{load_settings, ConfigError, CookiePersistence, SETTINGS_FILE};

#[test]
fn first_run_writes_the_template_and_loads_it() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().join("focusbrowser");

    let settings = load_settings(&config_dir).unwrap();

    assert!(config_dir.join(SETTINGS_FILE).exists());
    assert_eq!(settings.default_url, "https://en.wikipedia.org/");
    assert!(!settings.whitelist_regexes.is_empty());
    assert_eq!(settings.cookie_persistence, CookiePersistence::Engine);
}

#[test]
fn second_load_reads_the_same_file() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().to_path_buf();

    let first = load_settings(&config_dir).unwrap();
    let second = load_settings(&config_dir).unwrap();
    assert_eq!(first.default_url, second.default_url);
    assert_eq!(first.whitelist_regexes, second.whitelist_regexes);
}

#[test]
fn user_edits_survive_a_reload() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().to_path_buf();
    fs::write(
        config_dir.join(SETTINGS_FILE),
        r#"{
            "default url": "https://example.com/",
            "whitelist regexes": ["https://example\\.com/.*"],
            "cookie persistence": "json"
        }"#,
    )
    .unwrap();

    let settings = load_settings(&config_dir).unwrap();
    assert_eq!(settings.default_url, "https://example.com/");
    assert_eq!(settings.whitelist_regexes, vec![r"https://example\.com/.*"]);
    assert_eq!(settings.cookie_persistence, CookiePersistence::Json);
}

#[test]
fn malformed_json_is_fatal() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().to_path_buf();
    fs::write(config_dir.join(SETTINGS_FILE), "{ not json").unwrap();

    match load_settings(&config_dir) {
        Err(ConfigError::Parse { .. }) => {}
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn missing_required_keys_are_fatal() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().to_path_buf();
    fs::write(
        config_dir.join(SETTINGS_FILE),
        r#"{ "default url": "https://example.com/" }"#,
    )
    .unwrap();

    assert!(matches!(
        load_settings(&config_dir),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn cookie_persistence_defaults_to_engine() {
    let dir = tempdir().unwrap();
    let config_dir = dir.path().to_path_buf();
    fs::write(
        config_dir.join(SETTINGS_FILE),
        r#"{
            "default url": "https://example.com/",
            "whitelist regexes": []
        }"#,
    )
    .unwrap();

    let settings = load_settings(&config_dir).unwrap();
    assert_eq!(settings.cookie_persistence, CookiePersistence::Engine);
}
