use super::*;

use std::{
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_point_at_local_engine() {
    let settings = load_settings_from(None, no_env);
    assert_eq!(settings, EngineSettings::default());
    assert_eq!(settings.base_url().unwrap().as_str(), "http://127.0.0.1:8000/");
}

#[test]
fn file_values_override_defaults() {
    let raw = r#"
        host = "10.0.0.5"
        port = 9001
        request_timeout_secs = "5"
        refresh_after_sync = true
    "#;
    let settings = load_settings_from(Some(raw), no_env);
    assert_eq!(settings.host, "10.0.0.5");
    assert_eq!(settings.port, 9001);
    assert_eq!(settings.request_timeout, Duration::from_secs(5));
    assert!(settings.refresh_after_sync);
}

#[test]
fn environment_overrides_file_and_app_alias_wins_last() {
    let raw = r#"port = "9001""#;
    let settings = load_settings_from(Some(raw), |name| match name {
        "CONTEXTSYNC_PORT" => Some("9100".into()),
        "APP__PORT" => Some("9200".into()),
        "CONTEXTSYNC_HOST" => Some("engine.local".into()),
        _ => None,
    });
    assert_eq!(settings.port, 9200);
    assert_eq!(settings.host, "engine.local");
}

#[test]
fn invalid_values_keep_previous_layer() {
    let raw = r#"
        port = "not-a-port"
        request_timeout_secs = "0"
    "#;
    let settings = load_settings_from(Some(raw), |name| {
        (name == "CONTEXTSYNC_REFRESH_AFTER_SYNC").then(|| "maybe".to_string())
    });
    assert_eq!(settings.port, 8000);
    assert_eq!(settings.request_timeout, Duration::from_secs(30));
    assert!(!settings.refresh_after_sync);
}

#[test]
fn empty_host_keeps_previous_layer() {
    let raw = r#"host = "10.0.0.5""#;
    let settings = load_settings_from(Some(raw), |name| match name {
        "CONTEXTSYNC_HOST" => Some("   ".into()),
        _ => None,
    });
    assert_eq!(settings.host, "10.0.0.5");
}

#[test]
fn unparseable_file_is_ignored() {
    let settings = load_settings_from(Some("port = [unterminated"), no_env);
    assert_eq!(settings, EngineSettings::default());
}

#[test]
fn invalid_host_fails_base_url() {
    let settings = EngineSettings {
        host: "bad host".into(),
        ..EngineSettings::default()
    };
    assert!(matches!(
        settings.base_url(),
        Err(SettingsError::InvalidAddress { .. })
    ));
}

#[test]
fn loads_settings_file_from_explicit_path() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();

    let temp_root = env::temp_dir().join(format!("contextsync_settings_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("contextsync.toml");
    fs::write(&path, "host = \"192.168.1.20\"\n").expect("write settings");

    let settings = load_settings(Some(&path));
    assert_eq!(settings.host, "192.168.1.20");

    fs::remove_dir_all(temp_root).expect("cleanup");
}
