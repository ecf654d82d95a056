#![allow(clippy::unwrap_used)]
// Profile loading and translation to `PanelConfig`.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use sectorly_config::{
    Config, ConfigError, Profile, load_config_from, profile_to_panel_config, save_config_to,
};
use sectorly_core::TlsMode;

const SAMPLE: &str = r#"
default_profile = "home"

[defaults]
output = "json"

[profiles.home]
email = "user@example.com"
password = "hunter2"
panel_id = "12345"
code_format = 4
update_interval = 30
cycle_timeout = 0
timeout = 5
api_url = "http://127.0.0.1:9000"

[profiles.home.fetch]
fetch_temperatures = true
fetch_cameras = false

[profiles.cabin]
email = "user@example.com"
password = "pw"
panel_id = "67890"
insecure = true
"#;

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.default_profile.as_deref(), Some("default"));
    assert_eq!(config.defaults.output, "table");
    assert!(config.profiles.is_empty());
}

#[test]
fn profiles_load_from_toml() {
    let (_dir, path) = write_config(SAMPLE);
    let config = load_config_from(&path).unwrap();

    assert_eq!(config.defaults.output, "json");
    let (name, profile) = config.profile(None).unwrap();
    assert_eq!(name, "home");
    assert_eq!(profile.panel_id, "12345");
    assert!(profile.fetch.fetch_temperatures);
    assert!(!profile.fetch.fetch_cameras);
    // Unlisted switches keep their defaults.
    assert!(profile.fetch.fetch_humidity);

    let (_, cabin) = config.profile(Some("cabin")).unwrap();
    assert_eq!(cabin.insecure, Some(true));
    assert!(matches!(
        config.profile(Some("office")),
        Err(ConfigError::UnknownProfile { .. })
    ));
}

#[test]
fn profile_translates_to_panel_config() {
    let (_dir, path) = write_config(SAMPLE);
    let config = load_config_from(&path).unwrap();
    let (name, profile) = config.profile(None).unwrap();

    let panel = profile_to_panel_config(profile, name).unwrap();

    assert_eq!(panel.panel_id, "12345");
    assert_eq!(panel.base_url.as_str(), "http://127.0.0.1:9000/");
    assert_eq!(panel.code_format, 4);
    assert_eq!(panel.update_interval, Duration::from_secs(30));
    assert_eq!(panel.cycle_timeout, None);
    assert_eq!(panel.transport.request_timeout, Duration::from_secs(5));
    assert!(matches!(panel.transport.tls, TlsMode::System));
    assert!(panel.fetch.fetch_temperatures);
}

#[test]
fn defaults_apply_when_profile_is_sparse() {
    let profile = Profile {
        email: Some("user@example.com".into()),
        password: Some("pw".into()),
        panel_id: "1".into(),
        insecure: Some(true),
        ..Profile::default()
    };

    let panel = profile_to_panel_config(&profile, "sparse").unwrap();

    assert_eq!(panel.base_url.as_str(), "https://mypagesapi.sectoralarm.net/");
    assert_eq!(panel.code_format, 6);
    assert_eq!(panel.update_interval, Duration::from_secs(60));
    assert_eq!(panel.cycle_timeout, Some(Duration::from_secs(120)));
    assert!(matches!(panel.transport.tls, TlsMode::DangerAcceptInvalid));
    assert!(!panel.fetch.fetch_temperatures);
}

#[test]
fn plaintext_password_is_last_resort() {
    let profile = Profile {
        email: Some("user@example.com".into()),
        password: Some("from-file".into()),
        panel_id: "1".into(),
        ..Profile::default()
    };
    let panel = profile_to_panel_config(&profile, "plain-only").unwrap();
    assert_eq!(panel.credentials.password.expose_secret(), "from-file");
}

#[test]
fn empty_panel_id_is_rejected() {
    let profile = Profile {
        email: Some("user@example.com".into()),
        password: Some("pw".into()),
        ..Profile::default()
    };
    let err = profile_to_panel_config(&profile, "broken").unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "panel_id"));
}

#[test]
fn invalid_api_url_is_rejected() {
    let profile = Profile {
        email: Some("user@example.com".into()),
        password: Some("pw".into()),
        panel_id: "1".into(),
        api_url: Some("not a url".into()),
        ..Profile::default()
    };
    let err = profile_to_panel_config(&profile, "broken").unwrap_err();
    assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
}

#[test]
fn saved_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut config = Config::default();
    config.profiles.insert(
        "default".into(),
        Profile {
            email: Some("user@example.com".into()),
            panel_id: "42".into(),
            ..Profile::default()
        },
    );

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    let (_, profile) = loaded.profile(None).unwrap();
    assert_eq!(profile.panel_id, "42");
    assert_eq!(profile.email.as_deref(), Some("user@example.com"));
}
