//! Integration tests for the `sectorly` CLI binary.
//!
//! Argument parsing, help output, completions, and error handling run
//! without a network. Panel-bound commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `sectorly` binary with env isolation.
///
/// Clears all `SECTORLY_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn sectorly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sectorly");
    cmd.env("HOME", "/tmp/sectorly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sectorly-cli-test-nonexistent")
        .env_remove("SECTORLY_PROFILE")
        .env_remove("SECTORLY_CONFIG")
        .env_remove("SECTORLY_PANEL_ID")
        .env_remove("SECTORLY_API_URL")
        .env_remove("SECTORLY_OUTPUT")
        .env_remove("SECTORLY_INSECURE")
        .env_remove("SECTORLY_TIMEOUT")
        .env_remove("SECTORLY_EMAIL")
        .env_remove("SECTORLY_PASSWORD")
        .env_remove("SECTORLY_CODE")
        .env_remove("RUST_LOG")
        .write_stdin("");
    cmd
}

/// A command bound to a config file whose only profile targets `api_url`.
/// The password comes from the environment so the keyring is never read.
fn panel_cmd(dir: &Path, api_url: &str) -> assert_cmd::Command {
    let config = dir.join("config.toml");
    std::fs::write(
        &config,
        format!(
            r#"
default_profile = "home"

[profiles.home]
email = "user@example.com"
panel_id = "12345"
api_url = "{api_url}"
cycle_timeout = 5

[profiles.home.fetch]
fetch_humidity = false
fetch_leakage_detectors = false
fetch_smoke_detectors = false
fetch_doors_windows = true
fetch_cameras = false
fetch_smartplugs = false
"#
        ),
    )
    .unwrap();

    let mut cmd = sectorly_cmd();
    cmd.arg("--config")
        .arg(&config)
        .env("SECTORLY_PASSWORD", "hunter2");
    cmd
}

/// Run a prepared command off the async runtime.
async fn run(mut cmd: assert_cmd::Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

async fn mount_json(server: &MockServer, verb: &str, route: &str, body: serde_json::Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_panel(server: &MockServer) {
    mount_json(
        server,
        "POST",
        "/api/Login/Login",
        json!({"AuthorizationToken": "tok"}),
    )
    .await;
    mount_json(
        server,
        "POST",
        "/api/v2/housecheck/doorsandwindows",
        json!({"Sections": [{"Places": [{"Components": [
            {"SerialNo": "D1", "Label": "Hall", "Type": "1", "Closed": true}
        ]}]}]}),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/api/panel/GetPanelStatus",
        json!({"Status": 3, "IsOnline": true, "SerialNo": "P1"}),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/api/panel/GetLockStatus",
        json!([{"Serial": "X1", "Label": "Front Door", "Status": "unlock"}]),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/api/v2/panel/logs",
        json!([{"LockName": "Front Door", "EventType": "unlock", "Time": "t1", "User": "u"}]),
    )
    .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sectorly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sectorly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Sector Alarm")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("arm"))
            .and(predicate::str::contains("unlock")),
    );
}

#[test]
fn test_version_flag() {
    sectorly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sectorly"));
}

#[test]
fn test_completions_zsh() {
    sectorly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    sectorly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    sectorly_cmd().arg("foobar").assert().failure().code(2);
}

#[test]
fn test_invalid_output_format() {
    sectorly_cmd()
        .args(["--output", "invalid", "status"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_status_without_config() {
    sectorly_cmd()
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No panel configured"));
}

#[test]
fn test_unknown_profile() {
    let dir = TempDir::new().unwrap();
    panel_cmd(dir.path(), "http://127.0.0.1:9")
        .args(["--profile", "cabin", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cabin"));
}

#[test]
fn test_config_show_without_file() {
    sectorly_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_show_masks_password() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "[profiles.home]\npanel_id = \"1\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    sectorly_cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[profiles.home]").and(predicate::str::contains("hunter2").not()));
}

#[test]
fn test_wrong_code_length_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    panel_cmd(dir.path(), "http://127.0.0.1:9")
        .args(["arm", "--code", "12"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("expected 6 digits"));
}

#[test]
fn test_unlock_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    panel_cmd(dir.path(), "http://127.0.0.1:9")
        .args(["unlock", "X1", "--code", "123456"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Against a mock panel ────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json() {
    let server = MockServer::start().await;
    mount_panel(&server).await;
    let dir = TempDir::new().unwrap();

    let mut cmd = panel_cmd(dir.path(), &server.uri());
    cmd.args(["--output", "json", "status"]);
    let assert = run(cmd).await.success();

    let body: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(body["panel_status"]["Status"], 3);
    assert_eq!(body["devices"]["D1"]["model"], "Door/Window Sensor");
    assert_eq!(body["devices"]["X1"]["sensors"]["lock_status"], "unlock");
    assert_eq!(body["logs"]["X1"]["unlock"][0]["time"], "t1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_table() {
    let server = MockServer::start().await;
    mount_panel(&server).await;
    let dir = TempDir::new().unwrap();

    let mut cmd = panel_cmd(dir.path(), &server.uri());
    cmd.args(["--color", "never", "status"]);
    run(cmd).await.success().stdout(
        predicate::str::contains("armed_away")
            .and(predicate::str::contains("0/1 locked")),
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_plain() {
    let server = MockServer::start().await;
    mount_panel(&server).await;
    let dir = TempDir::new().unwrap();

    let mut cmd = panel_cmd(dir.path(), &server.uri());
    cmd.args(["-o", "plain", "devices"]);
    run(cmd).await.success().stdout("D1\nX1\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/Login/Login"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let cmd = {
        let mut cmd = panel_cmd(dir.path(), &server.uri());
        cmd.arg("status");
        cmd
    };
    run(cmd)
        .await
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Authentication failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_arm_partial_with_code_from_env() {
    let server = MockServer::start().await;
    mount_panel(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/Panel/PartialArm"))
        .and(body_json(json!({"PanelCode": "123456", "PanelId": "12345"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let mut cmd = panel_cmd(dir.path(), &server.uri());
    cmd.env("SECTORLY_CODE", "123456").args(["arm", "partial"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Panel armed (partial)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_plug_exits_with_rejected_code() {
    let server = MockServer::start().await;
    mount_panel(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/smartplugs/off"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let mut cmd = panel_cmd(dir.path(), &server.uri());
    cmd.args(["plug", "off", "SP1"]);
    run(cmd).await.failure().code(5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_camera_writes_image() {
    let server = MockServer::start().await;
    mount_panel(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/panel/GetCameraImage"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0xFF, 0xD8, 0xFF], "image/jpeg"))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let image = dir.path().join("cam.jpg");

    let mut cmd = panel_cmd(dir.path(), &server.uri());
    cmd.args(["camera", "C1", "--file"]).arg(&image);
    run(cmd).await.success();

    assert_eq!(std::fs::read(&image).unwrap(), vec![0xFF, 0xD8, 0xFF]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_diagnostics_redacts_password() {
    let server = MockServer::start().await;
    mount_panel(&server).await;
    let dir = TempDir::new().unwrap();

    let mut cmd = panel_cmd(dir.path(), &server.uri());
    cmd.arg("diagnostics");
    let assert = run(cmd).await.success();

    let body: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(body["config"]["password"], "**REDACTED**");
    assert_eq!(body["config"]["email"], "user@example.com");
    assert!(body["last_error"].is_null());
    assert!(!String::from_utf8_lossy(&assert.get_output().stdout).contains("hunter2"));
}
