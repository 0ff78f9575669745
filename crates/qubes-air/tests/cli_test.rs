//! Integration tests for the `qubes-air` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a server; the rest talk to a wiremock console.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `qubes-air` binary with env isolation.
///
/// Clears `QUBES_AIR_*` env vars and points config directories at a
/// temp dir so tests never touch the user's real configuration.
fn qubes_air_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("qubes-air");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("QUBES_AIR_PROFILE")
        .env_remove("QUBES_AIR_SERVER")
        .env_remove("QUBES_AIR_API_BASE_URL")
        .env_remove("QUBES_AIR_OUTPUT")
        .env_remove("QUBES_AIR_INSECURE")
        .env_remove("QUBES_AIR_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || {
        let home = tempfile::tempdir().unwrap();
        qubes_air_cmd(home.path()).args(&args).output().unwrap()
    })
    .await
    .unwrap()
}

fn args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut argv = vec!["--server".to_owned(), server.uri()];
    argv.extend(rest.iter().map(|s| (*s).to_owned()));
    argv
}

fn zone_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("zone-{id}"),
        "type": "proxmox",
        "status": status,
        "config": { "endpoint": "https://pve.lab:8006" },
        "created_at": "2025-03-01T12:00:00Z",
        "updated_at": "2025-03-01T12:00:00Z"
    })
}

fn qube_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("qube-{id}"),
        "zone_id": "z1",
        "type": "work",
        "status": status,
        "spec": { "vcpu": 2, "memory": 4096, "disk": 40, "template": "debian-12" },
        "created_at": "2025-03-01T12:00:00Z",
        "updated_at": "2025-03-01T12:00:00Z"
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = qubes_air_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = tempfile::tempdir().unwrap();
    qubes_air_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Qubes Air")
                .and(predicate::str::contains("zones"))
                .and(predicate::str::contains("qubes")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    qubes_air_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("qubes-air"));
}

#[test]
fn test_subcommand_help() {
    let home = tempfile::tempdir().unwrap();
    qubes_air_cmd(home.path())
        .args(["qubes", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("start").and(predicate::str::contains("stop")));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    qubes_air_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = tempfile::tempdir().unwrap();
    qubes_air_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = tempfile::tempdir().unwrap();
    let output = qubes_air_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("foobar") || text.contains("unrecognized"), "{text}");
}

#[test]
fn test_invalid_output_format() {
    let home = tempfile::tempdir().unwrap();
    qubes_air_cmd(home.path())
        .args(["-o", "xml", "zones", "list"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_unreachable_server_exit_code() {
    let home = tempfile::tempdir().unwrap();
    let output = qubes_air_cmd(home.path())
        .args(["--server", "http://127.0.0.1:1", "zones", "list"])
        .output()
        .unwrap();
    // Store loads record the failure instead of raising it
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Could not load zones"));
}

#[test]
fn test_health_unreachable_is_connection_error() {
    let home = tempfile::tempdir().unwrap();
    let output = qubes_air_cmd(home.path())
        .args(["--server", "http://127.0.0.1:1", "health"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    let output = qubes_air_cmd(home.path())
        .args(["--profile", "ghost", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("ghost"));
}

#[test]
fn test_delete_requires_yes_when_not_interactive() {
    let home = tempfile::tempdir().unwrap();
    let output = qubes_air_cmd(home.path())
        .args(["--server", "http://127.0.0.1:1", "qubes", "delete", "q1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_set_then_use() {
    let home = tempfile::tempdir().unwrap();
    qubes_air_cmd(home.path())
        .args(["--profile", "lab", "config", "set", "server", "https://air.lab"])
        .assert()
        .success();
    qubes_air_cmd(home.path())
        .args(["config", "use", "lab"])
        .assert()
        .success();
    qubes_air_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("default_profile = \"lab\"")
                .and(predicate::str::contains("server = \"https://air.lab\"")),
        );
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    qubes_air_cmd(home.path())
        .args(["config", "use", "nope"])
        .assert()
        .failure()
        .code(2);
}

// ── Against a console server ────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_zones_list_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "zones": [zone_json("z1", "connected"), zone_json("z2", "disconnected")],
            "total": 2
        })))
        .mount(&server)
        .await;

    let output = run(args(&server, &["-o", "plain", "zones", "list"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "z1\nz2");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zones_list_connected_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "zones": [zone_json("z1", "connected"), zone_json("z2", "disconnected")],
            "total": 2
        })))
        .mount(&server)
        .await;

    let output = run(args(&server, &["-o", "plain", "zones", "list", "--connected"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "z1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_qubes_list_filters_by_zone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/qubes"))
        .and(query_param("zone_id", "z1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "qubes": [qube_json("q1", "running")],
            "total": 1
        })))
        .mount(&server)
        .await;

    let output = run(args(&server, &["-o", "json", "qubes", "list", "-z", "z1"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["id"], "q1");
    assert_eq!(parsed[0]["status"], "running");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_qube_get_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/qubes/q9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "qube not found",
            "code": "NOT_FOUND"
        })))
        .mount(&server)
        .await;

    let output = run(args(&server, &["qubes", "get", "q9"])).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("qube 'q9' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_qube_start_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/qubes/q1/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(qube_json("q1", "running")))
        .mount(&server)
        .await;

    let output = run(args(&server, &["qubes", "start", "q1"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("is running"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_zone_create_requires_endpoint() {
    let server = MockServer::start().await;
    let output = run(args(
        &server,
        &["zones", "create", "--name", "lab", "--type", "proxmox"],
    ))
    .await;
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("endpoint"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_and_health() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "app": "qubes-air", "version": "0.1.0", "zones_count": 2, "qubes_count": 5
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "degraded", "database": "down"
        })))
        .mount(&server)
        .await;

    let output = run(args(&server, &["status"])).await;
    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Qubes: 5"));

    let output = run(args(&server, &["health"])).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("degraded"));
}
