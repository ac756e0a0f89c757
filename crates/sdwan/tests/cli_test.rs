//! Integration tests for the `sdwan` CLI binary.
//!
//! Argument parsing, help output, completions, and configuration errors run
//! without a controller; the end-to-end cases drive the binary against a
//! wiremock controller.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

const ISOLATED: &str = "/tmp/sdwan-cli-test-nonexistent";

/// Build a [`Command`] for the `sdwan` binary with env isolation.
///
/// Clears all `SDWAN_*` env vars and points config lookups at a
/// nonexistent path so tests never touch the user's real configuration.
fn sdwan_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sdwan");
    cmd.env("HOME", ISOLATED)
        .env("XDG_CONFIG_HOME", ISOLATED)
        .env("SDWAN_CONFIG", format!("{ISOLATED}/config.toml"))
        .env_remove("SDWAN_PROFILE")
        .env_remove("SDWAN_URL")
        .env_remove("SDWAN_IP")
        .env_remove("SDWAN_PORT")
        .env_remove("SDWAN_BASE_PATH")
        .env_remove("SDWAN_USERNAME")
        .env_remove("SDWAN_PASSWORD")
        .env_remove("SDWAN_OUTPUT")
        .env_remove("SDWAN_INSECURE")
        .env_remove("SDWAN_CA_CERT")
        .env_remove("SDWAN_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `sdwan_cmd` pointed at a mock controller with credentials in the env.
fn controller_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = sdwan_cmd();
    cmd.env("SDWAN_URL", server.uri())
        .env("SDWAN_USERNAME", "admin")
        .env("SDWAN_PASSWORD", "admin");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .and(body_string_contains("j_username=admin"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("Set-Cookie", "JSESSIONID=abc123; Path=/"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataservice/client/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-42"))
        .mount(server)
        .await;
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sdwan_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sdwan_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("SD-WAN")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("templates"))
            .and(predicate::str::contains("attach"))
            .and(predicate::str::contains("detach")),
    );
}

#[test]
fn test_version_flag() {
    sdwan_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sdwan"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sdwan_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sdwan_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = sdwan_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_devices_list_without_controller_is_usage_error() {
    sdwan_cmd()
        .args(["devices", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("controller host"));
}

#[test]
fn test_host_without_port_is_usage_error() {
    sdwan_cmd()
        .args(["--host", "10.10.20.90", "devices", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("controller port"));
}

#[test]
fn test_unknown_profile_is_reported() {
    sdwan_cmd()
        .args(["--profile", "nope", "devices", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_invalid_output_format() {
    let output = sdwan_cmd()
        .args(["--output", "invalid", "devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_invalid_poll_interval() {
    let output = sdwan_cmd()
        .args(["action", "wait", "push-1", "--poll-interval", "soon"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_zero_poll_interval_is_rejected() {
    sdwan_cmd()
        .args(["action", "wait", "push-1", "--poll-interval", "0s"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("poll-interval"));
}

#[test]
fn test_sub_minimum_poll_interval_is_rejected() {
    sdwan_cmd()
        .args([
            "detach", "--target", "u1", "--sysip", "1.1.1.1", "--poll-interval", "5ms",
        ])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    sdwan_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_set_then_show_and_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    for (key, value) in [("host", "10.10.20.90"), ("port", "8443"), ("password", "hunter2")] {
        sdwan_cmd()
            .env("SDWAN_CONFIG", &config)
            .args(["config", "set", key, value])
            .assert()
            .success();
    }

    sdwan_cmd()
        .env("SDWAN_CONFIG", &config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("host = \"10.10.20.90\"")
                .and(predicate::str::contains("port = 8443"))
                .and(predicate::str::contains("hunter2").not()),
        );

    sdwan_cmd()
        .env("SDWAN_CONFIG", &config)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *"));
}

#[test]
fn test_config_set_rejects_bad_port() {
    let dir = tempfile::tempdir().unwrap();
    sdwan_cmd()
        .env("SDWAN_CONFIG", dir.path().join("config.toml"))
        .args(["config", "set", "port", "eighty"])
        .assert()
        .code(2);
}

const BROKEN_CONFIG: &str = "default_profile = \"lab\"\n[profiles.lab\nhost = \"10.10.20.90\"\n";

#[test]
fn test_config_set_leaves_unparseable_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, BROKEN_CONFIG).unwrap();

    let output = sdwan_cmd()
        .env("SDWAN_CONFIG", &config)
        .args(["config", "set", "port", "8443"])
        .output()
        .unwrap();

    assert!(!output.status.success(), "{}", combined_output(&output));
    assert_eq!(std::fs::read_to_string(&config).unwrap(), BROKEN_CONFIG);
}

#[test]
fn test_config_set_does_not_persist_environment() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    sdwan_cmd()
        .env("SDWAN_CONFIG", &config)
        .env("SDWAN_PROFILES__LEAKED__HOST", "10.9.9.9")
        .args(["config", "set", "host", "10.10.20.90"])
        .assert()
        .success();

    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("10.10.20.90"), "{written}");
    assert!(!written.contains("leaked"), "{written}");
    assert!(!written.contains("10.9.9.9"), "{written}");
}

#[test]
fn test_unparseable_config_is_reported_instead_of_missing_host() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, BROKEN_CONFIG).unwrap();

    let output = sdwan_cmd()
        .env("SDWAN_CONFIG", &config)
        .args(["devices", "list"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1), "{}", combined_output(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Configuration error"), "{stderr}");
    assert!(!stderr.contains("controller host"), "{stderr}");
}

// ── Against a mock controller ───────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_json() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/dataservice/device"))
        .and(header("X-XSRF-TOKEN", "tok-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "host-name": "r1",
                "device-type": "vedge",
                "uuid": "u1",
                "system-ip": "1.1.1.1",
                "site-id": "100",
                "version": "20.6",
                "device-model": "vedge-100"
            }]
        })))
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["-o", "json-compact", "devices", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let devices: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(devices[0]["hostName"], "r1");
    assert_eq!(devices.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_templates_table_lists_template_columns() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/dataservice/template/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "templateId": "t-1",
                "templateName": "branch",
                "deviceType": "vedge-cloud",
                "devicesAttached": 2,
                "templateAttached": 7
            }]
        })))
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["templates", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Template Name"));
    assert!(stdout.contains("branch"));
    assert!(stdout.contains("t-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataservice/client/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-42"))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["devices", "list"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Authentication failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_attach_waits_for_done() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/dataservice/template/device/config/attachfeature"))
        .and(body_string_contains("\"csv-host-name\":\"r1\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "push-1"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataservice/device/action/status/push-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"summary": {"status": "pending"}})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataservice/device/action/status/push-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": {"status": "done", "count": {"Success": 1}}
        })))
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args([
        "--yes",
        "attach",
        "--template",
        "t-1",
        "--target",
        "u1",
        "--hostname",
        "r1",
        "--sysip",
        "1.1.1.1",
        "--skip-inputs",
        "--poll-interval",
        "100ms",
    ]);
    let output = run(cmd).await;

    let text = combined_output(&output);
    assert!(output.status.success(), "{text}");
    assert!(text.contains("done after 2 poll(s)"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_detach_no_wait_prints_action_id() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/dataservice/template/config/device/mode/cli"))
        .and(body_string_contains("\"deviceIP\":\"1.1.1.1\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "cli-7"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args([
        "-y", "-o", "plain", "detach", "--target", "u1", "--sysip", "1.1.1.1", "--no-wait",
    ]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "cli-7");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_detach_requires_yes_without_terminal() {
    let server = MockServer::start().await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["detach", "--target", "u1", "--sysip", "1.1.1.1"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("requires confirmation"));
    // Refused before logging in
    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty(), "unexpected requests: {received:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_action_exits_with_action_code() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/dataservice/device/action/status/push-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": {"status": "done", "count": {"Success": 0, "Failure": 1}}
        })))
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args(["action", "wait", "push-3", "--poll-interval", "100ms"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(9), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stuck_action_exits_with_timeout_code() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/dataservice/device/action/status/push-4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"summary": {"status": "in_progress"}})),
        )
        .mount(&server)
        .await;

    let mut cmd = controller_cmd(&server);
    cmd.args([
        "action",
        "wait",
        "push-4",
        "--poll-interval",
        "100ms",
        "--wait-timeout",
        "300ms",
    ]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(8), "{}", combined_output(&output));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_interrupt_during_login_exits_promptly() {
    use std::process::{Command, Stdio};
    use std::time::{Duration, Instant};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/j_security_check"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "JSESSIONID=abc123; Path=/")
                .set_delay(Duration::from_secs(60)),
        )
        .mount(&server)
        .await;

    let mut child = Command::new(env!("CARGO_BIN_EXE_sdwan"))
        .env("HOME", ISOLATED)
        .env("XDG_CONFIG_HOME", ISOLATED)
        .env("SDWAN_CONFIG", format!("{ISOLATED}/config.toml"))
        .env("SDWAN_URL", server.uri())
        .env("SDWAN_USERNAME", "admin")
        .env("SDWAN_PASSWORD", "admin")
        .env_remove("SDWAN_PROFILE")
        .args(["devices", "list"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Wait until the login request is in flight
    let started = Instant::now();
    while server.received_requests().await.unwrap().is_empty() {
        assert!(started.elapsed() < Duration::from_secs(10), "login never arrived");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    tokio::time::sleep(Duration::from_millis(200)).await;

    let sent = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(sent.success());

    let interrupted = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if interrupted.elapsed() > Duration::from_secs(5) {
            child.kill().unwrap();
            panic!("sdwan kept running after SIGINT");
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    };

    assert_eq!(status.code(), Some(130));
}
