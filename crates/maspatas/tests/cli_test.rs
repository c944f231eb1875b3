//! Integration tests for the `maspatas` CLI binary.
//!
//! Argument parsing, help, completions and config run without a backend;
//! the rest talk to a wiremock server standing in for the MasPatas API.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::process::Output;

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `maspatas` binary with env isolation.
///
/// Clears every `MASPATAS_*` override and points config, data and the
/// credential file into `home` so tests never touch real state.
fn maspatas_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("maspatas");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env("MASPATAS_CONFIG", home.join("config.toml"))
        .env("MASPATAS_CREDENTIAL_FILE", home.join("token"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("MASPATAS_API_URL")
        .env_remove("MASPATAS_ORIGIN")
        .env_remove("MASPATAS_OUTPUT")
        .env_remove("MASPATAS_TIMEOUT")
        .env_remove("MASPATAS_USERNAME")
        .env_remove("MASPATAS_PASSWORD")
        .env_remove("MASPATAS_CREDENTIAL_STORE")
        .env_remove("MASPATAS_INSECURE");
    cmd
}

/// Run against `server`'s `/api` without blocking the runtime wiremock uses.
async fn run_against(server: &MockServer, home: &Path, args: &[&str]) -> Output {
    let mut cmd = maspatas_cmd(home);
    cmd.arg("--api-url")
        .arg(format!("{}/api", server.uri()))
        .args(args);
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

async fn mount_collections(server: &MockServer) {
    let bodies = [
        (
            "/api/products",
            json!([{"id": "P-001", "name": "Collar", "sku": "COL-1", "price_amount": "9.99", "currency": "USD"}]),
        ),
        (
            "/api/clients",
            json!([{"id": "C-001", "full_name": "Ana Pérez", "email": "ana@example.com"}]),
        ),
        (
            "/api/inventory",
            json!([{"product_id": "P-001", "stock": 15}, {"product_id": "P-002", "stock": 8}]),
        ),
        (
            "/api/sales",
            json!([
                {"sale_id": "S-1", "client_id": "C-001", "total_amount": "19.98", "currency": "USD"},
                {"sale_id": "S-2", "client_id": "C-001", "total_amount": "0.015", "currency": "USD"}
            ]),
        ),
    ];
    for (route, body) in bodies {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = maspatas_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn help_lists_the_resources() {
    let home = TempDir::new().unwrap();
    maspatas_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("products")
            .and(predicate::str::contains("sales"))
            .and(predicate::str::contains("login"))
            .and(predicate::str::contains("summary")),
    );
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    maspatas_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("maspatas"));
}

#[test]
fn completions_zsh() {
    let home = TempDir::new().unwrap();
    maspatas_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn completions_bash() {
    let home = TempDir::new().unwrap();
    maspatas_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Argument errors ─────────────────────────────────────────────────

#[test]
fn invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = maspatas_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("foobar"));
}

#[test]
fn sale_create_needs_at_least_one_line() {
    let home = TempDir::new().unwrap();
    maspatas_cmd(home.path())
        .args(["sales", "create", "--id", "S-9", "--client", "C-001"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--line"));
}

#[test]
fn malformed_sale_line_is_rejected_by_the_parser() {
    let home = TempDir::new().unwrap();
    maspatas_cmd(home.path())
        .args([
            "sales", "create", "--id", "S-9", "--client", "C-001", "--line", "P-001",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PRODUCT:QTY"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn config_path_honours_the_override() {
    let home = TempDir::new().unwrap();
    maspatas_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_show_without_a_file_renders_defaults() {
    let home = TempDir::new().unwrap();
    maspatas_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#"api_url = "/api""#)
                .and(predicate::str::contains(r#"username = "admin""#)),
        );
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn products_list_renders_a_table_and_plain_ids() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    let home = TempDir::new().unwrap();

    let output = run_against(&server, home.path(), &["products", "list"]).await;
    output
        .assert()
        .success()
        .stdout(predicate::str::contains("Collar").and(predicate::str::contains("9.99 USD")));

    let output = run_against(&server, home.path(), &["-o", "plain", "products", "list"]).await;
    output.assert().success().stdout("P-001\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_product_exits_not_found_with_backend_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products/P-404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Producto no encontrado"})),
        )
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let output = run_against(&server, home.path(), &["products", "get", "P-404"]).await;
    output
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Producto no encontrado"));
}

#[tokio::test(flavor = "multi_thread")]
async fn summary_json_keeps_revenue_exact() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    let home = TempDir::new().unwrap();

    let output = run_against(&server, home.path(), &["-o", "json", "summary"]).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["total_stock"], 23);
    assert_eq!(summary["total_revenue"], "19.995");
    assert_eq!(summary["sales"], 2);
}

#[tokio::test]
async fn unreachable_backend_exits_with_connection_code() {
    let home = TempDir::new().unwrap();
    let mut cmd = maspatas_cmd(home.path());
    cmd.args(["--api-url", "http://127.0.0.1:9/api", "--timeout", "5", "health"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}

// ── Session and guarded creates ─────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn create_without_login_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let output = run_against(
        &server,
        home.path(),
        &[
            "products", "create", "--id", "P1", "--name", "Collar", "--sku", "COL-1", "--price",
            "9.99",
        ],
    )
    .await;
    output
        .assert()
        .code(3)
        .stderr(predicate::str::contains("maspatas login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn login_stores_the_token_and_status_reports_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .and(body_json(json!({"username": "admin", "password": "maspatas123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "admin-token",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    let output = run_against(&server, home.path(), &["login", "--password", "maspatas123"]).await;
    output
        .assert()
        .success()
        .stderr(predicate::str::contains("Session started."));
    assert_eq!(
        std::fs::read_to_string(home.path().join("token")).unwrap(),
        "admin-token"
    );

    let output = run_against(&server, home.path(), &["-o", "json", "status"]).await;
    let status: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["authenticated"], true);

    let output = run_against(&server, home.path(), &["logout"]).await;
    output
        .assert()
        .success()
        .stderr(predicate::str::contains("Session closed."));
    assert!(!home.path().join("token").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn sale_create_sends_integer_quantities_with_the_stored_token() {
    let server = MockServer::start().await;
    mount_collections(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/sales"))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_json(json!({
            "sale_id": "S-9",
            "client_id": "C-001",
            "lines": [
                {"product_id": "P-001", "quantity": 2},
                {"product_id": "P-002", "quantity": 1}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "sale_id": "S-9",
            "total_amount": "29.97",
            "currency": "USD"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("token"), "admin-token").unwrap();

    let output = run_against(
        &server,
        home.path(),
        &[
            "-o", "plain", "sales", "create", "--id", "S-9", "--client", "C-001", "--line",
            "P-001:2", "--line", "P-002:1",
        ],
    )
    .await;
    output
        .assert()
        .success()
        .stdout("S-9\n")
        .stderr(predicate::str::contains("Sale registered."));
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_token_suggests_logging_in_again() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token inválido"})))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("token"), "stale-token").unwrap();

    let output = run_against(
        &server,
        home.path(),
        &[
            "clients", "create", "--id", "C-9", "--name", "Luis", "--email", "luis@example.com",
        ],
    )
    .await;
    output
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Token inválido").and(predicate::str::contains("login")));
    // The stale token is reported, not discarded.
    assert_eq!(
        std::fs::read_to_string(home.path().join("token")).unwrap(),
        "stale-token"
    );
}
