//! End-to-end tests for the `bookshare` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bookshare(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bookshare").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("BOOKSHARE_CONFIG")
        .env_remove("BOOKSHARE_MAP_TOKEN")
        .env_remove("RUST_LOG")
        .env("BOOKSHARE_SESSION", dir.path().join("session.json"));
    cmd
}

#[test]
fn test_distance_one_degree_at_equator() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .args(["distance", "0", "0", "0", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("111.19 km"));
}

#[test]
fn test_distance_json() {
    let dir = TempDir::new().unwrap();
    let output = bookshare(&dir)
        .args(["--json", "distance", "40.7128", "-74.0060", "40.7128", "-74.0060"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["distance_km"], 0.0);
    assert_eq!(value["from"]["latitude"], 40.7128);
}

#[test]
fn test_distance_rejects_invalid_coordinate() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .args(["distance", "95", "0", "0", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("✗"));
}

#[test]
fn test_nearby_rejects_radius_out_of_range() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .args(["nearby", "--radius", "80"])
        .assert()
        .code(2);
}

#[test]
fn test_nearby_without_backend_url() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .env_remove("SUPABASE_URL")
        .args(["nearby", "--lat", "40.7", "--lng", "-74.0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("SUPABASE_URL"));
}

#[test]
fn test_missing_config_file() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .args(["--config", "nope.toml", "nearby"])
        .assert()
        .code(3);
}

#[test]
fn test_render_unknown_backend() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .args(["render", "--backend", "atlas"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown map backend"));
}

#[test]
fn test_search_rejects_unknown_condition() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .args(["search", "calculus", "--condition", "mint"])
        .assert()
        .code(2);
}

#[test]
fn test_session_sign_in_show_sign_out() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .args(["session", "sign-in", "user-7", "--name", "Ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Ada"));

    let output = bookshare(&dir).args(["--json", "session", "show"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["signed_in"], true);
    assert_eq!(value["session"]["user_id"], "user-7");
    assert!(value["session"].get("map_credential").is_none());

    bookshare(&dir).args(["session", "sign-out"]).assert().success();
    bookshare(&dir)
        .args(["session", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_render_token_is_not_saved() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .env_remove("SUPABASE_URL")
        .args(["render", "--backend", "mapbox", "--token", "pk.keep-me-secret", "--radius", "10"])
        .assert()
        .code(3);

    let session = dir.path().join("session.json");
    if session.exists() {
        let raw = std::fs::read_to_string(session).unwrap();
        assert!(!raw.contains("keep-me-secret"));
    }
}

#[test]
fn test_session_sign_in_rejects_blank_user() {
    let dir = TempDir::new().unwrap();
    bookshare(&dir)
        .args(["session", "sign-in", "  "])
        .assert()
        .code(2);
}
