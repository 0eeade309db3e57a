#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::{Method::POST, MockServer};
use predicates::str::contains;
use serde_json::json;

fn kiosk_admin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("kiosk-admin"));
    cmd.env_remove("KIOSK_ADMIN_CONFIG_FILE")
        .env_remove("KIOSK_ADMIN__API__BASE_URL")
        .env_remove("KIOSK_ADMIN__API__TOKEN");
    cmd
}

#[test]
fn reorder_posts_dense_positions() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/admin/buttons/reorder")
            .header("cookie", "access_token=\"Bearer secret\"")
            .json_body(json!({
                "items": [
                    {"id": 2, "order_index": 1},
                    {"id": 1, "order_index": 2}
                ]
            }));
        then.status(200).json_body(json!({"ok": true}));
    });

    kiosk_admin()
        .arg("--api-base-url")
        .arg(server.url("/api"))
        .arg("--api-token")
        .arg("secret")
        .args(["reorder", "buttons", "2", "1"])
        .assert()
        .success()
        .stdout(contains("saved order of 2 buttons"));
    mock.assert();
}

#[test]
fn reorder_without_backend_endpoint_fails() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/admin/button-groups/reorder");
        then.status(405);
    });

    kiosk_admin()
        .arg("--api-base-url")
        .arg(server.url("/api"))
        .args(["reorder", "groups", "11", "10"])
        .assert()
        .failure()
        .stderr(contains("admin/button-groups/reorder"));
    mock.assert();
}

#[test]
fn reorder_rejects_repeated_ids_before_any_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200);
    });

    kiosk_admin()
        .arg("--api-base-url")
        .arg(server.url("/api"))
        .args(["reorder", "buttons", "3", "3"])
        .assert()
        .failure()
        .stderr(contains("appears twice"));
    mock.assert_hits(0);
}

#[test]
fn unknown_list_fails_fast() {
    kiosk_admin()
        .args(["reorder", "menus", "1"])
        .assert()
        .failure()
        .stderr(contains("unknown list `menus`"));
}
