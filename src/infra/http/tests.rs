use std::time::Duration;

use httpmock::MockServer;
use kiosk_admin_api_types::{ButtonGroupAssignment, ReorderEntry, ReorderRequest};
use serde_json::json;
use url::Url;

use super::*;

fn api(server: &MockServer, token: Option<&str>) -> HttpAdminApi {
    let settings = ApiSettings {
        base_url: Url::parse(&format!("{}/", server.base_url())).expect("base url"),
        token: token.map(str::to_string),
        timeout: Duration::from_secs(5),
    };
    HttpAdminApi::new(&settings).expect("client")
}

#[tokio::test]
async fn list_buttons_sends_token_cookie() -> Result<(), ApiError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/home/buttons")
            .header("cookie", "access_token=\"Bearer secret\"");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"id":2,"title":"Map","order_index":1},{"id":1,"title":"Visit","order_index":2}]"#);
    });

    let buttons = api(&server, Some("secret")).list_buttons().await?;
    mock.assert();
    assert_eq!(buttons.len(), 2);
    assert_eq!(buttons[0].title, "Map");
    Ok(())
}

#[tokio::test]
async fn non_array_collection_reads_as_empty() -> Result<(), ApiError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/admin/button-groups");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"detail":"no groups"}"#);
    });

    let groups = api(&server, None).list_groups().await?;
    assert!(groups.is_empty());
    Ok(())
}

#[tokio::test]
async fn reorder_posts_dense_positions() -> Result<(), ApiError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/admin/buttons/reorder")
            .json_body(json!({"items":[{"id":2,"order_index":1},{"id":1,"order_index":2}]}));
        then.status(200).body("{}");
    });

    let request = ReorderRequest {
        items: vec![
            ReorderEntry {
                id: 2,
                order_index: 1,
            },
            ReorderEntry {
                id: 1,
                order_index: 2,
            },
        ],
    };
    api(&server, None)
        .reorder(ListKind::Buttons, &request)
        .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn absent_reorder_endpoint_is_reported_as_missing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/admin/button-groups/reorder");
        then.status(405).body("Method Not Allowed");
    });

    let err = api(&server, None)
        .reorder(ListKind::Groups, &ReorderRequest::default())
        .await
        .expect_err("missing endpoint");
    assert_eq!(
        err,
        ApiError::MissingEndpoint {
            path: "admin/button-groups/reorder".to_string()
        }
    );
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/admin/buttons/reorder");
        then.status(500).body("database is locked");
    });

    let err = api(&server, None)
        .reorder(ListKind::Buttons, &ReorderRequest::default())
        .await
        .expect_err("server error");
    assert_eq!(err.detail(), "database is locked");
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn conflict_and_not_found_are_distinguished() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/admin/pages");
        then.status(409).body("slug exists");
    });
    server.mock(|when, then| {
        when.method("GET").path("/pages/missing");
        then.status(404).body(r#"{"detail":"Not found"}"#);
    });

    let api = api(&server, None);
    let conflict = api
        .create_page(&PageCreateRequest {
            slug: "p-1".into(),
            title: "Hours".into(),
            is_home: false,
        })
        .await
        .expect_err("conflict");
    assert!(matches!(conflict, ApiError::Conflict(_)));

    let missing = api.page("missing").await.expect_err("not found");
    assert!(matches!(missing, ApiError::NotFound(_)));
}

#[tokio::test]
async fn group_detach_sends_explicit_null() -> Result<(), ApiError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("PUT")
            .path("/admin/buttons/7")
            .json_body(json!({"group_id": null}));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":7,"title":"Map","group_id":null}"#);
    });

    let button = api(&server, None)
        .assign_group(7, &ButtonGroupAssignment { group_id: None })
        .await?;
    mock.assert();
    assert_eq!(button.group_id, None);
    Ok(())
}

#[tokio::test]
async fn upload_returns_server_path() -> Result<(), ApiError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST").path("/upload");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"path":"/media/logo.png"}"#);
    });

    let uploaded = api(&server, None)
        .upload("logo.png", b"png".to_vec())
        .await?;
    mock.assert();
    assert_eq!(uploaded.path, "/media/logo.png");
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let settings = ApiSettings {
        base_url: Url::parse("http://127.0.0.1:9/").expect("url"),
        token: None,
        timeout: Duration::from_secs(2),
    };
    let err = HttpAdminApi::new(&settings)
        .expect("client")
        .site_config()
        .await
        .expect_err("connection refused");
    assert!(matches!(err, ApiError::Transport(_)));
}
