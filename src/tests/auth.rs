use axum::http::Method;
use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_missing_token() {
    let mut app = helper::setup_test_app();

    for uri in ["/api/folders", "/api/notes", "/api/folders/1", "/api/notes/1"] {
        let (status_code, error) =
            helper::request_with_authorization(&mut app, Method::GET, uri, None).await;
        assert_eq!(StatusCode::UNAUTHORIZED, status_code);
        assert_eq!(Some("Unauthorized request".to_string()), error);
    }
}

#[tokio::test]
async fn test_wrong_token() {
    let mut app = helper::setup_test_app();

    let (status_code, error) = helper::request_with_authorization(
        &mut app,
        Method::GET,
        "/api/folders",
        Some("Bearer notthetoken"),
    )
    .await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    assert_eq!(Some("Unauthorized request".to_string()), error);
}

#[tokio::test]
async fn test_wrong_scheme() {
    let mut app = helper::setup_test_app();

    let (status_code, error) = helper::request_with_authorization(
        &mut app,
        Method::GET,
        "/api/folders",
        Some(&format!("Basic {}", helper::API_TOKEN)),
    )
    .await;
    assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    assert_eq!(Some("Unauthorized request".to_string()), error);
}

#[tokio::test]
async fn test_mutations_require_token() {
    let mut app = helper::setup_test_app();

    for (method, uri) in [
        (Method::POST, "/api/folders"),
        (Method::PATCH, "/api/folders/1"),
        (Method::DELETE, "/api/folders/1"),
        (Method::POST, "/api/notes"),
        (Method::PATCH, "/api/notes/1"),
        (Method::DELETE, "/api/notes/1"),
    ] {
        let (status_code, _) =
            helper::request_with_authorization(&mut app, method, uri, None).await;
        assert_eq!(StatusCode::UNAUTHORIZED, status_code);
    }
}
