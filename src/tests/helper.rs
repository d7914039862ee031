use axum::body::Body;
use axum::body::Bytes;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::LOCATION;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Map;
use serde_json::Value;
use tower::Service;

use crate::api::ApiToken;
use crate::create_router;
use crate::storage::memory::Memory;

/// The token every test request authenticates with
pub const API_TOKEN: &str = "verysecret";

/// Test helper version of Folder struct
#[derive(Debug, PartialEq, Eq)]
pub struct Folder {
    pub id: i64,
    pub folder_name: String,
}

/// Test helper version of Note struct
#[derive(Debug, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub note_name: String,
    pub folder_id: i64,
    pub content: String,
    pub modified: String,
}

/// Setup the Noteful app with an isolated memory storage
pub fn setup_test_app() -> Router {
    create_router(Memory::new(), ApiToken::new(API_TOKEN.to_string()))
}

pub fn authorization() -> String {
    format!("Bearer {API_TOKEN}")
}

/// Send a request and collect status, `Location` header and body
async fn call(app: &mut Router, request: Request<Body>) -> (StatusCode, Option<String>, Bytes) {
    let response = app.call(request).await.unwrap();

    let status_code = response.status();

    let location = response.headers().get(LOCATION);
    let location = location.map(|header| header.to_str().unwrap().to_string());

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (status_code, location, body)
}

/// Send a request with an arbitrary (or absent) Authorization header
pub async fn request_with_authorization(
    app: &mut Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
) -> (StatusCode, Option<String>) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(authorization) = authorization {
        builder = builder.header(AUTHORIZATION, authorization);
    }

    let request = builder.body(Body::empty()).unwrap();

    let (status_code, _, body) = call(app, request).await;

    (status_code, maybe_error_message(&body))
}

/// Send a raw body to an endpoint, with or without a JSON content type
pub async fn post_raw_body(
    app: &mut Router,
    uri: &str,
    body: &'static str,
    include_content_type: bool,
) -> (StatusCode, Option<String>) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, authorization());

    if include_content_type {
        builder = builder.header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    }

    let request = builder.body(Body::from(body.as_bytes())).unwrap();

    let (status_code, _, body) = call(app, request).await;

    (status_code, maybe_error_message(&body))
}

/// Send a PATCH without a body or content type
pub async fn update_without_body(app: &mut Router, uri: &str) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(AUTHORIZATION, authorization())
        .body(Body::empty())
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (status_code, maybe_error_message(&body))
}

pub async fn list_folders(app: &mut Router) -> (StatusCode, Option<Vec<Folder>>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/folders")
        .header(AUTHORIZATION, authorization())
        .body(Body::empty())
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_folders(&body))
        } else {
            None
        },
    )
}

pub async fn single_folder(
    app: &mut Router,
    id: i64,
) -> (StatusCode, Option<Folder>, Option<String>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/api/folders/{id}"))
        .header(AUTHORIZATION, authorization())
        .body(Body::empty())
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_folder(&body))
        } else {
            None
        },
        maybe_error_message(&body),
    )
}

pub async fn maybe_create_folder(
    app: &mut Router,
    folder_name: &str,
) -> (StatusCode, Option<String>, Option<Folder>, Option<String>) {
    let mut payload = Map::new();
    payload.insert(
        "folder_name".to_string(),
        Value::String(folder_name.to_string()),
    );

    maybe_create_folder_with_payload(app, Value::Object(payload)).await
}

pub async fn maybe_create_folder_with_payload(
    app: &mut Router,
    payload: Value,
) -> (StatusCode, Option<String>, Option<Folder>, Option<String>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/folders")
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .header(AUTHORIZATION, authorization())
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let (status_code, location, body) = call(app, request).await;

    (
        status_code,
        location,
        if status_code == StatusCode::CREATED {
            Some(get_folder(&body))
        } else {
            None
        },
        maybe_error_message(&body),
    )
}

pub async fn maybe_update_folder(
    app: &mut Router,
    id: i64,
    payload: Value,
) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/api/folders/{id}"))
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .header(AUTHORIZATION, authorization())
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (status_code, maybe_error_message(&body))
}

pub async fn maybe_delete_folder(app: &mut Router, id: i64) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/folders/{id}"))
        .header(AUTHORIZATION, authorization())
        .body(Body::empty())
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (status_code, maybe_error_message(&body))
}

pub async fn list_notes(app: &mut Router) -> (StatusCode, Option<Vec<Note>>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/notes")
        .header(AUTHORIZATION, authorization())
        .body(Body::empty())
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_notes(&body))
        } else {
            None
        },
    )
}

pub async fn single_note(app: &mut Router, id: i64) -> (StatusCode, Option<Note>, Option<String>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/api/notes/{id}"))
        .header(AUTHORIZATION, authorization())
        .body(Body::empty())
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_note(&body))
        } else {
            None
        },
        maybe_error_message(&body),
    )
}

pub async fn maybe_create_note(
    app: &mut Router,
    payload: Value,
) -> (StatusCode, Option<String>, Option<Note>, Option<String>) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/notes")
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .header(AUTHORIZATION, authorization())
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let (status_code, location, body) = call(app, request).await;

    (
        status_code,
        location,
        if status_code == StatusCode::CREATED {
            Some(get_note(&body))
        } else {
            None
        },
        maybe_error_message(&body),
    )
}

pub async fn maybe_update_note(
    app: &mut Router,
    id: i64,
    payload: Value,
) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/api/notes/{id}"))
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .header(AUTHORIZATION, authorization())
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (status_code, maybe_error_message(&body))
}

pub async fn maybe_delete_note(app: &mut Router, id: i64) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/notes/{id}"))
        .header(AUTHORIZATION, authorization())
        .body(Body::empty())
        .unwrap();

    let (status_code, _, body) = call(app, request).await;

    (status_code, maybe_error_message(&body))
}

fn value_to_folder(folder: &Map<String, Value>) -> Folder {
    Folder {
        id: folder["id"].as_i64().unwrap(),
        folder_name: folder["folder_name"]
            .as_str()
            .map(ToString::to_string)
            .unwrap(),
    }
}

fn get_folder(body: &Bytes) -> Folder {
    serde_json::from_slice::<Value>(&body[..])
        .unwrap()
        .as_object()
        .map(value_to_folder)
        .unwrap()
}

fn get_folders(body: &Bytes) -> Vec<Folder> {
    serde_json::from_slice::<Value>(&body[..])
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_object().unwrap())
        .map(value_to_folder)
        .collect()
}

fn value_to_note(note: &Map<String, Value>) -> Note {
    Note {
        id: note["id"].as_i64().unwrap(),
        note_name: note["note_name"].as_str().map(ToString::to_string).unwrap(),
        folder_id: note["folder_id"].as_i64().unwrap(),
        content: note["content"].as_str().map(ToString::to_string).unwrap(),
        modified: note["modified"].as_str().map(ToString::to_string).unwrap(),
    }
}

fn get_note(body: &Bytes) -> Note {
    serde_json::from_slice::<Value>(&body[..])
        .unwrap()
        .as_object()
        .map(value_to_note)
        .unwrap()
}

fn get_notes(body: &Bytes) -> Vec<Note> {
    serde_json::from_slice::<Value>(&body[..])
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_object().unwrap())
        .map(value_to_note)
        .collect()
}

fn maybe_error_message(body: &Bytes) -> Option<String> {
    serde_json::from_slice::<Value>(&body[..])
        .ok()?
        .get("error")?
        .get("message")?
        .as_str()
        .map(ToString::to_string)
}
