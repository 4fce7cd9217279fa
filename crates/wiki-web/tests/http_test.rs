use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use wiki_bridge::mock::MockStorage;
use wiki_bridge::{AllPagesReply, GetPageReply, PageStore, StorageAction, StorageError};
use wiki_web::handlers::AppState;
use wiki_web::render::PageRenderer;
use wiki_web::server::build_router;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Router backed by the scripted mock storage.
fn mock_app(mock: &MockStorage) -> Router {
    let state = AppState::new(Arc::new(mock.clone()), PageRenderer::new().unwrap());
    build_router(state)
}

/// Router backed by a real page store actor.
fn live_app() -> Router {
    let (store, client) = PageStore::new(8, Duration::from_secs(1));
    tokio::spawn(store.run());
    let state = AppState::new(Arc::new(client), PageRenderer::new().unwrap());
    build_router(state)
}

/// Send a GET request via `oneshot` and return (status, body text).
async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Send a POST with a form body via `oneshot` and return (status, Location
/// header if any, body text).
async fn post_form(app: Router, uri: &str, form: &str) -> (StatusCode, Option<String>, String) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, location, String::from_utf8(body.to_vec()).unwrap())
}

// ---------------------------------------------------------------------------
// Read handlers (scripted storage)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn index_renders_pages_in_reply_order() {
    let mock = MockStorage::new();
    mock.expect_all_pages().return_ok(AllPagesReply {
        pages: vec!["Zulu".to_string(), "Alpha".to_string()],
    });

    let (status, body) = get(mock_app(&mock), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Wiki home"));
    // The front end preserves storage order verbatim
    let zulu = body.find("/wiki/Zulu").unwrap();
    let alpha = body.find("/wiki/Alpha").unwrap();
    assert!(zulu < alpha, "expected Zulu before Alpha in: {body}");
    mock.verify();
}

#[tokio::test]
async fn missing_page_renders_new_page_editor() {
    let mock = MockStorage::new();
    mock.expect_get_page().return_ok(GetPageReply {
        found: false,
        id: None,
        raw_content: None,
    });

    let (status, body) = get(mock_app(&mock), "/wiki/NeverCreated").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("name=\"newPage\" value=\"yes\""));
    assert!(body.contains("name=\"id\" value=\"-1\""));
    assert!(body.contains("A new page"));
    assert_eq!(
        mock.calls(),
        vec![StorageAction::GetPage {
            page: "NeverCreated".to_string()
        }]
    );
}

#[tokio::test]
async fn existing_page_renders_converted_markdown() {
    let mock = MockStorage::new();
    mock.expect_get_page().return_ok(GetPageReply {
        found: true,
        id: Some(3),
        raw_content: Some("# Hi".to_string()),
    });

    let (status, body) = get(mock_app(&mock), "/wiki/Test").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Hi</h1>"), "got: {body}");
    assert!(body.contains("name=\"newPage\" value=\"no\""));
    assert!(body.contains("name=\"id\" value=\"3\""));
}

// ---------------------------------------------------------------------------
// Mutation handlers (scripted storage)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_with_new_page_flag_dispatches_create() {
    let mock = MockStorage::new();
    mock.expect_create_page().return_ok(());

    let (status, location, _) = post_form(
        mock_app(&mock),
        "/wiki/Test",
        "title=Test&markdown=content&newPage=yes&id=-1",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/wiki/Test"));
    assert_eq!(
        mock.calls(),
        vec![StorageAction::CreatePage {
            title: "Test".to_string(),
            markdown: "content".to_string()
        }]
    );
}

#[tokio::test]
async fn update_without_new_page_flag_dispatches_save() {
    let mock = MockStorage::new();
    mock.expect_save_page().return_ok(());

    let (status, location, _) = post_form(
        mock_app(&mock),
        "/wiki/Test",
        "title=Test&markdown=content&newPage=no&id=7",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/wiki/Test"));
    assert_eq!(
        mock.calls(),
        vec![StorageAction::SavePage {
            id: 7,
            title: "Test".to_string(),
            markdown: "content".to_string()
        }]
    );
}

#[tokio::test]
async fn save_with_garbage_id_is_rejected_before_dispatch() {
    let mock = MockStorage::new();

    let (status, _, _) = post_form(
        mock_app(&mock),
        "/wiki/Test",
        "title=Test&markdown=content&newPage=no&id=seven",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn create_redirects_to_the_new_page() {
    let mock = MockStorage::new();
    mock.expect_create_page().return_ok(());

    let (status, location, _) = post_form(
        mock_app(&mock),
        "/wiki",
        "title=Fresh&markdown=%23%20Fresh%20start",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/wiki/Fresh"));
    assert_eq!(
        mock.calls(),
        vec![StorageAction::CreatePage {
            title: "Fresh".to_string(),
            markdown: "# Fresh start".to_string()
        }]
    );
}

#[tokio::test]
async fn create_with_empty_title_is_rejected_before_dispatch() {
    let mock = MockStorage::new();

    let (status, _, _) = post_form(mock_app(&mock), "/wiki", "title=&markdown=content").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn delete_redirects_to_the_index() {
    let mock = MockStorage::new();
    mock.expect_delete_page().return_ok(());

    let (status, location, _) = post_form(mock_app(&mock), "/delete/7", "").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
    assert_eq!(mock.calls(), vec![StorageAction::DeletePage { id: 7 }]);
}

// ---------------------------------------------------------------------------
// Failure propagation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bridge_failure_yields_server_error_for_every_handler() {
    let mock = MockStorage::new();
    mock.expect_all_pages()
        .return_err(StorageError::ChannelClosed);
    let (status, body) = get(mock_app(&mock), "/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "internal server error");

    let mock = MockStorage::new();
    mock.expect_get_page()
        .return_err(StorageError::ReplyTimeout(Duration::from_millis(50)));
    let (status, body) = get(mock_app(&mock), "/wiki/Test").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "internal server error");

    let mock = MockStorage::new();
    mock.expect_save_page().return_err(StorageError::NotFound(7));
    let (status, _, body) = post_form(
        mock_app(&mock),
        "/wiki/Test",
        "title=Test&markdown=content&newPage=no&id=7",
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "internal server error");

    let mock = MockStorage::new();
    mock.expect_create_page()
        .return_err(StorageError::DuplicateTitle("Test".to_string()));
    let (status, _, body) = post_form(mock_app(&mock), "/wiki", "title=Test&markdown=content").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "internal server error");

    let mock = MockStorage::new();
    mock.expect_delete_page()
        .return_err(StorageError::ChannelClosed);
    let (status, _, body) = post_form(mock_app(&mock), "/delete/7", "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "internal server error");
}

#[tokio::test]
async fn unknown_routes_fall_through_to_404() {
    let mock = MockStorage::new();
    let (status, _) = get(mock_app(&mock), "/nothing/here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// End to end against the real store actor
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_edit_delete_round_trip() {
    let app = live_app();

    // Create "Test" with markdown "# Hi"
    let (status, location, _) = post_form(
        app.clone(),
        "/wiki",
        "title=Test&markdown=%23%20Hi",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/wiki/Test"));

    // The rendered page carries the converted markdown and edit metadata
    let (status, body) = get(app.clone(), "/wiki/Test").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Hi</h1>"), "got: {body}");
    assert!(body.contains("name=\"newPage\" value=\"no\""));
    assert!(body.contains("name=\"id\" value=\"1\""));

    // Save new content through the editor form
    let (status, location, _) = post_form(
        app.clone(),
        "/wiki/Test",
        "title=Test&markdown=Updated%20words&newPage=no&id=1",
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/wiki/Test"));

    let (_, body) = get(app.clone(), "/wiki/Test").await;
    assert!(body.contains("Updated words"));

    // The index lists the page
    let (_, body) = get(app.clone(), "/").await;
    assert!(body.contains("/wiki/Test"));

    // Delete it; the page view falls back to the new-page editor
    let (status, location, _) = post_form(app.clone(), "/delete/1", "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));

    let (status, body) = get(app, "/wiki/Test").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("name=\"newPage\" value=\"yes\""));
    assert!(body.contains("A new page"));
}
