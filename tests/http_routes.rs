use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use flatwiki::{build_app, AppState, Page, PageStore, Templates};

fn app(store: PageStore) -> Router {
    build_app(AppState { store: Arc::new(store), renderer: Arc::new(Templates::builtin()) })
}

async fn get(app: Router, path: &str) -> Response {
    app.oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: Router, path: &str, form: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_string(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(resp: &Response) -> &str {
    resp.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn missing_page_view_redirects_to_editor() {
    let dir = tempfile::tempdir().unwrap();
    let resp = get(app(PageStore::open(dir.path()).unwrap()), "/view/NewPage").await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/edit/NewPage");
}

#[tokio::test]
async fn edit_then_save_then_view() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path()).unwrap();

    let resp = get(app(store.clone()), "/edit/NewPage").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("action=\"/save/NewPage\""));

    let resp = post_form(app(store.clone()), "/save/NewPage", "body=hello+%3Cworld%3E").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/view/NewPage");
    assert_eq!(std::fs::read(dir.path().join("NewPage.txt")).unwrap(), b"hello <world>");

    let resp = get(app(store), "/view/NewPage").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("hello &lt;world&gt;"));
}

#[tokio::test]
async fn create_form_saves_under_submitted_title() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path()).unwrap();

    let resp = get(app(store.clone()), "/create").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("action=\"/save\""));

    let resp = post_form(app(store.clone()), "/save", "title=Journal&body=day+one").await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/view/Journal");
    assert_eq!(store.load("Journal").unwrap(), Page::new("Journal", "day one"));
}

#[tokio::test]
async fn invalid_form_title_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path()).unwrap();

    let resp = post_form(app(store.clone()), "/savenew", "title=..%2Fescape&body=x").await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(store.list_titles().unwrap().is_empty());
}

#[tokio::test]
async fn listing_is_sorted_html() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path()).unwrap();
    for title in ["Zeta", "Alpha", "Mid"] {
        store.save(&Page::new(title, "x")).unwrap();
    }

    let html = body_string(get(app(store), "/").await).await;

    let alpha = html.find("/view/Alpha").unwrap();
    let mid = html.find("/view/Mid").unwrap();
    let zeta = html.find("/view/Zeta").unwrap();
    assert!(alpha < mid && mid < zeta);
}

#[tokio::test]
async fn listing_failure_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::new(dir.path().join("missing"));

    let resp = get(app(store), "/list").await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn traversal_paths_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path()).unwrap();

    for path in ["/view/../etc", "/view/..%2Fetc", "/edit/a.b", "/unknown"] {
        let resp = get(app(store.clone()), path).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn save_requires_post() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path()).unwrap();

    let resp = get(app(store.clone()), "/save/Home").await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(store.list_titles().unwrap().is_empty());
}

#[tokio::test]
async fn save_with_undecodable_body_keeps_stored_page() {
    let dir = tempfile::tempdir().unwrap();
    let store = PageStore::open(dir.path()).unwrap();
    store.save(&Page::new("Home", "precious content")).unwrap();

    let json = Request::builder()
        .method("POST")
        .uri("/save/Home")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"body":"overwritten"}"#))
        .unwrap();
    let resp = app(store.clone()).oneshot(json).await.unwrap();
    assert!(resp.status().is_client_error(), "json body got {}", resp.status());

    let bare = Request::builder()
        .method("POST")
        .uri("/save/Home")
        .body(Body::from("body=overwritten"))
        .unwrap();
    let resp = app(store.clone()).oneshot(bare).await.unwrap();
    assert!(resp.status().is_client_error(), "no content type got {}", resp.status());

    assert_eq!(store.load("Home").unwrap().body, b"precious content");
    assert_eq!(store.list_titles().unwrap(), vec!["Home".to_string()]);
}
