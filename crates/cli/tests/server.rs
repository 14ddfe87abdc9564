use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use cli::server::build_router;
use content::memory::MemoryContentStore;
use docshelf_core::catalog::Catalog;
use docshelf_core::config::AppConfig;
use docshelf_core::html::LOAD_FAILED;
use docshelf_core::site::Site;
use std::sync::Arc;
use tower::ServiceExt;

fn router(store: MemoryContentStore) -> Router {
    let site = Site::new(AppConfig::default(), Arc::new(Catalog::builtin()), Arc::new(store));
    build_router(site)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
}

fn card(id: &str) -> String {
    format!("<article class=\"card\"><h3><a href=\"/docs/{id}\">")
}

#[tokio::test]
async fn index_lists_every_document() {
    let (status, _, body) = get(router(MemoryContentStore::new()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.matches("<article class=\"card\">").count(), 10);
    assert!(body.contains("所有文档"));
}

#[tokio::test]
async fn index_applies_query_and_category() {
    let (_, _, body) = get(router(MemoryContentStore::new()), "/?q=rust").await;
    assert!(body.contains(&card("rust-nom")));
    assert!(body.contains(&card("rust-tutorial")));
    assert!(!body.contains(&card("lake")));

    let (_, _, body) = get(
        router(MemoryContentStore::new()),
        "/?category=%E8%AF%BB%E7%89%A9",
    )
    .await;
    assert!(body.contains(&card("lake")));
    assert!(body.contains(&card("interpretation-of-dreams")));
    assert!(!body.contains(&card("rust-nom")));
    assert!(body.contains("name=\"category\" value=\"读物\""));
}

#[tokio::test]
async fn stored_document_renders_with_metadata() {
    let store = MemoryContentStore::new()
        .with_document("rust-nom", "# Nominomicon\n\nSee [nom](https://github.com/rust-bakery/nom).\n");
    let (status, _, body) = get(router(store), "/docs/rust-nom").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1 class=\"doc-h1\">Nominomicon</h1>"));
    assert!(body.contains("doc-link-external"));
    assert!(body.contains("2024-11-28"));
    assert!(body.contains("返回文档库"));
}

#[tokio::test]
async fn missing_content_is_a_placeholder_page() {
    let (status, _, body) = get(router(MemoryContentStore::new()), "/docs/openmcp").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("OpenMCP 官方教程"));
    assert!(body.contains("Coming Soon"));
}

#[tokio::test]
async fn fetch_failure_is_bad_gateway_with_retreat() {
    let store = MemoryContentStore::new().with_failure("lake");
    let (status, _, body) = get(router(store), "/docs/lake").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains(LOAD_FAILED));
    assert!(body.contains("Failed to load document"));
    assert!(body.contains("class=\"back\" href=\"/\""));
}

#[tokio::test]
async fn missing_id_is_not_found() {
    for uri in ["/docs", "/docs/"] {
        let (status, _, body) = get(router(MemoryContentStore::new()), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body.contains("Document ID not found"));
        assert!(body.contains("返回首页"));
    }
}

#[tokio::test]
async fn attachments_and_stylesheet() {
    let store = MemoryContentStore::new().with_asset("lake", "img/cover.png", b"\x89PNG");
    let (status, content_type, body) = get(router(store), "/docs/lake/img/cover.png").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert!(body.ends_with("PNG"));

    let (status, _, _) = get(router(MemoryContentStore::new()), "/docs/lake/missing.png").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, content_type, body) = get(router(MemoryContentStore::new()), "/assets/site.css").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/css"));
    assert!(body.contains(".doc-h1"));
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let (status, _, body) = get(router(MemoryContentStore::new()), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let (status, _, _) = get(router(MemoryContentStore::new()), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_page_accepts_trailing_slash_and_encoded_ids() {
    let store = MemoryContentStore::new().with_document("lake", "# 湖\n");
    let (status, _, body) = get(router(store), "/docs/lake/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1 class=\"doc-h1\">湖</h1>"));

    let (status, _, body) = get(
        router(MemoryContentStore::new()),
        "/docs/interpretation-of-dreams/",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("梦的解析"));

    let (status, _, body) = get(router(MemoryContentStore::new()), "/docs/%E6%A2%A6%20%E7%9A%84").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1 class=\"doc-h1\">梦 的</h1>"));
}
