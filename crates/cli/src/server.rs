//! HTTP front end: renders the index and detail pages on request.

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode, Uri};
use axum::middleware::{from_fn, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use docshelf_core::html::{LinkStyle, STYLESHEET};
use docshelf_core::index::IndexState;
use docshelf_core::page::{PageError, PageState};
use docshelf_core::routes::Route;
use docshelf_core::search::CategorySelection;
use docshelf_core::site::Site;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, Instrument};

#[derive(Clone)]
pub struct AppState {
    site: Arc<Site>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    category: Option<String>,
}

impl IndexParams {
    fn state(&self) -> IndexState {
        let selection = self
            .category
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(CategorySelection::from)
            .unwrap_or_default();
        IndexState::new(&self.q, selection)
    }
}

pub fn build_router(site: Site) -> Router {
    let state = AppState {
        site: Arc::new(site),
    };
    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(healthz_handler))
        .route("/assets/site.css", get(stylesheet_handler))
        .route("/docs", get(document_handler))
        .route("/docs/", get(document_handler))
        .route("/docs/{id}", get(document_handler))
        .route("/docs/{id}/", get(document_handler))
        .route("/docs/{id}/{*path}", get(asset_handler))
        .fallback(not_found_handler)
        .layer(from_fn(request_tracing_middleware))
        .with_state(state)
}

pub async fn serve(site: Site, bind: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "serving documentation site");
    axum::serve(listener, build_router(site))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn request_tracing_middleware(request: Request<Body>, next: Next) -> Response {
    let span = tracing::info_span!(
        "http.request",
        method = %request.method(),
        route = %request.uri().path(),
    );
    let started = Instant::now();
    let response = next.run(request).instrument(span.clone()).await;
    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request served"
        )
    });
    response
}

async fn index_handler(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Html<String> {
    Html(state.site.render_index(&params.state(), LinkStyle::Dynamic))
}

/// Detail paths, with or without an id or a trailing slash, resolve
/// through [`Route::parse`] like every other link the site emits.
async fn document_handler(State(state): State<AppState>, uri: Uri) -> Response {
    match Route::parse(uri.path()) {
        Some(Route::Document(id)) => render_page(&state, id.as_deref()).await,
        _ => not_found_handler().await,
    }
}

async fn render_page(state: &AppState, id: Option<&str>) -> Response {
    let page = state.site.load_page(id).await;
    let status = match &page {
        PageState::Failed(PageError::MissingId) => StatusCode::NOT_FOUND,
        PageState::Failed(PageError::Fetch { .. }) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Html(state.site.render_page(&page))).into_response()
}

async fn asset_handler(
    State(state): State<AppState>,
    Path((id, path)): Path<(String, String)>,
) -> Response {
    match state.site.store.fetch_asset(&id, &path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content::mime::guess(&path))], bytes).into_response(),
        Err(e) if e.is_not_found() => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!(id, path, error = %e, "attachment fetch failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

async fn stylesheet_handler() -> Response {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET).into_response()
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}
