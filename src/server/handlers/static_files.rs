//! Embedded page and asset handlers.

use axum::{
    http::header,
    response::{Html, IntoResponse},
};

use super::super::assets;

/// Serve the upload page.
pub async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

/// Serve CSS.
pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}

/// Serve JavaScript.
pub async fn serve_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        assets::JS,
    )
}
