//! Browser UI
//!
//! A single static page. Tabs, search forms and table columns are built
//! in the browser from `GET /api/resources`; sorting and CSV export run
//! client-side on the rows returned by `GET /api/{kind}`.

use axum::http::header;
use axum::response::IntoResponse;

/// Embedded page (compiled into the binary)
pub const INDEX_HTML: &str = include_str!("index.html");

pub async fn index() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        INDEX_HTML,
    )
}
