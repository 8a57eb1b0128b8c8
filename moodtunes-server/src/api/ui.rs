//! UI serving routes
//!
//! Serves the static pages and their client assets. Everything is embedded
//! at compile time.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

const INDEX_HTML: &str = include_str!("../../ui/index.html");
const FEELING_HTML: &str = include_str!("../../ui/feeling.html");
const CHART_HTML: &str = include_str!("../../ui/chart.html");
const SCRIPT_JS: &str = include_str!("../../ui/script.js");
const CHART_JS: &str = include_str!("../../ui/chart.js");
const STYLE_CSS: &str = include_str!("../../ui/style.css");

/// GET /
///
/// Landing page
pub async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /feeling
///
/// Text input page; posts to /predict and lists the returned songs
pub async fn serve_feeling() -> Html<&'static str> {
    Html(FEELING_HTML)
}

/// GET /chart
pub async fn serve_chart() -> Html<&'static str> {
    Html(CHART_HTML)
}

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// GET /static/script.js
pub async fn serve_script_js() -> Response {
    asset("application/javascript", SCRIPT_JS)
}

/// GET /static/chart.js
pub async fn serve_chart_js() -> Response {
    asset("application/javascript", CHART_JS)
}

/// GET /static/style.css
pub async fn serve_style_css() -> Response {
    asset("text/css", STYLE_CSS)
}
