//! Static documentation pages, embedded at build time

use super::shape::ApiResponse;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const DOCS_HTML: &str = include_str!("../../static/docs.html");
const STYLE_CSS: &str = include_str!("../../static/style.css");

/// Static page for `path`, if one exists
pub fn page(path: &str) -> Option<ApiResponse> {
    let (content_type, body) = match path {
        "/" | "/index.html" => ("text/html", INDEX_HTML),
        "/docs" => ("text/html", DOCS_HTML),
        "/style.css" => ("text/css", STYLE_CSS),
        _ => return None,
    };
    Some(ApiResponse::static_page(content_type, body))
}
