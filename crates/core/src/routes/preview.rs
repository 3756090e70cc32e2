use crate::PreviewSettings;
use axum::{
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Substring of the `User-Agent` sent by Discord's link unfurler.
const CRAWLER_USER_AGENT_MARKER: &str = "Discord";

/// Whether the request comes from a client that only wants link preview metadata.
pub fn is_link_preview_crawler(headers: &HeaderMap) -> bool {
    headers
        .get(header::USER_AGENT)
        .is_some_and(|ua| {
            // Raw bytes, as user agents may carry obs-text octets that `to_str` rejects.
            ua.as_bytes()
                .windows(CRAWLER_USER_AGENT_MARKER.len())
                .any(|window| window == CRAWLER_USER_AGENT_MARKER.as_bytes())
        })
}

/// Static HTML page carrying Open Graph metadata for link unfurling.
pub fn preview_response(settings: &PreviewSettings) -> Response {
    let title = escape_html(&settings.title);
    let description = escape_html(&settings.description);
    let theme_color = escape_html(&settings.theme_color);
    let image_meta = settings
        .image_url
        .as_ref()
        .map(|url| {
            format!(
                "\n    <meta property=\"og:image\" content=\"{}\">\n    <meta name=\"twitter:card\" content=\"summary_large_image\">",
                escape_html(url.as_str())
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <meta property="og:type" content="website">
    <meta property="og:title" content="{title}">
    <meta property="og:description" content="{description}">{image_meta}
    <meta name="theme-color" content="{theme_color}">
</head>
<body></body>
</html>
"#
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime::TEXT_HTML.to_string())],
        body,
    )
        .into_response()
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
