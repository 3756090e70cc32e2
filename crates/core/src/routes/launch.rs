use crate::{
    AppState, launch,
    routes::{RouteError, is_link_preview_crawler, preview_response},
};
use anyhow::Context;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Method, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub async fn launch_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    request_headers: HeaderMap,
) -> Result<Response, RouteError> {
    if method != Method::GET {
        return Err(RouteError::MethodNotAllowed);
    }

    if let Some(allowed_host) = &state.settings.allowed_host {
        // HTTP/2 requests carry the host in `:authority`, which ends up in the URI.
        let host = request_headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| uri.authority().map(|authority| authority.as_str()));
        if !host.is_some_and(|host| host.eq_ignore_ascii_case(allowed_host)) {
            return Err(RouteError::HostNotAllowed(host.map(str::to_owned)));
        }
    }

    // Crawlers only need preview metadata, never the upstream payload.
    if is_link_preview_crawler(&request_headers) {
        debug!("Serving link preview to crawler");
        return Ok(preview_response(&state.settings.preview_settings));
    }

    let launcher_version = state
        .version_resolver
        .resolve(state.version_cache.as_ref())
        .await;

    let upstream_response = launch::build_launch_request(
        &state.http_client,
        &state.settings.upstream_settings.launch_url,
        &launcher_version,
    )
    .send()
    .await?;
    let status = upstream_response.status();
    if !status.is_success() {
        return Err(RouteError::UpstreamStatus(status));
    }

    let body: Value = upstream_response
        .json()
        .await
        .context("launch API returned a body that is not valid JSON")?;

    let mut response = Json(body).into_response();
    apply_security_headers(response.headers_mut());
    Ok(response)
}

fn apply_security_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("no-referrer"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );
}
