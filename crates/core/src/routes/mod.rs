mod health;
mod launch;
mod preview;

pub use health::*;
pub use launch::*;
pub use preview::*;

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Failures that end a request early with a non-200 response.
///
/// Response bodies are fixed messages; details are only written to the log.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("host {0:?} is not allowed")]
    HostNotAllowed(Option<String>),

    #[error("upstream responded with status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("failed to send request to upstream: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    #[error("upstream failed to respond in time: {0}")]
    UpstreamTimeout(#[source] reqwest::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::UpstreamTimeout(err)
        } else {
            Self::UpstreamUnreachable(err)
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed."),
            Self::HostNotAllowed(_) => (StatusCode::FORBIDDEN, "Access Denied."),
            Self::UpstreamStatus(_) | Self::UpstreamUnreachable(_) => (
                StatusCode::BAD_GATEWAY,
                "Unable to retrieve a response from the upstream server.",
            ),
            Self::UpstreamTimeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "Upstream server failed to respond in time.",
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while processing the request.",
            ),
        };

        if status.is_server_error() {
            if let Self::Internal(err) = &self {
                error!("Unhandled error while processing request: {err:?}");
            } else {
                warn!("{self}");
            }
        }

        let mut response = (status, message).into_response();
        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET"));
        }
        response
    }
}
