use anyhow::Result;
use reqwest::{Proxy, RequestBuilder, header, redirect::Policy};
use std::time::Duration;

pub type HttpClient = reqwest::Client;

/// `User-Agent` sent on requests that don't pose as a launcher, such as manifest fetches.
const SERVICE_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const LAUNCHER_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

pub struct BuildHttpClientArgs {
    pub allow_invalid_certs: bool,
    pub max_redirects: usize,
    pub request_timeout: Duration,
    pub proxy: Option<Proxy>,
}

/// Create the [`HttpClient`] shared by manifest and launch API requests.
pub fn build_http_client(args: BuildHttpClientArgs) -> Result<HttpClient> {
    let mut builder = reqwest::ClientBuilder::default()
        .redirect(Policy::limited(args.max_redirects))
        .user_agent(SERVICE_USER_AGENT)
        .danger_accept_invalid_certs(args.allow_invalid_certs)
        .connect_timeout(Duration::from_secs(5))
        .timeout(args.request_timeout);
    if let Some(proxy) = args.proxy {
        builder = builder.proxy(proxy);
    }
    Ok(builder.build()?)
}

/// `User-Agent` the launch API expects from a launcher running `launcher_version`.
pub fn launcher_user_agent(launcher_version: &str) -> String {
    format!("Lunar Client Launcher v{launcher_version}")
}

/// Headers that make a request look like it came from the desktop launcher.
pub trait LauncherRequestExt {
    /// Replace the client's `User-Agent` and set the launcher's JSON `Content-Type`.
    ///
    /// Must be applied before [`RequestBuilder::json`] so the charset-qualified type is kept.
    fn launcher_headers(self, launcher_version: &str) -> Self;
}

impl LauncherRequestExt for RequestBuilder {
    fn launcher_headers(self, launcher_version: &str) -> Self {
        self.header(header::CONTENT_TYPE, LAUNCHER_CONTENT_TYPE)
            .header(header::USER_AGENT, launcher_user_agent(launcher_version))
    }
}
