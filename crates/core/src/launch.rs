use crate::http_client::{HttpClient, LauncherRequestExt};
use reqwest::RequestBuilder;
use serde::Serialize;
use url::Url;
use uuid::Uuid;

const GAME_VERSION: &str = "1.8.9";
const BRANCH: &str = "master";
const OS: &str = "win32";
const ARCH: &str = "x64";
const HWID: &str = "0";
const OS_RELEASE: &str = "10.0.22631";

/// Body sent to the launch API, mimicking a desktop launcher.
#[derive(Debug, Serialize)]
pub struct LaunchPayload<'a> {
    version: &'static str,
    branch: &'static str,
    os: &'static str,
    arch: &'static str,
    launcher_version: &'a str,
    hwid: &'static str,
    installation_id: Uuid,
    os_release: &'static str,
}

impl<'a> LaunchPayload<'a> {
    /// Create a payload for `launcher_version` with a freshly generated installation id.
    pub fn new(launcher_version: &'a str) -> Self {
        Self {
            version: GAME_VERSION,
            branch: BRANCH,
            os: OS,
            arch: ARCH,
            launcher_version,
            hwid: HWID,
            installation_id: Uuid::new_v4(),
            os_release: OS_RELEASE,
        }
    }
}

/// Build the upstream launch request for `launcher_version`.
pub fn build_launch_request(
    client: &HttpClient,
    launch_url: &Url,
    launcher_version: &str,
) -> RequestBuilder {
    client
        .post(launch_url.as_str())
        .launcher_headers(launcher_version)
        .json(&LaunchPayload::new(launcher_version))
}
