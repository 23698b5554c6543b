//! Shared outbound HTTP client.

use crate::config::DeploymentHubConfig;

/// Build the client used for OAuth exchanges and tenant API calls.
///
/// Every request carries the configured timeout.
///
/// # Errors
///
/// Fails only when the TLS backend cannot be initialised.
pub fn build_client(cfg: &DeploymentHubConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(cfg.request_timeout())
        .connect_timeout(cfg.connect_timeout())
        .pool_max_idle_per_host(10)
        .build()
}

/// Human-readable cause of a failed `send()`.
pub(crate) fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        if e.is_connect() {
            "connection timeout".to_owned()
        } else {
            "request timeout".to_owned()
        }
    } else if e.is_connect() {
        format!("connection error: {e}")
    } else {
        format!("request error: {e}")
    }
}

/// Response body for error messages, cut to a readable length.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    const MAX_LEN: usize = 512;

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
