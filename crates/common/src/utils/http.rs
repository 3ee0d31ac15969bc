use reqwest::Client;
use std::time::Duration;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Build a [`Client`] with an explicit request timeout.
///
/// Every outbound HTTP call in siphon goes through a client built here, so
/// no request can hang forever on an unresponsive endpoint.
///
/// ```no_run
/// use siphon_common::utils::http::http_client;
///
/// let client = http_client(10).expect("failed to build client");
/// ```
pub fn http_client(timeout: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(Duration::from_secs(timeout))
        .build()
}
