use crate::error::Error;
use serde_json::Value;
use siphon_common::utils::http::http_client;
use tracing::{debug, trace};

/// An opaque, short-lived bearer token issued by the gateway.
///
/// Obtained exactly once per run. The gateway expires tokens (typically after
/// 30 minutes); there is no refresh, so expiry surfaces as a 401 on the next
/// call.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    /// The raw token string, as attached to the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// the token is a credential, keep it out of debug output
impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(..)")
    }
}

#[cfg(test)]
impl From<&str> for BearerToken {
    fn from(token: &str) -> Self {
        BearerToken(token.to_string())
    }
}

/// Exchange HTTP basic credentials for a [`BearerToken`].
///
/// Issues one `POST {gateway_url}/auth/token` and parses the `token` field out
/// of the JSON response. Any failure here is fatal to the run: proceeding
/// without a credential would only produce a wall of 401s downstream.
pub async fn authenticate(
    gateway_url: &str,
    username: &str,
    password: &str,
    timeout: u64,
) -> Result<BearerToken, Error> {
    let url = format!("{}/auth/token", gateway_url.trim_end_matches('/'));
    trace!("POST {}", &url);

    let client = http_client(timeout)?;
    let response = client
        .post(&url)
        .basic_auth(username, Some(password))
        .send()
        .await
        .map_err(|e| Error::AuthenticationFailed(format!("gateway unreachable: {e}")))?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::AuthenticationFailed("invalid gateway credentials".to_string()));
    }
    if !status.is_success() {
        return Err(Error::Status { status, url });
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| Error::AuthenticationFailed(format!("malformed auth response: {e}")))?;

    let token = body
        .get("token")
        .and_then(|token| token.as_str())
        .ok_or_else(|| {
            Error::AuthenticationFailed("auth response missing 'token' field".to_string())
        })?;

    debug!("authenticated against gateway '{}'", &gateway_url);

    Ok(BearerToken(token.to_string()))
}
