use crate::auth::BearerToken;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};

/// Immutable request context for gateway calls.
///
/// Carries the base URL, the bearer token and the request timeout, and is
/// passed explicitly to every call site. Built once, right after
/// authentication, and never mutated.
#[derive(Clone, Debug)]
pub struct RequestContext {
    base_url: String,
    token: BearerToken,
    timeout: u64,
}

impl RequestContext {
    /// Build a context from an authenticated token.
    pub fn new(gateway_url: &str, token: BearerToken, timeout: u64) -> Self {
        Self { base_url: gateway_url.trim_end_matches('/').to_string(), token, timeout }
    }

    /// The request timeout, in seconds.
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// The full URL of the given collection.
    pub fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    /// The headers attached to every gateway request.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", self.token.as_str())
                .parse()
                .expect("failed to parse Authorization header"),
        );
        headers.insert(
            CONTENT_TYPE,
            "application/json".parse().expect("failed to parse Content-Type header"),
        );
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RequestContext {
        RequestContext::new("http://localhost:8080/", BearerToken::from("abc123"), 10)
    }

    #[test]
    fn test_headers_carry_bearer_token() {
        let headers = context().headers();

        assert_eq!(headers.get(AUTHORIZATION).expect("missing auth header"), "Bearer abc123");
        assert_eq!(
            headers.get(CONTENT_TYPE).expect("missing content-type header"),
            "application/json"
        );
    }

    #[test]
    fn test_collection_url_strips_trailing_slash() {
        assert_eq!(context().collection_url("mainnet_txs"), "http://localhost:8080/mainnet_txs");
    }
}
