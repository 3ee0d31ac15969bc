use crate::{context::RequestContext, error::Error};
use reqwest::StatusCode;
use serde_json::Value;
use siphon_common::utils::http::http_client;
use tracing::{debug, trace};

/// Client for an authenticated document-store gateway session.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    ctx: RequestContext,
    client: reqwest::Client,
}

impl GatewayClient {
    /// Build a client around an authenticated [`RequestContext`].
    pub fn new(ctx: RequestContext) -> Result<Self, Error> {
        let client = http_client(ctx.timeout())?;
        Ok(Self { ctx, client })
    }

    /// Idempotently ensure the named collection exists.
    ///
    /// 201 means the collection was created, 409 means it already exists;
    /// both are success. A 401 means the token is expired or invalid. Any
    /// other non-success status is surfaced, not ignored.
    pub async fn ensure_collection(&self, collection: &str) -> Result<(), Error> {
        let url = self.ctx.collection_url(collection);
        trace!("PUT {}", &url);

        let response =
            self.client.put(&url).headers(self.ctx.headers()).send().await.map_err(Error::Http)?;

        match response.status() {
            StatusCode::CREATED => {
                debug!("created collection '{}'", collection);
                Ok(())
            }
            StatusCode::CONFLICT => {
                debug!("collection '{}' already exists", collection);
                Ok(())
            }
            StatusCode::UNAUTHORIZED => {
                Err(Error::Unauthorized("token expired or invalid".to_string()))
            }
            status if status.is_success() => Ok(()),
            status => Err(Error::Status { status, url }),
        }
    }

    /// Point-insert a single document into the named collection.
    ///
    /// The document must already carry its `_id` key. One record, one POST;
    /// no batching, no transactional grouping.
    pub async fn insert(&self, collection: &str, document: &Value) -> Result<(), Error> {
        let url = self.ctx.collection_url(collection);
        trace!("POST {}", &url);

        let response = self
            .client
            .post(&url)
            .headers(self.ctx.headers())
            .json(document)
            .send()
            .await
            .map_err(Error::Http)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => {
                Err(Error::Unauthorized("token expired or invalid".to_string()))
            }
            status => Err(Error::Status { status, url }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{authenticate, GatewayClient, RequestContext};
    use serde_json::json;

    async fn live_client() -> GatewayClient {
        let gateway_url = std::env::var("GATEWAY_URL").unwrap_or_else(|_| {
            println!("GATEWAY_URL not set, skipping test");
            std::process::exit(0);
        });
        let username = std::env::var("GATEWAY_USERNAME").unwrap_or_default();
        let password = std::env::var("GATEWAY_PASSWORD").unwrap_or_default();

        let token = authenticate(&gateway_url, &username, &password, 10)
            .await
            .expect("authenticate() returned an error!");

        GatewayClient::new(RequestContext::new(&gateway_url, token, 10))
            .expect("failed to build gateway client")
    }

    #[tokio::test]
    async fn test_ensure_collection_is_idempotent() {
        let client = live_client().await;

        // the second call hits the 409 path and must still succeed
        client.ensure_collection("siphon_test").await.expect("first ensure_collection() failed");
        client.ensure_collection("siphon_test").await.expect("second ensure_collection() failed");
    }

    #[tokio::test]
    async fn test_insert_keyed_document() {
        let client = live_client().await;

        client.ensure_collection("siphon_test").await.expect("ensure_collection() failed");
        client
            .insert("siphon_test", &json!({ "_id": "0xtest", "hash": "0xtest" }))
            .await
            .expect("insert() returned an error!");
    }
}
