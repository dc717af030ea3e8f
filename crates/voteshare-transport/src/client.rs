//! A small signed-HTTP client on top of `reqwest`, used by the
//! coordinator to call the two share nodes. Mirrors the teacher's own
//! `reqwest` stack (`json`, `rustls-tls` features, as in `bleep-wallet-core`
//! and the root `bleep-root` package).

use crate::error::TransportError;
use crate::signing::{canonicalize_body, empty_canonical_body, sign};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[derive(Clone)]
pub struct SignedClient {
    http: reqwest::Client,
    key: Vec<u8>,
}

impl SignedClient {
    pub fn new(key: Vec<u8>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client builds with a finite timeout");
        Self { http, key }
    }

    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, TransportError> {
        let canonical = canonicalize_body(body)?;
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(&self.key, timestamp, &canonical);

        let response = self
            .http
            .post(url)
            .header("X-Timestamp", timestamp.to_string())
            .header("X-Signature", signature)
            .header("Content-Type", "application/json")
            .body(canonical)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        self.decode(response).await
    }

    pub async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, TransportError> {
        let canonical = empty_canonical_body();
        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(&self.key, timestamp, &canonical);

        let response = self
            .http
            .get(url)
            .header("X-Timestamp", timestamp.to_string())
            .header("X-Signature", signature)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        self.decode(response).await
    }

    async fn decode<R: DeserializeOwned>(&self, response: reqwest::Response) -> Result<R, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::UpstreamStatus(status.as_u16()));
        }
        response
            .json::<R>()
            .await
            .map_err(|e| TransportError::MalformedPayload(e.to_string()))
    }
}
