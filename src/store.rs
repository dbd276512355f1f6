//! Client for the remote hierarchical key-value store.
//!
//! The store speaks a Firebase-style REST surface: values live under
//! slash-separated paths with a `.json` suffix, reads return JSON or
//! `null` for missing paths, writes are `PUT` (full value) and `PATCH`
//! (partial merge). Every call carries a bounded timeout.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;

/// Explicit two-step TLS policy: a fully verified attempt first, then at
/// most one retry through a client that skips certificate verification.
/// The downgrade is deliberate and always logged; only certificate
/// failures qualify, every other transport failure aborts the call.
#[derive(Debug, Clone)]
pub struct TlsFallback {
    verified: Client,
    insecure: Client,
}

impl TlsFallback {
    pub fn new(timeout: Duration) -> Result<Self, StoreError> {
        let verified = Client::builder().timeout(timeout).build()?;
        let insecure = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { verified, insecure })
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, StoreError> {
        match dispatch(&self.verified, method.clone(), url, body).await {
            Ok(response) => Ok(response),
            Err(err) if is_certificate_failure(&err) => {
                warn!(url, "TLS verification failed, retrying once without verification");
                Ok(dispatch(&self.insecure, method, url, body).await?)
            }
            Err(err) => Err(err.into()),
        }
    }
}

async fn dispatch(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<&Value>,
) -> Result<reqwest::Response, reqwest::Error> {
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(body);
    }
    request.send().await?.error_for_status()
}

/// Walks the error's source chain looking for a certificate-validation
/// failure; rustls and native-tls both surface one in the message.
fn is_certificate_failure(err: &reqwest::Error) -> bool {
    chain_mentions_certificate(err)
}

fn chain_mentions_certificate(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(err) = current {
        let text = err.to_string();
        if text.contains("certificate") || text.contains("UnknownIssuer") {
            return true;
        }
        current = err.source();
    }
    false
}

/// Point-to-point client for the remote store.
#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    tls: TlsFallback,
}

impl StoreClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tls: TlsFallback::new(timeout)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    /// Reads the value at `path`. A missing path is `Ok(None)`; a value
    /// that does not fit `T` is a decode error naming the path.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        let response = self.tls.execute(Method::GET, &self.url(path), None).await?;
        let value: Value = response.json().await?;
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Decode { path: path.to_string(), source })
    }

    /// Writes the full value at `path`.
    pub async fn put<T: Serialize>(&self, path: &str, value: &T) -> Result<(), StoreError> {
        let body = serde_json::to_value(value)
            .map_err(|source| StoreError::Decode { path: path.to_string(), source })?;
        self.tls.execute(Method::PUT, &self.url(path), Some(&body)).await?;
        Ok(())
    }

    /// Merges `value` into the record at `path`, leaving other fields as
    /// they are. Success only once the store acknowledges the update.
    pub async fn patch(&self, path: &str, value: &Value) -> Result<(), StoreError> {
        self.tls.execute(Method::PATCH, &self.url(path), Some(value)).await?;
        Ok(())
    }
}
