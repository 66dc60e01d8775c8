use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service unreachable: {0}")]
    Unreachable(String),
}

/// Request/response seam between step screens and the `/api` service.
///
/// Implementations return the decoded JSON body for any HTTP status, so
/// application-level failures (`success: false`) reach the caller intact.
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn get_json(&self, path: &str) -> Result<Value, TransportError>;
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        let resp = self.client.get(self.url(path)).send().await?;
        debug!("GET {path} -> {}", resp.status());
        Ok(resp.json::<Value>().await?)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        debug!("POST {path} -> {}", resp.status());
        Ok(resp.json::<Value>().await?)
    }
}
