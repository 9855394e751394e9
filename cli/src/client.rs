//! ApiClient: HTTP client for a running Scholarboard server

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Thin JSON client over the dashboard API
pub struct ApiClient {
    base_url: String,
    http_client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Value> {
        let url = reqwest::Url::parse_with_params(&self.url(path), query)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let response = self.http_client.get(url).send().await?;
        Self::decode(response).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        let response = self.http_client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> ClientResult<Value> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let error_body: Value = response
            .json()
            .await
            .unwrap_or_else(|_| serde_json::json!({"error": "Unknown error"}));
        let message = error_body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
