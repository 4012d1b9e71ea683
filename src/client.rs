//! HTTP client for the Stonebranch API.
//!
//! Every call returns a JSON value. Failures are folded into an object of the
//! form `{"error": "<message>"}` so the shell can keep going after any error.
//! Paths are built segment by segment, so user-supplied ids are percent-encoded
//! and can never step outside the resource they name.

use crate::config::ApiConfig;
use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Url};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Why a call produced no usable JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    /// The body was not valid JSON.
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Convert into the `{"error": ...}` shape the shell prints.
    pub fn into_value(self) -> Value {
        let mut message = self.to_string();
        if message.is_empty() {
            message = match self {
                ApiError::Request(_) => "request failed".to_string(),
                ApiError::Decode(_) => "invalid JSON response".to_string(),
            };
        }
        json!({ "error": message })
    }
}

/// Client for the Stonebranch HTTP API.
pub struct ApiClient {
    base_url: Url,
    client: Client,
}

impl ApiClient {
    /// Create a new client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid API base URL: {}", config.base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid API base URL: {}", config.base_url));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { base_url, client })
    }

    /// The API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// GET `/api/<segments..>` with optional query parameters.
    pub async fn call(&self, segments: &[&str], params: &[(&str, &str)]) -> Value {
        let mut path = Vec::with_capacity(segments.len() + 1);
        path.push("api");
        path.extend_from_slice(segments);
        self.get(self.url_for(&path), params).await
    }

    /// GET a path outside `/api`, e.g. `&["health"]`.
    pub async fn call_path(&self, segments: &[&str]) -> Value {
        self.get(self.url_for(segments), &[]).await
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get(&self, url: Url, params: &[(&str, &str)]) -> Value {
        match self.try_get(&url, params).await {
            Ok(value) => value,
            Err(e) => {
                warn!(path = url.path(), error = %e, kind = ?e, "API call failed");
                e.into_value()
            }
        }
    }

    async fn try_get(&self, url: &Url, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        debug!(%url, ?params, "GET");

        let mut request = self.client.get(url.clone());
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "response received");

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: url.to_string(),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    fn assert_error_shape(value: &Value) {
        let object = value.as_object().expect("error value should be an object");
        assert_eq!(object.len(), 1);
        let message = object["error"].as_str().expect("error should be a string");
        assert!(!message.is_empty());
    }

    #[tokio::test]
    async fn test_call_returns_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/agents")
            .match_query(Matcher::UrlEncoded("agentname".into(), "PROD-AGENT-01".into()))
            .with_header("content-type", "application/json")
            .with_body(r#"{"name":"PROD-AGENT-01","status":"Online"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let value = client.call(&["agents"], &[("agentname", "PROD-AGENT-01")]).await;

        mock.assert_async().await;
        assert_eq!(value["status"], "Online");
    }

    #[tokio::test]
    async fn test_call_without_params_sends_no_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tasks")
            .match_query(Matcher::Missing)
            .with_body(r#"{"message":"taskname is required"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let value = client.call(&["tasks"], &[]).await;

        mock.assert_async().await;
        assert_eq!(value["message"], "taskname is required");
    }

    #[tokio::test]
    async fn test_error_status_body_is_passed_through() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/task-instances")
            .with_status(500)
            .with_body(r#"{"error":"Authentication failed: bad credentials"}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let value = client.call(&["task-instances"], &[]).await;

        assert_eq!(value["error"], "Authentication failed: bad credentials");
    }

    #[tokio::test]
    async fn test_invalid_json_becomes_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/docs")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = client_for(&server.url());
        let value = client.call(&["docs"], &[]).await;

        assert_error_shape(&value);
    }

    #[tokio::test]
    async fn test_empty_body_becomes_error() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/health").create_async().await;

        let client = client_for(&server.url());
        let value = client.call_path(&["health"]).await;

        assert_error_shape(&value);
    }

    #[tokio::test]
    async fn test_connection_failure_becomes_error() {
        // Bind then drop a listener so the port is known to be closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = client_for(&format!("http://127.0.0.1:{}", port));
        let value = client.call(&["agents"], &[]).await;

        assert_error_shape(&value);
    }

    #[tokio::test]
    async fn test_segments_are_percent_encoded() {
        let mut server = mockito::Server::new_async().await;
        let slash = server
            .mock("GET", "/api/agents/a%2Fb")
            .with_body("{}")
            .create_async()
            .await;
        let query = server
            .mock("GET", "/api/agents/x%3Ftaskname=y%23frag")
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server.url());
        client.call(&["agents", "a/b"], &[]).await;
        client.call(&["agents", "x?taskname=y#frag"], &[]).await;

        slash.assert_async().await;
        query.assert_async().await;
    }

    #[tokio::test]
    async fn test_segments_cannot_climb_out_of_api() {
        let mut server = mockito::Server::new_async().await;
        let health = server
            .mock("GET", "/health")
            .expect(0)
            .create_async()
            .await;
        let agent = server
            .mock("GET", "/api/agents/..%2F..%2Fhealth")
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server.url());
        client.call(&["agents", "../../health"], &[]).await;

        health.assert_async().await;
        agent.assert_async().await;
    }

    #[test]
    fn test_invalid_base_url_is_an_error() {
        let result = ApiClient::new(&ApiConfig {
            base_url: "localhost:3001".to_string(),
            timeout_secs: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = client_for("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }
}
