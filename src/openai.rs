use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use tracing::debug;

/// Thin wrapper over the OpenAI REST endpoints used by the pipeline.
#[derive(Clone)]
pub struct OpenAi {
    http: reqwest::Client,
    base: String,
    api_key: String,
}

impl OpenAi {
    pub fn new(http: reqwest::Client, base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base: base.into(),
            api_key: api_key.into(),
        }
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn post_json<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> RequestBuilder {
        let url = format!("{}/{}", self.base, endpoint.trim_start_matches('/'));
        debug!("POST {}", url);
        self.http.post(url).bearer_auth(&self.api_key).json(body)
    }
}

/// Reads the upstream error text for a failed call so it can be attached to an error.
pub async fn describe_failure(res: Response) -> String {
    let status = res.status();
    let body = res
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    format!("{}: {}", status, message)
}
