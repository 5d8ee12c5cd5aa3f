use std::fmt;
use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::ReelResult;

/// Publishing-platform client scoped to one account and access token.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    root: String,
    user_id: String,
    access_token: String,
}

impl GraphClient {
    pub fn new(
        http: reqwest::Client,
        root: impl Into<String>,
        user_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            root: root.into(),
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(http, &config.graph_root, &config.ig_user_id, &config.ig_token)
    }

    pub fn media_endpoint(&self) -> String {
        format!("{}/{}/media", self.root, self.user_id)
    }

    pub fn publish_endpoint(&self) -> String {
        format!("{}/{}/media_publish", self.root, self.user_id)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        debug!("POST {}", url);
        self.http
            .post(url)
            .query(&[("access_token", self.access_token.as_str())])
    }

    pub async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> ReelResult<GraphReply> {
        GraphReply::read(self.post(url).form(fields)).await
    }

    pub async fn post_multipart(&self, url: &str, form: Form) -> ReelResult<GraphReply> {
        GraphReply::read(self.post(url).multipart(form)).await
    }

    pub async fn post_query(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> ReelResult<GraphReply> {
        GraphReply::read(self.post(url).query(params).timeout(timeout)).await
    }
}

impl fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphClient")
            .field("root", &self.root)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Status and decoded body of one platform call. Bodies that are not JSON are kept as a string.
#[derive(Debug, Clone)]
pub struct GraphReply {
    pub status: StatusCode,
    pub body: Value,
}

impl GraphReply {
    async fn read(req: RequestBuilder) -> ReelResult<Self> {
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        debug!("Graph replied {}: {}", status, body);
        Ok(Self { status, body })
    }

    /// String-valued field; numeric ids are accepted and rendered as decimal.
    pub fn str_field(&self, key: &str) -> Option<String> {
        match self.body.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Byte offset sent either as a JSON number or as a decimal string.
    pub fn offset_field(&self, key: &str) -> Option<u64> {
        match self.body.get(key)? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// Short human-readable reason for a reply that lacked what the caller needed.
    pub fn describe(&self) -> String {
        let err = &self.body["error"];
        if let Some(message) = err["message"].as_str() {
            return match err.get("code") {
                Some(code) => format!("{} (HTTP {}, code {})", message, self.status.as_u16(), code),
                None => format!("{} (HTTP {})", message, self.status.as_u16()),
            };
        }
        format!("HTTP {}: {}", self.status.as_u16(), self.body)
    }
}
