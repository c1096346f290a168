//! HTTP client abstraction for the avatar-platform proxy.
//!
//! All platform calls go through the `HttpClient` trait so the auth and
//! pagination logic can be exercised against scripted responses in tests.
//! The default implementation wraps reqwest; each login session gets its
//! own instance carrying its own cookie jar, so the `auth` cookie the
//! platform sets during login is replayed on every later request from
//! that session.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use serde_json::Value;

use crate::Error;

/// Raw answer from the upstream API: status code plus body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON, keeping the raw text as a JSON string
    /// when the platform hands back something unparseable.
    pub fn body_json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Convert a failed response into the passthrough error carrying
    /// status and body unchanged.
    pub fn into_upstream_error(self) -> Error {
        let body = self.body_json();
        Error::UpstreamStatus {
            status: self.status,
            body,
        }
    }
}

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(
        &self,
        url: String,
        headers: HashMap<String, String>,
    ) -> Result<HttpResponse, Error>;

    async fn post_json(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<HttpResponse, Error>;
}

/// reqwest-backed client holding one session's cookie jar.
#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    /// Build a client with a fresh cookie jar for a new login session.
    pub fn with_session_jar(user_agent: &str) -> Result<Self, Error> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::ClientBuilder::new()
            .user_agent(user_agent)
            .cookie_provider(jar)
            .build()
            .map_err(|e| Error::Platform(format!("Failed to build reqwest client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(
        &self,
        url: String,
        headers: HashMap<String, String>,
    ) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    async fn post_json(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<HttpResponse, Error> {
        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
