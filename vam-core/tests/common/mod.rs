// File: vam-core/tests/common/mod.rs
//
// Shared test plumbing: a scripted HTTP client standing in for the
// avatar platform.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use vam_common::Error;
use vam_core::http::{HttpClient, HttpResponse};

/// One request issued through the mock.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

/// Scripted HTTP client: responses are handed out first-in first-out and
/// every request is recorded for inspection.
#[derive(Default)]
pub struct MockHttpClient {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<HttpResponse, Error> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Platform("mock ran out of scripted responses".into()))
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(
        &self,
        url: String,
        headers: HashMap<String, String>,
    ) -> Result<HttpResponse, Error> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: "GET",
            url,
            headers,
            body: None,
        });
        self.next_response()
    }

    async fn post_json(
        &self,
        url: String,
        headers: HashMap<String, String>,
        body: String,
    ) -> Result<HttpResponse, Error> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: "POST",
            url,
            headers,
            body: Some(body),
        });
        self.next_response()
    }
}

/// JSON for one synthetic avatar record.
pub fn avatar_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "thumbnailImageUrl": format!("https://files.example/{id}.png"),
        "releaseStatus": "private"
    })
}

/// JSON array of `n` synthetic avatars with ids starting at `start`.
pub fn avatar_page(start: usize, n: usize) -> String {
    let items: Vec<serde_json::Value> = (start..start + n)
        .map(|i| avatar_json(&format!("avtr_{i}"), &format!("Avatar {i}")))
        .collect();
    serde_json::Value::Array(items).to_string()
}
