use anyhow::Result;
use http_body_util::{BodyExt, Full};
use hyper::{body::Bytes, Method, Request, Response, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone)]
pub struct TestClient {
    base_url: String,
    client: Client<hyper_util::client::legacy::connect::HttpConnector, Full<Bytes>>,
}

impl TestClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Self {
            base_url: base_url.to_string(),
            client,
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::GET, path, Bytes::new(), &[]).await
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        self.post_with_headers(path, body, &[]).await
    }

    pub async fn post_with_headers<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let mut all_headers = vec![("Content-Type", "application/json")];
        all_headers.extend_from_slice(headers);
        let body = Bytes::from(serde_json::to_vec(body)?);
        self.request(Method::POST, path, body, &all_headers).await
    }

    /// POST an arbitrary body, for malformed payloads
    pub async fn post_raw(&self, path: &str, body: &'static [u8]) -> Result<ApiResponse> {
        self.request(
            Method::POST,
            path,
            Bytes::from_static(body),
            &[("Content-Type", "application/json")],
        )
        .await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Bytes,
        headers: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);
        let mut req_builder = Request::builder().method(method).uri(&url);

        for (name, value) in headers {
            req_builder = req_builder.header(*name, *value);
        }

        let request = req_builder.body(Full::new(body))?;
        let response = self.client.request(request).await?;

        ApiResponse::from_response(response).await
    }
}

pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub body_bytes: Vec<u8>,
    pub headers: HashMap<String, String>,
}

impl ApiResponse {
    async fn from_response(response: Response<hyper::body::Incoming>) -> Result<Self> {
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();

        let body_bytes = response.into_body().collect().await?.to_bytes().to_vec();

        let body = if !body_bytes.is_empty() {
            serde_json::from_slice(&body_bytes).ok()
        } else {
            None
        };

        Ok(Self {
            status,
            body,
            body_bytes,
            headers,
        })
    }

    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {} but got {}. Body: {:?}",
            expected, self.status, self.body
        );
        self
    }

    /// Assert the JSON error body matches exactly
    pub fn assert_error_body(&self, expected: Value) -> &Self {
        assert_eq!(
            self.body.as_ref(),
            Some(&expected),
            "Unexpected error body: {:?}",
            String::from_utf8_lossy(&self.body_bytes)
        );
        self
    }

    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    pub fn assert_header(&self, name: &str, value: &str) -> &Self {
        let actual = self
            .headers
            .get(name)
            .unwrap_or_else(|| panic!("Header '{}' not found", name));
        assert_eq!(actual, value, "Header '{}' value mismatch", name);
        self
    }

    pub fn assert_header_exists(&self, name: &str) -> &Self {
        assert!(
            self.headers.contains_key(name),
            "Header '{}' not found",
            name
        );
        self
    }
}
