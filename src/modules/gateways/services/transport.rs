//! HTTP boundary.
//!
//! Gateways hand a fully encoded request to an [`HttpTransport`] and get raw
//! bytes back. Pooling, TLS and timeouts belong to the transport; it never
//! retries, since a retried charge may be a double charge.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::error;

use crate::core::{PosError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>, content_type: &str, body: String) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Exchanges one request for one response. Implementations are shared across
/// gateways and must be stateless per call.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// reqwest backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await.map_err(|e| {
            error!(url = %request.url, error = %e, "Bank request failed");
            if e.is_timeout() || e.is_connect() {
                PosError::transport(format!("{} {}: {}", request.method, request.url, e))
            } else {
                PosError::HttpClient(e)
            }
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        if !status.is_success() {
            return Err(PosError::transport(format!(
                "bank answered HTTP {} for {}",
                status.as_u16(),
                request.url
            )));
        }

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}
