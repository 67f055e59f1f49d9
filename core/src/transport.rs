//! Executes `HttpRequest` values against the network.
//!
//! A transport only fails when no response was obtained. Status codes are
//! interpreted by `ClinicClient::parse_*`, so a 409 comes back as an ordinary
//! `HttpResponse`.

use std::future::Future;

use crate::error::RequestFailure;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, RequestFailure>> + Send;
}

/// Async transport backed by a single shared `reqwest::Client`.
///
/// No retries and no timeout are applied; callers may wrap calls in their own
/// timeout.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, RequestFailure>> + Send {
        let client = self.client.clone();
        async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Patch => reqwest::Method::PATCH,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut builder = client.request(method, &request.path);
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| {
                if e.is_connect() {
                    RequestFailure::transport(format!("could not connect to {}: {e}", request.path))
                } else {
                    RequestFailure::transport(e.to_string())
                }
            })?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
                .collect();
            let body = response
                .text()
                .await
                .map_err(|e| RequestFailure::transport(e.to_string()))?;

            Ok(HttpResponse { status, headers, body })
        }
    }
}
