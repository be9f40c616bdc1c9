//! Blocking execution of `HttpRequest` values.
//!
//! `Transport` is the seam between request building and the network. The
//! default `UreqTransport` disables ureq's status-code-as-error behavior so
//! 4xx/5xx responses come back as data and `TodoistClient::parse_*` decides
//! what they mean.

use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes a built request and hands back the raw response.
pub trait Transport {
    /// Perform one round-trip. Only failures that prevent getting a response
    /// at all are errors here.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Blocking `Transport` over a shared `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut response = match (method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &headers).call()?,
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&url), &headers).call()?,
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&url), &headers).send(body.as_bytes())?
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), &headers).send_empty()?,
        };

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        tracing::debug!(status, "received response");

        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}
