//! HTTP transport abstraction.
//!
//! The API client only needs one primitive: send a request, get back a status
//! code and a body. Status interpretation and JSON decoding happen in the
//! client, so any transport (including test doubles) only has to report
//! network-level failures.

mod client;

use async_trait::async_trait;
use std::fmt;

use crate::config::Credentials;
use crate::error::Result;

pub use client::ReqwestTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A fully built request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// Sent as HTTP Basic authentication
    pub auth: Option<Credentials>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
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

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange.
    ///
    /// Non-2xx statuses are returned as responses, not errors. Only failures
    /// that prevent a response from arriving are reported as `Error::Transport`.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}
