//! # HTTP Transport
//!
//! Every remote call goes through the `HttpTransport` trait so the platform
//! clients can be exercised against recorded fakes. `ReqwestTransport` is
//! the real implementation on top of the blocking `reqwest` client.
//!
//! Requests carry JSON bodies only. Responses are buffered in full and
//! handed back with their status; deciding what a status means is left to
//! the caller, through `Response::expect_success`.

use crate::defaults;
use crate::error::{Error, Result};
use crate::phases::Step;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
        }
    }
}

/// How a request authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum Auth {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Cookie: token=<token>`
    Cookie(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Bearer(_) => write!(f, "Bearer(<redacted>)"),
            Auth::Cookie(_) => write!(f, "Cookie(<redacted>)"),
        }
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub auth: Option<Auth>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            auth: None,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: Url) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.auth = Some(Auth::Bearer(token.to_string()));
        self
    }

    pub fn cookie(mut self, token: &str) -> Self {
        self.auth = Some(Auth::Cookie(token.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Error bodies of the platforms we talk to.
///
/// GitHub and Deno Deploy answer `{"message": ...}`; Cloudflare answers
/// `{"errors": [{"message": ...}]}`.
#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self, step: Step) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Decode {
            step,
            message: e.to_string(),
        })
    }

    /// Platform-supplied error message, if the body carries one.
    pub fn error_message(&self) -> Option<String> {
        let error: ApiError = serde_json::from_slice(&self.body).ok()?;
        error
            .message
            .or_else(|| error.errors.into_iter().find_map(|entry| entry.message))
            .filter(|message| !message.is_empty())
    }

    /// Turn a non-2xx response into `Error::Status` for `step`.
    pub fn expect_success(self, step: Step) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Status {
                step,
                status: self.status,
                message: self.error_message(),
            })
        }
    }
}

/// Failure to obtain any response at all.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends requests. Implemented by `ReqwestTransport` and by test fakes.
pub trait HttpTransport {
    fn send(&self, request: &Request) -> std::result::Result<Response, TransportError>;

    /// Send and attribute transport failures to `step`.
    fn send_for(&self, step: Step, request: &Request) -> Result<Response> {
        log::debug!("{} {}", request.method, request.url);
        let response = self.send(request).map_err(|e| Error::Network {
            step,
            message: e.to_string(),
        })?;
        log::debug!("{} {} -> {}", request.method, request.url, response.status);
        Ok(response)
    }
}

/// `HttpTransport` backed by a blocking `reqwest` client.
///
/// No timeout is configured beyond the client default.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(defaults::user_agent())
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &Request) -> std::result::Result<Response, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.client.request(method, request.url.clone());
        builder = match &request.auth {
            Some(Auth::Bearer(token)) => builder.bearer_auth(token),
            Some(Auth::Cookie(token)) => {
                builder.header(reqwest::header::COOKIE, format!("token={}", token))
            }
            None => builder,
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| TransportError(e.without_url().to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| TransportError(e.without_url().to_string()))?;

        Ok(Response::new(status, body.to_vec()))
    }
}
