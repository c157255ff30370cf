//! Canonical, normalized view of an archive entry.

use crate::archive::{Cookie, Header, Param};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// URL scheme of a captured request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded query string parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

/// Request body: either raw text or structured form parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Params(Vec<Param>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRequest {
    pub http_version: String,
    pub method: String,

    pub scheme: Scheme,
    pub host: String,
    /// Explicit port; `None` when the URL uses the scheme's default.
    pub port: Option<u16>,
    /// Path including the query string.
    pub path: String,
    pub path_without_query: String,
    pub query_params: Vec<QueryParam>,

    pub headers: Vec<Header>,
    pub cookies: Vec<Cookie>,

    pub content: Option<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedResponse {
    pub status: i64,
    pub status_text: String,
    pub http_version: String,

    pub headers: Vec<Header>,
    pub cookies: Vec<Cookie>,

    /// Decoded body. Base64 bodies are mapped byte-for-char.
    pub content: Option<String>,
}

/// One request/response pair after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEntry {
    pub start_time: DateTime<Utc>,
    pub request: NormalizedRequest,
    pub response: NormalizedResponse,
}
