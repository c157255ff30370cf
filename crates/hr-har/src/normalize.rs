//! Archive normalization.
//!
//! Converts the raw HAR model into [`NormalizedEntry`] values. The
//! conversion is all-or-nothing: the first bad entry fails the whole call.

use crate::archive::{Entry, Har, PostData, ResponseContent};
use crate::entry::{
    Content, NormalizedEntry, NormalizedRequest, NormalizedResponse, QueryParam, Scheme,
};
use crate::{HarError, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use url::Url;

/// The only content encoding that is decoded rather than rejected.
pub const TRANSPARENT_ENCODING: &str = "base64";

/// Capture tools emit both padded and unpadded bodies.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Parse archive JSON text.
pub fn parse_har(json: &str) -> Result<Har> {
    serde_json::from_str(json).map_err(|e| HarError::MalformedArchive {
        index: None,
        reason: e.to_string(),
    })
}

/// Parse archive JSON bytes.
pub fn parse_har_bytes(bytes: &[u8]) -> Result<Har> {
    serde_json::from_slice(bytes).map_err(|e| HarError::MalformedArchive {
        index: None,
        reason: e.to_string(),
    })
}

/// Lowercase hex SHA-256 of the raw archive bytes.
pub fn archive_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Normalize every entry of the archive, preserving order.
pub fn normalize(har: &Har) -> Result<Vec<NormalizedEntry>> {
    debug!(entries = har.log.entries.len(), "Normalizing archive");

    let entries = har
        .log
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_entry(index, entry))
        .collect::<Result<Vec<_>>>()?;

    info!(entries = entries.len(), "Archive normalized");
    Ok(entries)
}

fn normalize_entry(index: usize, entry: &Entry) -> Result<NormalizedEntry> {
    let start_time = DateTime::parse_from_rfc3339(&entry.started_date_time)
        .map_err(|e| {
            HarError::malformed(
                index,
                format!("invalid startedDateTime '{}': {e}", entry.started_date_time),
            )
        })?
        .with_timezone(&Utc);

    let url = Url::parse(&entry.request.url).map_err(|e| {
        HarError::malformed(index, format!("invalid URL '{}': {e}", entry.request.url))
    })?;

    let scheme = match url.scheme() {
        "http" => Scheme::Http,
        "https" => Scheme::Https,
        other => {
            return Err(HarError::malformed(
                index,
                format!("unsupported URL scheme '{other}'"),
            ))
        }
    };

    let host = url
        .host_str()
        .ok_or_else(|| HarError::malformed(index, format!("URL '{url}' has no host")))?
        .to_string();

    let path_without_query = url.path().to_string();
    let path = match url.query() {
        Some(q) if !q.is_empty() => format!("{path_without_query}?{q}"),
        _ => path_without_query.clone(),
    };

    let query_params = url
        .query_pairs()
        .map(|(name, value)| QueryParam {
            name: name.into_owned(),
            value: value.into_owned(),
        })
        .collect();

    let request = NormalizedRequest {
        http_version: entry.request.http_version.clone(),
        method: entry.request.method.clone(),
        scheme,
        host,
        port: url.port(),
        path,
        path_without_query,
        query_params,
        headers: entry.request.headers.clone(),
        cookies: entry.request.cookies.clone(),
        content: request_content(entry.request.post_data.as_ref()),
    };

    let response = NormalizedResponse {
        status: entry.response.status,
        status_text: entry.response.status_text.clone(),
        http_version: entry.response.http_version.clone(),
        headers: entry.response.headers.clone(),
        cookies: entry.response.cookies.clone(),
        content: decode_content(index, entry.response.content.as_ref())?,
    };

    Ok(NormalizedEntry {
        start_time,
        request,
        response,
    })
}

fn request_content(post_data: Option<&PostData>) -> Option<Content> {
    let post_data = post_data?;
    match &post_data.params {
        Some(params) if !params.is_empty() => Some(Content::Params(params.clone())),
        _ => post_data.text.clone().map(Content::Text),
    }
}

/// Decode response content.
///
/// Base64 bodies become one char per decoded byte (U+0000..=U+00FF) so that
/// binary bodies survive untouched for hex dumping.
pub fn decode_content(index: usize, content: Option<&ResponseContent>) -> Result<Option<String>> {
    let Some(text) = content
        .and_then(|c| c.text.as_deref())
        .filter(|t| !t.is_empty())
    else {
        return Ok(None);
    };

    // `text` being Some implies `content` is Some.
    match content.and_then(|c| c.encoding.as_deref()) {
        None => Ok(Some(text.to_string())),
        Some(TRANSPARENT_ENCODING) => {
            // line-wrapped bodies are common
            let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let bytes = BODY_ENGINE
                .decode(compact)
                .map_err(|e| HarError::malformed(index, format!("invalid base64 content: {e}")))?;
            Ok(Some(bytes.iter().map(|&b| char::from(b)).collect()))
        }
        Some(other) => Err(HarError::UnsupportedEncoding {
            index,
            encoding: other.to_string(),
        }),
    }
}
