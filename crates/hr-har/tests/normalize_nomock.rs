//! Archive normalization tests against realistic captures.
//!
//! No mocks: archives are parsed from JSON text exactly as a capture tool
//! would write them.

use hr_har::{normalize, parse_har, Content, HarError, Scheme};
use proptest::prelude::*;

const CAPTURE: &str = r#"{
  "log": {
    "version": "1.2",
    "creator": {"name": "mitmproxy", "version": "10.0"},
    "entries": [
      {
        "startedDateTime": "2024-01-15T14:30:22.000Z",
        "time": 12.5,
        "request": {
          "method": "GET",
          "url": "https://app.example/api/config?lang=en",
          "httpVersion": "HTTP/2.0",
          "headers": [{"name": "accept", "value": "application/json"}],
          "cookies": [],
          "queryString": [{"name": "lang", "value": "en"}],
          "headersSize": -1,
          "bodySize": 0
        },
        "response": {
          "status": 200,
          "statusText": "",
          "httpVersion": "HTTP/2.0",
          "headers": [],
          "cookies": [{"name": "sid", "value": "x1", "httpOnly": true}],
          "content": {"size": 11, "mimeType": "application/json", "text": "eyJvayI6MX0=", "encoding": "base64"},
          "redirectURL": ""
        },
        "cache": {},
        "timings": {"send": 0, "wait": 10, "receive": 2}
      },
      {
        "startedDateTime": "2024-01-15T14:30:23.250Z",
        "request": {
          "method": "POST",
          "url": "https://tracker.example/collect",
          "httpVersion": "HTTP/1.1",
          "headers": [{"name": "content-type", "value": "application/x-www-form-urlencoded"}],
          "postData": {
            "mimeType": "application/x-www-form-urlencoded",
            "params": [{"name": "device_id", "value": "abc123"}],
            "text": "device_id=abc123"
          }
        },
        "response": {
          "status": 204,
          "statusText": "No Content",
          "httpVersion": "HTTP/1.1"
        }
      }
    ]
  }
}"#;

#[test]
fn test_capture_normalizes_in_order() {
    let har = parse_har(CAPTURE).unwrap();
    let entries = normalize(&har).unwrap();

    assert_eq!(entries.len(), har.log.entries.len());
    for (entry, raw) in entries.iter().zip(&har.log.entries) {
        assert_eq!(entry.request.method, raw.request.method);
        assert!(raw.request.url.contains(&entry.request.host));
    }

    let first = &entries[0];
    assert_eq!(first.request.scheme, Scheme::Https);
    assert_eq!(first.request.path, "/api/config?lang=en");
    assert_eq!(first.response.content.as_deref(), Some("{\"ok\":1}"));
    assert_eq!(first.response.cookies[0].http_only, Some(true));

    let second = &entries[1];
    assert_eq!(second.request.host, "tracker.example");
    assert!(matches!(&second.request.content, Some(Content::Params(p)) if p[0].name == "device_id"));
    assert_eq!(second.response.content, None);
    assert!(second.response.headers.is_empty());
}

#[test]
fn test_one_bad_entry_fails_whole_archive() {
    let broken = CAPTURE.replace("https://tracker.example/collect", "::not-a-url::");
    let har = parse_har(&broken).unwrap();
    let err = normalize(&har).unwrap_err();
    assert!(matches!(err, HarError::MalformedArchive { index: Some(1), .. }));
}

#[test]
fn test_unsupported_encoding_fails_whole_archive() {
    let broken = CAPTURE.replace("\"encoding\": \"base64\"", "\"encoding\": \"gzip\"");
    let har = parse_har(&broken).unwrap();
    let err = normalize(&har).unwrap_err();
    assert!(matches!(err, HarError::UnsupportedEncoding { index: 0, ref encoding } if encoding == "gzip"));
}

#[test]
fn test_non_conforming_archive_rejected() {
    let err = parse_har(r#"{"log": {"pages": []}}"#).unwrap_err();
    assert!(matches!(err, HarError::MalformedArchive { index: None, .. }));
}

proptest! {
    #[test]
    fn prop_normalize_is_deterministic(
        segments in proptest::collection::vec("[a-z0-9]{1,8}", 0..4),
        key in "[a-z]{1,6}",
        value in "[a-zA-Z0-9 ]{0,12}",
    ) {
        let url = format!(
            "https://host.example/{}?{}={}",
            segments.join("/"),
            key,
            value.replace(' ', "+")
        );
        let json = CAPTURE.replace("https://app.example/api/config?lang=en", &url);
        let har = parse_har(&json).unwrap();

        let first = normalize(&har).unwrap();
        let second = normalize(&har).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first[0].request.query_params[0].value, &value);
    }
}
