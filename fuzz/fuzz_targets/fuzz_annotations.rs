//! Fuzz target for detector output.
//!
//! Feeds arbitrary annotation JSON against a fixed two-entry archive.

#![no_main]

use hr_findings::{aggregate, parse_annotations, AdapterRegistry};
use hr_har::{normalize, parse_har};
use libfuzzer_sys::fuzz_target;

const ARCHIVE: &str = r#"{"log": {"entries": [
    {"startedDateTime": "2024-01-15T14:30:22Z",
     "request": {"method": "GET", "url": "https://a.example/", "httpVersion": "HTTP/1.1"},
     "response": {"status": 200, "httpVersion": "HTTP/1.1"}},
    {"startedDateTime": "2024-01-15T14:30:23Z",
     "request": {"method": "POST", "url": "https://b.example/c", "httpVersion": "HTTP/1.1"},
     "response": {"status": 204, "httpVersion": "HTTP/1.1"}}
]}}"#;

const REGISTRY: &str = r#"[
    {"tracker": {"slug": "t", "name": "T"}, "slug": "a", "name": "A"}
]"#;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(slots) = parse_annotations(text) else {
        return;
    };

    let entries = normalize(&parse_har(ARCHIVE).unwrap()).unwrap();
    let registry = AdapterRegistry::from_json(REGISTRY).unwrap();

    if let Ok(findings) = aggregate(&entries, &slots, &registry) {
        for index in findings.har_indices() {
            assert!(index < entries.len());
        }
    }
});
