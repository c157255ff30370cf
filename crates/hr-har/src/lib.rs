//! HAR archive model and normalization for har-report.
//!
//! Reads a captured traffic session (HAR 1.2) and turns it into an ordered
//! list of [`NormalizedEntry`] values: URLs decomposed, request bodies
//! classified as text or form parameters, base64 response bodies decoded.
//!
//! # Example
//!
//! ```no_run
//! use hr_har::{normalize, parse_har};
//!
//! let json = std::fs::read_to_string("session.har").unwrap();
//! let har = parse_har(&json).unwrap();
//! let entries = normalize(&har).unwrap();
//! println!("{} entries", entries.len());
//! ```

pub mod archive;
pub mod entry;
pub mod error;
pub mod normalize;

pub use archive::{Cookie, Har, Header, Param};
pub use entry::{Content, NormalizedEntry, NormalizedRequest, NormalizedResponse, QueryParam, Scheme};
pub use error::{HarError, Result};
pub use normalize::{archive_checksum, normalize, parse_har, parse_har_bytes, TRANSPARENT_ENCODING};
