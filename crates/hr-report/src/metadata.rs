//! Report metadata supplied by the analysis producer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mobile platform the analysed app runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        })
    }
}

/// Facts about the analysis run.
///
/// These come from the producer, not from the archive, and are inserted into
/// the document without quoting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub platform: Platform,
    pub app_name: String,
    pub app_version: String,
    /// Store or homepage URL of the app.
    #[serde(default)]
    pub app_url: Option<String>,
    pub analysis_date: DateTime<Utc>,
    pub analysis_platform_version: String,
    /// Lowercase hex SHA-256 of the raw archive. Digests under other
    /// names (`harMd5`) are ignored and recomputed.
    #[serde(default)]
    pub har_checksum: Option<String>,
}

impl ReportMetadata {
    /// Load metadata from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Fill in the archive checksum unless the producer supplied one.
    pub fn with_default_checksum(mut self, checksum: impl Into<String>) -> Self {
        if self.har_checksum.is_none() {
            self.har_checksum = Some(checksum.into());
        }
        self
    }
}
