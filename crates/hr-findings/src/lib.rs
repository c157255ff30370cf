//! Tracker adapter registry and findings aggregation for har-report.
//!
//! An external detector annotates archive entries with transmissions
//! (`adapter`, `property`, `value`). This crate resolves those annotations
//! against a static [`AdapterRegistry`] and folds them into one [`Finding`]
//! per adapter, with distinct received values per property.

pub mod aggregate;
pub mod annotation;
pub mod error;
pub mod registry;

pub use aggregate::{aggregate, AnnotatedEntry, Finding, Findings, ReceivedData};
pub use annotation::{parse_annotations, AnnotationSlot, Transmission};
pub use error::{FindingsError, Result};
pub use registry::{Adapter, AdapterRegistry, Tracker};
