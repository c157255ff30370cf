//! Aggregation of per-entry annotations into per-adapter findings.

use crate::annotation::{AnnotationSlot, Transmission};
use crate::registry::{Adapter, AdapterRegistry};
use crate::{FindingsError, Result};
use hr_har::NormalizedEntry;
use std::collections::HashMap;
use tracing::{debug, info};

/// An archive entry that carried at least one transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedEntry {
    /// Index of the entry in the original archive.
    pub har_index: usize,
    /// Adapter of the first transmission; the grouping key.
    pub adapter_id: String,
    pub transmissions: Vec<Transmission>,
}

/// Property → distinct values, both in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceivedData {
    properties: Vec<(String, Vec<String>)>,
}

impl ReceivedData {
    /// Record a value; repeated values keep their first position.
    pub fn insert(&mut self, property: &str, value: &str) {
        let pos = match self.properties.iter().position(|(p, _)| p == property) {
            Some(pos) => pos,
            None => {
                self.properties.push((property.to_string(), Vec::new()));
                self.properties.len() - 1
            }
        };
        let values = &mut self.properties[pos].1;
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }

    pub fn get(&self, property: &str) -> Option<&[String]> {
        self.properties
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.properties
            .iter()
            .map(|(p, v)| (p.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Everything one adapter received across the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding<'r> {
    pub adapter: &'r Adapter,
    pub requests: Vec<AnnotatedEntry>,
    pub received_data: ReceivedData,
}

/// Findings keyed by adapter id, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings<'r> {
    findings: Vec<Finding<'r>>,
    by_id: HashMap<String, usize>,
}

impl<'r> Findings<'r> {
    pub fn get(&self, adapter_id: &str) -> Option<&Finding<'r>> {
        self.by_id.get(adapter_id).map(|&i| &self.findings[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding<'r>> {
        self.findings.iter()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether any finding references the archive entry at `har_index`.
    pub fn references(&self, har_index: usize) -> bool {
        self.findings
            .iter()
            .any(|f| f.requests.iter().any(|r| r.har_index == har_index))
    }

    /// Sorted, distinct archive indices referenced by any finding.
    pub fn har_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .findings
            .iter()
            .flat_map(|f| f.requests.iter().map(|r| r.har_index))
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Group annotated entries by adapter.
///
/// Each entry is grouped under the adapter of its *first* transmission, even
/// if later transmissions name a different adapter. Unknown adapters abort
/// the whole aggregation.
pub fn aggregate<'r>(
    entries: &[NormalizedEntry],
    annotations: &[AnnotationSlot],
    registry: &'r AdapterRegistry,
) -> Result<Findings<'r>> {
    if annotations.len() > entries.len() {
        return Err(FindingsError::SlotCountMismatch {
            entries: entries.len(),
            slots: annotations.len(),
        });
    }

    let mut findings = Findings::default();

    let annotated = annotations
        .iter()
        .enumerate()
        .filter_map(|(har_index, slot)| match slot.as_deref() {
            Some([first, ..]) => Some(AnnotatedEntry {
                har_index,
                adapter_id: first.adapter_id.clone(),
                transmissions: slot.clone().unwrap_or_default(),
            }),
            _ => None,
        });

    for entry in annotated {
        let existing = findings.by_id.get(&entry.adapter_id).copied();
        let idx = match existing {
            Some(idx) => idx,
            None => {
                let adapter = registry
                    .get(&entry.adapter_id)
                    .ok_or_else(|| FindingsError::UnknownAdapter(entry.adapter_id.clone()))?;
                debug!(adapter = %entry.adapter_id, "New finding");
                findings.findings.push(Finding {
                    adapter,
                    requests: Vec::new(),
                    received_data: ReceivedData::default(),
                });
                let idx = findings.findings.len() - 1;
                findings.by_id.insert(entry.adapter_id.clone(), idx);
                idx
            }
        };

        let finding = &mut findings.findings[idx];
        for t in &entry.transmissions {
            finding.received_data.insert(&t.property, &t.value);
        }
        finding.requests.push(entry);
    }

    info!(
        findings = findings.len(),
        annotated_entries = findings.har_indices().len(),
        "Findings aggregated"
    );

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Tracker;

    fn registry() -> AdapterRegistry {
        let adapter = |tracker: &str, slug: &str| Adapter {
            tracker: Tracker {
                slug: tracker.into(),
                name: tracker.to_uppercase(),
            },
            slug: slug.into(),
            name: slug.to_uppercase(),
        };
        AdapterRegistry::new(vec![
            adapter("exampleTracker", "exampleAdapter"),
            adapter("other", "events"),
        ])
        .unwrap()
    }

    fn entries(n: usize) -> Vec<NormalizedEntry> {
        let json = format!(
            r#"{{"log": {{"entries": [{}]}}}}"#,
            vec![
                r#"{"startedDateTime": "2024-01-01T00:00:00Z",
                    "request": {"method": "GET", "url": "https://a.example/", "httpVersion": "HTTP/1.1"},
                    "response": {"status": 200, "statusText": "OK", "httpVersion": "HTTP/1.1"}}"#;
                n
            ]
            .join(",")
        );
        hr_har::normalize(&hr_har::parse_har(&json).unwrap()).unwrap()
    }

    fn slot(items: &[(&str, &str, &str)]) -> AnnotationSlot {
        Some(
            items
                .iter()
                .map(|(a, p, v)| Transmission::new(*a, *p, *v))
                .collect(),
        )
    }

    const EX: &str = "exampleTracker/exampleAdapter";

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let registry = registry();
        let annotations = vec![
            slot(&[(EX, "ad_id", "X")]),
            slot(&[(EX, "ad_id", "X")]),
            slot(&[(EX, "ad_id", "Y"), (EX, "os", "android")]),
        ];
        let findings = aggregate(&entries(3), &annotations, &registry).unwrap();

        let finding = findings.get(EX).unwrap();
        assert_eq!(finding.received_data.get("ad_id").unwrap(), ["X", "Y"]);
        assert_eq!(finding.received_data.get("os").unwrap(), ["android"]);
        assert_eq!(finding.requests.len(), 3);
    }

    #[test]
    fn test_single_value_not_duplicated() {
        let registry = registry();
        let annotations = vec![slot(&[(EX, "ad_id", "X")]), slot(&[(EX, "ad_id", "X")])];
        let findings = aggregate(&entries(2), &annotations, &registry).unwrap();
        assert_eq!(findings.get(EX).unwrap().received_data.get("ad_id").unwrap(), ["X"]);
    }

    #[test]
    fn test_empty_slots_skipped_and_indices_kept() {
        let registry = registry();
        let annotations = vec![None, Some(vec![]), slot(&[(EX, "device_id", "abc123")])];
        let findings = aggregate(&entries(3), &annotations, &registry).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings.get(EX).unwrap().requests[0].har_index, 2);
        assert_eq!(findings.har_indices(), vec![2]);
        assert!(findings.references(2));
        assert!(!findings.references(0));
    }

    #[test]
    fn test_grouped_by_first_transmission() {
        let registry = registry();
        let annotations = vec![slot(&[(EX, "a", "1"), ("other/events", "b", "2")])];
        let findings = aggregate(&entries(1), &annotations, &registry).unwrap();

        assert_eq!(findings.len(), 1);
        assert!(findings.get("other/events").is_none());
        let finding = findings.get(EX).unwrap();
        assert_eq!(finding.received_data.get("b").unwrap(), ["2"]);
    }

    #[test]
    fn test_adapter_order_is_first_seen() {
        let registry = registry();
        let annotations = vec![
            slot(&[("other/events", "a", "1")]),
            slot(&[(EX, "a", "1")]),
            slot(&[("other/events", "a", "2")]),
        ];
        let findings = aggregate(&entries(3), &annotations, &registry).unwrap();
        let ids: Vec<String> = findings.iter().map(|f| f.adapter.id()).collect();
        assert_eq!(ids, vec!["other/events".to_string(), EX.to_string()]);
    }

    #[test]
    fn test_unknown_adapter_is_fatal() {
        let registry = registry();
        let annotations = vec![
            slot(&[(EX, "a", "1")]),
            slot(&[("nonexistent/slug", "a", "1")]),
            slot(&[(EX, "a", "2")]),
        ];
        let err = aggregate(&entries(3), &annotations, &registry).unwrap_err();
        assert!(matches!(err, FindingsError::UnknownAdapter(id) if id == "nonexistent/slug"));
    }

    #[test]
    fn test_too_many_slots_rejected() {
        let registry = registry();
        let annotations = vec![None, None];
        let err = aggregate(&entries(1), &annotations, &registry).unwrap_err();
        assert!(matches!(
            err,
            FindingsError::SlotCountMismatch { entries: 1, slots: 2 }
        ));
    }

    #[test]
    fn test_fewer_slots_allowed() {
        let registry = registry();
        let findings = aggregate(&entries(2), &[], &registry).unwrap();
        assert!(findings.is_empty());
    }
}
