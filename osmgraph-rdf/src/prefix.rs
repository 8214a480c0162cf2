//! Prefix table mapping labels to namespace IRIs.

use crate::error::{RdfError, Result};
use std::collections::BTreeMap;

/// Mapping of prefix labels to namespace IRIs.
///
/// The table iterates in label order, which fixes the header line order of
/// Turtle output. Registration is only permitted until the table is frozen
/// (the writer freezes it when output begins).
#[derive(Debug, Clone, Default)]
pub struct PrefixTable {
    map: BTreeMap<String, String>,
    frozen: bool,
}

impl PrefixTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table seeded with the well-known osmgraph bindings.
    pub fn well_known() -> Self {
        let mut map = BTreeMap::new();
        for (label, iri) in osmgraph_vocab::prefix::well_known() {
            map.insert((*label).to_string(), (*iri).to_string());
        }
        Self { map, frozen: false }
    }

    /// Bind `label` to `iri`.
    ///
    /// Fails with [`RdfError::PrefixAlreadyDefined`] if the label is taken
    /// and [`RdfError::PrefixTableFrozen`] once output has begun.
    pub fn add(&mut self, label: impl Into<String>, iri: impl Into<String>) -> Result<()> {
        let label = label.into();
        if self.frozen {
            return Err(RdfError::PrefixTableFrozen(label));
        }
        if self.map.contains_key(&label) {
            return Err(RdfError::PrefixAlreadyDefined(label));
        }
        self.map.insert(label, iri.into());
        Ok(())
    }

    /// Resolve a label to its namespace IRI.
    ///
    /// Unbound labels resolve to themselves, so downstream encoders treat
    /// the input as a literal namespace IRI.
    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        match self.map.get(label) {
            Some(iri) => iri.as_str(),
            None => label,
        }
    }

    /// Whether `label` is bound.
    pub fn contains(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Iterate `(label, iri)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(l, i)| (l.as_str(), i.as_str()))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Forbid further registrations.
    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_resolve() {
        let mut table = PrefixTable::new();
        table.add("ex", "http://example.org/").unwrap();
        assert_eq!(table.resolve("ex"), "http://example.org/");
    }

    #[test]
    fn unbound_label_resolves_to_itself() {
        let table = PrefixTable::new();
        assert_eq!(table.resolve("http://raw.example/"), "http://raw.example/");
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut table = PrefixTable::new();
        table.add("ex", "http://example.org/").unwrap();
        let err = table.add("ex", "http://other.example/").unwrap_err();
        assert!(matches!(err, RdfError::PrefixAlreadyDefined(l) if l == "ex"));
        // First binding is untouched
        assert_eq!(table.resolve("ex"), "http://example.org/");
    }

    #[test]
    fn frozen_table_rejects_registration() {
        let mut table = PrefixTable::new();
        table.freeze();
        assert!(matches!(
            table.add("ex", "http://example.org/"),
            Err(RdfError::PrefixTableFrozen(_))
        ));
    }

    #[test]
    fn well_known_contains_canonical_labels() {
        let table = PrefixTable::well_known();
        for label in [
            "geo", "geos", "rdf", "xsd", "osm", "osmnode", "osmway", "osmrel", "osmt", "wd",
            "osm2rdf", "osm2rdfgeom",
        ] {
            assert!(table.contains(label), "missing {label}");
        }
        assert_eq!(
            table.resolve("geo"),
            "http://www.opengis.net/ont/geosparql#"
        );
    }

    #[test]
    fn iteration_is_label_ordered() {
        let table = PrefixTable::well_known();
        let labels: Vec<_> = table.iter().map(|(l, _)| l.to_string()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }
}
