//! RDF vocabulary constants and namespace labels for osmgraph
//!
//! This crate provides a centralized location for the namespace IRIs,
//! prefix labels, and datatype IRIs used throughout the osmgraph toolkit.
//!
//! # Organization
//!
//! Constants are organized by concern:
//! - `ns` - namespace IRIs (GeoSPARQL, RDF, XSD, OSM, ...)
//! - `prefix` - the prefix labels bound to those namespaces in the output
//! - `xsd` - XSD datatype IRIs emitted by the converter

/// Namespace IRIs
pub mod ns {
    /// GeoSPARQL ontology namespace (geometry predicates and wktLiteral)
    pub const GEOSPARQL: &str = "http://www.opengis.net/ont/geosparql#";

    /// OpenGIS simple-features namespace
    pub const OPENGIS: &str = "http://www.opengis.net/rdf#";

    /// RDF vocabulary namespace
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// XML Schema datatype namespace
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// Wikidata entity namespace
    pub const WIKIDATA_ENTITY: &str = "http://www.wikidata.org/entity/";

    /// OpenStreetMap root namespace
    pub const OSM: &str = "https://www.openstreetmap.org/";

    /// OpenStreetMap node namespace
    pub const OSM_NODE: &str = "https://www.openstreetmap.org/node/";

    /// OpenStreetMap way namespace
    pub const OSM_WAY: &str = "https://www.openstreetmap.org/way/";

    /// OpenStreetMap relation namespace
    pub const OSM_RELATION: &str = "https://www.openstreetmap.org/relation/";

    /// OpenStreetMap tag-key namespace
    pub const OSM_TAG: &str = "https://www.openstreetmap.org/wiki/Key:";

    /// osmgraph derived-fact namespace
    pub const OSM2RDF: &str = "https://osm2rdf.cs.uni-freiburg.de/rdf#";

    /// osmgraph derived-geometry namespace
    pub const OSM2RDF_GEOM: &str = "https://osm2rdf.cs.uni-freiburg.de/rdf/geom#";
}

/// Prefix labels bound in the output header
pub mod prefix {
    /// geo: GeoSPARQL ontology
    pub const GEO: &str = "geo";

    /// geos: OpenGIS simple features
    pub const GEOS: &str = "geos";

    /// rdf: RDF vocabulary
    pub const RDF: &str = "rdf";

    /// xsd: XML Schema datatypes
    pub const XSD: &str = "xsd";

    /// wd: Wikidata entities
    pub const WD: &str = "wd";

    /// osm: OpenStreetMap root
    pub const OSM: &str = "osm";

    /// osmnode: OpenStreetMap nodes
    pub const OSM_NODE: &str = "osmnode";

    /// osmway: OpenStreetMap ways
    pub const OSM_WAY: &str = "osmway";

    /// osmrel: OpenStreetMap relations
    pub const OSM_RELATION: &str = "osmrel";

    /// osmt: OpenStreetMap tag keys
    pub const OSM_TAG: &str = "osmt";

    /// osm2rdf: derived facts
    pub const OSM2RDF: &str = "osm2rdf";

    /// osm2rdfgeom: derived geometries
    pub const OSM2RDF_GEOM: &str = "osm2rdfgeom";

    /// All well-known (label, namespace IRI) bindings, sorted by label.
    ///
    /// The order here is the order prefixes appear in Turtle headers.
    pub fn well_known() -> &'static [(&'static str, &'static str)] {
        use super::ns;
        &[
            (GEO, ns::GEOSPARQL),
            (GEOS, ns::OPENGIS),
            (OSM, ns::OSM),
            (OSM2RDF, ns::OSM2RDF),
            (OSM2RDF_GEOM, ns::OSM2RDF_GEOM),
            (OSM_NODE, ns::OSM_NODE),
            (OSM_RELATION, ns::OSM_RELATION),
            (OSM_TAG, ns::OSM_TAG),
            (OSM_WAY, ns::OSM_WAY),
            (RDF, ns::RDF),
            (WD, ns::WIKIDATA_ENTITY),
            (XSD, ns::XSD),
        ]
    }
}

/// XSD datatype IRIs emitted by the converter
pub mod xsd {
    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_labels_are_sorted_and_unique() {
        let labels: Vec<_> = prefix::well_known().iter().map(|(l, _)| *l).collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn namespaces_end_in_separator() {
        for (_, iri) in prefix::well_known() {
            assert!(
                iri.ends_with('#') || iri.ends_with('/') || iri.ends_with(':'),
                "namespace without separator: {iri}"
            );
        }
    }
}
