//! Pre-formatted constant terms.
//!
//! Every predicate and class IRI the dump handler emits is rendered once
//! per run, so the per-entity hot path only concatenates strings.

use osmgraph_rdf::{Format, PrefixTable};

/// Constant terms in the output format's textual form.
pub struct VocabTerms {
    pub rdf_type: String,

    pub osm_node: String,
    pub osm_way: String,
    pub osm_relation: String,
    pub osm_wikidata: String,
    pub osm_wikipedia: String,

    pub geo_has_geometry: String,
    pub geo_as_wkt: String,
    pub geo_wkt_literal: String,
    pub geo_sf_contains: String,
    pub geo_sf_intersects: String,

    pub osm2rdf_pos: String,
    pub osm2rdf_envelope_ratio: String,
    pub osm2rdfgeom_envelope: String,
    pub osm2rdfgeom_convex_hull: String,
    pub osm2rdfgeom_obb: String,

    pub osmway_is_closed: String,
    pub osmway_node: String,
    pub osmway_node_count: String,
    pub osmway_unique_node_count: String,
    pub osmway_next_node: String,
    pub osmway_next_node_distance: String,

    pub osmrel_member: String,
    pub osmrel_member_id: String,
    pub osmrel_member_role: String,

    pub xsd_integer: String,
    pub xsd_decimal: String,
    pub xsd_double: String,

    pub literal_yes: String,
    pub literal_no: String,
}

impl VocabTerms {
    /// Render the constant terms for format `F` against `table`.
    pub fn new<F: Format>(table: &PrefixTable) -> Self {
        let iri = |p: &str, l: &str| F::format_iri_unsafe(table, p, l);
        Self {
            rdf_type: iri("rdf", "type"),
            osm_node: iri("osm", "node"),
            osm_way: iri("osm", "way"),
            osm_relation: iri("osm", "relation"),
            osm_wikidata: iri("osm", "wikidata"),
            osm_wikipedia: iri("osm", "wikipedia"),
            geo_has_geometry: iri("geo", "hasGeometry"),
            geo_as_wkt: iri("geo", "asWKT"),
            geo_wkt_literal: iri("geo", "wktLiteral"),
            geo_sf_contains: iri("geo", "sfContains"),
            geo_sf_intersects: iri("geo", "sfIntersects"),
            osm2rdf_pos: iri("osm2rdf", "pos"),
            osm2rdf_envelope_ratio: iri("osm2rdf", "envelope_ratio"),
            osm2rdfgeom_envelope: iri("osm2rdfgeom", "envelope"),
            osm2rdfgeom_convex_hull: iri("osm2rdfgeom", "convex_hull"),
            osm2rdfgeom_obb: iri("osm2rdfgeom", "obb"),
            osmway_is_closed: iri("osmway", "is_closed"),
            osmway_node: iri("osmway", "node"),
            osmway_node_count: iri("osmway", "nodeCount"),
            osmway_unique_node_count: iri("osmway", "uniqueNodeCount"),
            osmway_next_node: iri("osmway", "next_node"),
            osmway_next_node_distance: iri("osmway", "next_node_distance"),
            osmrel_member: iri("osmrel", "member"),
            osmrel_member_id: iri("osmrel", "member_id"),
            osmrel_member_role: iri("osmrel", "member_role"),
            xsd_integer: iri("xsd", "integer"),
            xsd_decimal: iri("xsd", "decimal"),
            xsd_double: iri("xsd", "double"),
            literal_yes: "\"yes\"".to_string(),
            literal_no: "\"no\"".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osmgraph_rdf::{Nt, Ttl};

    #[test]
    fn ttl_terms_are_prefixed_names() {
        let table = PrefixTable::well_known();
        let terms = VocabTerms::new::<Ttl>(&table);
        assert_eq!(terms.rdf_type, "rdf:type");
        assert_eq!(terms.geo_wkt_literal, "geo:wktLiteral");
        assert_eq!(terms.osm2rdfgeom_obb, "osm2rdfgeom:obb");
    }

    #[test]
    fn nt_terms_are_irirefs() {
        let table = PrefixTable::well_known();
        let terms = VocabTerms::new::<Nt>(&table);
        assert_eq!(
            terms.rdf_type,
            "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>"
        );
        assert_eq!(
            terms.geo_has_geometry,
            "<http://www.opengis.net/ont/geosparql#hasGeometry>"
        );
    }
}
