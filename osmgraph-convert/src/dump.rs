//! Dump handler: projects OSM entities onto triples.
//!
//! One method per entity kind; each takes the worker's writer handle and
//! emits the facts selected by the configuration. Constant terms come
//! pre-formatted from [`VocabTerms`].

use crate::config::{Config, TagDatatype};
use crate::error::Result;
use crate::terms::VocabTerms;
use osmgraph_osm::geometry;
use osmgraph_osm::{Area, Node, Relation, MemberKind, Way, WayGeometry};
use osmgraph_rdf::{Format, WriterHandle};
use std::io::Write;

/// Stateless projection of entities to triples.
pub struct DumpHandler<'a> {
    config: &'a Config,
    terms: &'a VocabTerms,
}

impl<'a> DumpHandler<'a> {
    pub fn new(config: &'a Config, terms: &'a VocabTerms) -> Self {
        Self { config, terms }
    }

    /// Emit all facts for a node.
    pub fn node<F: Format, W: Write>(
        &self,
        h: &mut WriterHandle<F, W>,
        node: &Node,
    ) -> Result<()> {
        let subject = h.iri_id("osmnode", node.id.0);
        h.write_triple(&subject, &self.terms.rdf_type, &self.terms.osm_node)?;
        let wkt = geometry::wkt_point(&node.point, self.config.wkt_precision);
        self.geometry_triples(h, &subject, &wkt)?;
        self.tags_of(h, &subject, node.tags.iter())?;

        // Envelope, hull and box of a point all degenerate to the same ring
        let rect = node.envelope();
        let rect_wkt = geometry::wkt_rect(&rect, self.config.wkt_precision);
        if self.config.add_node_envelope {
            self.derived(h, &subject, &self.terms.osm2rdfgeom_envelope, &rect_wkt)?;
        }
        if self.config.add_node_convex_hull {
            self.derived(h, &subject, &self.terms.osm2rdfgeom_convex_hull, &rect_wkt)?;
        }
        if self.config.add_node_obb {
            self.derived(h, &subject, &self.terms.osm2rdfgeom_obb, &rect_wkt)?;
        }
        Ok(())
    }

    /// Emit all facts for a way.
    pub fn way<F: Format, W: Write>(&self, h: &mut WriterHandle<F, W>, way: &Way) -> Result<()> {
        let subject = h.iri_id("osmway", way.id.0);
        h.write_triple(&subject, &self.terms.rdf_type, &self.terms.osm_way)?;
        self.tags_of(h, &subject, way.tags.iter())?;

        if let Some(geom) = way.geometry() {
            let wkt = self.way_wkt(&geom);
            self.geometry_triples(h, &subject, &wkt)?;
        }

        if self.config.add_way_metadata {
            let closed = if way.is_closed() {
                &self.terms.literal_yes
            } else {
                &self.terms.literal_no
            };
            h.write_triple(&subject, &self.terms.osmway_is_closed, closed)?;
            let node_count = h.typed_literal(&way.node_count().to_string(), &self.terms.xsd_integer);
            h.write_triple(&subject, &self.terms.osmway_node_count, &node_count)?;
            let unique =
                h.typed_literal(&way.unique_count().to_string(), &self.terms.xsd_integer);
            h.write_triple(&subject, &self.terms.osmway_unique_node_count, &unique)?;
        }

        if self.config.add_way_node_order {
            for (k, n) in way.nodes.iter().enumerate() {
                let record = h.blank_node();
                h.write_triple(&subject, &self.terms.osmway_node, &record)?;
                let node_term = h.iri_id("osmnode", n.id.0);
                h.write_triple(&record, &self.terms.osmway_node, &node_term)?;
                let pos = h.typed_literal(&(k + 1).to_string(), &self.terms.xsd_integer);
                h.write_triple(&record, &self.terms.osm2rdf_pos, &pos)?;

                if self.config.add_way_node_spatial_metadata {
                    if let Some(next) = way.nodes.get(k + 1) {
                        let next_term = h.iri_id("osmnode", next.id.0);
                        h.write_triple(&record, &self.terms.osmway_next_node, &next_term)?;
                        let meters = geometry::haversine_distance_m(&n.point, &next.point);
                        let distance = h.typed_literal(
                            &geometry::format_coord(meters, 2),
                            &self.terms.xsd_decimal,
                        );
                        h.write_triple(
                            &record,
                            &self.terms.osmway_next_node_distance,
                            &distance,
                        )?;
                    }
                }
                if self.config.add_way_node_geometry {
                    let node_subject = h.iri_id("osmnode", n.id.0);
                    let wkt = geometry::wkt_point(&n.point, self.config.wkt_precision);
                    self.geometry_triples(h, &node_subject, &wkt)?;
                }
            }
        }

        let points = way.dedup_points();
        if points.len() > 1 {
            let ls = geo_types::LineString::from(points);
            if self.config.add_way_envelope {
                if let Some(rect) = geometry::envelope_linestring(&ls) {
                    let wkt = geometry::wkt_rect(&rect, self.config.wkt_precision);
                    self.derived(h, &subject, &self.terms.osm2rdfgeom_envelope, &wkt)?;
                }
            }
            if self.config.add_way_convex_hull {
                let hull = geometry::convex_hull_linestring(&ls);
                let wkt = geometry::wkt_polygon(&hull, self.config.wkt_precision);
                self.derived(h, &subject, &self.terms.osm2rdfgeom_convex_hull, &wkt)?;
            }
            if self.config.add_way_obb {
                if let Some(obb) = geometry::oriented_bbox_linestring(&ls) {
                    let wkt = geometry::wkt_polygon(&obb, self.config.wkt_precision);
                    self.derived(h, &subject, &self.terms.osm2rdfgeom_obb, &wkt)?;
                }
            }
        }
        Ok(())
    }

    /// Emit all facts for a relation.
    pub fn relation<F: Format, W: Write>(
        &self,
        h: &mut WriterHandle<F, W>,
        rel: &Relation,
    ) -> Result<()> {
        if self.config.admin_relations_only && !rel.is_administrative() {
            return Ok(());
        }
        let subject = h.iri_id("osmrel", rel.id.0);
        h.write_triple(&subject, &self.terms.rdf_type, &self.terms.osm_relation)?;
        self.tags_of(h, &subject, rel.tags.iter())?;

        for (k, member) in rel.members.iter().enumerate() {
            let object = match member.kind {
                MemberKind::Node => h.iri_id("osmnode", member.id),
                MemberKind::Way => h.iri_id("osmway", member.id),
                MemberKind::Relation => h.iri_id("osmrel", member.id),
                MemberKind::Unknown => continue,
            };
            match member.role.as_str() {
                "" | "outer" | "inner" => {
                    if self.config.add_relation_border_members
                        && member.kind == MemberKind::Way
                        && !member.role.is_empty()
                    {
                        let record = h.blank_node();
                        h.write_triple(&subject, &self.terms.osmrel_member, &record)?;
                        h.write_triple(&record, &self.terms.osmrel_member_id, &object)?;
                        let role = h.literal(&member.role);
                        h.write_triple(&record, &self.terms.osmrel_member_role, &role)?;
                        let pos = h.typed_literal(&(k + 1).to_string(), &self.terms.xsd_integer);
                        h.write_triple(&record, &self.terms.osm2rdf_pos, &pos)?;
                    }
                }
                role => {
                    let predicate = h.iri("osmrel", role);
                    h.write_triple(&subject, &predicate, &object)?;
                }
            }
        }
        Ok(())
    }

    /// Emit all facts for an area.
    pub fn area<F: Format, W: Write>(&self, h: &mut WriterHandle<F, W>, area: &Area) -> Result<()> {
        let from_way = area.from_way();
        let subject = if from_way {
            h.iri_id("osmway", area.object_id())
        } else {
            h.iri_id("osmrel", area.object_id())
        };

        let polygon = if self.polygon_needs_simplification(&area.polygon) {
            geometry::simplify_multipolygon(&area.polygon, self.config.wkt_deviation)
        } else {
            area.polygon.clone()
        };
        let wkt = geometry::wkt_multipolygon(&polygon, self.config.wkt_precision);
        self.geometry_triples(h, &subject, &wkt)?;

        // Relation-shaped areas additionally honor the relation flags.
        let envelope = self.config.add_area_envelope
            || (!from_way && self.config.add_relation_envelope);
        let hull = self.config.add_area_convex_hull
            || (!from_way && self.config.add_relation_convex_hull);
        let obb = self.config.add_area_obb || (!from_way && self.config.add_relation_obb);

        if envelope {
            if let Some(rect) = area.envelope() {
                let text = geometry::wkt_rect(&rect, self.config.wkt_precision);
                self.derived(h, &subject, &self.terms.osm2rdfgeom_envelope, &text)?;
            }
        }
        if hull {
            let hull = geometry::convex_hull(&area.polygon);
            let text = geometry::wkt_polygon(&hull, self.config.wkt_precision);
            self.derived(h, &subject, &self.terms.osm2rdfgeom_convex_hull, &text)?;
        }
        if obb {
            if let Some(bbox) = geometry::oriented_bbox(&area.polygon) {
                let text = geometry::wkt_polygon(&bbox, self.config.wkt_precision);
                self.derived(h, &subject, &self.terms.osm2rdfgeom_obb, &text)?;
            }
        }
        if self.config.add_area_envelope_ratio {
            if let Some(ratio) = geometry::envelope_ratio(&area.polygon) {
                let literal = h.typed_literal(
                    &geometry::format_coord(ratio, self.config.wkt_precision),
                    &self.terms.xsd_double,
                );
                h.write_triple(&subject, &self.terms.osm2rdf_envelope_ratio, &literal)?;
            }
        }
        Ok(())
    }

    fn way_wkt(&self, geom: &WayGeometry) -> String {
        let precision = self.config.wkt_precision;
        match geom {
            WayGeometry::Point(p) => geometry::wkt_point(p, precision),
            WayGeometry::LineString(ls) => {
                if self.config.simplify_wkt > 0
                    && ls.0.len() > self.config.simplify_wkt as usize
                {
                    geometry::wkt_linestring(
                        &geometry::simplify_linestring(ls, self.config.wkt_deviation),
                        precision,
                    )
                } else {
                    geometry::wkt_linestring(ls, precision)
                }
            }
            WayGeometry::Polygon(poly) => {
                if self.config.simplify_wkt > 0
                    && poly.exterior().0.len() > self.config.simplify_wkt as usize
                {
                    let mp = geo_types::MultiPolygon(vec![poly.clone()]);
                    let simplified =
                        geometry::simplify_multipolygon(&mp, self.config.wkt_deviation);
                    geometry::wkt_multipolygon(&simplified, precision)
                } else {
                    geometry::wkt_polygon(poly, precision)
                }
            }
        }
    }

    fn polygon_needs_simplification(&self, mp: &geo_types::MultiPolygon<f64>) -> bool {
        if self.config.simplify_wkt == 0 {
            return false;
        }
        let points: usize = mp
            .0
            .iter()
            .map(|p| {
                p.exterior().0.len() + p.interiors().iter().map(|r| r.0.len()).sum::<usize>()
            })
            .sum();
        points > self.config.simplify_wkt as usize
    }

    /// The geometry triple, direct or indirect per the configuration.
    fn geometry_triples<F: Format, W: Write>(
        &self,
        h: &mut WriterHandle<F, W>,
        subject: &str,
        wkt: &str,
    ) -> Result<()> {
        let literal = h.typed_literal(wkt, &self.terms.geo_wkt_literal);
        if self.config.hasgeometry_as_wkt {
            h.write_triple(subject, &self.terms.geo_has_geometry, &literal)?;
        } else {
            let geom = h.blank_node();
            h.write_triple(subject, &self.terms.geo_has_geometry, &geom)?;
            h.write_triple(&geom, &self.terms.geo_as_wkt, &literal)?;
        }
        Ok(())
    }

    /// A derived-geometry triple (envelope, hull, oriented box).
    fn derived<F: Format, W: Write>(
        &self,
        h: &mut WriterHandle<F, W>,
        subject: &str,
        predicate: &str,
        wkt: &str,
    ) -> Result<()> {
        let literal = h.typed_literal(wkt, &self.terms.geo_wkt_literal);
        h.write_triple(subject, predicate, &literal)
            .map_err(Into::into)
    }

    /// Emit the tag triples for one entity.
    pub fn tags_of<'t, F: Format, W: Write>(
        &self,
        h: &mut WriterHandle<F, W>,
        subject: &str,
        tags: impl Iterator<Item = &'t osmgraph_osm::Tag>,
    ) -> Result<()> {
        for tag in tags {
            if self.config.semicolon_tag_keys.contains(&tag.key) {
                for segment in tag.value.split(';') {
                    let segment = segment.trim();
                    if !segment.is_empty() {
                        self.tag_triple(h, subject, &tag.key, segment)?;
                    }
                }
            } else {
                self.tag_triple(h, subject, &tag.key, &tag.value)?;
            }
        }
        Ok(())
    }

    fn tag_triple<F: Format, W: Write>(
        &self,
        h: &mut WriterHandle<F, W>,
        subject: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let mangled = key.replace(' ', "_");
        let predicate = h.iri("osmt", &mangled);
        let object = match self.config.tag_key_datatypes.get(key) {
            Some(TagDatatype::Integer) if value.parse::<i64>().is_ok() => {
                h.typed_literal(value, &self.terms.xsd_integer)
            }
            Some(TagDatatype::Decimal) if value.parse::<f64>().is_ok() => {
                h.typed_literal(value, &self.terms.xsd_decimal)
            }
            Some(TagDatatype::Double) if value.parse::<f64>().is_ok() => {
                h.typed_literal(value, &self.terms.xsd_double)
            }
            _ => h.literal(value),
        };
        h.write_triple(subject, &predicate, &object)?;

        if !self.config.skip_wiki_links {
            self.wiki_links(h, subject, key, value)?;
        }
        Ok(())
    }

    fn wiki_links<F: Format, W: Write>(
        &self,
        h: &mut WriterHandle<F, W>,
        subject: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        if key == "wikidata" {
            if let Some(qid) = extract_qid(value) {
                let entity = h.iri_unsafe("wd", &qid);
                h.write_triple(subject, &self.terms.osm_wikidata, &entity)?;
            }
            return Ok(());
        }
        if key == "wikipedia" || (key.ends_with("wikipedia") && !key.contains("fixme")) {
            let article = match value.split_once(':') {
                Some((lang, title)) if !lang.is_empty() && !title.is_empty() => {
                    h.iri(&format!("https://{lang}.wikipedia.org/wiki/"), title)
                }
                _ => h.iri("https://www.wikipedia.org/wiki/", value),
            };
            h.write_triple(subject, &self.terms.osm_wikipedia, &article)?;
        }
        Ok(())
    }
}

/// First `Q<digits>` token in the first `;`-segment of a wikidata value.
pub fn extract_qid(value: &str) -> Option<String> {
    let segment = value.split(';').next()?;
    let bytes = segment.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'Q' {
            let digits: String = segment[i + 1..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            if !digits.is_empty() {
                return Some(format!("Q{digits}"));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use osmgraph_osm::{NodeId, TagList, WayId, WayNode};
    use osmgraph_rdf::{Nt, PrefixTable, TripleWriter, Ttl};

    fn run<F: Format>(
        config: &Config,
        emit: impl FnOnce(&DumpHandler<'_>, &mut WriterHandle<F, Vec<u8>>),
    ) -> String {
        let terms = VocabTerms::new::<F>(&PrefixTable::well_known());
        let handler = DumpHandler::new(config, &terms);
        let mut handle = TripleWriter::<F>::new()
            .split(vec![Vec::new()])
            .pop()
            .unwrap();
        emit(&handler, &mut handle);
        let (buf, _) = handle.into_inner().unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn config() -> Config {
        Config::new("in.pbf", ".")
    }

    #[test]
    fn bare_node_nt() {
        let node = Node::new(42, 7.84, 47.99, TagList::new());
        let text = run::<Nt>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(text.contains(
            "<https://www.openstreetmap.org/node/42> \
             <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> \
             <https://www.openstreetmap.org/node> .\n"
        ));
        assert!(text.contains(
            "<https://www.openstreetmap.org/node/42> \
             <http://www.opengis.net/ont/geosparql#hasGeometry> \
             \"POINT(7.84 47.99)\"^^<http://www.opengis.net/ont/geosparql#wktLiteral> .\n"
        ));
    }

    #[test]
    fn bare_node_ttl() {
        let node = Node::new(42, 7.84, 47.99, TagList::new());
        let text = run::<Ttl>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:42 rdf:type osm:node .\n"));
        assert!(text
            .contains("osmnode:42 geo:hasGeometry \"POINT(7.84 47.99)\"^^geo:wktLiteral .\n"));
    }

    #[test]
    fn indirect_geometry_shape() {
        let mut cfg = config();
        cfg.hasgeometry_as_wkt = false;
        let node = Node::new(7, 1.0, 2.0, TagList::new());
        let text = run::<Ttl>(&cfg, |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:7 geo:hasGeometry _:0_0 .\n"));
        assert!(text.contains("_:0_0 geo:asWKT \"POINT(1 2)\"^^geo:wktLiteral .\n"));
    }

    #[test]
    fn literal_escaping_in_tag_value() {
        let tags: TagList = [("note", "line1\nline2")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Ttl>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:1 osmt:note \"line1\\nline2\" .\n"));
    }

    #[test]
    fn tag_key_space_mangling() {
        let tags: TagList = [("two words", "v")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Ttl>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:1 osmt:two_words \"v\" .\n"));
    }

    #[test]
    fn wikidata_first_segment_only() {
        let tags: TagList = [("wikidata", "Q42;Q43")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Ttl>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:1 osm:wikidata wd:Q42 .\n"));
        assert!(!text.contains("wd:Q43"));
    }

    #[test]
    fn wikidata_stripped_from_noise() {
        let tags: TagList = [("wikidata", "foo Q42 bar")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Ttl>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:1 osm:wikidata wd:Q42 .\n"));
    }

    #[test]
    fn wikipedia_with_language() {
        let tags: TagList = [("wikipedia", "de:Freiburg im Breisgau")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Nt>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(text.contains(
            "<https://de.wikipedia.org/wiki/Freiburg\\u0020im\\u0020Breisgau>"
        ));
    }

    #[test]
    fn wikipedia_without_language() {
        let tags: TagList = [("wikipedia", "Entity")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Nt>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("<https://www.wikipedia.org/wiki/Entity>"));
    }

    #[test]
    fn fixme_wikipedia_keys_are_plain_tags() {
        let tags: TagList = [("fixme:wikipedia", "de:X")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Ttl>(&config(), |d, h| d.node(h, &node).unwrap());
        assert!(!text.contains("osm:wikipedia"));
    }

    #[test]
    fn skip_wiki_links_suppresses_derivations() {
        let mut cfg = config();
        cfg.skip_wiki_links = true;
        let tags: TagList = [("wikidata", "Q1")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Ttl>(&cfg, |d, h| d.node(h, &node).unwrap());
        assert!(!text.contains("osm:wikidata"));
        assert!(text.contains("osmt:wikidata \"Q1\""));
    }

    #[test]
    fn semicolon_keys_split() {
        let mut cfg = config();
        cfg.semicolon_tag_keys.insert("ref".to_string());
        let tags: TagList = [("ref", "A 5;B 31")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Ttl>(&cfg, |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:1 osmt:ref \"A 5\" .\n"));
        assert!(text.contains("osmnode:1 osmt:ref \"B 31\" .\n"));
    }

    #[test]
    fn typed_tag_values() {
        let mut cfg = config();
        cfg.tag_key_datatypes
            .insert("admin_level".to_string(), TagDatatype::Integer);
        let tags: TagList = [("admin_level", "4")].into_iter().collect();
        let node = Node::new(1, 0.0, 0.0, tags);
        let text = run::<Ttl>(&cfg, |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:1 osmt:admin_level \"4\"^^xsd:integer .\n"));

        // Non-numeric value falls back to a plain literal
        let tags: TagList = [("admin_level", "unknown")].into_iter().collect();
        let node = Node::new(2, 0.0, 0.0, tags);
        let text = run::<Ttl>(&cfg, |d, h| d.node(h, &node).unwrap());
        assert!(text.contains("osmnode:2 osmt:admin_level \"unknown\" .\n"));
    }

    fn sample_way(tags: TagList) -> Way {
        let coords = [
            (1u64, 7.80, 48.00),
            (2, 7.90, 48.00),
            (3, 7.90, 48.10),
        ];
        Way {
            id: WayId(11),
            nodes: coords
                .iter()
                .map(|(id, x, y)| WayNode {
                    id: NodeId(*id),
                    point: geo_types::Point::new(*x, *y),
                })
                .collect(),
            tags,
        }
    }

    #[test]
    fn way_linestring_and_metadata() {
        let mut cfg = config();
        cfg.add_way_metadata = true;
        let way = sample_way(TagList::new());
        let text = run::<Ttl>(&cfg, |d, h| d.way(h, &way).unwrap());
        assert!(text.contains("osmway:11 rdf:type osm:way .\n"));
        assert!(text.contains(
            "osmway:11 geo:hasGeometry \"LINESTRING(7.8 48,7.9 48,7.9 48.1)\"^^geo:wktLiteral .\n"
        ));
        assert!(text.contains("osmway:11 osmway:is_closed \"no\" .\n"));
        assert!(text.contains("osmway:11 osmway:nodeCount \"3\"^^xsd:integer .\n"));
        assert!(text.contains("osmway:11 osmway:uniqueNodeCount \"3\"^^xsd:integer .\n"));
    }

    #[test]
    fn way_node_order_records() {
        let mut cfg = config();
        cfg.add_way_node_order = true;
        let way = sample_way(TagList::new());
        let text = run::<Ttl>(&cfg, |d, h| d.way(h, &way).unwrap());
        assert!(text.contains("osmway:11 osmway:node _:0_0 .\n"));
        assert!(text.contains("_:0_0 osmway:node osmnode:1 .\n"));
        assert!(text.contains("_:0_0 osm2rdf:pos \"1\"^^xsd:integer .\n"));
        assert!(text.contains("_:0_2 osm2rdf:pos \"3\"^^xsd:integer .\n"));
    }

    #[test]
    fn way_spatial_metadata_links_successors() {
        let mut cfg = config();
        cfg.add_way_node_order = true;
        cfg.add_way_node_spatial_metadata = true;
        let way = sample_way(TagList::new());
        let text = run::<Ttl>(&cfg, |d, h| d.way(h, &way).unwrap());
        assert!(text.contains("_:0_0 osmway:next_node osmnode:2 .\n"));
        assert!(text.contains("osmway:next_node_distance"));
        // Last node has no successor
        assert!(!text.contains("_:0_2 osmway:next_node "));
    }

    #[test]
    fn relation_role_membership() {
        let rel = Relation {
            id: osmgraph_osm::RelationId(9),
            members: vec![
                osmgraph_osm::RelationMember {
                    kind: MemberKind::Node,
                    id: 5,
                    role: "admin_centre".to_string(),
                },
                osmgraph_osm::RelationMember {
                    kind: MemberKind::Way,
                    id: 6,
                    role: "outer".to_string(),
                },
            ],
            tags: TagList::new(),
        };
        let text = run::<Ttl>(&config(), |d, h| d.relation(h, &rel).unwrap());
        assert!(text.contains("osmrel:9 rdf:type osm:relation .\n"));
        assert!(text.contains("osmrel:9 osmrel:admin_centre osmnode:5 .\n"));
        // outer members do not produce role triples
        assert!(!text.contains("osmrel:outer"));
    }

    #[test]
    fn relation_border_members() {
        let mut cfg = config();
        cfg.add_relation_border_members = true;
        let rel = Relation {
            id: osmgraph_osm::RelationId(9),
            members: vec![osmgraph_osm::RelationMember {
                kind: MemberKind::Way,
                id: 6,
                role: "outer".to_string(),
            }],
            tags: TagList::new(),
        };
        let text = run::<Ttl>(&cfg, |d, h| d.relation(h, &rel).unwrap());
        assert!(text.contains("osmrel:9 osmrel:member _:0_0 .\n"));
        assert!(text.contains("_:0_0 osmrel:member_id osmway:6 .\n"));
        assert!(text.contains("_:0_0 osmrel:member_role \"outer\" .\n"));
        assert!(text.contains("_:0_0 osm2rdf:pos \"1\"^^xsd:integer .\n"));
    }

    #[test]
    fn admin_only_skips_plain_relations() {
        let mut cfg = config();
        cfg.admin_relations_only = true;
        let rel = Relation {
            id: osmgraph_osm::RelationId(3),
            members: vec![],
            tags: [("type", "route")].into_iter().collect(),
        };
        let text = run::<Ttl>(&cfg, |d, h| d.relation(h, &rel).unwrap());
        assert!(text.is_empty());
    }

    #[test]
    fn area_facts_with_ratio() {
        let mut cfg = config();
        cfg.add_area_envelope = true;
        cfg.add_area_envelope_ratio = true;
        let ring = geo_types::LineString::from(vec![
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (0.0, 0.0),
        ]);
        let area = Area::from_relation(
            osmgraph_osm::RelationId(4),
            geo_types::MultiPolygon(vec![geo_types::Polygon::new(ring, vec![])]),
            TagList::new(),
        );
        let text = run::<Ttl>(&cfg, |d, h| d.area(h, &area).unwrap());
        assert!(text.contains(
            "osmrel:4 geo:hasGeometry \"POLYGON((0 0,2 0,2 2,0 2,0 0))\"^^geo:wktLiteral .\n"
        ));
        assert!(text.contains(
            "osmrel:4 osm2rdfgeom:envelope \"POLYGON((0 0,2 0,2 2,0 2,0 0))\"^^geo:wktLiteral .\n"
        ));
        assert!(text.contains("osmrel:4 osm2rdf:envelope_ratio \"1\"^^xsd:double .\n"));
    }

    #[test]
    fn qid_extraction() {
        assert_eq!(extract_qid("Q42"), Some("Q42".to_string()));
        assert_eq!(extract_qid("Q42;Q43"), Some("Q42".to_string()));
        assert_eq!(extract_qid("foo Q42 bar"), Some("Q42".to_string()));
        assert_eq!(extract_qid("nothing here"), None);
        assert_eq!(extract_qid("Qx17"), None);
        assert_eq!(extract_qid(";Q9"), None);
    }
}
