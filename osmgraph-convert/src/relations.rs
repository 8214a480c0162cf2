//! Spatial relations between areas: `geo:sfContains` / `geo:sfIntersects`.
//!
//! Candidate pairs come from an R-tree over area envelopes; unless the
//! approximate mode is on, candidates are refined with exact predicates.
//! Containment is emitted container → contained; intersection once per
//! pair, in area-id order.

use crate::config::Config;
use crate::error::Result;
use crate::terms::VocabTerms;
use geo::{Intersects, Relate, Simplify};
use geo_types::{MultiPolygon, Polygon, Rect};
use osmgraph_osm::AreaId;
use osmgraph_rdf::{Format, WriterHandle};
use rstar::{RTree, RTreeObject, AABB};
use std::io::Write as _;

/// What the relations pass needs to know about one area.
#[derive(Clone, Debug)]
pub struct AreaSummary {
    pub id: AreaId,
    pub envelope: Rect<f64>,
    pub polygon: MultiPolygon<f64>,
    pub administrative: bool,
}

/// Counts of emitted relation triples.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelationCounts {
    pub contains: u64,
    pub intersects: u64,
}

struct TreeEntry {
    index: usize,
    aabb: AABB<[f64; 2]>,
}

impl RTreeObject for TreeEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.aabb
    }
}

fn aabb(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// Geometry used for the exact tests, after the configured reductions.
fn test_geometry(config: &Config, area: &AreaSummary) -> MultiPolygon<f64> {
    let mut polygon = if config.dont_use_inner_outer_geometries {
        // Exterior rings only
        let deviation = config.simplify_geometries_inner_outer;
        let shells: Vec<Polygon<f64>> = area
            .polygon
            .0
            .iter()
            .map(|p| {
                let shell = Polygon::new(p.exterior().clone(), vec![]);
                if deviation > 0.0 {
                    shell.simplify(&deviation)
                } else {
                    shell
                }
            })
            .collect();
        MultiPolygon(shells)
    } else {
        area.polygon.clone()
    };
    if config.simplify_geometries > 0.0 {
        polygon = MultiPolygon(
            polygon
                .0
                .iter()
                .map(|p| p.simplify(&config.simplify_geometries))
                .collect(),
        );
    }
    polygon
}

/// Compute and emit the area-area spatial relations.
///
/// Emission is distributed round-robin over the worker handles, keyed by
/// the first area's position, so repeated runs partition identically.
pub fn compute<F: Format, W: std::io::Write>(
    config: &Config,
    terms: &VocabTerms,
    areas: &[AreaSummary],
    handles: &mut [WriterHandle<F, W>],
) -> Result<RelationCounts> {
    let mut counts = RelationCounts::default();
    if areas.is_empty() || handles.is_empty() {
        return Ok(counts);
    }

    let mut order: Vec<usize> = (0..areas.len()).collect();
    order.sort_by_key(|i| areas[*i].id);

    let tree = RTree::bulk_load(
        order
            .iter()
            .map(|i| TreeEntry {
                index: *i,
                aabb: aabb(&areas[*i].envelope),
            })
            .collect(),
    );

    let geometries: Vec<MultiPolygon<f64>> = areas
        .iter()
        .map(|a| test_geometry(config, a))
        .collect();

    let mut dot_edges: Vec<(AreaId, AreaId)> = Vec::new();
    let workers = handles.len();

    for (slot, &i) in order.iter().enumerate() {
        let a = &areas[i];
        if config.admin_relations_only && !a.administrative {
            continue;
        }
        let handle = &mut handles[slot % workers];
        let subject_a = area_term(handle, a.id);

        let mut candidates: Vec<usize> = tree
            .locate_in_envelope_intersecting(&aabb(&a.envelope))
            .map(|e| e.index)
            .filter(|&j| areas[j].id > a.id)
            .collect();
        candidates.sort_by_key(|&j| areas[j].id);

        for j in candidates {
            let b = &areas[j];
            if config.admin_relations_only && !b.administrative {
                continue;
            }
            let subject_b = area_term(handle, b.id);

            let (a_contains_b, b_contains_a, intersects) = if config.approximate_spatial_rels {
                (
                    rect_contains(&a.envelope, &b.envelope),
                    rect_contains(&b.envelope, &a.envelope),
                    a.envelope.intersects(&b.envelope),
                )
            } else {
                let matrix = geometries[i].relate(&geometries[j]);
                (
                    matrix.is_contains(),
                    matrix.is_within(),
                    matrix.is_intersects(),
                )
            };

            if a_contains_b {
                handle.write_triple(&subject_a, &terms.geo_sf_contains, &subject_b)?;
                counts.contains += 1;
                dot_edges.push((a.id, b.id));
            }
            if b_contains_a {
                handle.write_triple(&subject_b, &terms.geo_sf_contains, &subject_a)?;
                counts.contains += 1;
                dot_edges.push((b.id, a.id));
            }
            if intersects {
                handle.write_triple(&subject_a, &terms.geo_sf_intersects, &subject_b)?;
                counts.intersects += 1;
            }
        }
    }

    if config.write_dag_dot_files {
        write_dot(config, &dot_edges)?;
    }
    Ok(counts)
}

fn area_term<F: Format, W: std::io::Write>(handle: &WriterHandle<F, W>, id: AreaId) -> String {
    if id.origin() == osmgraph_osm::AreaOrigin::Way {
        handle.iri_id("osmway", id.object_id())
    } else {
        handle.iri_id("osmrel", id.object_id())
    }
}

fn rect_contains(outer: &Rect<f64>, inner: &Rect<f64>) -> bool {
    outer.min().x <= inner.min().x
        && outer.min().y <= inner.min().y
        && outer.max().x >= inner.max().x
        && outer.max().y >= inner.max().y
}

fn write_dot(config: &Config, edges: &[(AreaId, AreaId)]) -> Result<()> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(config.dot_path())?);
    writeln!(out, "digraph contains {{")?;
    for (from, to) in edges {
        writeln!(out, "  a{} -> a{};", from.value(), to.value())?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::LineString;
    use osmgraph_osm::{RelationId, WayId};
    use osmgraph_rdf::{PrefixTable, TripleWriter, Ttl};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        let ring = LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]);
        MultiPolygon(vec![Polygon::new(ring, vec![])])
    }

    fn summary(id: AreaId, mp: MultiPolygon<f64>, administrative: bool) -> AreaSummary {
        let envelope = osmgraph_osm::geometry::envelope(&mp).unwrap();
        AreaSummary {
            id,
            envelope,
            polygon: mp,
            administrative,
        }
    }

    fn run(config: &Config, areas: &[AreaSummary]) -> (String, RelationCounts) {
        let terms = VocabTerms::new::<Ttl>(&PrefixTable::well_known());
        let mut handles = TripleWriter::<Ttl>::new().split(vec![Vec::new()]);
        let counts = compute(config, &terms, areas, &mut handles).unwrap();
        let (buf, _) = handles.pop().unwrap().into_inner().unwrap();
        (String::from_utf8(buf).unwrap(), counts)
    }

    #[test]
    fn containment_and_intersection() {
        let config = Config::new("in.pbf", ".");
        let outer = summary(
            AreaId::from_relation(RelationId(1)),
            square(0.0, 0.0, 10.0, 10.0),
            false,
        );
        let inner = summary(
            AreaId::from_way(WayId(2)),
            square(2.0, 2.0, 3.0, 3.0),
            false,
        );
        let disjoint = summary(
            AreaId::from_way(WayId(3)),
            square(20.0, 20.0, 30.0, 30.0),
            false,
        );
        let (text, counts) = run(&config, &[outer, inner, disjoint]);
        assert!(text.contains("osmrel:1 geo:sfContains osmway:2 .\n"));
        assert!(text.contains("geo:sfIntersects"));
        assert!(!text.contains("osmway:3"));
        assert_eq!(counts.contains, 1);
        assert_eq!(counts.intersects, 1);
    }

    #[test]
    fn approximate_mode_uses_envelopes() {
        let mut config = Config::new("in.pbf", ".");
        config.approximate_spatial_rels = true;
        let outer = summary(
            AreaId::from_relation(RelationId(1)),
            square(0.0, 0.0, 10.0, 10.0),
            false,
        );
        let inner = summary(
            AreaId::from_way(WayId(2)),
            square(2.0, 2.0, 3.0, 3.0),
            false,
        );
        let (_, counts) = run(&config, &[outer, inner]);
        assert_eq!(counts.contains, 1);
        assert_eq!(counts.intersects, 1);
    }

    #[test]
    fn admin_only_filters_participants() {
        let mut config = Config::new("in.pbf", ".");
        config.admin_relations_only = true;
        let outer = summary(
            AreaId::from_relation(RelationId(1)),
            square(0.0, 0.0, 10.0, 10.0),
            true,
        );
        let inner = summary(
            AreaId::from_way(WayId(2)),
            square(2.0, 2.0, 3.0, 3.0),
            false,
        );
        let (text, counts) = run(&config, &[outer, inner]);
        assert!(text.is_empty());
        assert_eq!(counts.contains, 0);
    }

    #[test]
    fn dot_file_lists_edges() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new("in.pbf", dir.path());
        config.write_dag_dot_files = true;
        let outer = summary(
            AreaId::from_relation(RelationId(1)),
            square(0.0, 0.0, 10.0, 10.0),
            false,
        );
        let inner = summary(
            AreaId::from_way(WayId(2)),
            square(2.0, 2.0, 3.0, 3.0),
            false,
        );
        run(&config, &[outer, inner]);
        let dot = std::fs::read_to_string(config.dot_path()).unwrap();
        assert!(dot.contains("a3 -> a4;"));
    }
}
