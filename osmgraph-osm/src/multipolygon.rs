//! Multipolygon assembly: relations to areas.
//!
//! Pass 1 notes candidate relations and the ways they reference; pass 2
//! collects the geometry of those ways; `assemble` then stitches way
//! segments into closed rings, nests inner rings into their outers, and
//! yields `Area` values in relation-id order.

use crate::area::Area;
use crate::entity::{MemberKind, Relation};
use crate::ids::RelationId;
use crate::tags::TagList;
use geo::Contains;
use geo_types::{LineString, MultiPolygon, Point, Polygon};
use rustc_hash::{FxHashMap, FxHashSet};

/// Ring role of a way member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingRole {
    Outer,
    Inner,
}

struct AreaCandidate {
    id: RelationId,
    ways: Vec<(u64, RingRole)>,
    tags: TagList,
}

/// Bookkeeping for relations that assemble into areas.
#[derive(Default)]
pub struct MultipolygonManager {
    candidates: Vec<AreaCandidate>,
    wanted: FxHashSet<u64>,
}

impl MultipolygonManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note a relation if its tags identify it as a multipolygon
    /// candidate. Returns whether it was noted.
    pub fn note_relation(&mut self, rel: &Relation) -> bool {
        if !rel.is_multipolygon() {
            return false;
        }
        let mut ways = Vec::new();
        for member in &rel.members {
            if member.kind != MemberKind::Way {
                continue;
            }
            let role = match member.role.as_str() {
                "" | "outer" => RingRole::Outer,
                "inner" => RingRole::Inner,
                _ => continue,
            };
            ways.push((member.id, role));
            self.wanted.insert(member.id);
        }
        self.candidates.push(AreaCandidate {
            id: rel.id,
            ways,
            tags: rel.tags.clone(),
        });
        true
    }

    /// Whether pass 2 should stash the geometry of this way.
    pub fn wants_way(&self, id: u64) -> bool {
        self.wanted.contains(&id)
    }

    /// Number of noted relations.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Assemble all noted relations against the collected way geometry.
    ///
    /// Relations that cannot be closed into rings (missing ways, open
    /// rings) are skipped with a warning.
    pub fn assemble(&self, way_geometry: &FxHashMap<u64, Vec<Point<f64>>>) -> Vec<Area> {
        let mut order: Vec<&AreaCandidate> = self.candidates.iter().collect();
        order.sort_by_key(|c| c.id);

        let mut areas = Vec::new();
        for candidate in order {
            match assemble_one(candidate, way_geometry) {
                Some(polygon) => {
                    areas.push(Area::from_relation(
                        candidate.id,
                        polygon,
                        candidate.tags.clone(),
                    ));
                }
                None => {
                    tracing::warn!(
                        relation = candidate.id.0,
                        "skipping relation: rings do not close"
                    );
                }
            }
        }
        areas
    }
}

fn assemble_one(
    candidate: &AreaCandidate,
    way_geometry: &FxHashMap<u64, Vec<Point<f64>>>,
) -> Option<MultiPolygon<f64>> {
    let mut outer_segments = Vec::new();
    let mut inner_segments = Vec::new();
    for (way_id, role) in &candidate.ways {
        let points = way_geometry.get(way_id)?.clone();
        match role {
            RingRole::Outer => outer_segments.push(points),
            RingRole::Inner => inner_segments.push(points),
        }
    }

    let outer_rings = stitch_rings(outer_segments)?;
    if outer_rings.is_empty() {
        return None;
    }
    let inner_rings = stitch_rings(inner_segments)?;

    let mut interiors: Vec<Vec<LineString<f64>>> = vec![Vec::new(); outer_rings.len()];
    for inner in inner_rings {
        let probe = Point::from(*inner.0.first()?);
        match outer_rings
            .iter()
            .position(|o| Polygon::new(o.clone(), vec![]).contains(&probe))
        {
            Some(i) => interiors[i].push(inner),
            None => {
                tracing::warn!(
                    relation = candidate.id.0,
                    "inner ring outside every outer ring, dropping it"
                );
            }
        }
    }

    let polygons = outer_rings
        .into_iter()
        .zip(interiors)
        .map(|(outer, inner)| Polygon::new(outer, inner))
        .collect();
    Some(MultiPolygon(polygons))
}

/// Stitch way segments into closed rings by matching endpoints.
///
/// Segments may run in either direction. Returns `None` when any segment
/// cannot be closed into a ring of at least four points.
fn stitch_rings(mut segments: Vec<Vec<Point<f64>>>) -> Option<Vec<LineString<f64>>> {
    segments.retain(|s| s.len() >= 2);
    let mut rings = Vec::new();
    while let Some(mut current) = segments.pop() {
        loop {
            if current.len() >= 4 && current.first() == current.last() {
                rings.push(LineString::from(current));
                break;
            }
            let last = *current.last()?;
            let pos = segments
                .iter()
                .position(|s| s.first() == Some(&last) || s.last() == Some(&last))?;
            let mut next = segments.swap_remove(pos);
            if next.last() == Some(&last) {
                next.reverse();
            }
            current.extend(next.into_iter().skip(1));
        }
    }
    Some(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::RelationMember;
    use crate::ids::AreaOrigin;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point<f64>> {
        coords.iter().map(|(x, y)| Point::new(*x, *y)).collect()
    }

    fn relation(id: u64, members: &[(u64, &str)]) -> Relation {
        Relation {
            id: RelationId(id),
            members: members
                .iter()
                .map(|(mid, role)| RelationMember {
                    kind: MemberKind::Way,
                    id: *mid,
                    role: (*role).to_string(),
                })
                .collect(),
            tags: [("type", "multipolygon")].into_iter().collect(),
        }
    }

    #[test]
    fn untyped_relation_is_ignored() {
        let mut manager = MultipolygonManager::new();
        let mut rel = relation(1, &[(10, "outer")]);
        rel.tags = [("type", "route")].into_iter().collect();
        assert!(!manager.note_relation(&rel));
        assert!(!manager.wants_way(10));
    }

    #[test]
    fn single_closed_way_assembles() {
        let mut manager = MultipolygonManager::new();
        manager.note_relation(&relation(1, &[(10, "outer")]));
        assert!(manager.wants_way(10));

        let mut geometry = FxHashMap::default();
        geometry.insert(
            10u64,
            pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
        );
        let areas = manager.assemble(&geometry);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].id.origin(), AreaOrigin::Relation);
        assert_eq!(areas[0].object_id(), 1);
        assert_eq!(areas[0].polygon.0.len(), 1);
    }

    #[test]
    fn two_half_rings_stitch_with_reversal() {
        let mut manager = MultipolygonManager::new();
        manager.note_relation(&relation(2, &[(10, "outer"), (11, "outer")]));

        let mut geometry = FxHashMap::default();
        geometry.insert(10u64, pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]));
        // Runs the same direction as segment 10, so it must be reversed
        geometry.insert(11u64, pts(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0)]));
        let areas = manager.assemble(&geometry);
        assert_eq!(areas.len(), 1);
        let ring = areas[0].polygon.0[0].exterior();
        assert_eq!(ring.0.first(), ring.0.last());
        assert_eq!(ring.0.len(), 6);
    }

    #[test]
    fn inner_ring_becomes_hole() {
        let mut manager = MultipolygonManager::new();
        manager.note_relation(&relation(3, &[(10, "outer"), (11, "inner")]));

        let mut geometry = FxHashMap::default();
        geometry.insert(
            10u64,
            pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
        );
        geometry.insert(
            11u64,
            pts(&[(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0), (4.0, 4.0)]),
        );
        let areas = manager.assemble(&geometry);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].polygon.0[0].interiors().len(), 1);
    }

    #[test]
    fn unclosable_relation_is_skipped() {
        let mut manager = MultipolygonManager::new();
        manager.note_relation(&relation(4, &[(10, "outer")]));

        let mut geometry = FxHashMap::default();
        geometry.insert(10u64, pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)]));
        assert!(manager.assemble(&geometry).is_empty());
    }

    #[test]
    fn missing_way_geometry_skips_relation() {
        let mut manager = MultipolygonManager::new();
        manager.note_relation(&relation(5, &[(10, "outer"), (99, "outer")]));

        let mut geometry = FxHashMap::default();
        geometry.insert(
            10u64,
            pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
        );
        assert!(manager.assemble(&geometry).is_empty());
    }

    #[test]
    fn empty_role_counts_as_outer() {
        let mut manager = MultipolygonManager::new();
        manager.note_relation(&relation(6, &[(10, "")]));
        assert!(manager.wants_way(10));
    }
}
