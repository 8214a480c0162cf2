//! In-memory OSM entities.
//!
//! Entities are value objects: equality is identity + geometry + tags, and
//! everything is serde-serializable so intermediate caches stay valid
//! across passes. `RawWay` is the unresolved form delivered by the reader;
//! `Way` carries resolved node locations.

use crate::geometry;
use crate::ids::{NodeId, RelationId, WayId};
use crate::location::LocationIndex;
use crate::tags::TagList;
use geo_types::{LineString, Point, Polygon, Rect};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// An OSM node with its location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub point: Point<f64>,
    pub tags: TagList,
}

impl Node {
    pub fn new(id: u64, lon: f64, lat: f64, tags: TagList) -> Self {
        Self {
            id: NodeId(id),
            point: Point::new(lon, lat),
            tags,
        }
    }

    /// Degenerate envelope at the node's location.
    pub fn envelope(&self) -> Rect<f64> {
        Rect::new(self.point.0, self.point.0)
    }
}

/// A way as delivered by the reader: node references, not locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawWay {
    pub id: WayId,
    pub refs: Vec<NodeId>,
    pub tags: TagList,
}

impl RawWay {
    /// Resolve node references against the location index.
    ///
    /// References with no known location are dropped; the caller decides
    /// what an underpopulated way means.
    pub fn resolve(&self, index: &LocationIndex) -> Way {
        let mut nodes = Vec::with_capacity(self.refs.len());
        let mut missing = 0usize;
        for r in &self.refs {
            match index.get(r.0) {
                Some((lon, lat)) => nodes.push(WayNode {
                    id: *r,
                    point: Point::new(lon, lat),
                }),
                None => missing += 1,
            }
        }
        if missing > 0 {
            tracing::warn!(way = self.id.0, missing, "way references unknown nodes");
        }
        Way {
            id: self.id,
            nodes,
            tags: self.tags.clone(),
        }
    }
}

/// One resolved way node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WayNode {
    pub id: NodeId,
    pub point: Point<f64>,
}

/// A way with resolved node locations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub id: WayId,
    pub nodes: Vec<WayNode>,
    pub tags: TagList,
}

/// Geometry selected for a way; see [`Way::geometry`].
#[derive(Clone, Debug, PartialEq)]
pub enum WayGeometry {
    Point(Point<f64>),
    LineString(LineString<f64>),
    Polygon(Polygon<f64>),
}

impl Way {
    /// Whether first and last node reference the same OSM node.
    pub fn is_closed(&self) -> bool {
        match (self.nodes.first(), self.nodes.last()) {
            (Some(a), Some(b)) => a.id == b.id,
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node positions with consecutive duplicates collapsed.
    pub fn dedup_points(&self) -> Vec<Point<f64>> {
        let mut points: Vec<Point<f64>> = Vec::with_capacity(self.nodes.len());
        for n in &self.nodes {
            if points.last() != Some(&n.point) {
                points.push(n.point);
            }
        }
        points
    }

    /// Number of distinct node positions.
    pub fn unique_count(&self) -> usize {
        let mut seen = FxHashSet::default();
        for n in &self.nodes {
            seen.insert((n.point.x().to_bits(), n.point.y().to_bits()));
        }
        seen.len()
    }

    /// Select the geometry for this way:
    /// more than three distinct positions and closed ⇒ polygon, more than
    /// one ⇒ linestring, otherwise the first node's point.
    pub fn geometry(&self) -> Option<WayGeometry> {
        let points = self.dedup_points();
        let unique = self.unique_count();
        if unique > 3 && self.is_closed() {
            return Some(WayGeometry::Polygon(Polygon::new(
                LineString::from(points),
                vec![],
            )));
        }
        if unique > 1 {
            return Some(WayGeometry::LineString(LineString::from(points)));
        }
        points.first().map(|p| WayGeometry::Point(*p))
    }

    /// Envelope over all node positions.
    pub fn envelope(&self) -> Option<Rect<f64>> {
        let ls = LineString::from(self.dedup_points());
        geometry::envelope_linestring(&ls)
    }
}

/// Kind of a relation member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberKind {
    Node,
    Way,
    Relation,
    Unknown,
}

/// One relation member: kind, target id, role string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationMember {
    pub kind: MemberKind,
    pub id: u64,
    pub role: String,
}

/// An OSM relation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    pub members: Vec<RelationMember>,
    pub tags: TagList,
}

impl Relation {
    /// Whether this relation is a multipolygon / boundary candidate for
    /// area assembly.
    pub fn is_multipolygon(&self) -> bool {
        matches!(self.tags.get("type"), Some("multipolygon") | Some("boundary"))
    }

    /// Whether this relation is an administrative boundary.
    pub fn is_administrative(&self) -> bool {
        self.tags.get("boundary") == Some("administrative")
    }
}

/// One entity from the reader's stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Node(Node),
    Way(RawWay),
    Relation(Relation),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn way(points: &[(u64, f64, f64)]) -> Way {
        Way {
            id: WayId(1),
            nodes: points
                .iter()
                .map(|(id, x, y)| WayNode {
                    id: NodeId(*id),
                    point: Point::new(*x, *y),
                })
                .collect(),
            tags: TagList::new(),
        }
    }

    #[test]
    fn closed_three_unique_is_linestring() {
        // A,B,C,A closes but has only three distinct positions
        let w = way(&[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 1.0, 1.0), (1, 0.0, 0.0)]);
        assert!(w.is_closed());
        assert_eq!(w.unique_count(), 3);
        assert!(matches!(w.geometry(), Some(WayGeometry::LineString(_))));
    }

    #[test]
    fn closed_four_unique_is_polygon() {
        let w = way(&[
            (1, 0.0, 0.0),
            (2, 1.0, 0.0),
            (3, 1.0, 1.0),
            (4, 0.0, 1.0),
            (1, 0.0, 0.0),
        ]);
        assert!(w.is_closed());
        assert_eq!(w.unique_count(), 4);
        assert!(matches!(w.geometry(), Some(WayGeometry::Polygon(_))));
    }

    #[test]
    fn open_way_is_linestring() {
        let w = way(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        assert!(!w.is_closed());
        assert!(matches!(w.geometry(), Some(WayGeometry::LineString(_))));
    }

    #[test]
    fn single_position_is_point() {
        let w = way(&[(1, 2.0, 3.0), (1, 2.0, 3.0)]);
        match w.geometry() {
            Some(WayGeometry::Point(p)) => assert_eq!(p, Point::new(2.0, 3.0)),
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn empty_way_has_no_geometry() {
        let w = way(&[]);
        assert!(w.geometry().is_none());
        assert!(!w.is_closed());
    }

    #[test]
    fn dedup_collapses_consecutive_only() {
        let w = way(&[
            (1, 0.0, 0.0),
            (2, 0.0, 0.0),
            (3, 1.0, 0.0),
            (4, 0.0, 0.0),
        ]);
        assert_eq!(w.dedup_points().len(), 3);
        assert_eq!(w.unique_count(), 2);
    }

    #[test]
    fn entities_round_trip_through_serde() {
        let w = way(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(serde_json::from_str::<Way>(&json).unwrap(), w);

        let n = Node::new(5, 7.84, 47.99, [("name", "x")].into_iter().collect());
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(serde_json::from_str::<Node>(&json).unwrap(), n);

        let raw = RawWay {
            id: WayId(3),
            refs: vec![NodeId(1), NodeId(2)],
            tags: TagList::new(),
        };
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(serde_json::from_str::<RawWay>(&json).unwrap(), raw);
    }

    #[test]
    fn multipolygon_detection() {
        let mut rel = Relation {
            id: RelationId(9),
            members: vec![],
            tags: TagList::new(),
        };
        assert!(!rel.is_multipolygon());
        rel.tags.push("type", "multipolygon");
        assert!(rel.is_multipolygon());

        let boundary: TagList = [("type", "boundary"), ("boundary", "administrative")]
            .into_iter()
            .collect();
        let rel = Relation {
            id: RelationId(10),
            members: vec![],
            tags: boundary,
        };
        assert!(rel.is_multipolygon());
        assert!(rel.is_administrative());
    }
}
