//! Areas: polygons derived from closed ways and multipolygon relations.

use crate::entity::{Way, WayGeometry};
use crate::geometry;
use crate::ids::{AreaId, RelationId};
use crate::tags::TagList;
use geo_types::{MultiPolygon, Rect};
use serde::{Deserialize, Serialize};

/// Tag keys whose presence marks a closed way as an area.
const AREA_TAG_KEYS: &[&str] = &[
    "building",
    "landuse",
    "natural",
    "leisure",
    "amenity",
    "boundary",
    "place",
    "waterway",
];

/// A polygonal area with the identity of its originating entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub polygon: MultiPolygon<f64>,
    pub tags: TagList,
}

impl Area {
    /// Build an area from a closed way, if the way has polygon geometry
    /// and area semantics (`area=yes` or one of the area tag keys, and not
    /// `area=no`).
    pub fn from_closed_way(way: &Way) -> Option<Area> {
        if !way_has_area_tags(&way.tags) {
            return None;
        }
        match way.geometry()? {
            WayGeometry::Polygon(poly) => Some(Area {
                id: AreaId::from_way(way.id),
                polygon: MultiPolygon(vec![poly]),
                tags: way.tags.clone(),
            }),
            _ => None,
        }
    }

    /// Build an area from an assembled multipolygon relation.
    pub fn from_relation(id: RelationId, polygon: MultiPolygon<f64>, tags: TagList) -> Area {
        Area {
            id: AreaId::from_relation(id),
            polygon,
            tags,
        }
    }

    /// Whether this area came from a closed way.
    pub fn from_way(&self) -> bool {
        self.id.origin() == crate::ids::AreaOrigin::Way
    }

    /// The way or relation id behind this area.
    pub fn object_id(&self) -> u64 {
        self.id.object_id()
    }

    pub fn envelope(&self) -> Option<Rect<f64>> {
        geometry::envelope(&self.polygon)
    }

    /// Whether this area is an administrative boundary.
    pub fn is_administrative(&self) -> bool {
        self.tags.get("boundary") == Some("administrative")
    }
}

/// Area semantics check for closed ways.
pub fn way_has_area_tags(tags: &TagList) -> bool {
    match tags.get("area") {
        Some("no") => return false,
        Some(_) => return true,
        None => {}
    }
    AREA_TAG_KEYS.iter().any(|k| tags.contains_key(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::WayNode;
    use crate::ids::{NodeId, WayId};
    use geo_types::Point;

    fn closed_square(tags: TagList) -> Way {
        let coords = [
            (1u64, 0.0, 0.0),
            (2, 1.0, 0.0),
            (3, 1.0, 1.0),
            (4, 0.0, 1.0),
            (1, 0.0, 0.0),
        ];
        Way {
            id: WayId(7),
            nodes: coords
                .iter()
                .map(|(id, x, y)| WayNode {
                    id: NodeId(*id),
                    point: Point::new(*x, *y),
                })
                .collect(),
            tags,
        }
    }

    #[test]
    fn building_way_becomes_area() {
        let tags: TagList = [("building", "yes")].into_iter().collect();
        let area = Area::from_closed_way(&closed_square(tags)).unwrap();
        assert!(area.from_way());
        assert_eq!(area.object_id(), 7);
        assert_eq!(area.id.value(), 14);
    }

    #[test]
    fn area_no_suppresses() {
        let tags: TagList = [("building", "yes"), ("area", "no")].into_iter().collect();
        assert!(Area::from_closed_way(&closed_square(tags)).is_none());
    }

    #[test]
    fn untagged_way_is_not_an_area() {
        assert!(Area::from_closed_way(&closed_square(TagList::new())).is_none());
    }

    #[test]
    fn relation_area_identity() {
        let ring = geo_types::LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let mp = MultiPolygon(vec![geo_types::Polygon::new(ring, vec![])]);
        let area = Area::from_relation(RelationId(3), mp, TagList::new());
        assert!(!area.from_way());
        assert_eq!(area.object_id(), 3);
        assert_eq!(area.id.value(), 7);
    }
}
