//! Typed OSM identifiers.
//!
//! Area identifiers are derived: `2·way_id` for areas built from closed
//! ways, `2·relation_id + 1` for areas assembled from relations. The low
//! bit therefore discriminates the origin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// OSM node identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// OSM way identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WayId(pub u64);

/// OSM relation identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationId(pub u64);

/// Derived area identifier; see the module docs for the mangling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AreaId(u64);

/// Which entity kind an area was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AreaOrigin {
    Way,
    Relation,
}

impl AreaId {
    /// Area derived from a closed way.
    pub fn from_way(id: WayId) -> Self {
        AreaId(id.0 * 2)
    }

    /// Area assembled from a multipolygon relation.
    pub fn from_relation(id: RelationId) -> Self {
        AreaId(id.0 * 2 + 1)
    }

    /// The raw mangled value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Which entity kind this area came from.
    pub fn origin(&self) -> AreaOrigin {
        if self.0 & 1 == 0 {
            AreaOrigin::Way
        } else {
            AreaOrigin::Relation
        }
    }

    /// The id of the originating way or relation.
    pub fn object_id(&self) -> u64 {
        self.0 >> 1
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_id_mangling() {
        let from_way = AreaId::from_way(WayId(21));
        assert_eq!(from_way.value(), 42);
        assert_eq!(from_way.origin(), AreaOrigin::Way);
        assert_eq!(from_way.object_id(), 21);

        let from_rel = AreaId::from_relation(RelationId(21));
        assert_eq!(from_rel.value(), 43);
        assert_eq!(from_rel.origin(), AreaOrigin::Relation);
        assert_eq!(from_rel.object_id(), 21);
    }

    #[test]
    fn way_and_relation_areas_never_collide() {
        assert_ne!(
            AreaId::from_way(WayId(5)),
            AreaId::from_relation(RelationId(5))
        );
    }
}
