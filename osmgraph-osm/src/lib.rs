//! OSM entity model and spatial plumbing for the osmgraph converter.
//!
//! # Modules
//!
//! - [`ids`]: typed node / way / relation / area identifiers
//! - [`tags`]: ordered tag lists
//! - [`entity`]: node, way, relation value objects and the reader stream shape
//! - [`area`]: areas derived from closed ways and relations
//! - [`geometry`]: WKT text, envelopes, hulls, oriented boxes, simplification
//! - [`location`]: the node-location index (in-memory / dense / sparse)
//! - [`multipolygon`]: ring stitching from relation members
//! - [`error`]: error types

pub mod area;
pub mod entity;
mod error;
pub mod geometry;
pub mod ids;
pub mod location;
pub mod multipolygon;
pub mod tags;

pub use area::{way_has_area_tags, Area};
pub use entity::{
    Element, MemberKind, Node, RawWay, Relation, RelationMember, Way, WayGeometry, WayNode,
};
pub use error::{OsmError, Result};
pub use ids::{AreaId, AreaOrigin, NodeId, RelationId, WayId};
pub use location::{LocationIndex, LocationIndexBuilder};
pub use multipolygon::{MultipolygonManager, RingRole};
pub use tags::{Tag, TagList};
