//! Two-pass OSM to RDF conversion pipeline.
//!
//! # Modules
//!
//! - [`config`]: the immutable run configuration
//! - [`source`]: element sources (`PbfSource` for OSM PBF files,
//!   `VecSource` for synthetic streams)
//! - [`driver`]: the two-pass driver and worker pool
//! - [`dump`]: entity-to-triples projection
//! - [`relations`]: area-area spatial relations
//! - [`terms`]: pre-formatted constant terms
//! - [`output`]: per-worker part files and the ordered merge
//! - [`error`]: error types

pub mod config;
pub mod driver;
pub mod dump;
mod error;
pub mod output;
pub mod relations;
pub mod source;
pub mod terms;

pub use config::{Config, LocationStore, TagDatatype};
pub use driver::{run, run_source, EntityCounts, RunStats};
pub use error::{ConvertError, Result};
pub use source::{ElementSource, PbfSource, VecSource};
