//! Run configuration.
//!
//! One immutable value constructed at startup and passed by reference into
//! every subsystem. The CLI populates the fields; nothing mutates a config
//! after construction.

use osmgraph_rdf::OutputFormat;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where node locations are stored during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationStore {
    /// In-memory hash map (default).
    #[default]
    Memory,
    /// Id-sorted records in a cache file, binary-searched.
    Sparse,
    /// One slot per node id in a cache file, constant-time lookups.
    Dense,
}

impl FromStr for LocationStore {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sparse" => Ok(LocationStore::Sparse),
            "dense" => Ok(LocationStore::Dense),
            other => Err(format!(
                "unknown location store '{other}'; valid values: sparse, dense"
            )),
        }
    }
}

/// Datatype applied to the values of a configured tag key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagDatatype {
    Integer,
    Decimal,
    Double,
}

/// Immutable run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OSM input file.
    pub input: PathBuf,
    /// Output path; `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub output_format: OutputFormat,
    /// bzip2-compress the output.
    pub output_compress: bool,
    /// Keep the per-worker part files after the merge.
    pub output_keep_files: bool,
    /// Directory for the location index and temporary files.
    pub cache: PathBuf,
    pub store_locations: LocationStore,

    pub no_node_facts: bool,
    pub no_way_facts: bool,
    pub no_relation_facts: bool,
    pub no_area_facts: bool,

    pub no_node_geom_relations: bool,
    pub no_way_geom_relations: bool,
    pub no_area_geom_relations: bool,

    pub add_node_convex_hull: bool,
    pub add_node_envelope: bool,
    pub add_node_obb: bool,

    pub add_way_convex_hull: bool,
    pub add_way_envelope: bool,
    pub add_way_obb: bool,
    pub add_way_metadata: bool,
    pub add_way_node_geometry: bool,
    pub add_way_node_order: bool,
    pub add_way_node_spatial_metadata: bool,

    pub add_relation_convex_hull: bool,
    pub add_relation_envelope: bool,
    pub add_relation_obb: bool,
    pub add_relation_border_members: bool,

    pub add_area_convex_hull: bool,
    pub add_area_envelope: bool,
    pub add_area_obb: bool,
    pub add_area_envelope_ratio: bool,

    /// Attach the WKT literal directly to `geo:hasGeometry`; when false the
    /// indirect blank-node shape via `geo:asWKT` is used.
    pub hasgeometry_as_wkt: bool,
    /// Restrict relations and geometric relations to administrative
    /// boundaries.
    pub admin_relations_only: bool,
    /// Suppress the wikidata / wikipedia tag derivations.
    pub skip_wiki_links: bool,
    /// Keys whose values split on `;` into one triple per segment.
    pub semicolon_tag_keys: BTreeSet<String>,
    /// Datatypes for specific tag keys; values that do not parse fall back
    /// to plain literals.
    pub tag_key_datatypes: BTreeMap<String, TagDatatype>,

    /// Simplify WKT output for geometries with more than this many points
    /// (0 disables).
    pub simplify_wkt: u16,
    /// Ramer-Douglas-Peucker deviation, in coordinate degrees, for WKT
    /// simplification.
    pub wkt_deviation: f64,
    /// Fractional digits in WKT coordinates.
    pub wkt_precision: u16,

    /// Simplify geometries before the spatial-relations tests (0 disables).
    pub simplify_geometries: f64,
    /// Deviation for the exterior-rings-only variant.
    pub simplify_geometries_inner_outer: f64,
    /// Use exterior rings only in the spatial-relations tests.
    pub dont_use_inner_outer_geometries: bool,
    /// Envelope-only spatial-relations tests.
    pub approximate_spatial_rels: bool,

    /// Dump the containment edges as a Graphviz file in the cache dir.
    pub write_dag_dot_files: bool,
    /// Write `<output>.stats.json`.
    pub write_rdf_statistics: bool,

    /// Worker count; 0 picks the available parallelism.
    pub workers: usize,
}

impl Config {
    /// Configuration with defaults for everything but the two required
    /// paths.
    pub fn new(input: impl Into<PathBuf>, cache: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            output_format: OutputFormat::default(),
            output_compress: true,
            output_keep_files: false,
            cache: cache.into(),
            store_locations: LocationStore::default(),
            no_node_facts: false,
            no_way_facts: false,
            no_relation_facts: false,
            no_area_facts: false,
            no_node_geom_relations: false,
            no_way_geom_relations: false,
            no_area_geom_relations: false,
            add_node_convex_hull: false,
            add_node_envelope: false,
            add_node_obb: false,
            add_way_convex_hull: false,
            add_way_envelope: false,
            add_way_obb: false,
            add_way_metadata: false,
            add_way_node_geometry: false,
            add_way_node_order: false,
            add_way_node_spatial_metadata: false,
            add_relation_convex_hull: false,
            add_relation_envelope: false,
            add_relation_obb: false,
            add_relation_border_members: false,
            add_area_convex_hull: false,
            add_area_envelope: false,
            add_area_obb: false,
            add_area_envelope_ratio: false,
            hasgeometry_as_wkt: true,
            admin_relations_only: false,
            skip_wiki_links: false,
            semicolon_tag_keys: BTreeSet::new(),
            tag_key_datatypes: BTreeMap::new(),
            simplify_wkt: 250,
            wkt_deviation: 0.00001,
            wkt_precision: 7,
            simplify_geometries: 0.0,
            simplify_geometries_inner_outer: 0.0,
            dont_use_inner_outer_geometries: false,
            approximate_spatial_rels: false,
            write_dag_dot_files: false,
            write_rdf_statistics: false,
            workers: 0,
        }
    }

    /// Effective worker count.
    pub fn worker_count(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Final output path, with `.bz2` appended when compression is on.
    pub fn final_output(&self) -> Option<PathBuf> {
        let output = self.output.as_ref()?;
        if self.output_compress && output.extension().map(|e| e != "bz2").unwrap_or(true) {
            let mut name = output.as_os_str().to_owned();
            name.push(".bz2");
            return Some(PathBuf::from(name));
        }
        Some(output.clone())
    }

    /// Statistics file path: `<output>.stats.json` (the uncompressed name).
    pub fn stats_path(&self) -> Option<PathBuf> {
        let output = self.output.as_ref()?;
        let mut name = output.as_os_str().to_owned();
        name.push(".stats.json");
        Some(PathBuf::from(name))
    }

    /// Per-worker part file path in the cache directory.
    pub fn part_path(&self, worker: usize) -> PathBuf {
        self.cache.join(format!("rdf-part-{worker}"))
    }

    /// Graphviz dump path for the containment edges.
    pub fn dot_path(&self) -> PathBuf {
        self.cache.join("spatial-relations.dot")
    }

    /// Human-readable configuration listing.
    pub fn summary(&self) -> String {
        fn path(p: &Path) -> String {
            p.display().to_string()
        }
        let mut out = String::new();
        let _ = writeln!(out, "Configuration");
        let _ = writeln!(out, "  --- I/O ---");
        let _ = writeln!(out, "  Input:         {}", path(&self.input));
        match &self.output {
            Some(o) => {
                let _ = writeln!(out, "  Output:        {}", path(o));
            }
            None => {
                let _ = writeln!(out, "  Output:        <stdout>");
            }
        }
        let _ = writeln!(out, "  Output format: {}", self.output_format);
        let _ = writeln!(out, "  Cache:         {}", path(&self.cache));
        let _ = writeln!(out, "  --- Facts ---");
        if self.admin_relations_only {
            let _ = writeln!(out, "  Only administrative relations");
        }
        for (skipped, label) in [
            (self.no_area_facts, "area"),
            (self.no_node_facts, "node"),
            (self.no_relation_facts, "relation"),
            (self.no_way_facts, "way"),
        ] {
            if skipped {
                let _ = writeln!(out, "  Not dumping {label} facts");
            }
        }
        for (on, label) in [
            (self.add_area_convex_hull, "area convex hulls"),
            (self.add_area_envelope, "area envelopes"),
            (self.add_area_obb, "area oriented bounding boxes"),
            (self.add_area_envelope_ratio, "area envelope ratios"),
            (self.add_node_convex_hull, "node convex hulls"),
            (self.add_node_envelope, "node envelopes"),
            (self.add_node_obb, "node oriented bounding boxes"),
            (self.add_relation_border_members, "relation border members"),
            (self.add_relation_convex_hull, "relation convex hulls"),
            (self.add_relation_envelope, "relation envelopes"),
            (self.add_relation_obb, "relation oriented bounding boxes"),
            (self.add_way_convex_hull, "way convex hulls"),
            (self.add_way_envelope, "way envelopes"),
            (self.add_way_obb, "way oriented bounding boxes"),
            (self.add_way_metadata, "way metadata"),
            (self.add_way_node_geometry, "way node geometry"),
            (self.add_way_node_order, "way node order"),
            (self.add_way_node_spatial_metadata, "way node spatial metadata"),
        ] {
            if on {
                let _ = writeln!(out, "  Adding {label}");
            }
        }
        if self.skip_wiki_links {
            let _ = writeln!(out, "  Skipping wiki links");
        }
        if self.simplify_wkt > 0 {
            let _ = writeln!(
                out,
                "  Simplifying WKT above {} points (deviation {})",
                self.simplify_wkt, self.wkt_deviation
            );
        }
        let _ = writeln!(out, "  WKT precision: {}", self.wkt_precision);
        if !self.semicolon_tag_keys.is_empty() {
            let _ = writeln!(out, "  Semicolon-separated tag keys:");
            for key in &self.semicolon_tag_keys {
                let _ = writeln!(out, "    {key}");
            }
        }
        let _ = writeln!(out, "  --- Geometric relations ---");
        for (skipped, label) in [
            (self.no_area_geom_relations, "area"),
            (self.no_node_geom_relations, "node"),
            (self.no_way_geom_relations, "way"),
        ] {
            if skipped {
                let _ = writeln!(out, "  Not computing {label} geometric relations");
            }
        }
        if self.approximate_spatial_rels {
            let _ = writeln!(out, "  Approximate (envelope-only) spatial relations");
        }
        if self.simplify_geometries > 0.0 {
            let _ = writeln!(
                out,
                "  Simplifying geometries (deviation {})",
                self.simplify_geometries
            );
        }
        let _ = writeln!(out, "  --- Miscellaneous ---");
        match self.store_locations {
            LocationStore::Memory => {}
            LocationStore::Sparse => {
                let _ = writeln!(out, "  Locations on disk: sparse");
            }
            LocationStore::Dense => {
                let _ = writeln!(out, "  Locations on disk: dense");
            }
        }
        if self.write_dag_dot_files {
            let _ = writeln!(out, "  Writing spatial-relations dot file");
        }
        if self.write_rdf_statistics {
            let _ = writeln!(out, "  Writing RDF statistics");
        }
        if self.output_keep_files {
            let _ = writeln!(out, "  Keeping part files");
        }
        let _ = writeln!(out, "  Workers: {}", self.worker_count());
        out
    }
}
