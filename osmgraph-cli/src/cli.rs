use clap::{ArgAction, Parser};
use osmgraph_convert::LocationStore;
use osmgraph_rdf::OutputFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "osmgraph",
    about = "Convert OpenStreetMap data to RDF triples",
    version,
    disable_help_flag = true
)]
pub struct Cli {
    /// OSM input file
    pub input: Option<PathBuf>,

    /// Show help; repeat for advanced (-hh) and expert (-hhh) options
    #[arg(short = 'h', long = "help", action = ArgAction::Count)]
    pub help: u8,

    /// Output path; omit to write to stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Output format: nt, ttl, qlever
    #[arg(long, default_value = "ttl", value_name = "FORMAT")]
    pub output_format: OutputFormat,

    /// Disable bzip2 output compression
    #[arg(long)]
    pub output_no_compress: bool,

    /// Keep the per-worker intermediate files after the merge
    #[arg(long, hide = true)]
    pub output_keep_files: bool,

    /// Directory for the location index and temporary files
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub cache: PathBuf,

    /// Store node locations on disk (sparse or dense)
    #[arg(
        long,
        value_name = "MODE",
        num_args = 0..=1,
        default_missing_value = "sparse"
    )]
    pub store_locations_on_disk: Option<LocationStore>,

    /// Skip areas entirely (facts and geometric relations)
    #[arg(long = "no-area")]
    pub no_area: bool,

    /// Skip nodes entirely (facts and geometric relations)
    #[arg(long = "no-node")]
    pub no_node: bool,

    /// Skip relations entirely
    #[arg(long = "no-relation")]
    pub no_relation: bool,

    /// Skip ways entirely (facts and geometric relations)
    #[arg(long = "no-way")]
    pub no_way: bool,

    /// Skip area facts
    #[arg(long, hide = true)]
    pub no_area_facts: bool,

    /// Skip node facts
    #[arg(long, hide = true)]
    pub no_node_facts: bool,

    /// Skip relation facts
    #[arg(long, hide = true)]
    pub no_relation_facts: bool,

    /// Skip way facts
    #[arg(long, hide = true)]
    pub no_way_facts: bool,

    /// Skip area geometric relations
    #[arg(long, hide = true)]
    pub no_area_geom_relations: bool,

    /// Skip node geometric relations
    #[arg(long, hide = true)]
    pub no_node_geom_relations: bool,

    /// Skip way geometric relations
    #[arg(long, hide = true)]
    pub no_way_geom_relations: bool,

    /// Emit area convex hulls
    #[arg(long)]
    pub add_area_convex_hull: bool,

    /// Emit area envelopes
    #[arg(long)]
    pub add_area_envelope: bool,

    /// Emit area oriented bounding boxes
    #[arg(long)]
    pub add_area_oriented_bounding_box: bool,

    /// Emit the envelope/area ratio for areas
    #[arg(long)]
    pub add_area_envelope_ratio: bool,

    /// Emit node convex hulls
    #[arg(long)]
    pub add_node_convex_hull: bool,

    /// Emit node envelopes
    #[arg(long)]
    pub add_node_envelope: bool,

    /// Emit node oriented bounding boxes
    #[arg(long)]
    pub add_node_oriented_bounding_box: bool,

    /// Emit relation convex hulls
    #[arg(long)]
    pub add_relation_convex_hull: bool,

    /// Emit relation envelopes
    #[arg(long)]
    pub add_relation_envelope: bool,

    /// Emit relation oriented bounding boxes
    #[arg(long)]
    pub add_relation_oriented_bounding_box: bool,

    /// Emit border-member records for administrative relations
    #[arg(long)]
    pub add_relation_border_members: bool,

    /// Emit way convex hulls
    #[arg(long)]
    pub add_way_convex_hull: bool,

    /// Emit way envelopes
    #[arg(long)]
    pub add_way_envelope: bool,

    /// Emit way oriented bounding boxes
    #[arg(long)]
    pub add_way_oriented_bounding_box: bool,

    /// Emit way metadata (is_closed, node counts)
    #[arg(long)]
    pub add_way_metadata: bool,

    /// Emit the geometry of every way node (implies --add-way-node-order)
    #[arg(long)]
    pub add_way_node_geometry: bool,

    /// Emit ordered way-node records
    #[arg(long)]
    pub add_way_node_order: bool,

    /// Emit successor links and distances between way nodes
    /// (implies --add-way-node-order)
    #[arg(long)]
    pub add_way_node_spatial_metadata: bool,

    /// Attach WKT literals directly to geo:hasGeometry
    #[arg(long)]
    pub hasgeometry_as_wkt: bool,

    /// Restrict relations and geometric relations to administrative
    /// boundaries
    #[arg(long)]
    pub admin_relations_only: bool,

    /// Suppress the wikidata / wikipedia link derivations
    #[arg(long)]
    pub skip_wiki_links: bool,

    /// Tag key whose values split on ';' (repeatable)
    #[arg(long = "semicolon-tag-keys", value_name = "KEY")]
    pub semicolon_tag_keys: Vec<String>,

    /// Simplify WKT output for geometries with more than this many points
    /// (0 disables)
    #[arg(long, default_value_t = 250, value_name = "N")]
    pub simplify_wkt: u16,

    /// Deviation for WKT simplification, in coordinate degrees
    #[arg(long, default_value_t = 0.00001, value_name = "DEG")]
    pub wkt_deviation: f64,

    /// Fractional digits in WKT coordinates
    #[arg(long, default_value_t = 7, value_name = "N")]
    pub wkt_precision: u16,

    /// Simplify geometries before the spatial-relations tests (0 disables)
    #[arg(long, hide = true, default_value_t = 0.0, value_name = "DEG")]
    pub simplify_geometries: f64,

    /// Deviation for the exterior-rings-only spatial-relations variant
    #[arg(long, hide = true, default_value_t = 0.0, value_name = "DEG")]
    pub simplify_geometries_inner_outer: f64,

    /// Use exterior rings only in the spatial-relations tests
    #[arg(long, hide = true)]
    pub dont_use_inner_outer_geometries: bool,

    /// Envelope-only spatial-relations tests
    #[arg(long, hide = true)]
    pub approximate_spatial_rels: bool,

    /// Dump the containment edges as a Graphviz file in the cache dir
    #[arg(long, hide = true)]
    pub write_dag_dot_files: bool,

    /// Write <output>.stats.json
    #[arg(long)]
    pub write_rdf_statistics: bool,
}

/// Hidden options, shown by `-hh` and up.
pub const ADVANCED_OPTIONS: &[(&str, &str)] = &[
    ("--no-area-facts", "Skip area facts"),
    ("--no-node-facts", "Skip node facts"),
    ("--no-relation-facts", "Skip relation facts"),
    ("--no-way-facts", "Skip way facts"),
    ("--no-area-geom-relations", "Skip area geometric relations"),
    ("--no-node-geom-relations", "Skip node geometric relations"),
    ("--no-way-geom-relations", "Skip way geometric relations"),
    ("--output-keep-files", "Keep per-worker intermediate files"),
];

/// Hidden options, shown by `-hhh` only.
pub const EXPERT_OPTIONS: &[(&str, &str)] = &[
    (
        "--simplify-geometries <DEG>",
        "Simplify geometries before the spatial-relations tests",
    ),
    (
        "--simplify-geometries-inner-outer <DEG>",
        "Deviation for the exterior-rings-only variant",
    ),
    (
        "--dont-use-inner-outer-geometries",
        "Use exterior rings only in the spatial-relations tests",
    ),
    (
        "--approximate-spatial-rels",
        "Envelope-only spatial-relations tests",
    ),
    (
        "--write-dag-dot-files",
        "Dump containment edges as a Graphviz file",
    ),
];
