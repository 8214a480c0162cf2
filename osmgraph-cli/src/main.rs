mod cli;
mod error;

use clap::{CommandFactory, Parser};
use cli::Cli;
use error::{exit_code, exit_with_error, CliError, CliResult};
use osmgraph_convert::Config;
use std::process;

fn init_tracing() {
    // Progress and warnings go to stderr; RUST_LOG overrides the level.
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_help(level: u8) {
    let mut command = Cli::command();
    if level == 1 {
        let _ = command.print_help();
        return;
    }
    let _ = command.print_long_help();
    eprintln!("\nAdvanced options:");
    for (option, help) in cli::ADVANCED_OPTIONS {
        eprintln!("  {option:<42} {help}");
    }
    if level > 2 {
        eprintln!("\nExpert options:");
        for (option, help) in cli::EXPERT_OPTIONS {
            eprintln!("  {option:<42} {help}");
        }
    }
}

fn build_config(cli: Cli) -> CliResult<Config> {
    let cache = std::path::absolute(&cli.cache).unwrap_or_else(|_| cli.cache.clone());
    if !cache.exists() {
        return Err(CliError::usage(
            format!("cache location does not exist: {}", cache.display()),
            exit_code::CACHE_NOT_EXISTS,
        ));
    }
    if !cache.is_dir() {
        return Err(CliError::usage(
            format!("cache location is not a directory: {}", cache.display()),
            exit_code::CACHE_NOT_DIRECTORY,
        ));
    }

    let input = cli.input.ok_or_else(|| {
        CliError::usage("no input specified", exit_code::INPUT_MISSING)
    })?;
    if !input.exists() {
        return Err(CliError::usage(
            format!("input does not exist: {}", input.display()),
            exit_code::INPUT_NOT_EXISTS,
        ));
    }
    if input.is_dir() {
        return Err(CliError::usage(
            format!("input is a directory: {}", input.display()),
            exit_code::INPUT_IS_DIRECTORY,
        ));
    }

    let mut config = Config::new(input, cache);
    config.output = cli.output;
    config.output_format = cli.output_format;
    config.output_compress = !cli.output_no_compress && config.output.is_some();
    config.output_keep_files = cli.output_keep_files;
    if let Some(mode) = cli.store_locations_on_disk {
        config.store_locations = mode;
    }

    // The coarse per-type switches imply both finer switches.
    config.no_area_facts = cli.no_area_facts || cli.no_area;
    config.no_node_facts = cli.no_node_facts || cli.no_node;
    config.no_relation_facts = cli.no_relation_facts || cli.no_relation;
    config.no_way_facts = cli.no_way_facts || cli.no_way;
    config.no_area_geom_relations = cli.no_area_geom_relations || cli.no_area;
    config.no_node_geom_relations = cli.no_node_geom_relations || cli.no_node;
    config.no_way_geom_relations = cli.no_way_geom_relations || cli.no_way;

    config.add_area_convex_hull = cli.add_area_convex_hull;
    config.add_area_envelope = cli.add_area_envelope;
    config.add_area_obb = cli.add_area_oriented_bounding_box;
    config.add_area_envelope_ratio = cli.add_area_envelope_ratio;
    config.add_node_convex_hull = cli.add_node_convex_hull;
    config.add_node_envelope = cli.add_node_envelope;
    config.add_node_obb = cli.add_node_oriented_bounding_box;
    config.add_relation_convex_hull = cli.add_relation_convex_hull;
    config.add_relation_envelope = cli.add_relation_envelope;
    config.add_relation_obb = cli.add_relation_oriented_bounding_box;
    config.add_relation_border_members = cli.add_relation_border_members;
    config.add_way_convex_hull = cli.add_way_convex_hull;
    config.add_way_envelope = cli.add_way_envelope;
    config.add_way_obb = cli.add_way_oriented_bounding_box;
    config.add_way_metadata = cli.add_way_metadata;
    config.add_way_node_geometry = cli.add_way_node_geometry;
    config.add_way_node_spatial_metadata = cli.add_way_node_spatial_metadata;
    config.add_way_node_order =
        cli.add_way_node_order || cli.add_way_node_geometry || cli.add_way_node_spatial_metadata;

    if cli.hasgeometry_as_wkt {
        config.hasgeometry_as_wkt = true;
    }
    config.admin_relations_only = cli.admin_relations_only;
    config.skip_wiki_links = cli.skip_wiki_links;
    config.semicolon_tag_keys = cli.semicolon_tag_keys.into_iter().collect();
    config.simplify_wkt = cli.simplify_wkt;
    config.wkt_deviation = cli.wkt_deviation;
    config.wkt_precision = cli.wkt_precision;
    config.simplify_geometries = cli.simplify_geometries;
    config.simplify_geometries_inner_outer = cli.simplify_geometries_inner_outer;
    config.dont_use_inner_outer_geometries = cli.dont_use_inner_outer_geometries;
    config.approximate_spatial_rels = cli.approximate_spatial_rels;
    config.write_dag_dot_files = cli.write_dag_dot_files;
    config.write_rdf_statistics = cli.write_rdf_statistics;
    Ok(config)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == clap::error::ErrorKind::DisplayVersion => {
            let _ = e.print();
            process::exit(exit_code::SUCCESS);
        }
        Err(e) => {
            let _ = e.print();
            process::exit(exit_code::UNKNOWN_ARGUMENT);
        }
    };

    if cli.help > 0 {
        print_help(cli.help);
        process::exit(exit_code::SUCCESS);
    }

    init_tracing();

    let config = match build_config(cli) {
        Ok(config) => config,
        Err(e) => exit_with_error(e),
    };
    eprint!("{}", config.summary());

    match osmgraph_convert::run(&config) {
        Ok(stats) => {
            tracing::info!(
                nodes = stats.entities.nodes,
                ways = stats.entities.ways,
                relations = stats.entities.relations,
                areas = stats.entities.areas,
                triples = stats.writer.triples(),
                "conversion finished"
            );
        }
        Err(e) => exit_with_error(CliError::from(e)),
    }
}
