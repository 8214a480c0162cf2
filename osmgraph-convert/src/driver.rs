//! Two-pass conversion driver.
//!
//! Pass 1 streams the input once to populate the node-location index
//! (single writer) and to note multipolygon candidate relations. Pass 2
//! streams again, dispatching batches round-robin to a static pool of
//! workers; each batch is decoded and dumped end-to-end on one worker into
//! that worker's own output stream. Relation areas are assembled after the
//! barrier and distributed over the same streams, followed by the
//! spatial-relations pass. The merge concatenates the per-worker streams
//! in worker-id order, which is the only total order of the output.
//!
//! Cancellation is a cooperative flag polled between batches: a fatal
//! worker error sets it, in-flight batches finish, streams are flushed and
//! merged over whatever was produced, and the error propagates.

use crate::config::{Config, LocationStore};
use crate::dump::DumpHandler;
use crate::error::{ConvertError, Result};
use crate::output::{self, PartSink};
use crate::relations::{self, AreaSummary, RelationCounts};
use crate::source::{ElementSource, PbfSource};
use crate::terms::VocabTerms;
use crossbeam_channel::{bounded, Receiver};
use osmgraph_osm::{Area, Element, LocationIndex, LocationIndexBuilder, MultipolygonManager};
use osmgraph_rdf::{
    Format, Nt, OutputFormat, Qlever, TripleWriter, Ttl, WriterHandle, WriterStats,
};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Entity counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EntityCounts {
    pub nodes: u64,
    pub ways: u64,
    pub relations: u64,
    pub areas: u64,
}

impl EntityCounts {
    fn absorb(&mut self, other: &EntityCounts) {
        self.nodes += other.nodes;
        self.ways += other.ways;
        self.relations += other.relations;
        self.areas += other.areas;
    }
}

/// Result of a conversion run.
#[derive(Debug)]
pub struct RunStats {
    pub entities: EntityCounts,
    pub writer: WriterStats,
    pub relations: RelationCounts,
    /// Bytes in the merged output.
    pub bytes_written: u64,
}

/// Convert the configured OSM input file.
pub fn run(config: &Config) -> Result<RunStats> {
    let source = PbfSource::new(&config.input);
    run_source(config, &source)
}

/// Convert an arbitrary element source (the format dispatch point).
pub fn run_source<S: ElementSource>(config: &Config, source: &S) -> Result<RunStats> {
    match config.output_format {
        OutputFormat::Nt => run_with::<Nt, S>(config, source),
        OutputFormat::Ttl => run_with::<Ttl, S>(config, source),
        OutputFormat::Qlever => run_with::<Qlever, S>(config, source),
    }
}

struct WorkerOutput<F: Format> {
    handle: WriterHandle<F, PartSink>,
    way_geometry: Vec<(u64, Vec<geo_types::Point<f64>>)>,
    areas: Vec<AreaSummary>,
    counts: EntityCounts,
    error: Option<ConvertError>,
}

fn pass1<S: ElementSource>(
    config: &Config,
    source: &S,
) -> Result<(LocationIndex, MultipolygonManager)> {
    tracing::info!("pass 1: node locations, relations for areas");
    let mut builder = match config.store_locations {
        LocationStore::Memory => LocationIndexBuilder::in_memory(),
        LocationStore::Sparse => LocationIndexBuilder::sparse(&config.cache)?,
        LocationStore::Dense => LocationIndexBuilder::dense(&config.cache)?,
    };
    let mut manager = MultipolygonManager::new();
    let mut nodes = 0u64;
    source.for_each_batch(&mut |batch| {
        for element in source.decode_batch(batch)? {
            match element {
                Element::Node(n) => {
                    builder.insert(n.id.0, n.point.x(), n.point.y())?;
                    nodes += 1;
                }
                Element::Relation(r) => {
                    manager.note_relation(&r);
                }
                Element::Way(_) => {}
            }
        }
        Ok(())
    })?;
    tracing::info!(
        nodes,
        candidates = manager.candidate_count(),
        "pass 1 done"
    );
    Ok((builder.freeze()?, manager))
}

#[allow(clippy::too_many_arguments)]
fn pass2_worker<F: Format, S: ElementSource>(
    config: &Config,
    source: &S,
    index: &LocationIndex,
    manager: &MultipolygonManager,
    terms: &VocabTerms,
    cancel: &AtomicBool,
    rx: Receiver<S::Batch>,
    mut handle: WriterHandle<F, PartSink>,
) -> WorkerOutput<F> {
    let dump = DumpHandler::new(config, terms);
    let collect_way_areas =
        !config.no_area_geom_relations && !config.no_way_geom_relations;
    let mut way_geometry = Vec::new();
    let mut areas = Vec::new();
    let mut counts = EntityCounts::default();
    let mut error = None;

    let mut work = |handle: &mut WriterHandle<F, PartSink>, element: Element| -> Result<()> {
        match element {
            Element::Node(node) => {
                counts.nodes += 1;
                if !config.no_node_facts {
                    dump.node(handle, &node)?;
                }
            }
            Element::Way(raw) => {
                counts.ways += 1;
                let way = raw.resolve(index);
                if !config.no_way_facts {
                    dump.way(handle, &way)?;
                }
                if manager.wants_way(way.id.0) {
                    way_geometry.push((way.id.0, way.dedup_points()));
                }
                if let Some(area) = Area::from_closed_way(&way) {
                    counts.areas += 1;
                    if !config.no_area_facts {
                        dump.area(handle, &area)?;
                    }
                    if collect_way_areas {
                        if let Some(envelope) = area.envelope() {
                            areas.push(AreaSummary {
                                id: area.id,
                                envelope,
                                administrative: area.is_administrative(),
                                polygon: area.polygon,
                            });
                        }
                    }
                }
            }
            Element::Relation(rel) => {
                counts.relations += 1;
                if !config.no_relation_facts {
                    dump.relation(handle, &rel)?;
                }
            }
        }
        Ok(())
    };

    'batches: for batch in rx {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        let elements = match source.decode_batch(batch) {
            Ok(elements) => elements,
            Err(e) => {
                cancel.store(true, Ordering::Relaxed);
                error = Some(e);
                break;
            }
        };
        for element in elements {
            if let Err(e) = work(&mut handle, element) {
                cancel.store(true, Ordering::Relaxed);
                error = Some(e);
                break 'batches;
            }
        }
    }

    WorkerOutput {
        handle,
        way_geometry,
        areas,
        counts,
        error,
    }
}

fn run_with<F: Format, S: ElementSource>(config: &Config, source: &S) -> Result<RunStats> {
    let workers = config.worker_count();
    let (index, manager) = pass1(config, source)?;

    let writer = TripleWriter::<F>::new();
    let terms = VocabTerms::new::<F>(writer.prefixes());

    let mut sinks = Vec::with_capacity(workers);
    for w in 0..workers {
        sinks.push(PartSink::create(config, w)?);
    }
    let mut handles = writer.split(sinks);
    handles[0].write_header()?;

    let cancel = AtomicBool::new(false);
    let mut outputs: Vec<WorkerOutput<F>> = Vec::with_capacity(workers);
    let mut dispatch_result: Result<()> = Ok(());
    let mut worker_panicked = false;

    tracing::info!(workers, "pass 2: dumping entities");
    std::thread::scope(|scope| {
        let mut senders = Vec::with_capacity(workers);
        let mut joins = Vec::with_capacity(workers);
        for handle in handles.drain(..) {
            let (tx, rx) = bounded::<S::Batch>(16);
            senders.push(tx);
            let (index, manager, terms, cancel) = (&index, &manager, &terms, &cancel);
            joins.push(scope.spawn(move || {
                pass2_worker::<F, S>(config, source, index, manager, terms, cancel, rx, handle)
            }));
        }

        let mut next = 0usize;
        dispatch_result = source.for_each_batch(&mut |batch| {
            if cancel.load(Ordering::Relaxed) {
                return Err(ConvertError::Cancelled);
            }
            senders[next % workers]
                .send(batch)
                .map_err(|_| ConvertError::ChannelClosed)?;
            next += 1;
            Ok(())
        });
        drop(senders);

        for join in joins {
            match join.join() {
                Ok(output) => outputs.push(output),
                Err(_) => {
                    cancel.store(true, Ordering::Relaxed);
                    worker_panicked = true;
                }
            }
        }
    });

    let mut first_error = outputs.iter_mut().find_map(|o| o.error.take());
    if first_error.is_none() {
        if let Err(e) = dispatch_result {
            if !matches!(e, ConvertError::Cancelled) {
                first_error = Some(e);
            }
        }
    }
    if first_error.is_none() && worker_panicked {
        first_error = Some(ConvertError::Cancelled);
    }

    let mut way_geometry = FxHashMap::default();
    let mut area_summaries = Vec::new();
    let mut entity_counts = EntityCounts::default();
    let mut handles = Vec::with_capacity(outputs.len());
    for output in outputs {
        entity_counts.absorb(&output.counts);
        for (id, points) in output.way_geometry {
            way_geometry.insert(id, points);
        }
        area_summaries.extend(output.areas);
        handles.push(output.handle);
    }

    let mut relation_counts = RelationCounts::default();
    if first_error.is_none() {
        let result = assemble_and_relate::<F>(
            config,
            &terms,
            &manager,
            &way_geometry,
            &mut area_summaries,
            &mut entity_counts,
            &mut handles,
            &mut relation_counts,
        );
        if let Err(e) = result {
            first_error = Some(e);
        }
    }

    // Flush and close every stream, then merge in worker order. A
    // cancelled run still produces a valid document from what was written.
    let mut parts = Vec::with_capacity(handles.len());
    for handle in handles {
        let (sink, stats) = handle.into_inner()?;
        sink.finish()?;
        parts.push(stats);
    }
    let writer_stats = WriterStats::merge(parts);

    let mut destination = output::open_destination(config)?;
    let bytes_written = output::merge_parts(config, workers, &mut destination)?;
    drop(destination);

    if config.write_rdf_statistics {
        if let Some(path) = config.stats_path() {
            writer_stats.write_json(&path)?;
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }
    tracing::info!(
        nodes = entity_counts.nodes,
        ways = entity_counts.ways,
        relations = entity_counts.relations,
        areas = entity_counts.areas,
        triples = writer_stats.triples(),
        bytes = bytes_written,
        "run complete"
    );
    Ok(RunStats {
        entities: entity_counts,
        writer: writer_stats,
        relations: relation_counts,
        bytes_written,
    })
}

#[allow(clippy::too_many_arguments)]
fn assemble_and_relate<F: Format>(
    config: &Config,
    terms: &VocabTerms,
    manager: &MultipolygonManager,
    way_geometry: &FxHashMap<u64, Vec<geo_types::Point<f64>>>,
    area_summaries: &mut Vec<AreaSummary>,
    entity_counts: &mut EntityCounts,
    handles: &mut [WriterHandle<F, PartSink>],
    relation_counts: &mut RelationCounts,
) -> Result<()> {
    let need_areas = !(config.no_area_facts && config.no_area_geom_relations);
    if need_areas && manager.candidate_count() > 0 {
        let dump = DumpHandler::new(config, terms);
        let assembled = manager.assemble(way_geometry);
        tracing::info!(areas = assembled.len(), "assembled multipolygon relations");
        for (i, area) in assembled.into_iter().enumerate() {
            if config.admin_relations_only && !area.is_administrative() {
                continue;
            }
            entity_counts.areas += 1;
            if !config.no_area_facts {
                dump.area(&mut handles[i % handles.len()], &area)?;
            }
            if !config.no_area_geom_relations {
                if let Some(envelope) = area.envelope() {
                    area_summaries.push(AreaSummary {
                        id: area.id,
                        envelope,
                        administrative: area.is_administrative(),
                        polygon: area.polygon,
                    });
                }
            }
        }
    }

    if !config.no_area_geom_relations && !area_summaries.is_empty() {
        tracing::info!(areas = area_summaries.len(), "computing spatial relations");
        *relation_counts = relations::compute(config, terms, area_summaries, handles)?;
    }
    Ok(())
}
