//! Format-parametric triple writer with per-worker output partitioning.
//!
//! # Design
//!
//! [`TripleWriter`] holds the prefix table while prefixes may still be
//! registered. [`TripleWriter::split`] freezes the table and hands out one
//! [`WriterHandle`] per worker; each handle exclusively owns its output
//! stream and its statistics counters, so the hot path takes no locks and
//! shares no mutable state. The caller concatenates the per-worker streams
//! in worker-id order after the run; RDF triple order is semantically
//! irrelevant, the fixed order exists for reproducibility only.

use crate::encode;
use crate::error::Result;
use crate::format::Format;
use crate::prefix::PrefixTable;
use crate::stats::LocalStats;
use std::io::Write;
use std::marker::PhantomData;
use std::sync::Arc;

/// Writer front end: prefix registration and worker splitting.
pub struct TripleWriter<F: Format> {
    prefixes: PrefixTable,
    _format: PhantomData<F>,
}

impl<F: Format> TripleWriter<F> {
    /// Create a writer with the well-known prefix bindings.
    pub fn new() -> Self {
        Self::with_prefixes(PrefixTable::well_known())
    }

    /// Create a writer over a caller-supplied prefix table.
    pub fn with_prefixes(prefixes: PrefixTable) -> Self {
        Self {
            prefixes,
            _format: PhantomData,
        }
    }

    /// Register an additional prefix. Only possible before [`Self::split`].
    pub fn add_prefix(&mut self, label: impl Into<String>, iri: impl Into<String>) -> Result<()> {
        self.prefixes.add(label, iri)
    }

    /// The current prefix table.
    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Freeze the prefix table and hand out one handle per output sink.
    ///
    /// Sink `k` becomes worker `k`; worker 0 is the one that writes the
    /// header.
    pub fn split<W: Write>(mut self, sinks: Vec<W>) -> Vec<WriterHandle<F, W>> {
        self.prefixes.freeze();
        let shared = Arc::new(self.prefixes);
        sinks
            .into_iter()
            .enumerate()
            .map(|(worker, out)| WriterHandle {
                worker,
                out,
                prefixes: Arc::clone(&shared),
                stats: LocalStats::default(),
                _format: PhantomData,
            })
            .collect()
    }
}

impl<F: Format> Default for TripleWriter<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-worker writer: term factory plus triple emission into one stream.
pub struct WriterHandle<F: Format, W: Write> {
    worker: usize,
    out: W,
    prefixes: Arc<PrefixTable>,
    stats: LocalStats,
    _format: PhantomData<F>,
}

impl<F: Format, W: Write> WriterHandle<F, W> {
    /// The worker id this handle belongs to.
    pub fn worker_id(&self) -> usize {
        self.worker
    }

    /// Write the `@prefix` header (no-op for N-Triples).
    ///
    /// Call on exactly one worker, before any triples.
    pub fn write_header(&mut self) -> Result<()> {
        if !F::WRITES_HEADER {
            return Ok(());
        }
        let prefixes = Arc::clone(&self.prefixes);
        for (label, iri) in prefixes.iter() {
            self.write_triple("@prefix", &format!("{label}:"), &format!("<{iri}>"))?;
            self.stats.header += 1;
        }
        Ok(())
    }

    /// Write one `s p o .` line.
    pub fn write_triple(&mut self, s: &str, p: &str, o: &str) -> Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.out.write_all(b" ")?;
        self.out.write_all(p.as_bytes())?;
        self.out.write_all(b" ")?;
        self.out.write_all(o.as_bytes())?;
        self.out.write_all(b" .\n")?;
        self.stats.lines += 1;
        Ok(())
    }

    /// Render an IRI term; the local part is trimmed and escaped.
    pub fn iri(&self, prefix: &str, local: &str) -> String {
        F::format_iri(&self.prefixes, prefix, local.trim())
    }

    /// Render an IRI term from grammar-legal components, skipping validation.
    ///
    /// Never call this on user-derived strings.
    pub fn iri_unsafe(&self, prefix: &str, local: &str) -> String {
        F::format_iri_unsafe(&self.prefixes, prefix, local)
    }

    /// Render an IRI term with a numeric local part (always grammar-legal).
    pub fn iri_id(&self, prefix: &str, id: u64) -> String {
        F::format_iri_unsafe(&self.prefixes, prefix, &id.to_string())
    }

    /// Generate a fresh blank node label, unique across the whole run.
    pub fn blank_node(&mut self) -> String {
        let n = self.stats.blank_nodes;
        self.stats.blank_nodes += 1;
        format!("_:{}_{}", self.worker, n)
    }

    /// Render a plain string literal.
    pub fn literal(&self, value: &str) -> String {
        encode::string_literal_quote(value)
    }

    /// Render a literal whose lexical form needs no escaping.
    pub fn literal_unsafe(&self, value: &str) -> String {
        format!("\"{value}\"")
    }

    /// Render a typed literal; `datatype` is an already-formatted IRI term.
    pub fn typed_literal(&self, value: &str, datatype: &str) -> String {
        format!("{}^^{}", encode::string_literal_quote(value), datatype)
    }

    /// Render a language-tagged literal, validating the tag.
    pub fn lang_literal(&self, value: &str, tag: &str) -> Result<String> {
        Ok(format!(
            "{}{}",
            encode::string_literal_quote(value),
            encode::lang_tag(tag)?
        ))
    }

    /// The prefix table shared by all handles.
    pub fn prefixes(&self) -> &PrefixTable {
        &self.prefixes
    }

    /// Counters accumulated so far.
    pub fn local_stats(&self) -> LocalStats {
        self.stats
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush and dismantle into the sink and the final counters.
    pub fn into_inner(mut self) -> Result<(W, LocalStats)> {
        self.out.flush()?;
        Ok((self.out, self.stats))
    }
}
