//! RDF serialization writer: N-Triples, Turtle, and the QLever dialect.
//!
//! This crate turns logical triples into conforming serialization text.
//! The work is in the encoding: every IRI component and local name is
//! escaped per the W3C grammars (IRIREF, PN_PREFIX, PN_LOCAL, PERCENT,
//! UCHAR, STRING_LITERAL_QUOTE), which requires decoding UTF-8 explicitly
//! to classify codepoints against the Turtle character-class ranges.
//!
//! # Key Design Principles
//!
//! 1. **Format as a capability** - The writer is generic over a [`Format`]
//!    type (`Nt`, `Ttl`, `Qlever`); the per-triple path is monomorphized
//!    and never dispatches dynamically.
//!
//! 2. **Partitioned output** - [`TripleWriter::split`] hands each worker
//!    an exclusively-owned [`WriterHandle`] with its own stream and its
//!    own statistics counters; concatenating the streams in worker order
//!    is the only total order the output has.
//!
//! 3. **Escape, don't fail** - Wherever the grammar admits a PLX escape
//!    the encoders substitute it, so arbitrary tag keys and values always
//!    serialize. Only productions without an escape form (PN_PREFIX,
//!    language tags) reject input.
//!
//! # Modules
//!
//! - [`utf8`]: byte-slice UTF-8 scanner
//! - [`chars`]: Turtle character class predicates
//! - [`encode`]: grammar encoders
//! - [`prefix`]: label to namespace-IRI table
//! - [`format`]: the `Nt` / `Ttl` / `Qlever` format capability
//! - [`writer`]: triple writer and per-worker handles
//! - [`stats`]: per-worker counters and the merged JSON summary

pub mod chars;
pub mod encode;
mod error;
mod format;
mod prefix;
mod stats;
pub mod utf8;
mod writer;

pub use error::{RdfError, Result};
pub use format::{Format, Nt, OutputFormat, Qlever, Ttl};
pub use prefix::PrefixTable;
pub use stats::{LocalStats, WriterStats};
pub use writer::{TripleWriter, WriterHandle};
