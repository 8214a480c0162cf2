//! Output format capability.
//!
//! The writer is generic over a format type implementing [`Format`], so the
//! per-triple encoding paths are monomorphized; the runtime format choice
//! is dispatched once, at startup, via [`OutputFormat`].

use crate::encode;
use crate::prefix::PrefixTable;
use std::fmt;
use std::str::FromStr;

/// Format capability: how IRIs are rendered and escaped.
pub trait Format: Send + Sync + 'static {
    /// Format name as used on the command line.
    const NAME: &'static str;

    /// Whether this format emits an `@prefix` header.
    const WRITES_HEADER: bool;

    /// Escape one IRIREF component.
    fn encode_iriref_part(s: &str) -> String;

    /// Render an IRI term from a prefix label and a local part, validating
    /// and escaping the local part.
    fn format_iri(table: &PrefixTable, prefix: &str, local: &str) -> String;

    /// Render an IRI term from components known to be grammar-legal.
    fn format_iri_unsafe(table: &PrefixTable, prefix: &str, local: &str) -> String;
}

fn iriref<F: Format>(table: &PrefixTable, prefix: &str, local: &str) -> String {
    let ns = table.resolve(prefix);
    format!(
        "<{}{}>",
        F::encode_iriref_part(ns),
        F::encode_iriref_part(local)
    )
}

/// Render a PrefixedName, falling back to IRIREF when the label itself is
/// not a legal PN_PREFIX.
fn prefixed_name<F: Format>(table: &PrefixTable, prefix: &str, local: &str) -> String {
    match encode::encode_pn_prefix(prefix) {
        Ok(p) => format!("{}:{}", p, encode::encode_pn_local(local)),
        Err(_) => iriref::<F>(table, prefix, local),
    }
}

/// N-Triples: IRIREF everywhere, UCHAR escaping, no header.
pub struct Nt;

impl Format for Nt {
    const NAME: &'static str = "nt";
    const WRITES_HEADER: bool = false;

    fn encode_iriref_part(s: &str) -> String {
        encode::encode_iriref(s)
    }

    fn format_iri(table: &PrefixTable, prefix: &str, local: &str) -> String {
        iriref::<Nt>(table, prefix, local)
    }

    fn format_iri_unsafe(table: &PrefixTable, prefix: &str, local: &str) -> String {
        // NT has no compact form, the safe path is already minimal
        iriref::<Nt>(table, prefix, local)
    }
}

/// Turtle: PrefixedName for known prefixes, IRIREF otherwise, UCHAR escaping.
pub struct Ttl;

impl Format for Ttl {
    const NAME: &'static str = "ttl";
    const WRITES_HEADER: bool = true;

    fn encode_iriref_part(s: &str) -> String {
        encode::encode_iriref(s)
    }

    fn format_iri(table: &PrefixTable, prefix: &str, local: &str) -> String {
        if table.contains(prefix) {
            prefixed_name::<Ttl>(table, prefix, local)
        } else {
            iriref::<Ttl>(table, prefix, local)
        }
    }

    fn format_iri_unsafe(table: &PrefixTable, prefix: &str, local: &str) -> String {
        if table.contains(prefix) {
            format!("{prefix}:{local}")
        } else {
            iriref::<Ttl>(table, prefix, local)
        }
    }
}

/// QLever Turtle dialect: as Turtle, but IRIREFs use PERCENT escaping.
pub struct Qlever;

impl Format for Qlever {
    const NAME: &'static str = "qlever";
    const WRITES_HEADER: bool = true;

    fn encode_iriref_part(s: &str) -> String {
        encode::encode_iriref_pct(s)
    }

    fn format_iri(table: &PrefixTable, prefix: &str, local: &str) -> String {
        if table.contains(prefix) {
            prefixed_name::<Qlever>(table, prefix, local)
        } else {
            iriref::<Qlever>(table, prefix, local)
        }
    }

    fn format_iri_unsafe(table: &PrefixTable, prefix: &str, local: &str) -> String {
        if table.contains(prefix) {
            format!("{prefix}:{local}")
        } else {
            iriref::<Qlever>(table, prefix, local)
        }
    }
}

/// Runtime format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// N-Triples
    Nt,
    /// Turtle (default)
    #[default]
    Ttl,
    /// QLever Turtle dialect
    Qlever,
}

impl OutputFormat {
    /// Format name as used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Nt => Nt::NAME,
            OutputFormat::Ttl => Ttl::NAME,
            OutputFormat::Qlever => Qlever::NAME,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nt" => Ok(OutputFormat::Nt),
            "ttl" => Ok(OutputFormat::Ttl),
            "qlever" => Ok(OutputFormat::Qlever),
            other => Err(format!(
                "unknown output format '{other}'; valid formats: nt, ttl, qlever"
            )),
        }
    }
}
