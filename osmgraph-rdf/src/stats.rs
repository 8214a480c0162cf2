//! Output statistics: per-worker counters and the merged run summary.

use crate::error::Result;
use std::path::Path;

/// Per-worker output counters.
///
/// Owned by exactly one writer handle, so increments never contend; the
/// run summary is produced by merging after the workers are done.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LocalStats {
    /// Blank nodes generated by this worker.
    pub blank_nodes: u64,
    /// Header lines written by this worker.
    pub header: u64,
    /// Total lines written by this worker (headers included).
    pub lines: u64,
}

/// Merged writer statistics for a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriterStats {
    /// Blank nodes generated across all workers.
    pub blank_nodes: u64,
    /// Header lines across all workers.
    pub header: u64,
    /// Total lines across all workers.
    pub lines: u64,
}

impl WriterStats {
    /// Sum per-worker counters.
    pub fn merge(parts: impl IntoIterator<Item = LocalStats>) -> Self {
        let mut total = WriterStats::default();
        for part in parts {
            total.blank_nodes += part.blank_nodes;
            total.header += part.header;
            total.lines += part.lines;
        }
        total
    }

    /// Triple count: every non-header line is one triple.
    pub fn triples(&self) -> u64 {
        self.lines - self.header
    }

    /// Write the JSON summary file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::json!({
            "blankNodes": self.blank_nodes,
            "header": self.header,
            "lines": self.lines,
            "triples": self.triples(),
        });
        std::fs::write(path, serde_json::to_string_pretty(&json)? + "\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_counters() {
        let a = LocalStats {
            blank_nodes: 2,
            header: 12,
            lines: 40,
        };
        let b = LocalStats {
            blank_nodes: 3,
            header: 0,
            lines: 25,
        };
        let total = WriterStats::merge([a, b]);
        assert_eq!(total.blank_nodes, 5);
        assert_eq!(total.header, 12);
        assert_eq!(total.lines, 65);
        assert_eq!(total.triples(), 53);
    }

    #[test]
    fn json_file_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stats.json");
        let stats = WriterStats {
            blank_nodes: 1,
            header: 12,
            lines: 100,
        };
        stats.write_json(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["blankNodes"], 1);
        assert_eq!(parsed["header"], 12);
        assert_eq!(parsed["lines"], 100);
        assert_eq!(parsed["triples"], 88);
    }
}
