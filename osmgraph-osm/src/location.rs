//! Node-location index.
//!
//! Pass 1 populates the index through a single-writer builder; `freeze`
//! turns it into a read-only index that is shared across workers. Three
//! layouts:
//!
//! - `InMemory`: hash map, the default.
//! - `Dense`: one fixed 16-byte slot per node id in a cache file,
//!   memory-mapped for reads. Lookup is constant-time; file size is
//!   proportional to the highest node id (holes stay unallocated on
//!   sparse-file systems).
//! - `Sparse`: id-sorted 24-byte records in a cache file, binary-searched
//!   through the mapping. File size is proportional to the node count.

use crate::error::Result;
use memmap2::Mmap;
use rustc_hash::FxHashMap;
use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const DENSE_SLOT: u64 = 16;
const SPARSE_RECORD: usize = 24;
const DENSE_FILE: &str = "locations.dense";
const SPARSE_FILE: &str = "locations.sparse";

/// Single-writer index builder (pass 1).
pub struct LocationIndexBuilder {
    inner: BuilderInner,
    inserted: u64,
}

enum BuilderInner {
    InMemory(FxHashMap<u64, (f64, f64)>),
    Dense { file: std::fs::File, slots: u64 },
    Sparse {
        records: Vec<(u64, f64, f64)>,
        path: PathBuf,
    },
}

impl LocationIndexBuilder {
    /// In-memory map.
    pub fn in_memory() -> Self {
        Self {
            inner: BuilderInner::InMemory(FxHashMap::default()),
            inserted: 0,
        }
    }

    /// Dense file store in `cache_dir`.
    pub fn dense(cache_dir: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(cache_dir.join(DENSE_FILE))?;
        Ok(Self {
            inner: BuilderInner::Dense { file, slots: 0 },
            inserted: 0,
        })
    }

    /// Sparse file store in `cache_dir`.
    pub fn sparse(cache_dir: &Path) -> Result<Self> {
        Ok(Self {
            inner: BuilderInner::Sparse {
                records: Vec::new(),
                path: cache_dir.join(SPARSE_FILE),
            },
            inserted: 0,
        })
    }

    /// Record the location of a node.
    pub fn insert(&mut self, id: u64, lon: f64, lat: f64) -> Result<()> {
        self.inserted += 1;
        match &mut self.inner {
            BuilderInner::InMemory(map) => {
                map.insert(id, (lon, lat));
            }
            BuilderInner::Dense { file, slots } => {
                file.seek(SeekFrom::Start(id * DENSE_SLOT))?;
                file.write_all(&lon.to_le_bytes())?;
                file.write_all(&lat.to_le_bytes())?;
                *slots = (*slots).max(id + 1);
            }
            BuilderInner::Sparse { records, .. } => {
                records.push((id, lon, lat));
            }
        }
        Ok(())
    }

    /// Finish population and produce the shared read-only index.
    pub fn freeze(self) -> Result<LocationIndex> {
        let inserted = self.inserted;
        match self.inner {
            BuilderInner::InMemory(map) => Ok(LocationIndex {
                inner: IndexInner::InMemory(map),
            }),
            BuilderInner::Dense { mut file, slots } => {
                if slots == 0 {
                    // Empty files cannot be mapped
                    return Ok(LocationIndex {
                        inner: IndexInner::InMemory(FxHashMap::default()),
                    });
                }
                // Make sure the file covers every slot even if the last
                // insert was not the highest id.
                file.set_len(slots * DENSE_SLOT)?;
                file.flush()?;
                let map = unsafe { Mmap::map(&file)? };
                Ok(LocationIndex {
                    inner: IndexInner::Dense { map, slots },
                })
            }
            BuilderInner::Sparse { mut records, path } => {
                if records.is_empty() {
                    return Ok(LocationIndex {
                        inner: IndexInner::InMemory(FxHashMap::default()),
                    });
                }
                records.sort_unstable_by_key(|(id, _, _)| *id);
                records.dedup_by_key(|(id, _, _)| *id);
                let mut file = OpenOptions::new()
                    .create(true)
                    .truncate(true)
                    .read(true)
                    .write(true)
                    .open(&path)?;
                let mut buf = Vec::with_capacity(records.len() * SPARSE_RECORD);
                for (id, lon, lat) in &records {
                    buf.extend_from_slice(&id.to_le_bytes());
                    buf.extend_from_slice(&lon.to_le_bytes());
                    buf.extend_from_slice(&lat.to_le_bytes());
                }
                file.write_all(&buf)?;
                file.flush()?;
                let map = unsafe { Mmap::map(&file)? };
                let count = records.len();
                tracing::debug!(nodes = inserted, "sparse location index written");
                Ok(LocationIndex {
                    inner: IndexInner::Sparse { map, count },
                })
            }
        }
    }
}

/// Read-only node-location index, shareable across workers.
pub struct LocationIndex {
    inner: IndexInner,
}

enum IndexInner {
    InMemory(FxHashMap<u64, (f64, f64)>),
    Dense { map: Mmap, slots: u64 },
    Sparse { map: Mmap, count: usize },
}

impl LocationIndex {
    /// Look up the `(lon, lat)` of a node.
    pub fn get(&self, id: u64) -> Option<(f64, f64)> {
        match &self.inner {
            IndexInner::InMemory(map) => map.get(&id).copied(),
            IndexInner::Dense { map, slots } => {
                if id >= *slots {
                    return None;
                }
                let off = (id * DENSE_SLOT) as usize;
                let lon = f64::from_le_bytes(map[off..off + 8].try_into().ok()?);
                let lat = f64::from_le_bytes(map[off + 8..off + 16].try_into().ok()?);
                // An all-zero slot was never written; the exact zero pair
                // is treated as unset.
                if lon == 0.0 && lat == 0.0 {
                    return None;
                }
                Some((lon, lat))
            }
            IndexInner::Sparse { map, count } => {
                let record = |i: usize| -> u64 {
                    let off = i * SPARSE_RECORD;
                    u64::from_le_bytes(map[off..off + 8].try_into().unwrap_or_default())
                };
                let mut lo = 0usize;
                let mut hi = *count;
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    match record(mid).cmp(&id) {
                        std::cmp::Ordering::Less => lo = mid + 1,
                        std::cmp::Ordering::Greater => hi = mid,
                        std::cmp::Ordering::Equal => {
                            let off = mid * SPARSE_RECORD;
                            let lon =
                                f64::from_le_bytes(map[off + 8..off + 16].try_into().ok()?);
                            let lat =
                                f64::from_le_bytes(map[off + 16..off + 24].try_into().ok()?);
                            return Some((lon, lat));
                        }
                    }
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populate(builder: &mut LocationIndexBuilder) {
        // Out-of-order ids with gaps
        builder.insert(50, 5.0, 50.5).unwrap();
        builder.insert(7, 7.84, 47.99).unwrap();
        builder.insert(1000, -122.4, 37.8).unwrap();
    }

    fn check(index: &LocationIndex) {
        assert_eq!(index.get(7), Some((7.84, 47.99)));
        assert_eq!(index.get(50), Some((5.0, 50.5)));
        assert_eq!(index.get(1000), Some((-122.4, 37.8)));
        assert_eq!(index.get(8), None);
        assert_eq!(index.get(999), None);
        assert_eq!(index.get(100_000), None);
    }

    #[test]
    fn in_memory_round_trip() {
        let mut b = LocationIndexBuilder::in_memory();
        populate(&mut b);
        check(&b.freeze().unwrap());
    }

    #[test]
    fn dense_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = LocationIndexBuilder::dense(dir.path()).unwrap();
        populate(&mut b);
        check(&b.freeze().unwrap());
    }

    #[test]
    fn sparse_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = LocationIndexBuilder::sparse(dir.path()).unwrap();
        populate(&mut b);
        check(&b.freeze().unwrap());
    }

    #[test]
    fn sparse_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = LocationIndexBuilder::sparse(dir.path()).unwrap();
        b.insert(1, 1.0, 1.0).unwrap();
        b.insert(1, 2.0, 2.0).unwrap();
        let index = b.freeze().unwrap();
        // dedup keeps a single record for the id
        assert!(index.get(1).is_some());
    }
}
