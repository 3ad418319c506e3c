//! `seeddb.bin` seed database.
//!
//! Layout:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 4 | entry count (LE) |
//! | 0x04 | 12 | padding |
//! | 0x10 + n*0x20 | 8 | title ID (LE) |
//! | +0x08 | 16 | seed |
//! | +0x18 | 8 | padding |

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use ctrpack_core::util::{read_array, read_u32_le, read_u64_le};
use ctrpack_core::{Key128, NcchError, Result};

const SEEDDB_HEADER_SIZE: usize = 0x10;
const SEEDDB_ENTRY_SIZE: usize = 0x20;

/// Seeds keyed by title ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedDb {
    seeds: HashMap<u64, Key128>,
}

impl SeedDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a seed database from a reader.
    pub fn read<R: Read>(mut reader: R) -> Result<Self> {
        let mut header = [0u8; SEEDDB_HEADER_SIZE];
        reader
            .read_exact(&mut header)
            .map_err(|e| NcchError::from_short_read(e, "seeddb header"))?;
        let count = read_u32_le(&header, 0);

        let mut db = Self::new();
        let mut entry = [0u8; SEEDDB_ENTRY_SIZE];
        for _ in 0..count {
            reader
                .read_exact(&mut entry)
                .map_err(|e| NcchError::from_short_read(e, "seeddb entry"))?;
            let title_id = read_u64_le(&entry, 0x00);
            let seed: Key128 = read_array(&entry, 0x08);
            if db.seeds.insert(title_id, seed).is_some() {
                log::warn!("seeddb: duplicate entry for title {title_id:016X}, keeping the later one");
            }
        }
        log::debug!("seeddb: loaded {} seeds", db.len());
        Ok(db)
    }

    /// Open and parse a seed database file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::read(std::io::BufReader::new(file))
    }

    pub fn get(&self, title_id: u64) -> Option<&Key128> {
        self.seeds.get(&title_id)
    }

    /// Insert a seed, returning the one it replaced.
    pub fn insert(&mut self, title_id: u64, seed: Key128) -> Option<Key128> {
        self.seeds.insert(title_id, seed)
    }

    /// Take every seed from `other`; entries already present are kept.
    pub fn merge(&mut self, other: SeedDb) {
        for (title_id, seed) in other.seeds {
            self.seeds.entry(title_id).or_insert(seed);
        }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/seeddb_tests.rs"]
mod tests;
