//! SHA-256 verification of decrypted sections against the header hashes.

use std::io::{Read, Seek, SeekFrom};

use ctrpack_core::util::{hex_string, is_all_zeros};
use ctrpack_core::{NcchError, Result, media_units_to_bytes};
use sha2::{Digest, Sha256};

use crate::header::NcchHeader;
use crate::region::EXHEADER_SIZE;
use crate::section::SectionStream;

/// Outcome of a hash check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashResult {
    /// Hash matches.
    Ok,
    /// Hash does not match.
    Mismatch { expected: String, actual: String },
    /// Nothing to check: zero-length prefix or an all-zero stored hash.
    Empty,
}

impl HashResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Check the extended header stream against `exheader_hash`.
pub fn verify_exheader<R: Read + Seek>(
    header: &NcchHeader,
    stream: &mut SectionStream<R>,
) -> Result<HashResult> {
    verify_prefix(stream, EXHEADER_SIZE as u64, &header.exheader_hash)
}

/// Check the ExeFS hashed prefix against `exefs_hash`.
pub fn verify_exefs<R: Read + Seek>(
    header: &NcchHeader,
    stream: &mut SectionStream<R>,
) -> Result<HashResult> {
    verify_prefix(
        stream,
        media_units_to_bytes(header.exefs_hash_size_mu),
        &header.exefs_hash,
    )
}

/// Check the RomFS hashed prefix against `romfs_hash`.
pub fn verify_romfs<R: Read + Seek>(
    header: &NcchHeader,
    stream: &mut SectionStream<R>,
) -> Result<HashResult> {
    verify_prefix(
        stream,
        media_units_to_bytes(header.romfs_hash_size_mu),
        &header.romfs_hash,
    )
}

/// Hash the first `size` bytes of `stream`, leaving it positioned at the start.
fn verify_prefix<R: Read + Seek>(
    stream: &mut SectionStream<R>,
    size: u64,
    expected: &[u8; 32],
) -> Result<HashResult> {
    if size == 0 || is_all_zeros(expected) {
        return Ok(HashResult::Empty);
    }
    if size > stream.len() {
        return Err(NcchError::corrupt(format!(
            "hashed prefix 0x{:X} is larger than its section (0x{:X})",
            size,
            stream.len()
        )));
    }

    stream.seek(SeekFrom::Start(0))?;
    let mut hasher = Sha256::new();
    let mut remaining = size;
    let mut buf = vec![0u8; 0x10000]; // 64 KB read buffer

    while remaining > 0 {
        let to_read = remaining.min(buf.len() as u64) as usize;
        stream
            .read_exact(&mut buf[..to_read])
            .map_err(|e| NcchError::from_short_read(e, "hashed section data"))?;
        hasher.update(&buf[..to_read]);
        remaining -= to_read as u64;
    }
    stream.seek(SeekFrom::Start(0))?;

    let actual = hasher.finalize();
    if actual.as_slice() == expected {
        Ok(HashResult::Ok)
    } else {
        Ok(HashResult::Mismatch {
            expected: hex_string(expected),
            actual: hex_string(actual.as_slice()),
        })
    }
}

#[cfg(test)]
#[path = "tests/verify_tests.rs"]
mod tests;
