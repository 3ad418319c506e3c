//! Key and IV derivation.
//!
//! Every encrypted NCCH uses two working keys:
//!
//! - **primary**: KeyX of the initial crypt method + the header KeyY. Used
//!   for the extended header, the ExeFS header and every ExeFS file except
//!   `.code`.
//! - **secondary**: KeyX of the header's crypt method + the effective KeyY
//!   (seeded if [`NcchFlags::USES_SEED`](crate::header::NcchFlags) is set).
//!   Used for RomFS and `.code`.
//!
//! Fixed-key content skips the scrambler: system titles use the keystore's
//! fixed system key, everything else the all-zero key.

use ctrpack_core::util::format_title_id;
use ctrpack_core::{CryptMethod, Key128, NcchError, Result};
use ctrpack_crypto::{Keystore, scrambler_for};
use sha2::{Digest, Sha256};

use crate::header::NcchHeader;

/// Key used by non-system fixed-key content.
pub const ZERO_KEY: Key128 = [0u8; 16];

// ---------------------------------------------------------------------------
// Working keys
// ---------------------------------------------------------------------------

/// Working keys for one package.
#[derive(Clone, PartialEq, Eq)]
pub enum NcchKeys {
    /// The package declares itself unencrypted; sections are passed through.
    NoCrypto,
    Keyed { primary: Key128, secondary: Key128 },
}

impl NcchKeys {
    /// Derive the working keys for `header`.
    ///
    /// The keystore is consulted only as far as the header's flags require:
    /// not at all for unencrypted content, only for the fixed system key in
    /// fixed-key mode, and for KeyX (plus the seed, if used) otherwise.
    pub fn derive<K: Keystore + ?Sized>(header: &NcchHeader, keystore: &K) -> Result<Self> {
        if header.flags.no_crypto() {
            log::debug!("partition {}: no crypto", format_title_id(header.partition_id));
            return Ok(Self::NoCrypto);
        }

        if header.flags.fixed_key() {
            let key = if header.is_system_title() {
                keystore
                    .fixed_system_key()
                    .ok_or_else(|| NcchError::key_missing("fixed system key"))?
            } else {
                ZERO_KEY
            };
            log::debug!(
                "partition {}: fixed key ({})",
                format_title_id(header.partition_id),
                if header.is_system_title() { "system" } else { "zero" }
            );
            return Ok(Self::Keyed {
                primary: key,
                secondary: key,
            });
        }

        let method = header.crypt_method()?;
        let platform = header.platform()?;

        let primary_x = keystore
            .key_x(CryptMethod::Initial, platform)
            .ok_or_else(|| {
                NcchError::key_missing(format!("KeyX for {} on {platform}", CryptMethod::Initial))
            })?;
        let secondary_x = keystore
            .key_x(method, platform)
            .ok_or_else(|| NcchError::key_missing(format!("KeyX for {method} on {platform}")))?;
        let key_y = effective_key_y(header, keystore)?;

        log::debug!(
            "partition {}: {method} on {platform}{}",
            format_title_id(header.partition_id),
            if header.flags.uses_seed() { ", seeded" } else { "" }
        );
        Ok(Self::Keyed {
            primary: scrambler_for(CryptMethod::Initial).scramble(&primary_x, &header.key_y),
            secondary: scrambler_for(method).scramble(&secondary_x, &key_y),
        })
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Keyed { .. })
    }

    pub fn primary(&self) -> Option<&Key128> {
        match self {
            Self::NoCrypto => None,
            Self::Keyed { primary, .. } => Some(primary),
        }
    }

    pub fn secondary(&self) -> Option<&Key128> {
        match self {
            Self::NoCrypto => None,
            Self::Keyed { secondary, .. } => Some(secondary),
        }
    }
}

impl std::fmt::Debug for NcchKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCrypto => f.write_str("NoCrypto"),
            Self::Keyed { .. } => f.write_str("Keyed { .. }"),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyY / seeds
// ---------------------------------------------------------------------------

/// KeyY that feeds the secondary key.
pub fn effective_key_y<K: Keystore + ?Sized>(header: &NcchHeader, keystore: &K) -> Result<Key128> {
    if !header.flags.uses_seed() {
        return Ok(header.key_y);
    }

    let seed = keystore
        .seed(header.program_id, header.seed_check)
        .ok_or(NcchError::SeedMissing(header.program_id))?;
    if seed_check_word(&seed, header.program_id) != header.seed_check {
        return Err(NcchError::SeedMismatch(header.program_id));
    }
    Ok(seeded_key_y(&header.key_y, &seed))
}

/// SHA-256(KeyY ‖ seed), truncated to 128 bits.
pub fn seeded_key_y(key_y: &Key128, seed: &Key128) -> Key128 {
    let mut hasher = Sha256::new();
    hasher.update(key_y);
    hasher.update(seed);
    let digest = hasher.finalize();

    let mut out = [0u8; 16];
    out.copy_from_slice(&digest[..16]);
    out
}

/// First word of SHA-256(seed ‖ program ID LE), as stored in the header.
pub fn seed_check_word(seed: &Key128, program_id: u64) -> u32 {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(program_id.to_le_bytes());
    let digest = hasher.finalize();
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Encrypted section an IV is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    ExHeader,
    ExeFs,
    RomFs,
}

impl SectionKind {
    /// Byte following the partition ID in the counter.
    pub fn iv_tag(&self) -> u8 {
        match self {
            Self::ExHeader => 0x01,
            Self::ExeFs => 0x02,
            Self::RomFs => 0x03,
        }
    }
}

/// Initial counter for a whole section: partition ID (BE) ‖ tag ‖ zeros.
pub fn section_iv(header: &NcchHeader, kind: SectionKind) -> [u8; 16] {
    let mut iv = [0u8; 16];
    iv[..8].copy_from_slice(&header.partition_id.to_be_bytes());
    iv[8] = kind.iv_tag();
    iv
}

/// Counter for data starting `offset` bytes into the ExeFS region.
///
/// The last four bytes hold the block index (`offset / 16`, BE). The
/// remaining `offset % 16` is returned alongside so the caller can start
/// mid-block.
pub fn exefs_file_iv(header: &NcchHeader, offset: u64) -> Result<([u8; 16], u64)> {
    let blocks = u32::try_from(offset / 0x10)
        .map_err(|_| NcchError::corrupt(format!("ExeFS offset 0x{offset:X} out of range")))?;
    let mut iv = section_iv(header, SectionKind::ExeFs);
    iv[12..].copy_from_slice(&blocks.to_be_bytes());
    Ok((iv, offset % 0x10))
}

#[cfg(test)]
#[path = "tests/keys_tests.rs"]
mod tests;
