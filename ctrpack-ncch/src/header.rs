//! NCCH header decoding.
//!
//! The header is a flat 0x200-byte record at the start of the package:
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x000 | 0x100 | RSA signature (first 16 bytes double as KeyY) |
//! | 0x100 | 4 | magic `NCCH` |
//! | 0x104 | 4 | content size (media units) |
//! | 0x108 | 8 | partition ID |
//! | 0x110 | 2 | maker code |
//! | 0x112 | 2 | version |
//! | 0x114 | 4 | seed check word |
//! | 0x118 | 8 | program ID |
//! | 0x130 | 0x20 | logo region hash |
//! | 0x150 | 0x10 | product code |
//! | 0x160 | 0x20 | extended header hash |
//! | 0x180 | 4 | extended header size (bytes) |
//! | 0x188 | 8 | flags (crypt method, platform, type, unit size, bitmask) |
//! | 0x190 | 0x30 | region offsets / sizes (media units) |
//! | 0x1C0 | 0x20 | ExeFS hashed-prefix hash |
//! | 0x1E0 | 0x20 | RomFS hashed-prefix hash |

use std::io::{Read, Seek, SeekFrom};

use ctrpack_core::util::{read_array, read_ascii, read_u16_le, read_u32_le, read_u64_le};
use ctrpack_core::{ContentPlatform, CryptMethod, Key128, MEDIA_UNIT, NcchError, ReadSeek, Result};

/// NCCH magic at offset 0x100: "NCCH".
pub const NCCH_MAGIC: [u8; 4] = *b"NCCH";

/// Size of the fixed header record.
pub const NCCH_HEADER_SIZE: usize = 0x200;

const MAGIC_OFFSET: usize = 0x100;
const FLAGS_OFFSET: usize = 0x188;

// ---------------------------------------------------------------------------
// Flag bytes
// ---------------------------------------------------------------------------

/// Bitmask stored in flags[7].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NcchFlags(pub u8);

impl NcchFlags {
    /// Content is encrypted with a fixed normal key instead of KeyX/KeyY.
    pub const FIXED_KEY: u8 = 0x01;
    /// No RomFS is present.
    pub const NO_ROMFS: u8 = 0x02;
    /// Content is not encrypted.
    pub const NO_CRYPTO: u8 = 0x04;
    /// KeyY is derived from a per-title seed.
    pub const USES_SEED: u8 = 0x20;

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    pub fn fixed_key(&self) -> bool {
        self.contains(Self::FIXED_KEY)
    }

    pub fn no_romfs(&self) -> bool {
        self.contains(Self::NO_ROMFS)
    }

    pub fn no_crypto(&self) -> bool {
        self.contains(Self::NO_CRYPTO)
    }

    pub fn uses_seed(&self) -> bool {
        self.contains(Self::USES_SEED)
    }
}

/// Content type bitmask stored in flags[5].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentType(pub u8);

impl ContentType {
    /// Set in CFAs.
    pub const DATA: u8 = 0x01;
    /// Set in CXIs.
    pub const EXECUTABLE: u8 = 0x02;
    pub const SYSTEM_UPDATE: u8 = 0x04;
    pub const MANUAL: u8 = 0x08;
    pub const TRIAL: u8 = 0x10;

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, mask: u8) -> bool {
        self.0 & mask == mask
    }

    pub fn is_executable(&self) -> bool {
        self.contains(Self::EXECUTABLE)
    }

    pub fn description(&self) -> &'static str {
        if self.contains(Self::SYSTEM_UPDATE) {
            "System update"
        } else if self.contains(Self::MANUAL) {
            "Manual"
        } else if self.contains(Self::TRIAL) {
            "Trial"
        } else if self.is_executable() {
            "Executable"
        } else if self.contains(Self::DATA) {
            "Data"
        } else {
            "Unknown"
        }
    }
}

// ---------------------------------------------------------------------------
// NCCH header
// ---------------------------------------------------------------------------

/// Decoded NCCH header. Offsets and sizes named `*_mu` are in media units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NcchHeader {
    /// Raw KeyY. When [`NcchFlags::USES_SEED`] is set the effective KeyY is
    /// derived from this and the title's seed.
    pub key_y: Key128,
    pub content_size_mu: u32,
    pub partition_id: u64,
    pub maker_code: String,
    pub version: u16,
    /// First 32-bit word of SHA-256(seed ‖ program ID), little-endian.
    pub seed_check: u32,
    pub program_id: u64,
    pub logo_hash: [u8; 32],
    pub product_code: String,
    pub exheader_hash: [u8; 32],
    /// Extended header size in bytes, not media units.
    pub exheader_size: u32,
    /// Raw crypt method byte; see [`NcchHeader::crypt_method`].
    pub crypt_method: u8,
    /// Raw platform byte; see [`NcchHeader::platform`].
    pub platform: u8,
    pub content_type: ContentType,
    /// Content unit size in bytes (0x200 << flags[6]); 0 if it overflows.
    pub content_unit_size: u32,
    pub flags: NcchFlags,
    pub plain_offset_mu: u32,
    pub plain_size_mu: u32,
    pub logo_offset_mu: u32,
    pub logo_size_mu: u32,
    pub exefs_offset_mu: u32,
    pub exefs_size_mu: u32,
    pub exefs_hash_size_mu: u32,
    pub romfs_offset_mu: u32,
    pub romfs_size_mu: u32,
    pub romfs_hash_size_mu: u32,
    pub exefs_hash: [u8; 32],
    pub romfs_hash: [u8; 32],
}

impl NcchHeader {
    /// Decode a header from its raw 0x200-byte record.
    ///
    /// Only the magic is validated; region consistency is checked when a
    /// region is located.
    pub fn parse(buf: &[u8; NCCH_HEADER_SIZE]) -> Result<Self> {
        if buf[MAGIC_OFFSET..MAGIC_OFFSET + 4] != NCCH_MAGIC {
            return Err(NcchError::corrupt("missing NCCH magic at 0x100"));
        }

        let flags = &buf[FLAGS_OFFSET..FLAGS_OFFSET + 8];
        let content_unit_size = (MEDIA_UNIT as u32)
            .checked_shl(flags[6] as u32)
            .filter(|size| size >> flags[6] == MEDIA_UNIT as u32)
            .unwrap_or(0);

        Ok(Self {
            key_y: read_array(buf, 0x000),
            content_size_mu: read_u32_le(buf, 0x104),
            partition_id: read_u64_le(buf, 0x108),
            maker_code: read_ascii(&buf[0x110..0x112]),
            version: read_u16_le(buf, 0x112),
            seed_check: read_u32_le(buf, 0x114),
            program_id: read_u64_le(buf, 0x118),
            logo_hash: read_array(buf, 0x130),
            product_code: read_ascii(&buf[0x150..0x160]),
            exheader_hash: read_array(buf, 0x160),
            exheader_size: read_u32_le(buf, 0x180),
            crypt_method: flags[3],
            platform: flags[4],
            content_type: ContentType(flags[5]),
            content_unit_size,
            flags: NcchFlags(flags[7]),
            plain_offset_mu: read_u32_le(buf, 0x190),
            plain_size_mu: read_u32_le(buf, 0x194),
            logo_offset_mu: read_u32_le(buf, 0x198),
            logo_size_mu: read_u32_le(buf, 0x19C),
            exefs_offset_mu: read_u32_le(buf, 0x1A0),
            exefs_size_mu: read_u32_le(buf, 0x1A4),
            exefs_hash_size_mu: read_u32_le(buf, 0x1A8),
            romfs_offset_mu: read_u32_le(buf, 0x1B0),
            romfs_size_mu: read_u32_le(buf, 0x1B4),
            romfs_hash_size_mu: read_u32_le(buf, 0x1B8),
            exefs_hash: read_array(buf, 0x1C0),
            romfs_hash: read_array(buf, 0x1E0),
        })
    }

    /// Typed crypt method, or `UnsupportedCryptMethod`.
    pub fn crypt_method(&self) -> Result<CryptMethod> {
        CryptMethod::try_from(self.crypt_method)
    }

    /// Typed content platform, or `UnsupportedPlatform`.
    pub fn platform(&self) -> Result<ContentPlatform> {
        ContentPlatform::try_from(self.platform)
    }

    pub fn content_size_bytes(&self) -> u64 {
        self.content_size_mu as u64 * MEDIA_UNIT
    }

    /// System titles have bit 4 set in the title ID category.
    pub fn is_system_title(&self) -> bool {
        (self.program_id >> 32) & 0x10 != 0
    }
}

/// Read and decode the NCCH header at the start of `reader`.
pub fn read_ncch_header(reader: &mut dyn ReadSeek) -> Result<NcchHeader> {
    reader.seek(SeekFrom::Start(0))?;
    let mut buf = [0u8; NCCH_HEADER_SIZE];
    reader
        .read_exact(&mut buf)
        .map_err(|e| NcchError::from_short_read(e, "NCCH header"))?;

    let header = NcchHeader::parse(&buf)?;
    log::debug!(
        "NCCH header: partition {:016X}, program {:016X}, crypt method 0x{:02X}, flags 0x{:02X}",
        header.partition_id,
        header.program_id,
        header.crypt_method,
        header.flags.bits()
    );
    Ok(header)
}

#[cfg(test)]
#[path = "tests/header_tests.rs"]
mod tests;
