//! Shared building blocks for reading 3DS content packages.
//!
//! This crate holds the pieces every other `ctrpack` crate leans on: the
//! error taxonomy, the bounded [`SubView`] stream, little-endian field
//! readers, and the small enums that select key material.

use std::io::{Read, Seek};

pub mod error;
pub mod platform;
pub mod stream;
pub mod util;

pub use error::{NcchError, Result};
pub use platform::{ContentPlatform, CryptMethod, CryptMethodParseError};
pub use stream::SubView;

/// 1 media unit = 0x200 bytes (512 bytes).
pub const MEDIA_UNIT: u64 = 0x200;

/// Convert a media-unit count into bytes.
pub fn media_units_to_bytes(units: u32) -> u64 {
    units as u64 * MEDIA_UNIT
}

/// A 128-bit AES key or key half (KeyX, KeyY, seed, normal key).
pub type Key128 = [u8; 16];

/// A reader that implements both Read and Seek.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}
