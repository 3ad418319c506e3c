//! Seekable AES-128-CTR.
//!
//! The counter is a 128-bit big-endian integer: block `n` of the keystream is
//! `AES(key, iv + n)`. Any byte offset maps straight to a keystream position,
//! so a reader can jump anywhere without replaying the keystream from zero.

use std::io::{self, Read, Seek, SeekFrom};

use aes::Aes128;
use aes::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use ctr::Ctr128BE;
use ctrpack_core::{NcchError, Result};

type Aes128Ctr = Ctr128BE<Aes128>;

/// AES-128-CTR keystream addressed by byte offset.
pub struct AesCtr {
    cipher: Aes128Ctr,
}

impl AesCtr {
    /// Build a context from a key and the initial counter block.
    pub fn new(key: &[u8], iv: &[u8; 16]) -> Result<Self> {
        let cipher = Aes128Ctr::new_from_slices(key, iv)
            .map_err(|e| NcchError::CipherConstructionFailed(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// XOR the keystream starting at byte `offset` into `data`.
    ///
    /// Encryption and decryption are the same operation.
    pub fn apply_keystream(&mut self, offset: u64, data: &mut [u8]) -> io::Result<()> {
        self.cipher
            .try_seek(offset)
            .and_then(|()| self.cipher.try_apply_keystream(data))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))
    }
}

impl std::fmt::Debug for AesCtr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesCtr").finish_non_exhaustive()
    }
}

/// A reader that decrypts an AES-CTR encrypted stream on the fly.
///
/// Position `p` of the inner stream is decrypted with the keystream at
/// `base + p`, so `inner` must report position 0 at the first byte the
/// counter covers (a [`SubView`](ctrpack_core::SubView) over the encrypted
/// range does).
#[derive(Debug)]
pub struct CtrReader<R> {
    inner: R,
    ctr: AesCtr,
    base: u64,
    pos: u64,
}

impl<R> CtrReader<R> {
    pub fn new(inner: R, ctr: AesCtr) -> Self {
        Self::with_offset(inner, ctr, 0)
    }

    /// Start `base` bytes into the keystream, for data that begins mid-block.
    pub fn with_offset(inner: R, ctr: AesCtr, base: u64) -> Self {
        Self {
            inner,
            ctr,
            base,
            pos: 0,
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for CtrReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 {
            return Ok(0);
        }
        let offset = self.base.checked_add(self.pos).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "keystream offset out of range")
        })?;
        self.ctr.apply_keystream(offset, &mut buf[..n])?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<R: Seek> Seek for CtrReader<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.pos = self.inner.seek(pos)?;
        Ok(self.pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }
}

#[cfg(test)]
#[path = "tests/counter_tests.rs"]
mod tests;
