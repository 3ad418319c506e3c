//! Section streams.
//!
//! Each accessor locates its region, picks the working key and counter for
//! it, and hands back a [`SectionStream`] that reads and seeks like any other
//! stream while decrypting on demand.
//!
//! The package stream is taken by value; pass `&mut file` (or `&file`) to
//! keep ownership. Streams re-seek the package stream before every read, so
//! several of them may be opened over one handle, but reading them from
//! different threads is only sound if the handle itself supports that.

use std::io::{self, Read, Seek, SeekFrom};

use ctrpack_core::{Key128, Result, SubView};
use ctrpack_crypto::{AesCtr, CtrReader};

use crate::exefs::ExefsFileHeader;
use crate::header::NcchHeader;
use crate::keys::{NcchKeys, SectionKind, exefs_file_iv, section_iv};
use crate::region::{Region, Section, locate, locate_exefs_file};

/// A readable, seekable view of one package region.
#[derive(Debug)]
pub enum SectionStream<R> {
    /// AES-CTR encrypted region, decrypted per read.
    Encrypted(CtrReader<SubView<R>>),
    /// Unencrypted region, passed through untouched.
    Plain(SubView<R>),
}

impl<R> SectionStream<R> {
    /// Length of the region in bytes.
    pub fn len(&self) -> u64 {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute offset of the region within the package stream.
    pub fn offset(&self) -> u64 {
        self.view().start()
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }

    /// Give back the package stream.
    pub fn into_inner(self) -> R {
        match self {
            Self::Encrypted(reader) => reader.into_inner().into_inner(),
            Self::Plain(view) => view.into_inner(),
        }
    }

    fn view(&self) -> &SubView<R> {
        match self {
            Self::Encrypted(reader) => reader.get_ref(),
            Self::Plain(view) => view,
        }
    }
}

impl<R: Read + Seek> Read for SectionStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Encrypted(reader) => reader.read(buf),
            Self::Plain(view) => view.read(buf),
        }
    }
}

impl<R: Read + Seek> Seek for SectionStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Encrypted(reader) => reader.seek(pos),
            Self::Plain(view) => view.seek(pos),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Key, counter and keystream offset for one encrypted region.
struct RegionCipher<'a> {
    key: &'a Key128,
    iv: [u8; 16],
    keystream_offset: u64,
}

fn open_region<R>(reader: R, region: Region, cipher: Option<RegionCipher<'_>>) -> Result<SectionStream<R>> {
    let view = SubView::new(reader, region.offset, region.size);
    let stream = match cipher {
        Some(c) => {
            let ctr = AesCtr::new(c.key, &c.iv)?;
            SectionStream::Encrypted(CtrReader::with_offset(view, ctr, c.keystream_offset))
        }
        None => SectionStream::Plain(view),
    };
    log::debug!(
        "opened {:?} at 0x{:X}, 0x{:X} bytes{}",
        region.kind,
        region.offset,
        region.size,
        if stream.is_encrypted() { ", encrypted" } else { "" }
    );
    Ok(stream)
}

fn whole_section_cipher<'a>(
    header: &NcchHeader,
    key: Option<&'a Key128>,
    kind: SectionKind,
) -> Option<RegionCipher<'a>> {
    key.map(|key| RegionCipher {
        key,
        iv: section_iv(header, kind),
        keystream_offset: 0,
    })
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

/// Open the extended header.
///
/// `NotFound` if absent, `CorruptData` if its size is not 0x400.
pub fn open_exheader<R: Read + Seek>(
    header: &NcchHeader,
    reader: R,
    keys: &NcchKeys,
) -> Result<SectionStream<R>> {
    let region = locate(header, Section::ExHeader)?;
    let cipher = whole_section_cipher(header, keys.primary(), SectionKind::ExHeader);
    open_region(reader, region, cipher)
}

/// Open the whole ExeFS region, header included.
///
/// Everything is decrypted with the primary key, which is right for the
/// ExeFS header and all files but `.code`. Open individual files with
/// [`open_exefs_file`].
pub fn open_exefs_header<R: Read + Seek>(
    header: &NcchHeader,
    reader: R,
    keys: &NcchKeys,
) -> Result<SectionStream<R>> {
    let region = locate(header, Section::ExeFs)?;
    let cipher = whole_section_cipher(header, keys.primary(), SectionKind::ExeFs);
    open_region(reader, region, cipher)
}

/// Open the RomFS.
pub fn open_romfs<R: Read + Seek>(
    header: &NcchHeader,
    reader: R,
    keys: &NcchKeys,
) -> Result<SectionStream<R>> {
    let region = locate(header, Section::RomFs)?;
    let cipher = whole_section_cipher(header, keys.secondary(), SectionKind::RomFs);
    open_region(reader, region, cipher)
}

/// Open one ExeFS file, resuming the ExeFS counter at the file's offset.
pub fn open_exefs_file<R: Read + Seek>(
    header: &NcchHeader,
    reader: R,
    keys: &NcchKeys,
    file: &ExefsFileHeader,
) -> Result<SectionStream<R>> {
    let region = locate_exefs_file(header, file)?;
    let key = if file.is_code() {
        keys.secondary()
    } else {
        keys.primary()
    };
    let cipher = match key {
        Some(key) => {
            let (iv, keystream_offset) = exefs_file_iv(header, file.offset_in_exefs())?;
            Some(RegionCipher {
                key,
                iv,
                keystream_offset,
            })
        }
        None => None,
    };
    open_region(reader, region, cipher)
}

/// Open the plain region. It is never encrypted.
pub fn open_plain_region<R: Read + Seek>(header: &NcchHeader, reader: R) -> Result<SectionStream<R>> {
    open_region(reader, locate(header, Section::Plain)?, None)
}

/// Open the logo region. It is never encrypted.
pub fn open_logo<R: Read + Seek>(header: &NcchHeader, reader: R) -> Result<SectionStream<R>> {
    open_region(reader, locate(header, Section::Logo)?, None)
}

#[cfg(test)]
#[path = "tests/section_tests.rs"]
mod tests;
