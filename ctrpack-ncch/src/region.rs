//! Region location: media-unit fields → absolute byte ranges.

use ctrpack_core::{NcchError, Result, media_units_to_bytes};

use crate::exefs::ExefsFileHeader;
use crate::header::{NCCH_HEADER_SIZE, NcchHeader};

/// The extended header immediately follows the NCCH header.
pub const EXHEADER_OFFSET: u64 = NCCH_HEADER_SIZE as u64;

/// The only extended-header size this crate can open.
pub const EXHEADER_SIZE: u32 = 0x400;

/// Top-level sections addressable from the header alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    ExHeader,
    ExeFs,
    RomFs,
    Plain,
    Logo,
}

impl Section {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExHeader => "extended header",
            Self::ExeFs => "ExeFS",
            Self::RomFs => "RomFS",
            Self::Plain => "plain region",
            Self::Logo => "logo region",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Section(Section),
    ExeFsFile,
}

/// A located byte range within the package stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub offset: u64,
    pub size: u64,
}

impl Region {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// Locate a top-level section.
///
/// Returns `NotFound` when the header says the section is absent, and
/// `CorruptData` when it is present but cannot be valid.
pub fn locate(header: &NcchHeader, section: Section) -> Result<Region> {
    let (offset, size) = match section {
        Section::ExHeader => {
            if header.exheader_size == 0 {
                return Err(NcchError::not_found("no extended header"));
            }
            if header.exheader_size != EXHEADER_SIZE {
                return Err(NcchError::corrupt(format!(
                    "extended header size 0x{:X}, expected 0x{:X}",
                    header.exheader_size, EXHEADER_SIZE
                )));
            }
            (EXHEADER_OFFSET, EXHEADER_SIZE as u64)
        }
        Section::ExeFs => mu_range(section, header.exefs_offset_mu, header.exefs_size_mu)?,
        Section::RomFs => mu_range(section, header.romfs_offset_mu, header.romfs_size_mu)?,
        Section::Plain => mu_range(section, header.plain_offset_mu, header.plain_size_mu)?,
        Section::Logo => mu_range(section, header.logo_offset_mu, header.logo_size_mu)?,
    };

    let region = Region {
        kind: RegionKind::Section(section),
        offset,
        size,
    };
    check_within_content(header, &region, section.name())?;
    Ok(region)
}

/// Locate a file inside the ExeFS region.
///
/// The file header comes from the ExeFS file table, so presence is not
/// checked; the file must still lie inside the ExeFS region.
pub fn locate_exefs_file(header: &NcchHeader, file: &ExefsFileHeader) -> Result<Region> {
    let exefs_start = media_units_to_bytes(header.exefs_offset_mu);
    let exefs_size = media_units_to_bytes(header.exefs_size_mu);

    let start_in_exefs = file.offset_in_exefs();
    if start_in_exefs + file.size as u64 > exefs_size {
        return Err(NcchError::corrupt(format!(
            "ExeFS file '{}' (0x{:X}+0x{:X}) extends past the ExeFS region (0x{:X})",
            file.name, start_in_exefs, file.size, exefs_size
        )));
    }

    let region = Region {
        kind: RegionKind::ExeFsFile,
        offset: exefs_start + start_in_exefs,
        size: file.size as u64,
    };
    check_within_content(header, &region, "ExeFS file")?;
    Ok(region)
}

/// Both the offset and the size must be nonzero for a region to exist.
fn mu_range(section: Section, offset_mu: u32, size_mu: u32) -> Result<(u64, u64)> {
    if offset_mu == 0 || size_mu == 0 {
        return Err(NcchError::not_found(format!("no {}", section.name())));
    }
    Ok((media_units_to_bytes(offset_mu), media_units_to_bytes(size_mu)))
}

fn check_within_content(header: &NcchHeader, region: &Region, what: &str) -> Result<()> {
    let content_size = header.content_size_bytes();
    if region.end() > content_size {
        return Err(NcchError::corrupt(format!(
            "{what} (0x{:X}..0x{:X}) extends past the content size 0x{:X}",
            region.offset,
            region.end(),
            content_size
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/region_tests.rs"]
mod tests;
