//! NCCH container access for Nintendo 3DS packages.
//!
//! Decodes the NCCH header and opens the extended header, ExeFS and RomFS
//! as seekable streams that decrypt on demand. Callers never see ciphertext
//! or key material:
//!
//! ```no_run
//! use std::fs::File;
//! use ctrpack_crypto::settings::load_key_table;
//! use ctrpack_ncch::{NcchKeys, open_romfs, read_ncch_header};
//!
//! # fn main() -> ctrpack_core::Result<()> {
//! let mut file = File::open("game.cxi")?;
//! let header = read_ncch_header(&mut file)?;
//! let keys = NcchKeys::derive(&header, &load_key_table(None)?)?;
//! let romfs = open_romfs(&header, &mut file, &keys)?;
//! println!("RomFS: {} bytes", romfs.len());
//! # Ok(())
//! # }
//! ```
//!
//! Parsing what is inside the ExeFS and RomFS is left to their own readers;
//! this crate only produces the streams they consume.

pub mod exefs;
pub mod header;
pub mod keys;
pub mod region;
pub mod section;
pub mod verify;

pub use exefs::ExefsFileHeader;
pub use header::{ContentType, NcchFlags, NcchHeader, read_ncch_header};
pub use keys::{NcchKeys, SectionKind};
pub use region::{Region, RegionKind, Section};
pub use section::{
    SectionStream, open_exefs_file, open_exefs_header, open_exheader, open_logo,
    open_plain_region, open_romfs,
};
pub use verify::HashResult;

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;
