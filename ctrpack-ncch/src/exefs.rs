//! ExeFS file headers as handed over by an ExeFS directory parser.

/// Size of the ExeFS header (file table + hashes) at the start of the region.
pub const EXEFS_HEADER_SIZE: u64 = 0x200;

/// Name of the ExeFS file holding program code.
pub const CODE_FILE_NAME: &str = ".code";

/// One entry of the ExeFS file table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExefsFileHeader {
    /// File name, at most 8 characters.
    pub name: String,
    /// Offset relative to the end of the ExeFS header.
    pub offset: u32,
    pub size: u32,
}

impl ExefsFileHeader {
    pub fn new(name: impl Into<String>, offset: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
        }
    }

    /// `.code` is encrypted with the secondary key, everything else with
    /// the primary key.
    pub fn is_code(&self) -> bool {
        self.name == CODE_FILE_NAME
    }

    /// Offset of the file's first byte from the start of the ExeFS region.
    pub fn offset_in_exefs(&self) -> u64 {
        EXEFS_HEADER_SIZE + self.offset as u64
    }
}
