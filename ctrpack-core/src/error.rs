use thiserror::Error;

/// Errors produced while decoding a package or opening one of its sections.
#[derive(Debug, Error)]
pub enum NcchError {
    /// I/O error while reading the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad magic, truncated header, or a layout that contradicts itself
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// The requested region is not present in this package
    #[error("Not found: {0}")]
    NotFound(String),

    /// Crypt method byte is not one of the known values
    #[error("Unsupported crypt method: 0x{0:02X}")]
    UnsupportedCryptMethod(u8),

    /// Content platform byte is not one of the known values
    #[error("Unsupported content platform: 0x{0:02X}")]
    UnsupportedPlatform(u8),

    /// The keystore has no key for the requested crypt method / platform
    #[error("Key material missing: {0}")]
    KeyMaterialMissing(String),

    /// The keystore has no seed for this title
    #[error("No seed available for title {0:016X}")]
    SeedMissing(u64),

    /// A seed was supplied but it does not match the header's check word
    #[error("Seed for title {0:016X} does not match the header seed check")]
    SeedMismatch(u64),

    /// The block cipher rejected the key material
    #[error("Cipher construction failed: {0}")]
    CipherConstructionFailed(String),

    /// Key configuration could not be parsed
    #[error("Invalid key configuration: {0}")]
    InvalidKeyConfig(String),
}

impl NcchError {
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::CorruptData(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn key_missing(msg: impl Into<String>) -> Self {
        Self::KeyMaterialMissing(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidKeyConfig(msg.into())
    }

    /// Map an I/O error from a fixed-size read, reporting short reads as corruption.
    pub fn from_short_read(e: std::io::Error, what: &str) -> Self {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::corrupt(format!("{what} truncated"))
        } else {
            Self::Io(e)
        }
    }
}

/// Result alias used across the `ctrpack` crates.
pub type Result<T> = std::result::Result<T, NcchError>;
