use crate::error::NcchError;

/// Historical NCCH crypt methods.
///
/// Each method names the system version that introduced it and selects
/// which KeyX the secondary key is scrambled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptMethod {
    /// Original method, key slot 0x2C.
    Initial,
    /// System version 7.0.0, key slot 0x25.
    V7_0,
    /// System version 9.3.0 (New 3DS), key slot 0x18.
    V9_3,
    /// System version 9.6.0 (New 3DS), key slot 0x1B.
    V9_6,
}

/// All crypt methods in raw-value order.
const ALL_METHODS: &[CryptMethod] = &[
    CryptMethod::Initial,
    CryptMethod::V7_0,
    CryptMethod::V9_3,
    CryptMethod::V9_6,
];

impl CryptMethod {
    /// Value stored in the header flags byte.
    pub fn raw(&self) -> u8 {
        match self {
            Self::Initial => 0x00,
            Self::V7_0 => 0x01,
            Self::V9_3 => 0x0A,
            Self::V9_6 => 0x0B,
        }
    }

    /// Hardware AES key slot whose KeyX this method uses.
    pub fn key_slot(&self) -> u8 {
        match self {
            Self::Initial => 0x2C,
            Self::V7_0 => 0x25,
            Self::V9_3 => 0x18,
            Self::V9_6 => 0x1B,
        }
    }

    /// Canonical name used in key configuration files.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::V7_0 => "v7_0",
            Self::V9_3 => "v9_3",
            Self::V9_6 => "v9_6",
        }
    }

    /// Alternative names accepted when parsing (first entry is `short_name`).
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Initial => &["initial", "slot0x2c", "0x00"],
            Self::V7_0 => &["v7_0", "slot0x25", "0x01"],
            Self::V9_3 => &["v9_3", "slot0x18", "0x0a"],
            Self::V9_6 => &["v9_6", "slot0x1b", "0x0b"],
        }
    }

    pub fn all() -> &'static [CryptMethod] {
        ALL_METHODS
    }
}

impl TryFrom<u8> for CryptMethod {
    type Error = NcchError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        ALL_METHODS
            .iter()
            .copied()
            .find(|m| m.raw() == raw)
            .ok_or(NcchError::UnsupportedCryptMethod(raw))
    }
}

impl std::fmt::Display for CryptMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:02X})", self.short_name(), self.raw())
    }
}

/// Error returned when a string does not name a known crypt method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptMethodParseError(pub String);

impl std::fmt::Display for CryptMethodParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown crypt method: {}", self.0)
    }
}

impl std::error::Error for CryptMethodParseError {}

impl std::str::FromStr for CryptMethod {
    type Err = CryptMethodParseError;

    /// Parse a crypt method from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_METHODS
            .iter()
            .copied()
            .find(|m| m.aliases().contains(&lower.as_str()))
            .ok_or_else(|| CryptMethodParseError(s.to_string()))
    }
}

/// Hardware platform a package targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentPlatform {
    /// Old 3DS / 2DS (CTR).
    Old3ds,
    /// New 3DS / New 2DS (KTR).
    New3ds,
}

impl ContentPlatform {
    pub fn raw(&self) -> u8 {
        match self {
            Self::Old3ds => 0x01,
            Self::New3ds => 0x02,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Old3ds => "Old 3DS (CTR)",
            Self::New3ds => "New 3DS",
        }
    }
}

impl TryFrom<u8> for ContentPlatform {
    type Error = NcchError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0x01 => Ok(Self::Old3ds),
            0x02 => Ok(Self::New3ds),
            other => Err(NcchError::UnsupportedPlatform(other)),
        }
    }
}

impl std::fmt::Display for ContentPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
