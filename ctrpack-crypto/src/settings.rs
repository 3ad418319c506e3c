//! Key configuration file.
//!
//! The default location is `~/.config/ctrpack/keys.toml`:
//!
//! ```toml
//! fixed_system = "00112233445566778899AABBCCDDEEFF"
//! seeddb = "seeddb.bin"            # relative to this file
//!
//! [key_x]
//! initial = "..."                  # slot 0x2C
//! v7_0 = "..."                     # slot 0x25
//!
//! [key_x_new3ds]
//! v9_3 = "..."
//!
//! [[seeds]]
//! title_id = "0004000000055D00"
//! seed = "..."
//! ```
//!
//! Crypt method names accept any alias understood by
//! [`CryptMethod`]'s `FromStr` (e.g. `slot0x2c`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ctrpack_core::util::decode_hex;
use ctrpack_core::{ContentPlatform, CryptMethod, Key128, NcchError, Result};
use serde::Deserialize;

use crate::keystore::KeyTable;
use crate::seeddb::SeedDb;

/// Canonical path to the key file: `~/.config/ctrpack/keys.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("ctrpack").join("keys.toml")
}

/// Build a [`KeyTable`] using a priority chain:
///
/// 1. Explicit path override (must exist)
/// 2. `settings_path()` if the file exists
/// 3. An empty table
pub fn load_key_table(path_override: Option<PathBuf>) -> Result<KeyTable> {
    if let Some(path) = path_override {
        return KeyConfig::load(&path)?.into_key_table();
    }
    let default = settings_path();
    if default.is_file() {
        KeyConfig::load(&default)?.into_key_table()
    } else {
        log::debug!("no key file at {}, starting with an empty key table", default.display());
        Ok(KeyTable::new())
    }
}

/// A seed listed inline in the key file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub title_id: String,
    pub seed: String,
}

/// Raw contents of the key file. Values are hex strings until
/// [`KeyConfig::into_key_table`] validates them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub key_x: HashMap<String, String>,
    pub key_x_new3ds: HashMap<String, String>,
    pub fixed_system: Option<String>,
    pub seeddb: Option<PathBuf>,
    pub seeds: Vec<SeedEntry>,
}

impl KeyConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| NcchError::invalid_config(e.to_string()))
    }

    /// Read a key file. A relative `seeddb` path is resolved against the
    /// directory holding the key file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        if let Some(seeddb) = config.seeddb.take() {
            let resolved = match path.parent() {
                Some(dir) if seeddb.is_relative() => dir.join(seeddb),
                _ => seeddb,
            };
            config.seeddb = Some(resolved);
        }
        Ok(config)
    }

    /// Validate every entry and build the key table.
    pub fn into_key_table(self) -> Result<KeyTable> {
        let mut table = KeyTable::new();

        for (name, hex) in &self.key_x {
            let method = parse_method(name)?;
            table.insert_key_x(method, parse_key(hex, name)?);
        }
        for (name, hex) in &self.key_x_new3ds {
            let method = parse_method(name)?;
            table = table.with_platform_key_x(method, ContentPlatform::New3ds, parse_key(hex, name)?);
        }
        if let Some(hex) = &self.fixed_system {
            table = table.with_fixed_system_key(parse_key(hex, "fixed_system")?);
        }
        let mut inline = Vec::with_capacity(self.seeds.len());
        for entry in &self.seeds {
            let title_id = parse_title_id(&entry.title_id)?;
            inline.push((title_id, parse_key(&entry.seed, &entry.title_id)?));
        }
        let db = match &self.seeddb {
            Some(path) => SeedDb::open(path)?,
            None => SeedDb::new(),
        };
        for (title_id, seed) in inline {
            if db.get(title_id).is_some() {
                log::warn!("seed for {title_id:016X} is listed inline and in seeddb; using the inline one");
            }
            table = table.with_seed(title_id, seed);
        }
        table = table.with_seeddb(db);

        Ok(table)
    }
}

fn parse_method(name: &str) -> Result<CryptMethod> {
    name.parse::<CryptMethod>()
        .map_err(|e| NcchError::invalid_config(e.to_string()))
}

fn parse_key(hex: &str, what: &str) -> Result<Key128> {
    decode_hex::<16>(hex)
        .ok_or_else(|| NcchError::invalid_config(format!("{what}: expected 32 hex digits")))
}

fn parse_title_id(s: &str) -> Result<u64> {
    let digits = s.trim().trim_start_matches("0x");
    u64::from_str_radix(digits, 16)
        .map_err(|_| NcchError::invalid_config(format!("invalid title id: {s}")))
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
