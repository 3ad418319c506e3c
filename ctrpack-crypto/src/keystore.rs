//! Key lookup.

use std::collections::HashMap;

use ctrpack_core::{ContentPlatform, CryptMethod, Key128};

use crate::seeddb::SeedDb;

/// Source of the key material NCCH decryption needs.
///
/// A keystore is only borrowed for the duration of one derivation; nothing
/// it returns is retained beyond the derived working keys.
pub trait Keystore {
    /// KeyX for the given crypt method on the given platform.
    fn key_x(&self, method: CryptMethod, platform: ContentPlatform) -> Option<Key128>;

    /// Fixed normal key used by system titles flagged "fixed key".
    fn fixed_system_key(&self) -> Option<Key128> {
        None
    }

    /// Resolve the seed for `title_id`.
    ///
    /// `seed_check` is the 32-bit check word from the header. Implementations
    /// may use it to pick between candidates; the caller verifies whatever
    /// seed comes back against it.
    fn seed(&self, _title_id: u64, _seed_check: u32) -> Option<Key128> {
        None
    }
}

impl<K: Keystore + ?Sized> Keystore for &K {
    fn key_x(&self, method: CryptMethod, platform: ContentPlatform) -> Option<Key128> {
        (**self).key_x(method, platform)
    }

    fn fixed_system_key(&self) -> Option<Key128> {
        (**self).fixed_system_key()
    }

    fn seed(&self, title_id: u64, seed_check: u32) -> Option<Key128> {
        (**self).seed(title_id, seed_check)
    }
}

/// In-memory [`Keystore`].
///
/// KeyX entries are registered per crypt method and apply to every platform
/// unless a platform-specific override exists.
#[derive(Debug, Clone, Default)]
pub struct KeyTable {
    key_x: HashMap<CryptMethod, Key128>,
    platform_key_x: HashMap<(CryptMethod, ContentPlatform), Key128>,
    fixed_system: Option<Key128>,
    seeds: SeedDb,
}

impl KeyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_x(mut self, method: CryptMethod, key: Key128) -> Self {
        self.insert_key_x(method, key);
        self
    }

    pub fn with_platform_key_x(
        mut self,
        method: CryptMethod,
        platform: ContentPlatform,
        key: Key128,
    ) -> Self {
        self.platform_key_x.insert((method, platform), key);
        self
    }

    pub fn with_fixed_system_key(mut self, key: Key128) -> Self {
        self.fixed_system = Some(key);
        self
    }

    pub fn with_seed(mut self, title_id: u64, seed: Key128) -> Self {
        self.seeds.insert(title_id, seed);
        self
    }

    pub fn with_seeddb(mut self, seeds: SeedDb) -> Self {
        self.seeds.merge(seeds);
        self
    }

    pub fn insert_key_x(&mut self, method: CryptMethod, key: Key128) {
        self.key_x.insert(method, key);
    }

    pub fn seeds(&self) -> &SeedDb {
        &self.seeds
    }
}

impl Keystore for KeyTable {
    fn key_x(&self, method: CryptMethod, platform: ContentPlatform) -> Option<Key128> {
        self.platform_key_x
            .get(&(method, platform))
            .or_else(|| self.key_x.get(&method))
            .copied()
    }

    fn fixed_system_key(&self) -> Option<Key128> {
        self.fixed_system
    }

    fn seed(&self, title_id: u64, _seed_check: u32) -> Option<Key128> {
        self.seeds.get(title_id).copied()
    }
}

#[cfg(test)]
#[path = "tests/keystore_tests.rs"]
mod tests;
