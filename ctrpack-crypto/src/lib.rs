//! Key material and AES-CTR plumbing for 3DS content.
//!
//! - [`scrambler`]: KeyX/KeyY → normal key, selected per crypt method
//! - [`counter`]: seekable AES-128-CTR context and a decrypting reader
//! - [`keystore`]: the [`Keystore`] lookup trait and the in-memory [`KeyTable`]
//! - [`seeddb`]: `seeddb.bin` reader
//! - [`settings`]: TOML key configuration
//!
//! The implementations here target offline file parsing. Nothing in this
//! crate tries to be constant-time.

pub mod counter;
pub mod keystore;
pub mod scrambler;
pub mod seeddb;
pub mod settings;

pub use counter::{AesCtr, CtrReader};
pub use keystore::{KeyTable, Keystore};
pub use scrambler::{KeyScrambler, scrambler_for};
pub use seeddb::SeedDb;
pub use settings::KeyConfig;
