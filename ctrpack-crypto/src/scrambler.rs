//! KeyX/KeyY key scrambler.
//!
//! The console never loads a normal key for NCCH content directly; it feeds
//! KeyX and KeyY to a hardware scrambler:
//!
//! ```text
//! normal = ROL128((ROL128(KeyX, 2) XOR KeyY) + C, 87)
//! ```
//!
//! `C` is picked per crypt method through [`scrambler_for`]. All four retail
//! methods share the CTR constant, but the match is exhaustive over
//! [`CryptMethod`] so a new method has to name its own constant.

use ctrpack_core::{CryptMethod, Key128};

/// CTR hardware scrambler constant.
const CTR_SCRAMBLER_CONSTANT: u128 = 0x1FF9E9AAC5FE0408024591DC5D52768A;

/// Scrambler parameterised by its additive constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyScrambler {
    constant: u128,
}

impl KeyScrambler {
    pub const fn new(constant: u128) -> Self {
        Self { constant }
    }

    pub fn constant(&self) -> u128 {
        self.constant
    }

    /// Combine KeyX and KeyY into a normal key.
    pub fn scramble(&self, key_x: &Key128, key_y: &Key128) -> Key128 {
        let x = u128::from_be_bytes(*key_x);
        let y = u128::from_be_bytes(*key_y);
        (x.rotate_left(2) ^ y)
            .wrapping_add(self.constant)
            .rotate_left(87)
            .to_be_bytes()
    }
}

/// Scrambler used by `method`.
pub fn scrambler_for(method: CryptMethod) -> KeyScrambler {
    match method {
        CryptMethod::Initial => KeyScrambler::new(CTR_SCRAMBLER_CONSTANT),
        CryptMethod::V7_0 => KeyScrambler::new(CTR_SCRAMBLER_CONSTANT),
        CryptMethod::V9_3 => KeyScrambler::new(CTR_SCRAMBLER_CONSTANT),
        CryptMethod::V9_6 => KeyScrambler::new(CTR_SCRAMBLER_CONSTANT),
    }
}

#[cfg(test)]
#[path = "tests/scrambler_tests.rs"]
mod tests;
