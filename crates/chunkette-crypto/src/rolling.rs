//! 64-bit polynomial rolling hash used to identify chunks
//!
//! Each byte rotates the running state left by one bit and folds in a
//! table entry derived from the reflected ECMA-182 CRC-64 polynomial. The
//! result is stable across platforms and is what manifests record as a
//! chunk's expected checksum.

use std::fmt;

/// Reflected ECMA-182 polynomial the byte table is generated from
pub const POLYNOMIAL: u64 = 0xC96C_5795_D787_0F42;

const TABLE: [u64; 256] = build_table();

const fn build_table() -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut i = 0;
    while i < 256 {
        let mut value = i as u64;
        let mut bit = 0;
        while bit < 8 {
            value = if value & 1 == 1 {
                (value >> 1) ^ POLYNOMIAL
            } else {
                value >> 1
            };
            bit += 1;
        }
        table[i] = value;
        i += 1;
    }
    table
}

/// Streaming rolling hash state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollingPoly64 {
    state: u64,
}

impl RollingPoly64 {
    /// Create an empty hasher
    pub const fn new() -> Self {
        Self { state: 0 }
    }

    /// Compute the rolling hash of a complete buffer
    pub fn hash(data: &[u8]) -> u64 {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finish()
    }

    /// Fold more bytes into the running state
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.state = self.state.rotate_left(1) ^ TABLE[usize::from(byte)];
        }
    }

    /// Current hash value
    pub const fn finish(&self) -> u64 {
        self.state
    }
}

impl fmt::Display for RollingPoly64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.state)
    }
}
