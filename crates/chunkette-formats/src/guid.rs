use binrw::{BinRead, BinWrite};
use std::fmt;
use std::str::FromStr;

use crate::chunk::ChunkError;

/// Chunk GUID stored on the wire as four little-endian `u32` words
#[derive(BinRead, BinWrite, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[brw(little)]
pub struct Guid {
    /// First word
    pub a: u32,
    /// Second word
    pub b: u32,
    /// Third word
    pub c: u32,
    /// Fourth word
    pub d: u32,
}

impl Guid {
    /// Size on the wire in bytes
    pub const SIZE: usize = 16;

    /// Create a GUID from its four words
    pub const fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self { a, b, c, d }
    }

    /// A GUID is valid when any word is non-zero
    pub const fn is_valid(&self) -> bool {
        (self.a | self.b | self.c | self.d) != 0
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}{:08X}{:08X}{:08X}", self.a, self.b, self.c, self.d)
    }
}

impl FromStr for Guid {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 || !s.is_ascii() {
            return Err(ChunkError::InvalidGuid(format!(
                "expected 32 hex characters, got {s:?}"
            )));
        }

        let word = |i: usize| {
            u32::from_str_radix(&s[i * 8..(i + 1) * 8], 16)
                .map_err(|e| ChunkError::InvalidGuid(format!("{s:?}: {e}")))
        };

        Ok(Self::new(word(0)?, word(1)?, word(2)?, word(3)?))
    }
}
