//! Storage and hash-type flags for chunk headers

use std::fmt;

/// How the payload bytes of a chunk are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StorageFlags {
    /// Raw flag byte
    pub value: u8,
}

impl StorageFlags {
    /// Stored verbatim
    pub const NONE: u8 = 0x00;

    /// Payload is zlib compressed
    pub const COMPRESSED: u8 = 0x01;

    /// Payload is encrypted (not supported for loading)
    pub const ENCRYPTED: u8 = 0x02;

    /// Create flags from raw value
    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    /// Check if flag is set
    pub const fn has(&self, flag: u8) -> bool {
        (self.value & flag) != 0
    }

    /// Set flag
    pub fn set(&mut self, flag: u8) {
        self.value |= flag;
    }

    /// Payload is zlib compressed
    pub const fn is_compressed(&self) -> bool {
        self.has(Self::COMPRESSED)
    }

    /// Payload is encrypted
    pub const fn is_encrypted(&self) -> bool {
        self.has(Self::ENCRYPTED)
    }
}

impl fmt::Display for StorageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.value)
    }
}

impl From<u8> for StorageFlags {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

/// Hash algorithms that can vouch for a chunk payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    /// 64-bit polynomial rolling hash
    Rolling,
    /// SHA-1 digest
    Sha1,
}

impl HashKind {
    /// Flag bit for this kind in a [`HashType`]
    pub const fn flag(self) -> u8 {
        match self {
            Self::Rolling => HashType::ROLLING,
            Self::Sha1 => HashType::SHA1,
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rolling => write!(f, "rolling hash"),
            Self::Sha1 => write!(f, "SHA-1"),
        }
    }
}

/// Set of hash algorithms recorded as authoritative for a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashType {
    /// Raw flag byte
    pub value: u8,
}

impl HashType {
    /// No hash recorded
    pub const NONE: u8 = 0x00;

    /// Rolling hash is authoritative
    pub const ROLLING: u8 = 0x01;

    /// SHA-1 digest is authoritative
    pub const SHA1: u8 = 0x02;

    /// Verification order: rolling first, then SHA-1
    const ORDER: [HashKind; 2] = [HashKind::Rolling, HashKind::Sha1];

    /// Create hash type from raw value
    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    /// Rolling hash only (containers before version 2)
    pub const fn rolling_only() -> Self {
        Self::new(Self::ROLLING)
    }

    /// Both rolling hash and SHA-1
    pub const fn both() -> Self {
        Self::new(Self::ROLLING | Self::SHA1)
    }

    /// Check if a kind is present
    pub const fn contains(&self, kind: HashKind) -> bool {
        (self.value & kind.flag()) != 0
    }

    /// No known hash kind is recorded
    pub const fn is_empty(&self) -> bool {
        (self.value & (Self::ROLLING | Self::SHA1)) == 0
    }

    /// Kinds present in this set, in verification order
    pub fn kinds(self) -> impl Iterator<Item = HashKind> {
        Self::ORDER.into_iter().filter(move |kind| self.contains(*kind))
    }
}

impl Default for HashType {
    fn default() -> Self {
        Self::rolling_only()
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.value)
    }
}

impl From<u8> for HashType {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}
