use thiserror::Error;

/// An offset or length that falls outside the backing byte source.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("out of bounds: offset=0x{offset:X}, len=0x{len:X}, available=0x{available:X}")]
pub struct BoundsError {
    /// Absolute offset of the rejected access.
    pub offset: u64,
    pub len: u64,
    /// Bytes that were actually left at `offset`.
    pub available: u64,
}

#[derive(Error, Debug)]
pub enum PackError {
    #[error("invalid pack magic: found 0x{found:08X}, expected 0x{expected:08X}")]
    BadMagic { found: u32, expected: u32 },

    #[error("pack entry {index} has a negative range: offset={offset}, size={size}")]
    BadEntry { index: usize, offset: i64, size: i64 },

    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
