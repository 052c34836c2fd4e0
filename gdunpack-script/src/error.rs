use gdunpack_core::BoundsError;
use thiserror::Error;

use crate::VariantKind;

/// The record itself is malformed or uses something we cannot decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("bad signature: found 0x{found:08X}, expected 0x{expected:08X}")]
    BadSignature { found: u32, expected: u32 },

    #[error("truncated {what} at 0x{offset:X}: need {needed} bytes, {available} available")]
    Truncated {
        what: &'static str,
        offset: u64,
        needed: u64,
        available: u64,
    },

    #[error("unsupported constant kind: {0}")]
    Unsupported(VariantKind),

    #[error("unknown constant kind: {0}")]
    UnknownKind(u32),
}

impl FormatError {
    /// Turn a failed read into a truncation error labelled with what was being read.
    pub(crate) fn truncated(what: &'static str) -> impl FnOnce(BoundsError) -> FormatError {
        move |e| FormatError::Truncated {
            what,
            offset: e.offset,
            needed: e.len,
            available: e.available,
        }
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The requested record range does not fit in the medium.
    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error("{table} index out of range: idx={index}, len={len}")]
    Index {
        table: &'static str,
        index: u32,
        len: usize,
    },

    #[error("unknown token opcode 0x{opcode:02X} at token {position}")]
    UnknownToken { opcode: u8, position: usize },

    #[error("formatting failed")]
    Fmt(#[from] std::fmt::Error),
}
