//! gdunpack-script
//!
//! Decoder for compiled script records (`.gdc`) and a re-linearizer that
//! turns their token stream back into readable pseudo-source.
//!
//! A record is decoded in one forward pass: header, identifier table,
//! constant pool, line map, token stream. The result, [`CompiledScript`],
//! is immutable and can be decompiled or dumped as many times as needed.

pub mod builtins;
pub mod decompile;
pub mod dump;
mod error;
pub mod format;
mod script;

#[cfg(test)]
mod test_util;

pub use error::{DecodeError, FormatError};
pub use format::{
    Constant, FormatHeader, LineColumn, LineMap, TokenKind, TokenWord, VariantKind,
};
pub use script::CompiledScript;
