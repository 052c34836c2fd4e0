//! On-disk layout of a compiled script record.
//!
//! Layout (little-endian), each section immediately after the previous one:
//! - header (24 bytes), see [`FormatHeader`]
//! - identifier_count obfuscated identifiers
//! - constant_count typed constants
//! - line_map_count (token index, packed line/column) pairs
//! - token_count variable-width token words

mod constant;
mod header;
mod identifier;
mod line_map;
mod token;
mod variant_kind;

pub use constant::Constant;
pub use header::FormatHeader;
pub use identifier::{deobfuscate, parse_identifier, IDENTIFIER_KEY};
pub use line_map::{parse_line_map, LineColumn, LineMap};
pub use token::{parse_tokens, TokenKind, TokenWord};
pub use variant_kind::VariantKind;
