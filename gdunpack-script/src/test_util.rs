//! Byte-level builders for synthetic script records.

use crate::format::IDENTIFIER_KEY;
use crate::{Constant, FormatHeader, TokenKind, TokenWord, VariantKind};

fn pad4(buf: &mut Vec<u8>) {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

/// `u32 len | obfuscated name + NUL padding`, sized so the record is a
/// multiple of four.
pub fn obfuscated_identifier(name: &str) -> Vec<u8> {
    let mut body = name.as_bytes().to_vec();
    // the writer always terminates with at least one NUL
    body.push(0);
    pad4(&mut body);

    let mut out = (body.len() as u32).to_le_bytes().to_vec();
    out.extend(body.iter().map(|b| b ^ IDENTIFIER_KEY));
    out
}

/// String payload as stored in the stream, padding included.
pub fn string_payload(s: &str) -> Vec<u8> {
    let mut out = (s.len() as u32).to_le_bytes().to_vec();
    out.extend_from_slice(s.as_bytes());
    pad4(&mut out);
    out
}

pub fn constant_record(kind: VariantKind, wide: bool, payload: &[u8]) -> Vec<u8> {
    let mut raw = kind as u32;
    if wide {
        raw |= VariantKind::FLAG_WIDE;
    }
    let mut out = raw.to_le_bytes().to_vec();
    out.extend_from_slice(payload);
    out
}

#[derive(Default)]
pub struct ScriptBuilder {
    version: Option<u32>,
    identifiers: Vec<u8>,
    identifier_count: u32,
    constants: Vec<u8>,
    constant_count: u32,
    lines: Vec<u8>,
    line_count: u32,
    tokens: Vec<u8>,
    token_count: u32,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn identifier(mut self, name: &str) -> Self {
        self.identifiers.extend(obfuscated_identifier(name));
        self.identifier_count += 1;
        self
    }

    /// Append a constant, re-padding string payloads the way the writer does.
    pub fn constant(self, c: &Constant) -> Self {
        let mut payload = c.payload.clone();
        if c.kind == VariantKind::String {
            pad4(&mut payload);
        }
        self.raw_constant(c.kind, c.wide, &payload)
    }

    pub fn raw_constant(mut self, kind: VariantKind, wide: bool, payload: &[u8]) -> Self {
        self.constants
            .extend(constant_record(kind, wide, payload));
        self.constant_count += 1;
        self
    }

    pub fn line(mut self, token: i32, packed: u32) -> Self {
        self.lines.extend_from_slice(&token.to_le_bytes());
        self.lines.extend_from_slice(&packed.to_le_bytes());
        self.line_count += 1;
        self
    }

    /// Tokens with an operand use the 4-byte form, the rest a single byte.
    pub fn token(mut self, kind: TokenKind, operand: u32) -> Self {
        let word = TokenWord::new(kind, operand).raw();
        if operand == 0 {
            self.tokens.push(word as u8);
        } else {
            let marked = word | TokenWord::WIDE_MARKER as u32;
            self.tokens.extend_from_slice(&marked.to_le_bytes());
        }
        self.token_count += 1;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        for word in [
            FormatHeader::EXPECTED_SIGNATURE,
            self.version.unwrap_or(FormatHeader::KNOWN_VERSION),
            self.identifier_count,
            self.constant_count,
            self.line_count,
            self.token_count,
        ] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.extend(self.identifiers);
        out.extend(self.constants);
        out.extend(self.lines);
        out.extend(self.tokens);
        out
    }
}
