use gdunpack_core::{ByteReader, MappedFile};

use crate::decompile::{self, Tables};
use crate::format::{parse_identifier, parse_line_map, parse_tokens};
use crate::{dump, Constant, DecodeError, FormatError, FormatHeader, LineMap, TokenWord};

/// A fully decoded compiled script record.
///
/// Built by one forward pass over the record and never modified afterwards.
#[derive(Debug, Clone)]
pub struct CompiledScript {
    pub header: FormatHeader,
    /// Identifier table, in declaration order.
    pub identifiers: Vec<String>,
    pub constants: Vec<Constant>,
    pub line_map: LineMap,
    pub tokens: Vec<TokenWord>,
    /// Bytes the record occupied, from the header to the last token.
    pub encoded_len: usize,
}

impl CompiledScript {
    /// Decode a record starting at the cursor.
    ///
    /// Each section advances the cursor past its own data; nothing is read
    /// twice. The signature is checked before anything past the header.
    pub fn parse(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let start = r.pos();
        let header = FormatHeader::parse(r)?;
        log::debug!(
            "script header at 0x{:X}: version={} identifiers={} constants={} lines={} tokens={}",
            r.abs_pos() - FormatHeader::SIZE as u64,
            header.bytecode_version,
            header.identifier_count,
            header.constant_count,
            header.line_map_count,
            header.token_count
        );

        let identifiers = (0..header.identifier_count)
            .map(|_| parse_identifier(r))
            .collect::<Result<Vec<_>, FormatError>>()?;

        let constants = (0..header.constant_count)
            .map(|_| Constant::parse(r))
            .collect::<Result<Vec<_>, FormatError>>()?;

        let line_map = parse_line_map(r, header.line_map_count)?;
        let tokens = parse_tokens(r, header.token_count)?;

        log::trace!("script record ends at 0x{:X}", r.abs_pos());
        Ok(Self {
            header,
            identifiers,
            constants,
            line_map,
            tokens,
            encoded_len: r.pos() - start,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::parse(&mut ByteReader::new(bytes))
    }

    /// Decode the record at `offset` inside a mapped medium. `len` of
    /// `None` lets the record run to the end of the medium.
    pub fn from_medium(medium: &MappedFile, offset: u64, len: Option<u64>) -> Result<Self, DecodeError> {
        let mut r = medium.reader(offset, len)?;
        Self::parse(&mut r)
    }

    pub fn tables(&self) -> Tables<'_> {
        Tables {
            identifiers: &self.identifiers,
            constants: &self.constants,
        }
    }

    /// Pseudo-source text for the whole token stream.
    pub fn decompile(&self) -> Result<String, DecodeError> {
        decompile::relinearize(&self.tokens, self.tables())
    }

    /// Human-readable report of every section followed by the decompiled text.
    pub fn dump(&self) -> Result<String, DecodeError> {
        let mut out = String::new();
        dump::write_dump(&mut out, self)?;
        Ok(out)
    }
}
