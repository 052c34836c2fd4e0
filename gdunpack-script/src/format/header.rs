use gdunpack_core::ByteReader;

use crate::FormatError;

/// Fixed preamble of a compiled script record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    pub signature: u32,
    pub bytecode_version: u32,
    pub identifier_count: u32,
    pub constant_count: u32,
    pub line_map_count: u32,
    pub token_count: u32,
}

impl FormatHeader {
    /// "GDSC" read as a little-endian u32.
    pub const EXPECTED_SIGNATURE: u32 = 0x4353_4447;
    pub const SIZE: usize = 24;
    /// The bytecode version the token and variant tables were written for.
    pub const KNOWN_VERSION: u32 = 13;

    /// Parse the header. The cursor only moves on success.
    pub fn parse(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let raw = r
            .peek_bytes(Self::SIZE)
            .map_err(FormatError::truncated("header"))?;
        let mut h = ByteReader::with_base(raw, r.abs_pos());

        // Infallible from here on: `raw` is exactly SIZE bytes.
        let word = |h: &mut ByteReader<'_>| h.read_u32().map_err(FormatError::truncated("header"));

        let signature = word(&mut h)?;
        if signature != Self::EXPECTED_SIGNATURE {
            return Err(FormatError::BadSignature {
                found: signature,
                expected: Self::EXPECTED_SIGNATURE,
            });
        }

        let header = Self {
            signature,
            bytecode_version: word(&mut h)?,
            identifier_count: word(&mut h)?,
            constant_count: word(&mut h)?,
            line_map_count: word(&mut h)?,
            token_count: word(&mut h)?,
        };
        r.skip(Self::SIZE).map_err(FormatError::truncated("header"))?;

        if header.bytecode_version != Self::KNOWN_VERSION {
            log::warn!(
                "unexpected bytecode version {} (known: {}), output may be wrong",
                header.bytecode_version,
                Self::KNOWN_VERSION
            );
        }

        Ok(header)
    }
}
