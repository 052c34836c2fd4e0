use std::collections::BTreeMap;

use byteorder::{ByteOrder, LittleEndian};
use gdunpack_core::ByteReader;

use crate::FormatError;

/// Token index to packed line/column. Later entries replace earlier ones.
pub type LineMap = BTreeMap<i32, u32>;

/// Source position recovered from a packed line-map value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: u32,
    pub column: u32,
}

impl LineColumn {
    const LINE_BITS: u32 = 24;
    const LINE_MASK: u32 = (1 << Self::LINE_BITS) - 1;

    pub fn unpack(packed: u32) -> Self {
        Self {
            line: packed & Self::LINE_MASK,
            column: packed >> Self::LINE_BITS,
        }
    }
}

/// Read `count` `(i32 token, u32 packed)` pairs.
pub fn parse_line_map(r: &mut ByteReader<'_>, count: u32) -> Result<LineMap, FormatError> {
    let mut map = LineMap::new();
    for _ in 0..count {
        let pair = r
            .read_bytes(8)
            .map_err(FormatError::truncated("line map entry"))?;
        let token = LittleEndian::read_i32(&pair[..4]);
        let packed = LittleEndian::read_u32(&pair[4..]);

        if let Some(old) = map.insert(token, packed) {
            log::debug!("line map entry for token {} replaced ({} -> {})", token, old, packed);
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(i32, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        for (token, packed) in pairs {
            out.extend_from_slice(&token.to_le_bytes());
            out.extend_from_slice(&packed.to_le_bytes());
        }
        out
    }

    #[test]
    fn duplicate_key_keeps_last() {
        let bytes = entries(&[(7, 100), (-1, 5), (7, 200)]);
        let mut r = ByteReader::new(&bytes);
        let map = parse_line_map(&mut r, 3).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map[&7], 200);
        assert_eq!(map[&-1], 5);
        assert_eq!(r.pos(), 24);
    }

    #[test]
    fn truncated_entry() {
        let bytes = entries(&[(1, 1)]);
        let mut r = ByteReader::new(&bytes[..7]);
        assert!(matches!(
            parse_line_map(&mut r, 1),
            Err(FormatError::Truncated { what: "line map entry", .. })
        ));
    }

    #[test]
    fn unpack_line_column() {
        let lc = LineColumn::unpack(12 | (5 << 24));
        assert_eq!(lc, LineColumn { line: 12, column: 5 });
    }
}
