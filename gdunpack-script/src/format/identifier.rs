use gdunpack_core::ByteReader;

use crate::FormatError;

/// Every identifier byte is stored XORed with this key.
pub const IDENTIFIER_KEY: u8 = 0xB6;

/// Undo the identifier obfuscation and drop the trailing NUL padding.
pub fn deobfuscate(raw: &[u8]) -> String {
    let plain: Vec<u8> = raw.iter().map(|b| b ^ IDENTIFIER_KEY).collect();
    String::from_utf8_lossy(&plain)
        .trim_end_matches('\0')
        .to_string()
}

/// Read one `u32 len | [len] obfuscated bytes` identifier.
///
/// The writer pads the name with NULs so `4 + len` is already a multiple of
/// four; no alignment step follows.
pub fn parse_identifier(r: &mut ByteReader<'_>) -> Result<String, FormatError> {
    let len = r
        .peek_u32()
        .map_err(FormatError::truncated("identifier length"))? as usize;
    let record = r
        .read_bytes(4 + len)
        .map_err(FormatError::truncated("identifier"))?;
    Ok(deobfuscate(&record[4..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::obfuscated_identifier;

    #[test]
    fn deobfuscate_round_trips() {
        for name in ["x", "_ready", "player_speed", "ünïcødé", "abcd"] {
            let bytes = obfuscated_identifier(name);
            let mut r = ByteReader::new(&bytes);
            assert_eq!(parse_identifier(&mut r).unwrap(), name);
            assert_eq!(r.pos(), bytes.len());
            assert_eq!(r.pos() % 4, 0);
        }
    }

    #[test]
    fn key_is_applied_per_byte() {
        assert_eq!(deobfuscate(&[b'h' ^ 0xB6, b'i' ^ 0xB6, 0xB6, 0xB6]), "hi");
    }

    #[test]
    fn truncated_identifier() {
        let mut bytes = obfuscated_identifier("player");
        bytes.truncate(bytes.len() - 1);
        let mut r = ByteReader::new(&bytes);

        let err = parse_identifier(&mut r).unwrap_err();
        assert!(matches!(err, FormatError::Truncated { what: "identifier", .. }));
        assert_eq!(r.pos(), 0);
    }
}
