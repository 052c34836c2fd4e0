//! Diagnostic dump of a decoded record. Display only, not meant to be parsed.

use std::fmt::Write;

use crate::{CompiledScript, DecodeError, LineColumn};

pub fn write_dump<W: Write>(w: &mut W, script: &CompiledScript) -> Result<(), DecodeError> {
    let header = &script.header;
    writeln!(w, "Signature: 0x{:08X}", header.signature)?;
    writeln!(w, "Bytecode Version: {}", header.bytecode_version)?;
    writeln!(w, "Encoded Length: {} bytes", script.encoded_len)?;

    writeln!(w)?;
    writeln!(w, "Identifiers ({}):", header.identifier_count)?;
    for (i, name) in script.identifiers.iter().enumerate() {
        writeln!(w, "\t{} => {}", i, name)?;
    }

    writeln!(w)?;
    writeln!(w, "Constants ({}):", header.constant_count)?;
    for (i, c) in script.constants.iter().enumerate() {
        let wide = if c.wide { " (64-bit)" } else { "" };
        writeln!(w, "\t{} => {}{} : {}", i, c.kind, wide, c.format())?;
    }

    writeln!(w)?;
    writeln!(w, "Line Map ({}) - token to line/column:", header.line_map_count)?;
    for (token, packed) in &script.line_map {
        let lc = LineColumn::unpack(*packed);
        writeln!(
            w,
            "\t{:03} => {} (line {}, column {})",
            token, packed, lc.line, lc.column
        )?;
    }

    writeln!(w)?;
    writeln!(w, "Tokens ({}):", header.token_count)?;
    for (i, token) in script.tokens.iter().enumerate() {
        let name = token.kind().map(|k| k.name()).unwrap_or("?");
        writeln!(w, "\t{:03} => 0x{:08X} {}", i, token.raw(), name)?;
    }

    writeln!(w)?;
    writeln!(w, "Decompiled output:")?;
    writeln!(w)?;
    w.write_str(&script.decompile()?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::test_util::ScriptBuilder;
    use crate::{CompiledScript, Constant, TokenKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn dump_sections() {
        let bytes = ScriptBuilder::new()
            .version(13)
            .identifier("x")
            .constant(&Constant::int64(7))
            .line(1, 3 | (2 << 24))
            .token(TokenKind::Identifier, 0)
            .token(TokenKind::OpAssign, 0)
            .token(TokenKind::Constant, 0)
            .build();
        let script = CompiledScript::from_bytes(&bytes).unwrap();

        let expected = format!(
            "\
Signature: 0x43534447
Bytecode Version: 13
Encoded Length: {} bytes

Identifiers (1):
\t0 => x

Constants (1):
\t0 => Int (64-bit) : 7

Line Map (1) - token to line/column:
\t001 => 33554435 (line 3, column 2)

Tokens (3):
\t000 => 0x00000001 Identifier
\t001 => 0x00000017 OpAssign
\t002 => 0x00000002 Constant

Decompiled output:

x= 7",
            bytes.len()
        );
        assert_eq!(script.dump().unwrap(), expected);
    }

    #[test]
    fn dump_propagates_decompile_errors() {
        let bytes = ScriptBuilder::new()
            .token(TokenKind::Identifier, 4)
            .build();
        let script = CompiledScript::from_bytes(&bytes).unwrap();
        assert!(script.dump().is_err());
    }
}
