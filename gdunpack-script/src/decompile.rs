//! Token stream re-linearization.
//!
//! Walks the tokens in order and appends text for each one. There is no
//! syntax tree: spacing lives in the per-token literals and indentation
//! comes straight from the operand of each newline token.

use crate::{builtins, Constant, DecodeError, TokenKind, TokenWord};

const INDENT: char = '\t';

/// Read-only view of the tables token operands point into.
#[derive(Debug, Clone, Copy)]
pub struct Tables<'a> {
    pub identifiers: &'a [String],
    pub constants: &'a [Constant],
}

impl<'a> Tables<'a> {
    fn identifier(&self, index: u32) -> Result<&'a str, DecodeError> {
        self.identifiers
            .get(index as usize)
            .map(String::as_str)
            .ok_or(DecodeError::Index {
                table: "identifier",
                index,
                len: self.identifiers.len(),
            })
    }

    fn constant(&self, index: u32) -> Result<&'a Constant, DecodeError> {
        self.constants.get(index as usize).ok_or(DecodeError::Index {
            table: "constant",
            index,
            len: self.constants.len(),
        })
    }
}

/// Emit pseudo-source for `tokens`.
pub fn relinearize(tokens: &[TokenWord], tables: Tables<'_>) -> Result<String, DecodeError> {
    let mut out = String::new();
    let mut indent = 0usize;

    for (position, token) in tokens.iter().enumerate() {
        let opcode = token.opcode();
        let kind = TokenKind::from_opcode(opcode)
            .ok_or(DecodeError::UnknownToken { opcode, position })?;
        let data = token.operand();

        match kind {
            TokenKind::Newline => {
                out.push('\n');
                indent = data as usize;
                out.extend(std::iter::repeat(INDENT).take(indent));
            }
            TokenKind::Identifier => out.push_str(tables.identifier(data)?),
            TokenKind::Constant => out.push_str(&tables.constant(data)?.format()),
            TokenKind::BuiltInType => {
                let name = builtins::type_name(data).ok_or(DecodeError::Index {
                    // nil is in range but has no source name
                    table: if (data as usize) < builtins::TYPE_COUNT {
                        "builtin type (nil)"
                    } else {
                        "builtin type"
                    },
                    index: data,
                    len: builtins::TYPE_COUNT,
                })?;
                out.push_str(name);
            }
            TokenKind::BuiltInFunc => {
                let name = builtins::function_name(data).ok_or(DecodeError::Index {
                    table: "builtin function",
                    index: data,
                    len: builtins::FUNCTIONS.len(),
                })?;
                out.push_str(name);
            }
            TokenKind::Eof => {}
            _ => match kind.literal() {
                Some(lit) => out.push_str(lit),
                None => {
                    // no source form, emit the opcode name
                    out.push_str(kind.name());
                    out.push(' ');
                }
            },
        }
    }

    log::trace!("re-linearized {} tokens, final indent {}", tokens.len(), indent);
    Ok(out)
}
