use std::fmt;

use gdunpack_core::ByteReader;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::FormatError;

/// Tokenizer opcodes, in the order the compiler numbers them.
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr, strum::EnumIter)]
#[repr(u8)]
pub enum TokenKind {
    Empty = 0,
    Identifier,
    Constant,
    #[strum(serialize = "Self")]
    SelfRef,
    BuiltInType,
    BuiltInFunc,
    OpIn,
    OpEqual,
    OpNotEqual,
    OpLess,
    OpLessEqual,
    OpGreater,
    OpGreaterEqual,
    OpAnd,
    OpOr,
    OpNot,
    OpAdd,
    OpSub,
    OpMul,
    OpDiv,
    OpMod,
    OpShiftLeft,
    OpShiftRight,
    OpAssign,
    OpAssignAdd,
    OpAssignSub,
    OpAssignMul,
    OpAssignDiv,
    OpAssignMod,
    OpAssignShiftLeft,
    OpAssignShiftRight,
    OpAssignBitAnd,
    OpAssignBitOr,
    OpAssignBitXor,
    OpBitAnd,
    OpBitOr,
    OpBitXor,
    OpBitInvert,
    CfIf,
    CfElif,
    CfElse,
    CfFor,
    CfWhile,
    CfBreak,
    CfContinue,
    CfPass,
    CfReturn,
    CfMatch,
    PrFunction,
    PrClass,
    PrClassName,
    PrExtends,
    PrIs,
    PrOnready,
    PrTool,
    PrStatic,
    PrExport,
    PrSetget,
    PrConst,
    PrVar,
    PrAs,
    PrVoid,
    PrEnum,
    PrPreload,
    PrAssert,
    PrYield,
    PrSignal,
    PrBreakpoint,
    PrRemote,
    PrSync,
    PrMaster,
    PrSlave,
    PrPuppet,
    PrRemotesync,
    PrMastersync,
    PrPuppetsync,
    BracketOpen,
    BracketClose,
    CurlyBracketOpen,
    CurlyBracketClose,
    ParenthesisOpen,
    ParenthesisClose,
    Comma,
    Semicolon,
    Period,
    QuestionMark,
    Colon,
    Dollar,
    ForwardArrow,
    Newline,
    ConstPi,
    ConstTau,
    Wildcard,
    ConstInf,
    ConstNan,
    Error,
    Eof,
    Cursor,
}

impl TokenKind {
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::from_u8(opcode)
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Fixed text for punctuation, operators and keywords.
    ///
    /// Spacing is part of the literal: binary operators carry a space on
    /// both sides, leading keywords one trailing space.
    pub fn literal(self) -> Option<&'static str> {
        let lit = match self {
            TokenKind::Colon => ":",
            TokenKind::Comma => ", ",
            TokenKind::ParenthesisOpen => "(",
            TokenKind::ParenthesisClose => ")",
            TokenKind::BracketOpen => "[",
            TokenKind::BracketClose => "]",
            TokenKind::CurlyBracketOpen => "{",
            TokenKind::CurlyBracketClose => "}",
            TokenKind::Period => ".",
            TokenKind::ForwardArrow => "-> ",

            TokenKind::PrClass => "class ",
            TokenKind::PrClassName => "class_name ",
            TokenKind::PrExtends => "extends ",
            TokenKind::PrConst => "const ",
            TokenKind::PrVar => "var ",
            TokenKind::PrFunction => "func ",
            TokenKind::PrStatic => "static ",
            TokenKind::PrAs => " as ",
            TokenKind::PrPreload => "preload",

            TokenKind::OpAssign => "= ",
            TokenKind::OpShiftRight => ">> ",
            TokenKind::OpShiftLeft => "<< ",
            TokenKind::OpIn => " in ",
            TokenKind::OpEqual => " == ",
            TokenKind::OpAdd => " + ",
            TokenKind::OpSub => " - ",
            TokenKind::OpMul => " * ",
            TokenKind::OpDiv => " / ",
            TokenKind::OpMod => " % ",
            TokenKind::OpLess => " < ",
            TokenKind::OpLessEqual => " <= ",
            TokenKind::OpGreater => " > ",
            TokenKind::OpGreaterEqual => " >= ",
            TokenKind::OpNotEqual => " != ",
            TokenKind::OpNot => "!",
            TokenKind::OpAnd => " and ",
            TokenKind::OpOr => " or ",
            TokenKind::OpAssignAdd => " += ",

            TokenKind::CfFor => "for ",
            TokenKind::CfWhile => "while ",
            TokenKind::CfIf => "if ",
            TokenKind::CfElif => "elif ",
            TokenKind::CfElse => "else ",
            TokenKind::CfReturn => "return ",
            TokenKind::CfContinue => "continue ",
            TokenKind::CfMatch => "match ",
            _ => return None,
        };
        Some(lit)
    }
}

/// One token: opcode in bits 0..7, operand in bits 8..32.
///
/// Bit 7 marks the 4-byte encoding in the stream. It is kept in the word
/// as read; [`TokenWord::opcode`] masks it off.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenWord(pub u32);

impl TokenWord {
    pub const WIDE_MARKER: u8 = 0x80;
    const OPCODE_MASK: u32 = 0x7F;
    const OPERAND_SHIFT: u32 = 8;

    pub fn new(kind: TokenKind, operand: u32) -> Self {
        Self(kind as u32 | (operand << Self::OPERAND_SHIFT))
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn opcode(self) -> u8 {
        (self.0 & Self::OPCODE_MASK) as u8
    }

    pub fn operand(self) -> u32 {
        self.0 >> Self::OPERAND_SHIFT
    }

    pub fn is_wide(self) -> bool {
        self.0 as u8 & Self::WIDE_MARKER != 0
    }

    pub fn kind(self) -> Option<TokenKind> {
        TokenKind::from_opcode(self.opcode())
    }

    /// Read one token: a single byte, or a full little-endian u32 when the
    /// first byte has the wide marker set.
    pub fn parse(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let first = r.peek_u8().map_err(FormatError::truncated("token"))?;
        if first & Self::WIDE_MARKER != 0 {
            let word = r.read_u32().map_err(FormatError::truncated("wide token"))?;
            Ok(Self(word))
        } else {
            r.skip(1).map_err(FormatError::truncated("token"))?;
            Ok(Self(first as u32))
        }
    }
}

impl fmt::Debug for TokenWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}(0x{:X})", kind.name(), self.operand()),
            None => write!(f, "TokenWord(0x{:08X})", self.0),
        }
    }
}

pub fn parse_tokens(r: &mut ByteReader<'_>, count: u32) -> Result<Vec<TokenWord>, FormatError> {
    // every token takes at least one byte, whatever the header claims
    let mut tokens = Vec::with_capacity((count as usize).min(r.remaining()));
    for _ in 0..count {
        tokens.push(TokenWord::parse(r)?);
    }
    Ok(tokens)
}
