use std::fmt::Write as _;

use gdunpack_core::ByteReader;

use crate::{FormatError, VariantKind};

/// Bit 31 of a node path's name count marks an absolute path.
const NODE_PATH_ABSOLUTE: u32 = 0x8000_0000;

/// One entry of the constant pool.
///
/// `payload` holds the raw bytes exactly as stored; its length and layout
/// are fully determined by `kind` (and `wide` for numbers).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub kind: VariantKind,
    pub wide: bool,
    pub payload: Vec<u8>,
}

/// What a payload rule measured: the bytes that belong to the constant and
/// how far the cursor has to move to reach the next record. The two differ
/// only by trailing alignment padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    payload: usize,
    consumed: usize,
}

impl Span {
    fn exact(len: usize) -> Self {
        Self {
            payload: len,
            consumed: len,
        }
    }
}

impl Constant {
    pub fn new(kind: VariantKind, wide: bool, payload: Vec<u8>) -> Self {
        Self {
            kind,
            wide,
            payload,
        }
    }

    pub fn nil() -> Self {
        Self::new(VariantKind::Nil, false, Vec::new())
    }

    pub fn bool(v: bool) -> Self {
        Self::new(VariantKind::Bool, false, (v as u32).to_le_bytes().to_vec())
    }

    pub fn int(v: i32) -> Self {
        Self::new(VariantKind::Int, false, v.to_le_bytes().to_vec())
    }

    pub fn int64(v: i64) -> Self {
        Self::new(VariantKind::Int, true, v.to_le_bytes().to_vec())
    }

    pub fn real(v: f32) -> Self {
        Self::new(VariantKind::Real, false, v.to_le_bytes().to_vec())
    }

    pub fn real64(v: f64) -> Self {
        Self::new(VariantKind::Real, true, v.to_le_bytes().to_vec())
    }

    /// A string constant with its length prefix, as stored (without padding).
    pub fn string(s: &str) -> Self {
        let mut payload = (s.len() as u32).to_le_bytes().to_vec();
        payload.extend_from_slice(s.as_bytes());
        Self::new(VariantKind::String, false, payload)
    }

    /// Read one `u32 kind_and_flags | payload` record.
    ///
    /// On success the cursor sits at the start of the next record. A bad
    /// payload leaves it just past the kind word.
    pub fn parse(r: &mut ByteReader<'_>) -> Result<Self, FormatError> {
        let start = r.pos();
        let raw_kind = r
            .read_u32()
            .map_err(FormatError::truncated("constant kind"))?;
        let (kind, wide) = VariantKind::split(raw_kind)?;

        let span = measure(kind, wide, r)?;
        let payload = r
            .read_bytes(span.payload)
            .map_err(FormatError::truncated("constant payload"))?
            .to_vec();
        r.skip(span.consumed - span.payload)
            .map_err(FormatError::truncated("constant padding"))?;

        log::trace!(
            "constant {} (wide={}) at 0x{:X}: {} payload bytes",
            kind,
            wide,
            start,
            payload.len()
        );
        Ok(Self {
            kind,
            wide,
            payload,
        })
    }

    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Render the constant the way it appears in decompiled text.
    ///
    /// Numbers and strings get their source form; every other kind falls
    /// back to the payload bytes as uppercase hex.
    pub fn format(&self) -> String {
        match self.kind {
            VariantKind::Nil => "nil".to_string(),
            VariantKind::Bool if !self.payload.is_empty() => {
                (if self.payload[0] != 0 { "True" } else { "False" }).to_string()
            }
            VariantKind::Int => match (self.wide, self.payload.as_slice()) {
                (true, &[a, b, c, d, e, f, g, h]) => i64::from_le_bytes([a, b, c, d, e, f, g, h]).to_string(),
                (false, &[a, b, c, d]) => i32::from_le_bytes([a, b, c, d]).to_string(),
                _ => self.hex(),
            },
            VariantKind::Real => match (self.wide, self.payload.as_slice()) {
                (true, &[a, b, c, d, e, f, g, h]) => f64::from_le_bytes([a, b, c, d, e, f, g, h]).to_string(),
                (false, &[a, b, c, d]) => f32::from_le_bytes([a, b, c, d]).to_string(),
                _ => self.hex(),
            },
            VariantKind::String if self.payload.len() >= 4 => {
                let text = String::from_utf8_lossy(&self.payload[4..]);
                format!("\"{}\"", text.trim_end_matches('\0'))
            }
            _ => self.hex(),
        }
    }

    fn hex(&self) -> String {
        let mut out = String::with_capacity(self.payload.len() * 3);
        for (i, b) in self.payload.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{:02X}", b);
        }
        out
    }
}

/// Measure the payload of a `kind` constant starting at the cursor.
///
/// Works on a copy of the reader, so it never moves the caller's cursor.
fn measure(kind: VariantKind, wide: bool, r: &ByteReader<'_>) -> Result<Span, FormatError> {
    let mut probe = r.clone();
    let span = match kind {
        VariantKind::Nil => Span::exact(0),
        VariantKind::Bool => Span::exact(4),
        VariantKind::Int | VariantKind::Real => Span::exact(if wide { 8 } else { 4 }),
        VariantKind::String => string_span(&mut probe)?,
        VariantKind::Vector2 => Span::exact(8),
        VariantKind::Rect2 => Span::exact(16),
        VariantKind::Vector3 => Span::exact(12),
        VariantKind::Transform2D => Span::exact(24),
        VariantKind::Plane => Span::exact(16),
        VariantKind::Quat => Span::exact(16),
        VariantKind::Aabb => Span::exact(24),
        VariantKind::Basis => Span::exact(36),
        VariantKind::Transform => Span::exact(48),
        VariantKind::Color => Span::exact(4),
        VariantKind::NodePath => node_path_span(&mut probe)?,
        // nothing is written for RIDs in this bytecode version
        VariantKind::Rid => Span::exact(0),
        VariantKind::Object => Span::exact(8),
        VariantKind::PoolByteArray => pool_span(&mut probe, 1)?,
        VariantKind::PoolIntArray => pool_span(&mut probe, 4)?,
        VariantKind::PoolRealArray => pool_span(&mut probe, 4)?,
        VariantKind::PoolVector2Array => pool_span(&mut probe, 8)?,
        VariantKind::PoolVector3Array => pool_span(&mut probe, 12)?,
        VariantKind::PoolColorArray => pool_span(&mut probe, 4)?,
        VariantKind::Dictionary | VariantKind::Array | VariantKind::PoolStringArray => {
            return Err(FormatError::Unsupported(kind))
        }
    };

    if span.consumed > r.remaining() {
        return Err(FormatError::Truncated {
            what: "constant payload",
            offset: r.abs_pos(),
            needed: span.consumed as u64,
            available: r.remaining() as u64,
        });
    }
    Ok(span)
}

/// `u32 len | [len] bytes`, then padding up to a 4-byte boundary. The
/// payload keeps the length prefix.
fn string_span(probe: &mut ByteReader<'_>) -> Result<Span, FormatError> {
    let start = probe.pos();
    let len = probe
        .read_u32()
        .map_err(FormatError::truncated("string length"))? as usize;
    probe
        .skip(len)
        .map_err(FormatError::truncated("string"))?;
    let payload = 4 + len;
    probe
        .align(4)
        .map_err(FormatError::truncated("string padding"))?;

    Ok(Span {
        payload,
        consumed: probe.pos() - start,
    })
}

/// `u32 name_count | u32 sub_name_count | u32 flags`, then that many
/// strings. The whole span, padding included, is the payload.
fn node_path_span(probe: &mut ByteReader<'_>) -> Result<Span, FormatError> {
    let start = probe.pos();
    let name_count = probe
        .read_u32()
        .map_err(FormatError::truncated("node path"))?
        & !NODE_PATH_ABSOLUTE;
    let sub_name_count = probe
        .read_u32()
        .map_err(FormatError::truncated("node path"))?;
    let _flags = probe
        .read_u32()
        .map_err(FormatError::truncated("node path"))?;

    for _ in 0..(name_count as u64 + sub_name_count as u64) {
        string_span(probe)?;
    }

    Ok(Span::exact(probe.pos() - start))
}

/// `u32 count | [count * element_size] bytes`, length prefix included.
fn pool_span(probe: &mut ByteReader<'_>, element_size: usize) -> Result<Span, FormatError> {
    let offset = probe.abs_pos();
    let count = probe
        .read_u32()
        .map_err(FormatError::truncated("pool array length"))? as usize;
    let body = count
        .checked_mul(element_size)
        .ok_or(FormatError::Truncated {
            what: "pool array",
            offset,
            needed: u64::MAX,
            available: probe.remaining() as u64,
        })?;

    Ok(Span::exact(4 + body))
}
