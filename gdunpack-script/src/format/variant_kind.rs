use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::FormatError;

/// The engine's closed set of dynamic value types, as tagged in the
/// constant pool.
#[derive(
    FromPrimitive,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[repr(u32)]
pub enum VariantKind {
    Nil = 0,

    Bool,
    Int,
    Real,
    String,

    Vector2,
    Rect2,
    Vector3,
    Transform2D,
    Plane,
    Quat,
    Aabb,
    Basis,
    Transform,

    Color,
    NodePath,
    Rid,
    Object,
    Dictionary,
    Array,

    PoolByteArray,
    PoolIntArray,
    PoolRealArray,
    PoolStringArray,
    PoolVector2Array,
    PoolVector3Array,
    PoolColorArray,
}

impl VariantKind {
    /// Folded into the kind word: 64-bit numbers (and object-as-id).
    pub const FLAG_WIDE: u32 = 1 << 16;

    /// Split a raw kind-and-flags word into `(kind, wide)`.
    pub fn split(raw: u32) -> Result<(Self, bool), FormatError> {
        let wide = raw & Self::FLAG_WIDE != 0;
        let kind = raw & !Self::FLAG_WIDE;
        let kind = Self::from_u32(kind).ok_or(FormatError::UnknownKind(kind))?;
        Ok((kind, wide))
    }

    /// Name of the builtin type as written in source. `Nil` has none.
    pub fn type_name(self) -> Option<&'static str> {
        let name = match self {
            VariantKind::Nil => return None,
            VariantKind::Bool => "bool",
            VariantKind::Int => "int",
            VariantKind::Real => "float",
            VariantKind::String => "String",
            VariantKind::Vector2 => "Vector2",
            VariantKind::Rect2 => "Rect2",
            VariantKind::Vector3 => "Vector3",
            VariantKind::Transform2D => "Transform2D",
            VariantKind::Plane => "Plane",
            VariantKind::Quat => "Quat",
            VariantKind::Aabb => "AABB",
            VariantKind::Basis => "Basis",
            VariantKind::Transform => "Transform",
            VariantKind::Color => "Color",
            VariantKind::NodePath => "NodePath",
            VariantKind::Rid => "RID",
            VariantKind::Object => "Object",
            VariantKind::Dictionary => "Dictionary",
            VariantKind::Array => "Array",
            VariantKind::PoolByteArray => "PoolByteArray",
            VariantKind::PoolIntArray => "PoolIntArray",
            VariantKind::PoolRealArray => "PoolRealArray",
            VariantKind::PoolStringArray => "PoolStringArray",
            VariantKind::PoolVector2Array => "PoolVector2Array",
            VariantKind::PoolVector3Array => "PoolVector3Array",
            VariantKind::PoolColorArray => "PoolColorArray",
        };
        Some(name)
    }
}
