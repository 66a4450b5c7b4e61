//! Resolved source types of key fields and action parameters.

use std::fmt;

/// A resolved type as handed over by the type checker.
///
/// Only fixed-width scalars can be stored in a map key or an action
/// parameter slot; everything else reports `None` from [`Type::width_bits`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// `bit<W>` or `int<W>`.
    Bits { width: u32, signed: bool },
    /// `bool`, stored as a single bit.
    Bool,
    /// `varbit<N>`: variable length, no fixed width.
    Varbit { max_width: u32 },
    /// Header type.
    Header(String),
    /// Struct type.
    Struct(String),
    /// The `error` type.
    Error,
}

impl Type {
    /// Unsigned `bit<width>`.
    #[inline]
    pub const fn bits(width: u32) -> Self {
        Type::Bits {
            width,
            signed: false,
        }
    }

    /// Signed `int<width>`.
    #[inline]
    pub const fn int(width: u32) -> Self {
        Type::Bits {
            width,
            signed: true,
        }
    }

    /// Width in bits, if the type has a defined one.
    pub fn width_bits(&self) -> Option<u32> {
        match self {
            Type::Bits { width, .. } => Some(*width),
            Type::Bool => Some(1),
            Type::Varbit { .. } | Type::Header(_) | Type::Struct(_) | Type::Error => None,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Type::Bits { signed: true, .. })
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bits {
                width,
                signed: false,
            } => write!(f, "bit<{width}>"),
            Type::Bits {
                width,
                signed: true,
            } => write!(f, "int<{width}>"),
            Type::Bool => f.write_str("bool"),
            Type::Varbit { max_width } => write!(f, "varbit<{max_width}>"),
            Type::Header(name) | Type::Struct(name) => f.write_str(name),
            Type::Error => f.write_str("error"),
        }
    }
}
