//! Storage representation of fixed-width scalars in map keys and values.

use mapgen_ir::Type;

/// How a `W`-bit scalar is laid out in a generated struct.
///
/// The width is first rounded up to whole bytes. If that lands on a native
/// integer size the field is declared as that integer; otherwise it becomes
/// a byte array and is copied byte-wise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Storage {
    /// `u8`/`u16`/`u32`/`u64` (or `i*` when signed).
    Native { bits: u32, signed: bool },
    /// `u8 name[len]`.
    Bytes { len: u32 },
}

impl Storage {
    pub fn for_width(width: u32, signed: bool) -> Self {
        let bytes = width.div_ceil(8).max(1);
        match bytes {
            1 | 2 | 4 | 8 => Storage::Native {
                bits: bytes * 8,
                signed,
            },
            len => Storage::Bytes { len },
        }
    }

    /// Storage of a resolved type, if it has a defined width.
    pub fn for_type(ty: &Type) -> Option<Self> {
        ty.width_bits()
            .map(|width| Storage::for_width(width, ty.is_signed()))
    }

    pub fn is_native(self) -> bool {
        matches!(self, Storage::Native { .. })
    }

    pub fn bytes(self) -> u32 {
        match self {
            Storage::Native { bits, .. } => bits / 8,
            Storage::Bytes { len } => len,
        }
    }

    /// The C scalar type; byte arrays decay to `u8*`.
    pub fn c_type(self) -> String {
        match self {
            Storage::Native { bits, signed } => {
                format!("{}{bits}", if signed { 'i' } else { 'u' })
            }
            Storage::Bytes { .. } => "u8*".to_owned(),
        }
    }

    /// Member declaration without the trailing `;`.
    pub fn declare(self, name: &str) -> String {
        match self {
            Storage::Native { .. } => format!("{} {name}", self.c_type()),
            Storage::Bytes { len } => format!("u8 {name}[{len}]"),
        }
    }
}
