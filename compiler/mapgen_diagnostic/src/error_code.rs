//! Error codes for map compiler diagnostics.
//!
//! The first digit names the phase:
//! - E2xxx: type errors in table declarations
//! - E5xxx: map lowering errors
//! - E9xxx: internal compiler errors

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Type Errors (E2xxx)
    /// Key field type has no defined bit width
    E2101,

    // Map Lowering Errors (E5xxx)
    /// Unsupported construct (match kind, key ordering, width, counter method)
    E5101,
    /// Missing or malformed table implementation binding
    E5102,
    /// Invalid map capacity
    E5103,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All variants, for exhaustive testing.
    ///
    /// Kept in sync with `as_str()`, which the compiler checks for
    /// exhaustiveness.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::E2101,
        ErrorCode::E5101,
        ErrorCode::E5102,
        ErrorCode::E5103,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E2101 => "E2101",
            ErrorCode::E5101 => "E5101",
            ErrorCode::E5102 => "E5102",
            ErrorCode::E5103 => "E5103",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this is a type error (E2xxx range).
    pub fn is_type_error(&self) -> bool {
        matches!(self, ErrorCode::E2101)
    }

    /// Check if this is a map lowering error (E5xxx range).
    pub fn is_lowering_error(&self) -> bool {
        matches!(self, ErrorCode::E5101 | ErrorCode::E5102 | ErrorCode::E5103)
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an error code string like `"E5101"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
