//! Diagnostic sink shared by every table and counter lowered in a unit.
//!
//! - Error codes for searchability
//! - A message (what went wrong)
//! - A primary span (which construct)
//! - Notes (why, and what to do)
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] can only be obtained by emitting an error into a
//! [`DiagnosticQueue`], so a function returning it proves that the failure
//! was reported.
//!
//! ```text
//! let guarantee = queue.emit_error(problem.into_diagnostic());
//! ```

mod diagnostic;
mod error_code;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
