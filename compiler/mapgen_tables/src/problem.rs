//! Problems reported while lowering tables and counters.
//!
//! [`TableProblem`] covers invalid user input: it is reported against the
//! offending construct and stops output for that table or counter only.
//! [`InternalError`] is an upstream contract breach and aborts the unit.

use mapgen_diagnostic::{Diagnostic, ErrorCode};
use mapgen_ir::Span;

/// Closed taxonomy of user-facing lowering failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProblemCategory {
    TypeError,
    Unsupported,
    ExpectedProperty,
    InvalidSize,
}

impl ProblemCategory {
    pub fn code(self) -> ErrorCode {
        match self {
            ProblemCategory::TypeError => ErrorCode::E2101,
            ProblemCategory::Unsupported => ErrorCode::E5101,
            ProblemCategory::ExpectedProperty => ErrorCode::E5102,
            ProblemCategory::InvalidSize => ErrorCode::E5103,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableProblem {
    // Type errors (E2101)
    #[error("{expr}: illegal type `{ty}` for key field")]
    KeyWithoutWidth { expr: String, ty: String, span: Span },

    #[error("{action}: illegal type `{ty}` for action parameter `{param}`")]
    ParamWithoutWidth {
        action: String,
        param: String,
        ty: String,
        span: Span,
    },

    // Unsupported (E5101)
    #[error("match of type `{kind}` not supported")]
    UnknownMatchKind { kind: String, span: Span },

    #[error("{field}: lpm field key must be at the end of whole key")]
    LpmNotLast { field: String, span: Span },

    #[error("{table}: only one LPM field allowed")]
    MultipleLpm { table: String, span: Span },

    #[error("{field}: fields wider than 64 bits are not supported ({width} bits)")]
    FieldTooWide { field: String, width: u32, span: Span },

    #[error("unexpected method `{method}` for {counter}")]
    UnknownCounterMethod {
        method: String,
        counter: String,
        span: Span,
    },

    // Expected property (E5102)
    #[error("table {table} does not have an `{property}` property")]
    MissingImplementation {
        table: String,
        property: String,
        span: Span,
    },

    #[error("{table}: expected `{property}` property to be an `extern` block")]
    ImplementationNotExtern {
        table: String,
        property: String,
        span: Span,
    },

    #[error("{table}: implementation must be one of `{array}` or `{hash}`, found `{found}`")]
    UnknownImplementation {
        table: String,
        found: String,
        array: String,
        hash: String,
        span: Span,
    },

    #[error("{owner}: expected a boolean `{param}` argument")]
    ExpectedBool {
        owner: String,
        param: String,
        span: Span,
    },

    // Invalid size (E5103)
    #[error("{owner}: expected an integer `{param}` argument")]
    MissingSize {
        owner: String,
        param: String,
        span: Span,
    },

    #[error("{owner}: size {value} too large")]
    SizeTooLarge { owner: String, value: i128, span: Span },

    #[error("{owner}: size {value} must be positive")]
    NonPositiveSize { owner: String, value: i128, span: Span },
}

impl TableProblem {
    pub fn category(&self) -> ProblemCategory {
        match self {
            TableProblem::KeyWithoutWidth { .. } | TableProblem::ParamWithoutWidth { .. } => {
                ProblemCategory::TypeError
            }
            TableProblem::UnknownMatchKind { .. }
            | TableProblem::LpmNotLast { .. }
            | TableProblem::MultipleLpm { .. }
            | TableProblem::FieldTooWide { .. }
            | TableProblem::UnknownCounterMethod { .. } => ProblemCategory::Unsupported,
            TableProblem::MissingImplementation { .. }
            | TableProblem::ImplementationNotExtern { .. }
            | TableProblem::UnknownImplementation { .. }
            | TableProblem::ExpectedBool { .. } => ProblemCategory::ExpectedProperty,
            TableProblem::MissingSize { .. }
            | TableProblem::SizeTooLarge { .. }
            | TableProblem::NonPositiveSize { .. } => ProblemCategory::InvalidSize,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.category().code()
    }

    /// The construct the problem is reported against.
    pub fn span(&self) -> Span {
        match self {
            TableProblem::KeyWithoutWidth { span, .. }
            | TableProblem::ParamWithoutWidth { span, .. }
            | TableProblem::UnknownMatchKind { span, .. }
            | TableProblem::LpmNotLast { span, .. }
            | TableProblem::MultipleLpm { span, .. }
            | TableProblem::FieldTooWide { span, .. }
            | TableProblem::UnknownCounterMethod { span, .. }
            | TableProblem::MissingImplementation { span, .. }
            | TableProblem::ImplementationNotExtern { span, .. }
            | TableProblem::UnknownImplementation { span, .. }
            | TableProblem::ExpectedBool { span, .. }
            | TableProblem::MissingSize { span, .. }
            | TableProblem::SizeTooLarge { span, .. }
            | TableProblem::NonPositiveSize { span, .. } => *span,
        }
    }

    pub fn into_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            TableProblem::KeyWithoutWidth { .. } => diag
                .with_label(self.span(), "this key element")
                .with_note("key fields must have a fixed bit width"),
            TableProblem::ParamWithoutWidth { .. } => diag
                .with_label(self.span(), "this action")
                .with_note("action parameters are stored in the table value and need a fixed width"),
            TableProblem::UnknownMatchKind { .. } => diag
                .with_label(self.span(), "this match kind")
                .with_note("supported match kinds are exact, ternary, lpm and selector"),
            TableProblem::LpmNotLast { .. } => diag
                .with_label(self.span(), "this lpm field")
                .with_note("only selector fields may follow an lpm field"),
            TableProblem::MultipleLpm { .. } => diag
                .with_label(self.span(), "second lpm field")
                .with_note("add a ternary field or use a single lpm field"),
            TableProblem::FieldTooWide { .. } => diag.with_label(self.span(), "this field"),
            TableProblem::UnknownCounterMethod { .. } => diag
                .with_label(self.span(), "this call")
                .with_note("counters support `increment` and `add`"),
            TableProblem::MissingImplementation { .. } => {
                diag.with_label(self.span(), "table declared here")
            }
            TableProblem::ImplementationNotExtern { .. }
            | TableProblem::UnknownImplementation { .. } => {
                diag.with_label(self.span(), "this property")
            }
            TableProblem::ExpectedBool { .. } | TableProblem::MissingSize { .. } => diag
                .with_label(self.span(), "this instance")
                .with_note("is the model corrupted?"),
            TableProblem::SizeTooLarge { .. } | TableProblem::NonPositiveSize { .. } => {
                diag.with_label(self.span(), "this size")
            }
        }
    }
}

/// Upstream contract breach: the input violates an invariant the front end
/// guarantees.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    pub message: String,
    pub span: Span,
}

impl InternalError {
    #[cold]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        InternalError {
            message: message.into(),
            span,
        }
    }

    pub fn into_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(ErrorCode::E9001)
            .with_message(self.to_string())
            .with_label(self.span, "while lowering this")
            .with_note("this is a compiler bug: the declaration should have been rejected earlier")
    }
}

/// Any failure while lowering one table or counter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoweringError {
    #[error(transparent)]
    Problem(#[from] TableProblem),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl LoweringError {
    pub fn into_diagnostic(&self) -> Diagnostic {
        match self {
            LoweringError::Problem(problem) => problem.into_diagnostic(),
            LoweringError::Internal(internal) => internal.into_diagnostic(),
        }
    }
}
