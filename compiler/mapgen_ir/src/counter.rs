//! Counter extern instances and their method invocations.

use crate::{Expr, ExternInstance, Span};

/// A counter array instance declared in the program.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CounterDecl {
    pub external_name: String,
    pub instance: ExternInstance,
    pub span: Span,
}

/// A method invoked on an extern instance, e.g. `counters.increment(idx)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, args: Vec<Expr>) -> Self {
        MethodCall {
            method: method.into(),
            args,
            span: Span::DUMMY,
        }
    }
}
