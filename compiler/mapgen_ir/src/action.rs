//! Action declarations.

use crate::{DeclId, Span, Stmt, Type};

/// Where an action declaration comes from.
///
/// The core library's no-op action is identified by origin rather than by
/// its spelling, so a user action that happens to be called `NoAction` in a
/// different scope is numbered like any other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionOrigin {
    User,
    CoreNoAction,
}

/// A formal parameter of an action.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub decl: DeclId,
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(decl: DeclId, name: impl Into<String>, ty: Type) -> Self {
        Param {
            decl,
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionDecl {
    pub decl: DeclId,
    /// Canonical external name, used for generated identifiers.
    pub external_name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub origin: ActionOrigin,
    pub span: Span,
}

impl ActionDecl {
    pub fn new(decl: DeclId, external_name: impl Into<String>) -> Self {
        ActionDecl {
            decl,
            external_name: external_name.into(),
            params: Vec::new(),
            body: Vec::new(),
            origin: ActionOrigin::User,
            span: Span::DUMMY,
        }
    }

    /// The core library's parameterless no-op action.
    pub fn no_action(decl: DeclId) -> Self {
        ActionDecl {
            origin: ActionOrigin::CoreNoAction,
            ..ActionDecl::new(decl, "NoAction")
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<Stmt>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_no_action(&self) -> bool {
        self.origin == ActionOrigin::CoreNoAction
    }
}
