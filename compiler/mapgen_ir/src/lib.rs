//! Input representation for the map compiler.
//!
//! Everything here is produced upstream (parsing, name resolution, type
//! checking, constant folding) and is immutable once handed over:
//!
//! - [`TableDecl`] with its [`KeyElement`]s, action list, default action,
//!   static entries and properties
//! - [`ActionDecl`] with typed [`Param`]s and a [`Stmt`] body
//! - [`CounterDecl`] extern instances and [`MethodCall`]s on them
//! - [`Program`], the compilation unit and declaration resolver

mod action;
mod counter;
mod decl;
mod expr;
mod program;
mod span;
mod table;
mod types;

pub use action::{ActionDecl, ActionOrigin, Param};
pub use counter::{CounterDecl, MethodCall};
pub use decl::DeclId;
pub use expr::{BinaryOp, Expr, Stmt, UnaryOp};
pub use program::Program;
pub use span::Span;
pub use table::{
    ActionRef, ConstValue, ExternInstance, KeyElement, Property, PropertyValue, StaticEntry,
    TableDecl,
};
pub use types::Type;
