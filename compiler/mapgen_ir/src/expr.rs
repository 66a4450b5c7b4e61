//! Expression and statement trees of action bodies and table properties.
//!
//! These trees are produced by the front end after name resolution and type
//! checking. Rendering them as target source is the job of an external
//! lowering; the map compiler only rewrites them (parameter substitution)
//! and prints them in source form for comments and trace messages.

use std::fmt;

use crate::{DeclId, Type};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// A value-bearing expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Unsigned integer literal.
    Int(u64),
    Bool(bool),
    /// Reference to a resolved declaration.
    Path { name: String, decl: DeclId },
    /// Compiler-generated identifier with no source declaration.
    Ident(String),
    /// `base.field`
    Member { base: Box<Expr>, field: String },
    /// `base->field`
    PtrMember { base: Box<Expr>, field: String },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Cast { ty: Type, expr: Box<Expr> },
}

impl Expr {
    pub fn path(name: impl Into<String>, decl: DeclId) -> Self {
        Expr::Path {
            name: name.into(),
            decl,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    #[must_use]
    pub fn member(self, field: impl Into<String>) -> Self {
        Expr::Member {
            base: Box::new(self),
            field: field.into(),
        }
    }

    #[must_use]
    pub fn ptr_member(self, field: impl Into<String>) -> Self {
        Expr::PtrMember {
            base: Box::new(self),
            field: field.into(),
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// Declaration called by this expression, if it is a direct call.
    pub fn callee_decl(&self) -> Option<DeclId> {
        match self {
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::Path { decl, .. } => Some(*decl),
                _ => None,
            },
            _ => None,
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, Expr::Binary { .. } | Expr::Cast { .. })
    }
}

struct Operand<'a>(&'a Expr);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_compound() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Source-form rendering, used in comments and trace messages.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(value) => write!(f, "{value}"),
            Expr::Bool(value) => write!(f, "{value}"),
            Expr::Path { name, .. } | Expr::Ident(name) => f.write_str(name),
            Expr::Member { base, field } => write!(f, "{}.{field}", Operand(base)),
            Expr::PtrMember { base, field } => write!(f, "{}->{field}", Operand(base)),
            Expr::Unary { op, operand } => write!(f, "{}{}", op.as_symbol(), Operand(operand)),
            Expr::Binary { op, left, right } => write!(
                f,
                "{} {} {}",
                Operand(left),
                op.as_symbol(),
                Operand(right)
            ),
            Expr::Call { callee, args } => {
                write!(f, "{}(", Operand(callee))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expr::Cast { ty, expr } => write!(f, "({ty}){}", Operand(expr)),
        }
    }
}

/// A statement of an action body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stmt {
    Assign { target: Expr, value: Expr },
    Expr(Expr),
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Vec<Stmt>,
    },
    Block(Vec<Stmt>),
}
