//! Declaration-keyed substitution over expression and statement trees.

use mapgen_ir::{DeclId, Expr, Stmt};
use mapgen_stack::ensure_sufficient_stack;
use rustc_hash::FxHashMap;

/// Replaces references to particular declarations with fixed expressions.
///
/// Applying it never mutates its input: a new tree is returned with every
/// `Expr::Path` whose declaration is in the map swapped for the mapped
/// expression, and every other node rebuilt unchanged.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    replacements: FxHashMap<DeclId, Expr>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, decl: DeclId, replacement: Expr) {
        self.replacements.insert(decl, replacement);
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    pub fn apply_expr(&self, expr: &Expr) -> Expr {
        ensure_sufficient_stack(|| match expr {
            Expr::Path { decl, .. } => match self.replacements.get(decl) {
                Some(replacement) => replacement.clone(),
                None => expr.clone(),
            },
            Expr::Int(_) | Expr::Bool(_) | Expr::Ident(_) => expr.clone(),
            Expr::Member { base, field } => Expr::Member {
                base: Box::new(self.apply_expr(base)),
                field: field.clone(),
            },
            Expr::PtrMember { base, field } => Expr::PtrMember {
                base: Box::new(self.apply_expr(base)),
                field: field.clone(),
            },
            Expr::Unary { op, operand } => Expr::Unary {
                op: *op,
                operand: Box::new(self.apply_expr(operand)),
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op: *op,
                left: Box::new(self.apply_expr(left)),
                right: Box::new(self.apply_expr(right)),
            },
            Expr::Call { callee, args } => Expr::Call {
                callee: Box::new(self.apply_expr(callee)),
                args: args.iter().map(|arg| self.apply_expr(arg)).collect(),
            },
            Expr::Cast { ty, expr } => Expr::Cast {
                ty: ty.clone(),
                expr: Box::new(self.apply_expr(expr)),
            },
        })
    }

    pub fn apply_stmt(&self, stmt: &Stmt) -> Stmt {
        ensure_sufficient_stack(|| match stmt {
            Stmt::Assign { target, value } => Stmt::Assign {
                target: self.apply_expr(target),
                value: self.apply_expr(value),
            },
            Stmt::Expr(expr) => Stmt::Expr(self.apply_expr(expr)),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => Stmt::If {
                cond: self.apply_expr(cond),
                then_branch: self.apply_block(then_branch),
                else_branch: self.apply_block(else_branch),
            },
            Stmt::Block(body) => Stmt::Block(self.apply_block(body)),
        })
    }

    pub fn apply_block(&self, body: &[Stmt]) -> Vec<Stmt> {
        body.iter().map(|stmt| self.apply_stmt(stmt)).collect()
    }
}
