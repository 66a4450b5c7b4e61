//! Expression-to-source lowering seam.
//!
//! Rendering arbitrary expressions belongs to the surrounding code
//! generator. The map compiler only hands it trees (possibly rewritten by a
//! [`Substitution`](crate::Substitution)) and splices the returned text.

use mapgen_ir::{Expr, Stmt, Type};
use mapgen_stack::ensure_sufficient_stack;

use crate::builder::CodeBuilder;
use crate::scalar::Storage;

/// Renders expressions and statements as target source.
pub trait ExprLowering {
    fn lower_expr(&self, expr: &Expr) -> String;

    /// Emit one statement, at the builder's current indentation.
    fn lower_stmt(&self, out: &mut CodeBuilder, stmt: &Stmt);
}

/// Plain C rendering.
#[derive(Copy, Clone, Debug, Default)]
pub struct CLowering;

impl CLowering {
    fn operand(&self, expr: &Expr) -> String {
        match expr {
            Expr::Binary { .. } | Expr::Cast { .. } | Expr::Unary { .. } => {
                format!("({})", self.lower_expr(expr))
            }
            _ => self.lower_expr(expr),
        }
    }

    fn type_name(ty: &Type) -> String {
        match Storage::for_type(ty) {
            Some(storage) => storage.c_type(),
            None => match ty {
                Type::Header(name) | Type::Struct(name) => format!("struct {name}"),
                _ => "u8*".to_owned(),
            },
        }
    }
}

impl ExprLowering for CLowering {
    fn lower_expr(&self, expr: &Expr) -> String {
        ensure_sufficient_stack(|| match expr {
            Expr::Int(value) => value.to_string(),
            Expr::Bool(value) => u8::from(*value).to_string(),
            Expr::Path { name, .. } | Expr::Ident(name) => name.clone(),
            Expr::Member { base, field } => format!("{}.{field}", self.operand(base)),
            Expr::PtrMember { base, field } => format!("{}->{field}", self.operand(base)),
            Expr::Unary { op, operand } => format!("{}{}", op.as_symbol(), self.operand(operand)),
            Expr::Binary { op, left, right } => format!(
                "{} {} {}",
                self.operand(left),
                op.as_symbol(),
                self.operand(right)
            ),
            Expr::Call { callee, args } => {
                let args: Vec<String> = args.iter().map(|a| self.lower_expr(a)).collect();
                format!("{}({})", self.operand(callee), args.join(", "))
            }
            Expr::Cast { ty, expr } => format!("({}){}", Self::type_name(ty), self.operand(expr)),
        })
    }

    fn lower_stmt(&self, out: &mut CodeBuilder, stmt: &Stmt) {
        ensure_sufficient_stack(|| match stmt {
            Stmt::Assign { target, value } => out.writeln(&format!(
                "{} = {};",
                self.lower_expr(target),
                self.lower_expr(value)
            )),
            Stmt::Expr(expr) => out.writeln(&format!("{};", self.lower_expr(expr))),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                out.open_block(&format!("if ({})", self.lower_expr(cond)));
                for stmt in then_branch {
                    self.lower_stmt(out, stmt);
                }
                if else_branch.is_empty() {
                    out.close_block("");
                } else {
                    out.dedent();
                    out.writeln("} else {");
                    out.indent();
                    for stmt in else_branch {
                        self.lower_stmt(out, stmt);
                    }
                    out.close_block("");
                }
            }
            Stmt::Block(body) => {
                out.open_block("");
                for stmt in body {
                    self.lower_stmt(out, stmt);
                }
                out.close_block("");
            }
        });
    }
}

#[cfg(test)]
mod tests;
