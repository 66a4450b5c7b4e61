use mapgen_ir::{BinaryOp, DeclId, UnaryOp};
use pretty_assertions::assert_eq;

use super::*;

fn port() -> Expr {
    Expr::path("port", DeclId::new(7))
}

#[test]
fn member_chains() {
    let expr = Expr::ident("value").ptr_member("u").member("fwd").member("port");
    assert_eq!(CLowering.lower_expr(&expr), "value->u.fwd.port");
}

#[test]
fn nested_operands_are_parenthesized() {
    let expr = Expr::binary(
        BinaryOp::Mul,
        Expr::binary(BinaryOp::Add, port(), Expr::Int(1)),
        Expr::Unary {
            op: UnaryOp::BitNot,
            operand: Box::new(Expr::Int(0)),
        },
    );
    assert_eq!(CLowering.lower_expr(&expr), "(port + 1) * (~0)");
}

#[test]
fn casts_use_storage_types() {
    let expr = Expr::Cast {
        ty: Type::bits(16),
        expr: Box::new(Expr::Bool(true)),
    };
    assert_eq!(CLowering.lower_expr(&expr), "(u16)1");
}

#[test]
fn statements_render_with_blocks() {
    let stmt = Stmt::If {
        cond: Expr::binary(BinaryOp::Eq, port(), Expr::Int(0)),
        then_branch: vec![Stmt::Expr(Expr::call(Expr::ident("drop"), vec![]))],
        else_branch: vec![Stmt::Assign {
            target: Expr::ident("egress"),
            value: port(),
        }],
    };
    let mut out = CodeBuilder::new();
    CLowering.lower_stmt(&mut out, &stmt);
    assert_eq!(
        out.finish(),
        "if (port == 0) {\n    drop();\n} else {\n    egress = port;\n}\n"
    );
}
