//! Discriminant-based dispatch over a table value.
//!
//! ```text
//! switch (value->action) {
//!     case FWD_ACT_SET_PORT: {
//!         bpf_trace_message("Control: executing action set_port\n");
//!         egress = value->u.set_port.port;
//!         break;
//!     }
//!     default:
//!         bpf_trace_message("Control: Invalid action type, aborting\n");
//!         return TC_ACT_SHOT;
//! }
//! ```

use mapgen_ir::Expr;
use tracing::trace;

use crate::builder::CodeBuilder;
use crate::lowering::ExprLowering;
use crate::substitution::Substitution;
use crate::target::MapTarget;
use crate::value_layout::{ActionId, ActionSlot, ValueLayout};

/// Parameters up to this width are traced by value.
const MAX_TRACED_PARAM_BITS: u32 = 64;

/// Name traced by the branch-0 case of a table that does not list the no-op.
const NO_ACTION_NAME: &str = "NoAction";

/// Emits the dispatch switch of one table.
#[derive(Copy, Clone, Debug)]
pub struct ActionDispatcher<'a> {
    layout: &'a ValueLayout,
}

impl<'a> ActionDispatcher<'a> {
    pub fn new(layout: &'a ValueLayout) -> Self {
        ActionDispatcher { layout }
    }

    /// Parameter references of `action` rewritten to reads from the union
    /// member behind the value pointer `value`.
    pub fn substitution(action: &ActionSlot, value: &str) -> Substitution {
        let mut subst = Substitution::new();
        for param in &action.params {
            subst.insert(param.decl, Self::param_access(action, value, &param.name));
        }
        subst
    }

    fn param_access(action: &ActionSlot, value: &str, param: &str) -> Expr {
        Expr::ident(value)
            .ptr_member("u")
            .member(action.member.as_str())
            .member(param)
    }

    /// Emit the switch over `value->action`, where `value` points at a
    /// table value.
    ///
    /// Branch 0 is always present, since the default-action slot holds the
    /// no-op when the table declares no default.
    ///
    /// When `action_run` is given, the executed discriminant is stored into
    /// that variable after the switch.
    pub fn emit(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        value: &str,
        action_run: Option<&str>,
    ) {
        out.open_block(&format!("switch ({value}->action)"));

        // A miss without a default action stores discriminant 0, listed or not.
        if self.layout.action_by_id(ActionId::NoAction).is_none() {
            out.open_block(&format!("case {}:", ActionId::NoAction));
            target.emit_trace_message(
                out,
                &format!("Control: executing action {NO_ACTION_NAME}"),
                &[],
            );
            out.writeln("break;");
            out.close_block("");
        }

        for action in self.layout.actions_by_id() {
            trace!(action = %action.external_name, id = %action.id, "dispatch branch");
            out.open_block(&format!("case {}:", action.discriminant()));
            Self::emit_branch(out, target, lowering, action, value);
            out.writeln("break;");
            out.close_block("");
        }

        out.writeln("default:");
        out.indent();
        target.emit_trace_message(out, "Control: Invalid action type, aborting", &[]);
        out.writeln(&format!("return {};", target.abort_return_code()));
        out.dedent();
        out.close_block("");

        if let Some(action_run) = action_run {
            out.writeln(&format!("{action_run} = {value}->action;"));
        }
    }

    fn emit_branch(
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        action: &ActionSlot,
        value: &str,
    ) {
        target.emit_trace_message(
            out,
            &format!("Control: executing action {}", action.external_name),
            &[],
        );
        for param in &action.params {
            if param.width <= MAX_TRACED_PARAM_BITS {
                let access = lowering.lower_expr(&Self::param_access(action, value, &param.name));
                target.emit_trace_message(
                    out,
                    &format!("Control: param {}=0x%llx ({} bits)", param.name, param.width),
                    &[format!("(unsigned long long) ({access})").as_str()],
                );
            } else {
                target.emit_trace_message(
                    out,
                    &format!("Control: param {} ({} bits)", param.name, param.width),
                    &[],
                );
            }
        }

        let body = Self::substitution(action, value).apply_block(&action.body);
        for stmt in &body {
            lowering.lower_stmt(out, stmt);
        }
    }
}
