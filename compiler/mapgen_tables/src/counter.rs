//! Counter arrays: a secondary map of atomically updated cells.
//!
//! Both methods follow the same protocol: look the cell up; if present,
//! atomically add to it in place; if absent, upsert the initial value.
//! Two first touches of the same index can race and lose one update.
//! That under-count is accepted; no lock is taken.

use mapgen_ir::{ConstValue, CounterDecl, Expr, MethodCall};
use tracing::debug;

use crate::builder::CodeBuilder;
use crate::lowering::ExprLowering;
use crate::map_kind::{capacity, TableKind};
use crate::model::TableModel;
use crate::naming::NameContext;
use crate::problem::{InternalError, LoweringError, TableProblem};
use crate::target::MapTarget;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CounterMethod {
    /// `increment(index)`
    Increment,
    /// `add(index, delta)`
    Add,
}

impl CounterMethod {
    pub fn arity(self) -> usize {
        match self {
            CounterMethod::Increment => 1,
            CounterMethod::Add => 2,
        }
    }
}

/// A lowered counter array instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterTable {
    name: String,
    key_type: String,
    value_type: String,
    kind: TableKind,
    capacity: u32,
    index_c_type: String,
    value_c_type: String,
}

impl CounterTable {
    /// Validate the instance's `max_index` and `sparse` arguments.
    pub fn new(
        decl: &CounterDecl,
        model: &TableModel,
        names: &mut NameContext,
    ) -> Result<Self, TableProblem> {
        let capacity = capacity(
            &decl.external_name,
            decl.instance.arg(&model.max_index_param),
            &model.max_index_param,
            decl.instance.span,
        )?;

        let Some(ConstValue::Bool(sparse)) = decl.instance.arg(&model.sparse_param) else {
            return Err(TableProblem::ExpectedBool {
                owner: decl.external_name.clone(),
                param: model.sparse_param.clone(),
                span: decl.instance.span,
            });
        };
        let kind = if *sparse {
            TableKind::Hash
        } else {
            TableKind::Array
        };

        debug!(counter = %decl.external_name, %kind, capacity, "planned counter map");

        Ok(CounterTable {
            name: decl.external_name.clone(),
            key_type: names.fresh(&format!("{}_key", decl.external_name)),
            value_type: names.fresh(&format!("{}_value", decl.external_name)),
            kind,
            capacity,
            index_c_type: model.counter_index_type.clone(),
            value_c_type: model.counter_value_type.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn emit_types(&self, out: &mut CodeBuilder) {
        out.writeln(&format!("typedef {} {};", self.index_c_type, self.key_type));
        out.writeln(&format!("typedef {} {};", self.value_c_type, self.value_type));
    }

    pub fn emit_instance(&self, out: &mut CodeBuilder, target: &dyn MapTarget) {
        target.emit_table_decl(
            out,
            &self.name,
            self.kind,
            &self.key_type,
            &self.value_type,
            self.capacity,
        );
    }

    /// Add 1 to the cell at `index`, creating it with 1 when absent.
    pub fn emit_increment(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        names: &mut NameContext,
        index: &Expr,
    ) {
        let init = names.fresh("init_val");
        out.writeln(&format!("{} {init} = 1;", self.value_type));
        self.emit_update(out, target, lowering, names, index, &init, "1");
    }

    /// Add `delta` to the cell at `index`, creating it with `delta` when absent.
    pub fn emit_add(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        names: &mut NameContext,
        index: &Expr,
        delta: &Expr,
    ) {
        let inc = names.fresh("inc");
        out.writeln(&format!(
            "{} {inc} = {};",
            self.value_type,
            lowering.lower_expr(delta)
        ));
        self.emit_update(out, target, lowering, names, index, &inc, &inc);
    }

    #[allow(clippy::too_many_arguments, reason = "all emitters share the same context")]
    fn emit_update(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        names: &mut NameContext,
        index: &Expr,
        init: &str,
        delta: &str,
    ) {
        let key = names.fresh("key");
        let value = names.fresh("value");
        out.writeln(&format!("{} *{value};", self.value_type));
        out.writeln(&format!(
            "{} {key} = {};",
            self.key_type,
            lowering.lower_expr(index)
        ));
        out.writeln(&format!("{value} = {};", target.table_lookup(&self.name, &key)));
        out.writeln(&format!("if ({value} != NULL)"));
        out.indent();
        out.writeln(&target.atomic_add(&value, delta));
        out.dedent();
        out.writeln("else");
        out.indent();
        out.writeln(&format!("{};", target.table_update(&self.name, &key, init)));
        out.dedent();
    }

    /// Route a method call on this counter.
    pub fn emit_method_invocation(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        names: &mut NameContext,
        model: &TableModel,
        call: &MethodCall,
    ) -> Result<(), LoweringError> {
        let Some(method) = model.counter_method(&call.method) else {
            return Err(TableProblem::UnknownCounterMethod {
                method: call.method.clone(),
                counter: model.counter_array.clone(),
                span: call.span,
            }
            .into());
        };
        match (method, call.args.as_slice()) {
            (CounterMethod::Increment, [index]) => {
                self.emit_increment(out, target, lowering, names, index);
            }
            (CounterMethod::Add, [index, delta]) => {
                self.emit_add(out, target, lowering, names, index, delta);
            }
            _ => {
                return Err(InternalError::new(
                    format!(
                        "{}.{}: expected {} arguments, found {}",
                        self.name,
                        call.method,
                        method.arity(),
                        call.args.len()
                    ),
                    call.span,
                )
                .into());
            }
        }
        Ok(())
    }
}
