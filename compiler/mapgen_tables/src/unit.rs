//! Compilation-unit driver.
//!
//! Tables and counters are lowered in declaration order into three
//! sections: types, map instances, and initializer code. A table or counter
//! with a reported problem contributes nothing; its siblings continue. An
//! internal error aborts the whole unit.

use mapgen_diagnostic::DiagnosticQueue;
use mapgen_ir::Program;
use tracing::{debug, warn};

use crate::builder::CodeBuilder;
use crate::counter::CounterTable;
use crate::lowering::ExprLowering;
use crate::model::TableModel;
use crate::naming::NameContext;
use crate::problem::{InternalError, LoweringError};
use crate::table::CompiledTable;
use crate::target::MapTarget;

/// Everything generated for one compilation unit.
#[derive(Debug)]
pub struct UnitOutput {
    /// Key/value structs, action constants and counter typedefs.
    pub types: String,
    /// Map declarations.
    pub instances: String,
    /// Host-side startup code.
    pub initializer: String,
    /// Tables that compiled, for emitting their apply routines.
    pub tables: Vec<CompiledTable>,
    /// Counters that compiled, for emitting their method invocations.
    pub counters: Vec<CounterTable>,
    /// Names taken so far; later emission must draw from the same context.
    pub names: NameContext,
}

pub fn compile_unit(
    program: &Program,
    target: &dyn MapTarget,
    lowering: &dyn ExprLowering,
    model: &TableModel,
    queue: &mut DiagnosticQueue,
) -> Result<UnitOutput, InternalError> {
    let mut names = NameContext::new();
    names.reserve(model.zero_key.clone());

    let mut types = CodeBuilder::new();
    let mut instances = CodeBuilder::new();
    let mut initializer = CodeBuilder::new();
    let mut tables = Vec::with_capacity(program.tables().len());
    let mut counters = Vec::with_capacity(program.counters().len());

    for decl in program.tables() {
        let table = match CompiledTable::compile(decl, program, model, &mut names) {
            Ok(table) => table,
            Err(LoweringError::Problem(problem)) => {
                warn!(table = %decl.name, %problem, "skipping table");
                queue.emit_error(problem.into_diagnostic());
                continue;
            }
            Err(LoweringError::Internal(internal)) => {
                queue.emit_error(internal.into_diagnostic());
                return Err(internal);
            }
        };

        if let Err(internal) = table.emit_initializer(&mut initializer, target, lowering, model) {
            queue.emit_error(internal.into_diagnostic());
            return Err(internal);
        }
        table.emit_types(&mut types);
        table.emit_instance(&mut instances, target);
        tables.push(table);
    }

    for decl in program.counters() {
        match CounterTable::new(decl, model, &mut names) {
            Ok(counter) => {
                counter.emit_types(&mut types);
                counter.emit_instance(&mut instances, target);
                counters.push(counter);
            }
            Err(problem) => {
                warn!(counter = %decl.external_name, %problem, "skipping counter");
                queue.emit_error(problem.into_diagnostic());
            }
        }
    }

    debug!(
        tables = tables.len(),
        counters = counters.len(),
        errors = queue.error_count(),
        "compiled unit"
    );

    Ok(UnitOutput {
        types: types.finish(),
        instances: instances.finish(),
        initializer: initializer.finish(),
        tables,
        counters,
        names,
    })
}
