//! A fully planned table and its emitters.

use mapgen_ir::{Program, TableDecl};
use tracing::debug;

use crate::builder::CodeBuilder;
use crate::dispatch::ActionDispatcher;
use crate::initializer::Initializer;
use crate::instance::MapInstances;
use crate::key_encoder::KeyEncoder;
use crate::key_layout::KeyLayout;
use crate::lowering::ExprLowering;
use crate::model::TableModel;
use crate::naming::NameContext;
use crate::problem::{InternalError, LoweringError};
use crate::target::MapTarget;
use crate::value_layout::ValueLayout;

/// Variables the apply routine reports into.
#[derive(Copy, Clone, Debug, Default)]
pub struct ApplyOutputs<'a> {
    /// Set to 1 on a primary-map hit, 0 on a miss.
    pub hit: Option<&'a str>,
    /// Receives the executed discriminant.
    pub action_run: Option<&'a str>,
}

/// A table whose layouts, map kind and key encoding have all been decided.
///
/// Every user-facing problem surfaces from [`compile`](Self::compile); the
/// emitters only fail on an upstream contract breach.
#[derive(Clone, Debug)]
pub struct CompiledTable {
    decl: TableDecl,
    key: KeyLayout,
    encoder: KeyEncoder,
    value: ValueLayout,
    maps: MapInstances,
}

impl CompiledTable {
    pub fn compile(
        table: &TableDecl,
        program: &Program,
        model: &TableModel,
        names: &mut NameContext,
    ) -> Result<Self, LoweringError> {
        let key_type = names.fresh(&format!("{}_key", table.external_name));
        let value_type = names.fresh(&format!("{}_value", table.external_name));

        let key = KeyLayout::plan(table, model, key_type)?;
        let value = ValueLayout::plan(table, program, names, value_type)?;
        let maps = MapInstances::plan(table, &key, &value, model)?;
        key.validate()?;
        let encoder = KeyEncoder::plan(&key)?;

        debug!(table = %table.name, maps = maps.maps().count(), "compiled table");
        Ok(CompiledTable {
            decl: table.clone(),
            key,
            encoder,
            value,
            maps,
        })
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn key(&self) -> &KeyLayout {
        &self.key
    }

    pub fn encoder(&self) -> &KeyEncoder {
        &self.encoder
    }

    pub fn value(&self) -> &ValueLayout {
        &self.value
    }

    pub fn maps(&self) -> &MapInstances {
        &self.maps
    }

    /// Key struct, then action constants and value struct.
    pub fn emit_types(&self, out: &mut CodeBuilder) {
        self.key.emit(out);
        self.value.emit(out);
    }

    pub fn emit_instance(&self, out: &mut CodeBuilder, target: &dyn MapTarget) {
        self.maps.emit(out, target);
    }

    /// Fill the key variable `key` from the packet.
    pub fn emit_key(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        key: &str,
        prefix: Option<&str>,
    ) {
        self.encoder.emit_key(out, target, lowering, key, prefix);
    }

    /// Dispatch on the value pointed to by `value`.
    pub fn emit_action(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        value: &str,
        action_run: Option<&str>,
    ) {
        ActionDispatcher::new(&self.value).emit(out, target, lowering, value, action_run);
    }

    pub fn emit_initializer(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        model: &TableModel,
    ) -> Result<(), InternalError> {
        Initializer {
            table: &self.decl,
            key: &self.key,
            encoder: &self.encoder,
            value: &self.value,
            maps: &self.maps,
            model,
        }
        .emit(out, target, lowering)
    }

    /// The table's apply routine: build the key, look it up, fall back to
    /// the default-action slot on a miss, and dispatch.
    pub fn emit_apply(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        names: &mut NameContext,
        model: &TableModel,
        outputs: ApplyOutputs<'_>,
    ) {
        let value = names.fresh("value");
        let default_map = &self.maps.default_action().name;

        out.open_block("");
        out.writeln(&format!("{} *{value} = NULL;", self.value.c_type()));

        if let Some(primary) = self.maps.primary() {
            let key = names.fresh("key");
            out.writeln("/* construct key */");
            out.writeln(&format!("{} {key} = {{}};", self.key.c_type()));
            self.emit_key(out, target, lowering, &key, None);

            out.writeln("/* value */");
            out.writeln(&format!("{value} = {};", target.table_lookup(&primary.name, &key)));
            out.open_block(&format!("if ({value} == NULL)"));
            out.writeln("/* miss; find default action */");
            if let Some(hit) = outputs.hit {
                out.writeln(&format!("{hit} = 0;"));
            }
            out.writeln(&format!(
                "{value} = {};",
                target.table_lookup(default_map, &model.zero_key)
            ));
            match outputs.hit {
                Some(hit) => {
                    out.dedent();
                    out.writeln("} else {");
                    out.indent();
                    out.writeln(&format!("{hit} = 1;"));
                    out.close_block("");
                }
                None => out.close_block(""),
            }
        } else {
            if let Some(hit) = outputs.hit {
                out.writeln(&format!("{hit} = 0;"));
            }
            out.writeln(&format!(
                "{value} = {};",
                target.table_lookup(default_map, &model.zero_key)
            ));
        }

        out.open_block(&format!("if ({value} != NULL)"));
        out.writeln("/* run action */");
        self.emit_action(out, target, lowering, &value, outputs.action_run);
        out.close_block("");
        out.close_block("");
    }
}
