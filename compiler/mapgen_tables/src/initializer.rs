//! Host-side startup code loading the default action and static entries.
//!
//! Runs once, single-threaded, before traffic. A map that cannot be opened
//! or written is a deployment failure: the generated code reports it and
//! exits, without rolling back earlier writes.

use mapgen_ir::{Expr, Span, StaticEntry, TableDecl};

use crate::builder::CodeBuilder;
use crate::instance::{MapDecl, MapInstances};
use crate::key_encoder::{CopyStrategy, KeyEncoder};
use crate::key_layout::{KeyLayout, PREFIX_LEN_BITS};
use crate::lowering::ExprLowering;
use crate::model::TableModel;
use crate::problem::InternalError;
use crate::target::MapTarget;
use crate::value_layout::{ActionId, ActionSlot, ValueLayout, NO_ACTION_MEMBER};

const MAP_HANDLE: &str = "tableFileDescriptor";
const KEY_VAR: &str = "key";
const VALUE_VAR: &str = "value";

/// Emits initialization code for one table.
#[derive(Copy, Clone, Debug)]
pub struct Initializer<'a> {
    pub table: &'a TableDecl,
    pub key: &'a KeyLayout,
    pub encoder: &'a KeyEncoder,
    pub value: &'a ValueLayout,
    pub maps: &'a MapInstances,
    pub model: &'a TableModel,
}

impl Initializer<'_> {
    pub fn emit(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
    ) -> Result<(), InternalError> {
        // Resolve everything first so a contract breach leaves `out` untouched.
        let default_value = match &self.table.default_action {
            Some(call) => self.value_literal(call, lowering)?,
            None => Self::no_action_literal(),
        };
        let entries = match self.entry_literals(lowering)? {
            Some(entries) => match self.maps.primary() {
                Some(primary) => Some((primary, entries)),
                None => {
                    return Err(InternalError::new(
                        format!("{}: static entries on a table without a key", self.table.name),
                        self.table.span,
                    ))
                }
            },
            None => None,
        };

        let default_map = self.maps.default_action();
        out.open_block("");
        self.open_map(out, target, default_map);
        self.write_value(out, &default_value);
        let update = target.user_table_update(MAP_HANDLE, &self.model.zero_key, VALUE_VAR);
        Self::write_update(out, &update, &default_map.name);
        out.close_block("");

        let Some((primary, entries)) = entries else {
            return Ok(());
        };

        out.open_block("");
        self.open_map(out, target, primary);
        for (key, value) in &entries {
            out.open_block("");
            out.writeln(&format!("{} {KEY_VAR} = {key};", self.key.c_type()));
            self.write_value(out, value);
            let update = target.user_table_update(MAP_HANDLE, KEY_VAR, VALUE_VAR);
            Self::write_update(out, &update, &primary.name);
            out.close_block("");
        }
        out.close_block("");
        Ok(())
    }

    fn open_map(&self, out: &mut CodeBuilder, target: &dyn MapTarget, map: &MapDecl) {
        let path = format!("{} \"/{}\"", self.model.map_path_macro, map.name);
        out.writeln(&format!("int {MAP_HANDLE} = {};", target.open_pinned_map(&path)));
        out.writeln(&format!(
            "if ({MAP_HANDLE} < 0) {{ fprintf(stderr, \"map {} not loaded\\n\"); exit(1); }}",
            map.name
        ));
    }

    fn write_value(&self, out: &mut CodeBuilder, literal: &ValueLiteral) {
        out.open_block(&format!("{} {VALUE_VAR} =", self.value.c_type()));
        out.writeln(&format!(".action = {},", literal.discriminant));
        let mut args = String::new();
        for arg in &literal.args {
            args.push_str(arg);
            args.push(',');
        }
        out.writeln(&format!(".u = {{.{} = {{{args}}}}},", literal.member));
        out.close_block(";");
    }

    fn write_update(out: &mut CodeBuilder, update: &str, map: &str) {
        out.writeln(&format!("int ok = {update};"));
        out.writeln(&format!(
            "if (ok != 0) {{ perror(\"Could not write in {map}\"); exit(1); }}"
        ));
    }

    fn no_action_literal() -> ValueLiteral {
        ValueLiteral {
            discriminant: ActionId::NoAction.to_string(),
            member: NO_ACTION_MEMBER.to_owned(),
            args: Vec::new(),
        }
    }

    /// Value for a call of one of the table's actions.
    fn value_literal(
        &self,
        call: &Expr,
        lowering: &dyn ExprLowering,
    ) -> Result<ValueLiteral, InternalError> {
        let action = self.called_action(call)?;
        let Expr::Call { args, .. } = call else {
            return Err(self.not_a_call(call));
        };
        if args.len() != action.params.len() {
            return Err(InternalError::new(
                format!(
                    "{}: `{call}` passes {} arguments to an action with {} parameters",
                    self.table.name,
                    args.len(),
                    action.params.len()
                ),
                self.table.span,
            ));
        }
        Ok(ValueLiteral {
            discriminant: action.discriminant(),
            member: action.member.clone(),
            args: args.iter().map(|arg| lowering.lower_expr(arg)).collect(),
        })
    }

    fn called_action(&self, call: &Expr) -> Result<&ActionSlot, InternalError> {
        call.callee_decl()
            .and_then(|decl| self.value.action(decl))
            .ok_or_else(|| self.not_a_call(call))
    }

    #[cold]
    fn not_a_call(&self, expr: &Expr) -> InternalError {
        InternalError::new(
            format!("{}: `{expr}`: expected a call of one of the table's actions", self.table.name),
            self.table.span,
        )
    }

    fn entry_literals(
        &self,
        lowering: &dyn ExprLowering,
    ) -> Result<Option<Vec<(String, ValueLiteral)>>, InternalError> {
        let Some(entries) = &self.table.entries else {
            return Ok(None);
        };
        let mut literals = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = self.key_literal(entry, lowering)?;
            let value = self.value_literal(&entry.action, lowering)?;
            literals.push((key, value));
        }
        Ok(Some(literals))
    }

    fn key_literal(
        &self,
        entry: &StaticEntry,
        lowering: &dyn ExprLowering,
    ) -> Result<String, InternalError> {
        if entry.keys.len() != self.key.fields().len() {
            return Err(arity_mismatch(self.table, entry.span, entry.keys.len(), self.key.fields().len()));
        }
        let mut literal = String::from("{");
        if self.key.is_lpm() {
            literal.push_str(&format!(
                ".{} = sizeof({})*8 - {PREFIX_LEN_BITS}, ",
                self.key.prefix_field(),
                self.key.c_type()
            ));
        }
        for (encoding, expr) in self.encoder.encodings().zip(&entry.keys) {
            let value = match encoding.strategy {
                CopyStrategy::Assign => lowering.lower_expr(expr),
                CopyStrategy::Swap(swap) => {
                    format!("{}({})", swap.function(), lowering.lower_expr(expr))
                }
                // Byte-array members get the bytes the packet path would store.
                CopyStrategy::Memcpy | CopyStrategy::Reversed => {
                    let Expr::Int(constant) = expr else {
                        return Err(InternalError::new(
                            format!(
                                "{}: static entry key `{expr}` for byte-array member {} \
                                 is not an integer constant",
                                self.table.name, encoding.field
                            ),
                            entry.span,
                        ));
                    };
                    byte_array_literal(&encoding.encode_host(*constant))
                }
            };
            literal.push_str(&format!(".{} = {value}, ", encoding.field));
        }
        if literal.ends_with(", ") {
            literal.truncate(literal.len() - 1);
        }
        literal.push('}');
        Ok(literal)
    }
}

#[cold]
fn arity_mismatch(table: &TableDecl, span: Span, found: usize, expected: usize) -> InternalError {
    InternalError::new(
        format!(
            "{}: static entry has {found} key values, the key has {expected} elements",
            table.name
        ),
        span,
    )
}

/// `{0x0a, 0x0b, 0x0c}`
fn byte_array_literal(bytes: &[u8]) -> String {
    let bytes: Vec<String> = bytes.iter().map(|b| format!("{b:#04x}")).collect();
    format!("{{{}}}", bytes.join(", "))
}

/// A value struct literal, resolved before anything is written.
#[derive(Clone, Debug)]
struct ValueLiteral {
    discriminant: String,
    member: String,
    args: Vec<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "test assertions use unwrap/expect for clarity")]
mod tests;
