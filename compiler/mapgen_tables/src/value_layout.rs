//! Action numbering and the tagged-union value struct.
//!
//! ```text
//! #define FWD_ACT_SET_PORT 1
//! struct fwd_value {
//!     unsigned int action;
//!     union {
//!         struct {
//!         } _NoAction;
//!         struct {
//!             u16 port;
//!         } set_port;
//!     } u;
//! };
//! ```

use std::fmt;
use std::num::NonZeroU32;

use mapgen_ir::{DeclId, Program, Stmt, TableDecl};
use tracing::debug;

use crate::builder::CodeBuilder;
use crate::naming::NameContext;
use crate::problem::{InternalError, LoweringError, TableProblem};
use crate::scalar::Storage;

/// Union member reserved for the no-op action.
pub const NO_ACTION_MEMBER: &str = "_NoAction";

/// Discriminant stored in a table value.
///
/// The core no-op action is always `0` and never numbered; every other
/// action of a table gets the next ID from 1 in list order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionId {
    NoAction,
    Numbered(NonZeroU32),
}

impl ActionId {
    pub fn value(self) -> u32 {
        match self {
            ActionId::NoAction => 0,
            ActionId::Numbered(id) => id.get(),
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A parameter slot inside an action's union member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSlot {
    pub decl: DeclId,
    pub name: String,
    pub width: u32,
    pub storage: Storage,
}

/// A table action with its assigned discriminant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSlot {
    pub decl: DeclId,
    pub external_name: String,
    pub id: ActionId,
    /// `#define` naming the discriminant; `None` for the no-op action.
    pub constant: Option<String>,
    /// Member of the value union holding the parameters.
    pub member: String,
    pub params: Vec<ParamSlot>,
    pub body: Vec<Stmt>,
}

impl ActionSlot {
    /// The discriminant as spelled in generated code.
    pub fn discriminant(&self) -> String {
        match &self.constant {
            Some(constant) => constant.clone(),
            None => self.id.to_string(),
        }
    }
}

/// Layout of a table's value struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueLayout {
    type_name: String,
    /// In the table's declared order.
    actions: Vec<ActionSlot>,
}

impl ValueLayout {
    /// Number the table's actions and lay out their parameters.
    ///
    /// Action constants are drawn from `names`, so they stay unique across
    /// every table sharing the context.
    pub fn plan(
        table: &TableDecl,
        program: &Program,
        names: &mut NameContext,
        type_name: String,
    ) -> Result<Self, LoweringError> {
        let mut actions = Vec::with_capacity(table.actions.len());
        let mut next_id = NonZeroU32::MIN;

        for action_ref in &table.actions {
            let Some(action) = program.action(action_ref.decl) else {
                return Err(InternalError::new(
                    format!("{}: action {:?} is not declared", table.name, action_ref.decl),
                    action_ref.span,
                )
                .into());
            };

            let mut params = Vec::with_capacity(action.params.len());
            for param in &action.params {
                let Some(storage) = Storage::for_type(&param.ty) else {
                    return Err(TableProblem::ParamWithoutWidth {
                        action: action.external_name.clone(),
                        param: param.name.clone(),
                        ty: param.ty.to_string(),
                        span: action.span,
                    }
                    .into());
                };
                params.push(ParamSlot {
                    decl: param.decl,
                    name: param.name.clone(),
                    width: param.ty.width_bits().unwrap_or_default(),
                    storage,
                });
            }

            let (id, constant, member) = if action.is_no_action() {
                (ActionId::NoAction, None, NO_ACTION_MEMBER.to_owned())
            } else {
                let id = ActionId::Numbered(next_id);
                next_id = next_id.saturating_add(1);
                let constant =
                    names.fresh_macro(&format!("{}_ACT_{}", table.external_name, action.external_name));
                (id, Some(constant), action.external_name.clone())
            };

            actions.push(ActionSlot {
                decl: action.decl,
                external_name: action.external_name.clone(),
                id,
                constant,
                member,
                params,
                body: action.body.clone(),
            });
        }

        debug!(
            table = %table.name,
            value_type = %type_name,
            actions = actions.len(),
            "planned value layout"
        );

        Ok(ValueLayout { type_name, actions })
    }

    /// Actions in the table's declared order.
    pub fn actions(&self) -> &[ActionSlot] {
        &self.actions
    }

    /// Actions ordered by discriminant, the no-op action first.
    pub fn actions_by_id(&self) -> Vec<&ActionSlot> {
        let mut sorted: Vec<&ActionSlot> = self.actions.iter().collect();
        sorted.sort_by_key(|a| a.id);
        sorted
    }

    pub fn action(&self, decl: DeclId) -> Option<&ActionSlot> {
        self.actions.iter().find(|a| a.decl == decl)
    }

    pub fn action_by_id(&self, id: ActionId) -> Option<&ActionSlot> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn c_type(&self) -> String {
        format!("struct {}", self.type_name)
    }

    /// Emit the discriminant constants followed by the value struct.
    pub fn emit(&self, out: &mut CodeBuilder) {
        for action in &self.actions {
            if let Some(constant) = &action.constant {
                out.writeln(&format!("#define {constant} {}", action.id));
            }
        }

        out.open_block(&self.c_type());
        out.writeln("unsigned int action;");
        out.open_block("union");

        // The no-op member comes first even when the table does not list it.
        out.open_block("struct");
        out.close_block(&format!(" {NO_ACTION_MEMBER};"));

        for action in self.actions.iter().filter(|a| a.id != ActionId::NoAction) {
            out.open_block("struct");
            for param in &action.params {
                out.writeln(&format!("{};", param.storage.declare(&param.name)));
            }
            out.close_block(&format!(" {};", action.member));
        }

        out.close_block(" u;");
        out.close_block(";");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "test assertions use unwrap/expect for clarity")]
mod tests;
