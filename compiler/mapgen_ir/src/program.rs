//! The compilation unit handed to the map compiler.

use rustc_hash::FxHashMap;

use crate::{ActionDecl, CounterDecl, DeclId, TableDecl};

/// Resolved declarations of one compilation unit.
///
/// Acts as the declaration resolver: action references in tables and calls
/// are looked up here by [`DeclId`].
#[derive(Clone, Debug, Default)]
pub struct Program {
    actions: FxHashMap<DeclId, ActionDecl>,
    tables: Vec<TableDecl>,
    counters: Vec<CounterDecl>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: ActionDecl) {
        self.actions.insert(action.decl, action);
    }

    pub fn add_table(&mut self, table: TableDecl) {
        self.tables.push(table);
    }

    pub fn add_counter(&mut self, counter: CounterDecl) {
        self.counters.push(counter);
    }

    pub fn action(&self, decl: DeclId) -> Option<&ActionDecl> {
        self.actions.get(&decl)
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> &[TableDecl] {
        &self.tables
    }

    /// Counters in declaration order.
    pub fn counters(&self) -> &[CounterDecl] {
        &self.counters
    }
}
