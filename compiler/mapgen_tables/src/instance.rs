//! Map declarations of a table.

use mapgen_ir::TableDecl;

use crate::builder::CodeBuilder;
use crate::key_layout::KeyLayout;
use crate::map_kind::{select_map, MapSelection, TableKind};
use crate::model::TableModel;
use crate::problem::TableProblem;
use crate::target::MapTarget;
use crate::value_layout::ValueLayout;

/// One map declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MapDecl {
    pub name: String,
    pub kind: TableKind,
    pub key_type: String,
    pub value_type: String,
    pub capacity: u32,
}

/// The maps backing one table: the primary map (keyed tables only) and the
/// single-slot default-action map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapInstances {
    primary: Option<MapDecl>,
    default_action: MapDecl,
}

impl MapInstances {
    pub fn plan(
        table: &TableDecl,
        key: &KeyLayout,
        value: &ValueLayout,
        model: &TableModel,
    ) -> Result<Self, TableProblem> {
        let primary = if key.is_keyed() {
            let MapSelection { kind, capacity } = select_map(table, key, model)?;
            Some(MapDecl {
                name: table.external_name.clone(),
                kind,
                key_type: key.c_type(),
                value_type: value.c_type(),
                capacity,
            })
        } else {
            None
        };

        let default_action = MapDecl {
            name: format!("{}_defaultAction", table.external_name),
            kind: TableKind::Array,
            key_type: model.array_index_type.clone(),
            value_type: value.c_type(),
            capacity: 1,
        };

        Ok(MapInstances {
            primary,
            default_action,
        })
    }

    pub fn primary(&self) -> Option<&MapDecl> {
        self.primary.as_ref()
    }

    pub fn default_action(&self) -> &MapDecl {
        &self.default_action
    }

    /// Every declared map, primary first.
    pub fn maps(&self) -> impl Iterator<Item = &MapDecl> {
        self.primary.iter().chain(std::iter::once(&self.default_action))
    }

    pub fn emit(&self, out: &mut CodeBuilder, target: &dyn MapTarget) {
        for map in self.maps() {
            target.emit_table_decl(
                out,
                &map.name,
                map.kind,
                &map.key_type,
                &map.value_type,
                map.capacity,
            );
        }
    }
}
