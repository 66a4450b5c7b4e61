//! Backing map selection.

use std::fmt;

use mapgen_ir::{ConstValue, ExternInstance, PropertyValue, Span, TableDecl};
use tracing::debug;

use crate::key_layout::KeyLayout;
use crate::model::TableModel;
use crate::problem::TableProblem;

/// Representation of a map in the target runtime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TableKind {
    Array,
    Hash,
    LpmTrie,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableKind::Array => "array",
            TableKind::Hash => "hash",
            TableKind::LpmTrie => "lpm_trie",
        })
    }
}

/// Backing requested by a table's implementation property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImplementationHint {
    Array,
    Hash,
}

impl From<ImplementationHint> for TableKind {
    fn from(hint: ImplementationHint) -> Self {
        match hint {
            ImplementationHint::Array => TableKind::Array,
            ImplementationHint::Hash => TableKind::Hash,
        }
    }
}

/// Resolved primary map of a keyed table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MapSelection {
    pub kind: TableKind,
    pub capacity: u32,
}

/// Resolve the implementation binding of a keyed table into a map kind and
/// capacity.
///
/// The hint is overridden to [`TableKind::LpmTrie`] when the key has an LPM
/// field and no ternary field. A key with more than one LPM field is
/// rejected.
pub fn select_map(
    table: &TableDecl,
    key: &KeyLayout,
    model: &TableModel,
) -> Result<MapSelection, TableProblem> {
    let (instance, hint) = implementation(table, model)?;

    let mut lpm = key.lpm_fields();
    if lpm.next().is_some() {
        if let Some(second) = lpm.next() {
            return Err(TableProblem::MultipleLpm {
                table: table.name.clone(),
                span: second.span,
            });
        }
    }

    let kind = if key.is_lpm() {
        debug!(table = %table.name, ?hint, "lpm key overrides implementation hint");
        TableKind::LpmTrie
    } else {
        TableKind::from(hint)
    };

    let capacity = capacity(
        &table.name,
        instance.arg(&model.size_param),
        &model.size_param,
        instance.span,
    )?;

    debug!(table = %table.name, %kind, capacity, "selected backing map");
    Ok(MapSelection { kind, capacity })
}

fn implementation<'t>(
    table: &'t TableDecl,
    model: &TableModel,
) -> Result<(&'t ExternInstance, ImplementationHint), TableProblem> {
    let Some(property) = table.property(&model.implementation_property) else {
        return Err(TableProblem::MissingImplementation {
            table: table.name.clone(),
            property: model.implementation_property.clone(),
            span: table.span,
        });
    };

    let PropertyValue::Extern(instance) = &property.value else {
        return Err(TableProblem::ImplementationNotExtern {
            table: table.name.clone(),
            property: property.name.clone(),
            span: property.span,
        });
    };

    match model.implementation_hint(&instance.type_name) {
        Some(hint) => Ok((instance, hint)),
        None => Err(TableProblem::UnknownImplementation {
            table: table.name.clone(),
            found: instance.type_name.clone(),
            array: model.array_table.clone(),
            hash: model.hash_table.clone(),
            span: property.span,
        }),
    }
}

/// Validate a declared map capacity: present, integral, fits the platform
/// `int`, and positive.
pub fn capacity(
    owner: &str,
    value: Option<&ConstValue>,
    param: &str,
    span: Span,
) -> Result<u32, TableProblem> {
    let Some(ConstValue::Int(value)) = value else {
        return Err(TableProblem::MissingSize {
            owner: owner.to_owned(),
            param: param.to_owned(),
            span,
        });
    };
    let Ok(value) = i32::try_from(*value) else {
        return Err(TableProblem::SizeTooLarge {
            owner: owner.to_owned(),
            value: *value,
            span,
        });
    };
    match u32::try_from(value) {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(TableProblem::NonPositiveSize {
            owner: owner.to_owned(),
            value: i128::from(value),
            span,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "test assertions use unwrap/expect for clarity")]
mod tests;
