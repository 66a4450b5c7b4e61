//! Key struct planning.
//!
//! Every key element becomes one member `field<N>` of the key struct, in
//! declaration order. An LPM trie key additionally starts with a 32-bit
//! prefix length, and an empty key gets a one-byte placeholder because
//! maps reject zero-length keys.

use mapgen_ir::{Expr, Span, TableDecl};
use tracing::debug;

use crate::builder::CodeBuilder;
use crate::model::TableModel;
use crate::problem::TableProblem;
use crate::scalar::Storage;

/// Member declared in place of an empty key.
pub const PLACEHOLDER_FIELD: &str = "__dummy_table_key";

/// Width of the prefix-length member of an LPM key.
pub const PREFIX_LEN_BITS: u32 = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Exact,
    Ternary,
    /// Longest-prefix match.
    Lpm,
    /// Only steers group selection; ignored when ordering key fields.
    Selector,
}

/// One planned member of the key struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyField {
    /// `field<N>`.
    pub name: String,
    pub match_kind: MatchKind,
    /// Declared width in bits.
    pub width: u32,
    pub storage: Storage,
    /// Source expression producing the key value.
    pub expr: Expr,
    pub span: Span,
}

/// Shape of a table's key struct.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyLayout {
    type_name: String,
    prefix_field: String,
    /// `false` when the table declares no key at all.
    keyed: bool,
    fields: Vec<KeyField>,
}

impl KeyLayout {
    /// Resolve every key element's width and match kind.
    ///
    /// Fails on the first element whose type has no defined width, or whose
    /// match kind the model does not know.
    pub fn plan(
        table: &TableDecl,
        model: &TableModel,
        type_name: String,
    ) -> Result<Self, TableProblem> {
        let elements = table.key.as_deref().unwrap_or_default();
        let mut fields = Vec::with_capacity(elements.len());

        for (index, element) in elements.iter().enumerate() {
            let Some(width) = element.ty.width_bits() else {
                return Err(TableProblem::KeyWithoutWidth {
                    expr: element.expr.to_string(),
                    ty: element.ty.to_string(),
                    span: element.span,
                });
            };
            let Some(match_kind) = model.match_kind(&element.match_kind) else {
                return Err(TableProblem::UnknownMatchKind {
                    kind: element.match_kind.clone(),
                    span: element.span,
                });
            };
            fields.push(KeyField {
                name: format!("field{index}"),
                match_kind,
                width,
                storage: Storage::for_width(width, element.ty.is_signed()),
                expr: element.expr.clone(),
                span: element.span,
            });
        }

        debug!(
            table = %table.name,
            key_type = %type_name,
            fields = fields.len(),
            "planned key layout"
        );

        Ok(KeyLayout {
            type_name,
            prefix_field: model.prefix_field.clone(),
            keyed: table.key.is_some(),
            fields,
        })
    }

    /// An LPM field must be the last element that is not a selector.
    pub fn validate(&self) -> Result<(), TableProblem> {
        let last = self
            .fields
            .iter()
            .rposition(|f| f.match_kind != MatchKind::Selector);
        for (index, field) in self.fields.iter().enumerate() {
            if field.match_kind == MatchKind::Lpm && Some(index) != last {
                return Err(TableProblem::LpmNotLast {
                    field: field.expr.to_string(),
                    span: field.span,
                });
            }
        }
        Ok(())
    }

    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }

    /// Whether the table declared a key (possibly empty).
    pub fn is_keyed(&self) -> bool {
        self.keyed
    }

    pub fn has_ternary(&self) -> bool {
        self.fields.iter().any(|f| f.match_kind == MatchKind::Ternary)
    }

    pub fn lpm_fields(&self) -> impl Iterator<Item = &KeyField> {
        self.fields.iter().filter(|f| f.match_kind == MatchKind::Lpm)
    }

    /// An LPM field is present and no ternary field overrides it.
    pub fn is_lpm(&self) -> bool {
        !self.has_ternary() && self.lpm_fields().next().is_some()
    }

    pub fn needs_placeholder(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of members of the emitted struct.
    pub fn member_count(&self) -> usize {
        self.fields.len() + usize::from(self.is_lpm()) + usize::from(self.needs_placeholder())
    }

    /// Struct tag, e.g. `fwd_key`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Type as spelled in declarations, e.g. `struct fwd_key`.
    pub fn c_type(&self) -> String {
        format!("struct {}", self.type_name)
    }

    pub fn prefix_field(&self) -> &str {
        &self.prefix_field
    }

    pub fn emit(&self, out: &mut CodeBuilder) {
        out.open_block(&self.c_type());
        if self.is_lpm() {
            let prefix = Storage::for_width(PREFIX_LEN_BITS, false);
            out.writeln(&format!("{};", prefix.declare(&self.prefix_field)));
        }
        for field in &self.fields {
            out.writeln(&format!(
                "{}; /* {} */",
                field.storage.declare(&field.name),
                field.expr
            ));
        }
        if self.needs_placeholder() {
            out.writeln(&format!("u8 {PLACEHOLDER_FIELD};"));
        }
        out.close_block(" __attribute__((aligned(4)));");
    }
}
