//! Key construction: filling each key member from its source value.
//!
//! Only the LPM field of an LPM trie is converted to network byte order,
//! because the trie compares prefixes most-significant byte first. Every
//! other member is stored in host order, the same representation the
//! initializer writes for static entries.

use mapgen_ir::{Expr, Span};
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::builder::CodeBuilder;
use crate::key_layout::{KeyLayout, MatchKind, PREFIX_LEN_BITS};
use crate::lowering::ExprLowering;
use crate::problem::TableProblem;
use crate::scalar::Storage;
use crate::target::MapTarget;

/// Widest key member a map key can hold.
pub const MAX_KEY_FIELD_BITS: u32 = 64;

/// Network byte order conversion of a native scalar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ByteSwap {
    Htons,
    Htonl,
    Htonll,
}

impl ByteSwap {
    fn for_bytes(bytes: u32) -> Option<Self> {
        match bytes {
            2 => Some(ByteSwap::Htons),
            4 => Some(ByteSwap::Htonl),
            8 => Some(ByteSwap::Htonll),
            _ => None,
        }
    }

    pub fn function(self) -> &'static str {
        match self {
            ByteSwap::Htons => "bpf_htons",
            ByteSwap::Htonl => "bpf_htonl",
            ByteSwap::Htonll => "bpf_htonll",
        }
    }
}

/// How a key member is written from its source value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CopyStrategy {
    /// Plain assignment in host order.
    Assign,
    /// Assignment through a network byte order conversion.
    Swap(ByteSwap),
    /// `memcpy` of the value's bytes.
    Memcpy,
    /// Byte-wise copy in reverse order.
    ///
    /// Emulates network byte order for LPM members that are not native
    /// scalars. Assumes a little-endian host; not validated above 64 bits.
    Reversed,
}

impl CopyStrategy {
    /// Whether the member is assigned as a scalar (and so can be traced by value).
    pub fn is_scalar(self) -> bool {
        matches!(self, CopyStrategy::Assign | CopyStrategy::Swap(_))
    }
}

/// Encoding plan of one key member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyFieldEncoding {
    pub field: String,
    pub width: u32,
    pub bytes: u32,
    pub strategy: CopyStrategy,
}

impl KeyFieldEncoding {
    /// Decide the copy strategy for a member of `width` bits.
    ///
    /// `network_order` is set for the LPM field of an LPM trie.
    pub fn new(
        field: &str,
        width: u32,
        network_order: bool,
        span: Span,
    ) -> Result<Self, TableProblem> {
        if width > MAX_KEY_FIELD_BITS {
            return Err(TableProblem::FieldTooWide {
                field: field.to_owned(),
                width,
                span,
            });
        }
        let storage = Storage::for_width(width, false);
        let bytes = storage.bytes();
        let strategy = match (storage.is_native(), network_order) {
            (true, true) => ByteSwap::for_bytes(bytes).map_or(CopyStrategy::Assign, CopyStrategy::Swap),
            (true, false) => CopyStrategy::Assign,
            (false, true) => CopyStrategy::Reversed,
            (false, false) => CopyStrategy::Memcpy,
        };
        Ok(KeyFieldEncoding {
            field: field.to_owned(),
            width,
            bytes,
            strategy,
        })
    }

    /// Bytes the emitted code stores for `value` on a little-endian host.
    ///
    /// `value` is the source value as held in host memory; bits above the
    /// member's byte length are dropped.
    pub fn encode_host(&self, value: u64) -> SmallVec<[u8; 8]> {
        let len = self.len();
        let little = value.to_le_bytes();
        let mut stored: SmallVec<[u8; 8]> = little[..len].iter().copied().collect();
        if self.is_network_order() {
            stored.reverse();
        }
        stored
    }

    /// Inverse of [`encode_host`](Self::encode_host).
    pub fn decode_host(&self, stored: &[u8]) -> u64 {
        let len = self.len().min(stored.len());
        let mut little = [0u8; 8];
        little[..len].copy_from_slice(&stored[..len]);
        if self.is_network_order() {
            little[..len].reverse();
        }
        u64::from_le_bytes(little)
    }

    fn len(&self) -> usize {
        usize::try_from(self.bytes).map_or(8, |bytes| bytes.min(8))
    }

    fn is_network_order(&self) -> bool {
        matches!(self.strategy, CopyStrategy::Swap(_) | CopyStrategy::Reversed)
    }
}

/// Key construction plan for one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEncoder {
    fields: Vec<(KeyFieldEncoding, Expr)>,
    /// Prefix member when the key belongs to an LPM trie.
    prefix_field: Option<String>,
}

impl KeyEncoder {
    pub fn plan(layout: &KeyLayout) -> Result<Self, TableProblem> {
        let lpm_table = layout.is_lpm();
        let mut fields = Vec::with_capacity(layout.fields().len());

        for field in layout.fields() {
            let network_order = lpm_table && field.match_kind == MatchKind::Lpm;
            let encoding = KeyFieldEncoding::new(&field.name, field.width, network_order, field.span)?;
            trace!(field = %field.name, width = field.width, strategy = ?encoding.strategy, "key field encoding");
            if encoding.strategy == CopyStrategy::Reversed {
                warn!(
                    field = %field.name,
                    width = field.width,
                    "lpm key copied in reversed byte order; assumes a little-endian host"
                );
            }
            fields.push((encoding, field.expr.clone()));
        }

        Ok(KeyEncoder {
            fields,
            prefix_field: lpm_table.then(|| layout.prefix_field().to_owned()),
        })
    }

    pub fn encodings(&self) -> impl Iterator<Item = &KeyFieldEncoding> {
        self.fields.iter().map(|(encoding, _)| encoding)
    }

    /// Emit statements filling `key` from the packet.
    ///
    /// For an LPM trie the prefix length is set to full specificity unless
    /// `prefix` supplies an explicit value.
    pub fn emit_key(
        &self,
        out: &mut CodeBuilder,
        target: &dyn MapTarget,
        lowering: &dyn ExprLowering,
        key: &str,
        prefix: Option<&str>,
    ) {
        if let Some(prefix_field) = &self.prefix_field {
            let value = match prefix {
                Some(prefix) => prefix.to_owned(),
                None => format!("sizeof({key})*8 - {PREFIX_LEN_BITS}"),
            };
            out.writeln(&format!("{key}.{prefix_field} = {value};"));
        }

        for (encoding, expr) in &self.fields {
            let source = lowering.lower_expr(expr);
            let member = format!("{key}.{}", encoding.field);
            match encoding.strategy {
                CopyStrategy::Assign => out.writeln(&format!("{member} = {source};")),
                CopyStrategy::Swap(swap) => {
                    out.writeln(&format!("{member} = {}({source});", swap.function()));
                }
                CopyStrategy::Memcpy => {
                    out.writeln(&format!("memcpy(&{member}, &{source}, {});", encoding.bytes));
                }
                CopyStrategy::Reversed => {
                    for byte in 0..encoding.bytes {
                        let from = encoding.bytes - byte - 1;
                        out.writeln(&format!("{member}[{byte}] = ({source})[{from}];"));
                    }
                }
            }

            if encoding.strategy.is_scalar() {
                let value = format!("(unsigned long long) {member}");
                target.emit_trace_message(out, &format!("Control: key {expr}=0x%llx"), &[value.as_str()]);
            } else {
                target.emit_trace_message(out, &format!("Control: key {expr}"), &[]);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, reason = "test assertions use unwrap/expect for clarity")]
mod tests;
