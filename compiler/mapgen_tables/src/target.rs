//! Target map backend.
//!
//! The map compiler decides layouts and control flow; the backend owns the
//! spelling of map declarations, lookups, updates and trace records.
//! [`KernelTarget`] renders them for the in-kernel packet filter runtime.

use crate::builder::CodeBuilder;
use crate::map_kind::TableKind;

/// Primitives of a key-value map runtime, as seen by generated code.
pub trait MapTarget {
    /// Declare a map instance.
    fn emit_table_decl(
        &self,
        out: &mut CodeBuilder,
        name: &str,
        kind: TableKind,
        key_type: &str,
        value_type: &str,
        capacity: u32,
    );

    /// Expression looking up `key` in `map`; a pointer to the value or `NULL`.
    fn table_lookup(&self, map: &str, key: &str) -> String;

    /// Expression upserting `(key, value)` into `map` from packet context.
    fn table_update(&self, map: &str, key: &str, value: &str) -> String;

    /// Expression upserting `(key, value)` through a host-side map handle.
    /// Evaluates to zero on success.
    fn user_table_update(&self, handle: &str, key: &str, value: &str) -> String;

    /// Expression opening a pinned map at `path` from the host.
    /// Evaluates to a negative handle on failure.
    fn open_pinned_map(&self, path: &str) -> String;

    /// Statement atomically adding `delta` to the cell `target` points at.
    fn atomic_add(&self, target: &str, delta: &str) -> String;

    /// Emit an observability record. `args` fill the `%` conversions of
    /// `format` in order.
    fn emit_trace_message(&self, out: &mut CodeBuilder, format: &str, args: &[&str]);

    /// Status returned by a dispatch routine that cannot continue.
    fn abort_return_code(&self) -> &str;
}

fn kernel_map_type(kind: TableKind) -> &'static str {
    match kind {
        TableKind::Array => "BPF_MAP_TYPE_ARRAY",
        TableKind::Hash => "BPF_MAP_TYPE_HASH",
        TableKind::LpmTrie => "BPF_MAP_TYPE_LPM_TRIE",
    }
}

/// Backend for the kernel's traffic-control packet filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelTarget {
    abort_code: String,
    trace: bool,
}

impl Default for KernelTarget {
    fn default() -> Self {
        KernelTarget {
            abort_code: "TC_ACT_SHOT".to_owned(),
            trace: true,
        }
    }
}

impl KernelTarget {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_abort_code(mut self, code: impl Into<String>) -> Self {
        self.abort_code = code.into();
        self
    }

    /// Enable or disable emission of trace records.
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

impl MapTarget for KernelTarget {
    fn emit_table_decl(
        &self,
        out: &mut CodeBuilder,
        name: &str,
        kind: TableKind,
        key_type: &str,
        value_type: &str,
        capacity: u32,
    ) {
        let map_type = kernel_map_type(kind);
        match kind {
            // The kernel refuses preallocated LPM tries.
            TableKind::LpmTrie => out.writeln(&format!(
                "REGISTER_TABLE_FLAGS({name}, {map_type}, sizeof({key_type}), \
                 sizeof({value_type}), {capacity}, BPF_F_NO_PREALLOC)"
            )),
            TableKind::Array | TableKind::Hash => out.writeln(&format!(
                "REGISTER_TABLE({name}, {map_type}, sizeof({key_type}), \
                 sizeof({value_type}), {capacity})"
            )),
        }
    }

    fn table_lookup(&self, map: &str, key: &str) -> String {
        format!("bpf_map_lookup_elem(&{map}, &{key})")
    }

    fn table_update(&self, map: &str, key: &str, value: &str) -> String {
        format!("bpf_map_update_elem(&{map}, &{key}, &{value}, BPF_ANY)")
    }

    fn user_table_update(&self, handle: &str, key: &str, value: &str) -> String {
        format!("bpf_update_elem({handle}, &{key}, &{value}, BPF_ANY)")
    }

    fn open_pinned_map(&self, path: &str) -> String {
        format!("BPF_OBJ_GET({path})")
    }

    fn atomic_add(&self, target: &str, delta: &str) -> String {
        format!("__sync_fetch_and_add({target}, {delta});")
    }

    fn emit_trace_message(&self, out: &mut CodeBuilder, format: &str, args: &[&str]) {
        if !self.trace {
            return;
        }
        let mut line = format!("bpf_trace_message(\"{format}\\n\"");
        for arg in args {
            line.push_str(", ");
            line.push_str(arg);
        }
        line.push_str(");");
        out.writeln(&line);
    }

    fn abort_return_code(&self) -> &str {
        &self.abort_code
    }
}

#[cfg(test)]
mod tests;
