//! Architecture model: the source-level names the map compiler matches on.
//!
//! Names are compared exactly once, when a declaration enters the compiler,
//! and turned into closed enums ([`MatchKind`], [`ImplementationHint`],
//! [`CounterMethod`]). Every later decision matches on those enums.

use crate::counter::CounterMethod;
use crate::key_layout::MatchKind;
use crate::map_kind::ImplementationHint;

/// Identifiers of the target architecture model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableModel {
    /// Table property binding the backing map implementation.
    pub implementation_property: String,
    /// Extern type of an array-backed implementation.
    pub array_table: String,
    /// Extern type of a hash-backed implementation.
    pub hash_table: String,
    /// Capacity argument of both implementation externs.
    pub size_param: String,

    /// Counter extern type.
    pub counter_array: String,
    pub max_index_param: String,
    pub sparse_param: String,
    pub increment_method: String,
    pub add_method: String,

    pub exact_match: String,
    pub ternary_match: String,
    pub lpm_match: String,
    pub selector_match: String,

    pub counter_index_type: String,
    pub counter_value_type: String,
    /// Key type of the single-slot default-action map.
    pub array_index_type: String,
    /// Variable holding the zero key, used to address the default-action slot.
    pub zero_key: String,
    /// Prefix-length member of an LPM key struct.
    pub prefix_field: String,
    /// Macro expanding to the directory where maps are pinned.
    pub map_path_macro: String,
}

impl Default for TableModel {
    fn default() -> Self {
        TableModel {
            implementation_property: "implementation".to_owned(),
            array_table: "array_table".to_owned(),
            hash_table: "hash_table".to_owned(),
            size_param: "size".to_owned(),
            counter_array: "CounterArray".to_owned(),
            max_index_param: "max_index".to_owned(),
            sparse_param: "sparse".to_owned(),
            increment_method: "increment".to_owned(),
            add_method: "add".to_owned(),
            exact_match: "exact".to_owned(),
            ternary_match: "ternary".to_owned(),
            lpm_match: "lpm".to_owned(),
            selector_match: "selector".to_owned(),
            counter_index_type: "u32".to_owned(),
            counter_value_type: "u32".to_owned(),
            array_index_type: "u32".to_owned(),
            zero_key: "ebpf_zero".to_owned(),
            prefix_field: "prefixlen".to_owned(),
            map_path_macro: "MAP_PATH".to_owned(),
        }
    }
}

impl TableModel {
    pub fn match_kind(&self, name: &str) -> Option<MatchKind> {
        if name == self.exact_match {
            Some(MatchKind::Exact)
        } else if name == self.ternary_match {
            Some(MatchKind::Ternary)
        } else if name == self.lpm_match {
            Some(MatchKind::Lpm)
        } else if name == self.selector_match {
            Some(MatchKind::Selector)
        } else {
            None
        }
    }

    pub fn implementation_hint(&self, extern_type: &str) -> Option<ImplementationHint> {
        if extern_type == self.array_table {
            Some(ImplementationHint::Array)
        } else if extern_type == self.hash_table {
            Some(ImplementationHint::Hash)
        } else {
            None
        }
    }

    pub fn counter_method(&self, name: &str) -> Option<CounterMethod> {
        if name == self.increment_method {
            Some(CounterMethod::Increment)
        } else if name == self.add_method {
            Some(CounterMethod::Add)
        } else {
            None
        }
    }
}
