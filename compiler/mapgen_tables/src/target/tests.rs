use pretty_assertions::assert_eq;

use super::*;

#[test]
fn hash_and_array_declarations() {
    let target = KernelTarget::new();
    let mut out = CodeBuilder::new();
    target.emit_table_decl(&mut out, "fwd", TableKind::Hash, "struct fwd_key", "struct fwd_value", 1024);
    target.emit_table_decl(&mut out, "fwd_defaultAction", TableKind::Array, "u32", "struct fwd_value", 1);
    assert_eq!(
        out.finish(),
        "REGISTER_TABLE(fwd, BPF_MAP_TYPE_HASH, sizeof(struct fwd_key), sizeof(struct fwd_value), 1024)\n\
         REGISTER_TABLE(fwd_defaultAction, BPF_MAP_TYPE_ARRAY, sizeof(u32), sizeof(struct fwd_value), 1)\n"
    );
}

#[test]
fn lpm_trie_is_not_preallocated() {
    let target = KernelTarget::new();
    let mut out = CodeBuilder::new();
    target.emit_table_decl(&mut out, "routes", TableKind::LpmTrie, "struct routes_key", "struct routes_value", 64);
    assert!(out.as_str().starts_with("REGISTER_TABLE_FLAGS(routes, BPF_MAP_TYPE_LPM_TRIE"));
    assert!(out.as_str().contains("BPF_F_NO_PREALLOC"));
}

#[test]
fn trace_messages_can_be_disabled() {
    let mut out = CodeBuilder::new();
    KernelTarget::new().emit_trace_message(&mut out, "Control: key %s=0x%llx", &["\"k\"", "v"]);
    assert_eq!(
        out.as_str(),
        "bpf_trace_message(\"Control: key %s=0x%llx\\n\", \"k\", v);\n"
    );

    let mut quiet = CodeBuilder::new();
    KernelTarget::new()
        .with_trace(false)
        .emit_trace_message(&mut quiet, "Control: executing action fwd", &[]);
    assert!(quiet.is_empty());
}

#[test]
fn expressions() {
    let target = KernelTarget::new().with_abort_code("XDP_ABORTED");
    assert_eq!(target.table_lookup("fwd", "key"), "bpf_map_lookup_elem(&fwd, &key)");
    assert_eq!(
        target.table_update("c", "key_0", "init_val"),
        "bpf_map_update_elem(&c, &key_0, &init_val, BPF_ANY)"
    );
    assert_eq!(
        target.user_table_update("fd", "ebpf_zero", "value"),
        "bpf_update_elem(fd, &ebpf_zero, &value, BPF_ANY)"
    );
    assert_eq!(target.atomic_add("value", "1"), "__sync_fetch_and_add(value, 1);");
    assert_eq!(target.abort_return_code(), "XDP_ABORTED");
}
