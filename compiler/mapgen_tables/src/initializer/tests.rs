use mapgen_ir::{
    ActionDecl, ConstValue, DeclId, ExternInstance, KeyElement, Param, Program, PropertyValue,
    Type,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::lowering::CLowering;
use crate::naming::NameContext;
use crate::target::KernelTarget;

const NO_ACTION: DeclId = DeclId::new(1);
const SET_PORT: DeclId = DeclId::new(2);

fn program() -> Program {
    let mut program = Program::new();
    program.add_action(ActionDecl::no_action(NO_ACTION));
    program.add_action(
        ActionDecl::new(SET_PORT, "set_port").with_param(Param::new(
            DeclId::new(20),
            "port",
            Type::bits(16),
        )),
    );
    program
}

fn call(decl: DeclId, name: &str, args: Vec<Expr>) -> Expr {
    Expr::call(Expr::path(name, decl), args)
}

fn fwd(kind: &str) -> TableDecl {
    TableDecl::new("fwd", "fwd")
        .with_key(vec![KeyElement::new(Expr::ident("hdr.ipv4.dst"), Type::bits(32), kind)])
        .with_action(NO_ACTION)
        .with_action(SET_PORT)
        .with_property(
            "implementation",
            PropertyValue::Extern(
                ExternInstance::new("hash_table", Span::DUMMY).with_arg("size", ConstValue::Int(16)),
            ),
        )
}

fn emit(table: &TableDecl) -> Result<String, InternalError> {
    let model = TableModel::default();
    let program = program();
    let key = KeyLayout::plan(table, &model, "fwd_key".into()).unwrap();
    let encoder = KeyEncoder::plan(&key).unwrap();
    let value = ValueLayout::plan(table, &program, &mut NameContext::new(), "fwd_value".into()).unwrap();
    let maps = MapInstances::plan(table, &key, &value, &model).unwrap();
    let init = Initializer {
        table,
        key: &key,
        encoder: &encoder,
        value: &value,
        maps: &maps,
        model: &model,
    };
    let mut out = CodeBuilder::new();
    init.emit(&mut out, &KernelTarget::new(), &CLowering)?;
    Ok(out.finish())
}

#[test]
fn default_action_is_written_to_slot_zero() {
    let table = fwd("exact").with_default_action(call(SET_PORT, "set_port", vec![Expr::Int(5)]));
    assert_eq!(
        emit(&table).unwrap(),
        "{\n    \
             int tableFileDescriptor = BPF_OBJ_GET(MAP_PATH \"/fwd_defaultAction\");\n    \
             if (tableFileDescriptor < 0) { fprintf(stderr, \"map fwd_defaultAction not loaded\\n\"); exit(1); }\n    \
             struct fwd_value value = {\n        \
                 .action = FWD_ACT_SET_PORT,\n        \
                 .u = {.set_port = {5,}},\n    \
             };\n    \
             int ok = bpf_update_elem(tableFileDescriptor, &ebpf_zero, &value, BPF_ANY);\n    \
             if (ok != 0) { perror(\"Could not write in fwd_defaultAction\"); exit(1); }\n\
         }\n"
    );
}

#[test]
fn no_action_default_uses_reserved_member() {
    let table = fwd("exact").with_default_action(call(NO_ACTION, "NoAction", vec![]));
    let text = emit(&table).unwrap();
    assert!(text.contains(".action = 0,\n"));
    assert!(text.contains(".u = {._NoAction = {}},"));
}

#[test]
fn missing_default_action_falls_back_to_no_action() {
    let text = emit(&fwd("exact")).unwrap();
    assert!(text.contains(".u = {._NoAction = {}},"));
}

#[test]
fn static_entries_are_loaded_into_primary_map() {
    let table = fwd("exact")
        .with_default_action(call(NO_ACTION, "NoAction", vec![]))
        .with_entry(StaticEntry {
            keys: vec![Expr::Int(10)],
            action: call(SET_PORT, "set_port", vec![Expr::Int(3)]),
            span: Span::DUMMY,
        });
    let text = emit(&table).unwrap();
    assert!(text.contains("int tableFileDescriptor = BPF_OBJ_GET(MAP_PATH \"/fwd\");"));
    assert!(text.contains("struct fwd_key key = {.field0 = 10,};"));
    assert!(text.contains(".u = {.set_port = {3,}},"));
    assert!(text.contains("bpf_update_elem(tableFileDescriptor, &key, &value, BPF_ANY)"));
    assert!(text.contains("perror(\"Could not write in fwd\")"));
}

#[test]
fn lpm_entries_set_prefix_and_network_order() {
    let table = fwd("lpm").with_entry(StaticEntry {
        keys: vec![Expr::ident("0x0a000000")],
        action: call(NO_ACTION, "NoAction", vec![]),
        span: Span::DUMMY,
    });
    let text = emit(&table).unwrap();
    assert!(text.contains(
        "struct fwd_key key = {.prefixlen = sizeof(struct fwd_key)*8 - 32, .field0 = bpf_htonl(0x0a000000),};"
    ));
}

fn narrow(kind: &str, key: u64) -> TableDecl {
    TableDecl::new("fwd", "fwd")
        .with_key(vec![KeyElement::new(Expr::ident("hdr.mpls"), Type::bits(24), kind)])
        .with_action(NO_ACTION)
        .with_entry(StaticEntry {
            keys: vec![Expr::Int(key)],
            action: call(NO_ACTION, "NoAction", vec![]),
            span: Span::DUMMY,
        })
        .with_property(
            "implementation",
            PropertyValue::Extern(
                ExternInstance::new("hash_table", Span::DUMMY).with_arg("size", ConstValue::Int(16)),
            ),
        )
}

#[test]
fn byte_array_entries_use_host_byte_order() {
    let text = emit(&narrow("exact", 0x0a0b0c)).unwrap();
    assert!(text.contains("struct fwd_key key = {.field0 = {0x0c, 0x0b, 0x0a},};"));
}

#[test]
fn byte_array_lpm_entries_are_reversed() {
    let text = emit(&narrow("lpm", 0x0a0b0c)).unwrap();
    assert!(text.contains(
        "struct fwd_key key = {.prefixlen = sizeof(struct fwd_key)*8 - 32, \
         .field0 = {0x0a, 0x0b, 0x0c},};"
    ));
}

#[test]
fn byte_array_entries_need_a_constant() {
    let mut table = narrow("exact", 0);
    if let Some(entries) = table.entries.as_mut() {
        entries[0].keys = vec![Expr::ident("MPLS_LABEL")];
    }
    let err = emit(&table).unwrap_err();
    assert!(err.message.contains("is not an integer constant"));
}

#[test]
fn default_action_must_be_a_table_action_call() {
    let not_call = fwd("exact").with_default_action(Expr::ident("set_port"));
    assert!(emit(&not_call).is_err());

    let foreign = fwd("exact").with_default_action(call(DeclId::new(99), "other", vec![]));
    assert!(emit(&foreign).is_err());

    let arity = fwd("exact").with_default_action(call(SET_PORT, "set_port", vec![]));
    let err = emit(&arity).unwrap_err();
    assert!(err.message.contains("passes 0 arguments"));
}

#[test]
fn entry_key_arity_is_checked() {
    let table = fwd("exact").with_entry(StaticEntry {
        keys: vec![Expr::Int(1), Expr::Int(2)],
        action: call(NO_ACTION, "NoAction", vec![]),
        span: Span::new(3, 4),
    });
    let err = emit(&table).unwrap_err();
    assert_eq!(err.span, Span::new(3, 4));
}
