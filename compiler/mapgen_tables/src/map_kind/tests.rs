use mapgen_ir::{DeclId, Expr, KeyElement, Type};
use pretty_assertions::assert_eq;

use super::*;
use crate::ProblemCategory;

fn key(kind: &str, width: u32) -> KeyElement {
    KeyElement::new(Expr::path(format!("f{width}"), DeclId::new(9)), Type::bits(width), kind)
}

fn implementation(extern_type: &str, size: ConstValue) -> PropertyValue {
    PropertyValue::Extern(ExternInstance::new(extern_type, Span::new(1, 2)).with_arg("size", size))
}

fn select(table: &TableDecl) -> Result<MapSelection, TableProblem> {
    let model = TableModel::default();
    let layout = KeyLayout::plan(table, &model, "t_key".to_owned())?;
    select_map(table, &layout, &model)
}

fn table(keys: Vec<KeyElement>, hint: &str, size: i128) -> TableDecl {
    TableDecl::new("t", "t")
        .with_key(keys)
        .with_property("implementation", implementation(hint, ConstValue::Int(size)))
}

#[test]
fn hint_is_used_for_exact_keys() {
    let hash = select(&table(vec![key("exact", 32)], "hash_table", 1024)).unwrap();
    assert_eq!(hash, MapSelection { kind: TableKind::Hash, capacity: 1024 });

    let array = select(&table(vec![key("exact", 8)], "array_table", 256)).unwrap();
    assert_eq!(array.kind, TableKind::Array);
}

#[test]
fn single_lpm_overrides_hint() {
    let sel = select(&table(vec![key("exact", 8), key("lpm", 32)], "hash_table", 64)).unwrap();
    assert_eq!(sel.kind, TableKind::LpmTrie);
}

#[test]
fn ternary_with_lpm_is_never_a_trie() {
    for hint in ["hash_table", "array_table"] {
        let sel = select(&table(vec![key("lpm", 32), key("ternary", 8)], hint, 64)).unwrap();
        assert_ne!(sel.kind, TableKind::LpmTrie);
    }
}

#[test]
fn two_lpm_fields_are_rejected() {
    let err = select(&table(vec![key("lpm", 32), key("lpm", 16)], "hash_table", 64)).unwrap_err();
    assert!(matches!(err, TableProblem::MultipleLpm { .. }));
    assert_eq!(err.category(), ProblemCategory::Unsupported);
}

#[test]
fn implementation_binding_errors() {
    let missing = TableDecl::new("t", "t").with_key(vec![key("exact", 8)]);
    assert!(matches!(select(&missing), Err(TableProblem::MissingImplementation { .. })));

    let not_extern = TableDecl::new("t", "t")
        .with_key(vec![key("exact", 8)])
        .with_property("implementation", PropertyValue::Expression(Expr::Int(3)));
    assert!(matches!(select(&not_extern), Err(TableProblem::ImplementationNotExtern { .. })));

    let unresolved = TableDecl::new("t", "t")
        .with_key(vec![key("exact", 8)])
        .with_property(
            "implementation",
            PropertyValue::UnresolvedConstructor(Expr::call(Expr::ident("hash_table"), vec![])),
        );
    assert_eq!(
        select(&unresolved).unwrap_err().category(),
        ProblemCategory::ExpectedProperty
    );

    let unknown = table(vec![key("exact", 8)], "counter", 4);
    assert!(matches!(select(&unknown), Err(TableProblem::UnknownImplementation { .. })));
}

#[test]
fn capacity_checks() {
    let span = Span::DUMMY;
    assert_eq!(capacity("t", Some(&ConstValue::Int(1)), "size", span), Ok(1));
    assert_eq!(
        capacity("t", Some(&ConstValue::Int(i128::from(i32::MAX))), "size", span),
        Ok(2_147_483_647)
    );
    for bad in [
        None,
        Some(ConstValue::Bool(true)),
        Some(ConstValue::Int(0)),
        Some(ConstValue::Int(-5)),
        Some(ConstValue::Int(i128::from(i32::MAX) + 1)),
        Some(ConstValue::Unevaluated(Expr::ident("n"))),
    ] {
        let err = capacity("t", bad.as_ref(), "size", span).unwrap_err();
        assert_eq!(err.category(), ProblemCategory::InvalidSize, "{bad:?}");
    }
}

#[test]
fn oversized_capacity_reports_value() {
    let err = select(&table(vec![key("exact", 8)], "hash_table", 1 << 40)).unwrap_err();
    assert!(matches!(err, TableProblem::SizeTooLarge { value, .. } if value == 1 << 40));
}
