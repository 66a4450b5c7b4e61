use mapgen_ir::{KeyElement, TableDecl, Type};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::lowering::CLowering;
use crate::model::TableModel;
use crate::target::KernelTarget;

fn layout(keys: Vec<KeyElement>) -> KeyLayout {
    let table = TableDecl::new("t", "t").with_key(keys);
    KeyLayout::plan(&table, &TableModel::default(), "t_key".to_owned()).unwrap()
}

fn key(name: &str, width: u32, kind: &str) -> KeyElement {
    KeyElement::new(Expr::ident(name), Type::bits(width), kind)
}

fn emit(encoder: &KeyEncoder, target: &KernelTarget, prefix: Option<&str>) -> String {
    let mut out = CodeBuilder::new();
    encoder.emit_key(&mut out, target, &CLowering, "key", prefix);
    out.finish()
}

#[test]
fn exact_fields_are_assigned_in_host_order() {
    let encoder = KeyEncoder::plan(&layout(vec![key("hdr.ipv4.dst", 32, "exact")])).unwrap();
    assert_eq!(
        emit(&encoder, &KernelTarget::new(), None),
        "key.field0 = hdr.ipv4.dst;\n\
         bpf_trace_message(\"Control: key hdr.ipv4.dst=0x%llx\\n\", (unsigned long long) key.field0);\n"
    );
}

#[test]
fn lpm_field_is_converted_and_prefix_is_full() {
    let encoder = KeyEncoder::plan(&layout(vec![
        key("meta.vrf", 16, "exact"),
        key("hdr.ipv4.dst", 32, "lpm"),
    ]))
    .unwrap();
    let strategies: Vec<_> = encoder.encodings().map(|e| e.strategy).collect();
    assert_eq!(strategies, [CopyStrategy::Assign, CopyStrategy::Swap(ByteSwap::Htonl)]);

    let text = emit(&encoder, &KernelTarget::new().with_trace(false), None);
    assert_eq!(
        text,
        "key.prefixlen = sizeof(key)*8 - 32;\n\
         key.field0 = meta.vrf;\n\
         key.field1 = bpf_htonl(hdr.ipv4.dst);\n"
    );
}

#[test]
fn explicit_prefix_wins() {
    let encoder = KeyEncoder::plan(&layout(vec![key("hdr.ipv4.dst", 32, "lpm")])).unwrap();
    let text = emit(&encoder, &KernelTarget::new().with_trace(false), Some("24 + 32"));
    assert!(text.starts_with("key.prefixlen = 24 + 32;\n"));
}

#[test]
fn single_byte_lpm_is_not_converted() {
    let encoder = KeyEncoder::plan(&layout(vec![key("meta.tos", 8, "lpm")])).unwrap();
    assert_eq!(encoder.encodings().next().map(|e| e.strategy), Some(CopyStrategy::Assign));
}

#[test]
fn odd_widths_are_copied() {
    let encoder = KeyEncoder::plan(&layout(vec![key("hdr.eth.dst", 48, "exact")])).unwrap();
    assert_eq!(
        emit(&encoder, &KernelTarget::new(), None),
        "memcpy(&key.field0, &hdr.eth.dst, 6);\n\
         bpf_trace_message(\"Control: key hdr.eth.dst\\n\");\n"
    );
}

#[test]
fn odd_width_lpm_is_reversed() {
    let encoder = KeyEncoder::plan(&layout(vec![key("hdr.mpls", 24, "lpm")])).unwrap();
    assert_eq!(
        emit(&encoder, &KernelTarget::new().with_trace(false), None),
        "key.prefixlen = sizeof(key)*8 - 32;\n\
         key.field0[0] = (hdr.mpls)[2];\n\
         key.field0[1] = (hdr.mpls)[1];\n\
         key.field0[2] = (hdr.mpls)[0];\n"
    );
}

#[test]
fn ternary_table_keeps_lpm_in_host_order() {
    let encoder = KeyEncoder::plan(&layout(vec![
        key("hdr.ipv4.proto", 8, "ternary"),
        key("hdr.ipv4.dst", 32, "lpm"),
    ]))
    .unwrap();
    assert!(encoder.encodings().all(|e| e.strategy == CopyStrategy::Assign));
    let text = emit(&encoder, &KernelTarget::new().with_trace(false), None);
    assert!(!text.contains("prefixlen"));
}

#[test]
fn fields_wider_than_64_bits_are_unsupported() {
    let err = KeyEncoder::plan(&layout(vec![key("hdr.ipv6.dst", 128, "exact")])).unwrap_err();
    assert!(matches!(
        err,
        TableProblem::FieldTooWide { ref field, width: 128, .. } if field == "field0"
    ));
}

#[test]
fn host_model_matches_emitted_byte_order() {
    let swapped = KeyFieldEncoding::new("f", 32, true, Span::DUMMY).unwrap();
    assert_eq!(swapped.encode_host(0x0a00_0001).as_slice(), [0x0a, 0, 0, 1]);

    let host = KeyFieldEncoding::new("f", 32, false, Span::DUMMY).unwrap();
    assert_eq!(host.encode_host(0x0a00_0001).as_slice(), [1, 0, 0, 0x0a]);

    let reversed = KeyFieldEncoding::new("f", 24, true, Span::DUMMY).unwrap();
    assert_eq!(reversed.strategy, CopyStrategy::Reversed);
    assert_eq!(reversed.encode_host(0x01_0203).as_slice(), [1, 2, 3]);
    assert_eq!(reversed.decode_host(&[1, 2, 3]), 0x01_0203);
}

fn native_width() -> impl Strategy<Value = u32> {
    prop_oneof![Just(8u32), Just(16), Just(32), Just(64)]
}

proptest! {
    #[test]
    fn native_widths_round_trip(width in native_width(), raw in any::<u64>(), lpm in any::<bool>()) {
        let value = if width == 64 { raw } else { raw & ((1u64 << width) - 1) };
        let encoding = KeyFieldEncoding::new("f", width, lpm, Span::DUMMY).unwrap();
        let stored = encoding.encode_host(value);
        prop_assert_eq!(stored.len() * 8, width as usize);
        prop_assert_eq!(encoding.decode_host(&stored), value);
    }

    #[test]
    fn network_order_is_big_endian(width in native_width(), raw in any::<u64>()) {
        let value = if width == 64 { raw } else { raw & ((1u64 << width) - 1) };
        let encoding = KeyFieldEncoding::new("f", width, true, Span::DUMMY).unwrap();
        let stored = encoding.encode_host(value);
        let bytes = (width / 8) as usize;
        prop_assert_eq!(stored.as_slice(), &value.to_be_bytes()[8 - bytes..]);
    }
}
