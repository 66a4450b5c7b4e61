use mapgen_ir::{ActionDecl, Param, Type};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

const NO_ACTION: DeclId = DeclId::new(1);

fn program_with(actions: impl IntoIterator<Item = ActionDecl>) -> Program {
    let mut program = Program::new();
    program.add_action(ActionDecl::no_action(NO_ACTION));
    for action in actions {
        program.add_action(action);
    }
    program
}

fn set_port() -> ActionDecl {
    ActionDecl::new(DeclId::new(2), "set_port").with_param(Param::new(
        DeclId::new(20),
        "port",
        Type::bits(16),
    ))
}

fn plan(table: &TableDecl, program: &Program, names: &mut NameContext) -> ValueLayout {
    ValueLayout::plan(table, program, names, format!("{}_value", table.external_name)).unwrap()
}

#[test]
fn no_action_is_zero_wherever_it_is_listed() {
    let program = program_with([set_port(), ActionDecl::new(DeclId::new(3), "drop")]);
    let table = TableDecl::new("fwd", "fwd")
        .with_action(DeclId::new(2))
        .with_action(NO_ACTION)
        .with_action(DeclId::new(3));
    let layout = plan(&table, &program, &mut NameContext::new());

    let ids: Vec<_> = layout.actions().iter().map(|a| a.id.value()).collect();
    assert_eq!(ids, [1, 0, 2]);
    assert_eq!(layout.actions()[1].constant, None);
    assert_eq!(layout.actions()[1].member, NO_ACTION_MEMBER);
    assert_eq!(layout.actions()[1].discriminant(), "0");
    assert_eq!(layout.actions()[2].discriminant(), "FWD_ACT_DROP");

    let by_id: Vec<_> = layout.actions_by_id().iter().map(|a| a.id.value()).collect();
    assert_eq!(by_id, [0, 1, 2]);
}

#[test]
fn value_struct_shape() {
    let program = program_with([set_port()]);
    let table = TableDecl::new("fwd", "fwd")
        .with_action(NO_ACTION)
        .with_action(DeclId::new(2));
    let layout = plan(&table, &program, &mut NameContext::new());

    let mut out = CodeBuilder::new();
    layout.emit(&mut out);
    assert_eq!(
        out.finish(),
        "#define FWD_ACT_SET_PORT 1\n\
         struct fwd_value {\n    \
             unsigned int action;\n    \
             union {\n        \
                 struct {\n        \
                 } _NoAction;\n        \
                 struct {\n            \
                     u16 port;\n        \
                 } set_port;\n    \
             } u;\n\
         };\n"
    );
}

#[test]
fn constants_are_unique_across_tables() {
    let program = program_with([set_port()]);
    let mut names = NameContext::new();
    let first = TableDecl::new("a", "fwd").with_action(DeclId::new(2));
    let second = TableDecl::new("b", "FWD").with_action(DeclId::new(2));
    let a = plan(&first, &program, &mut names);
    let b = plan(&second, &program, &mut names);
    assert_eq!(a.actions()[0].constant.as_deref(), Some("FWD_ACT_SET_PORT"));
    assert_eq!(b.actions()[0].constant.as_deref(), Some("FWD_ACT_SET_PORT_0"));
}

#[test]
fn wide_parameters_are_byte_arrays() {
    let action = ActionDecl::new(DeclId::new(4), "set_dmac").with_param(Param::new(
        DeclId::new(40),
        "mac",
        Type::bits(48),
    ));
    let program = program_with([action]);
    let table = TableDecl::new("l2", "l2").with_action(DeclId::new(4));
    let layout = plan(&table, &program, &mut NameContext::new());

    let mut out = CodeBuilder::new();
    layout.emit(&mut out);
    assert!(out.as_str().contains("u8 mac[6];"));
    assert_eq!(layout.action(DeclId::new(4)).map(|a| a.params[0].width), Some(48));
}

#[test]
fn undeclared_action_is_internal() {
    let program = program_with([]);
    let table = TableDecl::new("fwd", "fwd").with_action(DeclId::new(99));
    let err = ValueLayout::plan(&table, &program, &mut NameContext::new(), "v".into()).unwrap_err();
    assert!(matches!(err, LoweringError::Internal(_)));
}

#[test]
fn parameter_without_width_is_a_type_error() {
    let action = ActionDecl::new(DeclId::new(5), "copy").with_param(Param::new(
        DeclId::new(50),
        "h",
        Type::Header("ethernet_t".into()),
    ));
    let program = program_with([action]);
    let table = TableDecl::new("t", "t").with_action(DeclId::new(5));
    let err = ValueLayout::plan(&table, &program, &mut NameContext::new(), "v".into()).unwrap_err();
    assert!(matches!(err, LoweringError::Problem(TableProblem::ParamWithoutWidth { .. })));
}

proptest! {
    #[test]
    fn ids_are_contiguous_from_one(count in 1usize..24, no_action_at in 0usize..24) {
        let mut program = program_with([]);
        let mut table = TableDecl::new("t", "t");
        let no_action_at = no_action_at % (count + 1);
        for i in 0..count {
            if i == no_action_at {
                table = table.with_action(NO_ACTION);
            }
            let decl = DeclId::new(100 + u32::try_from(i).unwrap());
            program.add_action(ActionDecl::new(decl, format!("a{i}")));
            table = table.with_action(decl);
        }
        if no_action_at == count {
            table = table.with_action(NO_ACTION);
        }

        let layout = plan(&table, &program, &mut NameContext::new());
        let numbered: Vec<u32> = layout
            .actions()
            .iter()
            .filter(|a| a.id != ActionId::NoAction)
            .map(|a| a.id.value())
            .collect();
        let expected: Vec<u32> = (1..=u32::try_from(count).unwrap()).collect();
        prop_assert_eq!(numbered, expected);
        prop_assert_eq!(layout.action(NO_ACTION).map(|a| a.id.value()), Some(0));
    }
}
