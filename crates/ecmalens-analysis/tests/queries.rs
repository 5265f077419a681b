use ecmalens_analysis::queries::*;
use ecmalens_core::{LiteralValue, Node, NodeKind, ParseOptions, VariableKind, parse_program};

fn parse(source: &str) -> Node {
    parse_program(source, ParseOptions::ANALYZER)
        .expect("source should parse")
        .program
}

#[test]
fn test_find_first_returns_earliest_in_traversal_order() {
    let program = parse("const a = 1\nconst b = 2");
    let first = find_first(&program, |_, node| node.is(NodeKind::Literal)).expect("literal");
    assert_eq!(first.props.value, Some(LiteralValue::Number(1.0)));
    assert!(find_first(&program, |_, node| node.is(NodeKind::ClassDeclaration)).is_none());
}

#[test]
fn test_find_all_respects_skip() {
    let program = parse("f(1)\nfunction g() { h(2) }");
    let calls = find_all(&program, |ctl, node| {
        if node.is(NodeKind::FunctionDeclaration) {
            ctl.skip();
        }
        node.is(NodeKind::CallExpression)
    });
    assert_eq!(calls.len(), 1);

    let everywhere = find_all(&program, |_, node| node.is(NodeKind::CallExpression));
    assert_eq!(everywhere.len(), 2);
}

#[test]
fn test_find_literal_and_raw_literal() {
    let program = parse("const name = 'lens'\nconst n = 1e3");
    assert!(find_literal(&program, &LiteralValue::from("lens")).is_some());
    assert!(find_literal(&program, &LiteralValue::Number(1000.0)).is_some());
    assert!(find_raw_literal(&program, "1e3").is_some());
    assert!(find_raw_literal(&program, "1000").is_none());
}

#[test]
fn test_find_member_call_and_new() {
    let program = parse("console.log(new Date())");
    let call = find_member_call(&program, "console", "log").expect("console.log call");
    assert!(call.is(NodeKind::CallExpression));
    assert!(find_member_call(&program, "console", "warn").is_none());
    assert!(find_new_expression(&program, "Date").is_some());
    assert!(find_new_expression(&program, "Map").is_none());
}

#[test]
fn test_top_level_constants_ignore_nested_declarations() {
    let source = "\
const a = 1, b = 2
export const c = 3
let d = 4
function f() {
  const nested = 5
}
";
    let program = parse(source);
    let constants = find_top_level_constants(&program, &[VariableKind::Const]);
    let names: Vec<_> = constants.iter().filter_map(ProgramConstant::name).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(constants.iter().all(|c| c.kind == VariableKind::Const));
    assert!(
        constants[0]
            .init()
            .is_some_and(|init| init.is(NodeKind::Literal))
    );

    let all = find_top_level_constants(&program, &VariableKind::ALL);
    assert_eq!(all.len(), 4);
}

#[test]
fn test_find_all_visits_every_node_once_in_pre_order() {
    let program = parse("class A { m(x) { return [x, , `${x}`] } }\nexport default A");
    let all = find_all(&program, |_, _| true);
    assert_eq!(all.len(), program.size());
    let ids: Vec<u32> = all.iter().map(|node| node.id.0).collect();
    let expected: Vec<u32> = (0..all.len() as u32).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_find_first_abort_stops_at_match() {
    let program = parse("a; b; c");
    let mut visited = 0;
    let found = find_first(&program, |_, node| {
        visited += 1;
        node.name() == Some("b")
    });
    assert_eq!(found.and_then(Node::name), Some("b"));
    // Program, two statements and two identifiers.
    assert_eq!(visited, 5);
}
