use ecmalens_analysis::extract::variables::*;
use ecmalens_core::{Node, NodeKind, ParseOptions, VariableKind, parse_program};

fn parse(source: &str) -> Node {
    parse_program(source, ParseOptions::ANALYZER)
        .expect("source should parse")
        .program
}

#[test]
fn test_identifier_and_array_bindings() {
    let source = "\
var count
let [head, , tail] = items
const { a, b } = pair
function f() {
  const inner = 1
}
for (let i = 0; i < 3; i++) {}
";
    let program = parse(source);
    let variables = extract_variables(&program);
    let summary: Vec<_> = variables
        .iter()
        .map(|v| (v.name(), v.kind, v.initialized()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Some("count"), VariableKind::Var, false),
            (Some("head"), VariableKind::Let, true),
            (Some("tail"), VariableKind::Let, true),
            (Some("inner"), VariableKind::Const, true),
            (Some("i"), VariableKind::Let, true),
        ]
    );
    assert!(variables[1].node.is(NodeKind::VariableDeclaration));
    assert!(variables[1].binding.is(NodeKind::Identifier));
    assert!(variables[1].init.is_some_and(|init| init.is(NodeKind::Identifier)));
}

#[test]
fn test_no_declarations() {
    let program = parse("x = 1");
    assert!(extract_variables(&program).is_empty());
}

#[test]
fn test_late_initialization_is_not_init() {
    let program = parse("let nothing\nnothing = 'late'");
    let variables = extract_variables(&program);
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].name(), Some("nothing"));
    assert!(!variables[0].initialized());
}

#[test]
fn test_const_array_pattern() {
    let program = parse("const [first, second] = ['a', 'b']");
    let variables = extract_variables(&program);
    let names: Vec<_> = variables.iter().filter_map(ExtractedVariable::name).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert!(variables.iter().all(|v| v.kind == VariableKind::Const && v.initialized()));
}
