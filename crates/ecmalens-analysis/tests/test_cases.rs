use ecmalens_analysis::extract::test_cases::*;
use ecmalens_core::{Node, NodeKind, ParseOptions, parse_program};

fn parse(source: &str) -> Node {
    parse_program(source, ParseOptions::ANALYZER)
        .expect("source should parse")
        .program
}

#[test]
fn test_single_test_with_expectation() {
    let source = "\
test('the answer', () => {
  const actual = 3 * 3
  expect(actual).not.toBe(42)
})
";
    let program = parse(source);
    let tests = extract_tests(&program);
    assert_eq!(tests.len(), 1);

    let case = &tests[0];
    assert_eq!(case.test, "the answer");
    assert!(case.description.is_empty());
    assert_eq!(case.name(" > "), "the answer");
    assert_eq!(
        case.test_code(source).expect("test code"),
        "const actual = 3 * 3\nexpect(actual).not.toBe(42)"
    );

    assert_eq!(case.expectations.len(), 1);
    let expectation = &case.expectations[0];
    assert_eq!(
        expectation.statement_code(source).expect("statement"),
        "expect(actual).not.toBe(42)"
    );
    assert_eq!(expectation.expect_code(source).expect("expect"), ".not.toBe(42)");
    assert_eq!(expectation.actual_code(source).expect("actual"), Some("actual"));
}

#[test]
fn test_nested_describes_build_names() {
    let source = "\
describe('math', () => {
  describe.skip('sums', () => {
    it('adds', () => {})
  })
  it.only('multiplies', function () {})
})
xit('outside', () => {})
";
    let program = parse(source);
    let names: Vec<_> = extract_tests(&program)
        .iter()
        .map(|case| case.name(" > "))
        .collect();
    assert_eq!(
        names,
        vec!["math > sums > adds", "math > multiplies", "outside"]
    );
}

#[test]
fn test_describe_without_literal_name_is_skipped() {
    let source = "\
describe(suiteName, () => {
  test('hidden', () => {})
})
describe('visible', () => {
  test('shown', () => {})
})
test('after', () => {})
";
    let program = parse(source);
    let names: Vec<_> = extract_tests(&program)
        .iter()
        .map(|case| case.name("/"))
        .collect();
    assert_eq!(names, vec!["visible/shown", "after"]);
}

#[test]
fn test_tests_need_literal_name_and_function() {
    let source = "\
test(name, () => {})
test('callback', handler)
test.each('table', () => {})
test('ok', async () => {})
";
    let program = parse(source);
    let tests = extract_tests(&program);
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].test, "ok");
    assert!(tests[0].test_node.is(NodeKind::ArrowFunctionExpression));
}

#[test]
fn test_expression_body_test_code() {
    let source = "it('is short', () => expect(1).toBe(1))";
    let program = parse(source);
    let tests = extract_tests(&program);
    assert_eq!(tests[0].test_code(source).expect("test code"), "expect(1).toBe(1)");
    // Only expression statements are searched for expectations.
    assert!(tests[0].expectations.is_empty());
}

#[test]
fn test_multiple_expectations() {
    let source = "\
test('values', () => {
  expect(a).toBe(1)
  log(a)
  if (a) {
    expect(b).toEqual([2])
  }
})
";
    let program = parse(source);
    let tests = extract_tests(&program);
    let actuals: Vec<_> = tests[0]
        .expectations
        .iter()
        .map(|e| e.actual_code(source).expect("actual"))
        .collect();
    assert_eq!(actuals, vec![Some("a"), Some("b")]);
}

#[test]
fn test_doubly_nested_describe() {
    let source = "\
describe('A', () => {
  describe('B', () => {
    test('C', () => {})
  })
})
";
    let program = parse(source);
    let tests = extract_tests(&program);
    assert_eq!(tests.len(), 1);
    assert_eq!(tests[0].description, vec!["A", "B"]);
    assert_eq!(tests[0].test, "C");
}

#[test]
fn test_describe_and_test_as_arrow_expression_bodies() {
    let source = "describe('A', () => describe('B', () => test('C', () => expect(1).toBe(1))))\ntest('D', () => {})\n";
    let program = parse(source);
    let tests = extract_tests(&program);
    let names: Vec<_> = tests.iter().map(|case| case.name("/")).collect();
    assert_eq!(names, vec!["A/B/C", "D"]);
    assert_eq!(tests[0].description, vec!["A", "B"]);
    assert_eq!(tests[1].description, Vec::<&str>::new());
}

#[test]
fn test_expect_code_after_awaited_expectation() {
    let source = "\
test('resolves', async () => {
  const p = Promise.resolve(1)
  await expect(p).resolves.toBe(1)
  return expect(p).resolves.not.toBe(2)
})
";
    let program = parse(source);
    let tests = extract_tests(&program);
    let codes: Vec<_> = tests[0]
        .expectations
        .iter()
        .map(|e| {
            (
                e.expect_code(source).expect("expect"),
                e.actual_code(source).expect("actual"),
            )
        })
        .collect();
    assert_eq!(
        codes,
        vec![(".resolves.toBe(1)", Some("p"))]
    );
}
