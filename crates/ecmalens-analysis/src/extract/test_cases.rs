//! Test cases written with `describe`/`test`/`it` and their `expect` calls.
//!
//! ```text
//! describe('math', () => {
//!   test('adds', () => {
//!     const actual = 1 + 1
//!     expect(actual).toBe(2)
//!   })
//! })
//! ```
//!
//! yields one case named `math > adds` with one expectation whose actual
//! value is `actual`.

use crate::guards::{
    CallShape, MemberShape, is_call_expression, is_identifier, is_member_expression,
};
use crate::queries::{find_all, find_first};
use crate::traverse::{Control, Visitors, traverse};
use ecmalens_core::ast::{Field, LiteralValue, Node, NodeKind, Range};
use ecmalens_core::source::slice;
use ecmalens_core::{AnalysisError, Result, extract_source};

const DESCRIBE: [&str; 2] = ["describe", "xdescribe"];
const TEST: [&str; 4] = ["test", "xtest", "it", "xit"];
const MODIFIERS: [&str; 2] = ["skip", "only"];

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase<'a> {
    /// The test function passed as the second argument.
    pub test_node: &'a Node,
    /// Names of the enclosing `describe` blocks, outermost first.
    pub description: Vec<&'a str>,
    pub test: &'a str,
    pub expectations: Vec<Expectation<'a>>,
}

impl TestCase<'_> {
    /// Describe names and the test name joined with `glue`.
    pub fn name(&self, glue: &str) -> String {
        let mut parts = self.description.clone();
        parts.push(self.test);
        parts.join(glue)
    }

    /// Source of the test body. For block bodies this is each statement's
    /// text on its own line, without the braces.
    pub fn test_code(&self, source: &str) -> Result<String> {
        let Some(body) = self.test_node.child(Field::Body) else {
            return Ok(String::new());
        };
        if !body.is(NodeKind::BlockStatement) {
            return Ok(extract_source(source, body)?.to_string());
        }
        let statements = body
            .children_of(Field::Body)
            .map(|statement| extract_source(source, statement))
            .collect::<Result<Vec<_>>>()?;
        Ok(statements.join("\n"))
    }
}

/// A statement of a test body that calls `expect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expectation<'a> {
    pub statement: &'a Node,
    /// The `expect(...)` call.
    pub expect: &'a Node,
    /// First argument of the `expect` call.
    pub actual: Option<&'a Node>,
}

impl Expectation<'_> {
    pub fn statement_code<'s>(&self, source: &'s str) -> Result<&'s str> {
        extract_source(source, self.statement)
    }

    /// The statement's text after the `expect(...)` call, e.g. `.toBe(2)`.
    pub fn expect_code<'s>(&self, source: &'s str) -> Result<&'s str> {
        let range = |node: &Node| {
            node.range
                .ok_or(AnalysisError::MissingRange { kind: node.kind })
        };
        let statement = range(self.statement)?;
        let call = range(self.expect)?;
        slice(
            source,
            Range {
                start: call.end.min(statement.end),
                end: statement.end,
            },
        )
    }

    pub fn actual_code<'s>(&self, source: &'s str) -> Result<Option<&'s str>> {
        self.actual
            .map(|actual| extract_source(source, actual))
            .transpose()
    }
}

fn string_argument(call: &Node, index: usize) -> Option<&str> {
    call.list(Field::Arguments)
        .get(index)?
        .as_ref()
        .filter(|arg| arg.is(NodeKind::Literal))
        .and_then(|arg| arg.props.value.as_ref())
        .and_then(LiteralValue::as_str)
}

/// `name(...)` or `name.skip(...)`/`name.only(...)` for any of `names`.
fn is_call_to(node: &Node, names: &[&str]) -> bool {
    if !node.is(NodeKind::CallExpression) {
        return false;
    }
    let Some(callee) = node.child(Field::Callee) else {
        return false;
    };
    names.iter().any(|&name| {
        is_identifier(callee, Some(name))
            || MODIFIERS
                .iter()
                .any(|m| is_member_expression(callee, MemberShape::member(name, *m)))
    })
}

fn is_describe(node: &Node) -> bool {
    is_call_to(node, &DESCRIBE)
}

fn is_test(node: &Node) -> bool {
    is_call_to(node, &TEST)
}

/// The call a node stands for when it sits in statement position: the
/// expression of an `ExpressionStatement`, or a call that is the expression
/// body of an arrow function.
fn statement_call<'a>(node: &'a Node, parent: Option<&'a Node>) -> Option<&'a Node> {
    match node.kind {
        NodeKind::ExpressionStatement => node.child(Field::Expression),
        NodeKind::CallExpression => parent
            .filter(|p| p.is(NodeKind::ArrowFunctionExpression))
            .and_then(|p| p.child(Field::Body))
            .filter(|body| std::ptr::eq(*body, node)),
        _ => None,
    }
}

/// Name of the `describe` block a call opens, if any.
fn named_describe(call: &Node) -> Option<&str> {
    if is_describe(call) {
        string_argument(call, 0)
    } else {
        None
    }
}

fn expectations(test_node: &Node) -> Vec<Expectation<'_>> {
    let statements = find_all(test_node, |ctl, node| {
        if node.is(NodeKind::ExpressionStatement) {
            ctl.skip();
            return true;
        }
        false
    });
    statements
        .into_iter()
        .filter_map(|statement| {
            let expect = find_first(statement, |_, node| {
                is_call_expression(node, CallShape::callee("expect"))
            })?;
            Some(Expectation {
                statement,
                expect,
                actual: expect.children_of(Field::Arguments).next(),
            })
        })
        .collect()
}

#[derive(Default)]
struct Collector<'a> {
    description: Vec<&'a str>,
    cases: Vec<TestCase<'a>>,
}

/// Test cases under `root`, in source order.
///
/// Calls are recognized as statements or as the expression body of an arrow
/// function. A `describe` whose name is not a string literal is skipped
/// along with everything inside it. A test is recorded only when its name is a string
/// literal and its body a function or arrow function.
pub fn extract_tests<'a>(root: &'a Node) -> Vec<TestCase<'a>> {
    let mut collector = Collector::default();
    let visitors = Visitors::new()
        .enter(|collector: &mut Collector<'a>, ctl, node, parent| {
            if let Some(call) = statement_call(node, parent) {
                visit_call(collector, ctl, call);
            }
        })
        .exit(|collector, _, node, parent| {
            if statement_call(node, parent).is_some_and(|call| named_describe(call).is_some()) {
                collector.description.pop();
            }
        });
    traverse(root, visitors, &mut collector);
    tracing::debug!("extracted {} test cases", collector.cases.len());
    collector.cases
}

fn visit_call<'a>(collector: &mut Collector<'a>, ctl: &mut Control<'a>, call: &'a Node) {
    if is_describe(call) {
        match string_argument(call, 0) {
            Some(name) => collector.description.push(name),
            None => ctl.skip(),
        }
    } else if is_test(call) {
        let test_node = call
            .list(Field::Arguments)
            .get(1)
            .and_then(Option::as_ref)
            .filter(|f| {
                matches!(
                    f.kind,
                    NodeKind::FunctionExpression | NodeKind::ArrowFunctionExpression
                )
            });
        if let (Some(test), Some(test_node)) = (string_argument(call, 0), test_node) {
            collector.cases.push(TestCase {
                test_node,
                description: collector.description.clone(),
                test,
                expectations: expectations(test_node),
            });
        }
        ctl.skip();
    }
}
