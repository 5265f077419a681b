use ecmalens_core::input::InlineInput;
use ecmalens_core::parser::CommentKind;
use ecmalens_core::error::ParseError;
use ecmalens_core::{AnalysisError, AstParser, Dialect, NodeKind, ParseOptions, parse_program};

#[test]
fn test_representer_ignores_formatting_and_comments() {
    let compact = parse_program("const answer = 42", ParseOptions::REPRESENTER).unwrap();
    let spread = parse_program(
        "// the answer\nconst   answer =\n  42 /* exactly */\n",
        ParseOptions::REPRESENTER,
    )
    .unwrap();
    assert_eq!(compact.program, spread.program);
    assert!(compact.program.range.is_none());
    assert!(compact.program.loc.is_none());
    assert!(compact.comments.is_none());
}

#[test]
fn test_representer_distinguishes_programs() {
    let a = parse_program("const answer = 42", ParseOptions::REPRESENTER).unwrap();
    let b = parse_program("let answer = 42", ParseOptions::REPRESENTER).unwrap();
    assert_ne!(a.program, b.program);
}

#[test]
fn test_analyzer_keeps_positions() {
    let source = "let x = 1\nx += 2";
    let parsed = parse_program(source, ParseOptions::ANALYZER).unwrap();
    let program = &parsed.program;
    assert!(program.is(NodeKind::Program));
    let second = program.children().nth(1).expect("second statement");
    let range = second.range.expect("range");
    assert_eq!(&source[range.start..range.end], "x += 2");
    let loc = second.loc.expect("loc");
    assert_eq!(loc.start.line, 2);
    assert_eq!(loc.start.column, 0);
    assert_eq!(parsed.source, source);
}

#[test]
fn test_comments_are_collected_when_requested() {
    let source = "// line\nconst a = 1 /* block */";
    let parsed = parse_program(source, ParseOptions::ANALYZER.with_comments()).unwrap();
    let comments = parsed.comments.expect("comments");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].kind, CommentKind::Line);
    assert_eq!(comments[0].value, " line");
    assert_eq!(comments[1].kind, CommentKind::Block);
    assert_eq!(comments[1].value, " block ");
}

fn syntax_error(source: &str) -> ParseError {
    match parse_program(source, ParseOptions::ANALYZER) {
        Err(AnalysisError::Parse(error)) => error,
        other => panic!("expected a parse error for {source:?}, got {other:?}"),
    }
}

#[test]
fn test_syntax_error_reports_position() {
    let err = parse_program("const = ;", ParseOptions::ANALYZER).unwrap_err();
    assert_eq!(err.code(), "parse_failure");

    let error = syntax_error("const = ;");
    assert_eq!((error.line, error.column), (1, 6));
    assert_eq!(error.kind, "unexpected token");
    assert_eq!(error.snippet, "=");
}

#[test]
fn test_syntax_error_points_at_rejected_token() {
    let error = syntax_error("const a = 1\nconst b = 2\nconst = ;");
    assert_eq!((error.line, error.column), (3, 6));
    assert_eq!(error.snippet, "=");

    let error = syntax_error("a b c;");
    assert_eq!((error.line, error.column), (1, 2));
    assert_eq!(error.snippet, "b");

    // Inside a declaration the error starts at the first extra token.
    let error = syntax_error("let x = 1 2 3;");
    assert_eq!((error.line, error.column), (1, 10));
    assert_eq!(error.snippet, "2 3");
}

#[test]
fn test_truncated_source_is_end_of_input() {
    let error = syntax_error("foo(1,\nbar(");
    assert_eq!(error.kind, "unexpected end of input");
    assert_eq!((error.line, error.column), (2, 4));
}

#[test]
fn test_missing_token_is_named() {
    let error = syntax_error("if (x { y }");
    assert_eq!(error.kind, "missing )");
    assert_eq!((error.line, error.column), (1, 5));
}

#[test]
fn test_typescript_and_javascript_dialects() {
    let typed = "function f(x: number): string { return String(x) }";
    assert!(parse_program(typed, ParseOptions::ANALYZER).is_ok());
    assert!(
        parse_program(typed, ParseOptions::ANALYZER.with_dialect(Dialect::JavaScript)).is_err()
    );
}

#[test]
fn test_jsx_parses_with_flag() {
    let source = "const el = <div>{name}</div>";
    let parsed = parse_program(source, ParseOptions::ANALYZER.with_jsx(true)).unwrap();
    assert_eq!(parsed.program.children().count(), 1);
}

#[test]
fn test_parse_input() {
    let parser = AstParser::new(ParseOptions::ANALYZER, 2);
    let input = InlineInput::new(["a()", "b()", "c()"]);
    let parsed = parser.parse(&input).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].source, "b()");
}

#[test]
fn test_empty_input_is_no_source() {
    let input = InlineInput::new(Vec::<String>::new());
    let err = AstParser::REPRESENTER.parse(&input).unwrap_err();
    assert!(matches!(err, AnalysisError::NoSource));
    assert_eq!(err.code(), "no_source");
}
