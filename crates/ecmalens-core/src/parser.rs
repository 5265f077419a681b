//! Parsing sources into [`ParsedSource`] trees.

use crate::ast::{Node, Range, SourceLocation};
use crate::error::{AnalysisError, ParseError, Result};
use crate::input::Input;
use crate::lower::Lowerer;
use crate::source::LineIndex;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Grammar family used for parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// TypeScript, a superset of modern JavaScript.
    #[default]
    TypeScript,
    JavaScript,
}

impl Dialect {
    pub fn name(self) -> &'static str {
        match self {
            Dialect::TypeScript => "typescript",
            Dialect::JavaScript => "javascript",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Some(Dialect::TypeScript),
            "javascript" | "js" => Some(Dialect::JavaScript),
            _ => None,
        }
    }

    fn language(self, jsx: bool) -> tree_sitter::Language {
        match (self, jsx) {
            (Dialect::TypeScript, false) => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            (Dialect::TypeScript, true) => tree_sitter_typescript::LANGUAGE_TSX.into(),
            // The JavaScript grammar always accepts JSX.
            (Dialect::JavaScript, _) => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Collect comments into [`ParsedSource::comments`].
    pub comment: bool,
    /// Attach line/column locations to nodes.
    pub loc: bool,
    /// Attach byte ranges to nodes.
    pub range: bool,
    /// Accept JSX. TypeScript switches to the TSX grammar.
    pub jsx: bool,
    pub dialect: Dialect,
}

impl ParseOptions {
    /// Structure only. Trees of equivalent programs compare equal.
    pub const REPRESENTER: Self = Self {
        comment: false,
        loc: false,
        range: false,
        jsx: false,
        dialect: Dialect::TypeScript,
    };

    /// Positions retained, so source text can be recovered.
    pub const ANALYZER: Self = Self {
        comment: false,
        loc: true,
        range: true,
        jsx: false,
        dialect: Dialect::TypeScript,
    };

    pub fn with_comments(mut self) -> Self {
        self.comment = true;
        self
    }

    pub fn with_jsx(mut self, jsx: bool) -> Self {
        self.jsx = jsx;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::REPRESENTER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    Line,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub kind: CommentKind,
    /// Text without the `//` or `/* */` delimiters.
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// A program tree together with the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSource {
    pub program: Node,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

pub struct AstParser {
    options: ParseOptions,
    n: usize,
}

impl AstParser {
    pub const REPRESENTER: Self = Self::new(ParseOptions::REPRESENTER, 1);
    pub const ANALYZER: Self = Self::new(ParseOptions::ANALYZER, 1);

    /// Parser reading at most `n` sources per input.
    pub const fn new(options: ParseOptions, n: usize) -> Self {
        Self { options, n }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Read up to `n` sources from `input` and parse each of them.
    pub fn parse(&self, input: &dyn Input) -> Result<Vec<ParsedSource>> {
        let sources = input.read(self.n)?;
        tracing::debug!("=> inputs: {}", sources.len());
        if sources.is_empty() {
            return Err(AnalysisError::NoSource);
        }
        sources
            .into_iter()
            .map(|source| self.parse_sync(&source))
            .collect()
    }

    /// Parse one in-memory source.
    pub fn parse_sync(&self, source: &str) -> Result<ParsedSource> {
        let started = Instant::now();
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&self.options.dialect.language(self.options.jsx))?;
        let tree = parser.parse(source, None).ok_or_else(|| ParseError {
            line: 1,
            column: 0,
            kind: "parser produced no tree".to_string(),
            snippet: String::new(),
        })?;

        let root = tree.root_node();
        if root.has_error()
            && let Some(error) = first_error(root, source)
        {
            return Err(error.into());
        }

        let lowerer = Lowerer::new(source, self.options.range, self.options.loc);
        let program = lowerer.program(root);
        let comments = self
            .options
            .comment
            .then(|| collect_comments(root, source, self.options));

        tracing::debug!(
            "parsed {} bytes into {} nodes in {:?}",
            source.len(),
            program.size(),
            started.elapsed()
        );

        Ok(ParsedSource {
            program,
            source: source.to_string(),
            comments,
        })
    }
}

impl Default for AstParser {
    fn default() -> Self {
        Self::REPRESENTER
    }
}

/// Parse a single source with `options`.
pub fn parse_program(source: &str, options: ParseOptions) -> Result<ParsedSource> {
    AstParser::new(options, 1).parse_sync(source)
}

const SNIPPET_LEN: usize = 40;

/// Where parsing went wrong, taken from the first `ERROR` or `MISSING` node.
///
/// An error node inside a construct starts at the rejected token. At
/// statement level the error node also wraps the valid prefix of the
/// statement, so its last token is reported instead, or the end of the input
/// when the error runs to the end of the source.
fn first_error(root: tree_sitter::Node, source: &str) -> Option<ParseError> {
    let error = find_error(root)?;
    if error.is_missing() {
        return Some(error_at(
            error.start_position(),
            format!("missing {}", error.kind()),
            String::new(),
        ));
    }

    let statement_level = error
        .parent()
        .is_none_or(|parent| matches!(parent.kind(), "program" | "statement_block"));
    if !statement_level {
        return Some(unexpected_token(error, source));
    }
    if error.end_byte() >= source.trim_end().len() {
        return Some(error_at(
            error.end_position(),
            "unexpected end of input".to_string(),
            String::new(),
        ));
    }
    let mut cursor = error.walk();
    let last = error.children(&mut cursor).last().unwrap_or(error);
    Some(unexpected_token(last, source))
}

/// First `ERROR` or `MISSING` node at or under `node`, in pre-order.
fn find_error(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).find_map(find_error)
}

fn unexpected_token(node: tree_sitter::Node, source: &str) -> ParseError {
    let text = source.get(node.byte_range()).unwrap_or_default();
    error_at(
        node.start_position(),
        "unexpected token".to_string(),
        text.chars().take(SNIPPET_LEN).collect(),
    )
}

fn error_at(point: tree_sitter::Point, kind: String, snippet: String) -> ParseError {
    ParseError {
        line: point.row + 1,
        column: point.column,
        kind,
        snippet,
    }
}

fn collect_comments(root: tree_sitter::Node, source: &str, options: ParseOptions) -> Vec<Comment> {
    let lines = options.loc.then(|| LineIndex::new(source));
    let mut comments = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if matches!(node.kind(), "comment" | "html_comment") {
            let text = source.get(node.byte_range()).unwrap_or_default();
            let (kind, value) = if let Some(block) = text.strip_prefix("/*") {
                (CommentKind::Block, block.strip_suffix("*/").unwrap_or(block))
            } else {
                (
                    CommentKind::Line,
                    text.strip_prefix("//")
                        .or_else(|| text.strip_prefix("<!--"))
                        .unwrap_or(text),
                )
            };
            comments.push(Comment {
                kind,
                value: value.to_string(),
                range: options.range.then(|| Range {
                    start: node.start_byte(),
                    end: node.end_byte(),
                }),
                loc: lines
                    .as_ref()
                    .map(|lines| lines.location(node.start_byte(), node.end_byte())),
            });
        } else if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return comments;
            }
        }
    }
}
