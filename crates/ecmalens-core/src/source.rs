//! Mapping nodes back to source text.

use crate::ast::{Node, Position, Range, SourceLocation};
use crate::error::{AnalysisError, Result};

/// Verbatim source text covered by `node`.
///
/// Fails with [`AnalysisError::MissingRange`] when the tree was parsed without
/// ranges, and [`AnalysisError::InvalidRange`] when the range does not belong
/// to `source`.
pub fn extract_source<'s>(source: &'s str, node: &Node) -> Result<&'s str> {
    let range = node
        .range
        .ok_or(AnalysisError::MissingRange { kind: node.kind })?;
    slice(source, range)
}

/// Like [`extract_source`], for a raw range.
pub fn slice(source: &str, range: Range) -> Result<&str> {
    source
        .get(range.start..range.end)
        .ok_or(AnalysisError::InvalidRange {
            start: range.start,
            end: range.end,
            len: source.len(),
        })
}

/// Byte offset to line/column lookup.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// 1-based line and 0-based byte column of `offset`.
    pub fn position(&self, offset: usize) -> Position {
        let line = self.starts.partition_point(|&start| start <= offset);
        let line_start = self.starts.get(line.saturating_sub(1)).copied().unwrap_or(0);
        Position {
            line,
            column: offset - line_start,
        }
    }

    pub fn location(&self, start: usize, end: usize) -> SourceLocation {
        SourceLocation {
            start: self.position(start),
            end: self.position(end),
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}
