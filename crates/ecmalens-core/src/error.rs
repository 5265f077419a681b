//! Error types shared by parsing, input and analysis.

use crate::ast::NodeKind;
use std::path::PathBuf;

/// Where and why the grammar rejected the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}, column {column}: {snippet:?}")]
pub struct ParseError {
    /// 1-based.
    pub line: usize,
    /// 0-based.
    pub column: usize,
    /// `"unexpected token"`, `"unexpected end of input"` or
    /// `"missing <token>"`.
    pub kind: String,
    pub snippet: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("no source file(s) found")]
    NoSource,
    #[error("could not parse source: {0}")]
    Parse(#[from] ParseError),
    #[error("{kind} node has no range; parse with ranges enabled")]
    MissingRange { kind: NodeKind },
    #[error("range {start}..{end} is outside the source ({len} bytes) or splits a character")]
    InvalidRange { start: usize, end: usize, len: usize },
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Stable machine-readable code, used by the CLI's JSON error output.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::NoSource => "no_source",
            AnalysisError::Parse(_) => "parse_failure",
            AnalysisError::MissingRange { .. } => "missing_range",
            AnalysisError::InvalidRange { .. } => "invalid_range",
            AnalysisError::Language(_) => "language",
            AnalysisError::Io { .. } => "io",
            AnalysisError::Config(_) => "config",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;
