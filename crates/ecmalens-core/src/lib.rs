//! ESTree-shaped syntax trees for JavaScript and TypeScript.
//!
//! Sources are read through an [`input::Input`], parsed with tree-sitter and
//! lowered into the owned [`ast::Node`] model. Parsing in
//! [`ParseOptions::REPRESENTER`] mode drops positions so that equivalent
//! programs compare equal; [`ParseOptions::ANALYZER`] keeps them so node text
//! can be recovered with [`source::extract_source`].

pub mod ast;
pub mod config;
pub mod error;
pub mod input;
mod lower;
pub mod parser;
pub mod source;

pub use ast::{Field, LiteralValue, Node, NodeFlags, NodeId, NodeKind, VariableKind};
pub use error::{AnalysisError, ParseError, Result};
pub use parser::{AstParser, Dialect, ParseOptions, ParsedSource, parse_program};
pub use source::extract_source;
