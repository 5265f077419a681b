//! Analysis over ecmalens syntax trees.
//!
//! [`traverse`] walks a tree with enter/exit hooks, [`guards`] recognize
//! node shapes, [`queries`] search with both, and [`extract`] turns
//! programs into exports, functions, variables and test cases.

pub mod extract;
pub mod guards;
pub mod queries;
pub mod traverse;

pub use extract::{
    ExtractedExport, ExtractedFunction, ExtractedVariable, TestCase, extract_exports,
    extract_functions, extract_tests, extract_variables,
};
pub use queries::{find_all, find_first, find_top_level_constants};
pub use traverse::{Control, Traverser, Visitors};
