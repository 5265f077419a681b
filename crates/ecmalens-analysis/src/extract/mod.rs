//! Facts extracted from a parsed program.
//!
//! Extractors borrow from the tree they are given; source text is only
//! sliced on request.

pub mod exports;
pub mod functions;
pub mod test_cases;
pub mod variables;

pub use exports::{ANONYMOUS, DeclarationKind, ExportKind, ExtractedExport, extract_exports};
pub use functions::{ExtractedFunction, FunctionKind, FunctionMetadata, extract_functions};
pub use test_cases::{Expectation, TestCase, extract_tests};
pub use variables::{ExtractedVariable, extract_variables};
