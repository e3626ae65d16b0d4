//! The error returned when a design file cannot be parsed.

use qhdl_diagnostics::code::{Category, DiagnosticCode};
use qhdl_diagnostics::{Diagnostic, Label};
use qhdl_source::Span;
use serde::{Deserialize, Serialize};

/// Code used for every lexer and parser failure.
pub const E100: DiagnosticCode = DiagnosticCode::new(Category::Error, 100);

/// The first lexical or grammatical error in a file.
///
/// Parsing stops at this point; no partial AST is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{line}:{col}: expected {expected}, found {found}")]
pub struct SyntaxError {
    /// 1-indexed line.
    pub line: u32,
    /// 1-indexed column.
    pub col: u32,
    /// What the grammar allowed here.
    pub expected: String,
    /// What the input contained.
    pub found: String,
    /// Location of the offending text.
    pub span: Span,
}

impl SyntaxError {
    /// Converts into an `E100` diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(
            E100,
            format!("expected {}, found {}", self.expected, self.found),
            self.span,
        )
        .with_label(Label::primary(self.span, format!("expected {}", self.expected)))
    }
}

impl From<SyntaxError> for Diagnostic {
    fn from(err: SyntaxError) -> Self {
        err.to_diagnostic()
    }
}
