use std::fmt;

use serde::Serialize;

use crate::token::Span;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Which stage produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Malformed token.
    Lex,
    /// Grammar violation.
    Syntax,
    /// Reference to an undefined name.
    Binding,
    /// Load or analysis failure reported by the provider.
    Provider,
    /// Statements skipped after cancellation.
    Cancelled,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lex => "lex",
            Self::Syntax => "syntax",
            Self::Binding => "binding",
            Self::Provider => "provider",
            Self::Cancelled => "cancelled",
        })
    }
}

/// A position-tagged problem collected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    #[must_use]
    pub fn error(category: Category, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }

    #[must_use]
    pub fn warning(category: Category, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(category, message, span)
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} at line {}, column {}",
            self.severity, self.category, self.message, self.line, self.column
        )
    }
}

/// Whether any diagnostic in `diagnostics` is an error.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
