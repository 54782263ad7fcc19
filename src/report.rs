//! Structured results returned to callers and a plain-text renderer
//! for diagnostics.

use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::environment::Environment;
use crate::token::TokenRow;
use crate::value::ValueKind;

/// Name, kind and summary of one binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    pub name: String,
    pub kind: ValueKind,
    pub summary: String,
}

impl BindingSummary {
    /// Summaries for every binding in definition order.
    #[must_use]
    pub fn of(env: &Environment) -> Vec<Self> {
        env.iter()
            .map(|(name, value)| Self {
                name: name.to_string(),
                kind: value.kind(),
                summary: value.summary(),
            })
            .collect()
    }
}

/// Result of a script execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenRow>>,
    pub statements_run: usize,
    pub bindings: Vec<BindingSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of a tokenize-only request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenReport {
    pub tokens: Vec<TokenRow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Render diagnostics with the offending source line and a caret.
///
/// ```text
/// error[syntax]: expected a quoted path, found '->' (column 12)
///  --> line 1, column 1
///   |
/// 1 | LOAD FASTA -> genome
///   | ^
/// ```
#[must_use]
pub fn render_diagnostics(source: &str, diagnostics: &[Diagnostic]) -> String {
    // Lexer columns start after a leading BOM.
    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
    let lines: Vec<&str> = source.lines().collect();
    let mut out = String::new();

    for (i, d) in diagnostics.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_one(&mut out, &lines, d);
    }

    out
}

fn render_one(out: &mut String, lines: &[&str], d: &Diagnostic) {
    out.push_str(&format!("{}[{}]: {}\n", d.severity, d.category, d.message));
    out.push_str(&format!(" --> line {}, column {}\n", d.line, d.column));

    let Some(text) = d.line.checked_sub(1).and_then(|i| lines.get(i)) else {
        return;
    };
    let number = d.line.to_string();
    let gutter = " ".repeat(number.len());
    let pad: String = text
        .chars()
        .take(d.column.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();

    out.push_str(&format!("{gutter} |\n"));
    out.push_str(&format!("{number} | {}\n", text.trim_end_matches('\r')));
    out.push_str(&format!("{gutter} | {pad}^\n"));
}
