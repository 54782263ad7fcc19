//! GenomeScript lexer, parser, and statement interpreter.
//!
//! GenomeScript is a small line-oriented language for genomic-data
//! workflows:
//!
//! ```text
//! # Load genomic data
//! LOAD FASTA "reference.fa" -> genome
//! LOAD VCF "variants.vcf" -> variants
//!
//! ANALYZE genome COUNT_GC -> gc_content
//! ```
//!
//! Scripts run against a [`Provider`] that loads datasets and performs
//! analyses. Errors are collected as position-tagged [`Diagnostic`]s
//! and never stop the remaining statements from running.
//!
//! # Quick start
//!
//! ```
//! use genomescript::{Genome, InMemoryProvider, RunOptions, Value, run_script};
//!
//! let provider = InMemoryProvider::new()
//!     .genome("reference.fa", Genome::new("reference.fa").record("chr1", "GGCCAT"));
//!
//! let script = "LOAD FASTA \"reference.fa\" -> genome\n\
//!               ANALYZE genome COUNT_GC -> gc_content\n";
//! let report = run_script(script, &provider, &RunOptions::default()).unwrap();
//!
//! assert_eq!(report.statements_run, 2);
//! assert!(report.diagnostics.is_empty());
//! assert_eq!(report.bindings[1].name, "gc_content");
//! ```
//!
//! ## Tokenize only
//!
//! ```
//! use genomescript::{TokenKind, tokenize_report};
//!
//! let report = tokenize_report("LOAD VCF \"v.vcf\" -> v");
//! assert_eq!(report.tokens[2].kind, TokenKind::String);
//! assert_eq!(report.tokens[2].value, "v.vcf");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod analysis;
pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod local;
pub mod parser;
pub mod provider;
pub mod report;
pub mod token;
pub mod value;

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use log::trace;

pub use ast::{AnalyzeStatement, LoadStatement, SourceKind, Statement};
pub use diagnostic::{Category, Diagnostic, Severity, has_errors};
pub use environment::{Binding, Environment};
pub use interpreter::{Execution, Interpreter, RunError, execute};
pub use lexer::{LexError, LexErrorKind, Lexed, lex, tokenize};
pub use local::LocalProvider;
pub use parser::{ParseError, ParseErrorKind, Parsed, parse};
pub use provider::{InMemoryProvider, Provider, ProviderError};
pub use report::{BindingSummary, RunReport, TokenReport, render_diagnostics};
pub use token::{Span, Token, TokenKind, TokenRow};
pub use value::{Genome, SequenceRecord, Table, Value, ValueKind, Variant, VariantSet};

/// Options for [`run_script`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Include the token table in the report.
    pub include_tokens: bool,
    /// Checked before each statement; once set, the run stops.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Lex, parse and execute `source` in a fresh environment.
///
/// Lex and syntax problems are reported per line and the valid lines
/// still run.
///
/// # Errors
///
/// Returns `RunError::ProviderFault` when the provider reports a fault.
/// Its partial report carries the parse diagnostics, the execution
/// diagnostics and the bindings produced before the fault.
pub fn run_script(
    source: &str,
    provider: &dyn Provider,
    options: &RunOptions,
) -> Result<RunReport, RunError> {
    let tokens = tokenize(source);
    let parsed = parse(&tokens);
    trace!("parsed {} statement(s)", parsed.statements.len());

    let mut interpreter = Interpreter::new(provider);
    if let Some(flag) = &options.cancel {
        interpreter = interpreter.with_cancel_flag(Arc::clone(flag));
    }
    let token_rows = || -> Option<Vec<TokenRow>> {
        options
            .include_tokens
            .then(|| tokens.iter().map(TokenRow::from).collect())
    };

    let mut env = Environment::new();
    match interpreter.execute(&parsed.statements, &mut env) {
        Ok(execution) => Ok(RunReport {
            tokens: token_rows(),
            statements_run: execution.statements_run,
            bindings: BindingSummary::of(&env),
            diagnostics: merge_diagnostics(parsed.diagnostics, execution.diagnostics),
        }),
        Err(RunError::ProviderFault {
            message,
            line,
            column,
            mut partial,
        }) => {
            partial.tokens = token_rows();
            partial.diagnostics =
                merge_diagnostics(parsed.diagnostics, std::mem::take(&mut partial.diagnostics));
            Err(RunError::ProviderFault {
                message,
                line,
                column,
                partial,
            })
        }
    }
}

fn merge_diagnostics(mut parsed: Vec<Diagnostic>, executed: Vec<Diagnostic>) -> Vec<Diagnostic> {
    parsed.extend(executed);
    parsed.sort_by_key(|d| (d.line, d.column));
    parsed
}

/// Tokenize `source` for editor tooling.
#[must_use]
pub fn tokenize_report(source: &str) -> TokenReport {
    let lexed = lex(source);
    TokenReport {
        tokens: lexed.tokens.iter().map(TokenRow::from).collect(),
        diagnostics: lexed
            .errors
            .into_iter()
            .map(|e| Diagnostic::error(Category::Lex, e.kind.to_string(), e.span))
            .collect(),
    }
}
