use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::ast::{AnalyzeStatement, LoadStatement, SourceKind, Statement};
use crate::diagnostic::{Category, Diagnostic};
use crate::environment::Environment;
use crate::provider::{Provider, ProviderError};
use crate::report::{BindingSummary, RunReport};
use crate::token::Span;
use crate::value::Value;

/// Failure that ends a run instead of becoming a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// The provider reported a defect in itself.
    ///
    /// `partial` holds what the run produced before the fault. The fault
    /// itself is not among its diagnostics.
    #[error("{message} at line {line}, column {column}")]
    ProviderFault {
        message: String,
        line: usize,
        column: usize,
        partial: Box<RunReport>,
    },
}

/// A provider fault before the partial results are attached.
struct Fault {
    message: String,
    span: Span,
}

/// Outcome of executing a statement sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Execution {
    /// Statements that completed and updated a binding.
    pub statements_run: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Execute `statements` in order against `env`.
///
/// # Errors
///
/// Returns `RunError::ProviderFault` when the provider reports a
/// fault. Every other failure is collected as a diagnostic.
pub fn execute(
    statements: &[Statement],
    env: &mut Environment,
    provider: &dyn Provider,
) -> Result<Execution, RunError> {
    Interpreter::new(provider).execute(statements, env)
}

/// Walks statements and dispatches them to a provider.
pub struct Interpreter<'p> {
    provider: &'p dyn Provider,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'p> Interpreter<'p> {
    #[must_use]
    pub fn new(provider: &'p dyn Provider) -> Self {
        Self {
            provider,
            cancel: None,
        }
    }

    /// Stop before the next statement once `flag` is set.
    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Execute `statements` in order against `env`.
    ///
    /// # Errors
    ///
    /// Returns `RunError::ProviderFault` when the provider reports a
    /// fault. Bindings made before the fault stay in `env` and are also
    /// summarised in the error, along with the diagnostics so far.
    pub fn execute(
        &self,
        statements: &[Statement],
        env: &mut Environment,
    ) -> Result<Execution, RunError> {
        let mut execution = Execution::default();

        for (index, stmt) in statements.iter().enumerate() {
            if self.is_cancelled() {
                let skipped = statements.len() - index;
                warn!("run cancelled, skipping {skipped} statement(s)");
                execution.diagnostics.push(Diagnostic::warning(
                    Category::Cancelled,
                    format!("run cancelled, {skipped} statement(s) not executed"),
                    stmt.span(),
                ));
                break;
            }

            debug!("executing `{stmt}`");
            let outcome = match self.execute_statement(stmt, env) {
                Ok(outcome) => outcome,
                Err(fault) => {
                    return Err(RunError::ProviderFault {
                        message: fault.message,
                        line: fault.span.line,
                        column: fault.span.column,
                        partial: Box::new(RunReport {
                            tokens: None,
                            statements_run: execution.statements_run,
                            bindings: BindingSummary::of(env),
                            diagnostics: execution.diagnostics,
                        }),
                    });
                }
            };
            match outcome {
                None => {
                    debug!("bound `{}`", stmt.target());
                    execution.statements_run += 1;
                }
                Some(diagnostic) => {
                    debug!("statement failed: {diagnostic}");
                    execution.diagnostics.push(diagnostic);
                }
            }
        }

        Ok(execution)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn execute_statement(
        &self,
        stmt: &Statement,
        env: &mut Environment,
    ) -> Result<Option<Diagnostic>, Fault> {
        match stmt {
            Statement::Load(load) => self.execute_load(load, env),
            Statement::Analyze(analyze) => self.execute_analyze(analyze, env),
        }
    }

    fn execute_load(
        &self,
        stmt: &LoadStatement,
        env: &mut Environment,
    ) -> Result<Option<Diagnostic>, Fault> {
        let loaded = match stmt.source_kind {
            SourceKind::Fasta => self.provider.load_genome(&stmt.path).map(Value::Genome),
            SourceKind::Vcf => self
                .provider
                .load_variants(&stmt.path)
                .map(Value::VariantSet),
        };

        match loaded {
            Ok(value) => {
                env.set(stmt.binding.as_str(), value);
                Ok(None)
            }
            Err(err) => provider_failure(err, stmt.span).map(Some),
        }
    }

    fn execute_analyze(
        &self,
        stmt: &AnalyzeStatement,
        env: &mut Environment,
    ) -> Result<Option<Diagnostic>, Fault> {
        let Some(input) = env.get(&stmt.binding) else {
            return Ok(Some(Diagnostic::error(
                Category::Binding,
                format!("unknown binding `{}`", stmt.binding),
                stmt.span,
            )));
        };

        match self.provider.run_analysis(&stmt.operation, input) {
            Ok(value) => {
                env.set(stmt.result.as_str(), value);
                Ok(None)
            }
            Err(err) => provider_failure(err, stmt.span).map(Some),
        }
    }
}

fn provider_failure(err: ProviderError, span: Span) -> Result<Diagnostic, Fault> {
    if err.is_recoverable() {
        Ok(Diagnostic::error(Category::Provider, err.to_string(), span))
    } else {
        warn!("{err} at line {}, column {}", span.line, span.column);
        Err(Fault {
            message: err.to_string(),
            span,
        })
    }
}
