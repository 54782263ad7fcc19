//! The data and analysis boundary the interpreter calls into.

use std::collections::HashMap;
use std::fmt;

use crate::analysis;
use crate::value::{Genome, Value, ValueKind, VariantSet};

/// Error returned by a [`Provider`].
///
/// Every variant except `Fault` is an expected failure that the
/// interpreter reports as a diagnostic. `Fault` signals a broken
/// provider and ends the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// A data source could not be loaded.
    #[error("cannot load '{path}': {reason}")]
    Load { path: String, reason: String },
    /// No analysis is registered under this name.
    #[error("unknown operation {0}")]
    UnknownOperation(String),
    /// The operation does not accept this kind of value.
    #[error("{operation} cannot be applied to a {found}")]
    UnsupportedInput { operation: String, found: ValueKind },
    /// The analysis ran and failed.
    #[error("{operation} failed: {reason}")]
    Analysis { operation: String, reason: String },
    /// The provider itself is broken.
    #[error("provider fault: {0}")]
    Fault(String),
}

impl ProviderError {
    #[must_use]
    pub fn load(path: &str, reason: impl fmt::Display) -> Self {
        Self::Load {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether the run may continue after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fault(_))
    }
}

/// Supplies genomic data and analysis results to the interpreter.
///
/// Methods take `&self` so one provider can serve several
/// independent runs.
pub trait Provider {
    /// Load reference sequences for `LOAD FASTA`.
    fn load_genome(&self, path: &str) -> Result<Genome, ProviderError>;

    /// Load variant calls for `LOAD VCF`.
    fn load_variants(&self, path: &str) -> Result<VariantSet, ProviderError>;

    /// Run `operation` on `input` for `ANALYZE`.
    fn run_analysis(&self, operation: &str, input: &Value) -> Result<Value, ProviderError>;
}

type AnalysisFn = Box<dyn Fn(&Value) -> Result<Value, ProviderError> + Send + Sync>;

/// Provider backed by in-memory datasets.
///
/// Registered analyses take precedence over the built-in ones.
#[derive(Default)]
pub struct InMemoryProvider {
    genomes: HashMap<String, Genome>,
    variants: HashMap<String, VariantSet>,
    analyses: HashMap<String, AnalysisFn>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `genome` for `path`.
    #[must_use]
    pub fn genome(mut self, path: &str, genome: Genome) -> Self {
        self.genomes.insert(path.to_string(), genome);
        self
    }

    /// Serve `variants` for `path`.
    #[must_use]
    pub fn variants(mut self, path: &str, variants: VariantSet) -> Self {
        self.variants.insert(path.to_string(), variants);
        self
    }

    /// Register an analysis under `name`.
    #[must_use]
    pub fn analysis<F>(mut self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, ProviderError> + Send + Sync + 'static,
    {
        self.analyses.insert(name.to_string(), Box::new(f));
        self
    }
}

impl fmt::Debug for InMemoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryProvider")
            .field("genomes", &self.genomes.keys().collect::<Vec<_>>())
            .field("variants", &self.variants.keys().collect::<Vec<_>>())
            .field("analyses", &self.analyses.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Provider for InMemoryProvider {
    fn load_genome(&self, path: &str) -> Result<Genome, ProviderError> {
        self.genomes
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::load(path, "no such genome"))
    }

    fn load_variants(&self, path: &str) -> Result<VariantSet, ProviderError> {
        self.variants
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::load(path, "no such variant set"))
    }

    fn run_analysis(&self, operation: &str, input: &Value) -> Result<Value, ProviderError> {
        match self.analyses.get(operation) {
            Some(f) => f(input),
            None => analysis::run_builtin(operation, input),
        }
    }
}
