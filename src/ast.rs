use std::fmt;

use crate::token::Span;

/// Data source named after `LOAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Fasta,
    Vcf,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fasta => "FASTA",
            Self::Vcf => "VCF",
        })
    }
}

/// `LOAD <kind> "<path>" -> <binding>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadStatement {
    pub source_kind: SourceKind,
    pub path: String,
    pub binding: String,
    pub span: Span,
}

/// `ANALYZE <binding> <operation> -> <result>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeStatement {
    pub binding: String,
    pub operation: String,
    pub result: String,
    pub span: Span,
}

/// A parsed script statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Load(LoadStatement),
    Analyze(AnalyzeStatement),
}

impl Statement {
    /// Position of the leading keyword.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Load(s) => s.span,
            Self::Analyze(s) => s.span,
        }
    }

    /// Name this statement binds on success.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Load(s) => &s.binding,
            Self::Analyze(s) => &s.result,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(s) => write!(
                f,
                "LOAD {} \"{}\" -> {}",
                s.source_kind,
                s.path.replace('"', "\\\""),
                s.binding
            ),
            Self::Analyze(s) => {
                write!(f, "ANALYZE {} {} -> {}", s.binding, s.operation, s.result)
            }
        }
    }
}
