use std::fmt;

use serde::Serialize;

/// A named sequence from a reference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub id: String,
    pub sequence: String,
}

/// Reference sequences loaded by `LOAD FASTA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    pub source: String,
    pub records: Vec<SequenceRecord>,
}

impl Genome {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            records: Vec::new(),
        }
    }

    /// Append a sequence record.
    #[must_use]
    pub fn record(mut self, id: impl Into<String>, sequence: impl Into<String>) -> Self {
        self.records.push(SequenceRecord {
            id: id.into(),
            sequence: sequence.into(),
        });
        self
    }

    /// Total number of bases over all records.
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.records.iter().map(|r| r.sequence.len()).sum()
    }
}

/// A single variant call.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub chrom: String,
    pub position: u64,
    pub id: Option<String>,
    pub reference: String,
    pub alternates: Vec<String>,
    pub quality: Option<f64>,
}

impl Variant {
    #[must_use]
    pub fn new(
        chrom: impl Into<String>,
        position: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            position,
            id: None,
            reference: reference.into(),
            alternates: vec![alternate.into()],
            quality: None,
        }
    }

    /// Set the QUAL score.
    #[must_use]
    pub const fn quality(mut self, quality: f64) -> Self {
        self.quality = Some(quality);
        self
    }
}

/// Variant calls loaded by `LOAD VCF`.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSet {
    pub source: String,
    pub variants: Vec<Variant>,
}

impl VariantSet {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            variants: Vec::new(),
        }
    }

    /// Append a variant.
    #[must_use]
    pub fn variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }
}

/// Tabular analysis result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append one row.
    #[must_use]
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }
}

/// Value bound to a script name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Genome(Genome),
    VariantSet(VariantSet),
    Scalar(f64),
    Table(Table),
}

/// The closed set of value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    Genome,
    VariantSet,
    Scalar,
    Table,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Genome => "genome",
            Self::VariantSet => "variant-set",
            Self::Scalar => "scalar",
            Self::Table => "table",
        })
    }
}

impl Value {
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Genome(_) => ValueKind::Genome,
            Self::VariantSet(_) => ValueKind::VariantSet,
            Self::Scalar(_) => ValueKind::Scalar,
            Self::Table(_) => ValueKind::Table,
        }
    }

    /// One-line description used in run reports.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Genome(g) => format!(
                "{}: {} sequence(s), {} bp",
                self.kind(),
                g.records.len(),
                g.total_length()
            ),
            Self::VariantSet(v) => {
                format!("{}: {} variant(s)", self.kind(), v.variants.len())
            }
            Self::Scalar(n) => format!("{}: {n}", self.kind()),
            Self::Table(t) => format!(
                "{}: {} column(s), {} row(s)",
                self.kind(),
                t.columns.len(),
                t.rows.len()
            ),
        }
    }
}
