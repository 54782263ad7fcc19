//! Built-in analysis operations.
//!
//! Their names are reserved keywords. Providers may register further
//! operations under any `SCREAMING_SNAKE_CASE` name.

use std::collections::BTreeMap;

use crate::provider::ProviderError;
use crate::value::{Genome, Table, Value, VariantSet};

pub const COUNT_GC: &str = "COUNT_GC";
pub const LENGTH: &str = "LENGTH";
pub const COUNT_SEQUENCES: &str = "COUNT_SEQUENCES";
pub const COUNT_VARIANTS: &str = "COUNT_VARIANTS";
pub const SUMMARY: &str = "SUMMARY";
pub const QUALITY: &str = "QUALITY";

/// Names of all built-in operations.
pub const OPERATIONS: &[&str] = &[
    COUNT_GC,
    LENGTH,
    COUNT_SEQUENCES,
    COUNT_VARIANTS,
    SUMMARY,
    QUALITY,
];

/// Run the built-in operation `operation` on `input`.
///
/// # Errors
///
/// `UnknownOperation` for names outside [`OPERATIONS`],
/// `UnsupportedInput` when the input has the wrong kind, and
/// `Analysis` when the input holds no usable data.
pub fn run_builtin(operation: &str, input: &Value) -> Result<Value, ProviderError> {
    match (operation, input) {
        (COUNT_GC, Value::Genome(g)) => gc_fraction(g).map(Value::Scalar).ok_or_else(|| {
            ProviderError::Analysis {
                operation: operation.to_string(),
                reason: "no A/C/G/T bases".to_string(),
            }
        }),
        (LENGTH, Value::Genome(g)) => Ok(Value::Scalar(count(g.total_length()))),
        (COUNT_SEQUENCES, Value::Genome(g)) => Ok(Value::Scalar(count(g.records.len()))),
        (COUNT_VARIANTS, Value::VariantSet(v)) => Ok(Value::Scalar(count(v.variants.len()))),
        (SUMMARY, Value::Genome(g)) => Ok(Value::Table(genome_summary(g))),
        (SUMMARY, Value::VariantSet(v)) => Ok(Value::Table(variant_summary(v))),
        (QUALITY, Value::VariantSet(v)) => quality_metrics(v).map(Value::Table).ok_or_else(|| {
            ProviderError::Analysis {
                operation: operation.to_string(),
                reason: "no variant carries a QUAL score".to_string(),
            }
        }),
        (op, _) if OPERATIONS.contains(&op) => Err(ProviderError::UnsupportedInput {
            operation: op.to_string(),
            found: input.kind(),
        }),
        (op, _) => Err(ProviderError::UnknownOperation(op.to_string())),
    }
}

#[allow(clippy::cast_precision_loss)]
fn count(n: usize) -> f64 {
    n as f64
}

fn base_counts(sequence: &str) -> (usize, usize) {
    sequence
        .bytes()
        .fold((0, 0), |(gc, called), b| match b.to_ascii_uppercase() {
            b'G' | b'C' => (gc + 1, called + 1),
            b'A' | b'T' => (gc, called + 1),
            _ => (gc, called),
        })
}

/// G+C fraction over called bases; `None` when nothing was called.
fn gc_fraction(genome: &Genome) -> Option<f64> {
    let (gc, called) = genome
        .records
        .iter()
        .map(|r| base_counts(&r.sequence))
        .fold((0, 0), |(a, b), (c, d)| (a + c, b + d));
    (called > 0).then(|| count(gc) / count(called))
}

fn genome_summary(genome: &Genome) -> Table {
    genome.records.iter().fold(
        Table::new(["id", "length", "gc"]),
        |table, record| {
            let (gc, called) = base_counts(&record.sequence);
            let gc = if called == 0 {
                "NA".to_string()
            } else {
                format!("{:.4}", count(gc) / count(called))
            };
            table.row([record.id.clone(), record.sequence.len().to_string(), gc])
        },
    )
}

fn variant_summary(set: &VariantSet) -> Table {
    let mut per_chrom: BTreeMap<&str, usize> = BTreeMap::new();
    for v in &set.variants {
        *per_chrom.entry(v.chrom.as_str()).or_default() += 1;
    }
    per_chrom
        .into_iter()
        .fold(Table::new(["chrom", "variants"]), |table, (chrom, n)| {
            table.row([chrom.to_string(), n.to_string()])
        })
}

/// QUAL statistics; variants without a score are counted as missing.
fn quality_metrics(set: &VariantSet) -> Option<Table> {
    let scores: Vec<f64> = set.variants.iter().filter_map(|v| v.quality).collect();
    if scores.is_empty() {
        return None;
    }
    let mean = scores.iter().sum::<f64>() / count(scores.len());
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(
        Table::new(["scored", "missing", "mean", "min", "max"]).row([
            scores.len().to_string(),
            (set.variants.len() - scores.len()).to_string(),
            format!("{mean:.2}"),
            min.to_string(),
            max.to_string(),
        ]),
    )
}
