//! Provider that reads datasets from the local filesystem.
//!
//! The readers only understand the line structure of FASTA and VCF
//! files; they do not validate either format.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::analysis;
use crate::provider::{Provider, ProviderError};
use crate::value::{Genome, Value, Variant, VariantSet};

/// Loads files relative to a base directory and runs the built-in
/// analyses.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    base_dir: PathBuf,
}

impl LocalProvider {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn read(&self, path: &str) -> Result<String, ProviderError> {
        let full = self.base_dir.join(path);
        debug!("reading {}", full.display());
        fs::read_to_string(&full).map_err(|e| ProviderError::load(path, e))
    }
}

impl Provider for LocalProvider {
    fn load_genome(&self, path: &str) -> Result<Genome, ProviderError> {
        parse_fasta(path, &self.read(path)?)
    }

    fn load_variants(&self, path: &str) -> Result<VariantSet, ProviderError> {
        parse_vcf(path, &self.read(path)?)
    }

    fn run_analysis(&self, operation: &str, input: &Value) -> Result<Value, ProviderError> {
        analysis::run_builtin(operation, input)
    }
}

fn parse_fasta(path: &str, content: &str) -> Result<Genome, ProviderError> {
    let mut genome = Genome::new(path);

    for (n, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            let id = header.split_whitespace().next().unwrap_or_default();
            genome = genome.record(id, "");
        } else if let Some(record) = genome.records.last_mut() {
            record.sequence.push_str(line);
        } else {
            return Err(ProviderError::load(
                path,
                format!("line {}: sequence data before the first '>' header", n + 1),
            ));
        }
    }

    if genome.records.is_empty() {
        return Err(ProviderError::load(path, "no sequence records"));
    }
    Ok(genome)
}

fn parse_vcf(path: &str, content: &str) -> Result<VariantSet, ProviderError> {
    let mut set = VariantSet::new(path);

    for (n, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let variant = parse_vcf_line(line)
            .map_err(|reason| ProviderError::load(path, format!("line {}: {reason}", n + 1)))?;
        set.variants.push(variant);
    }

    Ok(set)
}

fn parse_vcf_line(line: &str) -> Result<Variant, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 5 {
        return Err(format!("expected at least 5 columns, found {}", fields.len()));
    }

    let position = fields[1]
        .parse::<u64>()
        .map_err(|_| format!("invalid position '{}'", fields[1]))?;
    let missing = |s: &str| (s != ".").then(|| s.to_string());
    let quality = match fields.get(5).copied() {
        None | Some(".") => None,
        Some(q) => Some(
            q.parse::<f64>()
                .map_err(|_| format!("invalid quality '{q}'"))?,
        ),
    };

    Ok(Variant {
        chrom: fields[0].to_string(),
        position,
        id: missing(fields[2]),
        reference: fields[3].to_string(),
        alternates: fields[4].split(',').map(str::to_string).collect(),
        quality,
    })
}
