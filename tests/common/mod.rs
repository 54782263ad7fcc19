#![allow(dead_code)]

use genomescript::{
    Genome, InMemoryProvider, Parsed, ProviderError, Value, Variant, VariantSet, parse, tokenize,
};

pub const EXAMPLE: &str = "LOAD FASTA \"reference.fa\" -> genome\n\
                           LOAD VCF \"variants.vcf\" -> variants\n\
                           ANALYZE genome COUNT_GC -> gc_content\n";

pub fn parse_ok(input: &str) -> Parsed {
    let parsed = parse(&tokenize(input));
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        parsed.diagnostics
    );
    parsed
}

pub fn reference() -> Genome {
    Genome::new("reference.fa")
        .record("chr1", "ACGTACGTGG")
        .record("chr2", "ATATGC")
}

pub fn variants() -> VariantSet {
    VariantSet::new("variants.vcf")
        .variant(Variant::new("chr1", 3, "G", "A"))
        .variant(Variant::new("chr2", 5, "G", "C"))
}

/// Provider serving `reference.fa` and `variants.vcf`, with
/// `COUNT_GC` answering 0.41 for genomes.
pub fn fixture_provider() -> InMemoryProvider {
    InMemoryProvider::new()
        .genome("reference.fa", reference())
        .variants("variants.vcf", variants())
        .analysis("COUNT_GC", |input| match input {
            Value::Genome(_) => Ok(Value::Scalar(0.41)),
            other => Err(ProviderError::UnsupportedInput {
                operation: "COUNT_GC".to_string(),
                found: other.kind(),
            }),
        })
}
