//! Running scripts against files on disk.

use std::fs;

use genomescript::{Category, LocalProvider, Provider, RunOptions, Value, ValueKind, run_script};

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("reference.fa"),
        ">chr1 test\nGGCCAATT\n>chr2\nGC\n",
    )
    .expect("write fasta");
    fs::write(
        dir.path().join("variants.vcf"),
        "##fileformat=VCFv4.2\n\
         #CHROM\tPOS\tID\tREF\tALT\tQUAL\n\
         chr1\t2\trs1\tG\tA\t30\n\
         chr1\t5\t.\tA\tC\t.\n\
         chr2\t1\t.\tG\tT\t12.5\n",
    )
    .expect("write vcf");
    dir
}

#[test]
fn full_workflow() {
    let dir = workspace();
    let provider = LocalProvider::new(dir.path());
    let report = run_script(
        "LOAD FASTA \"reference.fa\" -> genome\n\
         LOAD VCF \"variants.vcf\" -> variants\n\
         ANALYZE genome COUNT_GC -> gc_content\n\
         ANALYZE variants COUNT_VARIANTS -> n\n\
         ANALYZE variants SUMMARY -> per_chrom\n\
         ANALYZE variants QUALITY -> qual\n",
        &provider,
        &RunOptions::default(),
    )
    .expect("run");

    assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    assert_eq!(report.statements_run, 6);
    assert_eq!(report.bindings[0].summary, "genome: 2 sequence(s), 10 bp");
    assert_eq!(report.bindings[2].summary, "scalar: 0.6");
    assert_eq!(report.bindings[3].summary, "scalar: 3");
    assert_eq!(report.bindings[4].kind, ValueKind::Table);
    assert_eq!(report.bindings[5].summary, "table: 5 column(s), 1 row(s)");
}

#[test]
fn quality_reads_qual_column() {
    let dir = workspace();
    let provider = LocalProvider::new(dir.path());
    assert_eq!(provider.base_dir(), dir.path());

    let variants = Provider::load_variants(&provider, "variants.vcf").expect("load");
    let Ok(Value::Table(table)) =
        Provider::run_analysis(&provider, "QUALITY", &Value::VariantSet(variants))
    else {
        panic!("expected a table");
    };
    assert_eq!(table.rows, vec![vec!["2", "1", "21.25", "12.5", "30"]]);
}

#[test]
fn missing_file_is_a_provider_diagnostic() {
    let dir = workspace();
    let provider = LocalProvider::new(dir.path());
    let report = run_script(
        "LOAD FASTA \"absent.fa\" -> genome\nLOAD VCF \"variants.vcf\" -> v\n",
        &provider,
        &RunOptions::default(),
    )
    .expect("run");

    assert_eq!(report.statements_run, 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].category, Category::Provider);
    assert!(report.diagnostics[0].message.starts_with("cannot load 'absent.fa'"));
}

#[test]
fn malformed_vcf_line() {
    let dir = workspace();
    fs::write(dir.path().join("bad.vcf"), "chr1\t10\t.\tA\n").expect("write");
    let provider = LocalProvider::new(dir.path());

    let err = Provider::load_variants(&provider, "bad.vcf").unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot load 'bad.vcf': line 1: expected at least 5 columns, found 4"
    );
}

#[test]
fn builtin_analysis_on_loaded_genome() {
    let dir = workspace();
    let provider = LocalProvider::new(dir.path());
    let genome = Provider::load_genome(&provider, "reference.fa").expect("load");
    let length =
        Provider::run_analysis(&provider, "LENGTH", &Value::Genome(genome))
            .expect("length");
    assert_eq!(length, Value::Scalar(10.0));
}
