//! Property-based tests with proptest.
//!
//! The lexer must cover every byte of arbitrary input, and a single
//! malformed line must never cost the valid lines around it.

mod common;

use common::fixture_provider;
use genomescript::{Environment, RunOptions, TokenKind, execute, parse, run_script, tokenize};
use proptest::prelude::*;

// -- Strategies --

/// Binding name: lowercase start, never a keyword.
fn binding_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_map(|s| s)
}

/// A line the fixture provider always executes successfully.
fn valid_line() -> impl Strategy<Value = String> {
    prop_oneof![
        binding_name().prop_map(|n| format!("LOAD FASTA \"reference.fa\" -> {n}")),
        binding_name().prop_map(|n| format!("LOAD VCF \"variants.vcf\" -> {n}")),
    ]
}

/// A line the parser must reject.
fn bad_line() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "LOAD FASTA -> genome",
        "LOAD \"reference.fa\" -> genome",
        "LOAD FASTA \"unterminated -> genome",
        "ANALYZE",
        "ANALYZE genome -> out",
        "ANALYZE genome count_gc -> out",
        "LOAD VCF \"variants.vcf\" -> 42",
        "LOAD VCF \"variants.vcf\" -> v extra",
        "FILTER variants -> v",
        "@@@",
        "- > genome",
    ])
    .prop_map(str::to_string)
}

/// Script-like text mixing keywords, strings, arrows, and noise.
fn script_like() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("LOAD".to_string()),
            Just("ANALYZE".to_string()),
            Just("FASTA".to_string()),
            Just("COUNT_GC".to_string()),
            Just("->".to_string()),
            Just("\n".to_string()),
            Just("\r\n".to_string()),
            Just(" ".to_string()),
            Just("\t".to_string()),
            Just("#".to_string()),
            Just("\"".to_string()),
            Just("\\\"".to_string()),
            "[a-z0-9_.]{1,6}",
            "[ -~]{1,4}",
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

/// Check that tokens cover `input` exactly, with only whitespace
/// between them.
fn assert_covers(input: &str) -> Result<(), TestCaseError> {
    let tokens = tokenize(input);
    let mut cursor = 0;

    for token in &tokens {
        let start = token.span.offset;
        prop_assert!(start >= cursor, "overlapping token {:?}", token);
        let gap = &input[cursor..start];
        prop_assert!(
            gap.chars()
                .enumerate()
                .all(|(i, c)| c.is_whitespace() || (cursor == 0 && i == 0 && c == '\u{FEFF}')),
            "non-whitespace gap {:?} before {:?}",
            gap,
            token
        );
        prop_assert_eq!(&input[start..start + token.text.len()], token.text.as_str());
        cursor = start + token.text.len();
    }

    prop_assert_eq!(cursor, input.len());
    let last = tokens.last().map(|t| t.kind);
    prop_assert_eq!(last, Some(TokenKind::Eof));
    Ok(())
}

// -- Property tests --

proptest! {
    /// Token texts plus skipped whitespace rebuild arbitrary input.
    #[test]
    fn tokens_cover_arbitrary_input(input in any::<String>()) {
        assert_covers(&input)?;
    }

    /// Same property on text that looks like GenomeScript.
    #[test]
    fn tokens_cover_script_like_input(input in script_like()) {
        assert_covers(&input)?;
    }

    /// One malformed line among valid ones costs exactly one
    /// diagnostic and nothing else.
    #[test]
    fn bad_line_is_isolated(
        lines in prop::collection::vec(valid_line(), 0..8),
        bad in bad_line(),
        at in any::<prop::sample::Index>(),
    ) {
        let mut script = lines.clone();
        script.insert(at.index(lines.len() + 1), bad);
        let source = script.join("\n");

        let report = run_script(&source, &fixture_provider(), &RunOptions::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(report.statements_run, lines.len());
        prop_assert_eq!(report.diagnostics.len(), 1, "{:?}", report.diagnostics);
    }

    /// Executing the same statements twice with fresh environments
    /// gives identical results.
    #[test]
    fn execution_is_idempotent(input in script_like()) {
        let statements = parse(&tokenize(&input)).statements;
        let provider = fixture_provider();

        let mut first = Environment::new();
        let a = execute(&statements, &mut first, &provider);
        let mut second = Environment::new();
        let b = execute(&statements, &mut second, &provider);

        prop_assert_eq!(a, b);
        prop_assert_eq!(first.snapshot(), second.snapshot());
    }
}
