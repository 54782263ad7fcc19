//! Lexer edge cases and error tests.

use genomescript::{LexErrorKind, TokenKind, lex, tokenize, tokenize_report};

// -----------------------------------------------------------
// Basic lexer behaviour.
// -----------------------------------------------------------

#[test]
fn lex_only_whitespace() {
    let tokens = tokenize("   \t  \n\n  ");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn lex_example_script() {
    let source = "# Load genomic data\n\
                  LOAD FASTA \"reference.fa\" -> genome\n\
                  \n\
                  ANALYZE genome COUNT_GC -> gc_content";
    let kinds: Vec<_> = tokenize(source).iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Comment,
            TokenKind::Newline,
            TokenKind::Keyword,
            TokenKind::Keyword,
            TokenKind::String,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Keyword,
            TokenKind::Identifier,
            TokenKind::Keyword,
            TokenKind::Arrow,
            TokenKind::Identifier,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_positions_across_lines() {
    let tokens = tokenize("LOAD\n\n  VCF");
    assert_eq!((tokens[0].span.line, tokens[0].span.column), (1, 1));
    assert_eq!((tokens[2].span.line, tokens[2].span.column), (3, 3));
    assert_eq!(tokens[2].span.offset, 8);
}

#[test]
fn lex_columns_count_characters() {
    let tokens = tokenize("\"générée\" x");
    assert_eq!(tokens[1].span.column, 11);
    assert_eq!(tokens[1].span.offset, 13);
}

#[test]
fn lex_unicode_identifier() {
    let tokens = tokenize("génome");
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].text, "génome");
}

#[test]
fn lex_eof_position() {
    let tokens = tokenize("LOAD\n");
    let eof = tokens.last().expect("eof");
    assert_eq!(eof.kind, TokenKind::Eof);
    assert_eq!((eof.span.line, eof.span.column), (2, 1));
}

#[test]
fn lex_arrow_without_spaces() {
    let tokens = tokenize("\"a.fa\"->g");
    assert_eq!(tokens[1].kind, TokenKind::Arrow);
    assert_eq!(tokens[2].text, "g");
}

#[test]
fn lex_number_then_word() {
    let tokens = tokenize("12abc");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].text, "12");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

#[test]
fn lex_number_with_two_points() {
    let tokens = tokenize("1.2.3");
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["1.2", ".", "3", ""]);
    assert_eq!(tokens[1].kind, TokenKind::Unknown);
}

#[test]
fn lex_backslash_outside_quote_escape_is_literal() {
    let tokens = tokenize(r#""C:\data\ref.fa""#);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value(), r"C:\data\ref.fa");
}

#[test]
fn lex_string_may_contain_hash_and_arrow() {
    let tokens = tokenize("\"# -> x\"");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].value(), "# -> x");
}

// -----------------------------------------------------------
// Error tokens.
// -----------------------------------------------------------

#[test]
fn lex_unterminated_string_at_end_of_input() {
    let lexed = lex("LOAD FASTA \"unterminated");
    assert_eq!(lexed.tokens[2].kind, TokenKind::Unknown);
    assert_eq!(lexed.tokens[2].text, "\"unterminated");
    assert_eq!(lexed.tokens[3].kind, TokenKind::Eof);
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
}

#[test]
fn lex_escaped_quote_at_end_stays_unterminated() {
    let lexed = lex(r#""abc\""#);
    assert_eq!(lexed.tokens[0].kind, TokenKind::Unknown);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
}

#[test]
fn lex_invalid_character() {
    let lexed = lex("LOAD FASTA @ genome");
    assert_eq!(lexed.tokens[2].kind, TokenKind::Unknown);
    assert_eq!(lexed.tokens[2].text, "@");
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnexpectedCharacter('@'));
    assert_eq!(
        lexed.errors[0].to_string(),
        "unexpected character: @ at line 1, column 12"
    );
}

#[test]
fn lex_error_display() {
    let lexed = lex("x > y");
    assert_eq!(
        lexed.errors[0].to_string(),
        "unexpected '>', did you mean '->'? at line 1, column 3"
    );
}

#[test]
fn tokenize_report_rows() {
    let report = tokenize_report("LOAD FASTA \"test.fa\" -> genome");
    let json = serde_json::to_value(&report.tokens[2]).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({"line": 1, "column": 12, "type": "STRING", "value": "test.fa"})
    );
    assert!(report.diagnostics.is_empty());
}

#[test]
fn tokenize_report_carries_lex_diagnostics() {
    let report = tokenize_report("LOAD \"open\nVCF $");
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.diagnostics[0].message, "unterminated string literal");
    assert_eq!(report.diagnostics[1].line, 2);
    assert_eq!(report.diagnostics[1].column, 5);
}
