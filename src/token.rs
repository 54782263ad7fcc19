use std::fmt;

use serde::Serialize;

use crate::analysis::OPERATIONS;

/// Source location for error reporting.
///
/// `line` and `column` are 1-based, `column` counts characters.
/// `offset` is the byte offset of the first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Reserved word (`LOAD`, `FASTA`, `COUNT_GC`, ...).
    Keyword,
    /// Binding name or unregistered word.
    Identifier,
    /// Double-quoted string (`"..."`).
    String,
    /// Decimal number.
    Number,
    /// Binding arrow `->`.
    Arrow,
    /// End of a line that carried at least one token.
    Newline,
    /// Comment (`# ...`).
    Comment,
    /// End of input.
    Eof,
    /// Malformed input that could not form any other token.
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keyword => "KEYWORD",
            Self::Identifier => "IDENTIFIER",
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Arrow => "ARROW",
            Self::Newline => "NEWLINE",
            Self::Comment => "COMMENT",
            Self::Eof => "EOF",
            Self::Unknown => "UNKNOWN",
        })
    }
}

/// Statement keywords.
pub const LOAD: &str = "LOAD";
pub const ANALYZE: &str = "ANALYZE";

/// Data source keywords.
pub const FASTA: &str = "FASTA";
pub const VCF: &str = "VCF";

/// Whether `word` belongs to the fixed keyword set.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    matches!(word, LOAD | ANALYZE | FASTA | VCF) || OPERATIONS.contains(&word)
}

/// A single token with its kind, source text, and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Value shown to users: string contents without quotes,
    /// nothing for `Eof`, the raw text otherwise.
    #[must_use]
    pub fn value(&self) -> String {
        match self.kind {
            TokenKind::String => {
                let inner = self
                    .text
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(&self.text);
                inner.replace("\\\"", "\"")
            }
            TokenKind::Eof => String::new(),
            _ => self.text.clone(),
        }
    }

    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == word
    }
}

/// One row of the token table: the shape consumed by editor tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRow {
    pub line: usize,
    pub column: usize,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: String,
}

impl From<&Token> for TokenRow {
    fn from(token: &Token) -> Self {
        Self {
            line: token.span.line,
            column: token.span.column,
            kind: token.kind,
            value: token.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token {
            kind,
            text: text.to_string(),
            span: Span::new(1, 1, 0),
        }
    }

    #[test]
    fn string_value_strips_quotes() {
        let t = token(TokenKind::String, r#""say \"hi\"""#);
        assert_eq!(t.value(), r#"say "hi""#);
    }

    #[test]
    fn eof_has_empty_value() {
        assert_eq!(token(TokenKind::Eof, "").value(), "");
    }

    #[test]
    fn keyword_set() {
        assert!(is_keyword("LOAD"));
        assert!(is_keyword("COUNT_GC"));
        assert!(is_keyword("QUALITY"));
        assert!(!is_keyword("load"));
        assert!(!is_keyword("genome"));
    }

    #[test]
    fn row_serializes_type_field() {
        let row = TokenRow::from(&token(TokenKind::Arrow, "->"));
        let json = serde_json::to_string(&row).expect("serialize");
        assert_eq!(json, r#"{"line":1,"column":1,"type":"ARROW","value":"->"}"#);
    }
}
