use std::fmt;

use log::{debug, trace};

use crate::analysis::OPERATIONS;
use crate::ast::{AnalyzeStatement, LoadStatement, SourceKind, Statement};
use crate::diagnostic::{Category, Diagnostic};
use crate::lexer::LexErrorKind;
use crate::token::{self, Span, Token, TokenKind};

/// Grammar element the parser was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Statement,
    SourceKind,
    Path,
    Arrow,
    BindingName,
    Operation,
    EndOfLine,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Statement => "'LOAD' or 'ANALYZE'",
            Self::SourceKind => "'FASTA' or 'VCF'",
            Self::Path => "a quoted path",
            Self::Arrow => "'->'",
            Self::BindingName => "a binding name",
            Self::Operation => "an operation name",
            Self::EndOfLine => "end of line",
        })
    }
}

/// What stood where the expected element should have been.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    Token { text: String, column: usize },
    EndOfLine,
    EndOfInput,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { text, column } => write!(f, "'{text}' (column {column})"),
            Self::EndOfLine => write!(f, "end of line"),
            Self::EndOfInput => write!(f, "end of input"),
        }
    }
}

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Grammar violation.
    Unexpected { expected: Expected, found: Found },
    /// The offending token was itself malformed.
    Lex(LexErrorKind),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unexpected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::Lex(kind) => write!(f, "{kind}"),
        }
    }
}

/// Error produced while parsing one statement.
///
/// `span` is where the error is reported: the statement start for
/// grammar violations, the malformed token for lex errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl From<ParseError> for Diagnostic {
    fn from(err: ParseError) -> Self {
        let category = match err.kind {
            ParseErrorKind::Lex(_) => Category::Lex,
            ParseErrorKind::Unexpected { .. } => Category::Syntax,
        };
        Self::error(category, err.kind.to_string(), err.span)
    }
}

/// Statements recovered from a token stream plus one diagnostic per
/// discarded line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Parsed {
    pub statements: Vec<Statement>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a token stream into statements.
///
/// Never stops at the first error: a malformed line yields one
/// diagnostic and parsing resumes on the next line.
#[must_use]
pub fn parse(tokens: &[Token]) -> Parsed {
    Parser::new(tokens).parse()
}

/// Operation names outside the built-in set must be `SCREAMING_SNAKE_CASE`.
fn is_operation_name(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_uppercase())
        && word
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(mut self) -> Parsed {
        let mut parsed = Parsed::default();

        loop {
            self.skip_newlines_and_comments();
            match self.tokens.get(self.pos) {
                None => break,
                Some(tok) if tok.kind == TokenKind::Eof => break,
                Some(_) => {}
            }

            match self.parse_statement() {
                Ok(stmt) => {
                    trace!("parsed `{stmt}`");
                    parsed.statements.push(stmt);
                }
                Err(err) => {
                    debug!("discarding line: {err}");
                    parsed.diagnostics.push(err.into());
                    self.synchronize();
                }
            }
        }

        parsed
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let Some(first) = self.next() else {
            return Err(self.unexpected(self.eof_span(), Expected::Statement, None));
        };
        let start = first.span;

        if first.is_keyword(token::LOAD) {
            self.parse_load(start).map(Statement::Load)
        } else if first.is_keyword(token::ANALYZE) {
            self.parse_analyze(start).map(Statement::Analyze)
        } else {
            Err(self.unexpected(start, Expected::Statement, Some(first)))
        }
    }

    fn parse_load(&mut self, start: Span) -> Result<LoadStatement, ParseError> {
        let kind = self.expect(start, Expected::SourceKind, |t| {
            t.is_keyword(token::FASTA) || t.is_keyword(token::VCF)
        })?;
        let source_kind = if kind.text == token::FASTA {
            SourceKind::Fasta
        } else {
            SourceKind::Vcf
        };
        let path = self.expect(start, Expected::Path, |t| t.kind == TokenKind::String)?;
        self.expect(start, Expected::Arrow, |t| t.kind == TokenKind::Arrow)?;
        let binding = self.expect(start, Expected::BindingName, |t| {
            t.kind == TokenKind::Identifier
        })?;
        self.expect_end_of_line(start)?;

        Ok(LoadStatement {
            source_kind,
            path: path.value(),
            binding: binding.text.clone(),
            span: start,
        })
    }

    fn parse_analyze(&mut self, start: Span) -> Result<AnalyzeStatement, ParseError> {
        let binding = self.expect(start, Expected::BindingName, |t| {
            t.kind == TokenKind::Identifier
        })?;
        let operation = self.expect(start, Expected::Operation, |t| match t.kind {
            TokenKind::Keyword => OPERATIONS.contains(&t.text.as_str()),
            TokenKind::Identifier => is_operation_name(&t.text),
            _ => false,
        })?;
        self.expect(start, Expected::Arrow, |t| t.kind == TokenKind::Arrow)?;
        let result = self.expect(start, Expected::BindingName, |t| {
            t.kind == TokenKind::Identifier
        })?;
        self.expect_end_of_line(start)?;

        Ok(AnalyzeStatement {
            binding: binding.text.clone(),
            operation: operation.text.clone(),
            result: result.text.clone(),
            span: start,
        })
    }

    /// Next significant token on the current line. Comments are
    /// skipped; the line terminator is never consumed.
    fn next(&mut self) -> Option<&'a Token> {
        while let Some(tok) = self.tokens.get(self.pos) {
            match tok.kind {
                TokenKind::Comment => self.pos += 1,
                TokenKind::Newline | TokenKind::Eof => return None,
                _ => {
                    self.pos += 1;
                    return Some(tok);
                }
            }
        }
        None
    }

    fn expect(
        &mut self,
        start: Span,
        expected: Expected,
        accept: impl Fn(&Token) -> bool,
    ) -> Result<&'a Token, ParseError> {
        match self.next() {
            Some(tok) if accept(tok) => Ok(tok),
            found => Err(self.unexpected(start, expected, found)),
        }
    }

    fn expect_end_of_line(&mut self, start: Span) -> Result<(), ParseError> {
        match self.next() {
            None => Ok(()),
            found => Err(self.unexpected(start, Expected::EndOfLine, found)),
        }
    }

    fn unexpected(&self, start: Span, expected: Expected, found: Option<&Token>) -> ParseError {
        let found = match found {
            Some(tok) if tok.kind == TokenKind::Unknown => {
                return ParseError {
                    kind: ParseErrorKind::Lex(LexErrorKind::of_unknown(&tok.text)),
                    span: tok.span,
                };
            }
            Some(tok) => Found::Token {
                text: tok.text.clone(),
                column: tok.span.column,
            },
            None => match self.tokens.get(self.pos) {
                Some(tok) if tok.kind == TokenKind::Newline => Found::EndOfLine,
                _ => Found::EndOfInput,
            },
        };
        ParseError {
            kind: ParseErrorKind::Unexpected { expected, found },
            span: start,
        }
    }

    /// Drop the rest of the current line, including its terminator.
    fn synchronize(&mut self) {
        while let Some(tok) = self.tokens.get(self.pos) {
            match tok.kind {
                TokenKind::Eof => return,
                TokenKind::Newline => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_newlines_and_comments(&mut self) {
        while let Some(tok) = self.tokens.get(self.pos) {
            match tok.kind {
                TokenKind::Newline | TokenKind::Comment => self.pos += 1,
                _ => break,
            }
        }
    }

    fn eof_span(&self) -> Span {
        self.tokens
            .last()
            .map_or(Span::new(1, 1, 0), |last| last.span)
    }
}
