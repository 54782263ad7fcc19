use std::fmt;

use log::trace;

use crate::token::{self, Span, Token, TokenKind};

const BOM: char = '\u{FEFF}';

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Double-quoted string with no closing quote on its line.
    UnterminatedString,
    /// `-` or `>` that is not part of `->`.
    IncompleteArrow(char),
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
}

impl LexErrorKind {
    /// Recover the error kind behind an `Unknown` token.
    #[must_use]
    pub fn of_unknown(text: &str) -> Self {
        match text.chars().next() {
            Some('"') => Self::UnterminatedString,
            Some(ch @ ('-' | '>')) => Self::IncompleteArrow(ch),
            Some(ch) => Self::UnexpectedCharacter(ch),
            None => Self::UnexpectedCharacter(' '),
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            Self::IncompleteArrow(ch) => {
                write!(f, "unexpected '{ch}', did you mean '->'?")
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character: {ch}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokens together with the errors behind every `Unknown` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

/// Tokenize a GenomeScript source string.
///
/// Never fails: malformed input becomes `Unknown` tokens. The
/// returned sequence always ends with an `Eof` token.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    lex(input).tokens
}

/// Tokenize and also report a `LexError` for each `Unknown` token.
#[must_use]
pub fn lex(input: &str) -> Lexed {
    let lexed = Lexer::new(input).run();
    trace!(
        "lexed {} token(s), {} error(s)",
        lexed.tokens.len(),
        lexed.errors.len()
    );
    lexed
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    line_has_tokens: bool,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        let start = if input.starts_with(BOM) {
            BOM.len_utf8()
        } else {
            0
        };
        Self {
            input,
            pos: start,
            line: 1,
            col: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
            line_has_tokens: false,
        }
    }

    fn run(mut self) -> Lexed {
        while let Some(ch) = self.peek() {
            match ch {
                '\n' => {
                    let span = self.span();
                    self.advance();
                    if self.line_has_tokens {
                        self.push(TokenKind::Newline, span);
                        self.line_has_tokens = false;
                    }
                }
                c if c.is_whitespace() => {
                    self.advance();
                }
                '#' => self.read_comment(),
                '"' => self.read_string(),
                '-' if self.peek_at(1) == Some('>') => {
                    let span = self.span();
                    self.advance();
                    self.advance();
                    self.push(TokenKind::Arrow, span);
                }
                c if c.is_ascii_digit() => self.read_number(),
                c if c.is_alphabetic() || c == '_' => self.read_word(),
                _ => {
                    let span = self.span();
                    self.advance();
                    self.push_unknown(span);
                }
            }
        }

        let span = self.span();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span,
        });

        Lexed {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    const fn span(&self) -> Span {
        Span::new(self.line, self.col, self.pos)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Emit a token covering `start..pos`.
    fn push(&mut self, kind: TokenKind, start: Span) {
        if kind != TokenKind::Newline {
            self.line_has_tokens = true;
        }
        self.tokens.push(Token {
            kind,
            text: self.input[start.offset..self.pos].to_string(),
            span: start,
        });
    }

    fn push_unknown(&mut self, start: Span) {
        self.push(TokenKind::Unknown, start);
        let kind = LexErrorKind::of_unknown(&self.input[start.offset..self.pos]);
        self.errors.push(LexError { kind, span: start });
    }

    fn read_comment(&mut self) {
        let start = self.span();
        self.advance_while(|c| c != '\n');
        self.push(TokenKind::Comment, start);
    }

    fn read_string(&mut self) {
        let start = self.span();
        self.advance(); // opening quote

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.push_unknown(start);
                    return;
                }
                Some('\\') if self.peek_at(1) == Some('"') => {
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
            }
        }

        self.push(TokenKind::String, start);
    }

    fn read_number(&mut self) {
        let start = self.span();
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        self.push(TokenKind::Number, start);
    }

    fn read_word(&mut self) {
        let start = self.span();
        self.advance_while(|c| c.is_alphanumeric() || c == '_');
        let kind = if token::is_keyword(&self.input[start.offset..self.pos]) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push(kind, start);
    }
}
