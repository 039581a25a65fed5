//! Lexer for the vortex DSL
//!
//! Turns a complete in-memory source buffer into positioned tokens. Every token
//! records the row/column where it starts and its width in characters, which is
//! what diagnostics use to draw carets under the offending text.

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use winnow::ascii::digit1;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

type ScanResult<'a> = winnow::ModalResult<&'a str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,

    // Punctuation
    Comma,
    Dot,
    Range,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,

    // Literals and names
    IntegerConstant,
    StringConstant,
    Identifier,
    Function,
    As,

    // Statement keywords
    Schema,
    Vertex,
    Edge,
    Relation,
    Query,

    // Primitive types
    IntType,
    StringType,

    Eof,
    Invalid,
}

impl TokenKind {
    /// Keywords that may start a top-level statement, in dispatch order.
    pub const STATEMENTS: [TokenKind; 5] = [
        TokenKind::Schema,
        TokenKind::Edge,
        TokenKind::Vertex,
        TokenKind::Relation,
        TokenKind::Query,
    ];

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::Equal
                | TokenKind::NotEqual
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Equal => "=",
            TokenKind::NotEqual => "!=",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Range => "..",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::IntegerConstant => "<integer>",
            TokenKind::StringConstant => "<string>",
            TokenKind::Identifier => "<identifier>",
            TokenKind::Function => "<function>",
            TokenKind::As => "as",
            TokenKind::Schema => "Schema",
            TokenKind::Vertex => "Vertex",
            TokenKind::Edge => "Edge",
            TokenKind::Relation => "Relation",
            TokenKind::Query => "Query",
            TokenKind::IntType => "int",
            TokenKind::StringType => "string",
            TokenKind::Eof => "<eof>",
            TokenKind::Invalid => "<invalid>",
        };
        write!(f, "{}", s)
    }
}

/// Reserved words, shared by every lexer and never mutated.
static KEYWORDS: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    HashMap::from([
        ("as", TokenKind::As),
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("int", TokenKind::IntType),
        ("string", TokenKind::StringType),
        ("Sum", TokenKind::Function),
        ("Max", TokenKind::Function),
        ("Min", TokenKind::Function),
        ("StartsWith", TokenKind::Function),
        ("Schema", TokenKind::Schema),
        ("Vertex", TokenKind::Vertex),
        ("Edge", TokenKind::Edge),
        ("Relation", TokenKind::Relation),
        ("Query", TokenKind::Query),
    ])
});

/// Look up the reserved kind for a word, if any.
pub fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS.get(word).copied()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub row: usize,
    pub col: usize,
    /// Width in characters, used for caret underlining
    pub span: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        row: usize,
        col: usize,
        span: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            row,
            col,
            span,
        }
    }
}

/// Anything the parser can pull tokens from.
///
/// The lexer is the usual implementation; tests drive the parser with scripted
/// token sequences instead.
pub trait TokenSource {
    /// Next token; keeps returning EOF once the input is exhausted.
    fn next_token(&mut self) -> Token;

    /// The source line containing `token`, prefixed for diagnostic display.
    fn source_context(&self, token: &Token) -> String;
}

pub struct Lexer<'a> {
    source: &'a str,
    rest: &'a str,
    row: usize,
    col: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
            row: 0,
            col: 0,
        }
    }

    /// The byte following the current one, without consuming anything.
    pub fn peek_byte(&self) -> Option<u8> {
        self.rest.as_bytes().get(1).copied()
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let token = self.scan();
        log::trace!(
            "token {:?} {:?} at {}:{}",
            token.kind,
            token.text,
            token.row,
            token.col
        );
        token
    }

    /// Render the line `token` sits on as `"{row}\t|\t{line}\n"`.
    pub fn source_context(&self, token: &Token) -> String {
        let line = self.source.lines().nth(token.row).unwrap_or("");
        format!("{}\t|\t{}\n", token.row + 1, line)
    }

    fn scan(&mut self) -> Token {
        let Some(c) = self.rest.chars().next() else {
            return Token::new(TokenKind::Eof, "EOF", self.row, self.col, 0);
        };

        let (row, col) = (self.row, self.col);
        if let Some(text) = self.lex(word) {
            let kind = keyword(text).unwrap_or(TokenKind::Identifier);
            return Token::new(kind, text, row, col, text.chars().count());
        }
        if let Some(text) = self.lex(digits) {
            return Token::new(TokenKind::IntegerConstant, text, row, col, text.len());
        }
        if c == '"' {
            return self.string();
        }

        let (kind, width) = match (c, self.peek_byte()) {
            ('.', Some(b'.')) => (TokenKind::Range, 2),
            ('<', Some(b'=')) => (TokenKind::LessEqual, 2),
            ('>', Some(b'=')) => (TokenKind::GreaterEqual, 2),
            ('!', Some(b'=')) => (TokenKind::NotEqual, 2),
            ('.', _) => (TokenKind::Dot, 1),
            ('<', _) => (TokenKind::Less, 1),
            ('>', _) => (TokenKind::Greater, 1),
            ('+', _) => (TokenKind::Plus, 1),
            ('-', _) => (TokenKind::Minus, 1),
            ('*', _) => (TokenKind::Star, 1),
            ('/', _) => (TokenKind::Slash, 1),
            (',', _) => (TokenKind::Comma, 1),
            ('{', _) => (TokenKind::LBrace, 1),
            ('}', _) => (TokenKind::RBrace, 1),
            ('(', _) => (TokenKind::LParen, 1),
            (')', _) => (TokenKind::RParen, 1),
            ('[', _) => (TokenKind::LBracket, 1),
            (']', _) => (TokenKind::RBracket, 1),
            ('=', _) => (TokenKind::Equal, 1),
            _ => (TokenKind::Invalid, c.len_utf8()),
        };

        let text = self.consume(width);
        Token::new(kind, text, row, col, text.chars().count())
    }

    fn string(&mut self) -> Token {
        let (row, col) = (self.row, self.col);
        let mut text = String::new();
        let mut escaped = false;
        let rest = self.rest;

        for (i, c) in rest.char_indices().skip(1) {
            if escaped {
                text.push(match c {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    _ => c,
                });
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                let raw = self.consume(i + 1);
                return Token::new(TokenKind::StringConstant, text, row, col, raw.chars().count());
            } else {
                text.push(c);
            }
        }

        // Unterminated: swallow the rest so the stream ends after this token
        let raw = self.consume(self.rest.len());
        Token::new(TokenKind::Invalid, raw, row, col, 1)
    }

    fn skip_whitespace(&mut self) {
        self.lex(whitespace);
    }

    /// Run `scanner` at the cursor and consume what it matched.
    fn lex(&mut self, scanner: fn(&mut &'a str) -> ScanResult<'a>) -> Option<&'a str> {
        let mut stream = self.rest;
        let matched = scanner(&mut stream).ok()?;
        Some(self.consume(matched.len()))
    }

    /// Consume `len` bytes, tracking row and column.
    fn consume(&mut self, len: usize) -> &'a str {
        let (taken, rest) = self.rest.split_at(len);
        for c in taken.chars() {
            if c == '\n' {
                self.row += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
        self.rest = rest;
        taken
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        Lexer::next_token(self)
    }

    fn source_context(&self, token: &Token) -> String {
        Lexer::source_context(self, token)
    }
}

// ============ Scanners ============

/// A letter, then letters and digits.
fn word<'a>(input: &mut &'a str) -> ScanResult<'a> {
    (
        one_of(|c: char| c.is_alphabetic()),
        take_while(0.., |c: char| c.is_alphanumeric()),
    )
        .take()
        .parse_next(input)
}

fn digits<'a>(input: &mut &'a str) -> ScanResult<'a> {
    digit1.parse_next(input)
}

fn whitespace<'a>(input: &mut &'a str) -> ScanResult<'a> {
    take_while(0.., char::is_whitespace).parse_next(input)
}

/// Lex `source` into a vector ending with (and including) the first EOF token.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}
