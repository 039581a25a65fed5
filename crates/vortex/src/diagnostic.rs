//! Parse diagnostics
//!
//! Every syntax error carries the offending token and the source line it sits
//! on. Rendering is fixed:
//!
//! ```text
//! Error: Unexpected "{" found
//! 1	|	Query Person as {
//! 		                ^--Did you mean "<identifier>"?
//! ```
//!
//! The caret line starts with two tabs so it lines up under a context line
//! prefixed with `"{row}\t|\t"`.

use std::fmt::{self, Display};

use crate::ast::{EdgeType, FuncType};
use crate::lexer::{Token, TokenKind};

/// What the parser would have accepted instead of the offending token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Nothing,
    Token(TokenKind),
    OneOf(Vec<TokenKind>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedToken { expected: Expected },
    UnknownEdgeType,
    UnknownStatement,
    UnknownBuiltinFunc,
    /// Integer constant out of range for its position
    InvalidInteger,
    NestingTooDeep { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Source line shown above the caret, including its trailing newline
    pub context: String,
    pub token: Token,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, context: String, token: Token) -> Self {
        Self {
            kind,
            context,
            token,
        }
    }

    pub fn unexpected(context: String, token: Token, expected: Expected) -> Self {
        Self::new(ParseErrorKind::UnexpectedToken { expected }, context, token)
    }

    fn header(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::UnexpectedToken { .. } | ParseErrorKind::NestingTooDeep { .. } => {
                "Unexpected"
            }
            ParseErrorKind::UnknownEdgeType
            | ParseErrorKind::UnknownStatement
            | ParseErrorKind::UnknownBuiltinFunc => "Unknown",
            ParseErrorKind::InvalidInteger => "Invalid",
        }
    }

    fn write_hint(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected } => match expected {
                Expected::Nothing => write!(f, "here"),
                Expected::Token(kind) => write!(f, "Did you mean \"{}\"?", kind),
                Expected::OneOf(kinds) => write_one_of(f, kinds),
            },
            ParseErrorKind::UnknownEdgeType => write_one_of(f, EdgeType::ALL),
            ParseErrorKind::UnknownStatement => write_one_of(f, TokenKind::STATEMENTS),
            ParseErrorKind::UnknownBuiltinFunc => write_one_of(f, FuncType::ALL),
            ParseErrorKind::InvalidInteger => write!(f, "Integer out of range"),
            ParseErrorKind::NestingTooDeep { limit } => {
                write!(f, "Expression nested deeper than {} levels", limit)
            }
        }
    }
}

fn write_one_of<T: Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    write!(f, "Expected one of: ")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "\"{}\"", item)?;
    }
    Ok(())
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {} \"{}\" found", self.header(), self.token.text)?;
        write!(f, "{}", self.context)?;
        write!(
            f,
            "\t\t{}{}--",
            " ".repeat(self.token.col),
            "^".repeat(self.token.span)
        )?;
        self.write_hint(f)?;
        writeln!(f)
    }
}

impl std::error::Error for ParseError {}
