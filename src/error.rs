use std::fmt;

use crate::syntax::ParserState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Paren {
    Left,
    Right,
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum ErrorKind {
    EndOfInput,
    UnrecognizedSymbol { symbol: char, offset: usize },

    UnexpectedToken { state: ParserState, token: String },
    /// Carries the side that has too many parentheses.
    MismatchedParen(Paren),
    StackUnderflow(String),
    StackOverflow(usize),
    TooDeep(usize),

    DivisionByZero,
    UnsupportedNode(String),
}

pub(crate) type PResult<T> = Result<T, ErrorKind>;

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfInput => write!(f, "Lexer: end reached when trying to retrieve token"),
            Self::UnrecognizedSymbol { symbol, offset } => {
                write!(f, "Lexer: unrecognized symbol `{symbol}` at offset {offset}")
            }
            Self::UnexpectedToken { state, token } => {
                write!(f, "Parser: expected {state} but found `{token}`")
            }
            Self::MismatchedParen(Paren::Left) => write!(f, "Parser: too many left parentheses"),
            Self::MismatchedParen(Paren::Right) => {
                write!(f, "Parser: too many right parentheses")
            }
            Self::StackUnderflow(op) => write!(f, "Parser: not enough operands for `{op}`"),
            Self::StackOverflow(count) => {
                write!(f, "Parser: {count} values left over, expected exactly one")
            }
            Self::TooDeep(limit) => {
                write!(f, "Parser: expression nests deeper than {limit} levels")
            }
            Self::DivisionByZero => write!(f, "Runtime: division by zero"),
            Self::UnsupportedNode(what) => write!(f, "Runtime: cannot evaluate {what}"),
        }
    }
}

impl std::error::Error for ErrorKind {}
