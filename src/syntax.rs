mod expr;
mod lexer;
mod parser;
mod printer;
mod token;

pub(crate) use expr::{BinaryOp, Expression, UnaryOp};
pub(crate) use lexer::Lexer;
pub(crate) use parser::{Parser, ParserState, DEFAULT_MAX_DEPTH};
pub(crate) use printer::dump;
