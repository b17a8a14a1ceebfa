use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Plus,
    Minus,
    Mul,
    Div,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assoc {
    Left,
}

pub(crate) type Precedence = u8;

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            Self::Plus | Self::Minus => 0,
            Self::Mul | Self::Div => 1,
        }
    }

    pub fn assoc(self) -> Assoc {
        match self {
            Self::Plus | Self::Minus | Self::Mul | Self::Div => Assoc::Left,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token<'src> {
    Number(f64),
    Op(Operator),
    Id(&'src str),

    LParen,
    RParen,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Op(op) => write!(f, "{}", op.symbol()),
            Self::Id(id) => write!(f, "{id}"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
        }
    }
}
