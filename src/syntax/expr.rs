use super::token::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
}

impl From<Operator> for BinaryOp {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Plus => Self::Plus,
            Operator::Minus => Self::Minus,
            Operator::Mul => Self::Times,
            Operator::Div => Self::Divide,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Negate,
}

#[derive(Debug, PartialEq, Clone)]
pub(crate) enum Expression<'src> {
    Literal(f64),
    Binary {
        lhs: Box<Expression<'src>>,
        op: BinaryOp,
        rhs: Box<Expression<'src>>,
    },
    Unary(UnaryOp, Box<Expression<'src>>),
    Id(&'src str),
    Call {
        id: &'src str,
        args: Vec<Expression<'src>>,
    },
}
