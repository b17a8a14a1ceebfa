use crate::{
    error::{ErrorKind, PResult},
    syntax::{BinaryOp, Expression, Lexer, Parser, UnaryOp, DEFAULT_MAX_DEPTH},
};

/// Folds parsed expressions into numbers. Identifiers and calls have no
/// binding to resolve against and are rejected.
pub(crate) struct Interpreter {
    max_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn parse<'src>(&self, src: &'src str) -> PResult<Expression<'src>> {
        Parser::new(Lexer::new(src))
            .with_max_depth(self.max_depth)
            .parse()
    }

    pub fn eval_expr_str(&self, src: &str) -> PResult<f64> {
        let expr = self.parse(src)?;
        let value = self.eval_expr(&expr)?;
        log::debug!("{src} => {value}");
        Ok(value)
    }

    pub fn eval_expr(&self, expr: &Expression) -> PResult<f64> {
        match expr {
            Expression::Literal(v) => Ok(*v),
            Expression::Unary(UnaryOp::Negate, expr) => Ok(-self.eval_expr(expr)?),
            Expression::Binary { lhs, op, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                match op {
                    BinaryOp::Plus => Ok(lhs + rhs),
                    BinaryOp::Minus => Ok(lhs - rhs),
                    BinaryOp::Times => Ok(lhs * rhs),
                    BinaryOp::Divide if rhs == 0.0 => Err(ErrorKind::DivisionByZero),
                    BinaryOp::Divide => Ok(lhs / rhs),
                }
            }
            Expression::Id(id) => Err(ErrorKind::UnsupportedNode(format!(
                "identifier `{id}`"
            ))),
            Expression::Call { id, .. } => {
                Err(ErrorKind::UnsupportedNode(format!("call to `{id}`")))
            }
        }
    }
}
