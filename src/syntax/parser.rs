use std::fmt;

use crate::error::{ErrorKind, PResult, Paren};

use super::{
    expr::{Expression, UnaryOp},
    lexer::Lexer,
    token::{Assoc, Operator, Precedence, Token},
};

pub(crate) const DEFAULT_MAX_DEPTH: usize = 512;

const UNARY_MINUS_PRECEDENCE: Precedence = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParserState {
    ExpectOperandOrUnary,
    ExpectOperand,
    ExpectOperator,
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectOperandOrUnary => write!(f, "operand or unary `-`"),
            Self::ExpectOperand => write!(f, "operand"),
            Self::ExpectOperator => write!(f, "operator"),
        }
    }
}

/// Entries of the operator stack. Only `Binary` and `UnaryMinus` take part in
/// precedence comparisons; the other two are barriers.
#[derive(Debug, Clone, PartialEq)]
enum PendingOperator<'src> {
    Binary(Operator),
    UnaryMinus,
    LeftParen,
    /// `base` is the value stack height when the call was opened.
    FunctionName { id: &'src str, base: usize },
}

impl PendingOperator<'_> {
    fn precedence(&self) -> Option<Precedence> {
        match self {
            Self::Binary(op) => Some(op.precedence()),
            Self::UnaryMinus => Some(UNARY_MINUS_PRECEDENCE),
            Self::LeftParen | Self::FunctionName { .. } => None,
        }
    }
}

struct Operand<'src> {
    expr: Expression<'src>,
    height: usize,
}

impl<'src> Operand<'src> {
    fn leaf(expr: Expression<'src>) -> Self {
        Self { expr, height: 1 }
    }
}

/// One shunting-yard parse session: owns the lexer and both stacks.
pub(crate) struct Parser<'src> {
    lexer: Lexer<'src>,
    operators: Vec<PendingOperator<'src>>,
    values: Vec<Operand<'src>>,
    max_depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(lexer: Lexer<'src>) -> Self {
        Self {
            lexer,
            operators: vec![],
            values: vec![],
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn parse(mut self) -> PResult<Expression<'src>> {
        let mut state = ParserState::ExpectOperandOrUnary;

        while !self.lexer.at_end() {
            let token = self.lexer.get()?;
            state = match token {
                Token::Number(v) => self.handle_operand(state, token, Expression::Literal(v))?,
                Token::Id(id) => self.handle_id(state, id)?,
                Token::LParen => self.handle_lparen(state)?,
                Token::RParen => self.handle_rparen(state)?,
                Token::Op(op) => self.handle_operator(state, op)?,
            };
        }

        self.finish()
    }

    fn handle_operand(
        &mut self,
        state: ParserState,
        token: Token<'src>,
        expr: Expression<'src>,
    ) -> PResult<ParserState> {
        if state == ParserState::ExpectOperator {
            return Err(unexpected(state, token));
        }

        self.values.push(Operand::leaf(expr));
        Ok(ParserState::ExpectOperator)
    }

    fn handle_id(&mut self, state: ParserState, id: &'src str) -> PResult<ParserState> {
        if state != ParserState::ExpectOperator
            && !self.lexer.at_end()
            && self.lexer.peek()? == Token::LParen
        {
            self.lexer.get()?;
            self.operators.push(PendingOperator::FunctionName {
                id,
                base: self.values.len(),
            });
            self.operators.push(PendingOperator::LeftParen);
            return Ok(ParserState::ExpectOperandOrUnary);
        }

        self.handle_operand(state, Token::Id(id), Expression::Id(id))
    }

    fn handle_lparen(&mut self, state: ParserState) -> PResult<ParserState> {
        if state == ParserState::ExpectOperator {
            return Err(unexpected(state, Token::LParen));
        }

        self.operators.push(PendingOperator::LeftParen);
        Ok(ParserState::ExpectOperandOrUnary)
    }

    fn handle_rparen(&mut self, state: ParserState) -> PResult<ParserState> {
        if state == ParserState::ExpectOperandOrUnary && self.at_empty_call() {
            self.operators.pop();
            self.close_call()?;
            return Ok(ParserState::ExpectOperator);
        }

        if state != ParserState::ExpectOperator {
            return Err(unexpected(state, Token::RParen));
        }

        loop {
            match self.operators.pop() {
                None => return Err(ErrorKind::MismatchedParen(Paren::Right)),
                Some(PendingOperator::LeftParen) => break,
                Some(pending) => self.reduce(pending)?,
            }
        }

        self.close_call()?;
        Ok(ParserState::ExpectOperator)
    }

    fn handle_operator(&mut self, state: ParserState, op: Operator) -> PResult<ParserState> {
        if op == Operator::Minus && state == ParserState::ExpectOperandOrUnary {
            self.operators.push(PendingOperator::UnaryMinus);
            return Ok(ParserState::ExpectOperand);
        }

        if state != ParserState::ExpectOperator {
            return Err(unexpected(state, Token::Op(op)));
        }

        let prec = op.precedence();
        while let Some(top) = self.operators.last().and_then(PendingOperator::precedence) {
            let binds_first = top > prec || (top == prec && op.assoc() == Assoc::Left);
            if !binds_first {
                break;
            }
            if let Some(pending) = self.operators.pop() {
                self.reduce(pending)?;
            }
        }

        self.operators.push(PendingOperator::Binary(op));
        Ok(ParserState::ExpectOperandOrUnary)
    }

    fn finish(mut self) -> PResult<Expression<'src>> {
        if self.operators.is_empty() && self.values.is_empty() {
            return Err(ErrorKind::EndOfInput);
        }

        while let Some(pending) = self.operators.pop() {
            if pending == PendingOperator::LeftParen {
                return Err(ErrorKind::MismatchedParen(Paren::Left));
            }
            self.reduce(pending)?;
        }

        let root = match (self.values.pop(), self.values.len()) {
            (Some(root), 0) => root,
            (Some(_), rest) => return Err(ErrorKind::StackOverflow(rest + 1)),
            (None, _) => return Err(ErrorKind::StackUnderflow("end of input".into())),
        };
        log::debug!("parsed tree of height {}", root.height);
        Ok(root.expr)
    }

    /// `name(` was just opened and nothing has been pushed since.
    fn at_empty_call(&self) -> bool {
        matches!(
            self.operators.as_slice(),
            [.., PendingOperator::FunctionName { base, .. }, PendingOperator::LeftParen]
                if *base == self.values.len()
        )
    }

    fn close_call(&mut self) -> PResult<()> {
        if let Some(PendingOperator::FunctionName { .. }) = self.operators.last() {
            if let Some(pending) = self.operators.pop() {
                self.reduce(pending)?;
            }
        }
        Ok(())
    }

    fn reduce(&mut self, pending: PendingOperator<'src>) -> PResult<()> {
        log::debug!("reduce {pending:?} with {} values", self.values.len());

        let reduced = match pending {
            PendingOperator::UnaryMinus => {
                let operand = self
                    .values
                    .pop()
                    .ok_or_else(|| ErrorKind::StackUnderflow("unary -".into()))?;
                Operand {
                    expr: Expression::Unary(UnaryOp::Negate, Box::new(operand.expr)),
                    height: operand.height + 1,
                }
            }
            PendingOperator::Binary(op) => {
                let (rhs, lhs) = match (self.values.pop(), self.values.pop()) {
                    (Some(rhs), Some(lhs)) => (rhs, lhs),
                    _ => return Err(ErrorKind::StackUnderflow(op.symbol().to_string())),
                };
                Operand {
                    height: lhs.height.max(rhs.height) + 1,
                    expr: Expression::Binary {
                        lhs: Box::new(lhs.expr),
                        op: op.into(),
                        rhs: Box::new(rhs.expr),
                    },
                }
            }
            PendingOperator::FunctionName { id, base } => {
                if base > self.values.len() {
                    return Err(ErrorKind::StackUnderflow(id.to_string()));
                }
                let args = self.values.split_off(base);
                Operand {
                    height: args.iter().map(|a| a.height).max().unwrap_or(0) + 1,
                    expr: Expression::Call {
                        id,
                        args: args.into_iter().map(|a| a.expr).collect(),
                    },
                }
            }
            PendingOperator::LeftParen => return Err(ErrorKind::MismatchedParen(Paren::Left)),
        };

        if reduced.height > self.max_depth {
            return Err(ErrorKind::TooDeep(self.max_depth));
        }
        self.values.push(reduced);
        Ok(())
    }
}

fn unexpected(state: ParserState, token: Token) -> ErrorKind {
    ErrorKind::UnexpectedToken {
        state,
        token: token.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::{Parser, ParserState};
    use crate::{
        error::{ErrorKind, PResult, Paren},
        syntax::{
            expr::{BinaryOp, Expression, UnaryOp},
            lexer::Lexer,
        },
    };

    fn parse(src: &str) -> PResult<Expression> {
        Parser::new(Lexer::new(src)).parse()
    }

    fn num(v: f64) -> Box<Expression<'static>> {
        Box::new(Expression::Literal(v))
    }

    fn neg(expr: Box<Expression>) -> Box<Expression> {
        Box::new(Expression::Unary(UnaryOp::Negate, expr))
    }

    #[test]
    fn parse_precedence() {
        use BinaryOp::*;
        use Expression::*;

        let expr = parse("2 + 3 * 4").unwrap();
        let expected = Binary {
            lhs: num(2.0),
            op: Plus,
            rhs: Box::new(Binary {
                lhs: num(3.0),
                op: Times,
                rhs: num(4.0),
            }),
        };

        assert_eq!(expr, expected);
    }

    #[test]
    fn parse_left_assoc() {
        use BinaryOp::*;
        use Expression::*;

        let expr = parse("8-3-2").unwrap();
        let expected = Binary {
            lhs: Box::new(Binary {
                lhs: num(8.0),
                op: Minus,
                rhs: num(3.0),
            }),
            op: Minus,
            rhs: num(2.0),
        };

        assert_eq!(expr, expected);
    }

    #[test]
    fn parse_unary_minus() {
        use BinaryOp::*;
        use Expression::*;

        let expr = parse("-5 + 4 * 7").unwrap();
        let expected = Binary {
            lhs: neg(num(5.0)),
            op: Plus,
            rhs: Box::new(Binary {
                lhs: num(4.0),
                op: Times,
                rhs: num(7.0),
            }),
        };
        assert_eq!(expr, expected);

        let expr = parse("2 * -(3 + 4)").unwrap();
        let expected = Binary {
            lhs: num(2.0),
            op: Times,
            rhs: neg(Box::new(Binary {
                lhs: num(3.0),
                op: Plus,
                rhs: num(4.0),
            })),
        };
        assert_eq!(expr, expected);
    }

    #[test]
    fn parse_calls() {
        use BinaryOp::*;
        use Expression::*;

        let expr = parse("f(1 + g(x)) / h()").unwrap();
        let expected = Binary {
            lhs: Box::new(Call {
                id: "f",
                args: vec![Binary {
                    lhs: num(1.0),
                    op: Plus,
                    rhs: Box::new(Call {
                        id: "g",
                        args: vec![Id("x")],
                    }),
                }],
            }),
            op: Divide,
            rhs: Box::new(Call {
                id: "h",
                args: vec![],
            }),
        };

        assert_eq!(expr, expected);
        assert_eq!(parse("pi").unwrap(), Id("pi"));
    }

    #[test]
    fn parse_is_repeatable() {
        let src = "(1 + x) * -2 / f(3)";
        assert_eq!(parse(src).unwrap(), parse(src).unwrap());
    }

    #[test]
    fn mismatched_parens() {
        assert_eq!(parse("(1+2"), Err(ErrorKind::MismatchedParen(Paren::Left)));
        assert_eq!(parse("1+2)"), Err(ErrorKind::MismatchedParen(Paren::Right)));
        assert_eq!(parse("f(1"), Err(ErrorKind::MismatchedParen(Paren::Left)));
    }

    #[test]
    fn state_machine_rejects() {
        assert_eq!(
            parse("+1"),
            Err(ErrorKind::UnexpectedToken {
                state: ParserState::ExpectOperandOrUnary,
                token: "+".into()
            })
        );
        assert_eq!(
            parse("--3"),
            Err(ErrorKind::UnexpectedToken {
                state: ParserState::ExpectOperand,
                token: "-".into()
            })
        );
        assert_eq!(
            parse("1 2"),
            Err(ErrorKind::UnexpectedToken {
                state: ParserState::ExpectOperator,
                token: "2".into()
            })
        );
        assert_eq!(
            parse("()"),
            Err(ErrorKind::UnexpectedToken {
                state: ParserState::ExpectOperandOrUnary,
                token: ")".into()
            })
        );
    }

    #[test]
    fn incomplete_expressions() {
        assert_eq!(parse("1 +"), Err(ErrorKind::StackUnderflow("+".into())));
        assert_eq!(parse("-"), Err(ErrorKind::StackUnderflow("unary -".into())));
        assert_eq!(parse(""), Err(ErrorKind::EndOfInput));
        assert_eq!(parse("   "), Err(ErrorKind::EndOfInput));
    }

    #[test]
    fn lex_errors_abort_parse() {
        assert_eq!(
            parse("1+$"),
            Err(ErrorKind::UnrecognizedSymbol {
                symbol: '$',
                offset: 2
            })
        );
    }

    #[test]
    fn depth_limit() {
        fn parse_limited(src: &str) -> PResult<Expression> {
            Parser::new(Lexer::new(src)).with_max_depth(3).parse()
        }

        assert!(parse_limited("((((1))))").is_ok());
        assert!(parse_limited("1+2+3").is_ok());
        assert_eq!(parse_limited("1+2+3+4"), Err(ErrorKind::TooDeep(3)));
        assert_eq!(parse_limited("-(-(-1))"), Err(ErrorKind::TooDeep(3)));
    }
}
