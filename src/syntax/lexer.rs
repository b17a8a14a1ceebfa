use crate::error::{ErrorKind, PResult};

use super::token::{Operator, Token};

/// Scans an expression on demand. The parser owns one `Lexer` per parse and
/// pulls tokens from it; nothing is buffered ahead of the cursor.
pub(crate) struct Lexer<'src> {
    src: &'src str,
    pos: usize,
}

impl<'src> Iterator for Lexer<'src> {
    type Item = PResult<Token<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at_end() {
            return None;
        }
        Some(self.get())
    }
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn peek(&mut self) -> PResult<Token<'src>> {
        self.next_token(false)
    }

    pub fn get(&mut self) -> PResult<Token<'src>> {
        self.next_token(true)
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// True once only spaces remain.
    pub fn at_end(&self) -> bool {
        self.rest().trim_start_matches(' ').is_empty()
    }

    pub fn next_token(&mut self, consume: bool) -> PResult<Token<'src>> {
        self.skip_spaces();

        let start = self.pos;
        let c = match self.rest().chars().next() {
            None => return Err(ErrorKind::EndOfInput),
            Some(c) => c,
        };

        let (token, len) = if let Some(token) = Self::single_char(c) {
            (token, c.len_utf8())
        } else if c.is_ascii_digit() {
            self.read_number(start)?
        } else if c.is_ascii_alphabetic() {
            self.read_id(start)
        } else {
            return Err(ErrorKind::UnrecognizedSymbol {
                symbol: c,
                offset: start,
            });
        };

        if consume {
            self.pos += len;
            log::trace!("token {token:?} at {start}");
        }
        Ok(token)
    }

    #[inline]
    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn skip_spaces(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start_matches(' ').len();
    }

    fn single_char(c: char) -> Option<Token<'src>> {
        match c {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            c => Operator::from_char(c).map(Token::Op),
        }
    }

    /// Length of the run starting at `from_off` for which `predicate` holds.
    fn span_while<P>(&self, from_off: usize, predicate: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        let tail = &self.src[from_off..];
        tail.find(|c| !predicate(c)).unwrap_or(tail.len())
    }

    fn read_number(&self, from_off: usize) -> PResult<(Token<'src>, usize)> {
        let mut len = self.span_while(from_off, |c| c.is_ascii_digit());
        if self.src[from_off + len..].starts_with('.') {
            len += 1;
            len += self.span_while(from_off + len, |c| c.is_ascii_digit());
        }

        let s = &self.src[from_off..from_off + len];
        // `digits[.digits]` always parses; a trailing `.` is accepted by `f64::from_str`.
        let value = s.parse::<f64>().map_err(|_| ErrorKind::UnrecognizedSymbol {
            symbol: s.chars().next().unwrap_or('?'),
            offset: from_off,
        })?;
        Ok((Token::Number(value), len))
    }

    fn read_id(&self, from_off: usize) -> (Token<'src>, usize) {
        let len = self.span_while(from_off, |c| c.is_ascii_alphanumeric());
        (Token::Id(&self.src[from_off..from_off + len]), len)
    }
}
