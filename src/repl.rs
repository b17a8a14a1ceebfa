use std::io::{self, BufRead, Write};

use crate::{cli::OutputMode, error::PResult, runtime::eval::Interpreter, syntax::dump};

const QUIT: &str = "q";

pub(crate) struct Session {
    interpreter: Interpreter,
    mode: OutputMode,
}

impl Session {
    pub fn new(mode: OutputMode, max_depth: usize) -> Self {
        Self {
            interpreter: Interpreter::with_max_depth(max_depth),
            mode,
        }
    }

    /// Output for one expression: the tree dump, or `=<value>` followed by a newline.
    pub fn process(&self, src: &str) -> PResult<String> {
        let expr = self.interpreter.parse(src)?;
        match self.mode {
            OutputMode::Tree => Ok(dump(&expr)),
            OutputMode::Eval => Ok(format!("={}\n", self.interpreter.eval_expr(&expr)?)),
        }
    }

    /// Reads expressions line by line until `q` or end of input. Failures are
    /// reported inline and do not end the session.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let src = line.trim();

            if src == QUIT {
                break;
            }
            if src.is_empty() {
                continue;
            }

            match self.process(src) {
                Ok(text) => write!(output, "{text}")?,
                Err(why) => {
                    log::debug!("{src:?} failed: {why:?}");
                    writeln!(output, "{why}")?;
                }
            }
            output.flush()?;
        }

        Ok(())
    }
}
