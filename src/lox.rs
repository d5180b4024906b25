use std::io::{self, BufRead, Stdout, Write};

use log::{debug, info};

use crate::{
    ast::Stmt,
    error::{LoxError, ScanError},
    interpreter::Interpreter,
    parser::Parser,
    scanner::Scanner,
    token::Token,
};

pub fn tokenize(source: &str) -> Result<Vec<Token>, ScanError> {
    Scanner::new(source).scan_tokens()
}

pub fn parse(source: &str) -> Result<Vec<Stmt>, LoxError> {
    let tokens = tokenize(source)?;
    Ok(Parser::new(tokens).parse()?)
}

/// Runs source text through every stage against one long-lived interpreter,
/// so globals persist between runs.
pub struct Lox<W: Write = Stdout> {
    interpreter: Interpreter<W>,
}

impl Lox<Stdout> {
    pub fn new() -> Lox<Stdout> {
        Lox {
            interpreter: Interpreter::new(),
        }
    }
}

impl Default for Lox<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Lox<W> {
    pub fn with_output(output: W) -> Lox<W> {
        Lox {
            interpreter: Interpreter::with_output(output),
        }
    }

    pub fn interpreter(&self) -> &Interpreter<W> {
        &self.interpreter
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    pub fn run(&mut self, source: &str) -> Result<(), LoxError> {
        let statements = parse(source)?;
        self.interpreter.interpret(&statements)?;
        Ok(())
    }

    /// Reads lines from `input` and runs each one. The prompt is written to the
    /// same sink as program output; errors are reported on standard error and
    /// the session continues with whatever state the failed line left behind.
    pub fn run_prompt<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        let mut lines = input.lines();

        loop {
            let output = self.interpreter.output_mut();
            write!(output, "> ")?;
            output.flush()?;

            match lines.next() {
                Some(line) => {
                    let line = line?;
                    debug!("repl line: {}", line);
                    if let Err(err) = self.run(&line) {
                        eprintln!("{}", err);
                    }
                }
                None => {
                    info!("end of input, leaving prompt");
                    writeln!(self.interpreter.output_mut())?;
                    return Ok(());
                }
            }
        }
    }
}
