use std::io::{BufRead, Write};

use anyhow::Result;

use crate::environment::{shared, Environment};
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::object::Object;
use crate::parser::Parser;

const PROMPT: &str = ">> ";

/// Reads lines until EOF, evaluating each against one long-lived environment
/// so bindings carry across inputs. Parser diagnostics suppress evaluation
/// for that line; evaluation errors print and the session continues.
pub fn run<R: BufRead, W: Write>(input: R, mut output: W) -> Result<()> {
    let evaluator = Evaluator::new();
    let env = shared(Environment::new());

    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;
    for line in input.lines() {
        let line = line?;

        let mut parser = Parser::new(Lexer::new(&line));
        let program = parser.parse_program();
        if !parser.errors().is_empty() {
            for error in parser.errors() {
                writeln!(output, "\t{}", error)?;
            }
        } else {
            match evaluator.eval(&program, &env) {
                // An empty or binding-only line prints nothing
                Ok(Object::Null) => {}
                Ok(value) => writeln!(output, "{}", value)?,
                Err(error) => writeln!(output, "ERROR: {}", error)?,
            }
        }

        output.write_all(PROMPT.as_bytes())?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}
