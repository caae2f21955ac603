use std::env::args;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;

use anyhow::{Context, Result};

use monkide::environment::{shared, Environment};
use monkide::evaluator::Evaluator;
use monkide::lexer::Lexer;
use monkide::object::Object;
use monkide::parser::Parser;
use monkide::repl;

fn main() -> Result<()> {
    let args = args();
    if args.len() > 2 {
        eprintln!("Usage: monkide [script]");
        std::process::exit(64);
    } else if args.len() == 2 {
        // Size is validated
        let script_path = args.skip(1).next().unwrap();
        let mut file = File::open(script_path).context("Unable to open script file")?;
        let mut script = String::new();
        file.read_to_string(&mut script)
            .context("Unable to read script file")?;
        run_script(&script);
    } else {
        let stdin = std::io::stdin().lock();
        let stdout = std::io::stdout().lock();
        repl::run(BufReader::new(stdin), stdout)?;
    }
    Ok(())
}

fn run_script(script: &str) {
    let mut parser = Parser::new(Lexer::new(script));
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        for error in parser.errors() {
            eprintln!("{}", error);
        }
        std::process::exit(65);
    }

    let evaluator = Evaluator::new();
    match evaluator.eval(&program, &shared(Environment::new())) {
        Ok(Object::Null) => {}
        Ok(value) => println!("{}", value),
        Err(error) => {
            eprintln!("ERROR: {}", error);
            std::process::exit(70);
        }
    }
}
