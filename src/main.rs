use std::process;

use rankell::lexer::Token;
use rankell::parser::{ParseState, parse};
use rankell::types::type_check;

const INPUT: &str = r"
let id = \x => x in
let twice = \(f: forall a. a -> a) => \x => f(f(x)) in
if true then twice(id)([1, 2 + 3]) else [] ++ [4]
";

fn main() -> anyhow::Result<()> {
    let tokens = Token::lex(INPUT)?;
    let mut state = ParseState::new(tokens);

    let program = match parse(&mut state) {
        Ok(program) => program,
        Err(e) => {
            println!("{e}");
            process::exit(-1);
        }
    };

    println!("program:     {program}");

    match type_check(&program) {
        Ok((term, ty)) => {
            println!("elaboration: {term}");
            println!("type:        {ty}");
        }
        Err(e) => {
            println!("{e}");
            process::exit(-1);
        }
    }

    Ok(())
}
