use std::io::{Write, stdin, stdout};

use clap::Parser;
use clap::Subcommand;
use mathexpr::Lexer;
use mathexpr::format_value;
use miette::IntoDiagnostic;
use miette::WrapErr;

#[derive(Parser, Debug)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the token stream of an expression
    Tokenize { expression: Option<String> },
    /// Print the parse tree of an expression
    Parse { expression: Option<String> },
    /// Evaluate an expression and print the result
    Eval { expression: Option<String> },
    /// List the supported functions
    Functions,
}

fn main() -> miette::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Tokenize { expression } => {
            let expression = read_expression(expression)?;

            for token in Lexer::new(&expression) {
                let token = match token {
                    Ok(token) => token,
                    Err(e) => {
                        eprintln!("{:?}", miette::Report::new(e));
                        std::process::exit(65);
                    }
                };
                println!("{token}");
            }
            println!("EOF  null");
        }
        Commands::Parse { expression } => {
            let expression = read_expression(expression)?;

            match mathexpr::Parser::new(&expression).parse() {
                Ok(tree) => println!("{tree}"),
                Err(e) => {
                    eprintln!("{:?}", miette::Report::new(e));
                    std::process::exit(65);
                }
            }
        }
        Commands::Eval { expression } => {
            let expression = read_expression(expression)?;

            match mathexpr::evaluate(&expression) {
                Ok(value) => println!("{}", format_value(value)),
                Err(e) => {
                    eprintln!("{:?}", miette::Report::new(e));
                    std::process::exit(65);
                }
            }
        }
        Commands::Functions => {
            println!("pi, e");
            println!("{}", mathexpr::functions::names().join(", "));
        }
    }
    Ok(())
}

fn read_expression(arg: Option<String>) -> miette::Result<String> {
    if let Some(expression) = arg {
        return Ok(expression);
    }

    print!("enter an expression: ");
    stdout().flush().into_diagnostic()?;

    let mut line = String::new();
    stdin()
        .read_line(&mut line)
        .into_diagnostic()
        .wrap_err("reading the expression from stdin failed")?;
    Ok(line)
}
