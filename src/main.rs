// sooc: Soo front-end (parse + constant folding)

use std::fmt::Debug;
use std::fmt::Display;
use std::process;

use clap::Parser as _;
use crossterm::style::Stylize;
use env_logger::Env;

use sooc::cli::{read_input, Cli, Command, Emit, TreeArgs};
use sooc::optimize::ConstantFolder;
use sooc::parser::lexer::Lexer;
use sooc::parser::{Parser, SyntaxError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Command::Tokenize { input } => {
            let source = read_input(&input)?;
            let tokens = Lexer::new(&source)
                .tokenize()
                .unwrap_or_else(|e| report_and_exit(&SyntaxError::from(e)));
            for token in tokens {
                println!(
                    "{:>4}:{:<3} {:?} {}",
                    token.location.line, token.location.column, token.kind, token.lexeme
                );
            }
        }
        Command::Parse(args) => run_tree(&args, false)?,
        Command::Fold(args) => run_tree(&args, true)?,
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let default_level = cli.log_level();
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

/// Parse the input (and optionally fold it), then print the tree
fn run_tree(args: &TreeArgs, fold: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = read_input(&args.input)?;
    let mut parser = Parser::new(&source).unwrap_or_else(|e| report_and_exit(&e));
    let folder = ConstantFolder::new();

    if args.expr {
        let mut expr = parser
            .parse_standalone_expression()
            .unwrap_or_else(|e| report_and_exit(&e));
        if fold {
            expr = folder.fold_expression(&expr);
        }
        emit(&expr, args.emit);
    } else {
        let mut program = parser
            .parse_program()
            .unwrap_or_else(|e| report_and_exit(&e));
        log::info!(
            "parsed {} class(es) besides '{}'",
            program.classes.len(),
            program.main_class.name
        );
        if fold {
            program = folder.fold_program(&program);
        }
        emit(&program, args.emit);
    }

    Ok(())
}

fn emit<T: Debug + Display>(tree: &T, format: Emit) {
    match format {
        Emit::Ast => println!("{:#?}", tree),
        Emit::Source => println!("{}", tree),
    }
}

/// Print the diagnostic to stderr and stop with status 1
fn report_and_exit(err: &SyntaxError) -> ! {
    for line in err.to_string().lines() {
        eprintln!("{}", line.red());
    }
    process::exit(1);
}
