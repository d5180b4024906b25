use std::{
    fs, io,
    path::{Path, PathBuf},
    process::exit,
};

use clap::{Parser, Subcommand};
use tree_lox::{
    lox::{parse, tokenize},
    printer::AstPrinter,
    Lox, LoxError,
};

/// Scans, parses and evaluates scripts written in a small Lox dialect.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every token of the file, one per line.
    Tokenize { file: PathBuf },
    /// Print the syntax tree of every statement in the file.
    Parse { file: PathBuf },
    /// Run the file.
    Evaluate { file: PathBuf },
    /// Start an interactive prompt.
    Repl,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let result = match args.command {
        Command::Tokenize { file } => {
            let source = read_source(&file);
            tokenize(&source).map_err(LoxError::from).map(|tokens| {
                for token in tokens {
                    println!("{}", token);
                }
            })
        }
        Command::Parse { file } => {
            let source = read_source(&file);
            parse(&source).map(|statements| {
                let printer = AstPrinter;
                for statement in &statements {
                    println!("{}", printer.print_stmt(statement));
                }
            })
        }
        Command::Evaluate { file } => Lox::new().run(&read_source(&file)),
        Command::Repl => {
            if let Err(e) = Lox::new().run_prompt(io::stdin().lock()) {
                eprintln!("Failed to read input: {e}");
                exit(1);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{e}");
        exit(e.exit_code());
    }
}

fn read_source(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read the input file '{}': {e}", path.display());
        exit(1);
    })
}
