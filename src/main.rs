use std::{fs, io, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use cove::{
    Error, check,
    interpreter::{
        evaluator::{DEFAULT_MAX_CALL_DEPTH, InterpreterOptions},
        lexer::tokenize,
        parser::parse,
    },
    run_with_output,
};
use tracing_subscriber::EnvFilter;

/// cove runs scripts written in the cove language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The script to run.
    file: PathBuf,

    /// Print an intermediate stage instead of running the script.
    #[arg(short, long, value_enum)]
    emit: Option<Emit>,

    /// Stop after the scope check.
    #[arg(short, long)]
    check: bool,

    /// Maximum number of nested function calls.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// One token per line with its position.
    Tokens,
    /// The syntax tree in debug form.
    Ast,
    /// The syntax tree printed back as source text.
    Source,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("COVE_LOG").or_else(|_| EnvFilter::try_from_default_env())
                                                    .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn execute(args: &Args, source: &str) -> Result<(), Error> {
    match args.emit {
        Some(Emit::Tokens) => {
            for token in tokenize(source)? {
                println!("{}:{} {}", token.line, token.column, token.kind.describe());
            }
        },
        Some(Emit::Ast) => println!("{:#?}", parse(&tokenize(source)?)?),
        Some(Emit::Source) => print!("{}", parse(&tokenize(source)?)?),
        None if args.check => {
            check(source)?;
        },
        None => {
            let options = InterpreterOptions { max_call_depth: args.max_call_depth };
            let _stdout = run_with_output(source, io::stdout().lock(), options)?;
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to read the input file '{}': {e}", args.file.display());
            return ExitCode::FAILURE;
        },
    };

    match execute(&args, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn arguments_parse() {
        let args = Args::try_parse_from(["cove", "--check", "--max-call-depth", "50", "a.co"]).unwrap();
        assert!(args.check);
        assert_eq!(args.max_call_depth, 50);
        assert_eq!(args.emit, None);
        assert_eq!(args.file, PathBuf::from("a.co"));

        let args = Args::try_parse_from(["cove", "--emit", "source", "a.co"]).unwrap();
        assert_eq!(args.emit, Some(Emit::Source));
        assert_eq!(args.max_call_depth, DEFAULT_MAX_CALL_DEPTH);

        assert!(Args::try_parse_from(["cove", "--emit", "bytecode", "a.co"]).is_err());
    }

    #[test]
    fn check_only_does_not_run() {
        let args = Args::try_parse_from(["cove", "--check", "a.co"]).unwrap();
        assert!(execute(&args, "assert(1 > 2);").is_ok());
        assert!(execute(&args, "print(y);").is_err());
    }
}
