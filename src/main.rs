mod repl;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use monkey_interpreter::evaluator::eval::MAX_EVAL_DEPTH;
use monkey_interpreter::Session;

/// Interpreter for a small expression language with `variable` bindings,
/// `if`/`else`, functions and closures. Starts an interactive prompt unless a
/// script file is given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Run this script and print the value of its last statement.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Start every prompt line with an empty environment.
    #[arg(long)]
    fresh_env: bool,

    /// Maximum nesting of expression evaluation, function calls included.
    #[arg(long, default_value_t = MAX_EVAL_DEPTH)]
    max_depth: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match &args.file {
        Some(path) => run_file(path, args.max_depth),
        None => {
            let options = repl::Options {
                fresh_env: args.fresh_env,
                max_depth: args.max_depth,
            };
            repl::start(io::stdin().lock(), io::stdout(), &options)
        }
    }
}

fn run_file(path: &Path, max_depth: usize) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;

    let mut session = Session::with_max_depth(max_depth);
    if let Some(value) = session.eval(&source)? {
        println!("{}", value);
    }
    Ok(())
}
