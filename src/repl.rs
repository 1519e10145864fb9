use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use monkey_interpreter::{Error, Session};

const PROMPT: &str = ">> ";
const EXIT_COMMAND: &str = "exit()";

pub struct Options {
    /// Forget all bindings before every line.
    pub fresh_env: bool,
    pub max_depth: usize,
}

/// Reads lines from `input` until `exit()` or end of input, printing the
/// value of each one to `output`.
pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W, options: &Options) -> Result<()> {
    let mut session = Session::with_max_depth(options.max_depth);
    loop {
        // Print prompt and flush to write it to console
        write!(output, "{}", PROMPT)?;
        output.flush().context("failed to flush the prompt")?;

        // Scan Input line
        let mut buffer = String::new();
        let read = input
            .read_line(&mut buffer)
            .context("failed to read a line")?;
        let line = buffer.trim();
        if read == 0 || line == EXIT_COMMAND {
            return Ok(());
        }

        if options.fresh_env {
            session.reset();
        }

        match session.eval(line) {
            Ok(Some(value)) => writeln!(output, "{}", value)?,
            Ok(None) => (),
            Err(Error::Parse(errors)) => {
                for error in errors {
                    writeln!(output, "\t{}", error)?;
                }
            }
            Err(Error::Eval(error)) => writeln!(output, "ERROR: {}", error)?,
        }
    }
}
