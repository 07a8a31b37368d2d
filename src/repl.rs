use crate::{ExecuteRawError, Interpreter, ParseError};
use std::io::{stdin, stdout, Write};

/// Read-print-evaluation loop.
///
/// Interpreter state survives from one prompt to the next: a variable or
/// function defined on one line is usable on every later one. Input that
/// stops mid-statement (an open block, a missing `;`) is buffered and the
/// prompt switches to `..` until the statement is finished; nothing runs
/// before then. Any other failure is reported and the buffer starts over.
pub fn repl() -> Result<(), std::io::Error> {
    let mut interpreter = Interpreter::new(stdout());
    let mut pending = String::new();
    loop {
        print!("{}", if pending.is_empty() { "> " } else { ".. " });
        stdout().flush()?;
        let mut line = String::new();
        if stdin().read_line(&mut line).is_err() || line.is_empty() {
            // End of input - e.g. Ctrl-D.
            break Ok(());
        }
        pending.push_str(&line);
        if pending.trim().is_empty() {
            pending.clear();
            continue;
        }
        match interpreter.execute_raw(pending.trim()) {
            Ok(()) => pending.clear(),
            Err(e) if is_incomplete(&e) => {
                // More input is needed before anything can run.
            }
            Err(e) => {
                pending.clear();
                eprintln!("{}", e);
            }
        }
    }
}

/// A parse that only failed at the very end of the input is an unfinished
/// statement, not a broken one.
fn is_incomplete(error: &ExecuteRawError) -> bool {
    match error {
        ExecuteRawError::ParserError(errors) => errors.iter().all(ParseError::is_at_end),
        _ => false,
    }
}
