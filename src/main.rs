use anyhow::Context;
use rlox::{repl, ExecuteRawError, Interpreter};
use std::io::stdout;
use std::path::PathBuf;

fn main() -> Result<(), anyhow::Error> {
    let args: Vec<String> = std::env::args().collect();
    // The first element in the arguments list is the name of the binary.
    // Then the actual binary arguments, flags and options.
    if args.len() == 1 {
        repl()?;
    } else if args.len() == 2 {
        let filepath = PathBuf::from(&args[1]);
        let source = std::fs::read_to_string(&filepath)
            .with_context(|| format!("Failed to read {}", filepath.display()))?;
        if let Err(e) = Interpreter::new(stdout()).execute_raw(&source) {
            eprintln!("{}", e);
            // 65 (EX_DATAERR) for source code the front-end rejected,
            // 70 (EX_SOFTWARE) for programs that died at runtime.
            let exit_code = match e {
                ExecuteRawError::RuntimeError(_) => 70,
                _ => 65,
            };
            std::process::exit(exit_code);
        }
    } else {
        println!("Usage: rlox [script]");
        // EX_USAGE, from `/usr/include/sysexits.h`.
        std::process::exit(64);
    }
    Ok(())
}
