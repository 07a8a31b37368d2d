use rlox::{ExecuteRawError, Interpreter};

/// Drive a lox program end to end, capturing its output stream.
fn run(source: &str) -> (String, Result<(), ExecuteRawError>) {
    let mut buffer = Vec::new();
    let outcome = Interpreter::new(&mut buffer).execute_raw(source);
    let output = String::from_utf8(buffer).expect("The interpreter writes valid UTF-8");
    (output, outcome)
}

/// Execute a lox program that is expected to run to completion.
/// It returns the program's output stream; a failure of any phase fails
/// the test with the rendered diagnostics.
pub fn execute(source: &str) -> String {
    let (output, outcome) = run(source);
    if let Err(e) = outcome {
        panic!("Expected the program to run to completion, but it failed with:\n{e}\nOutput so far:\n{output}");
    }
    output
}

/// Execute a lox program that is expected to fail.
/// It returns whatever the program printed before dying, alongside the
/// rendered error.
pub fn execute_with_failure(source: &str) -> (String, String) {
    let (output, outcome) = run(source);
    match outcome {
        Ok(()) => panic!("Expected the program to fail.\nOutput:\n{output}"),
        Err(e) => (output, e.to_string()),
    }
}

/// Short-hand for [`execute_with_failure`] when only the error matters.
pub fn execute_err(source: &str) -> String {
    execute_with_failure(source).1
}
