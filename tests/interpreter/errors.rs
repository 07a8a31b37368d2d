use crate::helpers::{execute_err, execute_with_failure};

#[test]
fn parse_errors_use_the_line_and_location_format() {
    let error = execute_err("print 1");
    assert_eq!(error, "[line 1] Error at end: Expect ';' after value.");
}

#[test]
fn every_parse_error_is_reported_not_just_the_first() {
    let error = execute_err("var 1 = 2;\nprint;");
    assert_eq!(
        error,
        "[line 1] Error at '1': Expect variable name.\n\
         [line 2] Error at ';': Expect expression."
    );
}

#[test]
fn a_local_variable_in_its_own_initializer_fails_at_resolve_time() {
    let error = execute_err("{ var a = a; }");
    assert_eq!(
        error,
        "[line 1] Error at 'a': Can't read local variable in its own initializer."
    );
}

#[test]
fn at_the_global_scope_self_initialization_fails_at_runtime_instead() {
    let error = execute_err("var a = a;");
    assert_eq!(error, "Undefined variable 'a'.\n[line 1]");
}

#[test]
fn nothing_runs_when_resolution_fails() {
    let (output, error) = execute_with_failure("print \"x\"; return 1;");
    assert_eq!(output, "");
    assert_eq!(
        error,
        "[line 1] Error at 'return': Can't return from top-level code."
    );
}

#[test]
fn output_produced_before_a_runtime_error_is_kept() {
    let (output, error) =
        execute_with_failure("print \"before\"; print missing; print \"after\";");
    assert_eq!(output, "before\n");
    assert_eq!(error, "Undefined variable 'missing'.\n[line 1]");
}
