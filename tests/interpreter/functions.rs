use crate::helpers::{execute, execute_err};
use insta::assert_display_snapshot;

#[test]
fn declare_and_invoke_function() {
    let source = r#"fun sayHi(first, last) {
  print "Hi, " + first + " " + last + "!";
}

sayHi("Dear", "Reader");"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    Hi, Dear Reader!
    "###);
}

#[test]
fn each_call_of_a_factory_captures_an_independent_environment() {
    let source = r#"fun makeCounter() {
  var c = 0;
  fun inc() {
    c = c + 1;
    return c;
  }
  return inc;
}
var a = makeCounter();
var b = makeCounter();
print a();
print a();
print b();
print a();"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    1
    2
    1
    3
    "###);
}

#[test]
fn functions_can_recurse_through_their_own_name() {
    let source = r#"fun fib(n) {
  if (n <= 1) return n;
  return fib(n - 2) + fib(n - 1);
}
print fib(10);"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    55
    "###);
}

#[test]
fn a_return_unwinds_through_nested_blocks_and_loops() {
    let source = r#"fun find() {
  var i = 0;
  while (true) {
    {
      i = i + 1;
      if (i == 3) return i;
    }
  }
}
print find();"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    3
    "###);
}

#[test]
fn falling_off_the_end_of_a_function_yields_nil() {
    let output = execute("fun noop() {} print noop();");
    assert_display_snapshot!(output, @r###"
    nil
    "###);
}

#[test]
fn functions_and_natives_print_their_name() {
    let output = execute("fun f() {} print f; print clock;");
    assert_display_snapshot!(output, @r###"
    <fn f>
    <native fn>
    "###);
}

#[test]
fn clock_returns_seconds_as_a_number() {
    let output = execute("print clock() > 0;");
    assert_display_snapshot!(output, @r###"
    true
    "###);
}

#[test]
fn calling_with_the_wrong_number_of_arguments_is_a_runtime_error() {
    let error = execute_err("fun f(a) {} f();");
    assert_eq!(error, "Expected 1 arguments but got 0.\n[line 1]");
}

#[test]
fn only_functions_and_classes_are_callable() {
    let error = execute_err(r#""totally not a function"();"#);
    assert_eq!(error, "Can only call functions and classes.\n[line 1]");
}
