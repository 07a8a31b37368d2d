use crate::helpers::{execute, execute_err};
use insta::assert_display_snapshot;

#[test]
fn lexical_scopes_are_interpreted_correctly() {
    let source = r#"var a = "global a";
var b = "global b";
var c = "global c";
{
  var a = "outer a";
  var b = "outer b";
  {
    var a = "inner a";
    print a;
    print b;
    print c;
  }
  print a;
  print b;
  print c;
}
print a;
print b;
print c;"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    inner a
    outer b
    global c
    outer a
    outer b
    global c
    global a
    global b
    global c
    "###);
}

#[test]
fn a_block_shadows_without_touching_the_outer_binding() {
    let output = execute("var x = 10; { var x = 20; print x; } print x;");
    assert_display_snapshot!(output, @r###"
    20
    10
    "###);
}

#[test]
fn variable_references_are_frozen_to_the_scope_that_declared_them() {
    // The resolver binds `a` inside `show` once, at declaration time. The
    // later shadowing declaration in the block must not be picked up.
    let source = r#"var a = "global";
{
  fun show() { print a; }
  show();
  var a = "block";
  show();
}"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    global
    global
    "###);
}

#[test]
fn reading_an_undefined_variable_is_a_runtime_error() {
    let error = execute_err("print x;");
    assert_eq!(error, "Undefined variable 'x'.\n[line 1]");
}

#[test]
fn assigning_to_an_undeclared_global_is_a_runtime_error() {
    let error = execute_err("x = 1;");
    assert_eq!(error, "Undefined variable 'x'.\n[line 1]");
}

#[test]
fn assignment_evaluates_to_the_assigned_value() {
    let output = execute("var x = 1; print x = 2; print x;");
    assert_display_snapshot!(output, @r###"
    2
    2
    "###);
}
