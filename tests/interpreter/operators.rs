use crate::helpers::{execute, execute_err};
use insta::assert_display_snapshot;

#[test]
fn multiplication_binds_tighter_than_addition() {
    let output = execute("print 1 + 2 * 3;");
    assert_display_snapshot!(output, @r###"
    7
    "###);
}

#[test]
fn grouping_overrides_precedence() {
    let output = execute("print (1 + 2) * 3;");
    assert_display_snapshot!(output, @r###"
    9
    "###);
}

#[test]
fn plus_concatenates_strings() {
    let output = execute(r#"print "the quick " + "brown fox";"#);
    assert_display_snapshot!(output, @r###"
    the quick brown fox
    "###);
}

#[test]
fn plus_rejects_mixed_operands() {
    let error = execute_err(r#"print "a" + 1;"#);
    assert_eq!(error, "Operands must be two numbers or two strings.\n[line 1]");
}

#[test]
fn division_by_zero_follows_ieee_754() {
    let output = execute("print 1 / 0; print 0 / 0;");
    assert_display_snapshot!(output, @r###"
    inf
    NaN
    "###);
}

#[test]
fn nan_is_not_equal_to_itself() {
    let output = execute("print 0 / 0 == 0 / 0;");
    assert_display_snapshot!(output, @r###"
    false
    "###);
}

#[test]
fn unary_minus_requires_a_number() {
    let output = execute("print -(-3);");
    assert_display_snapshot!(output, @r###"
    3
    "###);
    let error = execute_err(r#"print -"x";"#);
    assert_eq!(error, "Operand must be a number.\n[line 1]");
}

#[test]
fn comparisons_require_numbers() {
    let output = execute("print 2 >= 2; print 1 > 2; print 1 < 2; print 2 <= 1;");
    assert_display_snapshot!(output, @r###"
    true
    false
    true
    false
    "###);
    let error = execute_err(r#"print "a" < "b";"#);
    assert_eq!(error, "Operands must be numbers.\n[line 1]");
}

#[test]
fn only_nil_and_false_are_falsey() {
    let output = execute(r#"print !nil; print !false; print !0; print !"";"#);
    assert_display_snapshot!(output, @r###"
    true
    true
    false
    false
    "###);
}

#[test]
fn equality_never_crosses_types() {
    let output = execute(r#"print 1 == "1"; print nil == nil; print "a" == "a"; print nil == false;"#);
    assert_display_snapshot!(output, @r###"
    false
    true
    true
    false
    "###);
}

#[test]
fn an_empty_program_produces_no_output() {
    assert_eq!(execute(""), "");
}
