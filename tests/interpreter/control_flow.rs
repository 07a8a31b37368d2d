use crate::helpers::execute;
use insta::assert_display_snapshot;

#[test]
fn two_branch_conditional_works() {
    let source = r#"if (3 > 5) {
    print true;
} else {
    print false;
}"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    false
    "###);
}

#[test]
fn single_branch_conditional_works() {
    let source = r#"if (5 > 2) {
    print true;
}"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    true
    "###);
}

#[test]
fn a_while_loop_runs_until_its_condition_turns_falsey() {
    let source = r#"var i = 0;
while (i < 3) {
    print i;
    i = i + 1;
}"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    0
    1
    2
    "###);
}

#[test]
fn a_for_loop_behaves_like_its_while_desugaring() {
    let output = execute("for (var i = 0; i < 3; i = i + 1) print i;");
    assert_display_snapshot!(output, @r###"
    0
    1
    2
    "###);
}

#[test]
fn for_loop_clauses_are_optional() {
    let source = r#"var i = 0;
for (; i < 2;) {
    print i;
    i = i + 1;
}"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    0
    1
    "###);
}

#[test]
fn logical_operators_return_the_deciding_operand_not_a_boolean() {
    let source = r#"print "hi" or 2;
print nil or "yes";
print nil and 2;
print true and "x";"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    hi
    yes
    nil
    x
    "###);
}

#[test]
fn the_right_operand_is_not_evaluated_when_the_left_one_decides() {
    let source = r#"var called = false;
fun touch() {
    called = true;
    return true;
}
var unused = false and touch();
print called;"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    false
    "###);
}
