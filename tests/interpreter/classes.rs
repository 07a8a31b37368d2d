use crate::helpers::{execute, execute_err};
use insta::assert_display_snapshot;

#[test]
fn classes_print_their_name_and_instances_print_their_class() {
    let output = execute("class Breakfast {} print Breakfast; print Breakfast();");
    assert_display_snapshot!(output, @r###"
    Breakfast
    Breakfast instance
    "###);
}

#[test]
fn fields_spring_into_existence_on_assignment() {
    let source = r#"class Bagel {}
var bagel = Bagel();
bagel.flavor = "sesame";
print bagel.flavor;"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    sesame
    "###);
}

#[test]
fn methods_see_their_instance_through_this() {
    let source = r#"class Cake {
  taste() {
    print "The " + this.flavor + " cake is delicious!";
  }
}
var cake = Cake();
cake.flavor = "German chocolate";
cake.taste();"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    The German chocolate cake is delicious!
    "###);
}

#[test]
fn an_extracted_method_stays_bound_to_its_instance() {
    let source = r#"class Person {
  init(name) { this.name = name; }
  greet() { print "Hi, I am " + this.name + "."; }
}
var greet = Person("Jane").greet;
greet();"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    Hi, I am Jane.
    "###);
}

#[test]
fn an_initializer_always_returns_the_bound_instance() {
    let source = r#"class C {
  init(n) { this.n = n; }
}
var c = C(7);
print c.n;
var f = c.init;
print f(9).n;
print f(9) == c;"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    7
    9
    true
    "###);
}

#[test]
fn every_construction_yields_a_distinct_instance() {
    let output = execute("class C {} print C() == C(); var c = C(); print c == c;");
    assert_display_snapshot!(output, @r###"
    false
    true
    "###);
}

#[test]
fn super_dispatches_to_the_overridden_method() {
    let source = r#"class A {
  m() { return "A"; }
}
class B < A {
  m() { return super.m() + "B"; }
}
print B().m();"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    AB
    "###);
}

#[test]
fn inherited_methods_dispatch_this_through_the_subclass() {
    let source = r#"class Base {
  who() { return "base"; }
  hello() { return "hello " + this.who(); }
}
class Derived < Base {
  who() { return "derived"; }
}
print Derived().hello();"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    hello derived
    "###);
}

#[test]
fn a_subclass_without_init_uses_the_inherited_one() {
    let source = r#"class Point {
  init(x, y) {
    this.x = x;
    this.y = y;
  }
}
class Pixel < Point {}
var p = Pixel(1, 2);
print p.x + p.y;"#;
    let output = execute(source);
    assert_display_snapshot!(output, @r###"
    3
    "###);
}

#[test]
fn inheriting_from_a_non_class_value_is_a_runtime_error() {
    let source = r#"var NotAClass = "so not a class";
class Sub < NotAClass {}"#;
    let error = execute_err(source);
    assert_eq!(error, "Superclass must be a class.\n[line 2]");
}

#[test]
fn reading_a_missing_property_is_a_runtime_error() {
    let error = execute_err("class A {} print A().missing;");
    assert_eq!(error, "Undefined property 'missing'.\n[line 1]");
}

#[test]
fn a_super_lookup_that_finds_no_method_is_a_runtime_error() {
    let source = r#"class A {}
class B < A { m() { return super.nope(); } }
B().m();"#;
    let error = execute_err(source);
    assert_eq!(error, "Undefined property 'nope'.\n[line 2]");
}

#[test]
fn only_instances_have_fields() {
    let error = execute_err("print true.field;");
    assert_eq!(error, "Only instances have fields.\n[line 1]");
    let error = execute_err("var x = 3; x.y = 1;");
    assert_eq!(error, "Only instances have fields.\n[line 1]");
}
