//! Arithmetic, comparison, equality, string concatenation, and unary operators.
#[macro_use]
mod common;

#[test]
fn arithmetic_on_numbers() {
    assert_prints!("print 1 + 2; print 5 - 3; print 4 * 2; print 9 / 2;", ["3", "2", "8", "4.5"]);
}

#[test]
fn plus_concatenates_strings() {
    assert_prints!(r#"print "foo" + "bar";"#, ["foobar"]);
}

#[test]
fn plus_rejects_mixed_operand_types() {
    assert_fails!(r#"print "foo" + 1;"#, 70, "Operands must be two numbers or two strings.");
}

#[test]
fn minus_and_star_require_numbers() {
    assert_fails!(r#"print "foo" - 1;"#, 70, "Operands must be numbers.");
    assert_fails!(r#"print "foo" * 1;"#, 70, "Operands must be numbers.");
}

#[test]
fn unary_minus_requires_a_number() {
    assert_fails!(r#"print -"foo";"#, 70, "Operand must be a number.");
}

#[test]
fn unary_bang_negates_truthiness_for_every_value() {
    assert_prints!(
        r#"
        class C {}
        print !C();
        print !nil;
        print !0;
        print !"";
        "#,
        ["false", "true", "false", "false"]
    );
}

#[test]
fn comparisons_are_numeric_only() {
    assert_prints!("print 1 < 2; print 2 <= 2; print 3 > 2; print 3 >= 4;", ["true", "true", "true", "false"]);
}

#[test]
fn string_comparison_is_not_supported_by_relational_operators() {
    assert_fails!(r#"print "a" < "b";"#, 70, "Operands must be numbers.");
}

#[test]
fn equality_compares_across_types_without_erroring() {
    assert_prints!(r#"print 1 == "1"; print nil == false; print 1 == 1.0;"#, ["false", "false", "true"]);
}

#[test]
fn a_leading_binary_operator_is_a_parse_error() {
    assert_fails!("print * 2;", 65, "Expected expression left of binary operator");
}

#[test]
fn leading_unary_minus_is_not_a_leading_binary_operator() {
    assert_prints!("print -2 + 5;", ["3"]);
}
