//! The six end-to-end scenarios: one test each, driving the full
//! scan -> parse -> resolve -> interpret pipeline against inline source.
#[macro_use]
mod common;

#[test]
fn closures_see_rebinding_not_shadowing() {
    assert_prints!(
        r#"
        var a = "global";
        {
          fun showA() { print a; }
          showA();
          var a = "block";
          showA();
        }
        "#,
        ["global", "global"]
    );
}

#[test]
fn fibonacci_via_while() {
    assert_prints!(
        r#"
        var a=1; var b=1; var t;
        while (a < 20) { print a; t=a; a=b; b=t+b; }
        "#,
        ["1", "1", "2", "3", "5", "8", "13"]
    );
}

#[test]
fn class_with_init_and_method() {
    assert_prints!(
        r#"class Greeter { init(n){ this.n=n; } hi(){ print this.n; } }
        Greeter("world").hi();"#,
        ["world"]
    );
}

#[test]
fn super_method_dispatch() {
    assert_prints!(
        r#"class A { m(){ print "A"; } }
        class B < A { m(){ super.m(); print "B"; } }
        B().m();"#,
        ["A", "B"]
    );
}

#[test]
fn break_outside_loop_is_a_parse_error() {
    assert_fails!("break;", 65, "[line 1] Error at 'break': Expect 'break' to appear inside a loop.");
}

#[test]
fn undefined_property_is_a_runtime_error() {
    assert_fails!("class C {} var c=C(); print c.x;", 70, "Undefined property 'x'.");
}
