//! Closures over locals, parameters, and loop bodies.
#[macro_use]
mod common;

#[test]
fn closure_over_later_variable_sees_its_final_value() {
    assert_prints!(
        r#"
        var a = "a";
        var b = "b";
        fun showBoth() { print a; print b; }
        showBoth();
        "#,
        ["a", "b"]
    );
}

#[test]
fn closure_over_function_parameter() {
    assert_prints!(
        r#"
        fun makeShower(param) {
          fun show() { print param; }
          return show;
        }
        makeShower("param")();
        "#,
        ["param"]
    );
}

#[test]
fn assigning_through_a_closure_is_visible_to_other_closures_sharing_it() {
    assert_prints!(
        r#"
        var value = "local";
        fun getValue() { return value; }
        fun setValue(v) { value = v; }
        print getValue();
        setValue("assigned");
        print getValue();
        "#,
        ["local", "assigned"]
    );
}

#[test]
fn each_loop_iteration_captures_its_own_binding() {
    // A `for` loop desugars its clauses into nested blocks, so the loop
    // variable declared by the initializer is a single binding shared across
    // iterations unless the body itself redeclares it with `var`.
    assert_prints!(
        r#"
        fun makeCounters() {
          var counters = "";
          for (var i = 0; i < 3; i = i + 1) {
            var captured = i;
            fun show() { print captured; }
            show();
          }
        }
        makeCounters();
        "#,
        ["0", "1", "2"]
    );
}

#[test]
fn nested_closures_each_keep_their_own_frame() {
    assert_prints!(
        r#"
        fun outer() {
          var x = "x";
          fun middle() {
            var y = "y";
            fun inner() { print x; print y; }
            inner();
          }
          middle();
        }
        outer();
        "#,
        ["x", "y"]
    );
}
