//! Errors that only surface once evaluation is underway: undefined names,
//! calling a non-callable, and property lookups that miss through `super`.
#[macro_use]
mod common;

#[test]
fn reading_an_undefined_global_is_a_runtime_error() {
    assert_fails!("print nope;", 70, "Undefined variable 'nope'.");
}

#[test]
fn assigning_to_an_undefined_global_is_a_runtime_error() {
    assert_fails!("nope = 1;", 70, "Undefined variable 'nope'.");
}

#[test]
fn reading_an_undefined_local_is_a_runtime_error() {
    assert_fails!("{ print nope; }", 70, "Undefined variable 'nope'.");
}

#[test]
fn calling_a_number_is_a_runtime_error() {
    assert_fails!("var x = 1; x();", 70, "Can only call functions and classes.");
}

#[test]
fn calling_a_string_is_a_runtime_error() {
    assert_fails!(r#""not a function"();"#, 70, "Can only call functions and classes.");
}

#[test]
fn calling_an_instance_is_a_runtime_error() {
    assert_fails!(
        r#"
        class C {}
        var c = C();
        c();
        "#,
        70,
        "Can only call functions and classes."
    );
}

#[test]
fn undefined_property_via_super_is_a_runtime_error() {
    assert_fails!(
        r#"
        class A {}
        class B < A {
          method() { super.missing(); }
        }
        B().method();
        "#,
        70,
        "Undefined property 'missing'."
    );
}

#[test]
fn evaluation_never_runs_when_a_static_error_was_reported() {
    // `nope` below would be a *runtime* error all on its own, but the
    // leading syntax mistake is caught first and the whole run is aborted
    // at exit code 65 without ever reaching the interpreter.
    assert_fails!("print ; print nope;", 65, "Expected expression.");
}
