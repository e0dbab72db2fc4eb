//! Static resolution errors: scoping and keyword-context mistakes that are
//! caught before a single statement is ever interpreted.
#[macro_use]
mod common;

#[test]
fn reading_a_local_in_its_own_initializer_is_a_resolver_error() {
    assert_fails!(
        r#"
        var a = "outer";
        {
          var a = a;
        }
        "#,
        65,
        "Can't read local variable in its own initializer."
    );
}

#[test]
fn redeclaring_a_local_in_the_same_scope_is_a_resolver_error() {
    assert_fails!(
        r#"
        {
          var a = "first";
          var a = "second";
        }
        "#,
        65,
        "A variable with that name already exists in this scope."
    );
}

#[test]
fn redeclaring_a_global_is_allowed() {
    // The restriction on shadowing only applies to local scopes; top-level
    // `var` may be declared more than once.
    assert_prints!(
        r#"
        var a = "first";
        var a = "second";
        print a;
        "#,
        ["second"]
    );
}

#[test]
fn this_outside_a_class_is_a_resolver_error() {
    assert_fails!("print this;", 65, "Can't use 'this' outside of a class.");
}

#[test]
fn this_inside_a_plain_function_is_still_outside_a_class() {
    assert_fails!("fun f() { print this; }", 65, "Can't use 'this' outside of a class.");
}

#[test]
fn super_outside_a_class_is_a_resolver_error() {
    assert_fails!("super.method();", 65, "Can't use 'super' outside of a class.");
}

#[test]
fn super_in_a_class_with_no_superclass_is_a_resolver_error() {
    assert_fails!(
        r#"
        class C {
          method() { super.method(); }
        }
        "#,
        65,
        "Can't use 'super' in a class with no superclass."
    );
}

#[test]
fn returning_from_top_level_code_is_a_resolver_error() {
    assert_fails!("return 1;", 65, "Can't return from top-level code.");
}

#[test]
fn returning_a_value_from_an_initializer_is_a_resolver_error() {
    assert_fails!(
        r#"
        class C {
          init() { return "nope"; }
        }
        "#,
        65,
        "Can't return a value from an initializer."
    );
}

#[test]
fn bare_return_from_an_initializer_is_allowed() {
    assert_prints!(
        r#"
        class C {
          init() { return; }
        }
        print C().init();
        "#,
        ["C instance"]
    );
}

#[test]
fn a_class_inheriting_from_itself_is_a_resolver_error() {
    assert_fails!("class C < C {}", 65, "A class can't inherit from itself.");
}
