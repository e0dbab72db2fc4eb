//! Parse-time diagnostics: syntactically broken source, reported per-error
//! with synchronization so multiple mistakes in one source can all surface.
#[macro_use]
mod common;

#[test]
fn invalid_assignment_target_is_reported_without_confusing_the_parser() {
    // The left-hand side of `=` isn't an lvalue. The spec requires this to be
    // *reported*, not *raised*: the statement is otherwise well-formed, so
    // parsing must not desynchronize and must not produce any follow-on
    // "expected ';'"-style noise from losing its place mid-statement.
    let mut output: Vec<u8> = Vec::new();
    let mut stderr: Vec<u8> = Vec::new();
    {
        let mut diagnostics = glint::error::Diagnostics::new(&mut stderr);
        let mut glint = glint::Glint::new(&mut output);
        glint.run_checked("1 + 2 = 3;", &mut diagnostics);
    }
    let stderr = String::from_utf8(stderr).unwrap();
    assert_eq!(stderr.lines().count(), 1, "expected exactly one diagnostic, got {stderr:?}");
    assert!(stderr.contains("Invalid assignment target."));
}

#[test]
fn too_many_parameters_is_a_parse_error() {
    let params: Vec<String> = (0..256).map(|i| format!("p{i}")).collect();
    let source = format!("fun f({}) {{}}", params.join(", "));
    assert_fails!(&source, 65, "Can't have more than 255 parameters.");
}

#[test]
fn too_many_arguments_is_a_parse_error() {
    let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
    let source = format!("fun f() {{}} f({});", args.join(", "));
    assert_fails!(&source, 65, "Can't have more than 255 arguments.");
}

#[test]
fn missing_expression_is_a_parse_error() {
    assert_fails!("print ;", 65, "Expected expression.");
}

#[test]
fn unterminated_string_is_a_scan_error() {
    assert_fails!(r#"print "oops;"#, 65, "Unterminated string.");
}

#[test]
fn unterminated_block_comment_is_a_scan_error() {
    assert_fails!("/* never closed", 65, "Unterminated block comment.");
}

#[test]
fn multiple_errors_in_one_source_are_all_reported() {
    assert_fails!("print ; print ;", 65, "Expected expression.");
}
