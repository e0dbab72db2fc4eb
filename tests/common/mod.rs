/// Runs `$source` to completion and asserts its stdout equals the given
/// lines joined by newlines (each `print` call contributes one line).
/// Asserts the run exits clean (code 0).
#[macro_export]
macro_rules! assert_prints {
    ($source:expr, [$($expected:expr),* $(,)?]) => {{
        let mut output: Vec<u8> = Vec::new();
        let code = {
            let mut glint = glint::Glint::new(&mut output);
            glint.run($source)
        };

        let stdout = String::from_utf8(output).unwrap();
        assert_eq!(code, 0, "expected a clean run, stdout so far: {stdout:?}");

        let mut expected = vec![$($expected),*];
        let expected = if expected.is_empty() {
            String::new()
        } else {
            expected.push("");
            expected.join("\n")
        };
        assert_eq!(stdout, expected);
    }};
}

/// Runs `$source` and asserts it was classified with exit code `$code` and
/// that its diagnostic output contains `$needle`.
#[macro_export]
macro_rules! assert_fails {
    ($source:expr, $code:expr, $needle:expr) => {{
        let mut output: Vec<u8> = Vec::new();
        let mut stderr: Vec<u8> = Vec::new();
        let exit_code = {
            let mut diagnostics = glint::error::Diagnostics::new(&mut stderr);
            let mut glint = glint::Glint::new(&mut output);
            glint.run_checked($source, &mut diagnostics);
            glint::Glint::exit_code(&diagnostics)
        };

        assert_eq!(exit_code, $code);
        let stderr = String::from_utf8(stderr).unwrap();
        assert!(stderr.contains($needle), "expected stderr to contain {:?}, got {:?}", $needle, stderr);
    }};
}
