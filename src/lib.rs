#![allow(clippy::needless_return)]

//! Glint is a small, dynamically typed, class-based scripting language. Glint
//! is a tree-walk interpreter with a hand-written recursive descent parser,
//! inspired by the [Crafting Interpreters](https://craftinginterpreters.com/)
//! book by Bob Nystrom.
//!
//! ## Scanning
//! The first step is scanning: converting a string of characters into a list
//! of tokens. The scanner is implemented in the [`scanner`](scanner) module as
//! a small state machine over the source characters. It reports syntax errors
//! as a [`ScanError`](error::ScanError) and keeps scanning afterward so later
//! errors in the same source can still be found.
//!
//! ## Parsing
//! The second step is parsing: converting the token list into an abstract
//! syntax tree. The parser is implemented in the [`parser`](parser) module as
//! a recursive descent parser. [`Expressions`](expr::Expr) produce a value,
//! an [`Object`](object::Object); [`statements`](stmt::Stmt) perform an action
//! and produce no value. Parse errors are reported as a
//! [`ParseError`](error::ParseError); the parser synchronizes to the next
//! statement boundary afterward so it can keep looking for more errors.
//!
//! ## Resolving
//! The third step is resolving: a static pass over the AST that determines,
//! for every variable reference, how many enclosing scopes separate it from
//! its declaration. The resolver is implemented in the [`resolver`](resolver)
//! module. It reports [`ResolveError`](error::ResolveError)s for code that is
//! syntactically valid but semantically wrong — reading a local variable in
//! its own initializer, returning from top-level code, and so on.
//!
//! ## Interpreting
//! The final step is interpreting: walking the AST and evaluating it. The
//! interpreter is implemented in the [`interpreter`](interpreter) module. It
//! reports [`RuntimeError`](error::RuntimeError)s for the errors that can only
//! be caught while the program is running, such as calling a value that isn't
//! callable. The interpreter owns the [`environment`](environment) chain that
//! implements lexical scoping and closures.

use std::io::{self, Write};

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;
use stmt::{ExpressionData, PrintData, Stmt};

/// Top-level driver: owns the interpreter across an entire run (or, in
/// prompt mode, across every line of a session) and wires the scan → parse →
/// resolve → interpret pipeline together.
pub struct Glint<'a> {
    interpreter: Interpreter<'a>,
}

impl<'a> Glint<'a> {
    pub fn new(stdout: impl Write + 'a) -> Self {
        Glint { interpreter: Interpreter::new(stdout) }
    }

    /// Runs one complete, non-interactive program and returns the process
    /// exit code the caller should use (0/65/70; CLI misuse is handled by
    /// the caller before this is reached, since it doesn't need a run at all).
    pub fn run(&mut self, source: &str) -> i32 {
        let mut diagnostics = Diagnostics::new(io::stderr());
        self.run_checked(source, &mut diagnostics);
        Self::exit_code(&diagnostics)
    }

    /// Runs one complete, non-interactive program against a caller-supplied
    /// [`Diagnostics`] sink instead of standard error. Used by `run` above
    /// and, directly, by tests that need to capture diagnostic output.
    pub fn run_checked(&mut self, source: &str, diagnostics: &mut Diagnostics) {
        self.run_with(source, false, diagnostics);
    }

    /// Runs `source` as one line of an interactive session. Bare top-level
    /// expression statements are rewritten to `print` statements so typing an
    /// expression at the prompt shows its value, matching what a REPL user
    /// expects. `diagnostics` is reset by the caller between lines so a typo
    /// on one line doesn't poison the session's eventual exit code.
    pub fn run_line(&mut self, source: &str, diagnostics: &mut Diagnostics) {
        self.run_with(source, true, diagnostics);
    }

    fn run_with(&mut self, source: &str, rewrite_top_level_expressions: bool, diagnostics: &mut Diagnostics) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens(diagnostics);
        if diagnostics.had_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let mut statements = parser.parse(diagnostics);
        if diagnostics.had_error() {
            return;
        }

        if rewrite_top_level_expressions {
            rewrite_expression_statements(&mut statements);
        }

        let mut resolver = Resolver::new(&mut self.interpreter, diagnostics);
        resolver.resolve(&statements);
        if diagnostics.had_error() {
            return;
        }

        self.interpreter.interpret(&statements, diagnostics);
    }

    pub fn exit_code(diagnostics: &Diagnostics) -> i32 {
        if diagnostics.had_error() {
            65
        } else if diagnostics.had_runtime_error() {
            70
        } else {
            0
        }
    }
}

/// Rewrites top-level `ExpressionStmt`s to `PrintStmt`s. Only the top level:
/// an expression statement nested inside a block or function body keeps its
/// usual silent, no-output meaning.
fn rewrite_expression_statements(statements: &mut [Stmt]) {
    for stmt in statements.iter_mut() {
        if let Stmt::Expression(ExpressionData { expr }) = stmt {
            *stmt = Stmt::Print(PrintData { expr: expr.clone() });
        }
    }
}
