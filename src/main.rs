use std::io::{self, Read};
use std::{env, fs, process};

use log::debug;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use glint::error::Diagnostics;
use glint::Glint;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    let code = match args.as_slice() {
        [] => run_prompt(),
        [arg] if arg == "--" => run_stdin(),
        [path] => run_file(path),
        _ => {
            eprintln!("Usage: glint [script | --]");
            64
        },
    };

    process::exit(code);
}

fn run_file(path: &str) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Can't read '{path}': {error}");
            return 74;
        },
    };

    debug!("read {} bytes from {path}", source.len());

    let mut glint = Glint::new(io::stdout());
    glint.run(&source)
}

fn run_stdin() -> i32 {
    let mut source = String::new();
    if let Err(error) = io::stdin().read_to_string(&mut source) {
        eprintln!("Can't read standard input: {error}");
        return 74;
    }

    debug!("read {} bytes from stdin", source.len());

    let mut glint = Glint::new(io::stdout());
    glint.run(&source)
}

/// Reads one line at a time until end-of-stream, running each as it arrives.
/// Global definitions persist across lines because `glint` (and its one
/// `Interpreter`) lives for the whole loop; only the diagnostics flags reset
/// between lines, so one bad line doesn't poison the rest of the session.
fn run_prompt() -> i32 {
    let mut glint = Glint::new(io::stdout());
    let mut diagnostics = Diagnostics::new(io::stderr());

    let mut editor = DefaultEditor::new().expect("readline editor to initialize");
    let history_path = home::home_dir().map(|home| home.join(".glint_history"));
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                glint.run_line(&line, &mut diagnostics);
                diagnostics.reset();
            },
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(error) => {
                eprintln!("readline error: {error}");
                break;
            },
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }

    0
}
