// Batch driver: every command-line argument is one expression, evaluated in
// order against a single shared environment.
use schemini::{Environment, Value, evaluate_str};

/// A result is printed only when it carries a usable value: numbers print,
/// binding forms (`set!`, `defun`) stay silent.
fn display_result(value: &Value) -> Option<String> {
    match value {
        Value::Number(_) => Some(value.to_string()),
        Value::Procedure(_) | Value::Unspecified => None,
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let inputs = if args.is_empty() {
        // No arguments: run a short built-in demonstration
        vec![
            "(defun square (x) (* x x))".to_string(),
            "(set! a 4)".to_string(),
            "(* (+ 2 3) 4)".to_string(),
            "(square a)".to_string(),
        ]
    } else {
        args
    };

    let mut env = Environment::new();
    for input in inputs {
        match evaluate_str(&input, &mut env) {
            Ok(value) => {
                if let Some(text) = display_result(&value) {
                    println!("{}", text);
                }
            }
            Err(e) => {
                e.pretty_print(&input);
                std::process::exit(1);
            }
        }
    }
}
