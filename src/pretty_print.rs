use crate::evaluator::{EvalError, InterpretError};
use crate::parser::ParseError;
use ariadne::{Label, Report, ReportKind, Source};

impl ParseError {
    pub fn pretty_print(&self, input: &str) {
        let report = match self {
            ParseError::UnexpectedToken { found, expected } => {
                Report::build(ReportKind::Error, ("input", found.span.to_range()))
                    .with_message(format!("Unexpected token: {}", found))
                    .with_label(
                        Label::new(("input", found.span.to_range()))
                            .with_message(format!("Expected {expected}")),
                    )
            }
            ParseError::UnexpectedEof(expected) => {
                // Non-empty range so the label renders a caret at end of input
                let idx = input.len();
                Report::build(ReportKind::Error, ("input", idx..idx + 1))
                    .with_message("Unexpected end of input")
                    .with_label(Label::new(("input", idx..idx + 1)).with_message(expected))
            }
            ParseError::MalformedDefun { reason, span } => {
                Report::build(ReportKind::Error, ("input", span.to_range()))
                    .with_message("Malformed defun form")
                    .with_label(Label::new(("input", span.to_range())).with_message(reason))
            }
        };
        report
            .finish()
            .eprint(("input", Source::from(input)))
            .unwrap();
    }
}

impl EvalError {
    pub fn pretty_print(&self, input: &str) {
        let span = self.span().to_range();
        let label_message = match self {
            EvalError::Env(_) => "This symbol is not bound in the current environment",
            EvalError::ArityMismatch { .. } => "Called here with the wrong number of arguments",
            EvalError::MissingOperands { .. } => "This operator was applied to no operands",
            EvalError::NotANumber { .. } => "This operand is not a number",
            EvalError::InvalidAssignment { .. } => "This set! form is malformed",
            EvalError::InvalidCallForm { .. } => "This expression cannot head a call form",
            EvalError::MisplacedForm { .. } => "This form only makes sense inside a call",
            EvalError::EmptyList(_) => "Empty lists have no value",
        };
        Report::build(ReportKind::Error, ("input", span.clone()))
            .with_message(self.to_string())
            .with_label(Label::new(("input", span)).with_message(label_message))
            .finish()
            .eprint(("input", Source::from(input)))
            .unwrap();
    }
}

impl InterpretError {
    pub fn pretty_print(&self, input: &str) {
        match self {
            InterpretError::Parse(e) => e.pretty_print(input),
            InterpretError::Eval(e) => e.pretty_print(input),
        }
    }
}
