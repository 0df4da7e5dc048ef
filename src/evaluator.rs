use crate::environment::{EnvError, Environment};
use crate::parser::{ParseError, parse_str};
use crate::source::Span;
use crate::types::{Expr, Node, Operator, Procedure, Value};
use thiserror::Error;

// --- Evaluation Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error(transparent)]
    Env(#[from] EnvError), // Errors from environment lookup

    #[error("Evaluation error: procedure '{name}' expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("Evaluation error: operator '{operator}' needs at least one operand")]
    MissingOperands { operator: Operator, span: Span },

    #[error("Evaluation error: operand evaluated to a {found}, expected a number")]
    NotANumber { found: &'static str, span: Span },

    #[error("Evaluation error: malformed set! form: {reason}")]
    InvalidAssignment { reason: String, span: Span },

    #[error("Evaluation error: '{head}' cannot head a call form")]
    InvalidCallForm { head: String, span: Span },

    #[error("Evaluation error: '{form}' cannot appear outside a call form")]
    MisplacedForm { form: String, span: Span },

    #[error("Evaluation error: cannot evaluate an empty list")]
    EmptyList(Span),
}

impl EvalError {
    pub fn span(&self) -> Span {
        match self {
            EvalError::Env(EnvError::UnboundVariable(_, span)) => *span,
            EvalError::ArityMismatch { span, .. } => *span,
            EvalError::MissingOperands { span, .. } => *span,
            EvalError::NotANumber { span, .. } => *span,
            EvalError::InvalidAssignment { span, .. } => *span,
            EvalError::InvalidCallForm { span, .. } => *span,
            EvalError::MisplacedForm { span, .. } => *span,
            EvalError::EmptyList(span) => *span,
        }
    }
}

// Result type alias for convenience
pub type EvalResult<T = Value> = Result<T, EvalError>;

// --- Evaluate Function ---

/// Evaluates a parse-tree node against an environment. The tree is read-only;
/// only the environment is mutated, and only by `set!` and `defun` forms.
pub fn evaluate(node: &Node, env: &mut Environment) -> EvalResult {
    match &node.kind {
        // Numbers are self-evaluating
        Expr::Number(n) => Ok(Value::Number(*n)),

        // Symbols are looked up in the environment
        Expr::Symbol(name) => Ok(env.get(name, node.span)?),

        // A procedure node, as a defun form parses to, defines itself: it is
        // bound under its own name and the bound value is returned
        Expr::Procedure(procedure) => Ok(define_procedure(procedure, env)),

        // Operators and set! only make sense as the head of a call form
        Expr::Operator(op) => Err(EvalError::MisplacedForm {
            form: op.symbol().to_string(),
            span: node.span,
        }),
        Expr::Assign => Err(EvalError::MisplacedForm {
            form: "set!".to_string(),
            span: node.span,
        }),

        Expr::List(elements) => evaluate_list(elements, node.span, env),
    }
}

/// Convenience entry point: tokenize, parse and evaluate one expression.
pub fn evaluate_str(input: &str, env: &mut Environment) -> Result<Value, InterpretError> {
    let node = parse_str(input)?;
    Ok(evaluate(&node, env)?)
}

/// Either phase of interpretation can fail; used by [`evaluate_str`] and the
/// driver binary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpretError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

fn evaluate_list(elements: &[Node], span: Span, env: &mut Environment) -> EvalResult {
    let Some((head, args)) = elements.split_first() else {
        return Err(EvalError::EmptyList(span));
    };

    match &head.kind {
        Expr::Operator(op) => evaluate_operator(*op, args, span, env),
        Expr::Assign => evaluate_assignment(args, span, env),
        Expr::Symbol(name) => {
            match env.get(name, head.span)? {
                Value::Procedure(procedure) => apply_procedure(&procedure, args, span, env),
                // A symbol bound to a non-procedure returns its binding as-is
                other => Ok(other),
            }
        }
        Expr::Procedure(procedure) => Ok(define_procedure(procedure, env)),
        other => Err(EvalError::InvalidCallForm {
            head: other.type_name().to_string(),
            span: head.span,
        }),
    }
}

/// Evaluates every operand to a number, then applies the operator's
/// left-to-right fold.
fn evaluate_operator(
    op: Operator,
    args: &[Node],
    span: Span,
    env: &mut Environment,
) -> EvalResult {
    let mut operands = Vec::with_capacity(args.len());
    for arg in args {
        match evaluate(arg, env)? {
            Value::Number(n) => operands.push(n),
            other => {
                return Err(EvalError::NotANumber {
                    found: other.type_name(),
                    span: arg.span,
                });
            }
        }
    }

    op.apply(&operands)
        .map(Value::Number)
        .ok_or(EvalError::MissingOperands { operator: op, span })
}

/// `(set! name expr)`: evaluates the expression and binds the result in the
/// current environment. Only the single-pair form is supported.
fn evaluate_assignment(args: &[Node], span: Span, env: &mut Environment) -> EvalResult {
    let [target, value_expr] = args else {
        return Err(EvalError::InvalidAssignment {
            reason: format!("expected a target symbol and one value, got {} forms", args.len()),
            span,
        });
    };

    let Expr::Symbol(name) = &target.kind else {
        return Err(EvalError::InvalidAssignment {
            reason: format!("assignment target must be a symbol, got a {}", target.kind.type_name()),
            span: target.span,
        });
    };

    let value = evaluate(value_expr, env)?;
    env.set(name.clone(), value);
    Ok(Value::Unspecified)
}

fn define_procedure(procedure: &Procedure, env: &mut Environment) -> Value {
    let value = Value::Procedure(procedure.clone());
    env.set(procedure.name.clone(), value.clone());
    value
}

/// Invokes a procedure: arguments are evaluated in the caller's environment,
/// then bound positionally into a fresh flat environment for the body.
fn apply_procedure(
    procedure: &Procedure,
    args: &[Node],
    span: Span,
    env: &mut Environment,
) -> EvalResult {
    if args.len() != procedure.params.len() {
        return Err(EvalError::ArityMismatch {
            name: procedure.name.clone(),
            expected: procedure.params.len(),
            found: args.len(),
            span,
        });
    }

    let mut call_env = Environment::new();
    for (param, arg) in procedure.params.iter().zip(args) {
        let value = evaluate(arg, env)?;
        call_env.set(param.clone(), value);
    }

    evaluate(&procedure.body, &mut call_env)
}
