use crate::source::Span;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: Expr, // The actual expression data
    pub span: Span, // The source span it covers
}

impl Node {
    pub fn new(kind: Expr, span: Span) -> Self {
        Node { kind, span }
    }

    pub fn new_number(value: f64, span: Span) -> Self {
        Node::new(Expr::Number(value), span)
    }

    pub fn new_symbol(name: impl Into<String>, span: Span) -> Self {
        Node::new(Expr::Symbol(name.into()), span)
    }

    pub fn new_list(elements: Vec<Node>, span: Span) -> Self {
        Node::new(Expr::List(elements), span)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate to Expr's Display implementation
        write!(f, "{}", self.kind)
    }
}

/// A parse-tree node. Trees are built once by the parser and never mutated
/// during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),          // e.g. 3.14
    Symbol(String),       // e.g. x, square
    Operator(Operator),   // one of + - * /
    Assign,               // the set! marker
    Procedure(Procedure), // result of a (defun ...) form
    List(Vec<Node>),      // call form or nested sub-expression
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Symbol(s) => write!(f, "{}", s),
            Expr::Operator(op) => write!(f, "{}", op.symbol()),
            Expr::Assign => write!(f, "set!"),
            Expr::Procedure(procedure) => {
                write!(f, "(defun {} (", procedure.name)?;
                for (i, param) in procedure.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ") {})", procedure.body)
            }
            Expr::List(elements) => {
                write!(f, "(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Expr {
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number",
            Expr::Symbol(_) => "symbol",
            Expr::Operator(_) => "operator",
            Expr::Assign => "set!",
            Expr::Procedure(_) => "procedure",
            Expr::List(_) => "list",
        }
    }
}

/// The four binary-reducible arithmetic functions. Applied to a sequence of
/// operands they fold left-to-right starting from the first operand:
/// `[a, b, c]` evaluates as `(a op b) op c`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
        }
    }

    /// Left-fold over the operands. A single operand returns itself; an empty
    /// operand sequence has no defined result, so `None` is returned and the
    /// caller reports the error.
    ///
    /// Division follows IEEE-754 semantics, so a zero divisor yields an
    /// infinity or NaN rather than an error.
    pub fn apply(&self, operands: &[f64]) -> Option<f64> {
        let (first, rest) = operands.split_first()?;
        Some(rest.iter().fold(*first, |acc, n| match self {
            Operator::Add => acc + n,
            Operator::Sub => acc - n,
            Operator::Mul => acc * n,
            Operator::Div => acc / n,
        }))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Error for explicit operator construction from a token that is none of the
/// recognized spellings. The parser never raises this: its classification
/// falls through to `Symbol` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Sub),
            "*" => Ok(Operator::Mul),
            "/" => Ok(Operator::Div),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

/// A named, fixed-arity, single-body callable bound into an environment by a
/// `defun` form.
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<String>,
    pub body: Box<Node>,
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<procedure:{}>", self.name)
    }
}

/// What evaluation produces, and what environments store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Procedure(Procedure),
    /// The result of a binding form such as `set!`; carries no usable value.
    Unspecified,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Procedure(_) => "procedure",
            Value::Unspecified => "unspecified",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Procedure(procedure) => write!(f, "{}", procedure),
            Value::Unspecified => write!(f, "#<unspecified>"),
        }
    }
}
