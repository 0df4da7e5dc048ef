use crate::Span;
use crate::lexer::{Token, TokenKind, tokenize};
use crate::types::{Expr, Node, Operator, Procedure};
use std::iter::Peekable;
use std::vec::IntoIter; // To iterate over Vec<Token>
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Parse error [at {}]: unexpected token '{found}', expected {expected}", found.span)]
    UnexpectedToken { found: Token, expected: String },
    #[error("Parse error: unexpected end of input, expected {0}")]
    UnexpectedEof(String),
    #[error("Parse error [at {span}]: malformed defun: {reason}")]
    MalformedDefun { reason: String, span: Span },
}

// Result type alias for convenience
type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over an owned token sequence. Tokens are consumed
/// destructively from the front, so a `Parser` is good for exactly one parse.
pub struct Parser {
    tokens: Peekable<IntoIter<Token>>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens: tokens.into_iter().peekable(),
        }
    }

    // Consumes the next token if available.
    fn next_token(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    // Peeks at the next token without consuming.
    fn peek_token(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    /// Parses a single expression from the token stream.
    pub fn parse_expr(&mut self) -> ParseResult<Node> {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::LParen,
                span,
            }) => self.parse_list(span),
            Some(found @ Token {
                kind: TokenKind::RParen,
                ..
            }) => Err(ParseError::UnexpectedToken {
                found,
                expected: "an expression".to_string(),
            }),
            Some(Token {
                kind: TokenKind::Atom(text),
                span,
            }) => Ok(classify_atom(&text, span)),
            None => Err(ParseError::UnexpectedEof("an expression".to_string())),
        }
    }

    /// Parses the elements of a parenthesized group, the opening `(` already
    /// consumed. A group whose first atom is `defun` is the procedure
    /// definition special form; everything else is a generic list.
    fn parse_list(&mut self, lparen_span: Span) -> ParseResult<Node> {
        if let Some(Token {
            kind: TokenKind::Atom(text),
            ..
        }) = self.peek_token()
            && text == "defun"
        {
            self.next_token();
            return self.parse_defun(lparen_span);
        }

        let mut elements = Vec::new();
        loop {
            match self.peek_token() {
                Some(Token {
                    kind: TokenKind::RParen,
                    span,
                }) => {
                    let span = lparen_span.merge(*span);
                    self.next_token();
                    return Ok(Node::new_list(elements, span));
                }
                Some(_) => elements.push(self.parse_expr()?),
                None => return Err(ParseError::UnexpectedEof("')'".to_string())),
            }
        }
    }

    /// Parses `name (param ...) body)` of a `(defun ...)` form into an
    /// [`Expr::Procedure`] node.
    fn parse_defun(&mut self, start_span: Span) -> ParseResult<Node> {
        let name = match self.next_token() {
            Some(Token {
                kind: TokenKind::Atom(text),
                span,
            }) => match classify_atom(&text, span).kind {
                Expr::Symbol(name) => name,
                other => {
                    return Err(ParseError::MalformedDefun {
                        reason: format!(
                            "procedure name must be a symbol, got {} '{}'",
                            other.type_name(),
                            text
                        ),
                        span,
                    });
                }
            },
            Some(found) => {
                return Err(ParseError::MalformedDefun {
                    reason: format!("expected a procedure name, got '{}'", found),
                    span: found.span,
                });
            }
            None => return Err(ParseError::UnexpectedEof("a procedure name".to_string())),
        };

        let params = self.parse_param_list()?;
        let body = self.parse_expr()?;

        match self.next_token() {
            Some(Token {
                kind: TokenKind::RParen,
                span,
            }) => Ok(Node::new(
                Expr::Procedure(Procedure {
                    name,
                    params,
                    body: Box::new(body),
                }),
                start_span.merge(span),
            )),
            Some(found) => Err(ParseError::MalformedDefun {
                reason: "defun takes exactly a name, a parameter list and one body expression"
                    .to_string(),
                span: found.span,
            }),
            None => Err(ParseError::UnexpectedEof("')'".to_string())),
        }
    }

    /// Parses the parenthesized formal-parameter list of a defun form.
    fn parse_param_list(&mut self) -> ParseResult<Vec<String>> {
        match self.next_token() {
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {}
            Some(found) => {
                return Err(ParseError::MalformedDefun {
                    reason: format!("expected a parameter list, got '{}'", found),
                    span: found.span,
                });
            }
            None => return Err(ParseError::UnexpectedEof("a parameter list".to_string())),
        }

        let mut params = Vec::new();
        loop {
            match self.next_token() {
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                }) => return Ok(params),
                Some(Token {
                    kind: TokenKind::Atom(text),
                    span,
                }) => match classify_atom(&text, span).kind {
                    Expr::Symbol(name) => params.push(name),
                    other => {
                        return Err(ParseError::MalformedDefun {
                            reason: format!(
                                "parameters must be symbols, got {} '{}'",
                                other.type_name(),
                                text
                            ),
                            span,
                        });
                    }
                },
                Some(found) => {
                    return Err(ParseError::MalformedDefun {
                        reason: format!("parameters must be symbols, got '{}'", found),
                        span: found.span,
                    });
                }
                None => return Err(ParseError::UnexpectedEof("')'".to_string())),
            }
        }
    }

    /// Parses the entire token sequence as exactly one top-level expression.
    /// Trailing tokens (for instance an extra `)`) are rejected rather than
    /// silently returning a truncated tree.
    pub fn parse(mut self) -> ParseResult<Node> {
        let expr = self.parse_expr()?;

        if let Some(found) = self.next_token() {
            Err(ParseError::UnexpectedToken {
                found,
                expected: "end of input".to_string(),
            })
        } else {
            Ok(expr)
        }
    }
}

/// Leaf classification: known operator spellings first, then a floating-point
/// numeral, then symbol. An operator-shaped token that matches no recognized
/// spelling is deliberately classified as a symbol rather than rejected here.
fn classify_atom(text: &str, span: Span) -> Node {
    let kind = if text == "set!" {
        Expr::Assign
    } else if let Ok(op) = text.parse::<Operator>() {
        Expr::Operator(op)
    } else if let Some(n) = parse_float_literal(text) {
        Expr::Number(n)
    } else {
        Expr::Symbol(text.to_string())
    };
    Node::new(kind, span)
}

/// Standard float literal rules only: optional sign, digits, optional decimal
/// point and fraction, optional exponent. Rust's `f64` parser additionally
/// accepts spellings like `inf` and `NaN`, which must stay symbols here.
fn parse_float_literal(text: &str) -> Option<f64> {
    if text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        text.parse().ok()
    } else {
        None
    }
}

// Helper function to lex and parse a string directly (useful for tests and
// the driver binary)
pub fn parse_str(input: &str) -> ParseResult<Node> {
    Parser::new(tokenize(input)).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper for asserting parse errors by variant, ignoring payload
    fn assert_parse_error(input: &str, expected_error_variant: ParseError) {
        match parse_str(input) {
            Ok(result) => panic!(
                "Expected parsing to fail for input '{}', but got: {:?}",
                input, result
            ),
            Err(e) => {
                assert_eq!(
                    std::mem::discriminant(&e),
                    std::mem::discriminant(&expected_error_variant),
                    "Input: '{}', Expected error variant like {:?}, got: {:?}",
                    input,
                    expected_error_variant,
                    e
                );
            }
        }
    }

    fn atom(text: &str) -> Token {
        Token {
            kind: TokenKind::Atom(text.to_string()),
            span: Span::default(),
        }
    }

    fn lparen() -> Token {
        Token {
            kind: TokenKind::LParen,
            span: Span::default(),
        }
    }

    fn rparen() -> Token {
        Token {
            kind: TokenKind::RParen,
            span: Span::default(),
        }
    }

    #[test]
    fn test_parse_simple_tokens() {
        // ["(", "*", "a", "b", ")"] -> a three-element list: operator, two symbols
        let tokens = vec![lparen(), atom("*"), atom("a"), atom("b"), rparen()];
        let node = Parser::new(tokens).parse().expect("should parse");
        match node.kind {
            Expr::List(elements) => {
                assert_eq!(elements.len(), 3);
                assert_eq!(elements[0].kind, Expr::Operator(Operator::Mul));
                assert_eq!(elements[1].kind, Expr::Symbol("a".to_string()));
                assert_eq!(elements[2].kind, Expr::Symbol("b".to_string()));
            }
            other => panic!("Expected a list, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_floating_point_numbers() {
        let tokens = vec![lparen(), atom("3.14"), rparen()];
        let node = Parser::new(tokens).parse().expect("should parse");
        match node.kind {
            Expr::List(elements) => {
                assert_eq!(elements.len(), 1);
                assert_eq!(elements[0].kind, Expr::Number(3.14));
            }
            other => panic!("Expected a list, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_expression() {
        let node = parse_str("(+ 2.3 (* 4.5 3))").expect("should parse");
        match node.kind {
            Expr::List(elements) => {
                assert_eq!(elements.len(), 3);
                assert_eq!(elements[0].kind, Expr::Operator(Operator::Add));
                assert_eq!(elements[1].kind, Expr::Number(2.3));
                match &elements[2].kind {
                    Expr::List(inner) => {
                        assert_eq!(inner.len(), 3);
                        assert_eq!(inner[0].kind, Expr::Operator(Operator::Mul));
                    }
                    other => panic!("Expected a nested list, got: {:?}", other),
                }
            }
            other => panic!("Expected a list, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_atoms() {
        assert_eq!(parse_str("123").unwrap().kind, Expr::Number(123.0));
        assert_eq!(parse_str("-4.5").unwrap().kind, Expr::Number(-4.5));
        assert_eq!(parse_str("1e3").unwrap().kind, Expr::Number(1000.0));
        assert_eq!(
            parse_str("symbol").unwrap().kind,
            Expr::Symbol("symbol".to_string())
        );
        assert_eq!(
            parse_str("+").unwrap().kind,
            Expr::Operator(Operator::Add)
        );
        assert_eq!(parse_str("set!").unwrap().kind, Expr::Assign);
    }

    #[test]
    fn test_classification_falls_through_to_symbol() {
        // Operator-shaped or number-shaped garbage never raises at this stage
        assert_eq!(parse_str("+-").unwrap().kind, Expr::Symbol("+-".to_string()));
        assert_eq!(
            parse_str("1.2.3").unwrap().kind,
            Expr::Symbol("1.2.3".to_string())
        );
        assert_eq!(
            parse_str("inf").unwrap().kind,
            Expr::Symbol("inf".to_string())
        );
        assert_eq!(
            parse_str("NaN").unwrap().kind,
            Expr::Symbol("NaN".to_string())
        );
    }

    #[test]
    fn test_parse_spans() {
        let node = parse_str("(* a 10)").unwrap();
        assert_eq!(node.span, Span::new(0, 8));
        if let Expr::List(elements) = node.kind {
            assert_eq!(elements[0].span, Span::new(1, 2));
            assert_eq!(elements[1].span, Span::new(3, 4));
            assert_eq!(elements[2].span, Span::new(5, 7));
        } else {
            panic!("Expected a list");
        }
    }

    #[test]
    fn test_parse_defun() {
        let node = parse_str("(defun square (x) (* x x))").expect("should parse");
        match node.kind {
            Expr::Procedure(procedure) => {
                assert_eq!(procedure.name, "square");
                assert_eq!(procedure.params, vec!["x".to_string()]);
                match procedure.body.kind {
                    Expr::List(ref elements) => {
                        assert_eq!(elements.len(), 3);
                        assert_eq!(elements[0].kind, Expr::Operator(Operator::Mul));
                    }
                    ref other => panic!("Expected a list body, got: {:?}", other),
                }
            }
            other => panic!("Expected a procedure, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_defun_multiple_params() {
        let node = parse_str("(defun avg (a b) (/ (+ a b) 2))").expect("should parse");
        match node.kind {
            Expr::Procedure(procedure) => {
                assert_eq!(procedure.params, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("Expected a procedure, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_defun_errors() {
        let malformed = ParseError::MalformedDefun {
            reason: String::new(),
            span: Span::default(),
        };
        assert_parse_error("(defun 3 (x) x)", malformed.clone()); // name not a symbol
        assert_parse_error("(defun f x x)", malformed.clone()); // no parameter list
        assert_parse_error("(defun f (1) x)", malformed.clone()); // non-symbol parameter
        assert_parse_error("(defun f (x) x y)", malformed.clone()); // extra body form
        assert_parse_error("(defun)", malformed); // nothing after the keyword
        assert_parse_error(
            "(defun f (x)",
            ParseError::UnexpectedEof(String::new()), // body missing, input ends
        );
    }

    #[test]
    fn test_parse_errors_unbalanced() {
        assert_parse_error("(1 2", ParseError::UnexpectedEof(String::new()));
        assert_parse_error("(", ParseError::UnexpectedEof(String::new()));
        assert_parse_error("", ParseError::UnexpectedEof(String::new()));
        assert_parse_error(
            ")",
            ParseError::UnexpectedToken {
                found: rparen(),
                expected: String::new(),
            },
        );
        // Extra ')' after a complete expression is trailing input, not a
        // silently truncated tree
        assert_parse_error(
            "(1))",
            ParseError::UnexpectedToken {
                found: rparen(),
                expected: String::new(),
            },
        );
    }

    #[test]
    fn test_parse_empty_list() {
        // "()" parses to an empty list; rejecting it is the evaluator's job
        let node = parse_str("()").unwrap();
        assert_eq!(node.kind, Expr::List(vec![]));
    }

    #[test]
    fn test_whitespace_insensitive() {
        let spaced = parse_str("  ( *   a b )  ").unwrap();
        assert!(matches!(spaced.kind, Expr::List(ref e) if e.len() == 3));
    }
}
