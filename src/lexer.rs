use logos::Logos;
use std::fmt;

use crate::Span;

/// Raw lexical units: parentheses are isolated into their own tokens and
/// every other maximal non-whitespace run becomes a single [`TokenKind::Atom`].
/// Classification of atoms (operator, number, symbol) happens in the parser.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")] // Skip whitespace
pub enum TokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r"[^()\s]+", |lex| lex.slice().to_string())]
    Atom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

// Implement Display for easy printing
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::Atom(s) => write!(f, "{}", s),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Tokenizes an input string.
///
/// The three token rules together cover every non-whitespace character, so
/// lexing is total over arbitrary input and no error case exists.
pub fn tokenize(input: &str) -> Vec<Token> {
    TokenKind::lexer(input)
        .spanned()
        .filter_map(|(kind, range)| {
            kind.ok().map(|kind| Token {
                kind,
                span: Span::new(range.start, range.end),
            })
        })
        .collect()
}
