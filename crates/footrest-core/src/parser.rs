//! Recursive-descent parser for the S-expression WHERE filter language.

use crate::lexer::{Lexer, Span, Token, TokenKind};

/// One node of the parsed S-expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Sexpr {
    /// `(head operand...)`.
    List(Vec<Sexpr>),
    /// Bare identifier: an operator name, `TRUE`/`FALSE`, or a number-like atom.
    Ident(String),
    /// `.col` column reference, dot already stripped.
    Column(String),
    /// `'...'` string literal.
    Str(String),
    /// Numeric atom, kept as raw text so `conv` can apply its own rules.
    Number(String),
}

/// A parse error, in the teacher's `ParseError{message, span, expected, found}` shape.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at position {}..{}", span.start, span.end)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub expected: Option<String>,
    pub found: Option<TokenKind>,
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        let expected = expected.into();
        Self {
            message: format!("unexpected token: expected {expected}, found {found:?}"),
            span,
            expected: Some(expected),
            found: Some(found),
        }
    }

    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected = expected.into();
        Self {
            message: format!("unexpected end of input: expected {expected}"),
            span,
            expected: Some(expected),
            found: Some(TokenKind::Eof),
        }
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            tokens: Lexer::new(input).tokenize(),
            pos: 0,
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Parses the whole input as a single top-level expression (the root
    /// of a WHERE S-expr is always one list).
    pub fn parse(&mut self) -> Result<Sexpr, ParseError> {
        if matches!(self.peek().kind, TokenKind::Eof) {
            return Err(ParseError::new("no children", self.peek().span));
        }
        let expr = self.parse_expr()?;
        Ok(expr)
    }

    fn parse_expr(&mut self) -> Result<Sexpr, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::LeftParen => self.parse_list(),
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Sexpr::Ident(name))
            }
            TokenKind::Column(name) => {
                self.advance();
                Ok(Sexpr::Column(name))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Sexpr::Str(s))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok(Sexpr::Number(n))
            }
            TokenKind::Error(message) => {
                let span = self.peek().span;
                Err(ParseError::new(message, span))
            }
            TokenKind::RightParen => {
                let span = self.peek().span;
                Err(ParseError::unexpected("expression", TokenKind::RightParen, span))
            }
            TokenKind::Eof => Err(ParseError::unexpected_eof("expression", self.peek().span)),
        }
    }

    fn parse_list(&mut self) -> Result<Sexpr, ParseError> {
        self.advance(); // consume '('
        let mut children = Vec::new();
        loop {
            match self.peek().kind {
                TokenKind::RightParen => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => {
                    return Err(ParseError::unexpected_eof(")", self.peek().span));
                }
                _ => children.push(self.parse_expr()?),
            }
        }
        if children.is_empty() {
            return Err(ParseError::new("invalid expr", self.peek().span));
        }
        Ok(Sexpr::List(children))
    }
}

/// Parses a WHERE S-expr string into its root list node.
pub fn parse(input: &str) -> Result<Sexpr, ParseError> {
    Parser::new(input).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_operator_call() {
        let ast = parse("(= .a 1)").unwrap();
        assert_eq!(
            ast,
            Sexpr::List(vec![
                Sexpr::Ident("=".into()),
                Sexpr::Column("a".into()),
                Sexpr::Number("1".into()),
            ])
        );
    }

    #[test]
    fn parses_nested_lists() {
        let ast = parse("(and (= .d #1) (like .e 'hoge%hoge'))").unwrap();
        let Sexpr::List(children) = &ast else {
            panic!("expected list")
        };
        assert_eq!(children.len(), 3);
        assert!(matches!(&children[0], Sexpr::Ident(op) if op == "and"));
        assert!(matches!(&children[1], Sexpr::List(_)));
        assert!(matches!(&children[2], Sexpr::List(_)));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(parse("").is_err());
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(parse("()").is_err());
    }

    #[test]
    fn unbalanced_parens_is_an_error() {
        assert!(parse("(and (= .a 1)").is_err());
    }
}
