//! Lexer for the S-expression WHERE filter language (spec §4.2).
//!
//! Grammar: `(`, `)`, `.ident` column refs, `'...'` strings (no escapes),
//! `#123`/`-123`/`123` numbers, bare identifiers (`TRUE`/`FALSE`/operator
//! names), nothing else.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Ident(String),
    Column(String),
    String(String),
    Number(String),
    Eof,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn make_span(&self) -> Span {
        Span::new(self.start, self.pos)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn scan_string(&mut self) -> Token {
        self.advance(); // opening '
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('\'') => break,
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => return self.make_token(TokenKind::Error("unterminated string".into())),
            }
        }
        self.advance(); // closing '
        self.make_token(TokenKind::String(value))
    }

    fn scan_number(&mut self) -> Token {
        if self.peek() == Some('-') || self.peek() == Some('#') {
            self.advance();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Number(text.to_string()))
    }

    fn scan_column(&mut self) -> Token {
        self.advance(); // '.'
        let name_start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        let name = self.input[name_start..self.pos].to_string();
        self.make_token(TokenKind::Column(name))
    }

    fn scan_ident(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '=' || c == '<' || c == '>' || c == '!' || c == '|')
        {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Ident(text.to_string()))
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.start = self.pos;

        let c = match self.peek() {
            Some(c) => c,
            None => return self.make_token(TokenKind::Eof),
        };

        match c {
            '(' => {
                self.advance();
                self.make_token(TokenKind::LeftParen)
            }
            ')' => {
                self.advance();
                self.make_token(TokenKind::RightParen)
            }
            '\'' => self.scan_string(),
            '.' => self.scan_column(),
            '-' | '#' => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' || c == '=' || c == '<' || c == '>' || c == '!' || c == '|' => {
                self.scan_ident()
            }
            other => {
                self.advance();
                self.make_token(TokenKind::Error(format!("unexpected character: {other}")))
            }
        }
    }

    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let eof = token.is_eof();
            tokens.push(token);
            if eof {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn parens_and_ident() {
        assert_eq!(
            kinds("(= .a 1)"),
            vec![
                TokenKind::LeftParen,
                TokenKind::Ident("=".into()),
                TokenKind::Column("a".into()),
                TokenKind::Number("1".into()),
                TokenKind::RightParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn hash_and_negative_numbers() {
        assert_eq!(
            kinds("#18 -5"),
            vec![
                TokenKind::Number("#18".into()),
                TokenKind::Number("-5".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_literal_no_escapes() {
        assert_eq!(
            kinds("'hoge%hoge'"),
            vec![TokenKind::String("hoge%hoge".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn booleans_are_bare_idents() {
        assert_eq!(
            kinds("TRUE false"),
            vec![
                TokenKind::Ident("TRUE".into()),
                TokenKind::Ident("false".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operator_symbols_lex_as_idents() {
        assert_eq!(
            kinds("<> >= || !="),
            vec![
                TokenKind::Ident("<>".into()),
                TokenKind::Ident(">=".into()),
                TokenKind::Ident("||".into()),
                TokenKind::Ident("!=".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_an_error_token() {
        assert!(matches!(
            kinds("'oops").into_iter().next(),
            Some(TokenKind::Error(_))
        ));
    }
}
