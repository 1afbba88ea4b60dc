use std::str::Chars;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Ident,
    Number,

    // Operators
    Plus,
    Minus,
    Star,

    // Relations
    Le,
    Ge,
    Eq,

    // Special
    Eof,
    Error,
}

impl TokenKind {
    pub fn is_relation(self) -> bool {
        matches!(self, TokenKind::Le | TokenKind::Ge | TokenKind::Eq)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Chars<'a>,
    pos: usize,
    current: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            source,
            chars,
            pos: 0,
            current,
        }
    }

    pub fn tokenize(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current?;
        self.current = self.chars.next();
        self.pos += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.current
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        // Decimal part, only when a digit follows the dot
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        Token::new(
            TokenKind::Number,
            Span::new(start, self.pos),
            &self.source[start..self.pos],
        )
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        // first char is alphabetic; digits after it belong to the identifier (x12)
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
        Token::new(
            TokenKind::Ident,
            Span::new(start, self.pos),
            &self.source[start..self.pos],
        )
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.advance();
        Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
    }

    fn relation(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        self.advance(); // < or >
        if self.peek() == Some('=') {
            self.advance();
            Token::new(kind, Span::new(start, self.pos), &self.source[start..self.pos])
        } else {
            // strict inequalities are not linear-program relations
            Token::new(
                TokenKind::Error,
                Span::new(start, self.pos),
                &self.source[start..self.pos],
            )
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        };

        match c {
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '=' => self.single(TokenKind::Eq),
            '<' => self.relation(TokenKind::Le),
            '>' => self.relation(TokenKind::Ge),
            '.' if self.peek_next().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => self.read_ident(),
            _ => self.single(TokenKind::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_terms() {
        let tokens = Lexer::tokenize("3x1 + 2.5x2 - x10");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["3", "x1", "+", "2.5", "x2", "-", "x10", ""]);
    }

    #[test]
    fn test_numbers() {
        let tokens = Lexer::tokenize("100 8.5 .25 7.");
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        // a trailing dot is not part of the number
        assert_eq!(texts, vec!["100", "8.5", ".25", "7", ".", ""]);
        assert_eq!(tokens[4].kind, TokenKind::Error);
    }

    #[test]
    fn test_relations() {
        assert_eq!(
            kinds("<= >= ="),
            vec![TokenKind::Le, TokenKind::Ge, TokenKind::Eq, TokenKind::Eof]
        );
        assert_eq!(kinds("< >"), vec![TokenKind::Error, TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn test_constraint_spans() {
        let tokens = Lexer::tokenize("x1 + x2 <= 5");
        let le = tokens.iter().find(|t| t.kind == TokenKind::Le).unwrap();
        assert_eq!(le.span, Span::new(8, 10));
    }

    #[test]
    fn test_unknown_characters() {
        assert_eq!(
            kinds("2 * x1 # x2"),
            vec![
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Ident,
                TokenKind::Error,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }
}
