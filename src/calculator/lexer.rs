//! Tokenizer for calculator expressions.

use super::error::CalcError;
use super::number::Number;
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    Number(Number),
    Ident(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    LeftParen,
    RightParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Ident(name) => f.write_str(name),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::DoubleStar => f.write_str("**"),
            Self::Slash => f.write_str("/"),
            Self::DoubleSlash => f.write_str("//"),
            Self::Percent => f.write_str("%"),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
        }
    }
}

/// A token and the character offset it starts at.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, CalcError> {
    Lexer::new(input).collect()
}

struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.position + ahead).copied()
    }

    /// Consume one character if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn identifier(&mut self) -> Token {
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.position += 1;
        }
        Token::Ident(self.chars[start..self.position].iter().collect())
    }

    /// Digits with optional single `_` separators between them.
    fn digits(&mut self, radix: u32, out: &mut String) -> Result<(), CalcError> {
        let mut last_was_digit = false;
        while let Some(c) = self.peek() {
            if c.is_digit(radix) {
                out.push(c);
                last_was_digit = true;
            } else if c == '_' && last_was_digit && self.peek_at(1).is_some_and(|n| n.is_digit(radix)) {
                last_was_digit = false;
            } else if c == '_' {
                return Err(self.syntax_error("invalid digit separator"));
            } else {
                break;
            }
            self.position += 1;
        }
        Ok(())
    }

    fn number(&mut self) -> Result<Token, CalcError> {
        if self.peek() == Some('0')
            && let Some(radix) = match self.peek_at(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            }
        {
            return self.radix_integer(radix);
        }

        let mut text = String::new();
        let mut is_float = false;

        self.digits(10, &mut text)?;
        if self.eat('.') {
            is_float = true;
            text.push('.');
            self.digits(10, &mut text)?;
        }
        if text == "." {
            return Err(self.syntax_error("invalid syntax"));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.position;
            self.position += 1;
            let mut exponent = String::from("e");
            if let Some(sign @ ('+' | '-')) = self.peek() {
                exponent.push(sign);
                self.position += 1;
            }
            let before = exponent.len();
            self.digits(10, &mut exponent)?;
            if exponent.len() == before {
                self.position = mark;
                return Err(self.syntax_error("invalid decimal literal"));
            }
            is_float = true;
            text.push_str(&exponent);
        }
        if self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') {
            return Err(self.syntax_error("invalid decimal literal"));
        }

        if is_float {
            return text
                .parse::<f64>()
                .map(|f| Token::Number(Number::Float(f)))
                .map_err(|_| self.syntax_error("invalid decimal literal"));
        }

        if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
            return Err(self.syntax_error(
                "leading zeros in decimal integer literals are not permitted",
            ));
        }
        match text.parse::<i64>() {
            Ok(i) => Ok(Token::Number(Number::Int(i))),
            // Too large for an integer: keep the magnitude as a float.
            Err(_) => text
                .parse::<f64>()
                .map(|f| Token::Number(Number::Float(f)))
                .map_err(|_| self.syntax_error("invalid decimal literal")),
        }
    }

    fn radix_integer(&mut self, radix: u32) -> Result<Token, CalcError> {
        self.position += 2;
        // Python-style `0x_ff` allows a separator right after the prefix.
        if self.peek() == Some('_') {
            self.position += 1;
        }
        let mut text = String::new();
        self.digits(radix, &mut text)?;
        if text.is_empty() || self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            return Err(self.syntax_error("invalid integer literal"));
        }
        i64::from_str_radix(&text, radix)
            .map(|i| Token::Number(Number::Int(i)))
            .map_err(|_| CalcError::invalid("integer literal too large"))
    }

    fn syntax_error(&self, what: &str) -> CalcError {
        CalcError::invalid(format!("{} (at position {})", what, self.position + 1))
    }
}

impl Iterator for Lexer {
    type Item = Result<Spanned, CalcError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let offset = self.position;
        let c = self.peek()?;

        let token = match c {
            '0'..='9' => self.number(),
            '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.identifier()),
            _ => {
                self.position += 1;
                match c {
                    '+' => Ok(Token::Plus),
                    '-' => Ok(Token::Minus),
                    '*' if self.eat('*') => Ok(Token::DoubleStar),
                    '*' => Ok(Token::Star),
                    '/' if self.eat('/') => Ok(Token::DoubleSlash),
                    '/' => Ok(Token::Slash),
                    '%' => Ok(Token::Percent),
                    '(' => Ok(Token::LeftParen),
                    ')' => Ok(Token::RightParen),
                    ',' => Ok(Token::Comma),
                    other => Err(CalcError::invalid(format!(
                        "unexpected character '{}' (at position {})",
                        other,
                        offset + 1
                    ))),
                }
            }
        };

        if token.is_err() {
            // Stop after the first error.
            self.position = self.chars.len();
        }
        Some(token.map(|token| Spanned { token, offset }))
    }
}
