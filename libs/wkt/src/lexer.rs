//! WKT lexer - tokenizes input strings
//!
//! Converts WKT text into a stream of tokens. Quote state is tracked while
//! reading string literals, so brackets and keywords inside quoted names
//! never produce tokens of their own.

use crate::error::{Error, Result};
use crate::symbols::Symbols;
use crate::token::{Token, TokenType};

/// The WKT lexer
pub struct Lexer {
    symbols: Symbols,
    position: usize,
    line: usize,
    column: usize,
    chars: Vec<char>,
    current_char: Option<char>,
}

impl Lexer {
    /// Create a new lexer using the default symbols
    pub fn new(input: &str) -> Self {
        Self::with_symbols(input, Symbols::DEFAULT)
    }

    pub fn with_symbols(input: &str, symbols: Symbols) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            symbols,
            position: 0,
            line: 1,
            column: 1,
            chars,
            current_char,
        }
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    /// Text between two character offsets, clamped to the input.
    pub fn fragment(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Advance to the next character
    fn advance(&mut self) {
        if let Some(c) = self.current_char {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += 1;
        self.current_char = self.chars.get(self.position).copied();
    }

    /// Peek at the next character without advancing
    fn peek(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.current_char {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_keyword(&mut self) -> String {
        let start_pos = self.position;

        while let Some(c) = self.current_char {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        self.chars[start_pos..self.position].iter().collect()
    }

    /// Read a quoted string. A doubled quote stands for one literal quote.
    fn read_string(&mut self) -> Result<String> {
        let start_pos = self.position;
        let quote = self.symbols.quote;
        self.advance(); // Skip opening quote

        let mut value = String::new();
        while let Some(c) = self.current_char {
            if c == quote {
                if self.peek() == Some(quote) {
                    value.push(quote);
                    self.advance();
                    self.advance();
                    continue;
                }
                self.advance(); // Skip closing quote
                return Ok(value);
            }
            value.push(c);
            self.advance();
        }

        Err(Error::Lexical {
            message: format!(
                "Unterminated string literal {}",
                self.fragment(start_pos, start_pos + 24)
            ),
            position: start_pos,
        })
    }

    fn read_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(c) = self.current_char {
            if c.is_ascii_digit() {
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    /// Read a number: optional sign, digits, optional fraction, optional exponent.
    fn read_number(&mut self) -> Result<String> {
        let start_pos = self.position;

        if matches!(self.current_char, Some('+') | Some('-')) {
            self.advance();
        }
        let mut digits = self.read_digits();
        if self.current_char == Some('.') {
            self.advance();
            digits += self.read_digits();
        }
        if digits == 0 {
            return Err(self.invalid_number(start_pos));
        }

        if matches!(self.current_char, Some('e') | Some('E')) {
            self.advance();
            if matches!(self.current_char, Some('+') | Some('-')) {
                self.advance();
            }
            if self.read_digits() == 0 {
                return Err(self.invalid_number(start_pos));
            }
        }

        // A number must end at a delimiter, not run into a word
        if let Some(c) = self.current_char {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                return Err(self.invalid_number(start_pos));
            }
        }

        Ok(self.chars[start_pos..self.position].iter().collect())
    }

    fn invalid_number(&mut self, start_pos: usize) -> Error {
        while let Some(c) = self.current_char {
            if c.is_alphanumeric() || matches!(c, '.' | '_' | '+' | '-') {
                self.advance();
            } else {
                break;
            }
        }
        Error::Lexical {
            message: format!(
                "Invalid number literal '{}'",
                self.fragment(start_pos, self.position)
            ),
            position: start_pos,
        }
    }

    fn starts_number(&self, c: char) -> bool {
        match c {
            '0'..='9' => true,
            '.' => self.peek().is_some_and(|n| n.is_ascii_digit()),
            '+' | '-' => self
                .peek()
                .is_some_and(|n| n.is_ascii_digit() || n == '.'),
            _ => false,
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let position = self.position;
        let line = self.line;
        let column = self.column;

        let Some(c) = self.current_char else {
            return Token::eof(position, line, column);
        };

        if self.symbols.is_open(c) {
            self.advance();
            return Token::new(TokenType::OpenBracket, c.to_string(), position, line, column);
        }
        if self.symbols.is_close(c) {
            self.advance();
            return Token::new(TokenType::CloseBracket, c.to_string(), position, line, column);
        }
        if c == self.symbols.separator {
            self.advance();
            return Token::new(TokenType::Comma, c.to_string(), position, line, column);
        }
        if c == self.symbols.quote {
            return match self.read_string() {
                Ok(value) => Token::new(TokenType::StringLiteral, value, position, line, column),
                Err(e) => Token::error(message_of(e), position, line, column),
            };
        }
        if self.starts_number(c) {
            return match self.read_number() {
                Ok(value) => Token::new(TokenType::NumberLiteral, value, position, line, column),
                Err(e) => Token::error(message_of(e), position, line, column),
            };
        }
        if c.is_alphabetic() || c == '_' {
            let value = self.read_keyword();
            return Token::new(TokenType::Keyword, value, position, line, column);
        }

        self.advance();
        Token::error(
            format!("Unexpected character '{}'", c),
            position,
            line,
            column,
        )
    }
}

fn message_of(error: Error) -> String {
    match error {
        Error::Lexical { message, .. } => message,
        other => other.to_string(),
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields tokens up to and including the first `Eof` or `Error`.
    fn next(&mut self) -> Option<Token> {
        if self.position > self.chars.len() {
            return None;
        }
        let token = self.next_token();
        if matches!(token.token_type, TokenType::Eof | TokenType::Error) {
            // Park past the end so iteration stops after this token
            self.position = self.chars.len() + 1;
            self.current_char = None;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(input: &str) -> Vec<TokenType> {
        Lexer::new(input).map(|t| t.token_type).collect()
    }

    #[test]
    fn test_element_tokens() {
        assert_eq!(
            types(r#"UNIT["metre", 1]"#),
            vec![
                TokenType::Keyword,
                TokenType::OpenBracket,
                TokenType::StringLiteral,
                TokenType::Comma,
                TokenType::NumberLiteral,
                TokenType::CloseBracket,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_brackets_inside_quotes_are_text() {
        let tokens: Vec<Token> = Lexer::new(r#""a [b] (c), d""#).collect();
        assert_eq!(tokens[0].token_type, TokenType::StringLiteral);
        assert_eq!(tokens[0].value, "a [b] (c), d");
        assert_eq!(tokens[1].token_type, TokenType::Eof);
    }

    #[test]
    fn test_iteration_stops_after_error() {
        let tokens: Vec<Token> = Lexer::new("A[ # ]").collect();
        assert_eq!(tokens.last().map(|t| t.token_type), Some(TokenType::Error));
        assert_eq!(tokens.len(), 3);
    }
}
