//! Token types for the WKT lexer

/// Token types for the WKT lexer
#[derive(Debug, PartialEq, Clone, Copy, Eq)]
pub enum TokenType {
    // Literals
    StringLiteral,
    NumberLiteral,

    // Element names and bare enumeration values (e.g. EAST)
    Keyword,

    // Delimiters
    OpenBracket,  // [ or (
    CloseBracket, // ] or )
    Comma,        // ,

    // End of input
    Eof,

    // Error
    Error, // For lexical errors
}

/// A token in the WKT text
///
/// `position` is a character offset; `line` and `column` start at 1.
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub position: usize,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        value: String,
        position: usize,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            token_type,
            value,
            position,
            line,
            column,
        }
    }

    pub fn eof(position: usize, line: usize, column: usize) -> Self {
        Self {
            token_type: TokenType::Eof,
            value: String::new(),
            position,
            line,
            column,
        }
    }

    pub fn error(message: String, position: usize, line: usize, column: usize) -> Self {
        Self {
            token_type: TokenType::Error,
            value: message,
            position,
            line,
            column,
        }
    }
}
