//! Recursive-descent builder for the generic [`Element`] tree.
//!
//! Grammar:
//!
//! ```text
//! element : KEYWORD open child (',' child)* close
//! child   : element | STRING | NUMBER | KEYWORD
//! ```
//!
//! Either bracket pair may open an element, but it must be closed by its own
//! counterpart.

use crate::element::{Child, Element};
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::symbols::Symbols;
use crate::token::{Token, TokenType};

const MAX_RECURSION_DEPTH: usize = 200;

/// Per-call parse state: the token cursor over one input string.
pub struct TreeBuilder {
    lexer: Lexer,
    current_token: Token,
    recursion_depth: usize,
}

impl TreeBuilder {
    pub fn new(input: &str, symbols: Symbols) -> Self {
        let mut lexer = Lexer::with_symbols(input, symbols);
        let current_token = lexer.next_token();
        Self {
            lexer,
            current_token,
            recursion_depth: 0,
        }
    }

    /// Parse `input` into a single root element.
    pub fn parse(input: &str, symbols: Symbols) -> Result<Element> {
        TreeBuilder::new(input, symbols).parse_root()
    }

    /// Parse the root element and require the input to end after it.
    pub fn parse_root(mut self) -> Result<Element> {
        self.check_lexical()?;
        if self.current_token.token_type != TokenType::Keyword {
            return Err(self.unexpected("keyword"));
        }
        let keyword = self.current_token.clone();
        self.advance();
        let root = self.parse_element(keyword)?;

        self.check_lexical()?;
        match self.current_token.token_type {
            TokenType::Eof => Ok(root),
            TokenType::CloseBracket => Err(Error::Lexical {
                message: format!(
                    "Unbalanced brackets: unexpected '{}' after {}",
                    self.current_token.value, root.keyword
                ),
                position: self.current_token.position,
            }),
            _ => Err(self.unexpected("end of input")),
        }
    }

    fn advance(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    fn check_lexical(&self) -> Result<()> {
        if self.current_token.token_type == TokenType::Error {
            return Err(Error::Lexical {
                message: self.current_token.value.clone(),
                position: self.current_token.position,
            });
        }
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> Error {
        let found = match self.current_token.token_type {
            TokenType::Eof => "end of input".to_string(),
            TokenType::StringLiteral => format!("\"{}\"", self.current_token.value),
            _ => self.current_token.value.clone(),
        };
        Error::unexpected(expected, found, self.current_token.position)
    }

    /// Expect a specific token type and advance
    fn expect(&mut self, token_type: TokenType, expected: &str) -> Result<Token> {
        self.check_lexical()?;
        if self.current_token.token_type != token_type {
            return Err(self.unexpected(expected));
        }
        let token = self.current_token.clone();
        self.advance();
        Ok(token)
    }

    fn check_recursion_depth(&mut self) -> Result<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            return Err(Error::Lexical {
                message: format!(
                    "Elements too deeply nested (max depth: {})",
                    MAX_RECURSION_DEPTH
                ),
                position: self.current_token.position,
            });
        }
        Ok(())
    }

    /// Parse the bracketed body of the element named by `keyword`.
    fn parse_element(&mut self, keyword: Token) -> Result<Element> {
        self.check_recursion_depth()?;

        let open = self.expect(TokenType::OpenBracket, "opening bracket")?;
        let close = open
            .value
            .chars()
            .next()
            .and_then(|c| self.lexer.symbols().closing_for(c))
            .unwrap_or(self.lexer.symbols().close);

        let mut element = Element::new(keyword.value, keyword.position);
        if self.current_token.token_type != TokenType::CloseBracket {
            loop {
                let child = self.parse_child()?;
                element.children.push(child);

                self.check_lexical()?;
                match self.current_token.token_type {
                    TokenType::Comma => self.advance(),
                    TokenType::CloseBracket => break,
                    TokenType::Eof => {
                        return Err(Error::Lexical {
                            message: format!(
                                "Unbalanced brackets: {} opened at offset {} is never closed",
                                element.keyword, element.position
                            ),
                            position: self.current_token.position,
                        })
                    }
                    _ => return Err(self.unexpected("',' or closing bracket")),
                }
            }
        }

        let found = self.current_token.value.chars().next();
        if found != Some(close) {
            return Err(Error::Lexical {
                message: format!(
                    "Mismatched brackets: {} opened with '{}' but closed with '{}'",
                    element.keyword,
                    open.value,
                    self.current_token.value
                ),
                position: self.current_token.position,
            });
        }
        element.end = self.current_token.position;
        self.advance();

        self.recursion_depth -= 1;
        Ok(element)
    }

    fn parse_child(&mut self) -> Result<Child> {
        self.check_lexical()?;
        let token = self.current_token.clone();
        match token.token_type {
            TokenType::Keyword => {
                self.advance();
                if self.current_token.token_type == TokenType::OpenBracket {
                    Ok(Child::Element(self.parse_element(token)?))
                } else {
                    Ok(Child::Enumeration {
                        value: token.value,
                        position: token.position,
                    })
                }
            }
            TokenType::StringLiteral => {
                self.advance();
                Ok(Child::Text {
                    value: token.value,
                    position: token.position,
                })
            }
            TokenType::NumberLiteral => {
                self.advance();
                let value = token
                    .value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| Error::Lexical {
                        message: format!("Invalid number literal '{}'", token.value),
                        position: token.position,
                    })?;
                Ok(Child::Number {
                    value,
                    raw: token.value,
                    position: token.position,
                })
            }
            TokenType::Eof => Err(Error::Lexical {
                message: "Unbalanced brackets: input ends inside an element".to_string(),
                position: token.position,
            }),
            _ => Err(self.unexpected("element, string or number")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Element> {
        TreeBuilder::parse(input, Symbols::DEFAULT)
    }

    #[test]
    fn test_nested_elements() {
        let root = parse(r#"PRIMEM["Greenwich", 0.0, AUTHORITY["EPSG", "8901"]]"#).unwrap();
        assert_eq!(root.keyword, "PRIMEM");
        assert_eq!(root.children.len(), 3);
        match &root.children[2] {
            Child::Element(e) => assert!(e.is("AUTHORITY")),
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_enumeration_child() {
        let root = parse(r#"AXIS["Lat", NORTH]"#).unwrap();
        assert!(matches!(
            &root.children[1],
            Child::Enumeration { value, .. } if value == "NORTH"
        ));
    }

    #[test]
    fn test_alternate_brackets() {
        let root = parse(r#"UNIT("metre", 1)"#).unwrap();
        assert_eq!(root.children.len(), 2);
        assert!(matches!(parse(r#"UNIT("metre", 1]"#), Err(Error::Lexical { .. })));
    }

    #[test]
    fn test_number_keeps_raw_text() {
        let root = parse("TOWGS84[4.84813681109536e-06, -0.0]").unwrap();
        match &root.children[0] {
            Child::Number { value, raw, .. } => {
                assert_eq!(raw, "4.84813681109536e-06");
                assert_eq!(*value, 4.84813681109536e-06);
            }
            other => panic!("expected number, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_number_rejected() {
        let err = parse("TOWGS84[1e999, 0, 0]").unwrap_err();
        assert!(matches!(err, Error::Lexical { ref message, position: 8 } if message.contains("1e999")));
        assert!(parse("TOWGS84[-1e400]").is_err());
        assert!(parse("TOWGS84[1e308]").is_ok());
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(matches!(parse(r#"GEOGCS["x""#), Err(Error::Lexical { .. })));
        assert!(matches!(parse(r#"GEOGCS["x"]]"#), Err(Error::Lexical { .. })));
        assert!(matches!(parse(r#"GEOGCS["x" "y"]"#), Err(Error::UnexpectedToken { .. })));
    }

    #[test]
    fn test_trailing_input_rejected() {
        let err = parse(r#"UNIT["m", 1] UNIT["m", 1]"#).unwrap_err();
        assert_eq!(err.position(), Some(13));
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}1{}", "A[".repeat(250), "]".repeat(250));
        assert!(parse(&deep).is_err());
        let fine = format!("{}1{}", "A[".repeat(50), "]".repeat(50));
        assert!(parse(&fine).is_ok());
    }
}
