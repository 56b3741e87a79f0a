//! Punctuation used when reading and writing WKT.

use serde::{Deserialize, Serialize};

/// Bracket, quote and separator characters of a WKT dialect.
///
/// Either bracket pair is accepted on input; `open`/`close` is the pair
/// written on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbols {
    pub open: char,
    pub close: char,
    pub open_alt: char,
    pub close_alt: char,
    pub quote: char,
    pub separator: char,
    pub space: char,
}

impl Symbols {
    pub const DEFAULT: Symbols = Symbols {
        open: '[',
        close: ']',
        open_alt: '(',
        close_alt: ')',
        quote: '"',
        separator: ',',
        space: ' ',
    };

    pub const PARENTHESES: Symbols = Symbols {
        open: '(',
        close: ')',
        open_alt: '[',
        close_alt: ']',
        quote: '"',
        separator: ',',
        space: ' ',
    };

    pub fn is_open(&self, c: char) -> bool {
        c == self.open || c == self.open_alt
    }

    pub fn is_close(&self, c: char) -> bool {
        c == self.close || c == self.close_alt
    }

    /// Closing character paired with `open`.
    pub fn closing_for(&self, open: char) -> Option<char> {
        if open == self.open {
            Some(self.close)
        } else if open == self.open_alt {
            Some(self.close_alt)
        } else {
            None
        }
    }

    /// Whether `text` declares at least one `AXIS[...]` element.
    pub fn contains_axis(&self, text: &str) -> bool {
        self.contains_keyword(text, "AXIS")
    }

    /// Case-insensitive search for `keyword` used as an element, i.e. as a whole
    /// word followed by an opening bracket. Occurrences inside quoted text are
    /// ignored.
    pub fn contains_keyword(&self, text: &str, keyword: &str) -> bool {
        let keyword: Vec<char> = keyword.chars().collect();
        if keyword.is_empty() {
            return false;
        }
        let chars: Vec<char> = text.chars().collect();
        let mut in_quote = false;
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == self.quote {
                in_quote = !in_quote;
                i += 1;
                continue;
            }
            if in_quote {
                i += 1;
                continue;
            }
            let starts_word = i == 0 || !is_word_char(chars[i - 1]);
            if starts_word && self.matches_at(&chars, i, &keyword) {
                let mut j = i + keyword.len();
                if j >= chars.len() || !is_word_char(chars[j]) {
                    while j < chars.len() && chars[j].is_whitespace() {
                        j += 1;
                    }
                    if j < chars.len() && self.is_open(chars[j]) {
                        return true;
                    }
                }
            }
            i += 1;
        }
        false
    }

    fn matches_at(&self, chars: &[char], start: usize, keyword: &[char]) -> bool {
        chars.len() - start >= keyword.len()
            && chars[start..start + keyword.len()]
                .iter()
                .zip(keyword)
                .all(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Symbols::DEFAULT
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Serialisable selector for the built-in [`Symbols`] sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolStyle {
    #[default]
    Brackets,
    Parentheses,
}

impl SymbolStyle {
    pub fn symbols(self) -> Symbols {
        match self {
            SymbolStyle::Brackets => Symbols::DEFAULT,
            SymbolStyle::Parentheses => Symbols::PARENTHESES,
        }
    }
}
