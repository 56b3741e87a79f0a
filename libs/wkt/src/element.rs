//! Generic WKT parse tree.
//!
//! An [`Element`] is the keyword plus its bracketed children as read from the
//! text. Semantic builders take an element apart with the `pull_*` helpers and
//! finish with [`Element::close`], which rejects anything left unconsumed.

use crate::error::{Error, Result};

/// One child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Element(Element),
    /// A number literal; `raw` keeps the text as written.
    Number {
        value: f64,
        raw: String,
        position: usize,
    },
    Text {
        value: String,
        position: usize,
    },
    /// A bare word without brackets, e.g. `EAST`.
    Enumeration {
        value: String,
        position: usize,
    },
}

impl Child {
    pub fn position(&self) -> usize {
        match self {
            Child::Element(element) => element.position,
            Child::Number { position, .. }
            | Child::Text { position, .. }
            | Child::Enumeration { position, .. } => *position,
        }
    }

    /// Short rendering used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Child::Element(element) => format!("{}[...]", element.keyword),
            Child::Number { raw, .. } => raw.clone(),
            Child::Text { value, .. } => format!("\"{}\"", value),
            Child::Enumeration { value, .. } => value.clone(),
        }
    }
}

/// A keyword and its ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub keyword: String,
    pub children: Vec<Child>,
    /// Offset of the keyword.
    pub position: usize,
    /// Offset of the closing bracket.
    pub end: usize,
}

impl Element {
    pub fn new(keyword: impl Into<String>, position: usize) -> Self {
        Self {
            keyword: keyword.into(),
            children: Vec::new(),
            position,
            end: position,
        }
    }

    pub fn is(&self, keyword: &str) -> bool {
        self.keyword.eq_ignore_ascii_case(keyword)
    }

    pub fn peek(&self) -> Option<&Child> {
        self.children.first()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn take_first(&mut self, pred: impl Fn(&Child) -> bool) -> Option<Child> {
        let index = self.children.iter().position(pred)?;
        Some(self.children.remove(index))
    }

    fn missing(&self, what: &str) -> Error {
        Error::unexpected(
            format!("{} in {}", what, self.keyword),
            self.peek()
                .map(Child::describe)
                .unwrap_or_else(|| "]".to_string()),
            self.peek().map(Child::position).unwrap_or(self.end),
        )
    }

    pub fn pull_optional_string(&mut self) -> Option<String> {
        match self.take_first(|c| matches!(c, Child::Text { .. })) {
            Some(Child::Text { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Remove the first quoted string; `what` names it in errors.
    pub fn pull_string(&mut self, what: &str) -> Result<String> {
        self.pull_optional_string()
            .ok_or_else(|| self.missing(&format!("quoted {}", what)))
    }

    /// Remove the first number, returning its value and source text.
    pub fn pull_optional_number(&mut self) -> Option<(f64, String)> {
        match self.take_first(|c| matches!(c, Child::Number { .. })) {
            Some(Child::Number { value, raw, .. }) => Some((value, raw)),
            _ => None,
        }
    }

    pub fn pull_double(&mut self, what: &str) -> Result<f64> {
        self.pull_optional_number()
            .map(|(value, _)| value)
            .ok_or_else(|| self.missing(&format!("number {}", what)))
    }

    pub fn pull_integer(&mut self, what: &str) -> Result<i64> {
        let position = self
            .children
            .iter()
            .find(|c| matches!(c, Child::Number { .. }))
            .map(Child::position)
            .unwrap_or(self.end);
        let (value, raw) = self
            .pull_optional_number()
            .ok_or_else(|| self.missing(&format!("integer {}", what)))?;
        if value.fract() != 0.0 || !value.is_finite() || value.abs() > i64::MAX as f64 {
            return Err(Error::unexpected(
                format!("integer {} in {}", what, self.keyword),
                raw,
                position,
            ));
        }
        Ok(value as i64)
    }

    /// Whether the next unconsumed child is a number.
    pub fn next_is_number(&self) -> bool {
        matches!(self.peek(), Some(Child::Number { .. }))
    }

    pub fn pull_optional_element(&mut self, keyword: &str) -> Option<Element> {
        match self.take_first(|c| matches!(c, Child::Element(e) if e.is(keyword))) {
            Some(Child::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn pull_element(&mut self, keyword: &str) -> Result<Element> {
        self.pull_optional_element(keyword)
            .ok_or_else(|| self.missing(keyword))
    }

    /// Remove the first nested element whatever its keyword.
    pub fn pull_optional_any_element(&mut self) -> Option<Element> {
        match self.take_first(|c| matches!(c, Child::Element(_))) {
            Some(Child::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn pull_any_element(&mut self, what: &str) -> Result<Element> {
        self.pull_optional_any_element()
            .ok_or_else(|| self.missing(what))
    }

    /// Remove the first bare word, returned with its offset.
    pub fn pull_optional_enumeration(&mut self) -> Option<(String, usize)> {
        match self.take_first(|c| matches!(c, Child::Enumeration { .. })) {
            Some(Child::Enumeration { value, position }) => Some((value, position)),
            _ => None,
        }
    }

    /// Check that every child was consumed.
    pub fn close(self) -> Result<()> {
        match self.children.first() {
            None => Ok(()),
            Some(child) => Err(Error::unexpected(
                format!("end of {}", self.keyword),
                child.describe(),
                child.position(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(value: f64, position: usize) -> Child {
        Child::Number {
            value,
            raw: value.to_string(),
            position,
        }
    }

    fn text(value: &str, position: usize) -> Child {
        Child::Text {
            value: value.to_string(),
            position,
        }
    }

    #[test]
    fn pulls_by_kind_in_order() {
        let mut e = Element::new("SPHEROID", 0);
        e.children = vec![text("WGS 84", 9), number(6378137.0, 19), number(298.25, 30)];
        assert_eq!(e.pull_string("name").unwrap(), "WGS 84");
        assert_eq!(e.pull_double("semi-major").unwrap(), 6378137.0);
        assert_eq!(e.pull_double("inverse flattening").unwrap(), 298.25);
        assert!(e.close().is_ok());
    }

    #[test]
    fn pulls_nested_element_by_keyword() {
        let mut e = Element::new("GEOGCS", 0);
        let mut unit = Element::new("UNIT", 20);
        unit.children.push(text("degree", 25));
        e.children = vec![text("x", 7), Child::Element(unit)];
        assert!(e.pull_optional_element("DATUM").is_none());
        let unit = e.pull_element("unit").unwrap();
        assert_eq!(unit.position, 20);
    }

    #[test]
    fn close_rejects_leftovers() {
        let mut e = Element::new("PRIMEM", 0);
        e.children = vec![text("Greenwich", 7), number(0.0, 20), number(1.0, 23)];
        e.pull_string("name").unwrap();
        e.pull_double("longitude").unwrap();
        match e.close() {
            Err(Error::UnexpectedToken { position, .. }) => assert_eq!(position, 23),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn integer_must_be_integral() {
        let mut e = Element::new("VERT_DATUM", 0);
        e.children = vec![number(2005.5, 12)];
        assert!(e.pull_integer("datum type").is_err());
    }

    #[test]
    fn missing_child_reports_keyword() {
        let mut e = Element::new("UNIT", 0);
        e.end = 6;
        let err = e.pull_string("name").unwrap_err();
        assert_eq!(err.position(), Some(6));
        assert!(err.to_string().contains("UNIT"));
    }
}
