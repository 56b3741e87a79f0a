//! Parser and formatter configuration.

use crate::symbols::SymbolStyle;
use meridian_units::Citation;
use serde::{Deserialize, Serialize};

/// Parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Reject `UNIT` labels that no dialect knows instead of defining a
    /// unit from the declared factor.
    pub strict_units: bool,
    pub symbols: SymbolStyle,
    /// Dialect consulted first when resolving unit labels.
    pub dialect: Citation,
    /// `PROJCS` semi-axes within this relative tolerance of the base
    /// ellipsoid take the ellipsoid's exact values.
    pub derived_parameter_epsilon: f64,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            strict_units: false,
            symbols: SymbolStyle::Brackets,
            dialect: Citation::Default,
            derived_parameter_epsilon: 1e-9,
        }
    }
}

/// Formatter configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Spaces per nesting level; `0` writes everything on one line.
    pub indentation: usize,
    pub symbols: SymbolStyle,
    pub dialect: Citation,
    /// Relative tolerance under which `semi_major`/`semi_minor` count as
    /// derived from the ellipsoid and are left out of `PROJCS`.
    pub derived_parameter_epsilon: f64,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indentation: 0,
            symbols: SymbolStyle::Brackets,
            dialect: Citation::Default,
            derived_parameter_epsilon: 1e-9,
        }
    }
}

impl FormatOptions {
    pub fn with_dialect(mut self, dialect: Citation) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let options: FormatOptions =
            serde_json::from_str(r#"{"dialect": "esri", "indentation": 2}"#).unwrap();
        assert_eq!(options.dialect, Citation::Esri);
        assert_eq!(options.indentation, 2);
        assert_eq!(options.derived_parameter_epsilon, 1e-9);

        let parser: ParserOptions = serde_json::from_str(r#"{"strict_units": true}"#).unwrap();
        assert!(parser.strict_units);
        assert_eq!(parser.symbols, SymbolStyle::Brackets);
        assert_eq!(parser.derived_parameter_epsilon, 1e-9);
    }
}
