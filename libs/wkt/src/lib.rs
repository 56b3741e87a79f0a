//! Well-Known Text (WKT) parser and formatter for coordinate reference systems
//! and math transforms.
//!
//! # Architecture Overview
//!
//! ```text
//! WKT String
//!      |
//!   Lexer -> Tokens (quote and bracket aware)
//!      |
//!   TreeBuilder -> Element tree (keyword + children)
//!      |
//!   Parser / MathTransformParser -> CRS, datum or transform objects
//!      |                              (factory resolves methods and parameters)
//!   Formatter -> WKT String (brackets and unit labels per dialect)
//! ```
//!
//! # Example
//!
//! ```rust
//! use meridian_wkt::{format, Citation, Parser};
//!
//! let parser = Parser::default();
//! let crs = parser
//!     .parse_coordinate_reference_system(
//!         r#"GEOGCS["WGS 84",
//!             DATUM["WGS_1984", SPHEROID["WGS 84", 6378137, 298.257223563]],
//!             PRIMEM["Greenwich", 0],
//!             UNIT["degree", 0.017453292519943295]]"#,
//!     )
//!     .unwrap();
//!
//! let esri = format(&crs, Citation::Esri).unwrap();
//! assert!(esri.contains(r#"UNIT["Degree", 0.017453292519943295]"#));
//! assert_eq!(parser.parse_coordinate_reference_system(&esri).unwrap(), crs);
//! ```

#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod keywords;
pub mod lexer;
pub mod mt_parser;
pub mod options;
pub mod parameter;
pub mod parser;
pub mod referencing;
pub mod symbols;
pub mod token;
pub mod transform;
pub mod tree;

// Re-export main types
pub use error::{Error, Result};
pub use factory::{DefaultMathTransformFactory, MathTransformFactory, OperationMethod};
pub use formatter::{format, format_with, Formattable, Formatter};
pub use meridian_units::{Citation, Unit, UnitDialect};
pub use mt_parser::MathTransformParser;
pub use options::{FormatOptions, ParserOptions};
pub use parameter::{ParameterDescriptor, ParameterGroup, ParameterKind, ParameterValue};
pub use parser::{ParsedObject, Parser};
pub use referencing::{Authority, CoordinateReferenceSystem};
pub use symbols::{SymbolStyle, Symbols};
pub use transform::{MathTransform, ParameterizedTransform};
