//! Parser for the math-transform keywords (`PARAM_MT`, `CONCAT_MT`,
//! `INVERSE_MT`, `PASSTHROUGH_MT`).
//!
//! `PARAM_MT` parameter values are read in the canonical unit of each
//! parameter (metres, degrees); no enclosing `UNIT` applies here.

use crate::element::Element;
use crate::error::{Error, Result};
use crate::factory::{DefaultMathTransformFactory, MathTransformFactory};
use crate::keywords::Keyword;
use crate::options::ParserOptions;
use crate::parameter::{ParameterGroup, ParameterValue};
use crate::symbols::Symbols;
use crate::transform::MathTransform;
use crate::tree::TreeBuilder;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Clone)]
pub struct MathTransformParser {
    symbols: Symbols,
    factory: Arc<dyn MathTransformFactory>,
}

impl Default for MathTransformParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl MathTransformParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            symbols: options.symbols.symbols(),
            factory: Arc::new(DefaultMathTransformFactory::new()),
        }
    }

    /// Use `factory` instead of the built-in [`DefaultMathTransformFactory`].
    pub fn with_factory(mut self, factory: Arc<dyn MathTransformFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub(crate) fn from_parts(symbols: Symbols, factory: Arc<dyn MathTransformFactory>) -> Self {
        Self { symbols, factory }
    }

    pub fn factory(&self) -> &Arc<dyn MathTransformFactory> {
        &self.factory
    }

    pub fn parse_math_transform(&self, text: &str) -> Result<MathTransform> {
        let element = TreeBuilder::parse(text, self.symbols)?;
        let transform = self.parse_element(element)?;
        debug!(
            source = transform.source_dimensions(),
            target = transform.target_dimensions(),
            "parsed math transform"
        );
        Ok(transform)
    }

    /// Build the transform described by `element`, which must carry one of
    /// the transform keywords.
    pub(crate) fn parse_element(&self, element: Element) -> Result<MathTransform> {
        let keyword = Keyword::lookup(&element.keyword).ok_or_else(|| Error::UnknownKeyword {
            keyword: element.keyword.clone(),
            position: element.position,
        })?;
        match keyword {
            Keyword::ParamMt => self.parse_param_mt(element),
            Keyword::ConcatMt => self.parse_concat_mt(element),
            Keyword::InverseMt => self.parse_inverse_mt(element),
            Keyword::PassthroughMt => self.parse_passthrough_mt(element),
            _ => Err(Error::unexpected(
                "math transform",
                element.keyword,
                element.position,
            )),
        }
    }

    fn parse_param_mt(&self, mut element: Element) -> Result<MathTransform> {
        let method_name = element.pull_string("method name")?;
        let mut declared = Vec::new();
        while let Some(mut parameter) = element.pull_optional_element("PARAMETER") {
            let name = parameter.pull_string("parameter name")?;
            let value = parameter.pull_double("parameter value")?;
            parameter.close()?;
            declared.push((name, value));
        }
        let names: Vec<&str> = declared.iter().map(|(name, _)| name.as_str()).collect();
        let method = self.factory.method_for(&method_name, &names)?;

        let mut parameters = ParameterGroup::new();
        for (name, value) in declared {
            let descriptor = method.descriptor(&name).ok_or_else(|| {
                Error::invalid_parameter(&name, format!("not a parameter of {}", method.name))
            })?;
            parameters.set(ParameterValue::new(&*descriptor.name, descriptor.kind, value));
        }
        element.close()?;

        trace!(method = method.name, "PARAM_MT");
        let transform = self.factory.create_parameterized(method.name, parameters)?;
        Ok(transform.into())
    }

    fn parse_concat_mt(&self, mut element: Element) -> Result<MathTransform> {
        let mut steps = Vec::new();
        while let Some(step) = element.pull_optional_any_element() {
            steps.push(self.parse_element(step)?);
        }
        if steps.is_empty() {
            element.pull_any_element("math transform")?;
        }
        element.close()?;
        trace!(steps = steps.len(), "CONCAT_MT");
        self.factory.create_concatenated(steps)
    }

    fn parse_inverse_mt(&self, mut element: Element) -> Result<MathTransform> {
        let inner = element.pull_any_element("math transform")?;
        element.close()?;
        let inner = self.parse_element(inner)?;
        trace!("INVERSE_MT");
        self.factory.create_inverse(inner)
    }

    fn parse_passthrough_mt(&self, mut element: Element) -> Result<MathTransform> {
        let first_affected = self.ordinate_count(&mut element, "first affected ordinate")?;
        let inner = element.pull_any_element("math transform")?;
        let trailing = if element.next_is_number() {
            self.ordinate_count(&mut element, "trailing ordinates")?
        } else {
            0
        };
        element.close()?;
        let inner = self.parse_element(inner)?;
        trace!(first_affected, trailing, "PASSTHROUGH_MT");
        self.factory
            .create_pass_through(first_affected, inner, trailing)
    }

    fn ordinate_count(&self, element: &mut Element, what: &str) -> Result<usize> {
        let position = element.peek().map(|c| c.position()).unwrap_or(element.end);
        let value = element.pull_integer(what)?;
        usize::try_from(value).map_err(|_| {
            Error::unexpected(
                format!("non-negative {} in {}", what, element.keyword),
                value.to_string(),
                position,
            )
        })
    }
}
