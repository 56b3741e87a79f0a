//! Math transform object graph.
//!
//! Transforms are descriptive: they record what to compute (method and
//! parameters, or how sub-transforms compose) without evaluating coordinates.

use crate::error::{Error, Result};
use crate::parameter::ParameterGroup;

/// A primitive transform: an operation method applied with a parameter group.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedTransform {
    method: String,
    source_dimensions: usize,
    target_dimensions: usize,
    parameters: ParameterGroup,
}

impl ParameterizedTransform {
    pub(crate) fn new(
        method: impl Into<String>,
        source_dimensions: usize,
        target_dimensions: usize,
        parameters: ParameterGroup,
    ) -> Self {
        Self {
            method: method.into(),
            source_dimensions,
            target_dimensions,
            parameters,
        }
    }

    /// Canonical name of the operation method.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn parameters(&self) -> &ParameterGroup {
        &self.parameters
    }

    pub fn source_dimensions(&self) -> usize {
        self.source_dimensions
    }

    pub fn target_dimensions(&self) -> usize {
        self.target_dimensions
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MathTransform {
    Parameterized(ParameterizedTransform),
    /// Steps applied in order; each step's target matches the next step's source.
    Concatenated(Vec<MathTransform>),
    Inverse(Box<MathTransform>),
    /// Applies `transform` to the ordinates starting at `first_affected`,
    /// leaving the others untouched.
    PassThrough {
        first_affected: usize,
        transform: Box<MathTransform>,
        trailing: usize,
    },
}

impl MathTransform {
    pub fn concatenated(mut steps: Vec<MathTransform>) -> Result<Self> {
        if steps.is_empty() {
            return Err(Error::InvalidObject(
                "a concatenated transform needs at least one step".to_string(),
            ));
        }
        if steps.len() == 1 {
            return Ok(steps.remove(0));
        }
        for (i, pair) in steps.windows(2).enumerate() {
            if pair[0].target_dimensions() != pair[1].source_dimensions() {
                return Err(Error::InvalidObject(format!(
                    "step {} outputs {} dimensions but step {} expects {}",
                    i + 1,
                    pair[0].target_dimensions(),
                    i + 2,
                    pair[1].source_dimensions()
                )));
            }
        }
        Ok(MathTransform::Concatenated(steps))
    }

    pub fn pass_through(first_affected: usize, transform: MathTransform, trailing: usize) -> Self {
        if first_affected == 0 && trailing == 0 {
            return transform;
        }
        MathTransform::PassThrough {
            first_affected,
            transform: Box::new(transform),
            trailing,
        }
    }

    /// Inverse of this transform. Inverting an inverse yields the original.
    pub fn inverse(self) -> Self {
        match self {
            MathTransform::Inverse(inner) => *inner,
            other => MathTransform::Inverse(Box::new(other)),
        }
    }

    pub fn source_dimensions(&self) -> usize {
        match self {
            MathTransform::Parameterized(p) => p.source_dimensions,
            MathTransform::Concatenated(steps) => {
                steps.first().map(|s| s.source_dimensions()).unwrap_or(0)
            }
            MathTransform::Inverse(inner) => inner.target_dimensions(),
            MathTransform::PassThrough {
                first_affected,
                transform,
                trailing,
            } => first_affected + transform.source_dimensions() + trailing,
        }
    }

    pub fn target_dimensions(&self) -> usize {
        match self {
            MathTransform::Parameterized(p) => p.target_dimensions,
            MathTransform::Concatenated(steps) => {
                steps.last().map(|s| s.target_dimensions()).unwrap_or(0)
            }
            MathTransform::Inverse(inner) => inner.source_dimensions(),
            MathTransform::PassThrough {
                first_affected,
                transform,
                trailing,
            } => first_affected + transform.target_dimensions() + trailing,
        }
    }

    pub fn as_parameterized(&self) -> Option<&ParameterizedTransform> {
        match self {
            MathTransform::Parameterized(p) => Some(p),
            _ => None,
        }
    }
}

impl From<ParameterizedTransform> for MathTransform {
    fn from(value: ParameterizedTransform) -> Self {
        MathTransform::Parameterized(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitive(source: usize, target: usize) -> MathTransform {
        ParameterizedTransform::new("Test", source, target, ParameterGroup::new()).into()
    }

    #[test]
    fn double_inverse_collapses() {
        let t = primitive(2, 3);
        assert_eq!(t.clone().inverse().inverse(), t);
        let inv = t.inverse();
        assert_eq!(inv.source_dimensions(), 3);
        assert_eq!(inv.target_dimensions(), 2);
    }

    #[test]
    fn concatenation_checks_dimensions() {
        assert!(MathTransform::concatenated(vec![primitive(2, 3), primitive(3, 2)]).is_ok());
        assert!(MathTransform::concatenated(vec![primitive(2, 3), primitive(2, 2)]).is_err());
        assert!(MathTransform::concatenated(Vec::new()).is_err());
        assert_eq!(
            MathTransform::concatenated(vec![primitive(2, 2)]).unwrap(),
            primitive(2, 2)
        );
    }

    #[test]
    fn pass_through_dimensions() {
        let t = MathTransform::pass_through(1, primitive(2, 3), 1);
        assert_eq!(t.source_dimensions(), 4);
        assert_eq!(t.target_dimensions(), 5);
        assert_eq!(MathTransform::pass_through(0, primitive(2, 2), 0), primitive(2, 2));
    }
}
