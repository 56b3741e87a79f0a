//! Operation parameters and their descriptors.
//!
//! Values are stored in the canonical unit of their kind: metres for lengths
//! and degrees for angles. WKT-level unit conversion happens in the parser and
//! the formatter, never here.

use meridian_units::{unit, Unit};
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Metres
    Length,
    /// Degrees
    Angle,
    Scale,
    Integer,
    Dimensionless,
}

impl ParameterKind {
    /// Canonical unit values of this kind are stored in.
    pub fn unit(self) -> Option<Unit> {
        match self {
            ParameterKind::Length => Some(unit::METRE),
            ParameterKind::Angle => Some(unit::DEGREE),
            ParameterKind::Scale => Some(unit::ONE),
            ParameterKind::Integer | ParameterKind::Dimensionless => None,
        }
    }
}

/// `value` lies within the relative tolerance `epsilon` of `expected`.
pub(crate) fn is_derived_value(value: f64, expected: f64, epsilon: f64) -> bool {
    (value - expected).abs() <= epsilon * value.abs().max(expected.abs())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: Cow<'static, str>,
    pub aliases: &'static [&'static str],
    pub kind: ParameterKind,
    /// `None` marks a mandatory parameter.
    pub default: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl ParameterDescriptor {
    pub const fn new(name: &'static str, kind: ParameterKind) -> Self {
        Self {
            name: Cow::Borrowed(name),
            aliases: &[],
            kind,
            default: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn default_value(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }

    pub fn range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Check `value` against kind and range; the error is the reason.
    pub fn validate(&self, value: f64) -> std::result::Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{} is not a finite number", value));
        }
        if self.kind == ParameterKind::Integer && value.fract() != 0.0 {
            return Err(format!("{} is not an integer", value));
        }
        if let Some(min) = self.minimum {
            if value < min {
                return Err(format!("{} is below the minimum {}", value, min));
            }
        }
        if let Some(max) = self.maximum {
            if value > max {
                return Err(format!("{} is above the maximum {}", value, max));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterValue {
    name: String,
    kind: ParameterKind,
    value: f64,
}

impl ParameterValue {
    pub fn new(name: impl Into<String>, kind: ParameterKind, value: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Value in the canonical unit of [`ParameterValue::kind`].
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.kind {
            ParameterKind::Length => " m",
            ParameterKind::Angle => "°",
            _ => "",
        };
        write!(f, "{} = {}{}", self.name, self.value, suffix)
    }
}

/// Ordered set of parameter values with case-insensitive names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterGroup {
    values: Vec<ParameterValue>,
}

impl ParameterGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value`, replacing a same-named value in place.
    pub fn set(&mut self, value: ParameterValue) {
        match self
            .values
            .iter_mut()
            .find(|v| v.name.eq_ignore_ascii_case(&value.name))
        {
            Some(existing) => *existing = value,
            None => self.values.push(value),
        }
    }

    pub fn with(mut self, value: ParameterValue) -> Self {
        self.set(value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.iter().find(|v| v.name.eq_ignore_ascii_case(name))
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).map(ParameterValue::value)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParameterValue> {
        let index = self
            .values
            .iter()
            .position(|v| v.name.eq_ignore_ascii_case(name))?;
        Some(self.values.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterValue> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParameterGroup {
    type Item = &'a ParameterValue;
    type IntoIter = std::slice::Iter<'a, ParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl FromIterator<ParameterValue> for ParameterGroup {
    fn from_iter<I: IntoIterator<Item = ParameterValue>>(iter: I) -> Self {
        let mut group = ParameterGroup::new();
        for value in iter {
            group.set(value);
        }
        group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_in_place() {
        let mut g = ParameterGroup::new();
        g.set(ParameterValue::new("semi_major", ParameterKind::Length, 1.0));
        g.set(ParameterValue::new("false_easting", ParameterKind::Length, 2.0));
        g.set(ParameterValue::new("SEMI_MAJOR", ParameterKind::Length, 3.0));
        let names: Vec<&str> = g.iter().map(ParameterValue::name).collect();
        assert_eq!(names, ["SEMI_MAJOR", "false_easting"]);
        assert_eq!(g.value("semi_major"), Some(3.0));
    }

    #[test]
    fn descriptor_validation() {
        let d = ParameterDescriptor::new("num_row", ParameterKind::Integer).minimum(2.0);
        assert!(d.validate(3.0).is_ok());
        assert!(d.validate(2.5).is_err());
        assert!(d.validate(1.0).is_err());
        assert!(d.validate(f64::NAN).is_err());
    }

    #[test]
    fn descriptor_matches_aliases() {
        let d = ParameterDescriptor::new("central_meridian", ParameterKind::Angle)
            .aliases(&["longitude_of_center"]);
        assert!(d.matches("Central_Meridian"));
        assert!(d.matches("LONGITUDE_OF_CENTER"));
        assert!(!d.matches("latitude_of_origin"));
    }
}
