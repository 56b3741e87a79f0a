use crate::error::{Error, Result};
use std::f64::consts::PI;
use std::fmt;

/// Relative tolerance used when two independently written conversion factors
/// are meant to denote the same unit (e.g. `0.0174532925199433` vs `π/180`).
pub const FACTOR_TOLERANCE: f64 = 1e-10;

/// Physical quantity a unit measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Dimension {
    Length,
    Angle,
    Time,
    Scale,
    Temperature,
}

impl Dimension {
    /// Symbol of the SI (or SI-coherent) base unit for this dimension.
    pub fn base_symbol(self) -> &'static str {
        match self {
            Dimension::Length => "m",
            Dimension::Angle => "rad",
            Dimension::Time => "s",
            Dimension::Scale => "one",
            Dimension::Temperature => "K",
        }
    }

    pub fn base_unit(self) -> Unit {
        Unit::new(self, 1.0)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Length => "length",
            Dimension::Angle => "angle",
            Dimension::Time => "time",
            Dimension::Scale => "scale",
            Dimension::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

/// A unit of measure: `base = value * factor + offset`.
///
/// Two units are equal when they describe the same physical conversion; the
/// optional `name` only records how a user-defined unit was labelled.
#[derive(Clone, Debug)]
pub struct Unit {
    dimension: Dimension,
    factor: f64,
    offset: f64,
    name: Option<String>,
}

pub const METRE: Unit = Unit::new(Dimension::Length, 1.0);
pub const KILOMETRE: Unit = Unit::new(Dimension::Length, 1000.0);
pub const FOOT: Unit = Unit::new(Dimension::Length, 0.3048);
pub const US_SURVEY_FOOT: Unit = Unit::new(Dimension::Length, 1200.0 / 3937.0);
pub const NAUTICAL_MILE: Unit = Unit::new(Dimension::Length, 1852.0);

pub const RADIAN: Unit = Unit::new(Dimension::Angle, 1.0);
pub const MICRORADIAN: Unit = Unit::new(Dimension::Angle, 1e-6);
pub const DEGREE: Unit = Unit::new(Dimension::Angle, PI / 180.0);
pub const GRAD: Unit = Unit::new(Dimension::Angle, PI / 200.0);
pub const ARC_MINUTE: Unit = Unit::new(Dimension::Angle, PI / 10_800.0);
pub const ARC_SECOND: Unit = Unit::new(Dimension::Angle, PI / 648_000.0);

pub const SECOND: Unit = Unit::new(Dimension::Time, 1.0);
pub const MINUTE: Unit = Unit::new(Dimension::Time, 60.0);
pub const HOUR: Unit = Unit::new(Dimension::Time, 3600.0);
pub const DAY: Unit = Unit::new(Dimension::Time, 86_400.0);

pub const ONE: Unit = Unit::new(Dimension::Scale, 1.0);
pub const PPM: Unit = Unit::new(Dimension::Scale, 1e-6);

pub const KELVIN: Unit = Unit::new(Dimension::Temperature, 1.0);
pub const CELSIUS: Unit = Unit::affine(Dimension::Temperature, 1.0, 273.15);
pub const FAHRENHEIT: Unit = Unit::affine(Dimension::Temperature, 5.0 / 9.0, 459.67 * 5.0 / 9.0);

impl Unit {
    pub const fn new(dimension: Dimension, factor: f64) -> Self {
        Self {
            dimension,
            factor,
            offset: 0.0,
            name: None,
        }
    }

    pub const fn affine(dimension: Dimension, factor: f64, offset: f64) -> Self {
        Self {
            dimension,
            factor,
            offset,
            name: None,
        }
    }

    /// Attach a user-supplied label to this unit.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_base(&self) -> bool {
        self.factor == 1.0 && self.offset == 0.0
    }

    pub fn is_linear(&self) -> bool {
        self.offset == 0.0
    }

    /// Scale this unit: `self.times(f)` measures `f` of `self` per unit.
    pub fn times(&self, factor: f64) -> Unit {
        Unit {
            dimension: self.dimension,
            factor: self.factor * factor,
            offset: self.offset,
            name: None,
        }
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Same dimension and conversion up to [`FACTOR_TOLERANCE`].
    pub fn approx_eq(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
            && relative_eq(self.factor, other.factor, FACTOR_TOLERANCE)
            && (self.offset - other.offset).abs() <= FACTOR_TOLERANCE * self.offset.abs().max(1.0)
    }

    pub fn to_base(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    pub fn from_base(&self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }

    /// Convert `value` expressed in `self` into `to`.
    pub fn convert(&self, value: f64, to: &Unit) -> Result<f64> {
        if !self.is_compatible(to) {
            return Err(Error::Incompatible {
                from: self.to_string(),
                to: to.to_string(),
            });
        }
        if self == to {
            return Ok(value);
        }
        Ok(to.from_base(self.to_base(value)))
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.dimension == other.dimension
            && self.factor == other.factor
            && self.offset == other.offset
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return f.write_str(name);
        }
        f.write_str(self.dimension.base_symbol())?;
        if self.factor != 1.0 {
            write!(f, "*{:?}", self.factor)?;
        }
        if self.offset != 0.0 {
            write!(f, "+{:?}", self.offset)?;
        }
        Ok(())
    }
}

pub(crate) fn relative_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if a == b {
        return true;
    }
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= tolerance * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_name() {
        let named = FOOT.clone().with_name("international foot");
        assert_eq!(named, FOOT);
        assert_eq!(named.name(), Some("international foot"));
    }

    #[test]
    fn converts_feet_to_metres() {
        let v = FOOT.convert(1000.0, &METRE).unwrap();
        assert!((v - 304.8).abs() < 1e-9);
    }

    #[test]
    fn rejects_incompatible_conversion() {
        assert!(matches!(
            DEGREE.convert(1.0, &METRE),
            Err(Error::Incompatible { .. })
        ));
    }

    #[test]
    fn celsius_is_affine() {
        assert!(!CELSIUS.is_linear());
        let k = CELSIUS.convert(0.0, &KELVIN).unwrap();
        assert!((k - 273.15).abs() < 1e-12);
        let f = CELSIUS.convert(100.0, &FAHRENHEIT).unwrap();
        assert!((f - 212.0).abs() < 1e-9);
    }

    #[test]
    fn approx_eq_accepts_rounded_factors() {
        let epsg_degree = Unit::new(Dimension::Angle, 0.0174532925199433);
        assert_ne!(epsg_degree, DEGREE);
        assert!(epsg_degree.approx_eq(&DEGREE));
        assert!(!epsg_degree.approx_eq(&GRAD));
    }

    #[test]
    fn display_falls_back_to_base_symbol() {
        assert_eq!(METRE.to_string(), "m");
        assert_eq!(FOOT.to_string(), "m*0.3048");
    }
}
