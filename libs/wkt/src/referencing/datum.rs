use super::Authority;
use crate::error::{Error, Result};
use meridian_units::{unit, Dimension, Unit};

/// Reference ellipsoid. Axis lengths are in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipsoid {
    name: String,
    semi_major_axis: f64,
    semi_minor_axis: f64,
    inverse_flattening: f64,
    ivf_definitive: bool,
    authority: Option<Authority>,
}

impl Ellipsoid {
    /// Ellipsoid defined by its semi-major axis and inverse flattening.
    /// An inverse flattening of `0` (or infinity) denotes a sphere.
    pub fn from_inverse_flattening(
        name: impl Into<String>,
        semi_major_axis: f64,
        inverse_flattening: f64,
    ) -> Result<Self> {
        let name = name.into();
        check_axis(&name, semi_major_axis)?;
        if inverse_flattening == 0.0 || inverse_flattening == f64::INFINITY {
            return Ok(Self::sphere_unchecked(name, semi_major_axis));
        }
        if !inverse_flattening.is_finite() || inverse_flattening <= 1.0 {
            return Err(Error::InvalidObject(format!(
                "ellipsoid '{}' has invalid inverse flattening {}",
                name, inverse_flattening
            )));
        }
        Ok(Self {
            semi_minor_axis: semi_major_axis * (1.0 - 1.0 / inverse_flattening),
            name,
            semi_major_axis,
            inverse_flattening,
            ivf_definitive: true,
            authority: None,
        })
    }

    /// Ellipsoid defined by both axis lengths.
    pub fn from_axes(
        name: impl Into<String>,
        semi_major_axis: f64,
        semi_minor_axis: f64,
    ) -> Result<Self> {
        let name = name.into();
        check_axis(&name, semi_major_axis)?;
        check_axis(&name, semi_minor_axis)?;
        if semi_minor_axis > semi_major_axis {
            return Err(Error::InvalidObject(format!(
                "ellipsoid '{}' has semi-minor axis {} greater than semi-major axis {}",
                name, semi_minor_axis, semi_major_axis
            )));
        }
        let inverse_flattening = if semi_major_axis == semi_minor_axis {
            f64::INFINITY
        } else {
            semi_major_axis / (semi_major_axis - semi_minor_axis)
        };
        Ok(Self {
            name,
            semi_major_axis,
            semi_minor_axis,
            inverse_flattening,
            ivf_definitive: false,
            authority: None,
        })
    }

    pub fn sphere(name: impl Into<String>, radius: f64) -> Result<Self> {
        let name = name.into();
        check_axis(&name, radius)?;
        Ok(Self::sphere_unchecked(name, radius))
    }

    fn sphere_unchecked(name: String, radius: f64) -> Self {
        Self {
            name,
            semi_major_axis: radius,
            semi_minor_axis: radius,
            inverse_flattening: f64::INFINITY,
            ivf_definitive: true,
            authority: None,
        }
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_minor_axis
    }

    /// Infinite for a sphere.
    pub fn inverse_flattening(&self) -> f64 {
        self.inverse_flattening
    }

    /// Whether the inverse flattening (rather than the semi-minor axis) was
    /// the defining parameter.
    pub fn is_ivf_definitive(&self) -> bool {
        self.ivf_definitive
    }

    pub fn is_sphere(&self) -> bool {
        self.semi_major_axis == self.semi_minor_axis
    }

    pub fn flattening(&self) -> f64 {
        (self.semi_major_axis - self.semi_minor_axis) / self.semi_major_axis
    }

    pub fn eccentricity_squared(&self) -> f64 {
        let f = self.flattening();
        f * (2.0 - f)
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

fn check_axis(name: &str, length: f64) -> Result<()> {
    if length.is_finite() && length > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidObject(format!(
            "ellipsoid '{}' has invalid axis length {}",
            name, length
        )))
    }
}

/// Prime meridian, kept in the angular unit it was declared in.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimeMeridian {
    name: String,
    longitude: f64,
    unit: Unit,
    authority: Option<Authority>,
}

impl PrimeMeridian {
    pub fn new(name: impl Into<String>, longitude: f64, unit: Unit) -> Result<Self> {
        let name = name.into();
        if unit.dimension() != Dimension::Angle {
            return Err(Error::InvalidObject(format!(
                "prime meridian '{}' needs an angular unit, got {}",
                name, unit
            )));
        }
        if !longitude.is_finite() {
            return Err(Error::InvalidObject(format!(
                "prime meridian '{}' has invalid longitude {}",
                name, longitude
            )));
        }
        Ok(Self {
            name,
            longitude,
            unit,
            authority: None,
        })
    }

    pub fn greenwich() -> Self {
        Self {
            name: "Greenwich".to_string(),
            longitude: 0.0,
            unit: unit::DEGREE,
            authority: None,
        }
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Longitude as declared, in [`PrimeMeridian::unit`].
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Longitude from Greenwich in degrees.
    pub fn greenwich_longitude(&self) -> f64 {
        if self.unit == unit::DEGREE {
            self.longitude
        } else {
            unit::DEGREE.from_base(self.unit.to_base(self.longitude))
        }
    }

    pub fn longitude_in(&self, target: &Unit) -> Result<f64> {
        Ok(self.unit.convert(self.longitude, target)?)
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

/// Seven-parameter datum shift to WGS 84 (metres, arc-seconds, ppm).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BursaWolfParameters {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub ex: f64,
    pub ey: f64,
    pub ez: f64,
    pub ppm: f64,
}

impl BursaWolfParameters {
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            dx,
            dy,
            dz,
            ..Self::default()
        }
    }

    /// Build from 3 (translation only) or 7 values.
    pub fn from_values(values: &[f64]) -> Result<Self> {
        match *values {
            [dx, dy, dz] => Ok(Self::translation(dx, dy, dz)),
            [dx, dy, dz, ex, ey, ez, ppm] => Ok(Self {
                dx,
                dy,
                dz,
                ex,
                ey,
                ez,
                ppm,
            }),
            _ => Err(Error::InvalidObject(format!(
                "TOWGS84 needs 3 or 7 values, got {}",
                values.len()
            ))),
        }
    }

    pub fn values(&self) -> [f64; 7] {
        [
            self.dx, self.dy, self.dz, self.ex, self.ey, self.ez, self.ppm,
        ]
    }

    pub fn is_identity(&self) -> bool {
        self.values().iter().all(|v| *v == 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticDatum {
    name: String,
    ellipsoid: Ellipsoid,
    prime_meridian: PrimeMeridian,
    to_wgs84: Option<BursaWolfParameters>,
    authority: Option<Authority>,
}

impl GeodeticDatum {
    pub fn new(name: impl Into<String>, ellipsoid: Ellipsoid, prime_meridian: PrimeMeridian) -> Self {
        Self {
            name: name.into(),
            ellipsoid,
            prime_meridian,
            to_wgs84: None,
            authority: None,
        }
    }

    pub fn with_to_wgs84(mut self, to_wgs84: impl Into<Option<BursaWolfParameters>>) -> Self {
        self.to_wgs84 = to_wgs84.into();
        self
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn prime_meridian(&self) -> &PrimeMeridian {
        &self.prime_meridian
    }

    pub fn to_wgs84(&self) -> Option<&BursaWolfParameters> {
        self.to_wgs84.as_ref()
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

/// Vertical datum types, numbered with their legacy OGC codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalDatumType {
    Other,
    Orthometric,
    Ellipsoidal,
    AltitudeBarometric,
    Normal,
    GeoidModelDerived,
    Depth,
}

impl VerticalDatumType {
    pub fn from_legacy_code(code: i64) -> Option<Self> {
        match code {
            2000 => Some(Self::Other),
            2001 => Some(Self::Orthometric),
            2002 => Some(Self::Ellipsoidal),
            2003 => Some(Self::AltitudeBarometric),
            2004 => Some(Self::Normal),
            2005 => Some(Self::GeoidModelDerived),
            2006 => Some(Self::Depth),
            _ => None,
        }
    }

    pub fn legacy_code(self) -> i64 {
        match self {
            Self::Other => 2000,
            Self::Orthometric => 2001,
            Self::Ellipsoidal => 2002,
            Self::AltitudeBarometric => 2003,
            Self::Normal => 2004,
            Self::GeoidModelDerived => 2005,
            Self::Depth => 2006,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalDatum {
    name: String,
    datum_type: VerticalDatumType,
    authority: Option<Authority>,
}

impl VerticalDatum {
    pub fn new(name: impl Into<String>, datum_type: VerticalDatumType) -> Self {
        Self {
            name: name.into(),
            datum_type,
            authority: None,
        }
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datum_type(&self) -> VerticalDatumType {
        self.datum_type
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wgs84_semi_minor_from_flattening() {
        let e = Ellipsoid::from_inverse_flattening("WGS 84", 6378137.0, 298.257223563).unwrap();
        assert_relative_eq!(e.semi_minor_axis(), 6356752.314245179, max_relative = 1e-12);
        assert!(e.is_ivf_definitive());
        assert!(!e.is_sphere());
    }

    #[test]
    fn zero_inverse_flattening_is_a_sphere() {
        let e = Ellipsoid::from_inverse_flattening("Sphere", 6371000.0, 0.0).unwrap();
        assert!(e.is_sphere());
        assert_eq!(e.inverse_flattening(), f64::INFINITY);
    }

    #[test]
    fn rejects_inverted_axes() {
        assert!(Ellipsoid::from_axes("bad", 6356752.0, 6378137.0).is_err());
        assert!(Ellipsoid::from_axes("bad", -1.0, -2.0).is_err());
        assert!(Ellipsoid::from_inverse_flattening("bad", 6378137.0, 0.5).is_err());
    }

    #[test]
    fn prime_meridian_in_grads() {
        let paris = PrimeMeridian::new("Paris", 2.5969213, unit::GRAD).unwrap();
        assert_relative_eq!(paris.greenwich_longitude(), 2.33722917, max_relative = 1e-8);
        assert_eq!(paris.longitude(), 2.5969213);
        assert!(PrimeMeridian::new("x", 0.0, unit::METRE).is_err());
    }

    #[test]
    fn bursa_wolf_accepts_three_or_seven_values() {
        let t = BursaWolfParameters::from_values(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(t.values(), [1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(BursaWolfParameters::from_values(&[1.0, 2.0]).is_err());
        assert!(BursaWolfParameters::default().is_identity());
    }

    #[test]
    fn vertical_datum_codes() {
        for code in 2000..=2006 {
            let t = VerticalDatumType::from_legacy_code(code).unwrap();
            assert_eq!(t.legacy_code(), code);
        }
        assert!(VerticalDatumType::from_legacy_code(1999).is_none());
    }
}
