use super::{Authority, CoordinateSystem, GeodeticDatum, VerticalDatum};
use crate::error::{Error, Result};
use crate::transform::ParameterizedTransform;
use meridian_units::{Dimension, Unit};
use std::borrow::Cow;

fn require(unit: &Unit, dimension: Dimension, role: &str, crs: &str) -> Result<()> {
    if unit.dimension() == dimension {
        Ok(())
    } else {
        Err(Error::InvalidObject(format!(
            "{} unit of '{}' must be {:?}, got {}",
            role, crs, dimension, unit
        )))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeographicCrs {
    name: String,
    datum: GeodeticDatum,
    angular_unit: Unit,
    coordinate_system: CoordinateSystem,
    authority: Option<Authority>,
}

impl GeographicCrs {
    pub fn new(
        name: impl Into<String>,
        datum: GeodeticDatum,
        angular_unit: Unit,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self> {
        let name = name.into();
        require(&angular_unit, Dimension::Angle, "angular", &name)?;
        if coordinate_system.dimension() < 2 {
            return Err(Error::InvalidObject(format!(
                "geographic CRS '{}' needs at least 2 axes",
                name
            )));
        }
        Ok(Self {
            name,
            datum,
            angular_unit,
            coordinate_system,
            authority: None,
        })
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datum(&self) -> &GeodeticDatum {
        &self.datum
    }

    pub fn angular_unit(&self) -> &Unit {
        &self.angular_unit
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coordinate_system
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

/// A geographic CRS projected onto a plane by a map-projection conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCrs {
    name: String,
    base: GeographicCrs,
    conversion: ParameterizedTransform,
    linear_unit: Unit,
    coordinate_system: CoordinateSystem,
    authority: Option<Authority>,
}

impl ProjectedCrs {
    pub fn new(
        name: impl Into<String>,
        base: GeographicCrs,
        conversion: ParameterizedTransform,
        linear_unit: Unit,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self> {
        let name = name.into();
        require(&linear_unit, Dimension::Length, "linear", &name)?;
        if coordinate_system.dimension() != conversion.target_dimensions() {
            return Err(Error::InvalidObject(format!(
                "projected CRS '{}' has {} axes but {} outputs {} dimensions",
                name,
                coordinate_system.dimension(),
                conversion.method(),
                conversion.target_dimensions()
            )));
        }
        Ok(Self {
            name,
            base,
            conversion,
            linear_unit,
            coordinate_system,
            authority: None,
        })
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> &GeographicCrs {
        &self.base
    }

    /// Conversion from the base CRS; parameter values are in metres and degrees.
    pub fn conversion(&self) -> &ParameterizedTransform {
        &self.conversion
    }

    pub fn linear_unit(&self) -> &Unit {
        &self.linear_unit
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coordinate_system
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocentricCrs {
    name: String,
    datum: GeodeticDatum,
    linear_unit: Unit,
    coordinate_system: CoordinateSystem,
    authority: Option<Authority>,
}

impl GeocentricCrs {
    pub fn new(
        name: impl Into<String>,
        datum: GeodeticDatum,
        linear_unit: Unit,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self> {
        let name = name.into();
        require(&linear_unit, Dimension::Length, "linear", &name)?;
        if coordinate_system.dimension() != 3 {
            return Err(Error::InvalidObject(format!(
                "geocentric CRS '{}' needs 3 axes, got {}",
                name,
                coordinate_system.dimension()
            )));
        }
        Ok(Self {
            name,
            datum,
            linear_unit,
            coordinate_system,
            authority: None,
        })
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datum(&self) -> &GeodeticDatum {
        &self.datum
    }

    pub fn linear_unit(&self) -> &Unit {
        &self.linear_unit
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coordinate_system
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerticalCrs {
    name: String,
    datum: VerticalDatum,
    linear_unit: Unit,
    coordinate_system: CoordinateSystem,
    authority: Option<Authority>,
}

impl VerticalCrs {
    pub fn new(
        name: impl Into<String>,
        datum: VerticalDatum,
        linear_unit: Unit,
        coordinate_system: CoordinateSystem,
    ) -> Result<Self> {
        let name = name.into();
        require(&linear_unit, Dimension::Length, "linear", &name)?;
        if coordinate_system.dimension() != 1 {
            return Err(Error::InvalidObject(format!(
                "vertical CRS '{}' needs exactly one axis, got {}",
                name,
                coordinate_system.dimension()
            )));
        }
        Ok(Self {
            name,
            datum,
            linear_unit,
            coordinate_system,
            authority: None,
        })
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn datum(&self) -> &VerticalDatum {
        &self.datum
    }

    pub fn linear_unit(&self) -> &Unit {
        &self.linear_unit
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coordinate_system
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

/// Two or more CRS whose axes are used side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundCrs {
    name: String,
    components: Vec<CoordinateReferenceSystem>,
    authority: Option<Authority>,
}

impl CompoundCrs {
    pub fn new(
        name: impl Into<String>,
        components: Vec<CoordinateReferenceSystem>,
    ) -> Result<Self> {
        let name = name.into();
        if components.len() < 2 {
            return Err(Error::InvalidObject(format!(
                "compound CRS '{}' needs at least 2 components",
                name
            )));
        }
        Ok(Self {
            name,
            components,
            authority: None,
        })
    }

    pub fn with_authority(mut self, authority: impl Into<Option<Authority>>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[CoordinateReferenceSystem] {
        &self.components
    }

    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateReferenceSystem {
    Geographic(GeographicCrs),
    Projected(ProjectedCrs),
    Geocentric(GeocentricCrs),
    Vertical(VerticalCrs),
    Compound(CompoundCrs),
}

impl CoordinateReferenceSystem {
    pub fn name(&self) -> &str {
        match self {
            CoordinateReferenceSystem::Geographic(crs) => crs.name(),
            CoordinateReferenceSystem::Projected(crs) => crs.name(),
            CoordinateReferenceSystem::Geocentric(crs) => crs.name(),
            CoordinateReferenceSystem::Vertical(crs) => crs.name(),
            CoordinateReferenceSystem::Compound(crs) => crs.name(),
        }
    }

    pub fn authority(&self) -> Option<&Authority> {
        match self {
            CoordinateReferenceSystem::Geographic(crs) => crs.authority(),
            CoordinateReferenceSystem::Projected(crs) => crs.authority(),
            CoordinateReferenceSystem::Geocentric(crs) => crs.authority(),
            CoordinateReferenceSystem::Vertical(crs) => crs.authority(),
            CoordinateReferenceSystem::Compound(crs) => crs.authority(),
        }
    }

    /// Axes in coordinate order; a compound CRS lists its components' axes in turn.
    pub fn coordinate_system(&self) -> Cow<'_, CoordinateSystem> {
        match self {
            CoordinateReferenceSystem::Geographic(crs) => Cow::Borrowed(crs.coordinate_system()),
            CoordinateReferenceSystem::Projected(crs) => Cow::Borrowed(crs.coordinate_system()),
            CoordinateReferenceSystem::Geocentric(crs) => Cow::Borrowed(crs.coordinate_system()),
            CoordinateReferenceSystem::Vertical(crs) => Cow::Borrowed(crs.coordinate_system()),
            CoordinateReferenceSystem::Compound(crs) => {
                let parts: Vec<Cow<'_, CoordinateSystem>> = crs
                    .components()
                    .iter()
                    .map(CoordinateReferenceSystem::coordinate_system)
                    .collect();
                Cow::Owned(CoordinateSystem::concatenated(parts.iter().map(|cs| cs.as_ref())))
            }
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            CoordinateReferenceSystem::Compound(crs) => {
                crs.components().iter().map(Self::dimension).sum()
            }
            other => other.coordinate_system().dimension(),
        }
    }

    /// Geodetic datum, for a compound CRS the first one found among its components.
    pub fn geodetic_datum(&self) -> Option<&GeodeticDatum> {
        match self {
            CoordinateReferenceSystem::Geographic(crs) => Some(crs.datum()),
            CoordinateReferenceSystem::Projected(crs) => Some(crs.base().datum()),
            CoordinateReferenceSystem::Geocentric(crs) => Some(crs.datum()),
            CoordinateReferenceSystem::Vertical(_) => None,
            CoordinateReferenceSystem::Compound(crs) => {
                crs.components().iter().find_map(Self::geodetic_datum)
            }
        }
    }

    /// WKT keyword this CRS is written with.
    pub fn keyword(&self) -> &'static str {
        match self {
            CoordinateReferenceSystem::Geographic(_) => "GEOGCS",
            CoordinateReferenceSystem::Projected(_) => "PROJCS",
            CoordinateReferenceSystem::Geocentric(_) => "GEOCCS",
            CoordinateReferenceSystem::Vertical(_) => "VERT_CS",
            CoordinateReferenceSystem::Compound(_) => "COMPD_CS",
        }
    }
}

impl From<GeographicCrs> for CoordinateReferenceSystem {
    fn from(value: GeographicCrs) -> Self {
        CoordinateReferenceSystem::Geographic(value)
    }
}

impl From<ProjectedCrs> for CoordinateReferenceSystem {
    fn from(value: ProjectedCrs) -> Self {
        CoordinateReferenceSystem::Projected(value)
    }
}

impl From<GeocentricCrs> for CoordinateReferenceSystem {
    fn from(value: GeocentricCrs) -> Self {
        CoordinateReferenceSystem::Geocentric(value)
    }
}

impl From<VerticalCrs> for CoordinateReferenceSystem {
    fn from(value: VerticalCrs) -> Self {
        CoordinateReferenceSystem::Vertical(value)
    }
}

impl From<CompoundCrs> for CoordinateReferenceSystem {
    fn from(value: CompoundCrs) -> Self {
        CoordinateReferenceSystem::Compound(value)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Axis, AxisDirection, Ellipsoid, PrimeMeridian, VerticalDatumType};
    use super::*;
    use meridian_units::unit;

    fn wgs84() -> GeographicCrs {
        let ellipsoid = Ellipsoid::from_inverse_flattening("WGS 84", 6378137.0, 298.257223563)
            .unwrap();
        let datum = GeodeticDatum::new("WGS_1984", ellipsoid, PrimeMeridian::greenwich());
        let cs = CoordinateSystem::new([
            Axis::new("Lon", AxisDirection::East, unit::DEGREE),
            Axis::new("Lat", AxisDirection::North, unit::DEGREE),
        ])
        .unwrap();
        GeographicCrs::new("WGS 84", datum, unit::DEGREE, cs).unwrap()
    }

    fn height() -> VerticalCrs {
        let cs = CoordinateSystem::new([Axis::new("Z", AxisDirection::Up, unit::METRE)]).unwrap();
        VerticalCrs::new(
            "EGM96",
            VerticalDatum::new("EGM96", VerticalDatumType::GeoidModelDerived),
            unit::METRE,
            cs,
        )
        .unwrap()
    }

    #[test]
    fn geographic_requires_angular_unit() {
        let crs = wgs84();
        let err = GeographicCrs::new(
            "bad",
            crs.datum().clone(),
            unit::METRE,
            crs.coordinate_system().clone(),
        );
        assert!(matches!(err, Err(Error::InvalidObject(_))));
    }

    #[test]
    fn compound_concatenates_axes() {
        let compound = CompoundCrs::new("WGS 84 + EGM96", vec![wgs84().into(), height().into()])
            .unwrap();
        let crs = CoordinateReferenceSystem::from(compound);
        assert_eq!(crs.dimension(), 3);
        let directions: Vec<AxisDirection> = crs
            .coordinate_system()
            .axes()
            .iter()
            .map(Axis::direction)
            .collect();
        assert_eq!(
            directions,
            [AxisDirection::East, AxisDirection::North, AxisDirection::Up]
        );
        assert_eq!(crs.geodetic_datum().map(GeodeticDatum::name), Some("WGS_1984"));
        assert_eq!(crs.keyword(), "COMPD_CS");
    }

    #[test]
    fn compound_needs_two_parts() {
        assert!(CompoundCrs::new("lonely", vec![wgs84().into()]).is_err());
    }
}
