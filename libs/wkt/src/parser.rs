//! WKT parser for coordinate reference systems and their components.
//!
//! Parsing runs in two passes: [`TreeBuilder`] turns the text into a generic
//! [`Element`] tree, then one builder per keyword consumes its element,
//! building nested objects first. Transform keywords are handed over to
//! [`MathTransformParser`].
//!
//! # Example
//!
//! ```rust
//! use meridian_wkt::Parser;
//!
//! let crs = Parser::default()
//!     .parse_coordinate_reference_system(
//!         r#"GEOGCS["WGS 84",
//!             DATUM["WGS_1984", SPHEROID["WGS 84", 6378137, 298.257223563]],
//!             PRIMEM["Greenwich", 0],
//!             UNIT["degree", 0.017453292519943295]]"#,
//!     )
//!     .unwrap();
//! assert_eq!(crs.name(), "WGS 84");
//! assert_eq!(crs.dimension(), 2);
//! ```

use crate::element::Element;
use crate::error::{Error, Result};
use crate::factory::{DefaultMathTransformFactory, MathTransformFactory};
use crate::keywords::Keyword;
use crate::mt_parser::MathTransformParser;
use crate::options::ParserOptions;
use crate::parameter::{is_derived_value, ParameterGroup, ParameterKind, ParameterValue};
use crate::referencing::{
    Authority, Axis, AxisDirection, BursaWolfParameters, CompoundCrs, CoordinateReferenceSystem,
    CoordinateSystem, Ellipsoid, GeocentricCrs, GeodeticDatum, GeographicCrs, PrimeMeridian,
    ProjectedCrs, VerticalCrs, VerticalDatum, VerticalDatumType,
};
use crate::symbols::Symbols;
use crate::transform::MathTransform;
use crate::tree::TreeBuilder;
use meridian_units::{unit, Citation, Dimension, Unit, UnitDialect};
use std::sync::Arc;
use tracing::{debug, trace};

/// Any object a WKT string can describe at its root.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedObject {
    Crs(CoordinateReferenceSystem),
    MathTransform(MathTransform),
    GeodeticDatum(GeodeticDatum),
    VerticalDatum(VerticalDatum),
    Ellipsoid(Ellipsoid),
    PrimeMeridian(PrimeMeridian),
    Axis(Axis),
    ToWgs84(BursaWolfParameters),
}

impl ParsedObject {
    /// Short human-readable kind, e.g. `"projected CRS"`.
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedObject::Crs(CoordinateReferenceSystem::Geographic(_)) => "geographic CRS",
            ParsedObject::Crs(CoordinateReferenceSystem::Projected(_)) => "projected CRS",
            ParsedObject::Crs(CoordinateReferenceSystem::Geocentric(_)) => "geocentric CRS",
            ParsedObject::Crs(CoordinateReferenceSystem::Vertical(_)) => "vertical CRS",
            ParsedObject::Crs(CoordinateReferenceSystem::Compound(_)) => "compound CRS",
            ParsedObject::MathTransform(_) => "math transform",
            ParsedObject::GeodeticDatum(_) => "geodetic datum",
            ParsedObject::VerticalDatum(_) => "vertical datum",
            ParsedObject::Ellipsoid(_) => "ellipsoid",
            ParsedObject::PrimeMeridian(_) => "prime meridian",
            ParsedObject::Axis(_) => "axis",
            ParsedObject::ToWgs84(_) => "datum shift",
        }
    }

    pub fn as_crs(&self) -> Option<&CoordinateReferenceSystem> {
        match self {
            ParsedObject::Crs(crs) => Some(crs),
            _ => None,
        }
    }

    pub fn into_crs(self) -> Option<CoordinateReferenceSystem> {
        match self {
            ParsedObject::Crs(crs) => Some(crs),
            _ => None,
        }
    }

    pub fn as_math_transform(&self) -> Option<&MathTransform> {
        match self {
            ParsedObject::MathTransform(transform) => Some(transform),
            _ => None,
        }
    }
}

/// WKT parser.
///
/// Holds configuration only, so one instance can serve any number of calls
/// and threads.
#[derive(Clone)]
pub struct Parser {
    options: ParserOptions,
    symbols: Symbols,
    dialect: &'static UnitDialect,
    factory: Arc<dyn MathTransformFactory>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            symbols: options.symbols.symbols(),
            dialect: UnitDialect::get(options.dialect),
            factory: Arc::new(DefaultMathTransformFactory::new()),
        }
    }

    /// Use `factory` instead of the built-in [`DefaultMathTransformFactory`].
    pub fn with_factory(mut self, factory: Arc<dyn MathTransformFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn factory(&self) -> &Arc<dyn MathTransformFactory> {
        &self.factory
    }

    pub fn parse_coordinate_reference_system(
        &self,
        text: &str,
    ) -> Result<CoordinateReferenceSystem> {
        let element = TreeBuilder::parse(text, self.symbols)?;
        let keyword = keyword_of(&element)?;
        let crs = self.parse_crs(element, keyword)?;
        debug!(name = crs.name(), kind = crs.keyword(), "parsed coordinate reference system");
        Ok(crs)
    }

    /// Parse any supported root object; the leading keyword decides which.
    pub fn parse_object(&self, text: &str) -> Result<ParsedObject> {
        let element = TreeBuilder::parse(text, self.symbols)?;
        let keyword = keyword_of(&element)?;
        let object = self.parse_root(element, keyword)?;
        debug!(kind = object.kind(), "parsed WKT object");
        Ok(object)
    }

    fn parse_root(&self, mut element: Element, keyword: Keyword) -> Result<ParsedObject> {
        if keyword.is_coordinate_reference_system() {
            return self.parse_crs(element, keyword).map(ParsedObject::Crs);
        }
        if keyword.is_math_transform() {
            return self.transforms().parse_element(element).map(ParsedObject::MathTransform);
        }
        // Standalone components are parsed as if wrapped in their usual parent.
        let object = match keyword {
            Keyword::Datum => {
                let mut parent = wrap(element);
                ParsedObject::GeodeticDatum(self.parse_datum(&mut parent, PrimeMeridian::greenwich())?)
            }
            Keyword::VertDatum => {
                let mut parent = wrap(element);
                ParsedObject::VerticalDatum(self.parse_vert_datum(&mut parent)?)
            }
            Keyword::Spheroid => {
                let mut parent = wrap(element);
                ParsedObject::Ellipsoid(self.parse_spheroid(&mut parent)?)
            }
            Keyword::Primem => {
                let mut parent = wrap(element);
                ParsedObject::PrimeMeridian(self.parse_primem(&mut parent, &unit::DEGREE)?)
            }
            Keyword::Axis => ParsedObject::Axis(self.parse_axis(element, unit::METRE)?),
            Keyword::Towgs84 => {
                let values = take_numbers(&mut element);
                element.close()?;
                ParsedObject::ToWgs84(BursaWolfParameters::from_values(&values)?)
            }
            _ => {
                return Err(Error::unexpected(
                    "a standalone WKT object",
                    element.keyword,
                    element.position,
                ))
            }
        };
        Ok(object)
    }

    fn transforms(&self) -> MathTransformParser {
        MathTransformParser::from_parts(self.symbols, Arc::clone(&self.factory))
    }

    fn parse_crs(&self, element: Element, keyword: Keyword) -> Result<CoordinateReferenceSystem> {
        match keyword {
            Keyword::Geogcs => self.parse_geogcs(element).map(Into::into),
            Keyword::Projcs => self.parse_projcs(element).map(Into::into),
            Keyword::Geoccs => self.parse_geoccs(element).map(Into::into),
            Keyword::VertCs => self.parse_vertcs(element).map(Into::into),
            Keyword::CompdCs => self.parse_compdcs(element).map(Into::into),
            _ => Err(Error::unexpected(
                "coordinate reference system",
                element.keyword,
                element.position,
            )),
        }
    }

    /// `AUTHORITY["name", "code"]`; the code may also be a bare number.
    fn parse_authority(&self, parent: &mut Element) -> Result<Option<Authority>> {
        let Some(mut element) = parent.pull_optional_element("AUTHORITY") else {
            return Ok(None);
        };
        let namespace = element.pull_string("authority name")?;
        let code = match element.pull_optional_string() {
            Some(code) => code,
            None => match element.pull_optional_number() {
                Some((_, raw)) => raw,
                None => element.pull_string("authority code")?,
            },
        };
        element.close()?;
        Ok(Some(Authority::new(namespace, code)))
    }

    /// `UNIT["name", factor]`, the factor converting to the base unit of
    /// `dimension`.
    fn parse_unit(&self, parent: &mut Element, dimension: Dimension) -> Result<Unit> {
        let mut element = parent.pull_element("UNIT")?;
        let position = element.position;
        let label = element.pull_string("unit name")?;
        let factor = element.pull_double("conversion factor")?;
        // Unit authorities are not retained.
        self.parse_authority(&mut element)?;
        element.close()?;
        if !(factor.is_finite() && factor > 0.0) {
            return Err(Error::InvalidObject(format!(
                "unit '{}' has invalid conversion factor {}",
                label, factor
            )));
        }
        self.resolve_unit(&label, factor, dimension, position)
    }

    /// Canonical unit for a label whose known unit agrees with the declared
    /// factor, else a unit defined by the factor (lenient mode only).
    fn resolve_unit(
        &self,
        label: &str,
        factor: f64,
        dimension: Dimension,
        position: usize,
    ) -> Result<Unit> {
        let declared = Unit::new(dimension, factor);
        let dialects = std::iter::once(self.dialect).chain(
            Citation::ALL
                .into_iter()
                .filter(|c| *c != self.dialect.citation())
                .map(UnitDialect::get),
        );
        let mut known = false;
        for dialect in dialects {
            if let Some(unit) = dialect.lookup(label) {
                known = true;
                if unit.approx_eq(&declared) {
                    return Ok(unit.clone());
                }
            }
        }
        if !known && self.options.strict_units {
            return Err(Error::UnknownUnitLabel {
                label: label.to_string(),
                position,
            });
        }
        debug!(label, factor, "unit label resolved from its conversion factor");
        Ok(declared.with_name(label))
    }

    fn parse_spheroid(&self, parent: &mut Element) -> Result<Ellipsoid> {
        let mut element = parent.pull_element("SPHEROID")?;
        let name = element.pull_string("name")?;
        let semi_major = element.pull_double("semi-major axis")?;
        let inverse_flattening = element.pull_double("inverse flattening")?;
        let authority = self.parse_authority(&mut element)?;
        element.close()?;
        trace!(name = %name, "SPHEROID");
        Ok(Ellipsoid::from_inverse_flattening(name, semi_major, inverse_flattening)?
            .with_authority(authority))
    }

    /// `PRIMEM["name", longitude]`, the longitude in `angular_unit`.
    fn parse_primem(&self, parent: &mut Element, angular_unit: &Unit) -> Result<PrimeMeridian> {
        let mut element = parent.pull_element("PRIMEM")?;
        let name = element.pull_string("name")?;
        let longitude = element.pull_double("longitude")?;
        let authority = self.parse_authority(&mut element)?;
        element.close()?;
        trace!(name = %name, "PRIMEM");
        Ok(PrimeMeridian::new(name, longitude, angular_unit.clone())?.with_authority(authority))
    }

    fn parse_towgs84(&self, parent: &mut Element) -> Result<Option<BursaWolfParameters>> {
        let Some(mut element) = parent.pull_optional_element("TOWGS84") else {
            return Ok(None);
        };
        let values = take_numbers(&mut element);
        element.close()?;
        Ok(Some(BursaWolfParameters::from_values(&values)?))
    }

    /// `DATUM["name", SPHEROID[...], TOWGS84[...]?, AUTHORITY[...]?]`.
    ///
    /// Without a `TOWGS84` element the shift may follow the spheroid as
    /// bare numbers, as Oracle writes it.
    fn parse_datum(&self, parent: &mut Element, prime_meridian: PrimeMeridian) -> Result<GeodeticDatum> {
        let mut element = parent.pull_element("DATUM")?;
        let name = element.pull_string("name")?;
        let ellipsoid = self.parse_spheroid(&mut element)?;
        let mut to_wgs84 = self.parse_towgs84(&mut element)?;
        if to_wgs84.is_none() && element.next_is_number() {
            let values = take_numbers(&mut element);
            to_wgs84 = Some(BursaWolfParameters::from_values(&values)?);
        }
        let authority = self.parse_authority(&mut element)?;
        element.close()?;
        trace!(name = %name, "DATUM");
        Ok(GeodeticDatum::new(name, ellipsoid, prime_meridian)
            .with_to_wgs84(to_wgs84)
            .with_authority(authority))
    }

    /// `VERT_DATUM["name", type]`, `type` being the legacy datum type code.
    fn parse_vert_datum(&self, parent: &mut Element) -> Result<VerticalDatum> {
        let mut element = parent.pull_element("VERT_DATUM")?;
        let name = element.pull_string("name")?;
        let position = element.peek().map(|c| c.position()).unwrap_or(element.end);
        let code = element.pull_integer("datum type")?;
        let datum_type = VerticalDatumType::from_legacy_code(code).ok_or_else(|| {
            Error::unexpected("vertical datum type code", code.to_string(), position)
        })?;
        let authority = self.parse_authority(&mut element)?;
        element.close()?;
        trace!(name = %name, "VERT_DATUM");
        Ok(VerticalDatum::new(name, datum_type).with_authority(authority))
    }

    /// `AXIS["name", DIRECTION]`; the direction may also be quoted.
    fn parse_axis(&self, mut element: Element, unit: Unit) -> Result<Axis> {
        let name = element.pull_string("axis name")?;
        let (direction, position) = match element.pull_optional_enumeration() {
            Some(direction) => direction,
            None => {
                let position = element.peek().map(|c| c.position()).unwrap_or(element.end);
                (element.pull_string("axis direction")?, position)
            }
        };
        let direction = AxisDirection::from_name(&direction)
            .ok_or_else(|| Error::unexpected("axis direction", direction, position))?;
        // Axis authorities are not retained.
        self.parse_authority(&mut element)?;
        element.close()?;
        Ok(Axis::new(name, direction, unit))
    }

    /// Every `AXIS` child in declaration order, `units(i)` giving the unit of
    /// the i-th axis. Falls back to `defaults` when none is declared.
    fn parse_coordinate_system(
        &self,
        parent: &mut Element,
        units: impl Fn(usize) -> Unit,
        defaults: &[(&str, AxisDirection)],
    ) -> Result<CoordinateSystem> {
        let mut axes = Vec::new();
        while let Some(element) = parent.pull_optional_element("AXIS") {
            axes.push(self.parse_axis(element, units(axes.len()))?);
        }
        if axes.is_empty() {
            axes = defaults
                .iter()
                .enumerate()
                .map(|(i, (name, direction))| Axis::new(*name, *direction, units(i)))
                .collect();
        }
        CoordinateSystem::new(axes)
    }

    /// `GEOGCS["name", DATUM[...], PRIMEM[...], UNIT[...], AXIS[...]*]`.
    ///
    /// The prime meridian is read in the CRS angular unit. A third axis is an
    /// ellipsoidal height in metres.
    fn parse_geogcs(&self, mut element: Element) -> Result<GeographicCrs> {
        let name = element.pull_string("name")?;
        let angular_unit = self.parse_unit(&mut element, Dimension::Angle)?;
        let prime_meridian = self.parse_primem(&mut element, &angular_unit)?;
        let datum = self.parse_datum(&mut element, prime_meridian)?;
        let cs = self.parse_coordinate_system(
            &mut element,
            |i| if i < 2 { angular_unit.clone() } else { unit::METRE },
            &[("Lon", AxisDirection::East), ("Lat", AxisDirection::North)],
        )?;
        let authority = self.parse_authority(&mut element)?;
        element.close()?;
        trace!(name = %name, "GEOGCS");
        Ok(GeographicCrs::new(name, datum, angular_unit, cs)?.with_authority(authority))
    }

    /// Every `PARAMETER["name", value]` child of `element`, in order.
    fn pull_parameters(&self, element: &mut Element) -> Result<Vec<(String, f64)>> {
        let mut declared = Vec::new();
        while let Some(mut parameter) = element.pull_optional_element("PARAMETER") {
            let name = parameter.pull_string("parameter name")?;
            let value = parameter.pull_double("parameter value")?;
            parameter.close()?;
            declared.push((name, value));
        }
        Ok(declared)
    }

    /// Semi-axes within `derived_parameter_epsilon` of the ellipsoid are the
    /// ellipsoid's own; they take its exact values, which the formatter
    /// leaves out.
    fn snap_semi_axes(&self, parameters: &mut ParameterGroup, ellipsoid: &Ellipsoid) {
        let epsilon = self.options.derived_parameter_epsilon;
        let major = ellipsoid.semi_major_axis();
        let minor = ellipsoid.semi_minor_axis();
        let derived = |name: &str, expected: f64| {
            parameters
                .value(name)
                .map_or(true, |v| is_derived_value(v, expected, epsilon))
        };
        if derived("semi_major", major) && derived("semi_minor", minor) {
            parameters.set(ParameterValue::new("semi_major", ParameterKind::Length, major));
            parameters.set(ParameterValue::new("semi_minor", ParameterKind::Length, minor));
        }
    }

    /// `PROJCS["name", GEOGCS[...], PROJECTION["method"], PARAMETER[...]*,
    /// UNIT[...], AXIS[...]*]`.
    ///
    /// Length parameters are read in the `PROJCS` unit and angular ones in
    /// the base CRS unit; both are handed to the factory in metres and
    /// degrees. The base ellipsoid supplies `semi_major` and `semi_minor`
    /// unless a `PARAMETER` overrides them.
    fn parse_projcs(&self, mut element: Element) -> Result<ProjectedCrs> {
        let name = element.pull_string("name")?;
        let base = self.parse_geogcs(element.pull_element("GEOGCS")?)?;
        let linear_unit = self.parse_unit(&mut element, Dimension::Length)?;

        let mut projection = element.pull_element("PROJECTION")?;
        let method_name = projection.pull_string("projection name")?;
        self.parse_authority(&mut projection)?;
        projection.close()?;
        let declared = self.pull_parameters(&mut element)?;
        let names: Vec<&str> = declared.iter().map(|(name, _)| name.as_str()).collect();
        let method = self.factory.method_for(&method_name, &names)?;

        let ellipsoid = base.datum().ellipsoid();
        let mut parameters = ParameterGroup::new()
            .with(ParameterValue::new(
                "semi_major",
                ParameterKind::Length,
                ellipsoid.semi_major_axis(),
            ))
            .with(ParameterValue::new(
                "semi_minor",
                ParameterKind::Length,
                ellipsoid.semi_minor_axis(),
            ));
        for (name, value) in declared {
            let descriptor = method.descriptor(&name).ok_or_else(|| {
                Error::invalid_parameter(&name, format!("not a parameter of {}", method.name))
            })?;
            let value = match descriptor.kind {
                ParameterKind::Length => linear_unit.convert(value, &unit::METRE)?,
                ParameterKind::Angle => base.angular_unit().convert(value, &unit::DEGREE)?,
                _ => value,
            };
            parameters.set(ParameterValue::new(&*descriptor.name, descriptor.kind, value));
        }
        self.snap_semi_axes(&mut parameters, ellipsoid);
        let conversion = self.factory.create_parameterized(method.name, parameters)?;

        let cs = self.parse_coordinate_system(
            &mut element,
            |_| linear_unit.clone(),
            &[("X", AxisDirection::East), ("Y", AxisDirection::North)],
        )?;
        let authority = self.parse_authority(&mut element)?;
        element.close()?;
        trace!(name = %name, method = conversion.method(), "PROJCS");
        Ok(ProjectedCrs::new(name, base, conversion, linear_unit, cs)?.with_authority(authority))
    }

    /// `GEOCCS["name", DATUM[...], PRIMEM[...], UNIT[...], AXIS[...]*]`; the
    /// prime meridian is in degrees.
    fn parse_geoccs(&self, mut element: Element) -> Result<GeocentricCrs> {
        let name = element.pull_string("name")?;
        let prime_meridian = self.parse_primem(&mut element, &unit::DEGREE)?;
        let datum = self.parse_datum(&mut element, prime_meridian)?;
        let linear_unit = self.parse_unit(&mut element, Dimension::Length)?;
        let cs = self.parse_coordinate_system(
            &mut element,
            |_| linear_unit.clone(),
            &[
                ("X", AxisDirection::Other),
                ("Y", AxisDirection::East),
                ("Z", AxisDirection::North),
            ],
        )?;
        let authority = self.parse_authority(&mut element)?;
        element.close()?;
        trace!(name = %name, "GEOCCS");
        Ok(GeocentricCrs::new(name, datum, linear_unit, cs)?.with_authority(authority))
    }

    fn parse_vertcs(&self, mut element: Element) -> Result<VerticalCrs> {
        let name = element.pull_string("name")?;
        let datum = self.parse_vert_datum(&mut element)?;
        let linear_unit = self.parse_unit(&mut element, Dimension::Length)?;
        let cs = self.parse_coordinate_system(
            &mut element,
            |_| linear_unit.clone(),
            &[("Z", AxisDirection::Up)],
        )?;
        let authority = self.parse_authority(&mut element)?;
        element.close()?;
        trace!(name = %name, "VERT_CS");
        Ok(VerticalCrs::new(name, datum, linear_unit, cs)?.with_authority(authority))
    }

    /// `COMPD_CS["name", head CRS, tail CRS]`.
    fn parse_compdcs(&self, mut element: Element) -> Result<CompoundCrs> {
        let name = element.pull_string("name")?;
        let authority = self.parse_authority(&mut element)?;
        let mut components = Vec::with_capacity(2);
        for what in ["head CRS", "tail CRS"] {
            let component = element.pull_any_element(what)?;
            let keyword = keyword_of(&component)?;
            components.push(self.parse_crs(component, keyword)?);
        }
        element.close()?;
        trace!(name = %name, "COMPD_CS");
        Ok(CompoundCrs::new(name, components)?.with_authority(authority))
    }
}

fn keyword_of(element: &Element) -> Result<Keyword> {
    Keyword::lookup(&element.keyword).ok_or_else(|| Error::UnknownKeyword {
        keyword: element.keyword.clone(),
        position: element.position,
    })
}

/// Parent holding `element` as its only child, so component builders can
/// pull it by keyword.
fn wrap(element: Element) -> Element {
    let mut parent = Element::new("", element.position);
    parent.end = element.end;
    parent.children.push(crate::element::Child::Element(element));
    parent
}

fn take_numbers(element: &mut Element) -> Vec<f64> {
    std::iter::from_fn(|| element.pull_optional_number().map(|(value, _)| value)).collect()
}
