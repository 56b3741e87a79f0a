//! WKT formatter.
//!
//! Every element is written as `[name, body..., AUTHORITY[...]]` first and
//! its keyword inserted in front once the body is known, since only the
//! object's [`Formattable::format_wkt`] knows which keyword it is.

use crate::error::{Error, Result};
use crate::options::FormatOptions;
use crate::parameter::{is_derived_value, ParameterGroup, ParameterKind};
use crate::parser::ParsedObject;
use crate::referencing::{
    Authority, Axis, BursaWolfParameters, CompoundCrs, CoordinateReferenceSystem, Ellipsoid,
    GeocentricCrs, GeodeticDatum, GeographicCrs, PrimeMeridian, ProjectedCrs, VerticalCrs,
    VerticalDatum,
};
use crate::symbols::Symbols;
use crate::transform::{MathTransform, ParameterizedTransform};
use meridian_units::{unit, Citation, Unit, UnitDialect};

/// An object with a WKT representation.
pub trait Formattable {
    /// Write the body of this element (everything between the name and the
    /// authority) and return its keyword.
    fn format_wkt(&self, formatter: &mut Formatter) -> Result<&'static str>;

    /// Quoted name written right after the opening bracket.
    fn wkt_name(&self) -> Option<&str> {
        None
    }

    /// Authority written as the last child.
    fn wkt_authority(&self) -> Option<&Authority> {
        None
    }

    /// Single-line WKT in the default dialect.
    fn to_wkt(&self) -> Result<String>
    where
        Self: Sized,
    {
        format_with(self, &FormatOptions::default())
    }
}

/// Format `object` on one line with the unit labels of `dialect`.
pub fn format(object: &dyn Formattable, dialect: Citation) -> Result<String> {
    format_with(object, &FormatOptions::default().with_dialect(dialect))
}

pub fn format_with(object: &dyn Formattable, options: &FormatOptions) -> Result<String> {
    Formatter::new(*options).format(object)
}

pub struct Formatter {
    buffer: String,
    symbols: Symbols,
    dialect: &'static UnitDialect,
    indentation: usize,
    margin: usize,
    /// Whether a nested element was written in the current element.
    line_changed: bool,
    epsilon: f64,
}

impl Formatter {
    pub fn new(options: FormatOptions) -> Self {
        Self {
            buffer: String::new(),
            symbols: options.symbols.symbols(),
            dialect: UnitDialect::get(options.dialect),
            indentation: options.indentation,
            margin: 0,
            line_changed: false,
            epsilon: options.derived_parameter_epsilon,
        }
    }

    pub fn format(&mut self, object: &dyn Formattable) -> Result<String> {
        self.buffer.clear();
        self.margin = 0;
        self.line_changed = false;
        let result = self.append(object);
        let text = std::mem::take(&mut self.buffer);
        result.map(|()| text)
    }

    pub fn dialect(&self) -> &'static UnitDialect {
        self.dialect
    }

    fn append_separator(&mut self, new_line: bool) {
        match self.buffer.trim_end().chars().last() {
            None => return,
            Some(c) if self.symbols.is_open(c) => return,
            Some(_) => {}
        }
        self.buffer.push(self.symbols.separator);
        if new_line && self.indentation > 0 {
            self.buffer.push('\n');
            self.buffer.extend(std::iter::repeat(' ').take(self.margin));
        } else {
            self.buffer.push(self.symbols.space);
        }
    }

    fn push_quoted(&mut self, text: &str) {
        let quote = self.symbols.quote;
        self.buffer.push(quote);
        for c in text.chars() {
            if c == quote {
                self.buffer.push(quote);
            }
            self.buffer.push(c);
        }
        self.buffer.push(quote);
    }

    /// Append a nested element.
    pub fn append(&mut self, object: &dyn Formattable) -> Result<()> {
        self.append_separator(true);
        let base = self.buffer.len();
        self.buffer.push(self.symbols.open);
        if let Some(name) = object.wkt_name() {
            self.push_quoted(name);
        }
        self.margin += self.indentation;
        self.line_changed = false;
        let keyword = object.format_wkt(self)?;
        self.buffer.insert_str(base, keyword);
        if let Some(authority) = object.wkt_authority() {
            self.append_separator(self.line_changed);
            self.buffer.push_str("AUTHORITY");
            self.buffer.push(self.symbols.open);
            self.push_quoted(&authority.namespace);
            self.buffer.push(self.symbols.separator);
            self.push_quoted(&authority.code);
            self.buffer.push(self.symbols.close);
        }
        self.buffer.push(self.symbols.close);
        self.line_changed = true;
        self.margin -= self.indentation;
        Ok(())
    }

    pub fn append_text(&mut self, text: &str) {
        self.append_separator(false);
        self.push_quoted(text);
    }

    pub fn append_number(&mut self, value: f64) {
        self.append_separator(false);
        self.buffer.push_str(&format_number(value));
    }

    pub fn append_integer(&mut self, value: i64) {
        self.append_separator(false);
        self.buffer.push_str(&value.to_string());
    }

    /// Bare word such as an axis direction.
    pub fn append_enumeration(&mut self, word: &str) {
        self.append_separator(false);
        self.buffer.push_str(word);
    }

    /// `UNIT["label", factor]`, the label taken from the unit's own name or
    /// from the dialect.
    pub fn append_unit(&mut self, unit: &Unit) -> Result<()> {
        let label = match unit.name() {
            Some(name) => name.to_string(),
            None => self
                .dialect
                .label(unit)
                .map_err(|e| Error::Format(e.to_string()))?
                .to_string(),
        };
        self.append_separator(self.line_changed);
        self.buffer.push_str("UNIT");
        self.buffer.push(self.symbols.open);
        self.push_quoted(&label);
        self.append_number(unit.factor());
        self.buffer.push(self.symbols.close);
        Ok(())
    }

    /// `PARAMETER["name", value]` for every value of `group` not rejected by
    /// `skip`. Lengths and angles are written in `linear_unit` and
    /// `angular_unit` when given.
    pub fn append_parameters(
        &mut self,
        group: &ParameterGroup,
        linear_unit: Option<&Unit>,
        angular_unit: Option<&Unit>,
        skip: impl Fn(&str) -> bool,
    ) -> Result<()> {
        for parameter in group.iter().filter(|p| !skip(p.name())) {
            let target = match parameter.kind() {
                ParameterKind::Length => linear_unit.filter(|u| **u != unit::METRE),
                ParameterKind::Angle => angular_unit.filter(|u| **u != unit::DEGREE),
                _ => None,
            };
            self.append_separator(true);
            self.buffer.push_str("PARAMETER");
            self.buffer.push(self.symbols.open);
            self.push_quoted(parameter.name());
            match (target, parameter.kind()) {
                (Some(target), kind) => {
                    let canonical = kind.unit().unwrap_or(unit::ONE);
                    let value = convert_trimmed(parameter.value(), &canonical, target)?;
                    self.append_number(value);
                }
                (None, ParameterKind::Integer) if is_integral(parameter.value()) => {
                    self.append_integer(parameter.value() as i64);
                }
                (None, _) => self.append_number(parameter.value()),
            }
            self.buffer.push(self.symbols.close);
            self.line_changed = true;
        }
        Ok(())
    }

    fn is_derived(&self, value: Option<f64>, expected: f64) -> bool {
        value.map_or(true, |v| is_derived_value(v, expected, self.epsilon))
    }
}

fn is_integral(value: f64) -> bool {
    value.fract() == 0.0 && value.abs() < 1e15
}

/// Shortest round-trippable spelling; C-style exponent for very small or
/// large magnitudes.
fn format_number(value: f64) -> String {
    if is_integral(value) {
        return format!("{}", value as i64);
    }
    format!("{:?}", value)
}

/// Remove the noise a unit conversion leaves in the last decimal places:
/// the value rounded to the fewest fraction digits (at most 9) that
/// `reproduces` accepts, or the value unchanged.
pub fn trim_fraction_digits(value: f64, reproduces: impl Fn(f64) -> bool) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let mut scale = 1.0;
    for _ in 0..=9 {
        let rounded = (value * scale).round() / scale;
        if reproduces(rounded) {
            return rounded;
        }
        scale *= 10.0;
    }
    value
}

/// How many representable neighbours on each side of a converted value are
/// tried when it does not read back exactly.
const READ_BACK_STEPS: usize = 16;

/// `value` converted from `from` into `to` such that reading it back in `to`
/// gives `value` again: the shortest trimmed spelling when one exists, else
/// the nearest neighbour of the converted value that reads back exactly.
///
/// A value read from WKT in `to` always has such a neighbour. Otherwise the
/// candidate reading back closest to `value` is used.
fn convert_trimmed(value: f64, from: &Unit, to: &Unit) -> Result<f64> {
    let read_back = |candidate: f64| to.convert(candidate, from).ok();
    let converted = from.convert(value, to)?;
    let trimmed = trim_fraction_digits(converted, |candidate| read_back(candidate) == Some(value));
    if read_back(trimmed) == Some(value) || !converted.is_finite() {
        return Ok(trimmed);
    }

    let mut best = (converted, f64::INFINITY);
    let (mut up, mut down) = (converted, converted);
    for _ in 0..=READ_BACK_STEPS {
        for candidate in [up, down] {
            let error = read_back(candidate).map_or(f64::INFINITY, |v| (v - value).abs());
            if error == 0.0 {
                return Ok(candidate);
            }
            if error < best.1 {
                best = (candidate, error);
            }
        }
        up = up.next_up();
        down = down.next_down();
    }
    tracing::debug!(
        value,
        written = best.0,
        unit = %to,
        "no value reads back exactly, writing the nearest"
    );
    Ok(best.0)
}

impl Formattable for Ellipsoid {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        f.append_number(self.semi_major_axis());
        let ivf = self.inverse_flattening();
        f.append_number(if ivf.is_finite() { ivf } else { 0.0 });
        Ok("SPHEROID")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

/// A prime meridian written in the angular unit of the enclosing CRS.
struct PrimeMeridianIn<'a> {
    prime_meridian: &'a PrimeMeridian,
    unit: &'a Unit,
}

impl Formattable for PrimeMeridianIn<'_> {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        let pm = self.prime_meridian;
        if pm.unit() == self.unit {
            f.append_number(pm.longitude());
        } else {
            f.append_number(convert_trimmed(pm.longitude(), pm.unit(), self.unit)?);
        }
        Ok("PRIMEM")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.prime_meridian.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.prime_meridian.authority()
    }
}

impl Formattable for PrimeMeridian {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        PrimeMeridianIn {
            prime_meridian: self,
            unit: &unit::DEGREE,
        }
        .format_wkt(f)
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

impl Formattable for BursaWolfParameters {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        for value in self.values() {
            f.append_number(value);
        }
        Ok("TOWGS84")
    }
}

impl Formattable for GeodeticDatum {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        f.append(self.ellipsoid())?;
        if let Some(to_wgs84) = self.to_wgs84() {
            f.append(to_wgs84)?;
        }
        Ok("DATUM")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

impl Formattable for VerticalDatum {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        f.append_integer(self.datum_type().legacy_code());
        Ok("VERT_DATUM")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

impl Formattable for Axis {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        f.append_enumeration(self.direction().name());
        Ok("AXIS")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }
}

fn append_axes(f: &mut Formatter, axes: &[Axis]) -> Result<()> {
    for axis in axes {
        f.append(axis)?;
    }
    Ok(())
}

impl Formattable for GeographicCrs {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        f.append(self.datum())?;
        f.append(&PrimeMeridianIn {
            prime_meridian: self.datum().prime_meridian(),
            unit: self.angular_unit(),
        })?;
        f.append_unit(self.angular_unit())?;
        append_axes(f, self.coordinate_system().axes())?;
        Ok("GEOGCS")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

/// `PROJECTION["method"]`
struct Projection<'a>(&'a str);

impl Formattable for Projection<'_> {
    fn format_wkt(&self, _: &mut Formatter) -> Result<&'static str> {
        Ok("PROJECTION")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.0)
    }
}

impl Formattable for ProjectedCrs {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        let base = self.base();
        let ellipsoid = base.datum().ellipsoid();
        let conversion = self.conversion();
        let parameters = conversion.parameters();
        let derived = f.is_derived(parameters.value("semi_major"), ellipsoid.semi_major_axis())
            && f.is_derived(parameters.value("semi_minor"), ellipsoid.semi_minor_axis());

        f.append(base)?;
        f.append(&Projection(conversion.method()))?;
        f.append_parameters(
            parameters,
            Some(self.linear_unit()),
            Some(base.angular_unit()),
            |name| {
                derived
                    && (name.eq_ignore_ascii_case("semi_major")
                        || name.eq_ignore_ascii_case("semi_minor"))
            },
        )?;
        f.append_unit(self.linear_unit())?;
        append_axes(f, self.coordinate_system().axes())?;
        Ok("PROJCS")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

impl Formattable for GeocentricCrs {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        f.append(self.datum())?;
        f.append(self.datum().prime_meridian())?;
        f.append_unit(self.linear_unit())?;
        append_axes(f, self.coordinate_system().axes())?;
        Ok("GEOCCS")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

impl Formattable for VerticalCrs {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        f.append(self.datum())?;
        f.append_unit(self.linear_unit())?;
        append_axes(f, self.coordinate_system().axes())?;
        Ok("VERT_CS")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

impl Formattable for CompoundCrs {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        for component in self.components() {
            f.append(component)?;
        }
        Ok("COMPD_CS")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.name())
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.authority()
    }
}

impl CoordinateReferenceSystem {
    fn as_formattable(&self) -> &dyn Formattable {
        match self {
            CoordinateReferenceSystem::Geographic(crs) => crs,
            CoordinateReferenceSystem::Projected(crs) => crs,
            CoordinateReferenceSystem::Geocentric(crs) => crs,
            CoordinateReferenceSystem::Vertical(crs) => crs,
            CoordinateReferenceSystem::Compound(crs) => crs,
        }
    }
}

impl Formattable for CoordinateReferenceSystem {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        self.as_formattable().format_wkt(f)
    }

    fn wkt_name(&self) -> Option<&str> {
        self.as_formattable().wkt_name()
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.as_formattable().wkt_authority()
    }
}

impl Formattable for ParameterizedTransform {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        f.append_parameters(self.parameters(), None, None, |_| false)?;
        Ok("PARAM_MT")
    }

    fn wkt_name(&self) -> Option<&str> {
        Some(self.method())
    }
}

impl Formattable for MathTransform {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        match self {
            MathTransform::Parameterized(transform) => transform.format_wkt(f),
            MathTransform::Concatenated(steps) => {
                for step in steps {
                    f.append(step)?;
                }
                Ok("CONCAT_MT")
            }
            MathTransform::Inverse(inner) => {
                f.append(inner.as_ref())?;
                Ok("INVERSE_MT")
            }
            MathTransform::PassThrough {
                first_affected,
                transform,
                trailing,
            } => {
                f.append_integer(*first_affected as i64);
                f.append(transform.as_ref())?;
                if *trailing > 0 {
                    f.append_integer(*trailing as i64);
                }
                Ok("PASSTHROUGH_MT")
            }
        }
    }

    fn wkt_name(&self) -> Option<&str> {
        match self {
            MathTransform::Parameterized(transform) => transform.wkt_name(),
            _ => None,
        }
    }
}

impl ParsedObject {
    fn as_formattable(&self) -> &dyn Formattable {
        match self {
            ParsedObject::Crs(crs) => crs,
            ParsedObject::MathTransform(transform) => transform,
            ParsedObject::GeodeticDatum(datum) => datum,
            ParsedObject::VerticalDatum(datum) => datum,
            ParsedObject::Ellipsoid(ellipsoid) => ellipsoid,
            ParsedObject::PrimeMeridian(pm) => pm,
            ParsedObject::Axis(axis) => axis,
            ParsedObject::ToWgs84(shift) => shift,
        }
    }
}

impl Formattable for ParsedObject {
    fn format_wkt(&self, f: &mut Formatter) -> Result<&'static str> {
        self.as_formattable().format_wkt(f)
    }

    fn wkt_name(&self) -> Option<&str> {
        self.as_formattable().wkt_name()
    }

    fn wkt_authority(&self) -> Option<&Authority> {
        self.as_formattable().wkt_authority()
    }
}
