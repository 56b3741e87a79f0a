//! Operation methods and the math-transform factory.
//!
//! The factory resolves method names, validates parameter groups and builds
//! the descriptive [`MathTransform`] graph. It does not evaluate projections.

use crate::error::{Error, Result};
use crate::parameter::{ParameterDescriptor, ParameterGroup, ParameterKind, ParameterValue};
use crate::transform::{MathTransform, ParameterizedTransform};
use std::borrow::Cow;

/// How a method derives its source and target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Fixed,
    /// `num_col - 1` to `num_row - 1`, with `elt_<row>_<col>` parameters.
    Matrix,
    /// `dim` to 3.
    ToGeocentric,
    /// 3 to `dim`.
    FromGeocentric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationMethod {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub parameters: Vec<ParameterDescriptor>,
    pub source_dimensions: usize,
    pub target_dimensions: usize,
    shape: Shape,
}

impl OperationMethod {
    fn projection(
        name: &'static str,
        aliases: &'static [&'static str],
        specific: Vec<ParameterDescriptor>,
    ) -> Self {
        let mut parameters = vec![semi_major(), semi_minor()];
        parameters.extend(specific);
        Self {
            name,
            aliases,
            parameters,
            source_dimensions: 2,
            target_dimensions: 2,
            shape: Shape::Fixed,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        same_name(self.name, name) || self.aliases.iter().any(|a| same_name(a, name))
    }

    /// Descriptor for `name` (or one of its aliases).
    pub fn descriptor(&self, name: &str) -> Option<ParameterDescriptor> {
        if let Some(d) = self.parameters.iter().find(|d| d.matches(name)) {
            return Some(d.clone());
        }
        if self.shape == Shape::Matrix {
            let (row, col) = matrix_element(name)?;
            let mut d = ParameterDescriptor::new("elt", ParameterKind::Dimensionless)
                .default_value(if row == col { 1.0 } else { 0.0 });
            d.name = Cow::Owned(format!("elt_{}_{}", row, col));
            return Some(d);
        }
        None
    }

    /// Whether every name in `parameters` is one of this method's parameters.
    pub fn accepts(&self, parameters: &[&str]) -> bool {
        parameters.iter().all(|name| self.descriptor(name).is_some())
    }

    fn dimensions(&self, group: &ParameterGroup) -> Result<(usize, usize)> {
        let integer = |name: &str, default: f64| group.value(name).unwrap_or(default) as usize;
        match self.shape {
            Shape::Fixed => Ok((self.source_dimensions, self.target_dimensions)),
            Shape::Matrix => {
                let rows = integer("num_row", 3.0);
                let cols = integer("num_col", 3.0);
                for value in group {
                    if let Some((row, col)) = matrix_element(value.name()) {
                        if row >= rows || col >= cols {
                            return Err(Error::invalid_parameter(
                                value.name(),
                                format!("outside a {}x{} matrix", rows, cols),
                            ));
                        }
                    }
                }
                Ok((cols - 1, rows - 1))
            }
            Shape::ToGeocentric => Ok((integer("dim", 3.0), 3)),
            Shape::FromGeocentric => Ok((3, integer("dim", 3.0))),
        }
    }
}

/// Names compare case-insensitively, with spaces and underscores equivalent.
fn same_name(a: &str, b: &str) -> bool {
    let norm = |c: char| if c == ' ' { '_' } else { c.to_ascii_lowercase() };
    a.len() == b.len() && a.chars().map(norm).eq(b.chars().map(norm))
}

fn matrix_element(name: &str) -> Option<(usize, usize)> {
    let rest = name.get(..4)?.eq_ignore_ascii_case("elt_").then(|| &name[4..])?;
    let (row, col) = rest.split_once('_')?;
    Some((row.parse().ok()?, col.parse().ok()?))
}

/// Collaborator that turns method names and parameters into transforms.
pub trait MathTransformFactory: Send + Sync {
    /// Operation method registered under `name`.
    fn method(&self, name: &str) -> Result<&OperationMethod>;

    /// Operation method registered under `name` that knows every parameter
    /// in `parameters`. Some spellings (ESRI `Mercator`) name several
    /// methods told apart only by their parameters.
    fn method_for(&self, name: &str, _parameters: &[&str]) -> Result<&OperationMethod> {
        self.method(name)
    }

    /// Parameter group holding every default value of `method`.
    fn default_parameters(&self, method: &str) -> Result<ParameterGroup> {
        let method = self.method(method)?;
        Ok(method
            .parameters
            .iter()
            .filter_map(|d| {
                d.default
                    .map(|value| ParameterValue::new(&*d.name, d.kind, value))
            })
            .collect())
    }

    fn create_parameterized(
        &self,
        method: &str,
        parameters: ParameterGroup,
    ) -> Result<ParameterizedTransform>;

    fn create_concatenated(&self, steps: Vec<MathTransform>) -> Result<MathTransform> {
        MathTransform::concatenated(steps)
    }

    fn create_inverse(&self, transform: MathTransform) -> Result<MathTransform> {
        Ok(transform.inverse())
    }

    fn create_pass_through(
        &self,
        first_affected: usize,
        transform: MathTransform,
        trailing: usize,
    ) -> Result<MathTransform> {
        Ok(MathTransform::pass_through(first_affected, transform, trailing))
    }
}

/// Largest `num_row`/`num_col` an affine matrix may declare.
const MAX_MATRIX_SIZE: f64 = 16.0;

/// Factory knowing the common map projections plus the affine and
/// geographic/geocentric conversions.
#[derive(Debug, Clone)]
pub struct DefaultMathTransformFactory {
    methods: Vec<OperationMethod>,
}

impl Default for DefaultMathTransformFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultMathTransformFactory {
    pub fn new() -> Self {
        let methods = vec![
            OperationMethod::projection(
                "Mercator_1SP",
                &["Mercator", "Mercator (variant A)"],
                vec![
                    latitude_of_origin(),
                    central_meridian(),
                    scale_factor(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Mercator_2SP",
                &["Mercator", "Mercator (variant B)"],
                vec![
                    standard_parallel_1(),
                    latitude_of_origin(),
                    central_meridian(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Popular_Visualisation_Pseudo_Mercator",
                &["Mercator_Auxiliary_Sphere", "Pseudo_Mercator"],
                vec![
                    latitude_of_origin(),
                    central_meridian(),
                    standard_parallel_1(),
                    scale_factor(),
                    false_easting(),
                    false_northing(),
                    ParameterDescriptor::new("auxiliary_sphere_type", ParameterKind::Integer)
                        .default_value(0.0)
                        .range(0.0, 3.0),
                ],
            ),
            OperationMethod::projection(
                "Transverse_Mercator",
                &["Gauss_Kruger"],
                vec![
                    latitude_of_origin(),
                    central_meridian(),
                    scale_factor(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Lambert_Conformal_Conic_1SP",
                &["Lambert Conic Conformal (1SP)"],
                vec![
                    latitude_of_origin(),
                    central_meridian(),
                    scale_factor(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Lambert_Conformal_Conic_2SP",
                &["Lambert_Conformal_Conic", "Lambert Conic Conformal (2SP)"],
                vec![
                    latitude_of_origin(),
                    central_meridian(),
                    standard_parallel_1(),
                    standard_parallel_2(),
                    scale_factor(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Albers_Conic_Equal_Area",
                &["Albers", "Albers Equal Area"],
                vec![
                    latitude_of_origin(),
                    central_meridian(),
                    standard_parallel_1(),
                    standard_parallel_2(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Polar_Stereographic",
                &["Stereographic_North_Pole", "Stereographic_South_Pole"],
                vec![
                    latitude_of_origin().default_value(90.0),
                    central_meridian(),
                    scale_factor(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Polar_Stereographic_Variant_B",
                &[
                    "Polar Stereographic (variant B)",
                    "Stereographic_North_Pole",
                    "Stereographic_South_Pole",
                ],
                vec![
                    standard_parallel_1().default_value(90.0),
                    central_meridian(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Oblique_Stereographic",
                &["Double_Stereographic"],
                vec![
                    latitude_of_origin(),
                    central_meridian(),
                    scale_factor(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Equirectangular",
                &["Equidistant_Cylindrical", "Plate_Carree"],
                vec![
                    standard_parallel_1(),
                    latitude_of_origin(),
                    central_meridian(),
                    false_easting(),
                    false_northing(),
                ],
            ),
            OperationMethod::projection(
                "Sinusoidal",
                &[],
                vec![central_meridian(), false_easting(), false_northing()],
            ),
            OperationMethod {
                name: "Ellipsoid_To_Geocentric",
                aliases: &["Geographic/geocentric conversions", "Geographic_To_Geocentric"],
                parameters: vec![semi_major(), semi_minor(), dim()],
                source_dimensions: 3,
                target_dimensions: 3,
                shape: Shape::ToGeocentric,
            },
            OperationMethod {
                name: "Geocentric_To_Ellipsoid",
                aliases: &["Geocentric_To_Geographic"],
                parameters: vec![semi_major(), semi_minor(), dim()],
                source_dimensions: 3,
                target_dimensions: 3,
                shape: Shape::FromGeocentric,
            },
            OperationMethod {
                name: "Affine",
                aliases: &["Affine general parametric transformation"],
                parameters: vec![
                    ParameterDescriptor::new("num_row", ParameterKind::Integer)
                        .default_value(3.0)
                        .range(2.0, MAX_MATRIX_SIZE),
                    ParameterDescriptor::new("num_col", ParameterKind::Integer)
                        .default_value(3.0)
                        .range(2.0, MAX_MATRIX_SIZE),
                ],
                source_dimensions: 2,
                target_dimensions: 2,
                shape: Shape::Matrix,
            },
        ];
        Self { methods }
    }

    pub fn methods(&self) -> &[OperationMethod] {
        &self.methods
    }
}

impl MathTransformFactory for DefaultMathTransformFactory {
    fn method(&self, name: &str) -> Result<&OperationMethod> {
        self.methods
            .iter()
            .find(|m| m.matches(name))
            .ok_or_else(|| Error::UnknownProjectionMethod(name.to_string()))
    }

    fn method_for(&self, name: &str, parameters: &[&str]) -> Result<&OperationMethod> {
        let mut candidates = self.methods.iter().filter(|m| m.matches(name));
        let first = candidates
            .next()
            .ok_or_else(|| Error::UnknownProjectionMethod(name.to_string()))?;
        if first.accepts(parameters) {
            return Ok(first);
        }
        Ok(candidates.find(|m| m.accepts(parameters)).unwrap_or(first))
    }

    fn create_parameterized(
        &self,
        method: &str,
        parameters: ParameterGroup,
    ) -> Result<ParameterizedTransform> {
        let names: Vec<&str> = parameters.iter().map(|p| p.name()).collect();
        let method = self.method_for(method, &names)?;

        let mut resolved = ParameterGroup::new();
        for value in &parameters {
            let descriptor = method.descriptor(value.name()).ok_or_else(|| {
                Error::invalid_parameter(
                    value.name(),
                    format!("not a parameter of {}", method.name),
                )
            })?;
            descriptor
                .validate(value.value())
                .map_err(|reason| Error::invalid_parameter(&*descriptor.name, reason))?;
            resolved.set(ParameterValue::new(
                &*descriptor.name,
                descriptor.kind,
                value.value(),
            ));
        }

        if let Some(missing) = method
            .parameters
            .iter()
            .find(|d| d.is_required() && resolved.get(&d.name).is_none())
        {
            return Err(Error::invalid_parameter(
                &*missing.name,
                format!("required by {}", method.name),
            ));
        }

        if let (Some(major), Some(minor)) =
            (resolved.value("semi_major"), resolved.value("semi_minor"))
        {
            if minor > major {
                return Err(Error::invalid_parameter(
                    "semi_minor",
                    format!("{} exceeds semi_major {}", minor, major),
                ));
            }
        }

        let (source, target) = method.dimensions(&resolved)?;
        tracing::trace!(
            method = method.name,
            parameters = resolved.len(),
            "created parameterized transform"
        );
        Ok(ParameterizedTransform::new(
            method.name,
            source,
            target,
            resolved,
        ))
    }
}

fn semi_major() -> ParameterDescriptor {
    ParameterDescriptor::new("semi_major", ParameterKind::Length)
        .aliases(&["semi_major_axis"])
        .minimum(0.0)
}

fn semi_minor() -> ParameterDescriptor {
    ParameterDescriptor::new("semi_minor", ParameterKind::Length)
        .aliases(&["semi_minor_axis"])
        .minimum(0.0)
}

fn latitude_of_origin() -> ParameterDescriptor {
    ParameterDescriptor::new("latitude_of_origin", ParameterKind::Angle)
        .aliases(&["latitude_of_center"])
        .default_value(0.0)
        .range(-90.0, 90.0)
}

fn central_meridian() -> ParameterDescriptor {
    ParameterDescriptor::new("central_meridian", ParameterKind::Angle)
        .aliases(&["longitude_of_center", "longitude_of_origin"])
        .default_value(0.0)
        .range(-360.0, 360.0)
}

fn standard_parallel_1() -> ParameterDescriptor {
    ParameterDescriptor::new("standard_parallel_1", ParameterKind::Angle)
        .default_value(0.0)
        .range(-90.0, 90.0)
}

fn standard_parallel_2() -> ParameterDescriptor {
    ParameterDescriptor::new("standard_parallel_2", ParameterKind::Angle)
        .default_value(0.0)
        .range(-90.0, 90.0)
}

fn scale_factor() -> ParameterDescriptor {
    ParameterDescriptor::new("scale_factor", ParameterKind::Scale)
        .default_value(1.0)
        .minimum(0.0)
}

fn false_easting() -> ParameterDescriptor {
    ParameterDescriptor::new("false_easting", ParameterKind::Length).default_value(0.0)
}

fn false_northing() -> ParameterDescriptor {
    ParameterDescriptor::new("false_northing", ParameterKind::Length).default_value(0.0)
}

fn dim() -> ParameterDescriptor {
    ParameterDescriptor::new("dim", ParameterKind::Integer)
        .default_value(3.0)
        .range(2.0, 3.0)
}
