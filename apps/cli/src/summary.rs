//! Object summaries printed by `meridian inspect`.

use meridian_units::{Unit, UnitDialect};
use meridian_wkt::referencing::CoordinateSystem;
use meridian_wkt::{CoordinateReferenceSystem, Formattable, ParsedObject};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct AxisSummary {
    pub name: String,
    pub direction: &'static str,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub axes: Vec<AxisSummary>,
}

impl Summary {
    /// Summary of `object`; unit labels come from `dialect`.
    pub fn of(object: &ParsedObject, dialect: &UnitDialect) -> Self {
        let mut summary = Summary {
            kind: object.kind(),
            name: object.wkt_name().map(str::to_string),
            authority: object.wkt_authority().map(|a| a.to_string()),
            dimension: None,
            datum: None,
            projection: None,
            source_dimensions: None,
            target_dimensions: None,
            axes: Vec::new(),
        };
        match object {
            ParsedObject::Crs(crs) => {
                summary.dimension = Some(crs.dimension());
                summary.datum = datum_name(crs);
                if let CoordinateReferenceSystem::Projected(projected) = crs {
                    summary.projection = Some(projected.conversion().method().to_string());
                }
                summary.axes = axes(&crs.coordinate_system(), dialect);
            }
            ParsedObject::MathTransform(transform) => {
                summary.source_dimensions = Some(transform.source_dimensions());
                summary.target_dimensions = Some(transform.target_dimensions());
            }
            ParsedObject::Axis(axis) => {
                summary.axes = vec![AxisSummary {
                    name: axis.name().to_string(),
                    direction: axis.direction().name(),
                    unit: unit_label(axis.unit(), dialect),
                }];
            }
            _ => {}
        }
        summary
    }
}

fn datum_name(crs: &CoordinateReferenceSystem) -> Option<String> {
    match crs {
        CoordinateReferenceSystem::Vertical(vertical) => Some(vertical.datum().name().to_string()),
        CoordinateReferenceSystem::Compound(_) => None,
        other => other.geodetic_datum().map(|d| d.name().to_string()),
    }
}

fn axes(cs: &CoordinateSystem, dialect: &UnitDialect) -> Vec<AxisSummary> {
    cs.axes()
        .iter()
        .map(|axis| AxisSummary {
            name: axis.name().to_string(),
            direction: axis.direction().name(),
            unit: unit_label(axis.unit(), dialect),
        })
        .collect()
}

fn unit_label(unit: &Unit, dialect: &UnitDialect) -> String {
    match unit.name() {
        Some(name) => name.to_string(),
        None => dialect
            .find_label(unit)
            .map(str::to_string)
            .unwrap_or_else(|| unit.to_string()),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kind: {}", self.kind)?;
        if let Some(name) = &self.name {
            writeln!(f, "Name: {}", name)?;
        }
        if let Some(authority) = &self.authority {
            writeln!(f, "Authority: {}", authority)?;
        }
        if let Some(dimension) = self.dimension {
            writeln!(f, "Dimension: {}", dimension)?;
        }
        if let Some(datum) = &self.datum {
            writeln!(f, "Datum: {}", datum)?;
        }
        if let Some(projection) = &self.projection {
            writeln!(f, "Projection: {}", projection)?;
        }
        if let (Some(source), Some(target)) = (self.source_dimensions, self.target_dimensions) {
            writeln!(f, "Dimensions: {} -> {}", source, target)?;
        }
        if !self.axes.is_empty() {
            writeln!(f, "Axes:")?;
            for axis in &self.axes {
                writeln!(f, "  {} ({}, {})", axis.name, axis.direction, axis.unit)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_units::Citation;
    use meridian_wkt::Parser;

    const UTM: &str = r#"PROJCS["WGS 84 / UTM zone 32N",
        GEOGCS["WGS 84",
            DATUM["WGS_1984", SPHEROID["WGS 84", 6378137, 298.257223563]],
            PRIMEM["Greenwich", 0],
            UNIT["degree", 0.0174532925199433]],
        PROJECTION["Transverse_Mercator"],
        PARAMETER["central_meridian", 9],
        PARAMETER["scale_factor", 0.9996],
        PARAMETER["false_easting", 500000],
        UNIT["metre", 1],
        AUTHORITY["EPSG", "32632"]]"#;

    #[test]
    fn projected_summary() {
        let object = Parser::default().parse_object(UTM).unwrap();
        let summary = Summary::of(&object, UnitDialect::get(Citation::Esri));
        assert_eq!(summary.kind, "projected CRS");
        assert_eq!(summary.authority.as_deref(), Some("EPSG:32632"));
        assert_eq!(summary.projection.as_deref(), Some("Transverse_Mercator"));
        assert_eq!(summary.datum.as_deref(), Some("WGS_1984"));
        assert_eq!(summary.axes.len(), 2);
        assert_eq!(summary.axes[0].unit, "Meter");

        let text = summary.to_string();
        assert!(text.contains("Projection: Transverse_Mercator"), "{text}");
        assert!(text.contains("  X (EAST, Meter)"), "{text}");
    }

    #[test]
    fn transform_summary_as_json() {
        let object = Parser::default()
            .parse_object(r#"PASSTHROUGH_MT[1, PARAM_MT["Affine"]]"#)
            .unwrap();
        let summary = Summary::of(&object, UnitDialect::get(Citation::Default));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["kind"], "math transform");
        assert_eq!(json["source_dimensions"], 3);
        assert!(json.get("axes").is_none());
        assert!(json.get("name").is_none());
    }
}
