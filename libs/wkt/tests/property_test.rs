//! Property-based tests using QuickCheck

use meridian_units::{unit, Unit};
use meridian_wkt::referencing::{Axis, AxisDirection};
use meridian_wkt::{format, Citation, Formattable, MathTransformParser, ParsedObject, Parser, Symbols};
use quickcheck::{QuickCheck, TestResult};

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Property: keywords inside quoted names are never reported
#[test]
fn prop_axis_scan_ignores_quoted_text() {
    fn prop(name: String) -> TestResult {
        let text = format!("GEOGCS[{}, UNIT[\"degree\", 0.0174532925199433]]", quoted(&name));
        TestResult::from_bool(!Symbols::DEFAULT.contains_axis(&text))
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Property: an AXIS element following any quoted name is always found
#[test]
fn prop_axis_scan_finds_axis_after_quoted_text() {
    fn prop(name: String) -> TestResult {
        let text = format!("GEOGCS[{}, AXIS[\"Lat\", NORTH]]", quoted(&name));
        TestResult::from_bool(Symbols::DEFAULT.contains_axis(&text))
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Property: any name survives formatting and parsing
#[test]
fn prop_names_round_trip() {
    fn prop(name: String) -> TestResult {
        let axis = Axis::new(name, AxisDirection::Up, unit::METRE);
        let text = match axis.to_wkt() {
            Ok(text) => text,
            Err(_) => return TestResult::failed(),
        };
        match Parser::default().parse_object(&text) {
            Ok(ParsedObject::Axis(parsed)) => TestResult::from_bool(parsed == axis),
            _ => TestResult::failed(),
        }
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(String) -> TestResult);
}

/// Property: PARAMETER values are read back exactly
#[test]
fn prop_parameter_values_round_trip() {
    fn prop(value: f64) -> TestResult {
        if !value.is_finite() {
            return TestResult::discard();
        }
        let parser = MathTransformParser::default();
        let text = format!("PARAM_MT[\"Affine\", PARAMETER[\"elt_0_2\", {:?}]]", value);
        let Ok(transform) = parser.parse_math_transform(&text) else {
            return TestResult::failed();
        };
        let Ok(formatted) = transform.to_wkt() else {
            return TestResult::failed();
        };
        let Ok(reparsed) = parser.parse_math_transform(&formatted) else {
            return TestResult::failed();
        };
        let read_back = reparsed
            .as_parameterized()
            .and_then(|p| p.parameters().value("elt_0_2"));
        TestResult::from_bool(read_back == Some(value) && reparsed == transform)
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(f64) -> TestResult);
}

static ANGULAR_UNITS: [(&str, Unit); 4] = [
    ("grad", unit::GRAD),
    ("radian", unit::RADIAN),
    ("arc-minute", unit::ARC_MINUTE),
    ("arc-second", unit::ARC_SECOND),
];

static LINEAR_UNITS: [(&str, Unit); 3] = [
    ("US survey foot", unit::US_SURVEY_FOOT),
    ("foot", unit::FOOT),
    ("kilometre", unit::KILOMETRE),
];

/// `degrees` written in `to`
fn angle_in(degrees: f64, to: &Unit) -> f64 {
    unit::DEGREE.convert(degrees, to).unwrap()
}

/// PROJCS whose parameters are declared in units other than degrees and
/// metres; `semi_major_offset` perturbs the ellipsoid's semi-major axis by
/// that many parts in 1e11, straddling the derived-value tolerance.
fn projcs_in_units(
    angular: usize,
    linear: usize,
    latitude: i32,
    longitude: i32,
    easting: i32,
    semi_major_offset: i8,
) -> String {
    let (angular_label, angular) = &ANGULAR_UNITS[angular % ANGULAR_UNITS.len()];
    let (linear_label, linear) = &LINEAR_UNITS[linear % LINEAR_UNITS.len()];
    let latitude = (latitude % 89_000_000) as f64 / 1e6;
    let longitude = (longitude % 179_000_000) as f64 / 1e6;
    let semi_major = unit::METRE
        .convert(6378137.0 * (1.0 + semi_major_offset as f64 * 1e-11), linear)
        .unwrap();
    format!(
        r#"PROJCS["generated",
            GEOGCS["WGS 84",
                DATUM["WGS_1984", SPHEROID["WGS 84", 6378137, 298.257223563]],
                PRIMEM["Greenwich", 0],
                UNIT["{angular_label}", {angular_factor:?}]],
            PROJECTION["Lambert_Conformal_Conic_1SP"],
            PARAMETER["semi_major", {semi_major:?}],
            PARAMETER["latitude_of_origin", {latitude:?}],
            PARAMETER["central_meridian", {longitude:?}],
            PARAMETER["scale_factor", 0.9996],
            PARAMETER["false_easting", {easting:?}],
            PARAMETER["false_northing", {northing:?}],
            UNIT["{linear_label}", {linear_factor:?}]]"#,
        angular_factor = angular.factor(),
        latitude = angle_in(latitude, angular),
        longitude = angle_in(longitude, angular),
        easting = easting as f64 / 100.0,
        northing = easting as f64 / 7.0,
        linear_factor = linear.factor(),
    )
}

/// Property: PROJCS parameters declared in non-degree and non-metre units
/// survive formatting and parsing in every dialect
#[test]
fn prop_converted_parameters_round_trip() {
    fn prop(
        angular: usize,
        linear: usize,
        latitude: i32,
        longitude: i32,
        easting: i32,
        semi_major_offset: i8,
    ) -> TestResult {
        let text = projcs_in_units(angular, linear, latitude, longitude, easting, semi_major_offset);
        let parser = Parser::default();
        let Ok(crs) = parser.parse_coordinate_reference_system(&text) else {
            return TestResult::error(format!("rejected {text}"));
        };
        for dialect in Citation::ALL {
            let Ok(formatted) = format(&crs, dialect) else {
                return TestResult::error(format!("cannot format {text}"));
            };
            match parser.parse_coordinate_reference_system(&formatted) {
                Ok(reparsed) if reparsed == crs => {}
                _ => return TestResult::error(format!("{formatted} does not read back")),
            }
        }
        TestResult::passed()
    }

    QuickCheck::new()
        .tests(1000)
        .quickcheck(prop as fn(usize, usize, i32, i32, i32, i8) -> TestResult);
}

/// Property: the bracket style never changes the parsed object
#[test]
fn prop_bracket_style_is_irrelevant() {
    let names = ["WGS 84", "NAD83 / UTM [zone 10N]", "a (b) c", "say \"hi\"", ""];

    for name in names {
        let text = format!(
            "GEOGCS[{}, DATUM[\"D\", SPHEROID[\"S\", 6378137, 298.257223563]], PRIMEM[\"Greenwich\", 0], UNIT[\"degree\", 0.0174532925199433]]",
            quoted(name)
        );
        let parens = text
            .replace("GEOGCS[", "GEOGCS(")
            .replace("DATUM[", "DATUM(")
            .replace("SPHEROID[", "SPHEROID(")
            .replace("PRIMEM[", "PRIMEM(")
            .replace("UNIT[", "UNIT(")
            .replace("563]]", "563))")
            .replace("0],", "0),")
            .replace("433]]", "433))");

        let parser = Parser::default();
        assert_eq!(
            parser.parse_coordinate_reference_system(&text).unwrap(),
            parser.parse_coordinate_reference_system(&parens).unwrap(),
            "{parens}"
        );
    }
}
