//! Math transform parsing, formatting and custom factories

use meridian_wkt::{
    format, Citation, DefaultMathTransformFactory, Error, MathTransform, MathTransformFactory,
    MathTransformParser, OperationMethod, ParameterGroup, ParameterizedTransform, ParsedObject,
    Parser,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Helper function to parse a transform with the default factory
fn parse(input: &str) -> Result<MathTransform, Error> {
    MathTransformParser::default().parse_math_transform(input)
}

const NESTED: &str = r#"CONCAT_MT[PARAM_MT["Affine", PARAMETER["num_row", 4], PARAMETER["num_col", 4], PARAMETER["elt_0_3", 10]], INVERSE_MT[PARAM_MT["Ellipsoid_To_Geocentric", PARAMETER["semi_major", 6378137], PARAMETER["semi_minor", 6356752.314245179]]]]"#;

#[test]
fn test_nested_transform_structure() {
    let transform = parse(NESTED).unwrap();
    let MathTransform::Concatenated(steps) = &transform else {
        panic!("expected CONCAT_MT, got {transform:?}");
    };
    assert_eq!(steps.len(), 2);
    assert_eq!(transform.source_dimensions(), 3);
    assert_eq!(transform.target_dimensions(), 3);

    let affine = steps[0].as_parameterized().unwrap();
    assert_eq!(affine.method(), "Affine");
    assert_eq!(affine.parameters().value("elt_0_3"), Some(10.0));
    assert!(matches!(steps[1], MathTransform::Inverse(_)));
}

#[test]
fn test_format_reproduces_child_order() {
    let transform = parse(NESTED).unwrap();
    assert_eq!(format(&transform, Citation::Default).unwrap(), NESTED);
}

#[test]
fn test_aliases_are_canonicalised() {
    let transform = parse(
        r#"PARAM_MT["Gauss_Kruger",
            PARAMETER["Semi_Major_Axis", 6378137],
            PARAMETER["semi_minor_axis", 6356752.314245179],
            PARAMETER["longitude_of_origin", 9]]"#,
    )
    .unwrap();
    let primitive = transform.as_parameterized().unwrap();
    assert_eq!(primitive.method(), "Transverse_Mercator");
    let names: Vec<&str> = primitive.parameters().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["semi_major", "semi_minor", "central_meridian"]);
    assert_eq!(
        format(&transform, Citation::Default).unwrap(),
        r#"PARAM_MT["Transverse_Mercator", PARAMETER["semi_major", 6378137], PARAMETER["semi_minor", 6356752.314245179], PARAMETER["central_meridian", 9]]"#
    );
}

#[test]
fn test_pass_through() {
    let transform = parse(r#"PASSTHROUGH_MT[1, PARAM_MT["Affine"], 1]"#).unwrap();
    assert!(matches!(
        transform,
        MathTransform::PassThrough { first_affected: 1, trailing: 1, .. }
    ));
    assert_eq!(transform.source_dimensions(), 4);
    assert_eq!(
        format(&transform, Citation::Default).unwrap(),
        r#"PASSTHROUGH_MT[1, PARAM_MT["Affine"], 1]"#
    );

    let transform = parse(r#"PASSTHROUGH_MT[2, PARAM_MT["Affine"]]"#).unwrap();
    assert_eq!(transform.target_dimensions(), 4);
    assert_eq!(
        format(&transform, Citation::Default).unwrap(),
        r#"PASSTHROUGH_MT[2, PARAM_MT["Affine"]]"#
    );
}

#[test]
fn test_pass_through_without_offsets_is_the_inner_transform() {
    let transform = parse(r#"PASSTHROUGH_MT[0, PARAM_MT["Affine"]]"#).unwrap();
    assert!(matches!(transform, MathTransform::Parameterized(_)));
}

#[test]
fn test_double_inverse_collapses() {
    let transform = parse(r#"INVERSE_MT[INVERSE_MT[PARAM_MT["Affine"]]]"#).unwrap();
    assert_eq!(transform, parse(r#"PARAM_MT["Affine"]"#).unwrap());
}

#[test]
fn test_concatenation_checks_dimensions() {
    let err = parse(
        r#"CONCAT_MT[PARAM_MT["Affine"],
            PARAM_MT["Ellipsoid_To_Geocentric", PARAMETER["semi_major", 1], PARAMETER["semi_minor", 1]]]"#,
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidObject(_)), "{err:?}");

    let err = parse("CONCAT_MT[]").unwrap_err();
    assert!(matches!(err, Error::UnexpectedToken { .. }), "{err:?}");
}

#[test]
fn test_parameter_validation() {
    let err = parse(
        r#"PARAM_MT["Transverse_Mercator",
            PARAMETER["semi_major", 6378137],
            PARAMETER["semi_minor", 6356752],
            PARAMETER["latitude_of_origin", 91]]"#,
    )
    .unwrap_err();
    assert!(
        matches!(err, Error::InvalidParameterValue { ref name, .. } if name == "latitude_of_origin"),
        "{err:?}"
    );

    let err = parse(r#"PARAM_MT["Mercator_1SP", PARAMETER["semi_major", 6378137]]"#).unwrap_err();
    assert!(
        matches!(err, Error::InvalidParameterValue { ref name, .. } if name == "semi_minor"),
        "{err:?}"
    );

    let err = parse(r#"PARAM_MT["Affine", PARAMETER["elt_0_0"]]"#).unwrap_err();
    assert!(matches!(err, Error::UnexpectedToken { .. }), "{err:?}");
}

#[test]
fn test_unknown_method() {
    assert!(matches!(
        parse(r#"PARAM_MT["Van_der_Grinten_I"]"#),
        Err(Error::UnknownProjectionMethod(ref m)) if m == "Van_der_Grinten_I"
    ));
}

#[test]
fn test_crs_parser_dispatches_transforms() {
    let object = Parser::default().parse_object(NESTED).unwrap();
    assert_eq!(object.kind(), "math transform");
    assert_eq!(object.as_math_transform(), Some(&parse(NESTED).unwrap()));
    assert!(matches!(object, ParsedObject::MathTransform(_)));
}

/// Factory delegating to the default one while counting primitive transforms.
struct CountingFactory {
    inner: DefaultMathTransformFactory,
    created: AtomicUsize,
}

impl MathTransformFactory for CountingFactory {
    fn method(&self, name: &str) -> meridian_wkt::Result<&OperationMethod> {
        self.inner.method(name)
    }

    fn create_parameterized(
        &self,
        method: &str,
        parameters: ParameterGroup,
    ) -> meridian_wkt::Result<ParameterizedTransform> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.create_parameterized(method, parameters)
    }
}

#[test]
fn test_custom_factory_is_used() {
    let factory = Arc::new(CountingFactory {
        inner: DefaultMathTransformFactory::new(),
        created: AtomicUsize::new(0),
    });
    let parser = MathTransformParser::default().with_factory(factory.clone());
    parser.parse_math_transform(NESTED).unwrap();
    assert_eq!(factory.created.load(Ordering::SeqCst), 2);

    let crs_parser = Parser::default().with_factory(factory.clone());
    crs_parser
        .parse_coordinate_reference_system(
            r#"PROJCS["World Mercator",
                GEOGCS["WGS 84",
                    DATUM["WGS_1984", SPHEROID["WGS 84", 6378137, 298.257223563]],
                    PRIMEM["Greenwich", 0],
                    UNIT["degree", 0.017453292519943295]],
                PROJECTION["Mercator_1SP"],
                UNIT["metre", 1]]"#,
        )
        .unwrap();
    assert_eq!(factory.created.load(Ordering::SeqCst), 3);
}

#[test]
fn test_default_parameters_through_trait_object() {
    let factory: Arc<dyn MathTransformFactory> = Arc::new(DefaultMathTransformFactory::new());
    let defaults = factory.default_parameters("Transverse_Mercator").unwrap();
    assert_eq!(defaults.value("scale_factor"), Some(1.0));
    assert_eq!(defaults.value("false_easting"), Some(0.0));
    assert!(defaults.value("semi_major").is_none());
}
