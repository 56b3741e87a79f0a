//! Criterion benchmarks for WKT parsing and formatting

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meridian_wkt::{format, format_with, Citation, FormatOptions, MathTransformParser, Parser};
use std::time::Duration;

const UTM_32N: &str = r#"PROJCS["WGS 84 / UTM zone 32N",
    GEOGCS["WGS 84",
        DATUM["WGS_1984",
            SPHEROID["WGS 84", 6378137, 298.257223563, AUTHORITY["EPSG", "7030"]],
            AUTHORITY["EPSG", "6326"]],
        PRIMEM["Greenwich", 0, AUTHORITY["EPSG", "8901"]],
        UNIT["degree", 0.0174532925199433, AUTHORITY["EPSG", "9122"]],
        AUTHORITY["EPSG", "4326"]],
    PROJECTION["Transverse_Mercator"],
    PARAMETER["latitude_of_origin", 0],
    PARAMETER["central_meridian", 9],
    PARAMETER["scale_factor", 0.9996],
    PARAMETER["false_easting", 500000],
    PARAMETER["false_northing", 0],
    UNIT["metre", 1, AUTHORITY["EPSG", "9001"]],
    AXIS["Easting", EAST],
    AXIS["Northing", NORTH],
    AUTHORITY["EPSG", "32632"]]"#;

const TEXAS_FTUS: &str = r#"PROJCS["NAD83 / Texas Central (ftUS)",
    GEOGCS["NAD83",
        DATUM["North_American_Datum_1983",
            SPHEROID["GRS 1980", 6378137, 298.257222101],
            TOWGS84[0, 0, 0, 0, 0, 0, 0]],
        PRIMEM["Greenwich", 0],
        UNIT["degree", 0.0174532925199433]],
    PROJECTION["Lambert_Conformal_Conic_2SP"],
    PARAMETER["standard_parallel_1", 31.88333333333333],
    PARAMETER["standard_parallel_2", 30.11666666666667],
    PARAMETER["latitude_of_origin", 29.66666666666667],
    PARAMETER["central_meridian", -100.3333333333333],
    PARAMETER["false_easting", 2296583.333],
    PARAMETER["false_northing", 9842500],
    UNIT["US survey foot", 0.3048006096012192]]"#;

const TRANSFORM: &str = r#"CONCAT_MT[
    PARAM_MT["Affine", PARAMETER["num_row", 4], PARAMETER["num_col", 4], PARAMETER["elt_0_3", 10]],
    INVERSE_MT[PARAM_MT["Ellipsoid_To_Geocentric",
        PARAMETER["semi_major", 6378137],
        PARAMETER["semi_minor", 6356752.314245179]]]]"#;

fn custom_criterion() -> Criterion {
    Criterion::default()
        .sample_size(20)
        .warm_up_time(Duration::from_millis(100))
        .measurement_time(Duration::from_secs(1))
        .nresamples(1000)
        .noise_threshold(0.05)
}

fn bench_parse(c: &mut Criterion) {
    let parser = Parser::default();

    c.bench_function("parse_utm", |b| {
        b.iter(|| {
            parser
                .parse_coordinate_reference_system(black_box(UTM_32N))
                .unwrap()
        })
    });

    c.bench_function("parse_us_feet", |b| {
        b.iter(|| {
            parser
                .parse_coordinate_reference_system(black_box(TEXAS_FTUS))
                .unwrap()
        })
    });

    let transforms = MathTransformParser::default();
    c.bench_function("parse_math_transform", |b| {
        b.iter(|| transforms.parse_math_transform(black_box(TRANSFORM)).unwrap())
    });
}

fn bench_format(c: &mut Criterion) {
    let parser = Parser::default();
    let utm = parser.parse_coordinate_reference_system(UTM_32N).unwrap();
    let texas = parser.parse_coordinate_reference_system(TEXAS_FTUS).unwrap();

    c.bench_function("format_utm", |b| {
        b.iter(|| format(black_box(&utm), Citation::Default).unwrap())
    });

    c.bench_function("format_us_feet_esri", |b| {
        b.iter(|| format(black_box(&texas), Citation::Esri).unwrap())
    });

    let indented = FormatOptions::default().with_indentation(2);
    c.bench_function("format_utm_indented", |b| {
        b.iter(|| format_with(black_box(&utm), &indented).unwrap())
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let parser = Parser::default();

    c.bench_function("round_trip_us_feet", |b| {
        b.iter(|| {
            let crs = parser
                .parse_coordinate_reference_system(black_box(TEXAS_FTUS))
                .unwrap();
            let text = format(&crs, Citation::Epsg).unwrap();
            parser.parse_coordinate_reference_system(&text).unwrap()
        })
    });
}

criterion_group! {
    name = benches;
    config = custom_criterion();
    targets =
        bench_parse,
        bench_format,
        bench_round_trip
}
criterion_main!(benches);
