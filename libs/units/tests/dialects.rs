use approx::assert_relative_eq;
use meridian_units::{unit, Citation, Dimension, Unit, UnitDialect};

#[test]
fn esri_survey_foot_label_round_trips() {
    let esri = UnitDialect::get(Citation::Esri);
    let label = esri.label(&unit::US_SURVEY_FOOT).unwrap();
    assert_eq!(label, "Foot_US");
    assert_eq!(esri.parse(label).unwrap(), unit::US_SURVEY_FOOT);
}

#[test]
fn foot_us_is_esri_only() {
    assert!(UnitDialect::get(Citation::Default).lookup("Foot_US").is_none());
    assert!(UnitDialect::get(Citation::Epsg).lookup("Foot_US").is_none());
}

#[test]
fn temperature_labels_are_shared() {
    for citation in Citation::ALL {
        let dialect = UnitDialect::get(citation);
        assert_eq!(dialect.label(&unit::CELSIUS).unwrap(), "℃");
        assert_eq!(dialect.label(&unit::FAHRENHEIT).unwrap(), "℉");
    }
}

#[test]
fn dialects_pick_their_own_preferred_labels() {
    let cases = [
        (Citation::Default, "m", "degree"),
        (Citation::Epsg, "metre", "degree"),
        (Citation::Esri, "Meter", "Degree"),
    ];
    for (citation, metre, degree) in cases {
        let dialect = UnitDialect::get(citation);
        assert_eq!(dialect.label(&unit::METRE).unwrap(), metre);
        assert_eq!(dialect.label(&unit::DEGREE).unwrap(), degree);
    }
}

#[test]
fn customizing_a_copy_leaves_singletons_untouched() {
    let epsg = UnitDialect::get(Citation::Epsg);
    let custom = epsg
        .derive(Citation::Epsg)
        .label(&unit::METRE, "mètre")
        .unwrap()
        .build();
    assert_eq!(custom.label(&unit::METRE).unwrap(), "mètre");
    assert_eq!(epsg.label(&unit::METRE).unwrap(), "metre");
    assert_eq!(UnitDialect::get(Citation::Default).label(&unit::METRE).unwrap(), "m");
    assert_eq!(UnitDialect::get(Citation::Esri).label(&unit::METRE).unwrap(), "Meter");
}

#[test]
fn every_alias_resolves_to_its_unit() {
    for citation in Citation::ALL {
        let dialect = UnitDialect::get(citation);
        for (unit, _) in dialect.units() {
            for alias in dialect.aliases(unit) {
                assert_eq!(&dialect.parse(alias).unwrap(), unit, "{citation}: {alias}");
            }
        }
    }
}

#[test]
fn rounded_factor_finds_canonical_label() {
    let wkt_degree = Unit::new(Dimension::Angle, 0.0174532925199433);
    let dialect = UnitDialect::get(Citation::Epsg);
    assert_eq!(dialect.label(&wkt_degree).unwrap(), "degree");
}

#[test]
fn unmapped_unit_reports_dialect() {
    let furlong = Unit::new(Dimension::Length, 201.168);
    let err = UnitDialect::get(Citation::Esri).label(&furlong).unwrap_err();
    assert!(matches!(err, meridian_units::Error::Unmapped { .. }));
}

#[test]
fn by_name_accepts_ogc() {
    let d = UnitDialect::by_name("OGC").unwrap();
    assert_eq!(d.citation(), Citation::Default);
    assert!(UnitDialect::by_name("iau").is_err());
}

#[test]
fn survey_foot_conversion() {
    let m = unit::US_SURVEY_FOOT.convert(3937.0, &unit::METRE).unwrap();
    assert_relative_eq!(m, 1200.0, max_relative = 1e-12);
}
