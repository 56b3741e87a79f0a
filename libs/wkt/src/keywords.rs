//! WKT element keywords
//!
//! Uses a compile-time perfect hash map (phf) from the upper-case keyword to
//! its [`Keyword`] tag, so builder dispatch is a single exhaustive match.

use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Coordinate reference systems
    Geogcs,
    Projcs,
    Geoccs,
    VertCs,
    CompdCs,

    // Datum components
    Datum,
    VertDatum,
    Spheroid,
    Primem,
    Towgs84,

    // Shared leaves
    Unit,
    Axis,
    Projection,
    Parameter,
    Authority,

    // Math transforms
    ParamMt,
    ConcatMt,
    InverseMt,
    PassthroughMt,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "GEOGCS" => Keyword::Geogcs,
    "PROJCS" => Keyword::Projcs,
    "GEOCCS" => Keyword::Geoccs,
    "VERT_CS" => Keyword::VertCs,
    "COMPD_CS" => Keyword::CompdCs,
    "DATUM" => Keyword::Datum,
    "VERT_DATUM" => Keyword::VertDatum,
    "SPHEROID" => Keyword::Spheroid,
    "PRIMEM" => Keyword::Primem,
    "TOWGS84" => Keyword::Towgs84,
    "UNIT" => Keyword::Unit,
    "AXIS" => Keyword::Axis,
    "PROJECTION" => Keyword::Projection,
    "PARAMETER" => Keyword::Parameter,
    "AUTHORITY" => Keyword::Authority,
    "PARAM_MT" => Keyword::ParamMt,
    "CONCAT_MT" => Keyword::ConcatMt,
    "INVERSE_MT" => Keyword::InverseMt,
    "PASSTHROUGH_MT" => Keyword::PassthroughMt,
};

impl Keyword {
    /// Case-insensitive lookup.
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORDS.get(word.to_ascii_uppercase().as_str()).copied()
    }

    /// Canonical upper-case spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Geogcs => "GEOGCS",
            Keyword::Projcs => "PROJCS",
            Keyword::Geoccs => "GEOCCS",
            Keyword::VertCs => "VERT_CS",
            Keyword::CompdCs => "COMPD_CS",
            Keyword::Datum => "DATUM",
            Keyword::VertDatum => "VERT_DATUM",
            Keyword::Spheroid => "SPHEROID",
            Keyword::Primem => "PRIMEM",
            Keyword::Towgs84 => "TOWGS84",
            Keyword::Unit => "UNIT",
            Keyword::Axis => "AXIS",
            Keyword::Projection => "PROJECTION",
            Keyword::Parameter => "PARAMETER",
            Keyword::Authority => "AUTHORITY",
            Keyword::ParamMt => "PARAM_MT",
            Keyword::ConcatMt => "CONCAT_MT",
            Keyword::InverseMt => "INVERSE_MT",
            Keyword::PassthroughMt => "PASSTHROUGH_MT",
        }
    }

    pub fn is_math_transform(self) -> bool {
        matches!(
            self,
            Keyword::ParamMt | Keyword::ConcatMt | Keyword::InverseMt | Keyword::PassthroughMt
        )
    }

    pub fn is_coordinate_reference_system(self) -> bool {
        matches!(
            self,
            Keyword::Geogcs | Keyword::Projcs | Keyword::Geoccs | Keyword::VertCs | Keyword::CompdCs
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(Keyword::lookup("geogcs"), Some(Keyword::Geogcs));
        assert_eq!(Keyword::lookup("Param_MT"), Some(Keyword::ParamMt));
        assert_eq!(Keyword::lookup("LOCAL_CS"), None);
    }

    #[test]
    fn spelling_round_trips() {
        for (word, keyword) in KEYWORDS.entries() {
            assert_eq!(keyword.as_str(), *word);
        }
    }
}
