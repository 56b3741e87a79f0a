//! Unit-naming dialects.
//!
//! A dialect maps every known unit to exactly one preferred output label and
//! accepts any number of input aliases. The built-in dialects are derived from
//! one shared baseline table and are immutable once built.

use crate::error::{Error, Result};
use crate::unit::{self, Unit};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Naming authority whose conventions a dialect follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Citation {
    #[default]
    Default,
    Epsg,
    Esri,
}

impl Citation {
    pub const ALL: [Citation; 3] = [Citation::Default, Citation::Epsg, Citation::Esri];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "DEFAULT" | "OGC" => Some(Citation::Default),
            "EPSG" => Some(Citation::Epsg),
            "ESRI" => Some(Citation::Esri),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Citation::Default => "default",
            Citation::Epsg => "EPSG",
            Citation::Esri => "ESRI",
        }
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Citation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Citation::from_name(s).ok_or_else(|| Error::UnknownDialect(s.to_string()))
    }
}

#[derive(Clone, Debug)]
struct Entry {
    unit: Unit,
    label: String,
}

/// Label ↔ unit table for one citation.
#[derive(Clone, Debug)]
pub struct UnitDialect {
    citation: Citation,
    entries: Vec<Entry>,
    labels: HashMap<String, usize>,
}

impl UnitDialect {
    /// Process-wide dialect for `citation`, built on first use.
    pub fn get(citation: Citation) -> &'static UnitDialect {
        crate::dialect_for(citation)
    }

    pub fn by_name(name: &str) -> Result<&'static UnitDialect> {
        Ok(Self::get(name.parse()?))
    }

    /// Start a new dialect as an independent copy of `self`.
    pub fn derive(&self, citation: Citation) -> UnitDialectBuilder {
        let mut dialect = self.clone();
        dialect.citation = citation;
        UnitDialectBuilder { dialect }
    }

    pub fn citation(&self) -> Citation {
        self.citation
    }

    /// Preferred label for `unit`, or `None` when this dialect has no entry for it.
    pub fn find_label(&self, unit: &Unit) -> Option<&str> {
        self.entry_index(unit)
            .map(|index| self.entries[index].label.as_str())
    }

    /// Preferred label for `unit`.
    pub fn label(&self, unit: &Unit) -> Result<&str> {
        self.find_label(unit).ok_or_else(|| Error::Unmapped {
            unit: unit.to_string(),
            dialect: self.citation.to_string(),
        })
    }

    /// Canonical unit for any accepted label or alias.
    pub fn lookup(&self, label: &str) -> Option<&Unit> {
        if let Some(&index) = self.labels.get(label) {
            return Some(&self.entries[index].unit);
        }
        let mut matches: Vec<usize> = self
            .labels
            .iter()
            .filter(|(candidate, _)| candidate.eq_ignore_ascii_case(label))
            .map(|(_, &index)| index)
            .collect();
        matches.sort_unstable();
        matches.dedup();
        if matches.len() > 1 {
            tracing::debug!(
                label,
                dialect = %self.citation,
                candidates = matches.len(),
                "ambiguous case-insensitive unit label, using the first registered unit"
            );
        }
        matches.first().map(|&index| &self.entries[index].unit)
    }

    pub fn parse(&self, label: &str) -> Result<Unit> {
        self.lookup(label)
            .cloned()
            .ok_or_else(|| Error::UnknownLabel(label.to_string()))
    }

    /// Every label accepted for `unit`, preferred label first.
    pub fn aliases(&self, unit: &Unit) -> Vec<&str> {
        let Some(index) = self.entry_index(unit) else {
            return Vec::new();
        };
        let preferred = self.entries[index].label.as_str();
        let mut others: Vec<&str> = self
            .labels
            .iter()
            .filter(|(label, &i)| i == index && label.as_str() != preferred)
            .map(|(label, _)| label.as_str())
            .collect();
        others.sort_unstable();
        let mut out = vec![preferred];
        out.extend(others);
        out
    }

    pub fn units(&self) -> impl Iterator<Item = (&Unit, &str)> {
        self.entries.iter().map(|e| (&e.unit, e.label.as_str()))
    }

    fn entry_index(&self, unit: &Unit) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.unit == *unit)
            .or_else(|| self.entries.iter().position(|e| e.unit.approx_eq(unit)))
    }
}

/// Mutable stage of a dialect. Nothing can change a dialect after [`build`].
///
/// [`build`]: UnitDialectBuilder::build
#[derive(Debug)]
pub struct UnitDialectBuilder {
    dialect: UnitDialect,
}

impl UnitDialectBuilder {
    pub fn new(citation: Citation) -> Self {
        Self {
            dialect: UnitDialect {
                citation,
                entries: Vec::new(),
                labels: HashMap::new(),
            },
        }
    }

    /// Make `label` the preferred output label of `unit`. The previous label
    /// stays accepted as an alias.
    pub fn label(mut self, unit: &Unit, label: &str) -> Result<Self> {
        validate_label(label)?;
        let index = self.entry_for(unit, label);
        if let Some(&owner) = self.dialect.labels.get(label) {
            if owner != index && self.dialect.entries[owner].label == label {
                return Err(Error::InvalidLabel(label.to_string()));
            }
        }
        self.dialect.entries[index].label = label.to_string();
        self.dialect.labels.insert(label.to_string(), index);
        Ok(self)
    }

    /// Accept `alias` as an input spelling of `unit`.
    pub fn alias(mut self, unit: &Unit, alias: &str) -> Result<Self> {
        validate_label(alias)?;
        let index = self.entry_for(unit, alias);
        if let Some(&owner) = self.dialect.labels.get(alias) {
            if owner != index && self.dialect.entries[owner].label == alias {
                return Err(Error::InvalidLabel(alias.to_string()));
            }
        }
        self.dialect.labels.insert(alias.to_string(), index);
        Ok(self)
    }

    /// Stop accepting `alias`. Preferred labels cannot be removed this way.
    pub fn remove_alias(mut self, alias: &str) -> Self {
        if let Some(&index) = self.dialect.labels.get(alias) {
            if self.dialect.entries[index].label != alias {
                self.dialect.labels.remove(alias);
            }
        }
        self
    }

    pub fn build(self) -> UnitDialect {
        self.dialect
    }

    fn entry_for(&mut self, unit: &Unit, label: &str) -> usize {
        if let Some(index) = self.dialect.entries.iter().position(|e| e.unit == *unit) {
            return index;
        }
        self.dialect.entries.push(Entry {
            unit: unit.clone(),
            label: label.to_string(),
        });
        self.dialect.entries.len() - 1
    }
}

fn validate_label(label: &str) -> Result<()> {
    let valid = label.chars().next().is_some_and(|first| {
        !first.is_whitespace()
            && !first.is_ascii_digit()
            && !matches!(
                first,
                '*' | '/' | '(' | ')' | '[' | ']' | '^' | '+' | '-' | '¹' | '²' | '³' | '·'
            )
    });
    if valid && !label.contains('"') {
        Ok(())
    } else {
        Err(Error::InvalidLabel(label.to_string()))
    }
}

/// Labels shared by every dialect before dialect-specific overlays.
pub(crate) fn baseline() -> Result<UnitDialect> {
    let table: &[(&Unit, &str, &[&str])] = &[
        (&unit::METRE, "m", &["metre", "meter", "metres", "meters"]),
        (&unit::KILOMETRE, "km", &["kilometre", "kilometer"]),
        (&unit::FOOT, "ft", &["foot", "feet", "international foot"]),
        (
            &unit::US_SURVEY_FOOT,
            "ftUS",
            &["US survey foot", "foot_survey_us", "survey foot"],
        ),
        (&unit::NAUTICAL_MILE, "NM", &["nautical mile", "nmi"]),
        (&unit::RADIAN, "rad", &["radian", "radians"]),
        (&unit::MICRORADIAN, "µrad", &["μrad", "microradian"]),
        (&unit::DEGREE, "degree", &["degrees", "deg", "°"]),
        (&unit::GRAD, "grad", &["grads", "gon", "grade"]),
        (&unit::ARC_MINUTE, "arcmin", &["arc-minute", "minute of arc"]),
        (&unit::ARC_SECOND, "arcsec", &["arc-second", "second of arc"]),
        (&unit::SECOND, "s", &["second", "seconds", "sec"]),
        (&unit::MINUTE, "min", &["minute", "minutes"]),
        (&unit::HOUR, "h", &["hour", "hours"]),
        (&unit::DAY, "day", &["days", "d"]),
        (&unit::ONE, "one", &["unity"]),
        (&unit::PPM, "ppm", &["parts per million"]),
        (&unit::KELVIN, "K", &["kelvin"]),
        (&unit::CELSIUS, "℃", &["°C", "celsius"]),
        (&unit::FAHRENHEIT, "℉", &["°F", "fahrenheit"]),
    ];

    let mut builder = UnitDialectBuilder::new(Citation::Default);
    for (unit, label, aliases) in table {
        builder = builder.label(unit, label)?;
        for alias in aliases.iter() {
            builder = builder.alias(unit, alias)?;
        }
    }
    Ok(builder.build())
}

pub(crate) fn epsg(baseline: &UnitDialect) -> Result<UnitDialect> {
    Ok(baseline
        .derive(Citation::Epsg)
        .label(&unit::METRE, "metre")?
        .label(&unit::KILOMETRE, "kilometre")?
        .label(&unit::FOOT, "foot")?
        .label(&unit::US_SURVEY_FOOT, "US survey foot")?
        .label(&unit::NAUTICAL_MILE, "nautical mile")?
        .label(&unit::RADIAN, "radian")?
        .label(&unit::MICRORADIAN, "microradian")?
        .label(&unit::DEGREE, "degree")?
        .label(&unit::GRAD, "grad")?
        .label(&unit::ARC_MINUTE, "arc-minute")?
        .label(&unit::ARC_SECOND, "arc-second")?
        .label(&unit::SECOND, "second")?
        .label(&unit::ONE, "unity")?
        .label(&unit::PPM, "parts per million")?
        .build())
}

pub(crate) fn esri(baseline: &UnitDialect) -> Result<UnitDialect> {
    Ok(baseline
        .derive(Citation::Esri)
        .label(&unit::METRE, "Meter")?
        .label(&unit::KILOMETRE, "Kilometer")?
        .label(&unit::FOOT, "Foot")?
        .label(&unit::US_SURVEY_FOOT, "Foot_US")?
        .label(&unit::NAUTICAL_MILE, "Nautical_Mile")?
        .label(&unit::RADIAN, "Radian")?
        .label(&unit::DEGREE, "Degree")?
        .label(&unit::GRAD, "Grad")?
        .label(&unit::ARC_MINUTE, "Minute")?
        .label(&unit::ARC_SECOND, "Decimal_Second")?
        .build())
}
