//! In-memory coordinate reference system model.
//!
//! Every object here is an immutable value built once by the parser (or by a
//! caller) and compared structurally.

mod crs;
mod cs;
mod datum;

pub use crs::{
    CompoundCrs, CoordinateReferenceSystem, GeocentricCrs, GeographicCrs, ProjectedCrs,
    VerticalCrs,
};
pub use cs::{Axis, AxisDirection, CoordinateSystem};
pub use datum::{
    BursaWolfParameters, Ellipsoid, GeodeticDatum, PrimeMeridian, VerticalDatum,
    VerticalDatumType,
};

use std::fmt;

/// Opaque `(namespace, code)` reference into an external registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Authority {
    pub namespace: String,
    pub code: String,
}

impl Authority {
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.code)
    }
}
