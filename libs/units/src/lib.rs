#![forbid(unsafe_code)]

mod dialect;
mod error;
pub mod unit;

use once_cell::sync::Lazy;

pub use dialect::{Citation, UnitDialect, UnitDialectBuilder};
pub use error::{Error, Result};
pub use unit::{Dimension, Unit, FACTOR_TOLERANCE};

static BASELINE: Lazy<UnitDialect> =
    Lazy::new(|| dialect::baseline().expect("failed to build baseline unit labels"));

static DEFAULT_DIALECT: Lazy<UnitDialect> =
    Lazy::new(|| BASELINE.derive(Citation::Default).build());

static EPSG_DIALECT: Lazy<UnitDialect> =
    Lazy::new(|| dialect::epsg(&BASELINE).expect("failed to build EPSG unit labels"));

static ESRI_DIALECT: Lazy<UnitDialect> =
    Lazy::new(|| dialect::esri(&BASELINE).expect("failed to build ESRI unit labels"));

pub(crate) fn dialect_for(citation: Citation) -> &'static UnitDialect {
    match citation {
        Citation::Default => &DEFAULT_DIALECT,
        Citation::Epsg => &EPSG_DIALECT,
        Citation::Esri => &ESRI_DIALECT,
    }
}
