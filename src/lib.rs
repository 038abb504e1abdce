//! Coordinate reprojection and datum transformation.
//!
//! Build a [`Crs`] from a PROJ.4 string, WKT or a built-in code, then move
//! points between two of them with [`transform`] or [`transform_batch`].

pub mod axis;
pub mod constants;
pub mod crs;
pub mod datum;
pub mod defs;
pub mod ellipsoid;
pub mod error;
pub mod point;
pub mod proj;
pub mod transform;
pub mod wkt;
#[cfg(feature = "python")]
mod py;

pub use axis::{AxisDir, AxisOrder};
pub use crs::{build_crs, Crs, CrsDef};
pub use datum::{Datum, DatumKind};
pub use defs::Registry;
pub use ellipsoid::Ellipsoid;
pub use error::{CrsError, DatumError, ProjError, TransformError};
pub use point::Point;
pub use transform::{transform, transform_batch};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python extension module.
#[cfg(feature = "python")]
#[pymodule]
fn _reproj(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
