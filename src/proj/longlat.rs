//! Pass-through for geographic and geocentric systems.

use crate::error::ProjError;
use crate::proj::Projection;

#[derive(Debug, Clone, Copy, Default)]
pub struct LongLat;

impl Projection for LongLat {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        Ok((lon, lat))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        Ok((x, y))
    }
}
