//! Cylindrical Equal Area projection.
//!
//! forward: x = a·k₀·(λ - λ₀), y = a·q(φ)/(2·k₀), with k₀ = m(φ_ts)

use crate::constants::EPSLN;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, iqsfn, msfn, qsfn};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct CylindricalEqualArea {
    a: f64,
    e: f64,
    lon0: f64,
    k0: f64,
    qp: f64,
}

impl CylindricalEqualArea {
    pub fn new(params: &ProjParams) -> Self {
        let lat_ts = params.lat_ts.unwrap_or(0.0);
        Self {
            a: params.a,
            e: params.e,
            lon0: params.long0,
            k0: msfn(params.e, lat_ts.sin(), lat_ts.cos()),
            qp: qsfn(params.e, 1.0),
        }
    }
}

impl Projection for CylindricalEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let x = self.a * self.k0 * adjust_lon(lon - self.lon0);
        let y = self.a * 0.5 * qsfn(self.e, lat.sin()) / self.k0;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let q = 2.0 * y * self.k0 / self.a;
        if q.abs() > self.qp + EPSLN {
            return Err(ProjError::Domain(format!(
                "cea northing {y} is beyond the pole"
            )));
        }
        let lat = iqsfn(self.e, q.clamp(-self.qp, self.qp))?;
        let lon = adjust_lon(self.lon0 + x / (self.a * self.k0));
        Ok((lon, lat))
    }
}
