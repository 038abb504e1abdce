//! Mercator projection, ellipsoidal and spherical.
//!
//!   forward: x = a·k₀·(λ - λ₀), y = -a·k₀·ln(tsfn(φ, e))
//!   inverse: λ = λ₀ + x/(a·k₀), φ = phi2z(e, exp(-y/(a·k₀)))
//!
//! On a sphere `tsfn` reduces to `tan(π/4 - φ/2)`, which gives the familiar
//! web-mercator form `y = a·ln(tan(π/4 + φ/2))`.

use crate::constants::{EPSLN, FORT_PI, HALF_PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, finite, msfn, phi2z, tsfn};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct Mercator {
    a: f64,
    e: f64,
    sphere: bool,
    lon0: f64,
    k0: f64,
}

impl Mercator {
    pub fn new(params: &ProjParams) -> Self {
        // A standard parallel overrides the scale factor.
        let k0 = match params.lat_ts {
            Some(lat_ts) if params.sphere => lat_ts.cos(),
            Some(lat_ts) => msfn(params.e, lat_ts.sin(), lat_ts.cos()),
            None => params.k0,
        };
        Self {
            a: params.a,
            e: params.e,
            sphere: params.sphere,
            lon0: params.long0,
            k0,
        }
    }
}

impl Projection for Mercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if (lat.abs() - HALF_PI).abs() <= EPSLN || lat.abs() > HALF_PI {
            return Err(ProjError::Domain(format!(
                "mercator is undefined at latitude {lat} rad"
            )));
        }
        let x = self.a * self.k0 * adjust_lon(lon - self.lon0);
        let y = if self.sphere {
            self.a * self.k0 * (FORT_PI + 0.5 * lat).tan().ln()
        } else {
            -self.a * self.k0 * tsfn(self.e, lat, lat.sin()).ln()
        };
        Ok((x, finite(y, "mercator northing")?))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let lat = if self.sphere {
            HALF_PI - 2.0 * (-y / (self.a * self.k0)).exp().atan()
        } else {
            phi2z(self.e, (-y / (self.a * self.k0)).exp())?
        };
        let lon = adjust_lon(self.lon0 + x / (self.a * self.k0));
        Ok((lon, lat))
    }
}
