//! Lambert Conformal Conic projection, 1SP and 2SP variants.
//!
//! With one standard parallel the cone constant is `sin(φ₁)`; with two it is
//! fixed by the ratio of scale factors at both parallels.

use crate::constants::{EPSLN, HALF_PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, msfn, phi2z, tsfn};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct LambertConformalConic {
    a: f64,
    e: f64,
    lon0: f64,
    k0: f64,
    ns: f64,  // cone constant
    f0: f64,  // F = m₁/(n·t₁ⁿ)
    rh: f64,  // ρ₀ = a·k₀·F·t₀ⁿ
}

impl LambertConformalConic {
    /// `lat1` defaults to `lat0` and `lat2` to `lat1` (the 1SP form).
    pub fn new(params: &ProjParams) -> Result<Self, ProjError> {
        let lat1 = params.lat1.unwrap_or(params.lat0);
        let lat2 = params.lat2.unwrap_or(lat1);
        if (lat1 + lat2).abs() < EPSLN {
            return Err(ProjError::Configuration(
                "lcc standard parallels are equal and opposite".to_string(),
            ));
        }
        let e = params.e;

        let (sin1, cos1) = lat1.sin_cos();
        let ms1 = msfn(e, sin1, cos1);
        let ts1 = tsfn(e, lat1, sin1);

        let (sin2, cos2) = lat2.sin_cos();
        let ms2 = msfn(e, sin2, cos2);
        let ts2 = tsfn(e, lat2, sin2);

        let ts0 = tsfn(e, params.lat0, params.lat0.sin());

        let ns = if (lat1 - lat2).abs() > EPSLN {
            (ms1 / ms2).ln() / (ts1 / ts2).ln()
        } else {
            sin1
        };
        let f0 = ms1 / (ns * ts1.powf(ns));
        let rh = params.a * params.k0 * f0 * ts0.powf(ns);
        if !rh.is_finite() || !f0.is_finite() {
            return Err(ProjError::Configuration(
                "lcc origin gives an unbounded cone radius".to_string(),
            ));
        }

        Ok(Self {
            a: params.a,
            e,
            lon0: params.long0,
            k0: params.k0,
            ns,
            f0,
            rh,
        })
    }
}

impl Projection for LambertConformalConic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let rh1 = if (lat.abs() - HALF_PI).abs() > EPSLN {
            let ts = tsfn(self.e, lat, lat.sin());
            self.a * self.k0 * self.f0 * ts.powf(self.ns)
        } else {
            // The pole on the apex side maps to the apex; the other is at infinity.
            if lat * self.ns <= 0.0 {
                return Err(ProjError::Domain(format!(
                    "lcc cannot project the pole at {lat} rad"
                )));
            }
            0.0
        };
        let theta = self.ns * adjust_lon(lon - self.lon0);
        let x = rh1 * theta.sin();
        let y = self.rh - rh1 * theta.cos();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let y = self.rh - y;
        // For n < 0, flip signs before computing angle and radius
        let (rh1, con) = if self.ns > 0.0 {
            (x.hypot(y), 1.0)
        } else {
            (-x.hypot(y), -1.0)
        };
        let theta = if rh1 != 0.0 {
            (con * x).atan2(con * y)
        } else {
            0.0
        };

        let lat = if rh1 != 0.0 || self.ns > 0.0 {
            let ts = (rh1 / (self.a * self.k0 * self.f0)).powf(1.0 / self.ns);
            phi2z(self.e, ts)?
        } else {
            -HALF_PI
        };
        let lon = adjust_lon(theta / self.ns + self.lon0);
        Ok((lon, lat))
    }
}
