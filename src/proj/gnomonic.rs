//! Gnomonic projection (spherical form on radius `a`).
//!
//! Only the hemisphere centred on the origin is projectable; points on or
//! beyond the horizon are rejected.

use crate::constants::EPSLN;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct Gnomonic {
    a: f64,
    lon0: f64,
    lat0: f64,
    sin_p14: f64,
    cos_p14: f64,
}

impl Gnomonic {
    pub fn new(params: &ProjParams) -> Self {
        Self {
            a: params.a,
            lon0: params.long0,
            lat0: params.lat0,
            sin_p14: params.lat0.sin(),
            cos_p14: params.lat0.cos(),
        }
    }
}

impl Projection for Gnomonic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (sinphi, cosphi) = lat.sin_cos();
        let (sindlon, coslon) = dlon.sin_cos();
        // Cosine of the angular distance from the origin.
        let g = self.sin_p14 * sinphi + self.cos_p14 * cosphi * coslon;
        if g <= EPSLN {
            return Err(ProjError::Domain(format!(
                "gnomonic point ({lon}, {lat}) is on or beyond the horizon"
            )));
        }
        let x = self.a * cosphi * sindlon / g;
        let y = self.a * (self.cos_p14 * sinphi - self.sin_p14 * cosphi * coslon) / g;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (x, y) = (x / self.a, y / self.a);
        let rh = x.hypot(y);
        if rh == 0.0 {
            return Ok((self.lon0, self.lat0));
        }
        let c = rh.atan();
        let (sinc, cosc) = c.sin_cos();
        let lat = asinz(cosc * self.sin_p14 + y * sinc * self.cos_p14 / rh);
        let lon = (x * sinc).atan2(rh * self.cos_p14 * cosc - y * self.sin_p14 * sinc);
        Ok((adjust_lon(self.lon0 + lon), lat))
    }
}
