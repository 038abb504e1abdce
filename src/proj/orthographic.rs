//! Orthographic projection (spherical form on radius `a`).

use crate::constants::{EPSLN, HALF_PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct Orthographic {
    a: f64,
    lon0: f64,
    lat0: f64,
    sin_p14: f64,
    cos_p14: f64,
}

impl Orthographic {
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

impl Projection for Orthographic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (sinphi, cosphi) = lat.sin_cos();
        let (sindlon, coslon) = dlon.sin_cos();
        let g = self.sin_p14 * sinphi + self.cos_p14 * cosphi * coslon;
        if g < -EPSLN {
            return Err(ProjError::Domain(format!(
                "orthographic point ({lon}, {lat}) is on the far hemisphere"
            )));
        }
        let x = self.a * cosphi * sindlon;
        let y = self.a * (self.cos_p14 * sinphi - self.sin_p14 * cosphi * coslon);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rh = x.hypot(y);
        if rh > self.a * (1.0 + EPSLN) {
            return Err(ProjError::Domain(format!(
                "orthographic radius {rh} lies outside the globe"
            )));
        }
        if rh <= EPSLN {
            return Ok((self.lon0, self.lat0));
        }
        let z = asinz(rh / self.a);
        let (sinz, cosz) = z.sin_cos();
        let lat = asinz(cosz * self.sin_p14 + y * sinz * self.cos_p14 / rh);
        let lon = if (self.lat0.abs() - HALF_PI).abs() <= EPSLN {
            if self.lat0 >= 0.0 {
                adjust_lon(self.lon0 + x.atan2(-y))
            } else {
                adjust_lon(self.lon0 - (-x).atan2(y))
            }
        } else {
            adjust_lon(
                self.lon0 + (x * sinz).atan2(rh * self.cos_p14 * cosz - y * self.sin_p14 * sinz),
            )
        };
        Ok((lon, lat))
    }
}
