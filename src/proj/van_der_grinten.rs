//! Van der Grinten projection (spherical form on radius `a`).
//!
//! The whole world is drawn inside a circle; the inverse solves a cubic in
//! closed form.

use crate::constants::{EPSLN, HALF_PI, PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, sign};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct VanDerGrinten {
    r: f64,
    lon0: f64,
}

impl VanDerGrinten {
    pub fn new(params: &ProjParams) -> Self {
        Self {
            r: params.a,
            lon0: params.long0,
        }
    }
}

impl Projection for VanDerGrinten {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        if lat.abs() <= EPSLN {
            return Ok((self.r * dlon, 0.0));
        }
        let theta = asinz(2.0 * (lat / PI).abs());
        if dlon.abs() <= EPSLN || (lat.abs() - HALF_PI).abs() <= EPSLN {
            let y = PI * self.r * (0.5 * theta).tan();
            return Ok((0.0, sign(lat) * y));
        }

        let al = 0.5 * (PI / dlon - dlon / PI).abs();
        let asq = al * al;
        let (sinth, costh) = theta.sin_cos();
        let g = costh / (sinth + costh - 1.0);
        let gsq = g * g;
        let m = g * (2.0 / sinth - 1.0);
        let msq = m * m;
        let mut con = PI
            * self.r
            * (al * (g - msq)
                + (asq * (g - msq) * (g - msq) - (msq + asq) * (gsq - msq)).sqrt())
            / (msq + asq);
        if dlon < 0.0 {
            con = -con;
        }
        let x = con;
        let con = (con / (PI * self.r)).abs();
        let y = PI * self.r * (1.0 - con * con - 2.0 * al * con).max(0.0).sqrt();
        Ok((x, sign(lat) * y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let con = PI * self.r;
        let xx = x / con;
        let yy = y / con;
        let xys = xx * xx + yy * yy;
        if xys > 1.0 + EPSLN {
            return Err(ProjError::Domain(format!(
                "van der grinten point ({x}, {y}) lies outside the map circle"
            )));
        }

        let lat = if yy.abs() < EPSLN {
            0.0
        } else {
            let c1 = -yy.abs() * (1.0 + xys);
            let c2 = c1 - 2.0 * yy * yy + xx * xx;
            let c3 = -2.0 * c1 + 1.0 + 2.0 * yy * yy + xys * xys;
            let d = yy * yy / c3
                + (2.0 * c2 * c2 * c2 / c3 / c3 / c3 - 9.0 * c1 * c2 / c3 / c3) / 27.0;
            let a1 = (c1 - c2 * c2 / 3.0 / c3) / c3;
            let m1 = 2.0 * (-a1 / 3.0).sqrt();
            let con = ((3.0 * d) / a1 / m1).clamp(-1.0, 1.0);
            let th1 = con.acos() / 3.0;
            sign(y) * (-m1 * (th1 + PI / 3.0).cos() - c2 / 3.0 / c3) * PI
        };

        let lon = if xx.abs() < EPSLN {
            self.lon0
        } else {
            adjust_lon(
                self.lon0
                    + PI * (xys - 1.0
                        + (1.0 + 2.0 * (xx * xx - yy * yy) + xys * xys).sqrt())
                        / 2.0
                        / xx,
            )
        };
        Ok((lon, lat))
    }
}
