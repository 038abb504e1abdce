//! Hotine Oblique Mercator (`omerc`).
//!
//! The central line is given either by its azimuth `alpha` through
//! (`longc`, `lat0`), or by two points (`lat1`, `lon1`) and (`lat2`, `lon2`).
//! Grid coordinates are centred on the origin of the central line.

use crate::constants::{EPSLN, HALF_PI, PI, TWO_PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, phi2z, tsfn};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct ObliqueMercator {
    e: f64,
    bl: f64,
    al: f64,
    el: f64,
    longc: f64,
    u: f64,
    singam: f64,
    cosgam: f64,
    sinaz: f64,
    cosaz: f64,
}

impl ObliqueMercator {
    pub fn new(params: &ProjParams) -> Result<Self, ProjError> {
        let (e, es) = (params.e, params.es);
        let lat0 = params.lat0;
        if (lat0.abs() - HALF_PI).abs() <= EPSLN {
            return Err(ProjError::Configuration(
                "omerc origin latitude cannot be a pole".to_string(),
            ));
        }
        let (sin_p0, cos_p0) = lat0.sin_cos();
        let con = 1.0 - es * sin_p0 * sin_p0;
        let com = (1.0 - es).sqrt();
        let bl = (1.0 + es * cos_p0.powi(4) / (1.0 - es)).sqrt();
        let al = params.a * bl * params.k0 * com / con;

        let d = bl * com / (cos_p0 * con.sqrt());
        let d2m1 = (d * d - 1.0).max(0.0);
        let f = if lat0 >= 0.0 {
            d + d2m1.sqrt()
        } else {
            d - d2m1.sqrt()
        };
        let el = f * tsfn(e, lat0, sin_p0).powf(bl);

        let (gamma, alpha, longc) = match params.lon1 {
            None => {
                let alpha = params.alpha.ok_or_else(|| {
                    ProjError::Configuration(
                        "omerc needs alpha or two points on the central line".to_string(),
                    )
                })?;
                let g = 0.5 * (f - 1.0 / f);
                let gamma = asinz(alpha.sin() / d);
                let longc = params.longc.unwrap_or(params.long0) - asinz(g * gamma.tan()) / bl;
                (gamma, alpha, longc)
            }
            Some(lon1) => {
                let (lat1, lat2) = match (params.lat1, params.lat2) {
                    (Some(lat1), Some(lat2)) => (lat1, lat2),
                    _ => {
                        return Err(ProjError::Configuration(
                            "omerc two-point form needs lat_1 and lat_2".to_string(),
                        ))
                    }
                };
                let mut lon2 = params.lon2.unwrap_or(0.0);
                if (lat1 - lat2).abs() <= EPSLN
                    || lat1.abs() <= EPSLN
                    || (lat1.abs() - HALF_PI).abs() <= EPSLN
                    || (lat2.abs() - HALF_PI).abs() <= EPSLN
                {
                    return Err(ProjError::Configuration(
                        "omerc central line points are degenerate".to_string(),
                    ));
                }
                let h = tsfn(e, lat1, lat1.sin()).powf(bl);
                let l = tsfn(e, lat2, lat2.sin()).powf(bl);
                let f1 = el / h;
                let g = 0.5 * (f1 - 1.0 / f1);
                let j = (el * el - l * h) / (el * el + l * h);
                let p = (l - h) / (l + h);
                let dlon = lon1 - lon2;
                if dlon < -PI {
                    lon2 -= TWO_PI;
                } else if dlon > PI {
                    lon2 += TWO_PI;
                }
                let longc = 0.5 * (lon1 + lon2)
                    - (j * (0.5 * bl * (lon1 - lon2)).tan() / p).atan() / bl;
                let gamma = ((bl * adjust_lon(lon1 - longc)).sin() / g).atan();
                let alpha = asinz(d * gamma.sin());
                (gamma, alpha, longc)
            }
        };

        let (sinaz, cosaz) = alpha.sin_cos();
        let u = (al / bl) * (d2m1.sqrt() / cosaz).atan();
        let u = if lat0 >= 0.0 { u } else { -u };
        let (singam, cosgam) = gamma.sin_cos();

        Ok(Self {
            e,
            bl,
            al,
            el,
            longc,
            u,
            singam,
            cosgam,
            sinaz,
            cosaz,
        })
    }
}

impl Projection for ObliqueMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.longc);
        let vl = (self.bl * dlon).sin();
        let (ul, us) = if (lat.abs() - HALF_PI).abs() > EPSLN {
            let q = self.el / tsfn(self.e, lat, lat.sin()).powf(self.bl);
            let s = 0.5 * (q - 1.0 / q);
            let t = 0.5 * (q + 1.0 / q);
            let ul = (s * self.singam - vl * self.cosgam) / t;
            let con = (self.bl * dlon).cos();
            let us = if con.abs() < 1.0e-7 {
                self.al * self.bl * dlon
            } else {
                let us = self.al * ((s * self.cosgam + vl * self.singam) / con).atan() / self.bl;
                if con < 0.0 {
                    us + PI * self.al / self.bl
                } else {
                    us
                }
            };
            (ul, us)
        } else {
            let ul = if lat >= 0.0 { self.singam } else { -self.singam };
            (ul, self.al * lat / self.bl)
        };
        if (ul.abs() - 1.0).abs() <= EPSLN {
            return Err(ProjError::Domain(
                "omerc point projects to infinity".to_string(),
            ));
        }
        let vs = 0.5 * self.al * ((1.0 - ul) / (1.0 + ul)).ln() / self.bl;
        let us = us - self.u;
        let x = vs * self.cosaz + us * self.sinaz;
        let y = us * self.cosaz - vs * self.sinaz;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let vs = x * self.cosaz - y * self.sinaz;
        let us = y * self.cosaz + x * self.sinaz + self.u;
        let q = (-self.bl * vs / self.al).exp();
        let s = 0.5 * (q - 1.0 / q);
        let t = 0.5 * (q + 1.0 / q);
        let bu = self.bl * us / self.al;
        let vl = bu.sin();
        let ul = (vl * self.cosgam + s * self.singam) / t;
        if (ul.abs() - 1.0).abs() <= EPSLN {
            let lat = if ul >= 0.0 { HALF_PI } else { -HALF_PI };
            return Ok((self.longc, lat));
        }
        let ts = (self.el / ((1.0 + ul) / (1.0 - ul)).sqrt()).powf(1.0 / self.bl);
        let lat = phi2z(self.e, ts)?;
        let theta = self.longc - (s * self.cosgam - vl * self.singam).atan2(bu.cos()) / self.bl;
        Ok((adjust_lon(theta), lat))
    }
}
