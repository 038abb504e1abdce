//! Albers Equal Area Conic projection.
//!
//! Area-preserving conic using `qsfn` from common.rs.

use crate::constants::EPSLN;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, iqsfn, msfn, qsfn};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    a: f64,
    e: f64,
    sphere: bool,
    lon0: f64,
    ns0: f64,
    c: f64,
    rh: f64,
}

impl AlbersEqualArea {
    pub fn new(params: &ProjParams) -> Result<Self, ProjError> {
        let lat1 = params.lat1.unwrap_or(0.0);
        let lat2 = params.lat2.unwrap_or(lat1);
        if (lat1 + lat2).abs() < EPSLN {
            return Err(ProjError::Configuration(
                "aea standard parallels are equal and opposite".to_string(),
            ));
        }
        let e = params.e;

        let (sin1, cos1) = lat1.sin_cos();
        let ms1 = msfn(e, sin1, cos1);
        let qs1 = qsfn(e, sin1);

        let (sin2, cos2) = lat2.sin_cos();
        let ms2 = msfn(e, sin2, cos2);
        let qs2 = qsfn(e, sin2);

        let qs0 = qsfn(e, params.lat0.sin());

        let ns0 = if (lat1 - lat2).abs() > EPSLN {
            (ms1 * ms1 - ms2 * ms2) / (qs2 - qs1)
        } else {
            sin1
        };
        let c = ms1 * ms1 + ns0 * qs1;
        let rh = params.a * (c - ns0 * qs0).sqrt() / ns0;
        if !rh.is_finite() {
            return Err(ProjError::Configuration(
                "aea origin latitude lies outside the cone".to_string(),
            ));
        }

        Ok(Self {
            a: params.a,
            e,
            sphere: params.sphere,
            lon0: params.long0,
            ns0,
            c,
            rh,
        })
    }
}

impl Projection for AlbersEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let qs = qsfn(self.e, lat.sin());
        let radicand = self.c - self.ns0 * qs;
        if radicand < 0.0 {
            return Err(ProjError::Domain(format!(
                "aea cone radius is imaginary at latitude {lat} rad"
            )));
        }
        let rh1 = self.a * radicand.sqrt() / self.ns0;
        let theta = self.ns0 * adjust_lon(lon - self.lon0);
        let x = rh1 * theta.sin();
        let y = self.rh - rh1 * theta.cos();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let y = self.rh - y;
        let (rh1, con) = if self.ns0 >= 0.0 {
            (x.hypot(y), 1.0)
        } else {
            (-x.hypot(y), -1.0)
        };
        let theta = if rh1 != 0.0 {
            (con * x).atan2(con * y)
        } else {
            0.0
        };
        let con = rh1 * self.ns0 / self.a;
        let lat = if self.sphere {
            asinz((self.c - con * con) / (2.0 * self.ns0))
        } else {
            iqsfn(self.e, (self.c - con * con) / self.ns0)?
        };
        let lon = adjust_lon(theta / self.ns0 + self.lon0);
        Ok((lon, lat))
    }
}
