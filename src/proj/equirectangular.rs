//! Equirectangular (Plate Carrée) projection.
//!
//! forward: x = a·(λ - λ₀)·cos(φ₁), y = a·(φ - φ₀)
//! inverse: λ = λ₀ + x/(a·cos(φ₁)), φ = φ₀ + y/a
//!
//! `eqc` takes φ₁ from `lat_ts` and keeps `lat_0` as the origin; `equi`
//! uses `lat_0` as the standard parallel and the equator as the origin.

use crate::error::ProjError;
use crate::proj::common::{adjust_lat, adjust_lon};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct Equirectangular {
    a: f64,
    lon0: f64,
    lat0: f64,
    cos_lat_ts: f64,
}

impl Equirectangular {
    pub fn eqc(params: &ProjParams) -> Self {
        Self {
            a: params.a,
            lon0: params.long0,
            lat0: params.lat0,
            cos_lat_ts: params.lat_ts.unwrap_or(0.0).cos(),
        }
    }

    pub fn equi(params: &ProjParams) -> Self {
        Self {
            a: params.a,
            lon0: params.long0,
            lat0: 0.0,
            cos_lat_ts: params.lat0.cos(),
        }
    }
}

impl Projection for Equirectangular {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let x = self.a * adjust_lon(lon - self.lon0) * self.cos_lat_ts;
        let y = self.a * adjust_lat(lat - self.lat0);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let lon = adjust_lon(self.lon0 + x / (self.a * self.cos_lat_ts));
        let lat = adjust_lat(self.lat0 + y / self.a);
        Ok((lon, lat))
    }
}
