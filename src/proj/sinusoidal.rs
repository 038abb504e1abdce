//! Sinusoidal (Sanson–Flamsteed) projection.
//!
//! forward: x = a·(λ - λ₀)·cos(φ)/sqrt(1 - e²sin²φ), y = M(φ)
//! inverse: φ = M⁻¹(y), λ = λ₀ + x·sqrt(1 - e²sin²φ)/(a·cos(φ))
//!
//! On a sphere M(φ) = a·φ.

use crate::constants::{EPSLN, HALF_PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, MeridianArc};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct Sinusoidal {
    a: f64,
    es: f64,
    lon0: f64,
    arc: MeridianArc,
}

impl Sinusoidal {
    pub fn new(params: &ProjParams) -> Self {
        Self {
            a: params.a,
            es: params.es,
            lon0: params.long0,
            arc: MeridianArc::new(params.es),
        }
    }
}

impl Projection for Sinusoidal {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let (s, c) = lat.sin_cos();
        let x = self.a * adjust_lon(lon - self.lon0) * c / (1.0 - self.es * s * s).sqrt();
        let y = self.a * self.arc.distance(lat);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let lat = self.arc.latitude(y / self.a)?;
        if lat.abs() > HALF_PI + EPSLN {
            return Err(ProjError::Domain(format!(
                "sinusoidal northing {y} is beyond the pole"
            )));
        }
        if (lat.abs() - HALF_PI).abs() < EPSLN {
            // At the poles, longitude is undefined; return lon0
            return Ok((self.lon0, lat));
        }
        let s = lat.sin();
        let lon = self.lon0 + x * (1.0 - self.es * s * s).sqrt() / (self.a * lat.cos());
        if (lon - self.lon0).abs() > std::f64::consts::PI + EPSLN {
            return Err(ProjError::Domain(format!(
                "sinusoidal easting {x} is outside the map"
            )));
        }
        Ok((adjust_lon(lon), lat))
    }
}
