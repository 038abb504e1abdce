//! Gauss conformal sphere.
//!
//! Maps the ellipsoid conformally onto a sphere tangent at the origin
//! latitude. Used on its own (`gauss`) and as the first stage of the oblique
//! stereographic projection.

use crate::constants::{FORT_PI, HALF_PI, SPHERE_MAX_ITER};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, srat};
use crate::proj::{ProjParams, Projection};

const DEL_TOL: f64 = 1.0e-14;

/// Constants of the conformal sphere for one origin latitude.
#[derive(Debug, Clone)]
pub struct GaussSphere {
    e: f64,
    c: f64,
    k: f64,
    ratexp: f64,
    /// Conformal latitude of the origin.
    pub phic0: f64,
    /// Radius of the conformal sphere, in units of `a`.
    pub rc: f64,
}

impl GaussSphere {
    pub fn new(e: f64, lat0: f64) -> Result<Self, ProjError> {
        let es = e * e;
        let sphi = lat0.sin();
        let cphi = lat0.cos().powi(2);
        let rc = (1.0 - es).sqrt() / (1.0 - es * sphi * sphi);
        let c = (1.0 + es * cphi * cphi / (1.0 - es)).sqrt();
        let phic0 = (sphi / c).asin();
        let ratexp = 0.5 * c * e;
        let k = (0.5 * phic0 + FORT_PI).tan()
            / ((0.5 * lat0 + FORT_PI).tan().powf(c) * srat(e * sphi, ratexp));
        if !k.is_finite() {
            return Err(ProjError::Configuration(format!(
                "no conformal sphere at origin latitude {lat0} rad"
            )));
        }
        Ok(Self {
            e,
            c,
            k,
            ratexp,
            phic0,
            rc,
        })
    }

    /// Geodetic (Δλ, φ) to conformal sphere (Λ, χ).
    pub fn to_sphere(&self, dlon: f64, lat: f64) -> (f64, f64) {
        let chi = 2.0
            * (self.k * (0.5 * lat + FORT_PI).tan().powf(self.c) * srat(self.e * lat.sin(), self.ratexp))
                .atan()
            - HALF_PI;
        (self.c * dlon, chi)
    }

    /// Conformal sphere (Λ, χ) back to geodetic (Δλ, φ).
    pub fn from_sphere(&self, lam: f64, chi: f64) -> Result<(f64, f64), ProjError> {
        let num = ((0.5 * chi + FORT_PI).tan() / self.k).powf(1.0 / self.c);
        let mut lat = chi;
        for _ in 0..SPHERE_MAX_ITER {
            let next = 2.0 * (num * srat(self.e * lat.sin(), -0.5 * self.e)).atan() - HALF_PI;
            let done = (next - lat).abs() < DEL_TOL;
            lat = next;
            if done {
                return Ok((lam / self.c, lat));
            }
        }
        Err(ProjError::Convergence {
            routine: "gauss",
            iterations: SPHERE_MAX_ITER,
        })
    }
}

/// The conformal sphere as a projection: `(a·Λ, a·χ)`.
#[derive(Debug, Clone)]
pub struct GaussProjection {
    sphere: GaussSphere,
    a: f64,
    lon0: f64,
}

impl GaussProjection {
    pub fn new(params: &ProjParams) -> Result<Self, ProjError> {
        Ok(Self {
            sphere: GaussSphere::new(params.e, params.lat0)?,
            a: params.a,
            lon0: params.long0,
        })
    }
}

impl Projection for GaussProjection {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let (lam, chi) = self.sphere.to_sphere(adjust_lon(lon - self.lon0), lat);
        Ok((self.a * lam, self.a * chi))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (dlon, lat) = self.sphere.from_sphere(x / self.a, y / self.a)?;
        Ok((adjust_lon(dlon + self.lon0), lat))
    }
}
