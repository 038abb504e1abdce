//! Mollweide projection (spherical form on radius `a`).

use std::f64::consts::SQRT_2;

use crate::constants::{EPSLN, HALF_PI, PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, sign};
use crate::proj::{ProjParams, Projection};

const MAX_ITER: usize = 50;

#[derive(Debug, Clone)]
pub struct Mollweide {
    a: f64,
    lon0: f64,
}

impl Mollweide {
    pub fn new(params: &ProjParams) -> Self {
        Self {
            a: params.a,
            lon0: params.long0,
        }
    }

    /// Solve `2θ + sin 2θ = π sin φ` for θ.
    fn auxiliary_angle(lat: f64) -> Result<f64, ProjError> {
        if HALF_PI - lat.abs() < EPSLN {
            return Ok(sign(lat) * HALF_PI);
        }
        let con = PI * lat.sin();
        let mut theta = lat;
        for _ in 0..MAX_ITER {
            let delta = -(theta + theta.sin() - con) / (1.0 + theta.cos());
            theta += delta;
            if delta.abs() < EPSLN {
                return Ok(theta / 2.0);
            }
        }
        Err(ProjError::Convergence {
            routine: "mollweide",
            iterations: MAX_ITER,
        })
    }
}

impl Projection for Mollweide {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let theta = Self::auxiliary_angle(lat)?;
        let dlon = adjust_lon(lon - self.lon0);
        let x = 2.0 * SQRT_2 / PI * self.a * dlon * theta.cos();
        let y = SQRT_2 * self.a * theta.sin();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let arg = y / (SQRT_2 * self.a);
        if arg.abs() > 1.0 + EPSLN {
            return Err(ProjError::Domain(format!(
                "mollweide northing {y} is outside the ellipse"
            )));
        }
        let theta = arg.clamp(-1.0, 1.0).asin();
        let cos_theta = theta.cos();
        let dlon = if cos_theta.abs() < EPSLN {
            0.0
        } else {
            x / (2.0 * SQRT_2 / PI * self.a * cos_theta)
        };
        if dlon.abs() > PI + EPSLN {
            return Err(ProjError::Domain(format!(
                "mollweide easting {x} is outside the ellipse"
            )));
        }
        let lat = ((2.0 * theta + (2.0 * theta).sin()) / PI).clamp(-1.0, 1.0).asin();
        Ok((adjust_lon(self.lon0 + dlon), lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::D2R;
    use approx::assert_relative_eq;

    const R: f64 = 6_370_997.0;

    #[test]
    fn test_bounds() {
        let proj = Mollweide::new(&ProjParams::sphere(R));
        let (_, y) = proj.forward(0.0, HALF_PI).unwrap();
        assert_relative_eq!(y, SQRT_2 * R, epsilon = 1e-6);
        let (x, _) = proj.forward(PI - 1e-12, 0.0).unwrap();
        assert_relative_eq!(x, 2.0 * SQRT_2 * R, epsilon = 1e-3);
    }

    #[test]
    fn test_roundtrip() {
        let proj = Mollweide::new(&ProjParams::sphere(R));
        for &(lon, lat) in &[(0.0, 0.0), (120.0, 45.0), (-60.0, -80.0), (10.0, 89.0)] {
            let (x, y) = proj.forward(lon * D2R, lat * D2R).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon * D2R, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat * D2R, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_outside_ellipse() {
        let proj = Mollweide::new(&ProjParams::sphere(R));
        assert!(matches!(
            proj.inverse(0.0, 2.0 * R),
            Err(ProjError::Domain(_))
        ));
        assert!(matches!(
            proj.inverse(3.0 * R, 0.0),
            Err(ProjError::Domain(_))
        ));
    }
}
