//! Miller Cylindrical projection.
//!
//! forward: x = a·(λ - λ₀), y = 1.25·a·ln(tan(π/4 + 0.4·φ))

use crate::constants::FORT_PI;
use crate::error::ProjError;
use crate::proj::common::adjust_lon;
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct Miller {
    a: f64,
    lon0: f64,
}

impl Miller {
    pub fn new(params: &ProjParams) -> Self {
        Self {
            a: params.a,
            lon0: params.long0,
        }
    }
}

impl Projection for Miller {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let x = self.a * adjust_lon(lon - self.lon0);
        let y = self.a * (FORT_PI + lat / 2.5).tan().ln() * 1.25;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let lon = adjust_lon(self.lon0 + x / self.a);
        let lat = 2.5 * ((0.8 * y / self.a).exp().atan() - FORT_PI);
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{D2R, HALF_PI};
    use approx::assert_relative_eq;

    #[test]
    fn test_poles_are_finite() {
        let proj = Miller::new(&ProjParams::sphere(6_370_997.0));
        let (_, y) = proj.forward(0.0, HALF_PI).unwrap();
        // 1.25 ln(tan(0.45π)) on the unit sphere
        assert_relative_eq!(y / 6_370_997.0, 2.303_412_543, epsilon = 1e-9);
        let (_, lat) = proj.inverse(0.0, y).unwrap();
        assert_relative_eq!(lat, HALF_PI, epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip() {
        let proj = Miller::new(&ProjParams::sphere(6_370_997.0));
        let (x, y) = proj.forward(-100.0 * D2R, 35.0 * D2R).unwrap();
        let (lon, lat) = proj.inverse(x, y).unwrap();
        assert_relative_eq!(lon, -100.0 * D2R, epsilon = 1e-12);
        assert_relative_eq!(lat, 35.0 * D2R, epsilon = 1e-12);
    }
}
