//! Azimuthal Equidistant projection (spherical form on radius `a`).
//!
//! Distances and azimuths from the origin are true. The antipode maps to a
//! whole circle and cannot be projected.

use crate::constants::{EPSLN, HALF_PI, PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct AzimuthalEquidistant {
    a: f64,
    lon0: f64,
    lat0: f64,
    sin_p12: f64,
    cos_p12: f64,
}

impl AzimuthalEquidistant {
    pub fn new(params: &ProjParams) -> Self {
        Self {
            a: params.a,
            lon0: params.long0,
            lat0: params.lat0,
            sin_p12: params.lat0.sin(),
            cos_p12: params.lat0.cos(),
        }
    }
}

impl Projection for AzimuthalEquidistant {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (sinphi, cosphi) = lat.sin_cos();
        let (sindlon, coslon) = dlon.sin_cos();
        let g = self.sin_p12 * sinphi + self.cos_p12 * cosphi * coslon;
        if (g.abs() - 1.0).abs() < EPSLN {
            if g < 0.0 {
                return Err(ProjError::Domain(format!(
                    "aeqd point ({lon}, {lat}) is the antipode of the origin"
                )));
            }
            return Ok((0.0, 0.0));
        }
        let z = g.clamp(-1.0, 1.0).acos();
        let ksp = z / z.sin();
        let x = self.a * ksp * cosphi * sindlon;
        let y = self.a * ksp * (self.cos_p12 * sinphi - self.sin_p12 * cosphi * coslon);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rh = x.hypot(y);
        if rh > PI * self.a {
            return Err(ProjError::Domain(format!(
                "aeqd radius {rh} exceeds half the circumference"
            )));
        }
        if rh <= EPSLN {
            return Ok((self.lon0, self.lat0));
        }
        let z = rh / self.a;
        let (sinz, cosz) = z.sin_cos();
        let lat = asinz(cosz * self.sin_p12 + y * sinz * self.cos_p12 / rh);
        let lon = if (self.lat0.abs() - HALF_PI).abs() <= EPSLN {
            if self.lat0 >= 0.0 {
                adjust_lon(self.lon0 + x.atan2(-y))
            } else {
                adjust_lon(self.lon0 - (-x).atan2(y))
            }
        } else {
            let con = cosz - self.sin_p12 * lat.sin();
            if con.abs() < EPSLN && x.abs() < EPSLN {
                self.lon0
            } else {
                adjust_lon(self.lon0 + (x * sinz * self.cos_p12).atan2(con * rh))
            }
        };
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::D2R;
    use approx::assert_relative_eq;

    const R: f64 = 6_370_997.0;

    #[test]
    fn test_distance_from_origin_is_true() {
        let proj = AzimuthalEquidistant::new(&ProjParams::sphere(R));
        let (x, y) = proj.forward(0.0, 60.0 * D2R).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, R * 60.0 * D2R, epsilon = 1e-6);
        let (x, y) = proj.forward(120.0 * D2R, 0.0).unwrap();
        assert_relative_eq!(x.hypot(y), R * 120.0 * D2R, epsilon = 1e-6);
    }

    #[test]
    fn test_roundtrip() {
        for lat0 in [90.0, -90.0, 0.0, 35.0] {
            let proj = AzimuthalEquidistant::new(&ProjParams {
                lat0: lat0 * D2R,
                ..ProjParams::sphere(R)
            });
            let lat_deg = if lat0 < 0.0 { -20.0 } else { 20.0 };
            let (lon, lat) = (100.0 * D2R, lat_deg * D2R);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_antipode_is_domain_error() {
        let proj = AzimuthalEquidistant::new(&ProjParams {
            lat0: 30.0 * D2R,
            ..ProjParams::sphere(R)
        });
        assert!(matches!(
            proj.forward(180.0 * D2R, -30.0 * D2R),
            Err(ProjError::Domain(_))
        ));
    }
}
