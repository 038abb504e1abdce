//! Cassini-Soldner projection.
//!
//! The ellipsoidal form is the usual truncated series about the central
//! meridian, so it is only accurate within a few degrees of it.

use crate::error::ProjError;
use crate::proj::common::{adjust_lon, checked_lat, MeridianArc};
use crate::proj::{ProjParams, Projection};

const C1: f64 = 1.0 / 6.0;
const C2: f64 = 1.0 / 120.0;
const C3: f64 = 1.0 / 24.0;
const C4: f64 = 1.0 / 3.0;
const C5: f64 = 1.0 / 15.0;

#[derive(Debug, Clone)]
pub struct Cassini {
    a: f64,
    es: f64,
    sphere: bool,
    lon0: f64,
    lat0: f64,
    arc: MeridianArc,
    m0: f64,
}

impl Cassini {
    pub fn new(params: &ProjParams) -> Self {
        let arc = MeridianArc::new(params.es);
        Self {
            a: params.a,
            es: params.es,
            sphere: params.sphere,
            lon0: params.long0,
            lat0: params.lat0,
            m0: arc.distance(params.lat0),
            arc,
        }
    }
}

impl Projection for Cassini {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let lam = adjust_lon(lon - self.lon0);
        if self.sphere {
            let x = (lat.cos() * lam.sin()).asin();
            let y = lat.tan().atan2(lam.cos()) - self.lat0;
            return Ok((self.a * x, self.a * y));
        }

        let (sinphi, cosphi) = lat.sin_cos();
        let n = 1.0 / (1.0 - self.es * sinphi * sinphi).sqrt();
        let tn = lat.tan();
        let t = tn * tn;
        let a1 = lam * cosphi;
        let c = self.es * cosphi * cosphi / (1.0 - self.es);
        let a2 = a1 * a1;

        let x = n * a1 * (1.0 - a2 * t * (C1 - (8.0 - t + 8.0 * c) * a2 * C2));
        let y = self.arc.distance(lat) - self.m0
            + n * tn * a2 * (0.5 + (5.0 - t + 6.0 * c) * a2 * C3);
        Ok((self.a * x, self.a * y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (x, y) = (x / self.a, y / self.a);
        if self.sphere {
            let dd = y + self.lat0;
            let lat = (dd.sin() * x.cos()).asin();
            let lam = x.tan().atan2(dd.cos());
            return Ok((adjust_lon(lam + self.lon0), lat));
        }

        // Footpoint latitude, then the series back out to the point.
        let ph1 = self.arc.latitude(self.m0 + y)?;
        let tn = ph1.tan();
        let t = tn * tn;
        let sinph1 = ph1.sin();
        let r = 1.0 / (1.0 - self.es * sinph1 * sinph1);
        let n = r.sqrt();
        let r = r * (1.0 - self.es) * n;
        let dd = x / n;
        let d2 = dd * dd;

        let lat = ph1 - (n * tn / r) * d2 * (0.5 - (1.0 + 3.0 * t) * d2 * C3);
        let lam = dd * (1.0 + t * d2 * (-C4 + (1.0 + 3.0 * t) * d2 * C5)) / ph1.cos();
        Ok((adjust_lon(lam + self.lon0), checked_lat(lat)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::D2R;
    use crate::ellipsoid::WGS84;
    use approx::assert_relative_eq;

    #[test]
    fn test_central_meridian_is_meridian_arc() {
        let proj = Cassini::new(&ProjParams::new(&WGS84));
        let (x, y) = proj.forward(0.0, 45.0 * D2R).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-9);
        // Meridian distance from the equator to 45°N on WGS84.
        assert_relative_eq!(y, 4_984_944.378, epsilon = 0.01);
    }

    #[test]
    fn test_ellipsoid_roundtrip_near_meridian() {
        let params = ProjParams {
            long0: -61.333_333 * D2R,
            lat0: 10.441_667 * D2R,
            ..ProjParams::new(&WGS84)
        };
        let proj = Cassini::new(&params);
        let (lon, lat) = (-61.0 * D2R, 10.6 * D2R);
        let (x, y) = proj.forward(lon, lat).unwrap();
        let (lon2, lat2) = proj.inverse(x, y).unwrap();
        assert_relative_eq!(lon2, lon, epsilon = 1e-10);
        assert_relative_eq!(lat2, lat, epsilon = 1e-10);
    }

    #[test]
    fn test_sphere_roundtrip() {
        let params = ProjParams {
            lat0: 20.0 * D2R,
            ..ProjParams::sphere(6_370_997.0)
        };
        let proj = Cassini::new(&params);
        let (lon, lat) = (25.0 * D2R, 50.0 * D2R);
        let (x, y) = proj.forward(lon, lat).unwrap();
        let (lon2, lat2) = proj.inverse(x, y).unwrap();
        assert_relative_eq!(lon2, lon, epsilon = 1e-12);
        assert_relative_eq!(lat2, lat, epsilon = 1e-12);
    }

    #[test]
    fn test_northing_past_the_pole_is_domain_error() {
        let proj = Cassini::new(&ProjParams::new(&WGS84));
        assert!(matches!(proj.inverse(0.0, 4.0e7), Err(ProjError::Domain(_))));
        assert!(matches!(proj.inverse(0.0, -1.1e7), Err(ProjError::Domain(_))));
        let (_, lat) = proj.inverse(0.0, 9.0e6).unwrap();
        assert!(lat > 80.0 * D2R && lat < 90.0 * D2R);
    }
}
