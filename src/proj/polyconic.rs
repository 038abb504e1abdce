//! American Polyconic projection.

use crate::constants::{EPSLN, LAT_MAX_ITER};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, checked_lat, msfn, MeridianArc};
use crate::proj::{ProjParams, Projection};

/// Latitudes closer than this to the equator use the equatorial limit.
const EQUATOR_TOL: f64 = 1.0e-7;

#[derive(Debug, Clone)]
pub struct Polyconic {
    a: f64,
    e: f64,
    es: f64,
    lon0: f64,
    arc: MeridianArc,
    ml0: f64,
}

impl Polyconic {
    pub fn new(params: &ProjParams) -> Self {
        let arc = MeridianArc::new(params.es);
        Self {
            a: params.a,
            e: params.e,
            es: params.es,
            lon0: params.long0,
            ml0: arc.distance(params.lat0),
            arc,
        }
    }

    /// Newton iteration for the latitude of a point given `al = M0 + y`
    /// and `b = al² + x²` (all in units of `a`).
    fn phi4z(&self, al: f64, b: f64) -> Result<f64, ProjError> {
        let arc = &self.arc;
        let mut phi = al;
        for _ in 0..LAT_MAX_ITER {
            let sinphi = phi.sin();
            let c = phi.tan() * (1.0 - self.es * sinphi * sinphi).sqrt();
            let sin2ph = (2.0 * phi).sin();
            let ml = arc.distance(phi);
            let mlp = arc.derivative(phi);
            let con1 = 2.0 * ml + c * (ml * ml + b) - 2.0 * al * (c * ml + 1.0);
            let con2 = self.es * sin2ph * (ml * ml + b - 2.0 * al * ml) / (2.0 * c);
            let con3 = 2.0 * (al - ml) * (c * mlp - 2.0 / sin2ph) - 2.0 * mlp;
            let dphi = con1 / (con2 + con3);
            phi += dphi;
            if dphi.abs() <= EPSLN {
                return Ok(phi);
            }
        }
        Err(ProjError::Convergence {
            routine: "phi4z",
            iterations: LAT_MAX_ITER,
        })
    }
}

impl Projection for Polyconic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        if lat.abs() <= EQUATOR_TOL {
            return Ok((self.a * dlon, -self.a * self.ml0));
        }
        let (sinphi, cosphi) = lat.sin_cos();
        let ml = self.arc.distance(lat);
        let ms = msfn(self.e, sinphi, cosphi);
        let big_e = dlon * sinphi;
        let x = self.a * ms * big_e.sin() / sinphi;
        let y = self.a * (ml - self.ml0 + ms * (1.0 - big_e.cos()) / sinphi);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (x, y) = (x / self.a, y / self.a);
        let al = self.ml0 + y;
        if al.abs() <= EQUATOR_TOL {
            return Ok((adjust_lon(x + self.lon0), 0.0));
        }
        let lat = checked_lat(self.phi4z(al, al * al + x * x)?)?;
        let sinphi = lat.sin();
        let c = lat.tan() * (1.0 - self.es * sinphi * sinphi).sqrt();
        let lon = adjust_lon(asinz(x * c) / sinphi + self.lon0);
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::D2R;
    use crate::ellipsoid::{Ellipsoid, WGS84};
    use approx::assert_relative_eq;

    #[test]
    fn test_equator_is_true_to_scale() {
        let proj = Polyconic::new(&ProjParams::new(&WGS84));
        let (x, y) = proj.forward(1.0 * D2R, 0.0).unwrap();
        assert_relative_eq!(x, WGS84.a * D2R, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0);
        let (lon, lat) = proj.inverse(x, 0.0).unwrap();
        assert_relative_eq!(lon, D2R, epsilon = 1e-12);
        assert_relative_eq!(lat, 0.0);
    }

    #[test]
    fn test_roundtrip() {
        let params = ProjParams {
            long0: -54.0 * D2R,
            lat0: 0.0,
            ..ProjParams::new(&Ellipsoid::named("GRS80").unwrap())
        };
        let proj = Polyconic::new(&params);
        for &(lon_deg, lat_deg) in &[(-47.9, -15.8), (-60.0, 5.0), (-40.0, -30.0)] {
            let (lon, lat) = (lon_deg * D2R, lat_deg * D2R);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sphere_roundtrip() {
        let params = ProjParams {
            lat0: 30.0 * D2R,
            ..ProjParams::sphere(6_370_997.0)
        };
        let proj = Polyconic::new(&params);
        let (lon, lat) = (20.0 * D2R, 45.0 * D2R);
        let (x, y) = proj.forward(lon, lat).unwrap();
        let (lon2, lat2) = proj.inverse(x, y).unwrap();
        assert_relative_eq!(lon2, lon, epsilon = 1e-9);
        assert_relative_eq!(lat2, lat, epsilon = 1e-9);
    }

    #[test]
    fn test_far_side_does_not_come_back_as_a_latitude() {
        let proj = Polyconic::new(&ProjParams::new(&WGS84));
        let (x, y) = proj.forward(175.0 * D2R, -40.0 * D2R).unwrap();
        assert!(matches!(proj.inverse(x, y), Err(ProjError::Domain(_))));
    }
}
