//! Swiss Oblique Mercator (`somerc`), the CH1903 / CH1903+ grids.

use crate::constants::{FORT_PI, HALF_PI, PI, SPHERE_MAX_ITER};
use crate::error::ProjError;
use crate::proj::common::adjust_lon;
use crate::proj::{ProjParams, Projection};

const INV_TOL: f64 = 1.0e-12;

#[derive(Debug, Clone)]
pub struct SwissObliqueMercator {
    e: f64,
    lon0: f64,
    r: f64,     // radius of the projection sphere
    alpha: f64, // longitude scale onto the sphere
    b0: f64,    // spherical latitude of the origin
    k: f64,
}

impl SwissObliqueMercator {
    pub fn new(params: &ProjParams) -> Self {
        let (e, es) = (params.e, params.es);
        let phy0 = params.lat0;
        let sin_phy0 = phy0.sin();

        let r = params.k0 * params.a * (1.0 - es).sqrt() / (1.0 - es * sin_phy0 * sin_phy0);
        let alpha = (1.0 + es / (1.0 - es) * phy0.cos().powi(4)).sqrt();
        let b0 = (sin_phy0 / alpha).asin();
        let k = (FORT_PI + b0 / 2.0).tan().ln() - alpha * (FORT_PI + phy0 / 2.0).tan().ln()
            + alpha * e / 2.0 * ((1.0 + e * sin_phy0) / (1.0 - e * sin_phy0)).ln();

        Self {
            e,
            lon0: params.long0,
            r,
            alpha,
            b0,
            k,
        }
    }
}

impl Projection for SwissObliqueMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let e = self.e;
        let sa1 = (FORT_PI - lat / 2.0).tan().ln();
        let sa2 = e / 2.0 * ((1.0 + e * lat.sin()) / (1.0 - e * lat.sin())).ln();
        let s = -self.alpha * (sa1 + sa2) + self.k;

        // Spherical latitude/longitude, then rotate the pole onto the origin.
        let b = 2.0 * (s.exp().atan() - FORT_PI);
        let i = self.alpha * adjust_lon(lon - self.lon0);
        if i.abs() > PI {
            return Err(ProjError::Domain(format!(
                "somerc longitude {lon} rad wraps past the antimeridian"
            )));
        }
        let (sin_b0, cos_b0) = self.b0.sin_cos();
        let (sin_b, cos_b) = b.sin_cos();
        let rot_i = (i.sin() * cos_b).atan2(sin_b0 * sin_b + cos_b0 * cos_b * i.cos());
        let rot_b = (cos_b0 * sin_b - sin_b0 * cos_b * i.cos()).asin();

        let x = self.r * rot_i;
        let y = self.r / 2.0 * ((1.0 + rot_b.sin()) / (1.0 - rot_b.sin())).ln();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rot_i = x / self.r;
        let rot_b = 2.0 * ((y / self.r).exp().atan() - FORT_PI);
        let (sin_b0, cos_b0) = self.b0.sin_cos();

        let (sin_rb, cos_rb) = rot_b.sin_cos();
        let b = (cos_b0 * sin_rb + sin_b0 * cos_rb * rot_i.cos()).asin();
        let i = (rot_i.sin() * cos_rb).atan2(cos_b0 * cos_rb * rot_i.cos() - sin_b0 * sin_rb);
        let lon = adjust_lon(self.lon0 + i / self.alpha);

        let e = self.e;
        let iso_b = ((FORT_PI + b / 2.0).tan().ln() - self.k) / self.alpha;
        let mut phy = b;
        for _ in 0..SPHERE_MAX_ITER {
            let s = iso_b + e * (FORT_PI + (e * phy.sin()).asin() / 2.0).tan().ln();
            let next = 2.0 * s.exp().atan() - HALF_PI;
            if (next - phy).abs() <= INV_TOL {
                return Ok((lon, next));
            }
            phy = next;
        }
        Err(ProjError::Convergence {
            routine: "somerc inverse",
            iterations: SPHERE_MAX_ITER,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::D2R;
    use crate::ellipsoid::Ellipsoid;
    use approx::assert_relative_eq;

    fn lv03() -> SwissObliqueMercator {
        let params = ProjParams {
            long0: 7.439_583_333_333_333 * D2R,
            lat0: 46.952_405_555_555_56 * D2R,
            ..ProjParams::new(&Ellipsoid::named("bessel").unwrap())
        };
        SwissObliqueMercator::new(&params)
    }

    #[test]
    fn test_bern_origin() {
        let (x, y) = lv03()
            .forward(7.439_583_333_333_333 * D2R, 46.952_405_555_555_56 * D2R)
            .unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zurich() {
        let (x, y) = lv03().forward(8.5 * D2R, 47.3 * D2R).unwrap();
        assert_relative_eq!(x + 600_000.0, 680_187.805, epsilon = 0.01);
        assert_relative_eq!(y + 200_000.0, 239_181.420, epsilon = 0.01);
    }

    #[test]
    fn test_roundtrip() {
        let proj = lv03();
        for &(lon_deg, lat_deg) in &[(8.5, 47.3), (6.14, 46.2), (10.2, 46.6)] {
            let (lon, lat) = (lon_deg * D2R, lat_deg * D2R);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-11);
            assert_relative_eq!(lat2, lat, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_far_points_keep_their_quadrant() {
        let proj = lv03();
        for &(lon_deg, lat_deg) in &[(100.0, -60.0), (-170.0, 30.0), (150.0, 70.0)] {
            let (lon, lat) = (lon_deg * D2R, lat_deg * D2R);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-10);
        }
    }
}
