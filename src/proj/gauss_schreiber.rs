//! Gauss-Schreiber Transverse Mercator (the Réunion grid).
//!
//! The ellipsoid is first mapped conformally onto a sphere, which is then
//! projected with the spherical transverse Mercator.

use crate::constants::PI;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, invlatiso, latiso};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone)]
pub struct GaussSchreiber {
    e: f64,
    lc: f64,
    rs: f64,
    cp: f64,
    n2: f64,
    ys: f64,
}

impl GaussSchreiber {
    pub fn new(params: &ProjParams) -> Self {
        let es = params.es;
        let lat0 = params.lat0;
        let sinz = lat0.sin();

        let rs = (1.0 + es * lat0.cos().powi(4) / (1.0 - es)).sqrt();
        let pc = (sinz / rs).asin();
        let cp = latiso(0.0, pc, pc.sin()) - rs * latiso(params.e, lat0, sinz);
        let n2 = params.k0 * params.a * (1.0 - es).sqrt() / (1.0 - es * sinz * sinz);

        Self {
            e: params.e,
            lc: params.long0,
            rs,
            cp,
            n2,
            ys: -n2 * pc,
        }
    }
}

impl Projection for GaussSchreiber {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let l = self.rs * adjust_lon(lon - self.lc);
        if l.abs() > PI {
            return Err(ProjError::Domain(format!(
                "gstmerc longitude {lon} rad wraps past the antimeridian"
            )));
        }
        let ls = self.cp + self.rs * latiso(self.e, lat, lat.sin());
        let lat1 = (l.sin() / ls.cosh()).asin();
        let ls1 = latiso(0.0, lat1, lat1.sin());
        let x = self.n2 * ls1;
        let y = self.ys + self.n2 * ls.sinh().atan2(l.cos());
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let xn = x / self.n2;
        let yn = (y - self.ys) / self.n2;
        let l = xn.sinh().atan2(yn.cos());
        let lat1 = (yn.sin() / xn.cosh()).asin();
        let lc = latiso(0.0, lat1, lat1.sin());
        let lon = adjust_lon(self.lc + l / self.rs);
        let lat = invlatiso(self.e, (lc - self.cp) / self.rs)?;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::D2R;
    use crate::ellipsoid::Ellipsoid;
    use approx::assert_relative_eq;

    fn reunion() -> GaussSchreiber {
        let params = ProjParams {
            long0: 55.533_333_333_333_33 * D2R,
            lat0: -21.116_666_666_666_67 * D2R,
            ..ProjParams::new(&Ellipsoid::named("intl").unwrap())
        };
        GaussSchreiber::new(&params)
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let (x, y) = reunion()
            .forward(55.533_333_333_333_33 * D2R, -21.116_666_666_666_67 * D2R)
            .unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_roundtrip() {
        let proj = reunion();
        for &(lon_deg, lat_deg) in &[(55.45, -20.88), (55.7, -21.35), (55.2, -21.0)] {
            let (lon, lat) = (lon_deg * D2R, lat_deg * D2R);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-11);
            assert_relative_eq!(lat2, lat, epsilon = 1e-11);
        }
    }

    #[test]
    fn test_north_is_up_on_central_meridian() {
        let proj = reunion();
        let (x, y) = proj.forward(55.533_333_333_333_33 * D2R, -20.9 * D2R).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert!(y > 23_000.0 && y < 25_000.0, "y = {y}");
    }

    #[test]
    fn test_far_points_keep_their_quadrant() {
        let proj = reunion();
        for &(lon_deg, lat_deg) in &[(100.0, -60.0), (170.0, 30.0), (-100.0, 10.0)] {
            let (lon, lat) = (lon_deg * D2R, lat_deg * D2R);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-10);
        }
    }
}
