//! Transverse Mercator projection: Krüger n-series, 6th order.
//!
//! Implements the Karney (2011) formulation with 6th-order α/β series coefficients.
//! This is the projection underlying all UTM zones.

use crate::constants::{D2R, EPSLN, HALF_PI, LAT_MAX_ITER};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, finite};
use crate::proj::{ProjParams, Projection};

/// Largest |η'| the Krüger series is evaluated at.
const ETA_MAX: f64 = 2.623_395_162_778;

#[derive(Debug, Clone)]
pub struct TransverseMercator {
    e: f64,
    es: f64,
    lon0: f64,
    k0: f64,
    // Precomputed constants
    a_hat: f64,      // A = a/(1+n) * (1 + n²/4 + n⁴/64)
    alpha: [f64; 6], // Forward series coefficients
    beta: [f64; 6],  // Inverse series coefficients
    m0: f64,         // Normalized meridional arc at lat0
}

/// Rewrite `params` into the transverse Mercator origin of its UTM zone.
pub fn configure_utm(params: &mut ProjParams) -> Result<(), ProjError> {
    let zone = match params.zone {
        Some(zone) if (1..=60).contains(&zone) => zone,
        Some(zone) => {
            return Err(ProjError::Configuration(format!(
                "utm zone {zone} is outside 1..=60"
            )))
        }
        None => {
            return Err(ProjError::Configuration(
                "utm requires a zone".to_string(),
            ))
        }
    };
    params.long0 = (6.0 * zone as f64 - 183.0) * D2R;
    params.lat0 = 0.0;
    params.x0 = 500_000.0;
    params.y0 = if params.south { 10_000_000.0 } else { 0.0 };
    params.k0 = 0.9996;
    Ok(())
}

impl TransverseMercator {
    pub fn new(params: &ProjParams) -> Self {
        let n = (params.a - params.b) / (params.a + params.b);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        let a_hat = params.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0);

        let alpha = Self::alpha_coefficients(n, n2, n3, n4, n5, n6);
        let beta = Self::beta_coefficients(n, n2, n3, n4, n5, n6);

        let m0 = Self::meridional_arc_normalized(params.lat0, n);

        Self {
            e: params.e,
            es: params.es,
            lon0: params.long0,
            k0: params.k0,
            a_hat,
            alpha,
            beta,
            m0,
        }
    }

    /// Forward series coefficients α₁..α₆ (Krüger, 6th order).
    fn alpha_coefficients(n: f64, n2: f64, n3: f64, n4: f64, n5: f64, n6: f64) -> [f64; 6] {
        [
            // α₁
            n / 2.0 - 2.0 / 3.0 * n2 + 5.0 / 16.0 * n3 + 41.0 / 180.0 * n4 - 127.0 / 288.0 * n5
                + 7891.0 / 37800.0 * n6,
            // α₂
            13.0 / 48.0 * n2 - 3.0 / 5.0 * n3 + 557.0 / 1440.0 * n4 + 281.0 / 630.0 * n5
                - 1983433.0 / 1935360.0 * n6,
            // α₃
            61.0 / 240.0 * n3 - 103.0 / 140.0 * n4
                + 15061.0 / 26880.0 * n5
                + 167603.0 / 181440.0 * n6,
            // α₄
            49561.0 / 161280.0 * n4 - 179.0 / 168.0 * n5 + 6601661.0 / 7257600.0 * n6,
            // α₅
            34729.0 / 80640.0 * n5 - 3418889.0 / 1995840.0 * n6,
            // α₆
            212378941.0 / 319334400.0 * n6,
        ]
    }

    /// Inverse series coefficients β₁..β₆ (Krüger, 6th order).
    fn beta_coefficients(n: f64, n2: f64, n3: f64, n4: f64, n5: f64, n6: f64) -> [f64; 6] {
        [
            // β₁
            n / 2.0 - 2.0 / 3.0 * n2 + 37.0 / 96.0 * n3 - 1.0 / 360.0 * n4 - 81.0 / 512.0 * n5
                + 96199.0 / 604800.0 * n6,
            // β₂
            1.0 / 48.0 * n2 + 1.0 / 15.0 * n3 - 437.0 / 1440.0 * n4 + 46.0 / 105.0 * n5
                - 1118711.0 / 3870720.0 * n6,
            // β₃
            17.0 / 480.0 * n3 - 37.0 / 840.0 * n4 - 209.0 / 4480.0 * n5 + 5569.0 / 90720.0 * n6,
            // β₄
            4397.0 / 161280.0 * n4 - 11.0 / 504.0 * n5 - 830251.0 / 7257600.0 * n6,
            // β₅
            4583.0 / 161280.0 * n5 - 108847.0 / 3991680.0 * n6,
            // β₆
            20648693.0 / 638668800.0 * n6,
        ]
    }

    /// Normalized meridional arc distance (ξ₀).
    fn meridional_arc_normalized(phi: f64, n: f64) -> f64 {
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;

        let a2 = -3.0 / 2.0 * n + 9.0 / 16.0 * n3;
        let a4 = 15.0 / 16.0 * n2 - 15.0 / 32.0 * n4;
        let a6 = -35.0 / 48.0 * n3;
        let a8 = 315.0 / 512.0 * n4;

        phi + a2 * (2.0 * phi).sin()
            + a4 * (4.0 * phi).sin()
            + a6 * (6.0 * phi).sin()
            + a8 * (8.0 * phi).sin()
    }

    /// Convert geodetic tangent τ to conformal tangent τ'.
    fn tau_to_tau_prime(&self, tau: f64) -> f64 {
        let tau1 = (1.0 + tau * tau).sqrt(); // = sec(φ) = hypot(1, τ)
        let sigma = (self.e * (self.e * tau / tau1).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * tau1
    }

    /// Convert conformal tangent τ' back to geodetic tangent τ via Newton iteration.
    fn tau_prime_to_tau(&self, tau_prime: f64) -> Result<f64, ProjError> {
        let mut tau = tau_prime; // initial guess

        for _ in 0..LAT_MAX_ITER {
            let tau1 = (1.0 + tau * tau).sqrt();
            let sigma = (self.e * (self.e * tau / tau1).atanh()).sinh();
            let tau_prime_est = tau * (1.0 + sigma * sigma).sqrt() - sigma * tau1;
            let dtau = (tau_prime - tau_prime_est) * (1.0 + (1.0 - self.es) * tau * tau)
                / ((1.0 - self.es) * tau1 * (1.0 + tau_prime_est * tau_prime_est).sqrt());
            tau += dtau;
            if dtau.abs() < 1e-12 * (1.0 + tau.abs()) {
                return Ok(tau);
            }
        }
        Err(ProjError::Convergence {
            routine: "tmerc conformal latitude",
            iterations: LAT_MAX_ITER,
        })
    }
}

impl Projection for TransverseMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlam = adjust_lon(lon - self.lon0);

        // Convert geodetic tangent to conformal tangent
        let tau = lat.tan();
        let tau_prime = self.tau_to_tau_prime(tau);

        // Both equator points a quarter turn from the central meridian map
        // to infinity.
        let denom = tau_prime.hypot(dlam.cos());
        if denom < EPSLN {
            return Err(ProjError::Domain(format!(
                "point {dlam} rad from the central meridian on the equator is at infinity"
            )));
        }

        // ξ' = atan2(τ', cos(Δλ))
        let xi_prime = tau_prime.atan2(dlam.cos());
        // η' = asinh(sin(Δλ) / hypot(τ', cos(Δλ)))
        let eta_prime = (dlam.sin() / denom).asinh();
        if eta_prime.abs() > ETA_MAX {
            return Err(ProjError::Domain(format!(
                "point {dlam} rad from the central meridian is outside the series range"
            )));
        }

        // Apply α series (forward)
        let mut xi = xi_prime;
        let mut eta = eta_prime;
        for (j, &a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi += a * (k * xi_prime).sin() * (k * eta_prime).cosh();
            eta += a * (k * xi_prime).cos() * (k * eta_prime).sinh();
        }

        let x = self.k0 * self.a_hat * eta;
        let y = self.k0 * self.a_hat * (xi - self.m0);

        Ok((finite(x, "tmerc easting")?, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let eta = x / (self.k0 * self.a_hat);
        let xi = y / (self.k0 * self.a_hat) + self.m0;

        // Apply β series (inverse)
        let mut xi_prime = xi;
        let mut eta_prime = eta;
        for (j, &b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j as f64 + 1.0);
            xi_prime -= b * (k * xi).sin() * (k * eta).cosh();
            eta_prime -= b * (k * xi).cos() * (k * eta).sinh();
        }

        if !(xi_prime.abs() <= HALF_PI + EPSLN && eta_prime.abs() <= ETA_MAX) {
            return Err(ProjError::Domain(format!(
                "tmerc coordinate ({x}, {y}) is off the projection"
            )));
        }

        let sinh_eta = eta_prime.sinh();
        let cos_xi = xi_prime.cos();
        let sin_xi = xi_prime.sin();
        let r = sinh_eta.hypot(cos_xi);
        if r < f64::EPSILON {
            // ξ' = ±π/2, η' = 0: the pole itself.
            return Ok((self.lon0, HALF_PI.copysign(sin_xi)));
        }
        // τ' = sin(ξ') / hypot(sinh(η'), cos(ξ'))
        let tau_prime = sin_xi / r;

        // Recover geodetic tangent τ from conformal tangent τ'
        let tau = self.tau_prime_to_tau(tau_prime)?;

        let lat = tau.atan();
        let lon = adjust_lon(self.lon0 + sinh_eta.atan2(cos_xi));

        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ellipsoid::WGS84;
    use approx::assert_relative_eq;

    /// Zone projection plus its false easting/northing, for readable checks.
    fn utm_zone(zone: i32, north: bool) -> (TransverseMercator, f64, f64) {
        let mut params = ProjParams {
            zone: Some(zone),
            south: !north,
            ..ProjParams::new(&WGS84)
        };
        configure_utm(&mut params).unwrap();
        (TransverseMercator::new(&params), params.x0, params.y0)
    }

    #[test]
    fn test_configure_utm_zone33() {
        let mut params = ProjParams {
            zone: Some(33),
            ..ProjParams::new(&WGS84)
        };
        configure_utm(&mut params).unwrap();
        assert_relative_eq!(params.long0, (6.0 * 33.0 - 183.0) * D2R);
        assert_relative_eq!(params.x0, 500_000.0);
        assert_relative_eq!(params.y0, 0.0);
        assert_relative_eq!(params.k0, 0.9996);
    }

    #[test]
    fn test_configure_utm_rejects_bad_zone() {
        for zone in [Some(0), Some(61), None] {
            let mut params = ProjParams {
                zone,
                ..ProjParams::new(&WGS84)
            };
            assert!(matches!(
                configure_utm(&mut params),
                Err(ProjError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_roundtrip_utm33() {
        let (tm, _, _) = utm_zone(33, true);
        let cases: &[(f64, f64)] = &[
            (15.0, 52.0), // Berlin area (central meridian)
            (12.0, 50.0), // near zone boundary
            (18.0, 50.0), // near other boundary
            (15.0, 0.0),  // equator
            (15.0, 80.0), // high latitude
            (13.5, 52.5), // off-center
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg * D2R;
            let lat = lat_deg * D2R;
            let (x, y) = tm.forward(lon, lat).unwrap();
            let (lon2, lat2) = tm.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_central_meridian_easting() {
        let (tm, x0, _) = utm_zone(33, true);
        let (e, _) = tm.forward(15.0 * D2R, 45.0 * D2R).unwrap();
        assert_relative_eq!(e + x0, 500_000.0, epsilon = 0.01);
    }

    #[test]
    fn test_utm_zone33n_known_point() {
        // (15°E, 52°N) on the central meridian of zone 33N.
        let (tm, x0, y0) = utm_zone(33, true);
        let (e, n) = tm.forward(15.0 * D2R, 52.0 * D2R).unwrap();
        assert_relative_eq!(e + x0, 500_000.0, epsilon = 1.0);
        let n = n + y0;
        assert!(n > 5_760_000.0 && n < 5_762_000.0, "northing = {n}");
    }

    #[test]
    fn test_southern_hemisphere() {
        let (tm, _, y0) = utm_zone(33, false);
        let lon = 15.0 * D2R;
        let lat = -30.0 * D2R;
        let (x, y) = tm.forward(lon, lat).unwrap();
        assert!(y + y0 > 0.0, "southing should be positive with FN=10M, got {y}");
        let (lon2, lat2) = tm.inverse(x, y).unwrap();
        assert_relative_eq!(lon2, lon, epsilon = 1e-9);
        assert_relative_eq!(lat2, lat, epsilon = 1e-9);
    }

    #[test]
    fn test_multiple_zones() {
        for zone in [1, 10, 17, 30, 33, 45, 60] {
            let (tm, _, _) = utm_zone(zone, true);
            let cm_deg = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;
            // Test point 2° off center
            let lon = (cm_deg + 2.0) * D2R;
            let lat = 45.0 * D2R;
            let (x, y) = tm.forward(lon, lat).unwrap();
            let (lon2, lat2) = tm.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_quarter_turn_on_equator_is_domain_error() {
        let tm = TransverseMercator::new(&ProjParams {
            long0: 10.0 * D2R,
            ..ProjParams::new(&WGS84)
        });
        for lon in [10.0 * D2R + HALF_PI, 10.0 * D2R - HALF_PI] {
            assert!(matches!(tm.forward(lon, 0.0), Err(ProjError::Domain(_))));
        }
        // Next to the singularity the series is no longer meaningful.
        assert!(matches!(
            tm.forward(10.0 * D2R + HALF_PI, 1.0 * D2R),
            Err(ProjError::Domain(_))
        ));
        let (x, _) = tm.forward(90.0 * D2R, 0.0).unwrap();
        assert!(x.is_finite() && x > 1.0e7);
    }

    #[test]
    fn test_inverse_off_the_projection_is_domain_error() {
        let tm = TransverseMercator::new(&ProjParams::new(&WGS84));
        assert!(matches!(tm.inverse(0.0, 4.0e7), Err(ProjError::Domain(_))));
        assert!(matches!(tm.inverse(3.0e7, 0.0), Err(ProjError::Domain(_))));
        let (_, lat) = tm.inverse(0.0, 1.0e7).unwrap();
        assert!(lat > 89.0 * D2R && lat <= HALF_PI);
    }

    #[test]
    fn test_pole_inverse() {
        let tm = TransverseMercator::new(&ProjParams::new(&WGS84));
        let (_, y) = tm.forward(0.0, HALF_PI).unwrap();
        let (_, lat) = tm.inverse(0.0, y).unwrap();
        assert_relative_eq!(lat, HALF_PI, epsilon = 1e-9);
    }

    #[test]
    fn test_sphere_origin_latitude() {
        let params = ProjParams {
            lat0: 49.0 * D2R,
            ..ProjParams::sphere(6_370_997.0)
        };
        let tm = TransverseMercator::new(&params);
        let (x, y) = tm.forward(0.0, 49.0 * D2R).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }
}
