//! New Zealand Map Grid.
//!
//! A conformal complex polynomial in the isometric-latitude offset from the
//! origin. Only meaningful on the International 1924 ellipsoid around NZ.

use crate::constants::{LAT_MAX_ITER, SEC_TO_RAD};
use crate::error::ProjError;
use crate::proj::common::adjust_lon;
use crate::proj::{ProjParams, Projection};

/// Latitude offsets are taken in units of 10⁵ arc-seconds.
const LAT_UNIT: f64 = SEC_TO_RAD * 1.0e5;
const NEWTON_TOL: f64 = 1.0e-14;
/// Largest offset from the origin the polynomials hold for, as the norm of
/// (isometric latitude offset, longitude offset).
const THETA_MAX: f64 = 0.5;

const A: [f64; 10] = [
    0.639_917_507_3,
    -0.135_879_761_3,
    0.063_294_409,
    -0.025_268_53,
    0.011_787_9,
    -0.005_516_1,
    0.002_690_6,
    -0.001_333,
    0.000_67,
    -0.000_34,
];

const B: [Complex; 6] = [
    Complex::new(0.755_785_322_8, 0.0),
    Complex::new(0.249_204_646, 0.003_371_507),
    Complex::new(-0.001_541_739, 0.041_058_560),
    Complex::new(-0.101_629_07, 0.017_276_09),
    Complex::new(-0.266_234_89, -0.362_492_18),
    Complex::new(-0.687_098_3, -1.165_196_7),
];

const C: [Complex; 6] = [
    Complex::new(1.323_127_043_9, 0.0),
    Complex::new(-0.577_245_789, -0.007_809_598),
    Complex::new(0.508_307_513, -0.112_208_952),
    Complex::new(-0.150_947_62, 0.182_006_02),
    Complex::new(1.014_181_79, 1.644_976_96),
    Complex::new(1.966_054_9, 5.365_580_3),
];

const D: [f64; 9] = [
    1.562_701_424_3,
    0.518_540_639_8,
    -0.033_330_98,
    -0.105_290_6,
    -0.036_859_4,
    0.007_317,
    0.012_20,
    0.003_94,
    -0.001_3,
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Complex {
    re: f64,
    im: f64,
}

impl Complex {
    const ZERO: Complex = Complex::new(0.0, 0.0);

    const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn add(self, o: Self) -> Self {
        Self::new(self.re + o.re, self.im + o.im)
    }

    fn mul(self, o: Self) -> Self {
        Self::new(
            self.re * o.re - self.im * o.im,
            self.im * o.re + self.re * o.im,
        )
    }

    fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    fn div(self, o: Self) -> Self {
        let den = o.re * o.re + o.im * o.im;
        Self::new(
            (self.re * o.re + self.im * o.im) / den,
            (self.im * o.re - self.re * o.im) / den,
        )
    }

    fn norm(self) -> f64 {
        self.re.hypot(self.im)
    }
}

/// `Σ coeffs[n] · x^(n+1)`
fn real_series(coeffs: &[f64], x: f64) -> f64 {
    let mut xn = 1.0;
    let mut sum = 0.0;
    for c in coeffs {
        xn *= x;
        sum += c * xn;
    }
    sum
}

fn complex_series(coeffs: &[Complex], z: Complex) -> Complex {
    let mut zn = Complex::new(1.0, 0.0);
    let mut sum = Complex::ZERO;
    for c in coeffs {
        zn = zn.mul(z);
        sum = sum.add(c.mul(zn));
    }
    sum
}

#[derive(Debug, Clone)]
pub struct NewZealandMapGrid {
    a: f64,
    lon0: f64,
    lat0: f64,
}

impl NewZealandMapGrid {
    pub fn new(params: &ProjParams) -> Self {
        Self {
            a: params.a,
            lon0: params.long0,
            lat0: params.lat0,
        }
    }
}

impl Projection for NewZealandMapGrid {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let d_phi = (lat - self.lat0) / LAT_UNIT;
        let d_psi = real_series(&A, d_phi);
        let theta = Complex::new(d_psi, adjust_lon(lon - self.lon0));
        if !(theta.norm() <= THETA_MAX) {
            return Err(ProjError::Domain(format!(
                "nzmg point ({lon}, {lat}) is too far from the origin"
            )));
        }
        let z = complex_series(&B, theta);
        Ok((z.im * self.a, z.re * self.a))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let z = Complex::new(y / self.a, x / self.a);

        // Newton on Σ B·θⁿ = z, seeded with the inverse series.
        let mut theta = complex_series(&C, z);
        let mut converged = false;
        for _ in 0..LAT_MAX_ITER {
            let mut num = z;
            let mut den = B[0];
            let mut th_n = theta;
            for (n, b) in B.iter().enumerate().skip(1) {
                den = den.add(b.mul(th_n).scale((n + 1) as f64));
                th_n = th_n.mul(theta);
                num = num.add(b.mul(th_n).scale(n as f64));
            }
            let next = num.div(den);
            let step = next.add(theta.scale(-1.0)).norm();
            theta = next;
            if step <= NEWTON_TOL {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(ProjError::Convergence {
                routine: "nzmg inverse",
                iterations: LAT_MAX_ITER,
            });
        }
        if !(theta.norm() <= THETA_MAX) {
            return Err(ProjError::Domain(format!(
                "nzmg coordinate ({x}, {y}) is too far from the origin"
            )));
        }

        // Latitude series, then polish against the forward series.
        let d_psi = theta.re;
        let mut d_phi = real_series(&D, d_psi);
        for _ in 0..LAT_MAX_ITER {
            let f = real_series(&A, d_phi) - d_psi;
            let mut fp = 0.0;
            let mut xn = 1.0;
            for (n, a) in A.iter().enumerate() {
                fp += (n + 1) as f64 * a * xn;
                xn *= d_phi;
            }
            let step = f / fp;
            d_phi -= step;
            if step.abs() <= NEWTON_TOL {
                break;
            }
        }

        let lat = self.lat0 + d_phi * LAT_UNIT;
        let lon = adjust_lon(self.lon0 + theta.im);
        Ok((lon, lat))
    }
}
