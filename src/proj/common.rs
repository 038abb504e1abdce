//! Common helpers for projection math (longitude wrapping, isometric and
//! authalic latitudes, meridional arc, etc.).

use crate::constants::{
    AUTHALIC_MAX_ITER, EPSLN, FORT_PI, HALF_PI, LAT_MAX_ITER, PI, TWO_PI,
};
use crate::error::ProjError;

/// Wrap a longitude difference once into `[-π, π)`.
pub fn adjust_lon(x: f64) -> f64 {
    if x.abs() < PI {
        x
    } else {
        x - sign(x) * TWO_PI
    }
}

/// Fold a latitude past a pole back across it.
pub fn adjust_lat(x: f64) -> f64 {
    if x.abs() < HALF_PI {
        x
    } else {
        x - sign(x) * PI
    }
}

pub fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// `asin` tolerant of arguments a rounding error outside `[-1, 1]`.
pub fn asinz(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}

/// Scale-factor function `m(φ) = cos φ / sqrt(1 - e² sin² φ)`.
pub fn msfn(e: f64, sinphi: f64, cosphi: f64) -> f64 {
    let con = e * sinphi;
    cosphi / (1.0 - con * con).sqrt()
}

/// Isometric colatitude function `t(φ)` used by the conformal families.
pub fn tsfn(e: f64, phi: f64, sinphi: f64) -> f64 {
    let con = e * sinphi;
    let con = ((1.0 - con) / (1.0 + con)).powf(0.5 * e);
    (0.5 * (HALF_PI - phi)).tan() / con
}

/// Latitude from `t`, the inverse of [`tsfn`].
pub fn phi2z(e: f64, ts: f64) -> Result<f64, ProjError> {
    let half_e = 0.5 * e;
    let mut phi = HALF_PI - 2.0 * ts.atan();
    for _ in 0..LAT_MAX_ITER {
        let con = e * phi.sin();
        let dphi = HALF_PI - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(half_e)).atan() - phi;
        phi += dphi;
        if dphi.abs() <= EPSLN {
            return Ok(phi);
        }
    }
    Err(ProjError::Convergence {
        routine: "phi2z",
        iterations: LAT_MAX_ITER,
    })
}

/// Authalic `q(φ)` function.
pub fn qsfn(e: f64, sinphi: f64) -> f64 {
    if e > 1.0e-7 {
        let con = e * sinphi;
        (1.0 - e * e) * (sinphi / (1.0 - con * con) - (0.5 / e) * ((1.0 - con) / (1.0 + con)).ln())
    } else {
        2.0 * sinphi
    }
}

/// Latitude from `q`, the inverse of [`qsfn`].
pub fn iqsfn(e: f64, q: f64) -> Result<f64, ProjError> {
    if e < EPSLN {
        return Ok(asinz(0.5 * q));
    }
    let es = e * e;
    let q_pole = 1.0 - (1.0 - es) / (2.0 * e) * ((1.0 - e) / (1.0 + e)).ln();
    if (q.abs() - q_pole).abs() < 1.0e-6 {
        return Ok(sign(q) * HALF_PI);
    }

    let mut phi = asinz(0.5 * q);
    for _ in 0..AUTHALIC_MAX_ITER {
        let (sinphi, cosphi) = phi.sin_cos();
        let con = e * sinphi;
        let com = 1.0 - con * con;
        let dphi = 0.5 * com * com / cosphi
            * (q / (1.0 - es) - sinphi / com + 0.5 / e * ((1.0 - con) / (1.0 + con)).ln());
        phi += dphi;
        if dphi.abs() <= EPSLN {
            return Ok(phi);
        }
    }
    Err(ProjError::Convergence {
        routine: "iqsfn",
        iterations: AUTHALIC_MAX_ITER,
    })
}

/// `((1 - esinp) / (1 + esinp))^exp`
pub fn srat(esinp: f64, exp: f64) -> f64 {
    ((1.0 - esinp) / (1.0 + esinp)).powf(exp)
}

/// Isometric latitude.
pub fn latiso(e: f64, phi: f64, sinphi: f64) -> f64 {
    (FORT_PI + 0.5 * phi).tan().ln() + e * ((1.0 - e * sinphi) / (1.0 + e * sinphi)).ln() / 2.0
}

/// Latitude from isometric latitude.
pub fn invlatiso(e: f64, ts: f64) -> Result<f64, ProjError> {
    let fl = |x: f64, l: f64| 2.0 * (x * l.exp()).atan() - HALF_PI;
    let mut phi = fl(1.0, ts);
    for _ in 0..LAT_MAX_ITER {
        let prev = phi;
        let sinphi = phi.sin();
        phi = fl(
            (e * ((1.0 + e * sinphi) / (1.0 - e * sinphi)).ln() / 2.0).exp(),
            ts,
        );
        if (phi - prev).abs() <= 1.0e-12 {
            return Ok(phi);
        }
    }
    Err(ProjError::Convergence {
        routine: "invlatiso",
        iterations: LAT_MAX_ITER,
    })
}

/// Series coefficients taking authalic latitude back to geodetic latitude.
pub fn authset(es: f64) -> [f64; 3] {
    const P00: f64 = 0.333_333_333_333_333_33;
    const P01: f64 = 0.172_222_222_222_222_22;
    const P02: f64 = 0.102_579_365_079_365_08;
    const P10: f64 = 0.063_888_888_888_888_89;
    const P11: f64 = 0.066_402_116_402_116_4;
    const P20: f64 = 0.016_415_012_942_191_544;

    let mut apa = [0.0; 3];
    let mut t = es * es;
    apa[0] = es * P00 + t * P01;
    apa[1] = t * P10;
    t *= es;
    apa[0] += t * P02;
    apa[1] += t * P11;
    apa[2] = t * P20;
    apa
}

pub fn authlat(beta: f64, apa: &[f64; 3]) -> f64 {
    let t = beta + beta;
    beta + apa[0] * t.sin() + apa[1] * (t + t).sin() + apa[2] * (t + t + t).sin()
}

/// Meridional arc length series in `es` (per unit semi-major axis).
#[derive(Debug, Clone, Copy)]
pub struct MeridianArc {
    e0: f64,
    e1: f64,
    e2: f64,
    e3: f64,
}

impl MeridianArc {
    pub fn new(es: f64) -> Self {
        Self {
            e0: 1.0 - 0.25 * es * (1.0 + es / 16.0 * (3.0 + 1.25 * es)),
            e1: 0.375 * es * (1.0 + 0.25 * es * (1.0 + 0.46875 * es)),
            e2: 0.05859375 * es * es * (1.0 + 0.75 * es),
            e3: es * es * es * (35.0 / 3072.0),
        }
    }

    /// Arc from the equator to `phi`, in units of `a`.
    pub fn distance(&self, phi: f64) -> f64 {
        self.e0 * phi - self.e1 * (2.0 * phi).sin() + self.e2 * (4.0 * phi).sin()
            - self.e3 * (6.0 * phi).sin()
    }

    /// `d distance / d phi`.
    pub fn derivative(&self, phi: f64) -> f64 {
        self.e0 - 2.0 * self.e1 * (2.0 * phi).cos() + 4.0 * self.e2 * (4.0 * phi).cos()
            - 6.0 * self.e3 * (6.0 * phi).cos()
    }

    /// Latitude whose arc is `ml`.
    ///
    /// Arcs longer than a quarter meridian have no latitude.
    pub fn latitude(&self, ml: f64) -> Result<f64, ProjError> {
        if !(ml.abs() <= self.distance(HALF_PI) + EPSLN) {
            return Err(ProjError::Domain(format!(
                "meridian arc {ml} is longer than a quarter meridian"
            )));
        }
        let mut phi = ml;
        for _ in 0..LAT_MAX_ITER {
            let dphi = (ml + self.e1 * (2.0 * phi).sin() - self.e2 * (4.0 * phi).sin()
                + self.e3 * (6.0 * phi).sin())
                / self.e0
                - phi;
            phi += dphi;
            if dphi.abs() <= EPSLN {
                return checked_lat(phi);
            }
        }
        Err(ProjError::Convergence {
            routine: "meridian arc",
            iterations: LAT_MAX_ITER,
        })
    }
}

/// Accept a latitude from an inverse projection, snapping values a rounding
/// error past a pole onto it.
pub fn checked_lat(lat: f64) -> Result<f64, ProjError> {
    if lat.abs() <= HALF_PI {
        Ok(lat)
    } else if lat.abs() <= HALF_PI + EPSLN {
        Ok(HALF_PI.copysign(lat))
    } else {
        Err(ProjError::Domain(format!(
            "latitude {lat} rad is beyond the poles"
        )))
    }
}

/// Turn a non-finite intermediate into a domain error.
pub fn finite(value: f64, what: &str) -> Result<f64, ProjError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProjError::Domain(format!("{what} is not finite")))
    }
}
