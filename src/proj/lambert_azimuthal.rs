//! Lambert Azimuthal Equal Area projection.
//!
//! Polar, equatorial and oblique aspects on the sphere and, through the
//! authalic latitude, on the ellipsoid.

use crate::constants::{EPSLN, FORT_PI, HALF_PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, authlat, authset, qsfn};
use crate::proj::{ProjParams, Projection};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    NorthPole,
    SouthPole,
    Equatorial,
    Oblique,
}

/// Ellipsoid-only constants.
#[derive(Debug, Clone)]
struct Authalic {
    e: f64,
    qp: f64,
    rq: f64,
    dd: f64,
    xmf: f64,
    ymf: f64,
    sinb1: f64,
    cosb1: f64,
    apa: [f64; 3],
}

#[derive(Debug, Clone)]
pub struct LambertAzimuthalEqualArea {
    a: f64,
    lon0: f64,
    lat0: f64,
    mode: Mode,
    sinph0: f64,
    cosph0: f64,
    authalic: Option<Authalic>,
}

impl LambertAzimuthalEqualArea {
    pub fn new(params: &ProjParams) -> Result<Self, ProjError> {
        let lat0 = params.lat0;
        let t = lat0.abs();
        let mode = if (t - HALF_PI).abs() < EPSLN {
            if lat0 < 0.0 {
                Mode::SouthPole
            } else {
                Mode::NorthPole
            }
        } else if t < EPSLN {
            Mode::Equatorial
        } else {
            Mode::Oblique
        };

        let authalic = if params.es > 0.0 {
            let e = params.e;
            let es = params.es;
            let qp = qsfn(e, 1.0);
            let rq = (0.5 * qp).sqrt();
            let (mut dd, mut xmf, mut ymf, mut sinb1, mut cosb1) = (1.0, 1.0, 1.0, 0.0, 1.0);
            match mode {
                Mode::NorthPole | Mode::SouthPole => {}
                Mode::Equatorial => {
                    dd = 1.0 / rq;
                    ymf = 0.5 * qp;
                }
                Mode::Oblique => {
                    let sinphi = lat0.sin();
                    sinb1 = qsfn(e, sinphi) / qp;
                    cosb1 = (1.0 - sinb1 * sinb1).sqrt();
                    dd = lat0.cos() / ((1.0 - es * sinphi * sinphi).sqrt() * rq * cosb1);
                    ymf = rq / dd;
                    xmf = rq * dd;
                }
            }
            Some(Authalic {
                e,
                qp,
                rq,
                dd,
                xmf,
                ymf,
                sinb1,
                cosb1,
                apa: authset(es),
            })
        } else {
            None
        };

        Ok(Self {
            a: params.a,
            lon0: params.long0,
            lat0,
            mode,
            sinph0: lat0.sin(),
            cosph0: lat0.cos(),
            authalic,
        })
    }

    fn unprojectable(lat: f64) -> ProjError {
        ProjError::Domain(format!("laea cannot project latitude {lat} rad (antipode)"))
    }

    fn forward_ellipsoid(&self, au: &Authalic, lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sinlam, coslam) = lam.sin_cos();
        let mut q = qsfn(au.e, phi.sin());
        let (sinb, cosb) = match self.mode {
            Mode::Oblique | Mode::Equatorial => {
                let sinb = q / au.qp;
                (sinb, (1.0 - sinb * sinb).max(0.0).sqrt())
            }
            _ => (0.0, 0.0),
        };
        let b = match self.mode {
            Mode::Oblique => 1.0 + au.sinb1 * sinb + au.cosb1 * cosb * coslam,
            Mode::Equatorial => 1.0 + cosb * coslam,
            Mode::NorthPole => {
                q = au.qp - q;
                HALF_PI + phi
            }
            Mode::SouthPole => {
                q += au.qp;
                phi - HALF_PI
            }
        };
        if b.abs() < EPSLN {
            return Err(Self::unprojectable(phi));
        }
        let (x, y) = match self.mode {
            Mode::Oblique | Mode::Equatorial => {
                let b = (2.0 / b).sqrt();
                let y = if self.mode == Mode::Oblique {
                    au.ymf * b * (au.cosb1 * sinb - au.sinb1 * cosb * coslam)
                } else {
                    au.ymf * b * sinb
                };
                (au.xmf * b * cosb * sinlam, y)
            }
            Mode::NorthPole | Mode::SouthPole => {
                if q >= 0.0 {
                    let b = q.sqrt();
                    let y = if self.mode == Mode::SouthPole { b } else { -b };
                    (b * sinlam, coslam * y)
                } else {
                    (0.0, 0.0)
                }
            }
        };
        Ok((self.a * x, self.a * y))
    }

    fn forward_sphere(&self, lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sinphi, cosphi) = phi.sin_cos();
        let (sinlam, mut coslam) = lam.sin_cos();
        let (x, y) = match self.mode {
            Mode::Equatorial | Mode::Oblique => {
                let y = if self.mode == Mode::Equatorial {
                    1.0 + cosphi * coslam
                } else {
                    1.0 + self.sinph0 * sinphi + self.cosph0 * cosphi * coslam
                };
                if y <= EPSLN {
                    return Err(Self::unprojectable(phi));
                }
                let y = (2.0 / y).sqrt();
                let x = y * cosphi * sinlam;
                let y = if self.mode == Mode::Equatorial {
                    y * sinphi
                } else {
                    y * (self.cosph0 * sinphi - self.sinph0 * cosphi * coslam)
                };
                (x, y)
            }
            Mode::NorthPole | Mode::SouthPole => {
                if self.mode == Mode::NorthPole {
                    coslam = -coslam;
                }
                if (phi + self.lat0).abs() < EPSLN {
                    return Err(Self::unprojectable(phi));
                }
                let y = FORT_PI - phi * 0.5;
                let y = 2.0
                    * if self.mode == Mode::SouthPole {
                        y.cos()
                    } else {
                        y.sin()
                    };
                (y * sinlam, y * coslam)
            }
        };
        Ok((self.a * x, self.a * y))
    }

    fn inverse_ellipsoid(&self, au: &Authalic, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (mut x, mut y) = (x / self.a, y / self.a);
        let ab = match self.mode {
            Mode::Equatorial | Mode::Oblique => {
                x /= au.dd;
                y *= au.dd;
                let rho = x.hypot(y);
                if rho < EPSLN {
                    return Ok((self.lon0, self.lat0));
                }
                let s = 2.0 * (0.5 * rho / au.rq).clamp(-1.0, 1.0).asin();
                let (s_ce, c_ce) = s.sin_cos();
                x *= s_ce;
                if self.mode == Mode::Oblique {
                    let ab = c_ce * au.sinb1 + y * s_ce * au.cosb1 / rho;
                    y = rho * au.cosb1 * c_ce - y * au.sinb1 * s_ce;
                    ab
                } else {
                    let ab = y * s_ce / rho;
                    y = rho * c_ce;
                    ab
                }
            }
            Mode::NorthPole | Mode::SouthPole => {
                if self.mode == Mode::NorthPole {
                    y = -y;
                }
                let q = x * x + y * y;
                if q == 0.0 {
                    return Ok((self.lon0, self.lat0));
                }
                let ab = 1.0 - q / au.qp;
                if self.mode == Mode::SouthPole {
                    -ab
                } else {
                    ab
                }
            }
        };
        let lam = x.atan2(y);
        let phi = authlat(ab.clamp(-1.0, 1.0).asin(), &au.apa);
        Ok((adjust_lon(lam + self.lon0), phi))
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (mut x, mut y) = (x / self.a, y / self.a);
        let rh = x.hypot(y);
        let half = rh * 0.5;
        if half > 1.0 + EPSLN {
            return Err(ProjError::Domain(format!(
                "laea radius {rh} lies outside the projected disc"
            )));
        }
        let mut phi = 2.0 * half.min(1.0).asin();
        match self.mode {
            Mode::Equatorial | Mode::Oblique => {
                let (sinz, cosz) = phi.sin_cos();
                if self.mode == Mode::Equatorial {
                    phi = if rh <= EPSLN {
                        0.0
                    } else {
                        (y * sinz / rh).clamp(-1.0, 1.0).asin()
                    };
                    x *= sinz;
                    y = cosz * rh;
                } else {
                    phi = if rh <= EPSLN {
                        self.lat0
                    } else {
                        (cosz * self.sinph0 + y * sinz * self.cosph0 / rh)
                            .clamp(-1.0, 1.0)
                            .asin()
                    };
                    x *= sinz * self.cosph0;
                    y = (cosz - phi.sin() * self.sinph0) * rh;
                }
            }
            Mode::NorthPole => {
                y = -y;
                phi = HALF_PI - phi;
            }
            Mode::SouthPole => {
                phi -= HALF_PI;
            }
        }
        let lam = if y == 0.0 && matches!(self.mode, Mode::Equatorial | Mode::Oblique) {
            0.0
        } else {
            x.atan2(y)
        };
        Ok((adjust_lon(lam + self.lon0), phi))
    }
}

impl Projection for LambertAzimuthalEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let lam = adjust_lon(lon - self.lon0);
        match &self.authalic {
            Some(au) => self.forward_ellipsoid(au, lam, lat),
            None => self.forward_sphere(lam, lat),
        }
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        match &self.authalic {
            Some(au) => self.inverse_ellipsoid(au, x, y),
            None => self.inverse_sphere(x, y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::D2R;
    use crate::ellipsoid::{Ellipsoid, WGS84};
    use approx::assert_relative_eq;

    fn laea(lat0_deg: f64, lon0_deg: f64, ellps: &Ellipsoid) -> LambertAzimuthalEqualArea {
        LambertAzimuthalEqualArea::new(&ProjParams {
            lat0: lat0_deg * D2R,
            long0: lon0_deg * D2R,
            ..ProjParams::new(ellps)
        })
        .unwrap()
    }

    #[test]
    fn test_all_aspects_round_trip() {
        let sphere = Ellipsoid::from_b(6_370_997.0, 6_370_997.0);
        for ellps in [WGS84, sphere] {
            for &(lat0, lat) in &[(90.0, 60.0), (-90.0, -60.0), (0.0, 20.0), (52.0, 48.0)] {
                let proj = laea(lat0, 10.0, &ellps);
                let (lon, lat) = (25.0 * D2R, lat * D2R);
                let (x, y) = proj.forward(lon, lat).unwrap();
                let (lon2, lat2) = proj.inverse(x, y).unwrap();
                assert_relative_eq!(lon2, lon, epsilon = 1e-9);
                assert_relative_eq!(lat2, lat, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_etrs_laea_origin() {
        // EPSG:3035 centre (52°N, 10°E), GRS80.
        let proj = laea(52.0, 10.0, &Ellipsoid::named("GRS80").unwrap());
        let (x, y) = proj.forward(10.0 * D2R, 52.0 * D2R).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
        let (lon, lat) = proj.inverse(0.0, 0.0).unwrap();
        assert_relative_eq!(lon, 10.0 * D2R);
        assert_relative_eq!(lat, 52.0 * D2R);
    }

    #[test]
    fn test_antipode_is_domain_error() {
        let sphere = Ellipsoid::from_b(6_370_997.0, 6_370_997.0);
        let north = laea(90.0, 0.0, &sphere);
        assert!(matches!(
            north.forward(0.0, -HALF_PI),
            Err(ProjError::Domain(_))
        ));
        let equatorial = laea(0.0, 0.0, &WGS84);
        assert!(matches!(
            equatorial.forward(180.0 * D2R, 0.0),
            Err(ProjError::Domain(_))
        ));
    }
}
