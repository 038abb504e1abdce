//! Stereographic projections.
//!
//! `stere` handles the polar, oblique and equatorial aspects directly on the
//! ellipsoid (via conformal latitude). `sterea` projects through the Gauss
//! conformal sphere and is the "double" oblique stereographic used by many
//! national grids.

use crate::constants::{EPSLN, HALF_PI};
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, msfn, phi2z, sign, tsfn};
use crate::proj::gauss::GaussSphere;
use crate::proj::{ProjParams, Projection};

/// `tan((π/2 + φ)/2) · ((1 - e sinφ)/(1 + e sinφ))^(e/2)`
fn ssfn(phit: f64, sinphi: f64, e: f64) -> f64 {
    let sinphi = sinphi * e;
    (0.5 * (HALF_PI + phit)).tan() * ((1.0 - sinphi) / (1.0 + sinphi)).powf(0.5 * e)
}

#[derive(Debug, Clone, Copy)]
enum Aspect {
    /// Centred on a pole; `con` is +1 north, -1 south.
    Polar { con: f64 },
    /// Any other origin latitude (the equator included).
    Oblique,
}

#[derive(Debug, Clone)]
pub struct Stereographic {
    a: f64,
    e: f64,
    sphere: bool,
    lon0: f64,
    lat0: f64,
    k0: f64,
    sinlat0: f64,
    coslat0: f64,
    aspect: Aspect,
    cons: f64,
    ms1: f64,
    sin_x0: f64,
    cos_x0: f64,
    x0_conf: f64,
}

impl Stereographic {
    pub fn new(params: &ProjParams) -> Self {
        let e = params.e;
        let lat0 = params.lat0;
        let (sinlat0, coslat0) = lat0.sin_cos();
        let aspect = if coslat0.abs() <= EPSLN {
            Aspect::Polar { con: sign(lat0) }
        } else {
            Aspect::Oblique
        };

        let cons = ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt();
        let mut k0 = params.k0;
        // A latitude of true scale only sets the scale of the polar aspect.
        if let (Aspect::Polar { con }, Some(lat_ts), true) = (aspect, params.lat_ts, k0 == 1.0) {
            k0 = if params.sphere {
                0.5 * (1.0 + con * lat_ts.sin())
            } else {
                0.5 * cons * msfn(e, lat_ts.sin(), lat_ts.cos())
                    / tsfn(e, con * lat_ts, con * lat_ts.sin())
            };
        }

        let ms1 = msfn(e, sinlat0, coslat0);
        let x0_conf = 2.0 * ssfn(lat0, sinlat0, e).atan() - HALF_PI;

        Self {
            a: params.a,
            e,
            sphere: params.sphere,
            lon0: params.long0,
            lat0,
            k0,
            sinlat0,
            coslat0,
            aspect,
            cons,
            ms1,
            sin_x0: x0_conf.sin(),
            cos_x0: x0_conf.cos(),
            x0_conf,
        }
    }

    fn antipode() -> ProjError {
        ProjError::Domain("stereographic is undefined at the antipode of its origin".to_string())
    }
}

impl Projection for Stereographic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let (sinlat, coslat) = lat.sin_cos();
        let dlon = adjust_lon(lon - self.lon0);
        let (sin_dlon, cos_dlon) = dlon.sin_cos();

        if self.sphere {
            let denom = 1.0 + self.sinlat0 * sinlat + self.coslat0 * coslat * cos_dlon;
            if denom <= EPSLN {
                return Err(Self::antipode());
            }
            let a = 2.0 * self.k0 / denom;
            let x = self.a * a * coslat * sin_dlon;
            let y = self.a * a * (self.coslat0 * sinlat - self.sinlat0 * coslat * cos_dlon);
            return Ok((x, y));
        }

        match self.aspect {
            Aspect::Polar { con } => {
                if con * lat <= -HALF_PI + EPSLN {
                    return Err(Self::antipode());
                }
                let ts = tsfn(self.e, lat * con, con * sinlat);
                let rh = 2.0 * self.a * self.k0 * ts / self.cons;
                Ok((rh * sin_dlon, -con * rh * cos_dlon))
            }
            Aspect::Oblique => {
                let x_conf = 2.0 * ssfn(lat, sinlat, self.e).atan() - HALF_PI;
                let (sin_x, cos_x) = x_conf.sin_cos();
                let denom = 1.0 + self.sin_x0 * sin_x + self.cos_x0 * cos_x * cos_dlon;
                if denom <= EPSLN {
                    return Err(Self::antipode());
                }
                let a = 2.0 * self.a * self.k0 * self.ms1 / (self.cos_x0 * denom);
                let x = a * cos_x * sin_dlon;
                let y = a * (self.cos_x0 * sin_x - self.sin_x0 * cos_x * cos_dlon);
                Ok((x, y))
            }
        }
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rh = x.hypot(y);

        if self.sphere {
            if rh <= EPSLN {
                return Ok((self.lon0, self.lat0));
            }
            let c = 2.0 * (rh / (2.0 * self.a * self.k0)).atan();
            let (sin_c, cos_c) = c.sin_cos();
            let lat = (cos_c * self.sinlat0 + y * sin_c * self.coslat0 / rh).asin();
            let lon = match self.aspect {
                Aspect::Polar { con } if con > 0.0 => adjust_lon(self.lon0 + x.atan2(-y)),
                Aspect::Polar { .. } => adjust_lon(self.lon0 + x.atan2(y)),
                Aspect::Oblique => adjust_lon(
                    self.lon0
                        + (x * sin_c).atan2(rh * self.coslat0 * cos_c - y * self.sinlat0 * sin_c),
                ),
            };
            return Ok((lon, lat));
        }

        match self.aspect {
            Aspect::Polar { con } => {
                if rh <= EPSLN {
                    return Ok((self.lon0, self.lat0));
                }
                let (x, y) = (x * con, y * con);
                let ts = rh * self.cons / (2.0 * self.a * self.k0);
                let lat = con * phi2z(self.e, ts)?;
                let lon = con * adjust_lon(con * self.lon0 + x.atan2(-y));
                Ok((lon, lat))
            }
            Aspect::Oblique => {
                let ce = 2.0 * (rh * self.cos_x0 / (2.0 * self.a * self.k0 * self.ms1)).atan();
                let (sin_ce, cos_ce) = ce.sin_cos();
                let (chi, lon) = if rh <= EPSLN {
                    (self.x0_conf, self.lon0)
                } else {
                    let chi = (cos_ce * self.sin_x0 + y * sin_ce * self.cos_x0 / rh).asin();
                    let lon = adjust_lon(
                        self.lon0
                            + (x * sin_ce)
                                .atan2(rh * self.cos_x0 * cos_ce - y * self.sin_x0 * sin_ce),
                    );
                    (chi, lon)
                };
                let lat = -phi2z(self.e, (0.5 * (HALF_PI + chi)).tan())?;
                Ok((lon, lat))
            }
        }
    }
}

/// Oblique Stereographic (Double) projection.
#[derive(Debug, Clone)]
pub struct ObliqueStereographic {
    gauss: GaussSphere,
    a: f64,
    lon0: f64,
    k0: f64,
    sinc0: f64,
    cosc0: f64,
    r2: f64,
}

impl ObliqueStereographic {
    pub fn new(params: &ProjParams) -> Result<Self, ProjError> {
        let gauss = GaussSphere::new(params.e, params.lat0)?;
        let (sinc0, cosc0) = gauss.phic0.sin_cos();
        let r2 = 2.0 * gauss.rc;
        Ok(Self {
            gauss,
            a: params.a,
            lon0: params.long0,
            k0: params.k0,
            sinc0,
            cosc0,
            r2,
        })
    }
}

impl Projection for ObliqueStereographic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let (lam, chi) = self.gauss.to_sphere(adjust_lon(lon - self.lon0), lat);
        let (sinc, cosc) = chi.sin_cos();
        let cosl = lam.cos();
        let denom = 1.0 + self.sinc0 * sinc + self.cosc0 * cosc * cosl;
        if denom <= EPSLN {
            return Err(Stereographic::antipode());
        }
        let k = self.k0 * self.r2 / denom;
        let x = self.a * k * cosc * lam.sin();
        let y = self.a * k * (self.cosc0 * sinc - self.sinc0 * cosc * cosl);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x / (self.a * self.k0);
        let y = y / (self.a * self.k0);
        let rho = x.hypot(y);
        let (lam, chi) = if rho != 0.0 {
            let c = 2.0 * rho.atan2(self.r2);
            let (sinc, cosc) = c.sin_cos();
            let chi = (cosc * self.sinc0 + y * sinc * self.cosc0 / rho).asin();
            let lam = (x * sinc).atan2(rho * self.cosc0 * cosc - y * self.sinc0 * sinc);
            (lam, chi)
        } else {
            (0.0, self.gauss.phic0)
        };
        let (dlon, lat) = self.gauss.from_sphere(lam, chi)?;
        Ok((adjust_lon(dlon + self.lon0), lat))
    }
}
