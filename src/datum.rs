//! Datum records and the geocentric datum shift.
//!
//! A point moves between datums by going geodetic → geocentric on the source
//! ellipsoid, through WGS84 with the source and destination Helmert
//! parameters, and back to geodetic on the destination ellipsoid.

use log::trace;

use crate::constants::{
    ES_MATCH_TOL, GEOCENTRIC_MAX_ITER, GEOCENTRIC_TOL_SQ, HALF_PI, PI, SEC_TO_RAD, TWO_PI,
};
use crate::error::DatumError;
use crate::point::Point;

/// How a datum relates to WGS84.
#[derive(Clone, Debug, PartialEq)]
pub enum DatumKind {
    /// No datum shift is ever applied to or from this datum.
    NoDatum,
    Wgs84Equivalent,
    ThreeParam { dx: f64, dy: f64, dz: f64 },
    /// Rotations in radians, scale as a multiplier.
    SevenParam {
        dx: f64,
        dy: f64,
        dz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        scale: f64,
    },
    /// Grid-based shift, recognized but not executable.
    GridShift { grids: String },
}

impl DatumKind {
    /// Classify a raw `towgs84` vector: rotations in arc-seconds, scale in ppm.
    ///
    /// Three zero translations, or seven values with zero rotation and scale,
    /// collapse to the simpler variant.
    pub fn from_towgs84(params: &[f64]) -> Self {
        let translation = params.len() >= 3 && params[..3].iter().any(|v| *v != 0.0);
        let rotation = params.len() >= 7 && params[3..7].iter().any(|v| *v != 0.0);
        if rotation {
            DatumKind::SevenParam {
                dx: params[0],
                dy: params[1],
                dz: params[2],
                rx: params[3] * SEC_TO_RAD,
                ry: params[4] * SEC_TO_RAD,
                rz: params[5] * SEC_TO_RAD,
                scale: params[6] / 1_000_000.0 + 1.0,
            }
        } else if translation {
            DatumKind::ThreeParam {
                dx: params[0],
                dy: params[1],
                dz: params[2],
            }
        } else {
            DatumKind::Wgs84Equivalent
        }
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, Self::ThreeParam { .. } | Self::SevenParam { .. })
    }

    fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A datum bound to its ellipsoid.
#[derive(Clone, Debug, PartialEq)]
pub struct Datum {
    pub kind: DatumKind,
    pub a: f64,
    pub b: f64,
    pub es: f64,
    pub ep2: f64,
}

impl Datum {
    pub fn new(kind: DatumKind, a: f64, b: f64, es: f64, ep2: f64) -> Self {
        Self {
            kind,
            a,
            b,
            es,
            ep2,
        }
    }

    pub fn wgs84() -> Self {
        let e = crate::ellipsoid::WGS84;
        let es = e.es();
        Self::new(
            DatumKind::Wgs84Equivalent,
            e.a,
            e.b,
            es,
            (e.a * e.a - e.b * e.b) / (e.b * e.b),
        )
    }

    /// Two datums are the same when their variant, ellipsoid and shift
    /// parameters all agree.
    pub fn same_as(&self, other: &Datum) -> bool {
        if !self.kind.same_variant(&other.kind) {
            return false;
        }
        if self.a != other.a || (self.es - other.es).abs() > ES_MATCH_TOL {
            return false;
        }
        match (&self.kind, &other.kind) {
            (DatumKind::ThreeParam { .. }, _)
            | (DatumKind::SevenParam { .. }, _)
            | (DatumKind::GridShift { .. }, _) => self.kind == other.kind,
            _ => true,
        }
    }

    /// Geodetic (lon, lat radians, height metres) to geocentric X, Y, Z.
    pub fn geodetic_to_geocentric(&self, p: &mut Point) -> Result<(), DatumError> {
        let mut lon = p.x;
        let mut lat = p.y;
        let height = p.height();

        // Tolerate latitudes a rounding error past the pole.
        if lat < -HALF_PI && lat > -1.001 * HALF_PI {
            lat = -HALF_PI;
        } else if lat > HALF_PI && lat < 1.001 * HALF_PI {
            lat = HALF_PI;
        } else if !(-HALF_PI..=HALF_PI).contains(&lat) {
            return Err(DatumError::Domain(format!(
                "latitude {lat} rad is beyond the poles"
            )));
        }
        if lon > PI {
            lon -= TWO_PI;
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        let rn = self.a / (1.0 - self.es * sin_lat * sin_lat).sqrt();
        p.x = (rn + height) * cos_lat * lon.cos();
        p.y = (rn + height) * cos_lat * lon.sin();
        p.z = Some((rn * (1.0 - self.es) + height) * sin_lat);
        Ok(())
    }

    /// Geocentric X, Y, Z to geodetic (lon, lat radians, height metres).
    ///
    /// Iterative method after Bowring; at most 30 rounds.
    pub fn geocentric_to_geodetic(&self, p: &mut Point) -> Result<(), DatumError> {
        const GENAU: f64 = 1.0e-12;

        let x = p.x;
        let y = p.y;
        let z = p.height();

        let dist_p = (x * x + y * y).sqrt();
        let rr = (x * x + y * y + z * z).sqrt();

        let lon = if dist_p / self.a < GENAU {
            if rr / self.a < GENAU {
                // Centre of the earth.
                p.x = 0.0;
                p.y = HALF_PI;
                p.z = Some(-self.b);
                return Ok(());
            }
            0.0
        } else {
            y.atan2(x)
        };

        let ct = z / rr;
        let st = dist_p / rr;
        let mut rx = 1.0 / (1.0 - self.es * (2.0 - self.es) * st * st).sqrt();
        let mut cphi0 = st * (1.0 - self.es) * rx;
        let mut sphi0 = ct * rx;
        let mut height;
        let mut iterations = 0;

        loop {
            iterations += 1;
            let rn = self.a / (1.0 - self.es * sphi0 * sphi0).sqrt();
            height = dist_p * cphi0 + z * sphi0 - rn * (1.0 - self.es * sphi0 * sphi0);
            let rk = self.es * rn / (rn + height);
            rx = 1.0 / (1.0 - rk * (2.0 - rk) * st * st).sqrt();
            let cphi = st * (1.0 - rk) * rx;
            let sphi = ct * rx;
            let sdphi = sphi * cphi0 - cphi * sphi0;
            cphi0 = cphi;
            sphi0 = sphi;
            if sdphi * sdphi <= GEOCENTRIC_TOL_SQ {
                break;
            }
            if iterations >= GEOCENTRIC_MAX_ITER {
                return Err(DatumError::Convergence { iterations });
            }
        }

        p.x = lon;
        p.y = (sphi0 / cphi0.abs()).atan();
        p.z = Some(height);
        Ok(())
    }

    /// Apply this datum's shift: local geocentric → WGS84 geocentric.
    pub fn geocentric_to_wgs84(&self, p: &mut Point) {
        let z = p.height();
        match self.kind {
            DatumKind::ThreeParam { dx, dy, dz } => {
                p.x += dx;
                p.y += dy;
                p.z = Some(z + dz);
            }
            DatumKind::SevenParam {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                scale,
            } => {
                let (x, y) = (p.x, p.y);
                p.x = scale * (x - rz * y + ry * z) + dx;
                p.y = scale * (rz * x + y - rx * z) + dy;
                p.z = Some(scale * (-ry * x + rx * y + z) + dz);
            }
            _ => {}
        }
    }

    /// Undo this datum's shift: WGS84 geocentric → local geocentric.
    pub fn geocentric_from_wgs84(&self, p: &mut Point) {
        let z = p.height();
        match self.kind {
            DatumKind::ThreeParam { dx, dy, dz } => {
                p.x -= dx;
                p.y -= dy;
                p.z = Some(z - dz);
            }
            DatumKind::SevenParam {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                scale,
            } => {
                let x_tmp = (p.x - dx) / scale;
                let y_tmp = (p.y - dy) / scale;
                let z_tmp = (z - dz) / scale;
                p.x = x_tmp + rz * y_tmp - ry * z_tmp;
                p.y = -rz * x_tmp + y_tmp + rx * z_tmp;
                p.z = Some(ry * x_tmp - rx * y_tmp + z_tmp);
            }
            _ => {}
        }
    }
}

/// Move a geodetic point (radians) from `source` datum to `dest` datum.
///
/// A missing height is read as 0. Whenever the shift runs, the point leaves
/// with the height it has above the destination ellipsoid, so a return
/// transform lands back on the starting point.
pub fn datum_transform(source: &Datum, dest: &Datum, p: &mut Point) -> Result<(), DatumError> {
    if source.same_as(dest) {
        return Ok(());
    }
    if source.kind == DatumKind::NoDatum || dest.kind == DatumKind::NoDatum {
        return Ok(());
    }
    for datum in [source, dest] {
        if let DatumKind::GridShift { grids } = &datum.kind {
            return Err(DatumError::GridShiftUnsupported(grids.clone()));
        }
    }

    let needs_shift = source.es != dest.es
        || source.a != dest.a
        || source.kind.is_parametric()
        || dest.kind.is_parametric();
    if !needs_shift {
        return Ok(());
    }

    source.geodetic_to_geocentric(p)?;
    source.geocentric_to_wgs84(p);
    dest.geocentric_from_wgs84(p);
    dest.geocentric_to_geodetic(p)?;
    trace!("datum shift -> ({}, {})", p.x, p.y);
    Ok(())
}
