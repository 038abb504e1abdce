//! Point transforms between two CRSs.
//!
//! A point is taken to geodetic radians on the source datum, shifted onto
//! the destination datum, and projected into the destination CRS. Every stage
//! mutates the same [`Point`].

use std::sync::OnceLock;

use log::{debug, trace};
use rayon::prelude::*;

use crate::constants::{D2R, EPSLN, HALF_PI, R2D};
use crate::crs::{build_crs, Crs};
use crate::datum::datum_transform;
use crate::defs;
use crate::error::{ProjError, TransformError};
use crate::point::Point;
use crate::proj::Projection;

/// Batches at least this large are split across threads.
pub const PARALLEL_THRESHOLD: usize = 1000;

/// Geographic WGS84, the intermediate of the spherical Mercator hop.
fn wgs84() -> Result<&'static Crs, TransformError> {
    static WGS84: OnceLock<Option<Crs>> = OnceLock::new();
    WGS84
        .get_or_init(|| {
            defs::builtin("WGS84").and_then(|def| build_crs(&def).ok())
        })
        .as_ref()
        .ok_or_else(|| TransformError::NotReady("built-in WGS84".to_string()))
}

/// A spherical Mercator without datum parameters paired with a CRS on some
/// other, non-parametric datum goes through WGS84 geographic first.
fn needs_wgs84_hop(source: &Crs, dest: &Crs) -> bool {
    let hop = |merc: &Crs, other: &Crs| {
        merc.is_spherical_mercator()
            && !merc.datum.kind.is_parametric()
            && !other.is_wgs84_datum()
            && !other.datum.kind.is_parametric()
    };
    hop(source, dest) || hop(dest, source)
}

fn ensure_finite(point: &Point, stage: &str) -> Result<(), TransformError> {
    if point.is_finite() {
        Ok(())
    } else {
        Err(ProjError::Domain(format!("{stage} produced a non-finite coordinate")).into())
    }
}

/// Transform `point` in place from `source` to `dest`.
///
/// Geographic coordinates are degrees, projected ones native units of the
/// CRS, geocentric ones X/Y/Z. On error the point is left partially
/// transformed.
pub fn transform(source: &Crs, dest: &Crs, point: &mut Point) -> Result<(), TransformError> {
    for crs in [source, dest] {
        if !crs.is_ready() {
            return Err(TransformError::NotReady(crs.label().to_string()));
        }
    }
    ensure_finite(point, "input")?;

    if needs_wgs84_hop(source, dest) {
        let wgs84 = wgs84()?;
        if !std::ptr::eq(source, wgs84) && !std::ptr::eq(dest, wgs84) {
            debug!(
                "routing {} -> {} through WGS84",
                source.label(),
                dest.label()
            );
            transform(source, wgs84, point)?;
            return transform(wgs84, dest, point);
        }
    }

    if !source.axis.is_enu() {
        source.axis.normalize(point);
    }

    // To geodetic radians on the source datum.
    if source.is_geographic() {
        point.x *= D2R;
        point.y *= D2R;
    } else if source.is_geocentric() {
        point.x *= source.to_meter;
        point.y *= source.to_meter;
        point.z = Some(point.height() * source.to_meter);
        source.datum.geocentric_to_geodetic(point)?;
    } else {
        let x = point.x * source.to_meter - source.params.x0;
        let y = point.y * source.to_meter - source.params.y0;
        let (lon, lat) = source.projection().inverse(x, y)?;
        point.x = lon;
        point.y = lat;
        ensure_finite(point, "inverse projection")?;
        if lat.abs() > HALF_PI + EPSLN {
            return Err(ProjError::Domain(format!(
                "{} inverse gave latitude {} beyond the poles",
                source.label(),
                lat * R2D
            ))
            .into());
        }
    }
    trace!("{} -> geodetic ({}, {})", source.label(), point.x, point.y);

    point.x += source.from_greenwich;
    datum_transform(&source.datum, &dest.datum, point)?;
    point.x -= dest.from_greenwich;

    if dest.is_geographic() {
        point.x *= R2D;
        point.y *= R2D;
    } else if dest.is_geocentric() {
        dest.datum.geodetic_to_geocentric(point)?;
        point.x /= dest.to_meter;
        point.y /= dest.to_meter;
        point.z = Some(point.height() / dest.to_meter);
    } else {
        let (x, y) = dest.projection().forward(point.x, point.y)?;
        point.x = (x + dest.params.x0) / dest.to_meter;
        point.y = (y + dest.params.y0) / dest.to_meter;
    }
    ensure_finite(point, "forward projection")?;
    trace!("geodetic -> {} ({}, {})", dest.label(), point.x, point.y);

    if !dest.axis.is_enu() {
        dest.axis.denormalize(point);
    }
    Ok(())
}

/// Transform every point in place, reporting each point's outcome.
///
/// Large batches run on the rayon thread pool.
pub fn transform_batch(
    source: &Crs,
    dest: &Crs,
    points: &mut [Point],
) -> Vec<Result<(), TransformError>> {
    if points.len() >= PARALLEL_THRESHOLD {
        points
            .par_iter_mut()
            .map(|p| transform(source, dest, p))
            .collect()
    } else {
        points
            .iter_mut()
            .map(|p| transform(source, dest, p))
            .collect()
    }
}
