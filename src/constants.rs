//! Numeric constants shared by the datum and projection code.

pub use std::f64::consts::{FRAC_PI_2 as HALF_PI, FRAC_PI_4 as FORT_PI, PI, TAU as TWO_PI};

/// Degrees to radians.
pub const D2R: f64 = PI / 180.0;
/// Radians to degrees.
pub const R2D: f64 = 180.0 / PI;
/// Arc-seconds to radians (π / 648000).
pub const SEC_TO_RAD: f64 = PI / 648_000.0;

/// General purpose angular tolerance.
pub const EPSLN: f64 = 1.0e-10;

/// Authalic-sphere radius series coefficients.
pub const SIXTH: f64 = 0.166_666_666_666_666_7;
pub const RA4: f64 = 0.047_222_222_222_222_22;
pub const RA6: f64 = 0.022_156_084_656_084_66;

/// Iteration cap for the geocentric to geodetic solver.
pub const GEOCENTRIC_MAX_ITER: usize = 30;
/// Convergence bound on the squared `sin(φ)` delta in the geocentric solver.
pub const GEOCENTRIC_TOL_SQ: f64 = 1.0e-24;

/// Iteration cap for latitude-from-isometric-latitude style inversions.
pub const LAT_MAX_ITER: usize = 15;
/// Iteration cap for authalic and conformal sphere inversions.
pub const SPHERE_MAX_ITER: usize = 20;
/// Iteration cap for the equal-area latitude inversion.
pub const AUTHALIC_MAX_ITER: usize = 30;

/// Datums whose ellipsoids agree to this bound on `es` are the same ellipsoid.
pub const ES_MATCH_TOL: f64 = 5.0e-11;
