pub mod albers_equal_area;
pub mod azimuthal_equidistant;
pub mod cassini;
pub mod common;
pub mod cylindrical_equal_area;
pub mod equidistant_conic;
pub mod equirectangular;
pub mod gauss;
pub mod gauss_schreiber;
pub mod gnomonic;
pub mod lambert_azimuthal;
pub mod lambert_conformal;
pub mod longlat;
pub mod mercator;
pub mod miller;
pub mod mollweide;
pub mod nzmg;
pub mod oblique_mercator;
pub mod orthographic;
pub mod polyconic;
pub mod sinusoidal;
pub mod stereographic;
pub mod swiss_oblique_mercator;
pub mod transverse_mercator;
pub mod van_der_grinten;

use crate::ellipsoid::Ellipsoid;
use crate::error::{CrsError, ProjError};

/// Trait for map projections supporting forward and inverse transforms.
///
/// Both directions work on the unit-free core of a projection: false
/// easting/northing and linear unit scaling are applied by the caller.
pub trait Projection: Send + Sync {
    /// Forward: (lon_rad, lat_rad) -> (easting, northing)
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError>;

    /// Inverse: (easting, northing) -> (lon_rad, lat_rad)
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;

    /// Batch forward transform (default: loop).
    fn forward_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.forward(c.0, c.1)?;
        }
        Ok(())
    }

    /// Batch inverse transform.
    fn inverse_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.inverse(c.0, c.1)?;
        }
        Ok(())
    }
}

/// Geometry and origin parameters a projection family is initialised from.
///
/// Angles are radians. Families read what they need; `utm` rewrites the
/// origin fields before handing over to `tmerc`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjParams {
    pub a: f64,
    pub b: f64,
    pub es: f64,
    pub e: f64,
    pub ep2: f64,
    pub sphere: bool,
    pub long0: f64,
    pub lat0: f64,
    pub lat1: Option<f64>,
    pub lat2: Option<f64>,
    pub lat_ts: Option<f64>,
    pub lon1: Option<f64>,
    pub lon2: Option<f64>,
    pub alpha: Option<f64>,
    pub longc: Option<f64>,
    pub k0: f64,
    pub x0: f64,
    pub y0: f64,
    pub zone: Option<i32>,
    pub south: bool,
}

impl ProjParams {
    /// Parameters on `ellipsoid` with the origin at (0, 0) and unit scale.
    pub fn new(ellipsoid: &Ellipsoid) -> Self {
        let (a, b) = (ellipsoid.a, ellipsoid.b);
        let es = ellipsoid.es();
        Self {
            a,
            b,
            es,
            e: es.sqrt(),
            ep2: (a * a - b * b) / (b * b),
            sphere: ellipsoid.is_sphere(),
            long0: 0.0,
            lat0: 0.0,
            lat1: None,
            lat2: None,
            lat_ts: None,
            lon1: None,
            lon2: None,
            alpha: None,
            longc: None,
            k0: 1.0,
            x0: 0.0,
            y0: 0.0,
            zone: None,
            south: false,
        }
    }

    /// Parameters on a sphere of radius `r`.
    pub fn sphere(r: f64) -> Self {
        Self::new(&Ellipsoid::from_b(r, r))
    }
}

macro_rules! projection_kinds {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// One initialised projection family.
        #[derive(Debug, Clone)]
        pub enum ProjectionKind {
            $($variant($ty),)*
        }

        impl Projection for ProjectionKind {
            fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
                match self {
                    $(Self::$variant(p) => p.forward(lon, lat),)*
                }
            }

            fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
                match self {
                    $(Self::$variant(p) => p.inverse(x, y),)*
                }
            }
        }
    };
}

projection_kinds! {
    LongLat(longlat::LongLat),
    AlbersEqualArea(albers_equal_area::AlbersEqualArea),
    AzimuthalEquidistant(azimuthal_equidistant::AzimuthalEquidistant),
    Cassini(cassini::Cassini),
    CylindricalEqualArea(cylindrical_equal_area::CylindricalEqualArea),
    Equirectangular(equirectangular::Equirectangular),
    EquidistantConic(equidistant_conic::EquidistantConic),
    Gauss(gauss::GaussProjection),
    GaussSchreiber(gauss_schreiber::GaussSchreiber),
    Gnomonic(gnomonic::Gnomonic),
    LambertAzimuthal(lambert_azimuthal::LambertAzimuthalEqualArea),
    LambertConformal(lambert_conformal::LambertConformalConic),
    Mercator(mercator::Mercator),
    Miller(miller::Miller),
    Mollweide(mollweide::Mollweide),
    NewZealandMapGrid(nzmg::NewZealandMapGrid),
    ObliqueMercator(oblique_mercator::ObliqueMercator),
    Orthographic(orthographic::Orthographic),
    Polyconic(polyconic::Polyconic),
    Sinusoidal(sinusoidal::Sinusoidal),
    Stereographic(stereographic::Stereographic),
    ObliqueStereographic(stereographic::ObliqueStereographic),
    SwissObliqueMercator(swiss_oblique_mercator::SwissObliqueMercator),
    TransverseMercator(transverse_mercator::TransverseMercator),
    VanDerGrinten(van_der_grinten::VanDerGrinten),
}

/// Every family name [`ProjectionKind::init`] accepts.
pub const PROJECTION_NAMES: &[&str] = &[
    "longlat", "latlong", "identity", "geocent", "aea", "aeqd", "cass", "cea", "eqc", "equi",
    "eqdc", "gauss", "gnom", "gstmerc", "laea", "lcc", "merc", "mill", "moll", "nzmg", "omerc",
    "ortho", "poly", "sinu", "somerc", "stere", "sterea", "tmerc", "utm", "vandg",
];

impl ProjectionKind {
    /// Select the family called `name` and precompute its constants.
    ///
    /// `params` may be rewritten (e.g. `utm` fills in its zone origin).
    pub fn init(name: &str, params: &mut ProjParams) -> Result<Self, CrsError> {
        let kind = match name {
            "longlat" | "latlong" | "identity" | "geocent" => Self::LongLat(longlat::LongLat),
            "aea" => Self::AlbersEqualArea(albers_equal_area::AlbersEqualArea::new(params)?),
            "aeqd" => Self::AzimuthalEquidistant(
                azimuthal_equidistant::AzimuthalEquidistant::new(params),
            ),
            "cass" => Self::Cassini(cassini::Cassini::new(params)),
            "cea" => Self::CylindricalEqualArea(
                cylindrical_equal_area::CylindricalEqualArea::new(params),
            ),
            "eqc" => Self::Equirectangular(equirectangular::Equirectangular::eqc(params)),
            "equi" => Self::Equirectangular(equirectangular::Equirectangular::equi(params)),
            "eqdc" => Self::EquidistantConic(equidistant_conic::EquidistantConic::new(params)?),
            "gauss" => Self::Gauss(gauss::GaussProjection::new(params)?),
            "gstmerc" => Self::GaussSchreiber(gauss_schreiber::GaussSchreiber::new(params)),
            "gnom" => Self::Gnomonic(gnomonic::Gnomonic::new(params)),
            "laea" => Self::LambertAzimuthal(
                lambert_azimuthal::LambertAzimuthalEqualArea::new(params)?,
            ),
            "lcc" => Self::LambertConformal(lambert_conformal::LambertConformalConic::new(params)?),
            "merc" => Self::Mercator(mercator::Mercator::new(params)),
            "mill" => Self::Miller(miller::Miller::new(params)),
            "moll" => Self::Mollweide(mollweide::Mollweide::new(params)),
            "nzmg" => Self::NewZealandMapGrid(nzmg::NewZealandMapGrid::new(params)),
            "omerc" => Self::ObliqueMercator(oblique_mercator::ObliqueMercator::new(params)?),
            "ortho" => Self::Orthographic(orthographic::Orthographic::new(params)),
            "poly" => Self::Polyconic(polyconic::Polyconic::new(params)),
            "sinu" => Self::Sinusoidal(sinusoidal::Sinusoidal::new(params)),
            "somerc" => Self::SwissObliqueMercator(
                swiss_oblique_mercator::SwissObliqueMercator::new(params),
            ),
            "stere" => Self::Stereographic(stereographic::Stereographic::new(params)),
            "sterea" => Self::ObliqueStereographic(stereographic::ObliqueStereographic::new(params)?),
            "tmerc" => Self::TransverseMercator(transverse_mercator::TransverseMercator::new(params)),
            "utm" => {
                transverse_mercator::configure_utm(params)?;
                Self::TransverseMercator(transverse_mercator::TransverseMercator::new(params))
            }
            "vandg" => Self::VanDerGrinten(van_der_grinten::VanDerGrinten::new(params)),
            other => return Err(CrsError::UnknownProjection(other.to_string())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::D2R;
    use crate::ellipsoid::WGS84;
    use approx::assert_relative_eq;

    /// Parameters every family can initialise from.
    fn generic_params() -> ProjParams {
        ProjParams {
            long0: 10.0 * D2R,
            lat0: 30.0 * D2R,
            lat1: Some(25.0 * D2R),
            lat2: Some(40.0 * D2R),
            alpha: Some(30.0 * D2R),
            longc: Some(10.0 * D2R),
            zone: Some(32),
            ..ProjParams::new(&WGS84)
        }
    }

    #[test]
    fn test_every_name_initialises() {
        for name in PROJECTION_NAMES {
            let mut params = if *name == "nzmg" {
                ProjParams {
                    long0: 173.0 * D2R,
                    lat0: -41.0 * D2R,
                    ..ProjParams::new(&crate::ellipsoid::Ellipsoid::named("intl").unwrap())
                }
            } else {
                generic_params()
            };
            assert!(
                ProjectionKind::init(name, &mut params).is_ok(),
                "{name} failed to initialise"
            );
        }
    }

    #[test]
    fn test_unknown_projection() {
        let mut params = generic_params();
        assert!(matches!(
            ProjectionKind::init("bogus", &mut params),
            Err(CrsError::UnknownProjection(name)) if name == "bogus"
        ));
    }

    #[test]
    fn test_round_trip_every_family() {
        // A point a few degrees from the origin of `generic_params`.
        let (lon, lat) = (12.0 * D2R, 33.0 * D2R);
        for name in PROJECTION_NAMES {
            let (mut params, lon, lat) = if *name == "nzmg" {
                let params = ProjParams {
                    long0: 173.0 * D2R,
                    lat0: -41.0 * D2R,
                    ..ProjParams::new(&crate::ellipsoid::Ellipsoid::named("intl").unwrap())
                };
                (params, 174.5 * D2R, -40.0 * D2R)
            } else if *name == "utm" {
                (generic_params(), 9.5 * D2R, 33.0 * D2R)
            } else {
                (generic_params(), lon, lat)
            };
            let proj = ProjectionKind::init(name, &mut params).unwrap();
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            let (x2, y2) = proj.forward(lon2, lat2).unwrap();
            // Cassini's inverse is a truncated series.
            let tol = if *name == "cass" { 1e-2 } else { 1e-7 };
            assert_relative_eq!(x2, x, epsilon = tol, max_relative = 1e-9);
            assert_relative_eq!(y2, y, epsilon = tol, max_relative = 1e-9);
            assert_relative_eq!(lon2, lon, epsilon = 1e-7);
            assert_relative_eq!(lat2, lat, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_batch_matches_single() {
        let mut params = generic_params();
        let proj = ProjectionKind::init("lcc", &mut params).unwrap();
        let mut coords = vec![(11.0 * D2R, 31.0 * D2R), (9.0 * D2R, 35.0 * D2R)];
        let expected: Vec<_> = coords
            .iter()
            .map(|&(lon, lat)| proj.forward(lon, lat).unwrap())
            .collect();
        proj.forward_batch(&mut coords).unwrap();
        assert_eq!(coords, expected);
        proj.inverse_batch(&mut coords).unwrap();
        assert_relative_eq!(coords[1].1, 35.0 * D2R, epsilon = 1e-10);
    }
}
