//! CRS descriptors: parsing PROJ.4 strings and deriving the geometry every
//! later stage reads.
//!
//! Parsing fills a [`CrsDef`] with what the definition literally says.
//! [`CrsDef::build`] then resolves datum and ellipsoid names, derives the
//! ellipsoid constants and initialises the projection family, producing an
//! immutable [`Crs`].

use std::str::FromStr;

use log::{debug, warn};

use crate::axis::AxisOrder;
use crate::constants::{D2R, EPSLN, RA4, RA6, SIXTH};
use crate::datum::{Datum, DatumKind};
use crate::defs;
use crate::ellipsoid::{Ellipsoid, WGS84};
use crate::error::CrsError;
use crate::proj::{ProjParams, ProjectionKind};
use crate::wkt;

/// Leading keywords that mark a WKT definition.
const WKT_ROOTS: &[&str] = &["GEOGCS", "GEOCCS", "PROJCS", "LOCAL_CS"];

/// The literal content of a CRS definition, before derivation.
///
/// Angles are radians, lengths metres.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrsDef {
    pub title: Option<String>,
    pub proj_name: Option<String>,
    pub units: Option<String>,
    pub datum_code: Option<String>,
    pub nadgrids: Option<String>,
    pub ellps: Option<String>,
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub rf: Option<f64>,
    pub lat0: Option<f64>,
    pub lat1: Option<f64>,
    pub lat2: Option<f64>,
    pub lat_ts: Option<f64>,
    pub long0: Option<f64>,
    pub lon1: Option<f64>,
    pub lon2: Option<f64>,
    pub alpha: Option<f64>,
    pub longc: Option<f64>,
    pub x0: Option<f64>,
    pub y0: Option<f64>,
    pub k0: Option<f64>,
    pub r_a: bool,
    pub zone: Option<i32>,
    pub south: bool,
    pub datum_params: Option<Vec<f64>>,
    pub to_meter: Option<f64>,
    pub from_greenwich: Option<f64>,
    pub axis: Option<AxisOrder>,
}

fn number(key: &str, value: &str) -> Result<f64, CrsError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CrsError::Parse(format!("invalid number for {key}: '{value}'")))
}

fn angle(key: &str, value: &str) -> Result<f64, CrsError> {
    Ok(number(key, value)? * D2R)
}

/// Metres per unit for the `units` names this crate knows.
fn unit_to_meter(units: &str) -> Option<f64> {
    match units {
        "m" | "metre" | "meter" | "degrees" | "degree" => Some(1.0),
        "km" => Some(1000.0),
        "ft" => Some(0.3048),
        "us-ft" => Some(1200.0 / 3937.0),
        _ => None,
    }
}

impl CrsDef {
    /// Parse a `+key=value ...` string.
    ///
    /// Keys are case-insensitive and unrecognized keys are skipped. A
    /// malformed number is an error; an illegal `axis` is ignored.
    pub fn from_proj4(definition: &str) -> Result<Self, CrsError> {
        let mut def = CrsDef::default();
        for token in definition.split('+') {
            let (key, value) = match token.split_once('=') {
                Some((k, v)) => (k, v.trim()),
                None => (token, ""),
            };
            let key: String = key
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            let compact = || value.split_whitespace().collect::<String>();

            match key.as_str() {
                "" | "no_defs" => {}
                "title" => def.title = Some(value.to_string()),
                "proj" => def.proj_name = Some(compact()),
                "units" => def.units = Some(compact()),
                "datum" => def.datum_code = Some(compact()),
                "nadgrids" => def.nadgrids = Some(compact()),
                "ellps" => def.ellps = Some(compact()),
                "a" => def.a = Some(number(&key, value)?),
                "b" => def.b = Some(number(&key, value)?),
                "rf" => def.rf = Some(number(&key, value)?),
                "lat_0" => def.lat0 = Some(angle(&key, value)?),
                "lat_1" => def.lat1 = Some(angle(&key, value)?),
                "lat_2" => def.lat2 = Some(angle(&key, value)?),
                "lat_ts" => def.lat_ts = Some(angle(&key, value)?),
                "lon_0" => def.long0 = Some(angle(&key, value)?),
                "lon_1" => def.lon1 = Some(angle(&key, value)?),
                "lon_2" => def.lon2 = Some(angle(&key, value)?),
                "alpha" => def.alpha = Some(angle(&key, value)?),
                "lonc" => def.longc = Some(angle(&key, value)?),
                "x_0" => def.x0 = Some(number(&key, value)?),
                "y_0" => def.y0 = Some(number(&key, value)?),
                "k_0" | "k" => def.k0 = Some(number(&key, value)?),
                "r_a" => def.r_a = true,
                "zone" => {
                    let zone = value
                        .parse::<i32>()
                        .map_err(|_| CrsError::Parse(format!("invalid zone '{value}'")))?;
                    def.zone = Some(zone);
                }
                "south" => def.south = true,
                "towgs84" => {
                    let params = value
                        .split(',')
                        .map(|v| number(&key, v))
                        .collect::<Result<Vec<_>, _>>()?;
                    def.datum_params = Some(params);
                }
                "to_meter" => def.to_meter = Some(number(&key, value)?),
                "from_greenwich" => def.from_greenwich = Some(angle(&key, value)?),
                "pm" => {
                    let degrees = match defs::prime_meridian(value) {
                        Some(deg) => deg,
                        None => number(&key, value)?,
                    };
                    def.from_greenwich = Some(degrees * D2R);
                }
                "axis" => match value.parse::<AxisOrder>() {
                    Ok(axis) => def.axis = Some(axis),
                    Err(e) => warn!("ignoring axis '{value}': {e}"),
                },
                other => debug!("ignoring unrecognized parameter '{other}'"),
            }
        }
        Ok(def)
    }

    /// Resolve names and derive constants, producing a ready CRS.
    pub fn build(mut self) -> Result<Crs, CrsError> {
        let proj_name = self
            .proj_name
            .clone()
            .ok_or_else(|| CrsError::Parse("definition has no projection".to_string()))?;

        if self.nadgrids.as_deref() == Some("@null") {
            self.datum_code = Some("none".to_string());
            self.nadgrids = None;
        }
        let no_datum = self
            .datum_code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case("none"));
        if let Some(code) = self.datum_code.clone().filter(|_| !no_datum) {
            match defs::datum(&code) {
                Some(named) => {
                    self.datum_params = named.towgs84.map(<[f64]>::to_vec);
                    if let Some(grids) = named.nadgrids {
                        self.nadgrids = Some(grids.to_string());
                    }
                    self.ellps = Some(named.ellipse.to_string());
                }
                None => warn!("unknown datum '{code}', keeping the ellipsoid as given"),
            }
        }

        let (a, b) = match self.a {
            Some(a) => {
                let b = match (self.b, self.rf) {
                    (Some(b), _) => b,
                    (None, Some(rf)) if rf != 0.0 => (1.0 - 1.0 / rf) * a,
                    _ => a,
                };
                (a, b)
            }
            None => {
                let name = self.ellps.as_deref().unwrap_or("WGS84");
                let ellipsoid = Ellipsoid::named(name).unwrap_or_else(|| {
                    warn!("unknown ellipsoid '{name}', falling back to WGS84");
                    WGS84
                });
                (ellipsoid.a, ellipsoid.b)
            }
        };
        if !(a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0) {
            return Err(CrsError::Configuration(format!(
                "ellipsoid axes must be positive, got a={a} b={b}"
            )));
        }
        if b > a + EPSLN {
            return Err(CrsError::Configuration(format!(
                "semi-minor axis {b} exceeds semi-major axis {a}"
            )));
        }

        let (a, b) = if (a - b).abs() < EPSLN {
            (a, a)
        } else if self.r_a {
            // Sphere of the same surface area.
            let es = (a * a - b * b) / (a * a);
            let r = a * (1.0 - es * (SIXTH + es * (RA4 + es * RA6)));
            (r, r)
        } else {
            (a, b)
        };

        let kind = if no_datum {
            DatumKind::NoDatum
        } else if let Some(grids) = self.nadgrids.clone() {
            DatumKind::GridShift { grids }
        } else {
            match self.datum_params.as_deref() {
                None | Some([]) => DatumKind::Wgs84Equivalent,
                Some(p) if p.len() == 3 || p.len() == 7 => DatumKind::from_towgs84(p),
                Some(p) => {
                    return Err(CrsError::Configuration(format!(
                        "towgs84 needs 3 or 7 values, got {}",
                        p.len()
                    )))
                }
            }
        };

        let to_meter = match (self.to_meter, self.units.as_deref()) {
            (Some(f), _) => f,
            (None, Some(units)) => unit_to_meter(units).unwrap_or_else(|| {
                warn!("unknown units '{units}', assuming metres");
                1.0
            }),
            (None, None) => 1.0,
        };
        if !(to_meter.is_finite() && to_meter > 0.0) {
            return Err(CrsError::Configuration(format!(
                "to_meter must be positive, got {to_meter}"
            )));
        }

        let mut params = ProjParams {
            long0: self.long0.unwrap_or(0.0),
            lat0: self.lat0.unwrap_or(0.0),
            lat1: self.lat1,
            lat2: self.lat2,
            lat_ts: self.lat_ts,
            lon1: self.lon1,
            lon2: self.lon2,
            alpha: self.alpha,
            longc: self.longc,
            k0: self.k0.unwrap_or(1.0),
            x0: self.x0.unwrap_or(0.0),
            y0: self.y0.unwrap_or(0.0),
            zone: self.zone,
            south: self.south,
            ..ProjParams::new(&Ellipsoid::from_b(a, b))
        };
        let projection = ProjectionKind::init(&proj_name, &mut params)?;
        let datum = Datum::new(kind, params.a, params.b, params.es, params.ep2);

        debug!(
            "built {proj_name} CRS: a={} b={} datum={:?}",
            params.a, params.b, datum.kind
        );

        Ok(Crs {
            title: self.title,
            proj_name,
            datum_code: self.datum_code,
            ellps: self.ellps,
            units: self.units,
            params,
            datum,
            to_meter,
            from_greenwich: self.from_greenwich.unwrap_or(0.0),
            axis: self.axis.unwrap_or_default(),
            projection,
            ready: true,
        })
    }
}

/// A fully derived coordinate reference system.
///
/// Immutable once built and safe to share between threads.
#[derive(Debug, Clone)]
pub struct Crs {
    pub title: Option<String>,
    pub proj_name: String,
    pub datum_code: Option<String>,
    pub ellps: Option<String>,
    pub units: Option<String>,
    pub params: ProjParams,
    pub datum: Datum,
    /// Metres per native linear unit.
    pub to_meter: f64,
    /// Prime meridian offset east of Greenwich, radians.
    pub from_greenwich: f64,
    pub axis: AxisOrder,
    projection: ProjectionKind,
    ready: bool,
}

impl Crs {
    /// A CRS known only by name, whose definition has not been resolved.
    ///
    /// Transforms through it fail until it is replaced by a built one.
    pub fn unresolved(code: &str) -> Self {
        let params = ProjParams::new(&WGS84);
        Self {
            title: Some(code.to_string()),
            proj_name: "longlat".to_string(),
            datum_code: None,
            ellps: None,
            units: None,
            datum: Datum::wgs84(),
            params,
            to_meter: 1.0,
            from_greenwich: 0.0,
            axis: AxisOrder::ENU,
            projection: ProjectionKind::LongLat(crate::proj::longlat::LongLat),
            ready: false,
        }
    }

    pub fn projection(&self) -> &ProjectionKind {
        &self.projection
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Longitude/latitude in degrees.
    pub fn is_geographic(&self) -> bool {
        matches!(self.proj_name.as_str(), "longlat" | "latlong")
    }

    /// Earth-centred X/Y/Z.
    pub fn is_geocentric(&self) -> bool {
        self.proj_name == "geocent"
    }

    pub fn is_spherical_mercator(&self) -> bool {
        self.proj_name == "merc" && self.params.sphere
    }

    /// Whether the datum code names WGS84 itself.
    pub fn is_wgs84_datum(&self) -> bool {
        self.datum_code
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case("WGS84"))
    }

    /// Short human-readable label for logs.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.proj_name)
    }
}

impl FromStr for Crs {
    type Err = CrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        build_crs(s)
    }
}

/// Build a CRS from a PROJ.4 string, a WKT string or a built-in code.
pub fn build_crs(definition: &str) -> Result<Crs, CrsError> {
    let definition = definition.trim();
    let upper = definition.to_ascii_uppercase();
    if definition.starts_with('+') || upper.contains("+PROJ=") {
        return CrsDef::from_proj4(definition)?.build();
    }
    if WKT_ROOTS.iter().any(|root| upper.starts_with(root)) {
        return wkt::parse(definition)?.build();
    }
    match defs::builtin(definition) {
        Some(def) => CrsDef::from_proj4(&def)?.build(),
        None => Err(CrsError::Parse(format!(
            "'{definition}' is neither a PROJ.4 string, WKT, nor a known code"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjError;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_proj4_keys() {
        let def = CrsDef::from_proj4(
            "+proj=lcc +LAT_1=33 +lat_2=45 +lat_0=39 +lon_0=-96 +x_0=100 +y_0=-5 +k=0.9996 \
             +ellps=GRS80 +towgs84=1,2,3 +units=m +bogus=7 +no_defs",
        )
        .unwrap();
        assert_eq!(def.proj_name.as_deref(), Some("lcc"));
        assert_relative_eq!(def.lat1.unwrap(), 33.0 * D2R);
        assert_relative_eq!(def.long0.unwrap(), -96.0 * D2R);
        assert_eq!(def.x0, Some(100.0));
        assert_eq!(def.y0, Some(-5.0));
        assert_eq!(def.k0, Some(0.9996));
        assert_eq!(def.datum_params, Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(def.ellps.as_deref(), Some("GRS80"));
    }

    #[test]
    fn test_invalid_number_is_parse_error() {
        assert!(matches!(
            CrsDef::from_proj4("+proj=merc +lat_ts=abc"),
            Err(CrsError::Parse(_))
        ));
    }

    #[test]
    fn test_illegal_axis_is_ignored() {
        let crs = build_crs("+proj=longlat +datum=WGS84 +axis=enx").unwrap();
        assert!(crs.axis.is_enu());
        let crs = build_crs("+proj=longlat +datum=WGS84 +axis=neu").unwrap();
        assert_eq!(crs.axis.to_string(), "neu");
    }

    #[test]
    fn test_named_datum_overrides_ellipsoid() {
        let crs = build_crs("+proj=longlat +ellps=GRS80 +datum=OSGB36").unwrap();
        assert_eq!(crs.ellps.as_deref(), Some("airy"));
        assert_relative_eq!(crs.params.a, 6_377_563.396);
        assert!(matches!(crs.datum.kind, DatumKind::SevenParam { .. }));
    }

    #[test]
    fn test_nadgrids_null_disables_datum() {
        let crs = build_crs(
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 +x_0=0.0 +y_0=0 +k=1.0 \
             +units=m +nadgrids=@null +no_defs",
        )
        .unwrap();
        assert_eq!(crs.datum.kind, DatumKind::NoDatum);
        assert!(crs.params.sphere);
        assert!(crs.is_spherical_mercator());
    }

    #[test]
    fn test_grid_datum_is_recognized() {
        let crs = build_crs("+proj=longlat +datum=NAD27").unwrap();
        assert!(matches!(crs.datum.kind, DatumKind::GridShift { .. }));
        assert_relative_eq!(crs.params.b, 6_356_583.8);
    }

    #[test]
    fn test_unknown_ellipsoid_falls_back_to_wgs84() {
        let crs = build_crs("+proj=longlat +ellps=nowhere").unwrap();
        assert_relative_eq!(crs.params.a, WGS84.a);
        assert_relative_eq!(crs.params.b, WGS84.b);
    }

    #[test]
    fn test_rf_derives_b_and_near_equal_axes_make_sphere() {
        let crs = build_crs("+proj=merc +a=6378137 +rf=298.257223563").unwrap();
        assert_relative_eq!(crs.params.b, WGS84.b, epsilon = 1e-6);
        assert!(!crs.params.sphere);

        let crs = build_crs("+proj=merc +a=6378137 +b=6378136.99999999999").unwrap();
        assert!(crs.params.sphere);
        assert_eq!(crs.params.es, 0.0);
    }

    #[test]
    fn test_authalic_sphere() {
        let crs = build_crs("+proj=laea +ellps=WGS84 +R_A").unwrap();
        assert!(crs.params.sphere);
        assert_eq!(crs.params.es, 0.0);
        // Authalic radius of WGS84.
        assert_relative_eq!(crs.params.a, 6_371_007.18, epsilon = 0.01);
    }

    #[test]
    fn test_units_and_prime_meridian() {
        let crs = build_crs("+proj=tmerc +ellps=GRS80 +units=us-ft +pm=paris").unwrap();
        assert_relative_eq!(crs.to_meter, 1200.0 / 3937.0);
        assert_relative_eq!(crs.from_greenwich, 2.337_229_166_667 * D2R);

        let crs = build_crs("+proj=tmerc +ellps=GRS80 +units=ft +to_meter=2").unwrap();
        assert_relative_eq!(crs.to_meter, 2.0);

        let crs = build_crs("+proj=longlat +ellps=GRS80 +pm=-3.5").unwrap();
        assert_relative_eq!(crs.from_greenwich, -3.5 * D2R);
    }

    #[test]
    fn test_utm_zone_derivation() {
        let crs = build_crs("+proj=utm +zone=33 +ellps=WGS84").unwrap();
        assert_relative_eq!(crs.params.long0, (6.0 * 33.0 - 183.0) * D2R);
        assert_relative_eq!(crs.params.x0, 500_000.0);
        assert_relative_eq!(crs.params.y0, 0.0);
        assert_relative_eq!(crs.params.k0, 0.9996);

        let south = build_crs("+proj=utm +zone=33 +south +ellps=WGS84").unwrap();
        assert_relative_eq!(south.params.y0, 10_000_000.0);

        assert!(matches!(
            build_crs("+proj=utm +zone=61"),
            Err(CrsError::Projection(ProjError::Configuration(_)))
        ));
    }

    #[test]
    fn test_conic_degeneracy_is_configuration_error() {
        for proj in ["lcc", "aea"] {
            let def = format!("+proj={proj} +lat_1=30 +lat_2=-30 +ellps=WGS84");
            assert!(matches!(
                build_crs(&def),
                Err(CrsError::Projection(ProjError::Configuration(_)))
            ));
        }
    }

    #[test]
    fn test_bad_towgs84_length() {
        assert!(matches!(
            build_crs("+proj=longlat +ellps=intl +towgs84=1,2,3,4"),
            Err(CrsError::Configuration(_))
        ));
        let crs = build_crs("+proj=longlat +ellps=intl +towgs84=0,0,0,0,0,0,0").unwrap();
        assert_eq!(crs.datum.kind, DatumKind::Wgs84Equivalent);
    }

    #[test]
    fn test_unrecognized_definitions() {
        assert!(matches!(build_crs("hello world"), Err(CrsError::Parse(_))));
        assert!(matches!(
            build_crs("+ellps=WGS84"),
            Err(CrsError::Parse(_))
        ));
        assert!(matches!(
            build_crs("+proj=bogus"),
            Err(CrsError::UnknownProjection(name)) if name == "bogus"
        ));
    }

    #[test]
    fn test_builtin_codes_and_from_str() {
        let crs: Crs = "EPSG:4326".parse().unwrap();
        assert!(crs.is_geographic());
        assert!(crs.is_wgs84_datum());
        let google = build_crs("GOOGLE").unwrap();
        assert_eq!(google.label(), "Google Mercator");
        assert!(build_crs("epsg:32633").unwrap().params.zone == Some(33));
    }

    #[test]
    fn test_unresolved_is_not_ready() {
        assert!(!Crs::unresolved("EPSG:1234").is_ready());
        assert!(build_crs("WGS84").unwrap().is_ready());
    }
}
