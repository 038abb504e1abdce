//! Built-in definition tables: named datums, prime meridians and a small set
//! of CRS codes, plus the [`Registry`] that layers user definitions on top.

use std::borrow::Cow;
use std::collections::HashMap;

use log::debug;

use crate::crs::{build_crs, Crs};
use crate::error::CrsError;

/// A named datum: either Helmert parameters to WGS84 or a grid list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedDatum {
    pub code: &'static str,
    pub towgs84: Option<&'static [f64]>,
    pub nadgrids: Option<&'static str>,
    pub ellipse: &'static str,
    pub title: &'static str,
}

#[rustfmt::skip]
static DATUMS: &[NamedDatum] = &[
    NamedDatum { code: "WGS84",         towgs84: Some(&[0.0, 0.0, 0.0]),                 nadgrids: None, ellipse: "WGS84",    title: "WGS84" },
    NamedDatum { code: "GGRS87",        towgs84: Some(&[-199.87, 74.79, 246.62]),        nadgrids: None, ellipse: "GRS80",    title: "Greek_Geodetic_Reference_System_1987" },
    NamedDatum { code: "NAD83",         towgs84: Some(&[0.0, 0.0, 0.0]),                 nadgrids: None, ellipse: "GRS80",    title: "North_American_Datum_1983" },
    NamedDatum { code: "NAD27",         towgs84: None, nadgrids: Some("@conus,@alaska,@ntv2_0.gsb,@ntv1_can.dat"),  ellipse: "clrk66",   title: "North_American_Datum_1927" },
    NamedDatum { code: "potsdam",       towgs84: Some(&[606.0, 23.0, 413.0]),            nadgrids: None, ellipse: "bessel",   title: "Potsdam Rauenberg 1950 DHDN" },
    NamedDatum { code: "carthage",      towgs84: Some(&[-263.0, 6.0, 431.0]),            nadgrids: None, ellipse: "clrk80",   title: "Carthage 1934 Tunisia" },
    NamedDatum { code: "hermannskogel", towgs84: Some(&[653.0, -212.0, 449.0]),          nadgrids: None, ellipse: "bessel",   title: "Hermannskogel" },
    NamedDatum { code: "ire65",         towgs84: Some(&[482.530, -130.596, 564.557, -1.042, -0.214, -0.631, 8.15]),        nadgrids: None, ellipse: "mod_airy", title: "Ireland 1965" },
    NamedDatum { code: "nzgd49",        towgs84: Some(&[59.47, -5.04, 187.44, 0.47, -0.1, 1.024, -4.5993]),                nadgrids: None, ellipse: "intl",     title: "New Zealand Geodetic Datum 1949" },
    NamedDatum { code: "OSGB36",        towgs84: Some(&[446.448, -125.157, 542.060, 0.1502, 0.2470, 0.8421, -20.4894]),   nadgrids: None, ellipse: "airy",     title: "Airy 1830" },
    NamedDatum { code: "ch1903",        towgs84: Some(&[674.374, 15.056, 405.346]),      nadgrids: None, ellipse: "bessel",   title: "swiss" },
];

/// Look up a named datum, ignoring case.
pub fn datum(code: &str) -> Option<&'static NamedDatum> {
    DATUMS.iter().find(|d| d.code.eq_ignore_ascii_case(code))
}

/// Prime meridians, degrees east of Greenwich.
#[rustfmt::skip]
static PRIME_MERIDIANS: &[(&str, f64)] = &[
    ("greenwich", 0.0),
    ("lisbon",    -9.131_906_111_111),
    ("paris",     2.337_229_166_667),
    ("bogota",    -74.080_916_666_667),
    ("madrid",    -3.687_938_888_889),
    ("rome",      12.452_333_333_333),
    ("bern",      7.439_583_333_333),
    ("jakarta",   106.807_719_444_444),
    ("ferro",     -17.666_666_666_667),
    ("brussels",  4.367_975),
    ("stockholm", 18.058_277_777_778),
    ("athens",    23.716_337_5),
    ("oslo",      10.722_916_666_667),
];

/// Longitude of a named prime meridian in degrees.
pub fn prime_meridian(name: &str) -> Option<f64> {
    PRIME_MERIDIANS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, deg)| deg)
}

const WGS84_LONGLAT: &str =
    "+title=long/lat:WGS84 +proj=longlat +ellps=WGS84 +datum=WGS84 +units=degrees";
const NAD83_LONGLAT: &str = "+title=long/lat:NAD83 +proj=longlat +a=6378137.0 +b=6356752.31414036 +ellps=GRS80 +datum=NAD83 +units=degrees";
const GOOGLE_MERCATOR: &str = "+title=Google Mercator +proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 +x_0=0.0 +y_0=0 +k=1.0 +units=m +nadgrids=@null +no_defs";

/// Codes with a fixed definition; each row lists its aliases.
static BUILTIN: &[(&[&str], &str)] = &[
    (&["WGS84", "EPSG:4326"], WGS84_LONGLAT),
    (&["EPSG:4269"], NAD83_LONGLAT),
    (
        &["EPSG:3785", "EPSG:3857", "GOOGLE", "EPSG:900913", "EPSG:102113"],
        GOOGLE_MERCATOR,
    ),
];

/// Definition string of a built-in code, matched case-insensitively.
///
/// UTM on WGS84 (`EPSG:326zz` north, `EPSG:327zz` south) is generated.
pub fn builtin(code: &str) -> Option<Cow<'static, str>> {
    let code = code.trim().to_ascii_uppercase();
    if let Some((_, def)) = BUILTIN
        .iter()
        .find(|(aliases, _)| aliases.iter().any(|a| *a == code))
    {
        return Some(Cow::Borrowed(*def));
    }
    let epsg: u32 = code.strip_prefix("EPSG:")?.parse().ok()?;
    let (zone, south) = match epsg {
        32601..=32660 => (epsg - 32600, false),
        32701..=32760 => (epsg - 32700, true),
        _ => return None,
    };
    let mut def = format!("+proj=utm +zone={zone} +ellps=WGS84 +datum=WGS84 +units=m +no_defs");
    if south {
        def.push_str(" +south");
    }
    Some(Cow::Owned(def))
}

/// User-supplied definitions layered over the built-in table.
///
/// Codes are case-insensitive. A user definition shadows a built-in one.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    defs: HashMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the definition for `code`.
    pub fn insert(&mut self, code: &str, definition: &str) {
        debug!("registering CRS definition for {code}");
        self.defs
            .insert(code.trim().to_ascii_uppercase(), definition.to_string());
    }

    /// Definition string for `code`, user entries first.
    pub fn get(&self, code: &str) -> Option<Cow<'_, str>> {
        let key = code.trim().to_ascii_uppercase();
        match self.defs.get(&key) {
            Some(def) => Some(Cow::Borrowed(def.as_str())),
            None => builtin(&key),
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Build the CRS registered under `code`.
    pub fn build(&self, code: &str) -> Result<Crs, CrsError> {
        let def = self
            .get(code)
            .ok_or_else(|| CrsError::UnknownCode(code.to_string()))?;
        build_crs(&def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_datum_lookup() {
        let osgb = datum("osgb36").unwrap();
        assert_eq!(osgb.ellipse, "airy");
        assert_eq!(osgb.towgs84.unwrap().len(), 7);
        assert!(datum("NAD27").unwrap().nadgrids.is_some());
        assert!(datum("bogus").is_none());
    }

    #[test]
    fn test_prime_meridian_lookup() {
        assert_relative_eq!(prime_meridian("paris").unwrap(), 2.337_229_166_667);
        assert_relative_eq!(prime_meridian("Greenwich").unwrap(), 0.0);
        assert!(prime_meridian("atlantis").is_none());
    }

    #[test]
    fn test_builtin_aliases_share_definition() {
        let google = builtin("GOOGLE").unwrap();
        for code in ["EPSG:3785", "epsg:900913", "EPSG:102113", "EPSG:3857"] {
            assert_eq!(builtin(code).unwrap(), google);
        }
        assert_eq!(builtin("EPSG:4326"), builtin("WGS84"));
        assert!(builtin("EPSG:4269").unwrap().contains("NAD83"));
    }

    #[test]
    fn test_builtin_utm_codes() {
        let north = builtin("EPSG:32633").unwrap();
        assert!(north.contains("+zone=33"));
        assert!(!north.contains("+south"));
        let south = builtin("EPSG:32760").unwrap();
        assert!(south.contains("+zone=60") && south.contains("+south"));
        assert!(builtin("EPSG:32661").is_none());
        assert!(builtin("EPSG:2000").is_none());
    }

    #[test]
    fn test_registry_user_definition_shadows_builtin() {
        let mut registry = Registry::new();
        assert!(registry.contains("EPSG:4326"));
        assert!(!registry.contains("EPSG:27700"));

        registry.insert("epsg:27700", "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 +ellps=airy +datum=OSGB36 +units=m +no_defs");
        assert!(registry.contains("EPSG:27700"));
        let crs = registry.build("EPSG:27700").unwrap();
        assert_eq!(crs.proj_name, "tmerc");

        registry.insert("WGS84", "+proj=longlat +ellps=GRS80");
        assert!(registry.get("wgs84").unwrap().contains("GRS80"));
    }

    #[test]
    fn test_registry_unknown_code() {
        assert!(matches!(
            Registry::new().build("EPSG:1"),
            Err(CrsError::UnknownCode(code)) if code == "EPSG:1"
        ));
    }
}
