//! WKT (version 1) CRS definitions.
//!
//! The text is first read into a generic `KEYWORD[arg, ...]` tree, which is
//! then walked to fill the same [`CrsDef`] fields the PROJ.4 parser fills.

use log::{debug, warn};

use crate::axis::{AxisDir, AxisOrder};
use crate::constants::D2R;
use crate::crs::CrsDef;
use crate::defs;
use crate::error::CrsError;

/// One `KEYWORD[...]` node.
#[derive(Debug, Clone, PartialEq)]
pub struct WktNode {
    pub keyword: String,
    pub args: Vec<WktValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WktValue {
    Node(WktNode),
    /// A quoted string.
    Text(String),
    Number(f64),
    /// A bare word such as `NORTH`.
    Enum(String),
}

impl WktNode {
    /// The leading quoted name, e.g. `"WGS 84"` in `GEOGCS["WGS 84", ...]`.
    pub fn name(&self) -> Option<&str> {
        match self.args.first() {
            Some(WktValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.args.iter().filter_map(|v| match v {
            WktValue::Number(n) => Some(*n),
            _ => None,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = &WktNode> + '_ {
        self.args.iter().filter_map(|v| match v {
            WktValue::Node(n) => Some(n),
            _ => None,
        })
    }

    pub fn child(&self, keyword: &str) -> Option<&WktNode> {
        self.children()
            .find(|n| n.keyword.eq_ignore_ascii_case(keyword))
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, what: &str) -> CrsError {
        CrsError::Parse(format!("WKT: {what} at offset {}", self.pos))
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn node(&mut self, keyword: &str) -> Result<WktNode, CrsError> {
        // Positioned on the opening bracket.
        self.pos += 1;
        let mut args = Vec::new();
        self.skip_ws();
        if matches!(self.peek(), Some(b']' | b')')) {
            self.pos += 1;
            return Ok(WktNode {
                keyword: keyword.to_ascii_uppercase(),
                args,
            });
        }
        loop {
            args.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']' | b')') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => return Err(self.error("expected ',' or closing bracket")),
                None => return Err(self.error("unterminated bracket")),
            }
        }
        Ok(WktNode {
            keyword: keyword.to_ascii_uppercase(),
            args,
        })
    }

    fn value(&mut self) -> Result<WktValue, CrsError> {
        self.skip_ws();
        match self.peek() {
            Some(b'"') => self.quoted().map(WktValue::Text),
            Some(c) if c.is_ascii_digit() || matches!(c, b'-' | b'+' | b'.') => {
                self.number().map(WktValue::Number)
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let word = self.word();
                self.skip_ws();
                if matches!(self.peek(), Some(b'[' | b'(')) {
                    self.node(word).map(WktValue::Node)
                } else {
                    Ok(WktValue::Enum(word.to_string()))
                }
            }
            _ => Err(self.error("unexpected character")),
        }
    }

    fn quoted(&mut self) -> Result<String, CrsError> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let rest = &self.src[self.pos..];
            let end = rest
                .find('"')
                .ok_or_else(|| self.error("unterminated string"))?;
            out.push_str(&rest[..end]);
            self.pos += end + 1;
            // A doubled quote is an escaped quote.
            if self.peek() == Some(b'"') {
                out.push('"');
                self.pos += 1;
            } else {
                return Ok(out);
            }
        }
    }

    fn number(&mut self) -> Result<f64, CrsError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, b'-' | b'+' | b'.' | b'e' | b'E'))
        {
            self.pos += 1;
        }
        self.src[start..self.pos]
            .parse()
            .map_err(|_| self.error("malformed number"))
    }
}

/// Read WKT text into its node tree.
pub fn parse_tree(input: &str) -> Result<WktNode, CrsError> {
    let mut parser = Parser {
        src: input.trim(),
        pos: 0,
    };
    let keyword = parser.word();
    if keyword.is_empty() {
        return Err(parser.error("expected a keyword"));
    }
    parser.skip_ws();
    if !matches!(parser.peek(), Some(b'[' | b'(')) {
        return Err(parser.error("expected an opening bracket"));
    }
    let node = parser.node(keyword)?;
    parser.skip_ws();
    if parser.pos != parser.src.len() {
        return Err(parser.error("trailing characters"));
    }
    Ok(node)
}

/// WKT projection names mapped to family names, compared with spaces
/// folded to underscores and ignoring case.
const PROJECTIONS: &[(&str, &str)] = &[
    ("lambert_tangential_conformal_conic_projection", "lcc"),
    ("lambert_conformal_conic", "lcc"),
    ("lambert_conformal_conic_1sp", "lcc"),
    ("lambert_conformal_conic_2sp", "lcc"),
    ("mercator", "merc"),
    ("mercator_1sp", "merc"),
    ("mercator_2sp", "merc"),
    ("popular_visualisation_pseudo_mercator", "merc"),
    ("transverse_mercator", "tmerc"),
    ("gauss_kruger", "tmerc"),
    ("universal_transverse_mercator_system", "utm"),
    ("lambert_azimuthal_equal_area", "laea"),
    ("albers_conic_equal_area", "aea"),
    ("albers", "aea"),
    ("azimuthal_equidistant", "aeqd"),
    ("cassini_soldner", "cass"),
    ("cylindrical_equal_area", "cea"),
    ("equirectangular", "eqc"),
    ("equidistant_cylindrical", "eqc"),
    ("equidistant_conic", "eqdc"),
    ("gnomonic", "gnom"),
    ("hotine_oblique_mercator", "omerc"),
    ("hotine_oblique_mercator_azimuth_center", "omerc"),
    ("miller_cylindrical", "mill"),
    ("mollweide", "moll"),
    ("new_zealand_map_grid", "nzmg"),
    ("oblique_stereographic", "sterea"),
    ("double_stereographic", "sterea"),
    ("orthographic", "ortho"),
    ("polar_stereographic", "stere"),
    ("stereographic", "stere"),
    ("polyconic", "poly"),
    ("sinusoidal", "sinu"),
    ("swiss_oblique_cylindrical", "somerc"),
    ("van_der_grinten_i", "vandg"),
    ("vandergrinten", "vandg"),
];

/// WKT datum names that differ from the datum table codes.
const DATUM_ALIASES: &[(&str, &str)] = &[
    ("wgs_1984", "WGS84"),
    ("wgs84", "WGS84"),
    ("north_american_datum_1983", "NAD83"),
    ("north_american_datum_1927", "NAD27"),
    ("osgb_1936", "OSGB36"),
    ("ordnance_survey_of_great_britain_1936", "OSGB36"),
    ("deutsches_hauptdreiecksnetz", "potsdam"),
    ("new_zealand_geodetic_datum_1949", "nzgd49"),
    ("greek_geodetic_reference_system_1987", "GGRS87"),
    ("ch1903", "ch1903"),
];

fn fold(name: &str) -> String {
    name.trim().replace([' ', '-'], "_").to_ascii_lowercase()
}

fn projection_family(name: &str) -> Option<&'static str> {
    let folded = fold(name);
    PROJECTIONS
        .iter()
        .find(|(wkt, _)| *wkt == folded)
        .map(|&(_, family)| family)
}

fn datum_code(name: &str) -> Option<String> {
    let folded = fold(name);
    let folded = folded.strip_prefix("d_").unwrap_or(folded.as_str());
    if let Some((_, code)) = DATUM_ALIASES.iter().find(|(alias, _)| *alias == folded) {
        return Some(code.to_string());
    }
    defs::datum(folded).map(|d| d.code.to_string())
}

fn axis_dir(node: &WktNode) -> Option<AxisDir> {
    node.args.iter().find_map(|v| match v {
        WktValue::Enum(dir) => match dir.to_ascii_uppercase().as_str() {
            "EAST" => Some(AxisDir::East),
            "WEST" => Some(AxisDir::West),
            "NORTH" => Some(AxisDir::North),
            "SOUTH" => Some(AxisDir::South),
            "UP" => Some(AxisDir::Up),
            "DOWN" => Some(AxisDir::Down),
            _ => None,
        },
        _ => None,
    })
}

/// Walks the tree, collecting into a [`CrsDef`].
struct Collector {
    def: CrsDef,
    axes: Vec<AxisDir>,
}

impl Collector {
    fn visit(&mut self, node: &WktNode, parent: Option<&str>) -> Result<(), CrsError> {
        let name = node.name().unwrap_or_default();
        let first = node.numbers().next();
        match node.keyword.as_str() {
            "LOCAL_CS" => {
                self.def.proj_name = Some("identity".to_string());
                self.def.datum_code = Some("none".to_string());
                self.def.title.get_or_insert_with(|| name.to_string());
            }
            "GEOGCS" => {
                // The base geographic CRS of a PROJCS does not decide the family.
                if self.def.proj_name.is_none() {
                    self.def.proj_name = Some("longlat".to_string());
                }
                self.def.title.get_or_insert_with(|| name.to_string());
            }
            "GEOCCS" => {
                self.def.proj_name = Some("geocent".to_string());
                self.def.title.get_or_insert_with(|| name.to_string());
            }
            "PROJCS" => {
                self.def.title = Some(name.to_string());
            }
            "PROJECTION" => {
                let family = projection_family(name)
                    .ok_or_else(|| CrsError::UnknownProjection(name.to_string()))?;
                self.def.proj_name = Some(family.to_string());
            }
            "DATUM" => match datum_code(name) {
                Some(code) => self.def.datum_code = Some(code),
                None => debug!("WKT datum '{name}' is not a known datum"),
            },
            "LOCAL_DATUM" => self.def.datum_code = Some("none".to_string()),
            "SPHEROID" | "ELLIPSOID" => {
                self.def.ellps = Some(name.to_string());
                let mut numbers = node.numbers();
                self.def.a = numbers.next();
                self.def.rf = numbers.next();
            }
            "PRIMEM" => self.def.from_greenwich = first.map(|deg| deg * D2R),
            "UNIT" => {
                // Angular units of the geographic part are always degrees here.
                if matches!(parent, Some("PROJCS" | "GEOCCS" | "LOCAL_CS")) {
                    self.def.units = Some(name.to_string());
                    self.def.to_meter = first;
                }
            }
            "TOWGS84" => self.def.datum_params = Some(node.numbers().collect()),
            "PARAMETER" => {
                let value = first.ok_or_else(|| {
                    CrsError::Parse(format!("WKT parameter '{name}' has no value"))
                })?;
                let def = &mut self.def;
                match fold(name).as_str() {
                    "false_easting" => def.x0 = Some(value),
                    "false_northing" => def.y0 = Some(value),
                    "scale_factor" => def.k0 = Some(value),
                    "central_meridian" | "longitude_of_origin" => def.long0 = Some(value * D2R),
                    "latitude_of_origin" | "latitude_of_center" => def.lat0 = Some(value * D2R),
                    "longitude_of_center" => {
                        def.long0 = Some(value * D2R);
                        def.longc = Some(value * D2R);
                    }
                    "standard_parallel_1" => def.lat1 = Some(value * D2R),
                    "standard_parallel_2" => def.lat2 = Some(value * D2R),
                    "azimuth" => def.alpha = Some(value * D2R),
                    other => debug!("ignoring WKT parameter '{other}'"),
                }
            }
            "AXIS" => match axis_dir(node) {
                Some(dir) => self.axes.push(dir),
                None => warn!("ignoring WKT axis '{name}' with no direction"),
            },
            other => debug!("ignoring WKT node {other}"),
        }

        let keyword = node.keyword.as_str();
        for child in node.children() {
            // Only the outermost coordinate system's axes count.
            if child.keyword == "GEOGCS" && keyword == "PROJCS" {
                let saved = std::mem::take(&mut self.axes);
                self.visit(child, Some(keyword))?;
                self.axes = saved;
            } else {
                self.visit(child, Some(keyword))?;
            }
        }
        Ok(())
    }
}

/// Parse a WKT definition into a [`CrsDef`].
pub fn parse(input: &str) -> Result<CrsDef, CrsError> {
    let root = parse_tree(input)?;
    if !matches!(
        root.keyword.as_str(),
        "GEOGCS" | "GEOCCS" | "PROJCS" | "LOCAL_CS"
    ) {
        return Err(CrsError::Parse(format!(
            "WKT root {} is not a coordinate system",
            root.keyword
        )));
    }
    let mut collector = Collector {
        def: CrsDef::default(),
        axes: Vec::new(),
    };
    collector.visit(&root, None)?;

    let Collector { mut def, axes } = collector;
    if !axes.is_empty() {
        let mut dirs = AxisOrder::ENU.dirs();
        for (slot, dir) in dirs.iter_mut().zip(axes) {
            *slot = dir;
        }
        match AxisOrder::new(dirs) {
            Ok(axis) => def.axis = Some(axis),
            Err(e) => warn!("ignoring WKT axes: {e}"),
        }
    }
    Ok(def)
}
