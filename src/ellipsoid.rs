/// Reference ellipsoid parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Semi-minor axis (metres)
    pub b: f64,
    /// Inverse flattening, zero for a sphere
    pub rf: f64,
}

/// How a table entry fixes the ellipsoid's second parameter.
#[derive(Clone, Copy, Debug)]
enum Shape {
    Rf(f64),
    B(f64),
}

struct NamedEllipsoid {
    name: &'static str,
    a: f64,
    shape: Shape,
    title: &'static str,
}

impl Ellipsoid {
    pub fn from_rf(a: f64, rf: f64) -> Self {
        let b = if rf == 0.0 { a } else { (1.0 - 1.0 / rf) * a };
        Self { a, b, rf }
    }

    pub fn from_b(a: f64, b: f64) -> Self {
        let rf = if (a - b).abs() < f64::EPSILON { 0.0 } else { a / (a - b) };
        Self { a, b, rf }
    }

    /// Look up a named ellipsoid, matching names case-insensitively.
    pub fn named(name: &str) -> Option<Self> {
        ELLIPSOIDS
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| match e.shape {
                Shape::Rf(rf) => Self::from_rf(e.a, rf),
                Shape::B(b) => Self::from_b(e.a, b),
            })
    }

    /// Human-readable title of a named ellipsoid.
    pub fn title(name: &str) -> Option<&'static str> {
        ELLIPSOIDS
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| e.title)
    }

    /// First eccentricity squared: (a² - b²) / a²
    pub fn es(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.a * self.a)
    }

    pub fn is_sphere(&self) -> bool {
        (self.a - self.b).abs() < crate::constants::EPSLN
    }
}

pub const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    b: 6_356_752.314_245_179,
    rf: 298.257_223_563,
};

#[rustfmt::skip]
static ELLIPSOIDS: &[NamedEllipsoid] = &[
    NamedEllipsoid { name: "MERIT",    a: 6378137.0,   shape: Shape::Rf(298.257),       title: "MERIT 1983" },
    NamedEllipsoid { name: "SGS85",    a: 6378136.0,   shape: Shape::Rf(298.257),       title: "Soviet Geodetic System 85" },
    NamedEllipsoid { name: "GRS80",    a: 6378137.0,   shape: Shape::Rf(298.257222101), title: "GRS 1980(IUGG, 1980)" },
    NamedEllipsoid { name: "IAU76",    a: 6378140.0,   shape: Shape::Rf(298.257),       title: "IAU 1976" },
    NamedEllipsoid { name: "airy",     a: 6377563.396, shape: Shape::B(6356256.910),    title: "Airy 1830" },
    NamedEllipsoid { name: "APL4.9",   a: 6378137.0,   shape: Shape::Rf(298.25),        title: "Appl. Physics. 1965" },
    NamedEllipsoid { name: "NWL9D",    a: 6378145.0,   shape: Shape::Rf(298.25),        title: "Naval Weapons Lab., 1965" },
    NamedEllipsoid { name: "mod_airy", a: 6377340.189, shape: Shape::B(6356034.446),    title: "Modified Airy" },
    NamedEllipsoid { name: "andrae",   a: 6377104.43,  shape: Shape::Rf(300.0),         title: "Andrae 1876 (Den., Iclnd.)" },
    NamedEllipsoid { name: "aust_SA",  a: 6378160.0,   shape: Shape::Rf(298.25),        title: "Australian Natl & S. Amer. 1969" },
    NamedEllipsoid { name: "GRS67",    a: 6378160.0,   shape: Shape::Rf(298.2471674270), title: "GRS 67(IUGG 1967)" },
    NamedEllipsoid { name: "bessel",   a: 6377397.155, shape: Shape::Rf(299.1528128),   title: "Bessel 1841" },
    NamedEllipsoid { name: "bess_nam", a: 6377483.865, shape: Shape::Rf(299.1528128),   title: "Bessel 1841 (Namibia)" },
    NamedEllipsoid { name: "clrk66",   a: 6378206.4,   shape: Shape::B(6356583.8),      title: "Clarke 1866" },
    NamedEllipsoid { name: "clrk80",   a: 6378249.145, shape: Shape::Rf(293.4663),      title: "Clarke 1880 mod." },
    NamedEllipsoid { name: "CPM",      a: 6375738.7,   shape: Shape::Rf(334.29),        title: "Comm. des Poids et Mesures 1799" },
    NamedEllipsoid { name: "delmbr",   a: 6376428.0,   shape: Shape::Rf(311.5),         title: "Delambre 1810 (Belgium)" },
    NamedEllipsoid { name: "engelis",  a: 6378136.05,  shape: Shape::Rf(298.2566),      title: "Engelis 1985" },
    NamedEllipsoid { name: "evrst30",  a: 6377276.345, shape: Shape::Rf(300.8017),      title: "Everest 1830" },
    NamedEllipsoid { name: "evrst48",  a: 6377304.063, shape: Shape::Rf(300.8017),      title: "Everest 1948" },
    NamedEllipsoid { name: "evrst56",  a: 6377301.243, shape: Shape::Rf(300.8017),      title: "Everest 1956" },
    NamedEllipsoid { name: "evrst69",  a: 6377295.664, shape: Shape::Rf(300.8017),      title: "Everest 1969" },
    NamedEllipsoid { name: "evrstSS",  a: 6377298.556, shape: Shape::Rf(300.8017),      title: "Everest (Sabah & Sarawak)" },
    NamedEllipsoid { name: "fschr60",  a: 6378166.0,   shape: Shape::Rf(298.3),         title: "Fischer (Mercury Datum) 1960" },
    NamedEllipsoid { name: "fschr60m", a: 6378155.0,   shape: Shape::Rf(298.3),         title: "Fischer 1960" },
    NamedEllipsoid { name: "fschr68",  a: 6378150.0,   shape: Shape::Rf(298.3),         title: "Fischer 1968" },
    NamedEllipsoid { name: "helmert",  a: 6378200.0,   shape: Shape::Rf(298.3),         title: "Helmert 1906" },
    NamedEllipsoid { name: "hough",    a: 6378270.0,   shape: Shape::Rf(297.0),         title: "Hough" },
    NamedEllipsoid { name: "intl",     a: 6378388.0,   shape: Shape::Rf(297.0),         title: "International 1909 (Hayford)" },
    NamedEllipsoid { name: "kaula",    a: 6378163.0,   shape: Shape::Rf(298.24),        title: "Kaula 1961" },
    NamedEllipsoid { name: "lerch",    a: 6378139.0,   shape: Shape::Rf(298.257),       title: "Lerch 1979" },
    NamedEllipsoid { name: "mprts",    a: 6397300.0,   shape: Shape::Rf(191.0),         title: "Maupertius 1738" },
    NamedEllipsoid { name: "new_intl", a: 6378157.5,   shape: Shape::B(6356772.2),      title: "New International 1967" },
    NamedEllipsoid { name: "plessis",  a: 6376523.0,   shape: Shape::B(6355863.0),      title: "Plessis 1817 (France)" },
    NamedEllipsoid { name: "krass",    a: 6378245.0,   shape: Shape::Rf(298.3),         title: "Krassovsky, 1942" },
    NamedEllipsoid { name: "SEasia",   a: 6378155.0,   shape: Shape::B(6356773.3205),   title: "Southeast Asia" },
    NamedEllipsoid { name: "walbeck",  a: 6376896.0,   shape: Shape::B(6355834.8467),   title: "Walbeck" },
    NamedEllipsoid { name: "WGS60",    a: 6378165.0,   shape: Shape::Rf(298.3),         title: "WGS 60" },
    NamedEllipsoid { name: "WGS66",    a: 6378145.0,   shape: Shape::Rf(298.25),        title: "WGS 66" },
    NamedEllipsoid { name: "WGS72",    a: 6378135.0,   shape: Shape::Rf(298.26),        title: "WGS 72" },
    NamedEllipsoid { name: "WGS84",    a: 6378137.0,   shape: Shape::Rf(298.257223563), title: "WGS 84" },
    NamedEllipsoid { name: "sphere",   a: 6370997.0,   shape: Shape::B(6370997.0),      title: "Normal Sphere (r=6370997)" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wgs84_constants() {
        let e = Ellipsoid::named("WGS84").unwrap();
        assert_relative_eq!(e.a, 6_378_137.0);
        assert_relative_eq!(e.b, 6_356_752.314_245_179, epsilon = 0.001);
        assert_relative_eq!(e.es().sqrt(), 0.081_819_190_842_622, epsilon = 1e-12);
        assert_relative_eq!(e.b, WGS84.b, epsilon = 1e-6);
    }

    #[test]
    fn test_grs80_close_to_wgs84() {
        let grs80 = Ellipsoid::named("GRS80").unwrap();
        assert_relative_eq!(WGS84.a, grs80.a);
        assert!((WGS84.b - grs80.b).abs() < 0.001);
    }

    #[test]
    fn test_semi_minor_entries() {
        let clrk66 = Ellipsoid::named("clrk66").unwrap();
        assert_relative_eq!(clrk66.b, 6_356_583.8);
        assert_relative_eq!(clrk66.rf, 294.978_698_2, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_and_lookup() {
        let sphere = Ellipsoid::named("SPHERE").unwrap();
        assert!(sphere.is_sphere());
        assert_relative_eq!(sphere.es(), 0.0);
        assert!(Ellipsoid::named("not-an-ellipsoid").is_none());
        assert_eq!(Ellipsoid::title("intl"), Some("International 1909 (Hayford)"));
    }
}
