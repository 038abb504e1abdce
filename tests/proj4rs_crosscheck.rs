//! Agreement with the proj4rs crate on a spread of projections and a datum
//! shift. proj4rs takes geographic coordinates in radians.

use approx::assert_relative_eq;
use proj4rs::Proj;

use reproj::{build_crs, transform, Point};

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Projected definitions with sample points inside their area of use.
const CASES: &[(&str, &[(f64, f64)])] = &[
    (
        "+proj=utm +zone=33 +datum=WGS84 +units=m +no_defs",
        &[(15.0, 52.0), (12.5, 45.3), (17.9, 60.1)],
    ),
    (
        "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 +ellps=airy +units=m +no_defs",
        &[(-1.5, 53.0), (-4.0, 50.5), (0.5, 52.2)],
    ),
    (
        "+proj=merc +lon_0=10 +k=1 +x_0=0 +y_0=0 +ellps=WGS84 +units=m +no_defs",
        &[(10.0, 0.0), (-20.0, 45.0), (100.0, -60.0)],
    ),
    (
        "+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 +x_0=700000 +y_0=6600000 +ellps=GRS80 +units=m +no_defs",
        &[(2.35, 48.86), (-1.5, 43.5), (7.7, 48.6)],
    ),
    (
        "+proj=aea +lat_1=29.5 +lat_2=45.5 +lat_0=23 +lon_0=-96 +x_0=0 +y_0=0 +ellps=GRS80 +units=m +no_defs",
        &[(-96.0, 23.0), (-120.0, 40.0), (-75.0, 35.0)],
    ),
    (
        "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m +no_defs",
        &[(10.0, 52.0), (2.35, 48.86), (25.0, 60.0)],
    ),
    (
        "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +ellps=WGS84 +units=m +no_defs",
        &[(-45.0, 80.0), (0.0, 75.0), (120.0, 65.0)],
    ),
    (
        "+proj=sterea +lat_0=52.15616055555555 +lon_0=5.38763888888889 +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=bessel +units=m +no_defs",
        &[(5.38763888888889, 52.15616055555555), (4.9, 52.37), (6.5, 53.2)],
    ),
    (
        "+proj=somerc +lat_0=46.95240555555556 +lon_0=7.439583333333333 +k_0=1 +x_0=600000 +y_0=200000 +ellps=bessel +units=m +no_defs",
        &[(7.439583333333333, 46.95240555555556), (8.54, 47.37), (6.14, 46.2)],
    ),
    (
        "+proj=eqc +lat_ts=30 +lon_0=0 +x_0=0 +y_0=0 +ellps=WGS84 +units=m +no_defs",
        &[(0.0, 0.0), (45.0, 30.0), (-170.0, -80.0)],
    ),
];

fn proj(def: &str) -> Proj {
    Proj::from_proj_string(def).unwrap()
}

#[test]
fn test_forward_matches_proj4rs() {
    let ours_src = build_crs(WGS84).unwrap();
    let theirs_src = proj(WGS84);

    for &(def, points) in CASES {
        let ours_dst = build_crs(def).unwrap();
        let theirs_dst = proj(def);
        for &(lon, lat) in points {
            let mut ours = Point::new(lon, lat);
            transform(&ours_src, &ours_dst, &mut ours).unwrap();

            let mut theirs = (lon.to_radians(), lat.to_radians());
            proj4rs::transform::transform(&theirs_src, &theirs_dst, &mut theirs).unwrap();

            assert_relative_eq!(ours.x, theirs.0, epsilon = 1e-3);
            assert_relative_eq!(ours.y, theirs.1, epsilon = 1e-3);
        }
    }
}

#[test]
fn test_inverse_matches_proj4rs() {
    let ours_dst = build_crs(WGS84).unwrap();
    let theirs_dst = proj(WGS84);

    for &(def, points) in CASES {
        let ours_src = build_crs(def).unwrap();
        let theirs_src = proj(def);
        for &(lon, lat) in points {
            // Start from a projected coordinate both libraries agree on.
            let mut start = (lon.to_radians(), lat.to_radians());
            proj4rs::transform::transform(&theirs_dst, &theirs_src, &mut start).unwrap();

            let mut ours = Point::new(start.0, start.1);
            transform(&ours_src, &ours_dst, &mut ours).unwrap();

            let mut theirs = start;
            proj4rs::transform::transform(&theirs_src, &theirs_dst, &mut theirs).unwrap();

            assert_relative_eq!(ours.x, theirs.0.to_degrees(), epsilon = 1e-8);
            assert_relative_eq!(ours.y, theirs.1.to_degrees(), epsilon = 1e-8);
        }
    }
}

#[test]
fn test_three_parameter_shift_matches_proj4rs() {
    let ed50 = "+proj=longlat +ellps=intl +towgs84=-87,-98,-121 +no_defs";
    let ours_src = build_crs(WGS84).unwrap();
    let ours_dst = build_crs(ed50).unwrap();
    let theirs_src = proj(WGS84);
    let theirs_dst = proj(ed50);

    for &(lon, lat) in &[(2.35, 48.86), (-3.7, 40.4), (12.5, 41.9)] {
        let mut ours = Point::new(lon, lat);
        transform(&ours_src, &ours_dst, &mut ours).unwrap();

        let mut theirs = (lon.to_radians(), lat.to_radians(), 0.0);
        proj4rs::transform::transform(&theirs_src, &theirs_dst, &mut theirs).unwrap();

        assert_relative_eq!(ours.x, theirs.0.to_degrees(), epsilon = 1e-8);
        assert_relative_eq!(ours.y, theirs.1.to_degrees(), epsilon = 1e-8);
    }
}
