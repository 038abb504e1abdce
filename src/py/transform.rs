//! PyO3 binding for batch CRS coordinate transformation.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::crs::build_crs;
use crate::point::Point;
use crate::transform::transform_batch;

/// Transform arrays of coordinates from one CRS to another.
///
/// Args:
///     x: 1D array of x coordinates (longitude or easting).
///     y: 1D array of y coordinates (latitude or northing).
///     src_crs: Source CRS as a PROJ.4 string, WKT or code (e.g. "EPSG:4326").
///     dst_crs: Destination CRS, same forms as `src_crs`.
///     z: Optional 1D array of heights.
///
/// Returns:
///     Tuple of (x_out, y_out, z_out) arrays in the destination CRS; `z_out`
///     is None when no heights were given. Points that fail to transform
///     come back as NaN.
#[pyfunction]
#[pyo3(signature = (x, y, src_crs, dst_crs, z=None))]
#[allow(clippy::type_complexity)]
pub fn transform_points<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<'py, f64>,
    y: PyReadonlyArray1<'py, f64>,
    src_crs: &str,
    dst_crs: &str,
    z: Option<PyReadonlyArray1<'py, f64>>,
) -> PyResult<(
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
    Option<Bound<'py, PyArray1<f64>>>,
)> {
    let x_view = x.as_array();
    let y_view = y.as_array();

    let n = x_view.len();
    if n != y_view.len() {
        return Err(PyValueError::new_err(format!(
            "x and y must have same length, got {} and {}",
            n,
            y_view.len()
        )));
    }

    let mut points: Vec<Point> = x_view
        .iter()
        .zip(y_view.iter())
        .map(|(&xi, &yi)| Point::new(xi, yi))
        .collect();

    let has_z = z.is_some();
    if let Some(z) = z {
        let z_view = z.as_array();
        if z_view.len() != n {
            return Err(PyValueError::new_err(format!(
                "z must match x and y in length, got {} and {}",
                z_view.len(),
                n
            )));
        }
        for (p, &zi) in points.iter_mut().zip(z_view.iter()) {
            p.z = Some(zi);
        }
    }

    let src_crs = src_crs.to_string();
    let dst_crs = dst_crs.to_string();

    let points = py.allow_threads(move || -> PyResult<Vec<Point>> {
        let src = build_crs(&src_crs).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let dst = build_crs(&dst_crs).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let results = transform_batch(&src, &dst, &mut points);
        for (p, result) in points.iter_mut().zip(results) {
            if result.is_err() {
                *p = Point {
                    x: f64::NAN,
                    y: f64::NAN,
                    z: p.z.map(|_| f64::NAN),
                };
            }
        }
        Ok(points)
    })?;

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let zs = has_z.then(|| {
        let zs: Vec<f64> = points.iter().map(Point::height).collect();
        PyArray1::from_owned_array(py, ndarray::Array1::from(zs))
    });

    Ok((
        PyArray1::from_owned_array(py, ndarray::Array1::from(xs)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(ys)),
        zs,
    ))
}

/// Describe a CRS definition: (projection name, semi-major axis, semi-minor
/// axis, datum kind).
#[pyfunction]
pub fn crs_info(definition: &str) -> PyResult<(String, f64, f64, String)> {
    let crs = build_crs(definition).map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok((
        crs.proj_name.clone(),
        crs.params.a,
        crs.params.b,
        format!("{:?}", crs.datum.kind),
    ))
}
