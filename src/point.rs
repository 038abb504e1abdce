/// A coordinate flowing through the transform pipeline.
///
/// `x`/`y` are longitude/latitude (degrees, radians inside the pipeline) or
/// easting/northing. `z` is an optional height; when absent it reads as 0.
/// A datum shift between different ellipsoids fills it in with the height
/// above the destination ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Height, defaulting to 0 for 2-D points.
    pub fn height(&self) -> f64 {
        self.z.unwrap_or(0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.map_or(true, f64::is_finite)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new_3d(x, y, z)
    }
}
