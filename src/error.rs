use thiserror::Error;

/// Failures raised by a projection family, at construction or per point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Invalid projection configuration: {0}")]
    Configuration(String),

    #[error("{routine} did not converge after {iterations} iterations")]
    Convergence {
        routine: &'static str,
        iterations: usize,
    },

    #[error("Coordinate outside projection domain: {0}")]
    Domain(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatumError {
    #[error("Grid shift datum transforms are not supported: {0}")]
    GridShiftUnsupported(String),

    #[error("Geodetic coordinate out of range: {0}")]
    Domain(String),

    #[error("Geocentric to geodetic conversion did not converge after {iterations} iterations")]
    Convergence { iterations: usize },
}

/// Failures while building a [`crate::crs::Crs`] from a definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrsError {
    #[error("Unable to parse CRS definition: {0}")]
    Parse(String),

    #[error("Invalid CRS configuration: {0}")]
    Configuration(String),

    #[error("Unknown projection: {0}")]
    UnknownProjection(String),

    #[error("Unknown CRS code: {0}")]
    UnknownCode(String),

    #[error("Projection setup failed: {0}")]
    Projection(#[from] ProjError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("CRS is not ready for transformation: {0}")]
    NotReady(String),

    #[error("Projection error: {0}")]
    Projection(#[from] ProjError),

    #[error("Datum error: {0}")]
    Datum(#[from] DatumError),
}
