use dem::DemError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CotasError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("need at least {needed} points, got {got}")]
    InsufficientPoints { needed: usize, got: usize },

    #[error("empty geometry")]
    EmptyGeometry,

    #[error("cannot interpolate, first and last points coincide")]
    CannotInterpolate,

    #[error("no elevation at ({x}, {y})")]
    NoDataAtAnchor { x: f64, y: f64 },

    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("invalid sample spacing {0}")]
    InvalidSpacing(f64),

    #[error("curves share no common x range")]
    DisjointCurves,

    #[error("cancelled")]
    Cancelled,

    #[error("profile worker exited without a result")]
    Worker,

    #[error("no height files in {0}")]
    Path(PathBuf),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Dem(#[from] DemError),
}
