use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid HGT name {0}")]
    HgtName(PathBuf),

    #[error("invalid HGT file len {0} for {1}")]
    HgtLen(u64, PathBuf),

    #[error("invalid ASCII grid header, {0}")]
    AscHeader(String),

    #[error("invalid ASCII grid sample {0:?}")]
    AscSample(String),

    #[error("expected {expected} samples, got {got}")]
    Dimensions { expected: usize, got: usize },

    #[error("invalid pixel grid, {0}")]
    Grid(&'static str),

    #[error("unsupported raster format {0}")]
    Format(PathBuf),
}
