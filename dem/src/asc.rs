//! ESRI ASCII grid (`.asc`) files.
//!
//! ```text
//! ncols         4
//! nrows         3
//! xllcorner     100.0
//! yllcorner     200.0
//! cellsize      1.0
//! NODATA_value  -9999
//! 10 11 12 13
//! ...
//! ```
//!
//! `xllcenter`/`yllcenter` may replace the corner keys, and `dx`/`dy`
//! may replace `cellsize`.

use crate::{DemError, Extent, PixelGrid, C};

#[derive(Debug, Default)]
struct Header {
    ncols: Option<usize>,
    nrows: Option<usize>,
    xll: Option<(C, bool)>,
    yll: Option<(C, bool)>,
    cellsize: Option<C>,
    dx: Option<C>,
    dy: Option<C>,
    nodata: Option<f32>,
}

/// Parses the contents of an ESRI ASCII grid into (grid, row-major
/// samples, NoData value).
pub(crate) fn parse(text: &str) -> Result<(PixelGrid, Vec<f32>, Option<f32>), DemError> {
    let mut header = Header::default();
    let mut tokens = text.split_whitespace().peekable();

    while let Some(key) = tokens.peek().copied() {
        if key.parse::<f32>().is_ok() {
            break;
        }
        tokens.next();
        let value = tokens
            .next()
            .ok_or_else(|| DemError::AscHeader(format!("missing value for {key}")))?;
        let bad = || DemError::AscHeader(format!("{key} {value}"));
        match key.to_ascii_lowercase().as_str() {
            "ncols" => header.ncols = Some(value.parse().map_err(|_| bad())?),
            "nrows" => header.nrows = Some(value.parse().map_err(|_| bad())?),
            "xllcorner" => header.xll = Some((value.parse().map_err(|_| bad())?, false)),
            "xllcenter" => header.xll = Some((value.parse().map_err(|_| bad())?, true)),
            "yllcorner" => header.yll = Some((value.parse().map_err(|_| bad())?, false)),
            "yllcenter" => header.yll = Some((value.parse().map_err(|_| bad())?, true)),
            "cellsize" => header.cellsize = Some(value.parse().map_err(|_| bad())?),
            "dx" => header.dx = Some(value.parse().map_err(|_| bad())?),
            "dy" => header.dy = Some(value.parse().map_err(|_| bad())?),
            "nodata_value" => header.nodata = Some(value.parse().map_err(|_| bad())?),
            _ => return Err(DemError::AscHeader(format!("unknown key {key}"))),
        }
    }

    let missing = |key: &str| DemError::AscHeader(format!("missing {key}"));
    let ncols = header.ncols.ok_or_else(|| missing("ncols"))?;
    let nrows = header.nrows.ok_or_else(|| missing("nrows"))?;
    let (dx, dy) = match (header.cellsize, header.dx, header.dy) {
        (Some(size), _, _) => (size, size),
        (None, Some(dx), Some(dy)) => (dx, dy),
        _ => return Err(missing("cellsize")),
    };
    let (xll, x_is_center) = header.xll.ok_or_else(|| missing("xllcorner"))?;
    let (yll, y_is_center) = header.yll.ok_or_else(|| missing("yllcorner"))?;
    let xmin = if x_is_center { xll - dx / 2.0 } else { xll };
    let ymin = if y_is_center { yll - dy / 2.0 } else { yll };

    #[allow(clippy::cast_precision_loss)]
    let extent = Extent::new(xmin, ymin, xmin + dx * ncols as C, ymin + dy * nrows as C);
    let grid = PixelGrid::new(extent, ncols, nrows)?;

    let samples = tokens
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|_| DemError::AscSample(token.to_owned()))
        })
        .collect::<Result<Vec<f32>, DemError>>()?;

    Ok((grid, samples, header.nodata))
}
