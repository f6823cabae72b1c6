//! Raster to vector sampling.
//!
//! Every pixel center of a [PixelGrid] is sampled through an
//! [ElevationSource]. Pixels without a value are left out of the
//! output entirely.

use crate::ElevationSource;
use dem::{ElevationRange, PixelGrid, C};
use geo::geometry::{Coord, Polygon};
use log::debug;
use rayon::prelude::*;

/// Elevation sampled at a pixel center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CotaPoint {
    /// Sequential id over the extracted points.
    pub id: usize,
    pub row: usize,
    pub col: usize,
    /// Pixel center.
    pub coord: Coord<C>,
    pub z: C,
}

/// A [CotaPoint] with its pixel outline.
#[derive(Debug, Clone, PartialEq)]
pub struct CotaCell {
    pub point: CotaPoint,
    pub polygon: Polygon<C>,
}

/// Samples every pixel center of `grid`.
pub fn points<S>(grid: &PixelGrid, source: &S) -> Vec<CotaPoint>
where
    S: ElevationSource + ?Sized,
{
    points_with_progress(grid, source, |_| ())
}

/// Like [points], calling `progress` with the number of pixels in
/// each row once that row has been sampled.
///
/// Rows are sampled in parallel; the output is always row-major.
pub fn points_with_progress<S, F>(grid: &PixelGrid, source: &S, progress: F) -> Vec<CotaPoint>
where
    S: ElevationSource + ?Sized,
    F: Fn(usize) + Sync,
{
    let now = std::time::Instant::now();
    let rows: Vec<Vec<(usize, usize, Coord<C>, C)>> = (0..grid.height())
        .into_par_iter()
        .map(|row| {
            let samples = (0..grid.width())
                .filter_map(|col| {
                    let center = grid.center(row, col);
                    source
                        .elevation(center)
                        .filter(|z| !z.is_nan())
                        .map(|z| (row, col, center, z))
                })
                .collect();
            progress(grid.width());
            samples
        })
        .collect();

    let points: Vec<CotaPoint> = rows
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(id, (row, col, coord, z))| CotaPoint {
            id,
            row,
            col,
            coord,
            z,
        })
        .collect();

    debug!(
        "extract; pixels: {}, kept: {}, exec: {:?}",
        grid.len(),
        points.len(),
        now.elapsed()
    );
    points
}

/// Samples every pixel of `grid`, keeping pixel outlines.
pub fn cells<S>(grid: &PixelGrid, source: &S) -> Vec<CotaCell>
where
    S: ElevationSource + ?Sized,
{
    points(grid, source)
        .into_iter()
        .map(|point| CotaCell {
            polygon: grid.cell_polygon(point.row, point.col),
            point,
        })
        .collect()
}

/// Returns the elevation range of `points`.
pub fn range(points: &[CotaPoint]) -> Option<ElevationRange> {
    ElevationRange::from_values(points.iter().map(|p| Some(p.z)))
}
