//! Pixel grid geometry.
//!
//! A grid is a rectangular extent divided into `width` columns and
//! `height` rows. Row 0 is the _top_ (northmost) row, matching the
//! order samples are stored in both HGT and ESRI ASCII files.

use crate::{DemError, C};
use geo::{
    geometry::{Coord, Polygon},
    polygon,
};

/// Axis aligned bounding rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: C,
    pub ymin: C,
    pub xmax: C,
    pub ymax: C,
}

impl Extent {
    pub fn new(xmin: C, ymin: C, xmax: C, ymax: C) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    pub fn width(&self) -> C {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> C {
        self.ymax - self.ymin
    }

    /// Returns true if `coord` lies inside or on the border of this
    /// extent.
    pub fn contains(&self, coord: Coord<C>) -> bool {
        self.xmin <= coord.x && coord.x <= self.xmax && self.ymin <= coord.y && coord.y <= self.ymax
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelGrid {
    extent: Extent,
    width: usize,
    height: usize,
}

impl PixelGrid {
    pub fn new(extent: Extent, width: usize, height: usize) -> Result<Self, DemError> {
        if width == 0 || height == 0 {
            return Err(DemError::Grid("width and height must be non-zero"));
        }
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        if !(extent.width() > 0.0 && extent.height() > 0.0) {
            return Err(DemError::Grid("extent must have a positive area"));
        }
        Ok(Self {
            extent,
            width,
            height,
        })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of pixels in this grid.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Returns (pixel width, pixel height) in world units.
    #[allow(clippy::cast_precision_loss)]
    pub fn pixel_size(&self) -> (C, C) {
        (
            self.extent.width() / self.width as C,
            self.extent.height() / self.height as C,
        )
    }

    /// Returns the world coordinate of the center of pixel (`row`,
    /// `col`).
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self, row: usize, col: usize) -> Coord<C> {
        let (px, py) = self.pixel_size();
        Coord {
            x: self.extent.xmin + col as C * px + px / 2.0,
            y: self.extent.ymax - row as C * py - py / 2.0,
        }
    }

    /// Returns a row-major iterator over `(row, col, center)` for
    /// every pixel.
    pub fn centers(&self) -> impl Iterator<Item = (usize, usize, Coord<C>)> + '_ {
        (0..self.height)
            .flat_map(move |row| (0..self.width).map(move |col| (row, col, self.center(row, col))))
    }

    /// Returns the closed square outline of pixel (`row`, `col`).
    pub fn cell_polygon(&self, row: usize, col: usize) -> Polygon<C> {
        let (px, py) = self.pixel_size();
        let center = self.center(row, col);
        let n = center.y + py / 2.0;
        let e = center.x + px / 2.0;
        let s = center.y - py / 2.0;
        let w = center.x - px / 2.0;
        polygon![
            (x: w, y: s),
            (x: e, y: s),
            (x: e, y: n),
            (x: w, y: n),
            (x: w, y: s),
        ]
    }

    /// Returns the (row, col) of the pixel containing `coord`, if any.
    ///
    /// Points on the east and south borders belong to the last
    /// column and row respectively.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn locate(&self, coord: Coord<C>) -> Option<(usize, usize)> {
        if !self.extent.contains(coord) {
            return None;
        }
        let (px, py) = self.pixel_size();
        let col = ((coord.x - self.extent.xmin) / px).floor() as usize;
        let row = ((self.extent.ymax - coord.y) / py).floor() as usize;
        Some((row.min(self.height - 1), col.min(self.width - 1)))
    }

    pub(crate) fn linear_index(&self, (row, col): (usize, usize)) -> usize {
        row * self.width + col
    }

    pub(crate) fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }
}
