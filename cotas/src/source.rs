use dem::{Raster, C};
use geo::geometry::Coord;

/// Something which can report the terrain elevation at a location.
///
/// `None` means NoData: the location is outside the source or the
/// source holds no valid sample there.
pub trait ElevationSource: Sync {
    fn elevation(&self, coord: Coord<C>) -> Option<C>;

    /// Returns (pixel width, pixel height) for gridded sources.
    fn pixel_size(&self) -> Option<(C, C)> {
        None
    }
}

impl ElevationSource for Raster {
    fn elevation(&self, coord: Coord<C>) -> Option<C> {
        self.get(coord)
    }

    fn pixel_size(&self) -> Option<(C, C)> {
        Some(Raster::pixel_size(self))
    }
}

impl<F> ElevationSource for F
where
    F: Fn(Coord<C>) -> Option<C> + Sync,
{
    fn elevation(&self, coord: Coord<C>) -> Option<C> {
        self(coord)
    }
}
