//! On-demand HGT tile set.

use crate::{CotasError, ElevationSource};
use dashmap::DashMap;
use dem::{hgt, DemError, Raster, C};
use geo::geometry::Coord;
use log::{debug, warn};
use std::{
    ffi::OsStr,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

/// A directory of one-degree HGT tiles, read as they are needed.
pub struct TileSet {
    /// Directory containing HGT tile files.
    tile_dir: PathBuf,

    /// How to load tiles (in-memory or mapped).
    tile_mode: TileMode,

    /// Samples per tile side, taken from the first tile found.
    samples_per_side: usize,

    /// Pixel size of the tiles, in degrees.
    pixel_size: (C, C),

    /// Tiles which have been loaded on demand.
    tiles: DashMap<Coord<i16>, Arc<Raster>>,
}

impl TileSet {
    pub fn new(tile_dir: PathBuf, tile_mode: TileMode) -> Result<Self, CotasError> {
        // Fail early if there is nothing to read, and learn the tile
        // resolution from the first tile found.
        let mut probe = None;
        for entry in std::fs::read_dir(&tile_dir)? {
            let path = entry?.path();
            let is_hgt = path
                .extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| ext.eq_ignore_ascii_case("hgt"));
            if is_hgt {
                probe = Some(Raster::memmap_hgt(&path)?);
                break;
            }
        }

        let probe = probe.ok_or_else(|| CotasError::Path(tile_dir.clone()))?;
        Ok(Self {
            tile_dir,
            tile_mode,
            samples_per_side: probe.grid().width(),
            pixel_size: probe.pixel_size(),
            tiles: DashMap::new(),
        })
    }

    /// Returns the tile containing `coord`.
    ///
    /// Tiles missing from the directory are replaced by a tile where
    /// every sample is NoData.
    pub fn get(&self, coord: Coord<C>) -> Result<Arc<Raster>, CotasError> {
        let sw_corner = sw_corner(coord);
        self.tiles
            .entry(sw_corner)
            .or_try_insert_with(|| match self.load_tile(sw_corner) {
                Ok(tile) => Ok(Arc::new(tile)),
                Err(DemError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                    self.load_tombstone(sw_corner).map(Arc::new)
                }
                Err(e) => Err(e.into()),
            })
            .map(|r| r.clone())
    }

    /// Returns the number of tiles loaded so far, tombstones included.
    pub fn loaded(&self) -> usize {
        self.tiles.len()
    }
}

/// Private API.
impl TileSet {
    fn load_tile(&self, sw_corner: Coord<i16>) -> Result<Raster, DemError> {
        let tile_path = {
            let file_name = hgt::file_name(sw_corner);
            let mut tile_path: PathBuf = [&self.tile_dir, Path::new(&file_name)].iter().collect();
            if !tile_path.exists() {
                let file_name = file_name.to_lowercase();
                tile_path = [&self.tile_dir, Path::new(&file_name)].iter().collect();
            }
            tile_path
        };
        debug!("loading {tile_path:?}");
        match self.tile_mode {
            TileMode::InMem => Raster::load_hgt(tile_path),
            TileMode::MemMap => Raster::memmap_hgt(tile_path),
        }
    }

    fn load_tombstone(&self, sw_corner: Coord<i16>) -> Result<Raster, CotasError> {
        debug!("loading tombstone in lieu of missing tile for {sw_corner:?}");
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let resolution = (self.pixel_size.0 * 3600.0).round() as u8;
        let grid = hgt::tile_grid(sw_corner, resolution, self.samples_per_side)?;
        Ok(Raster::tombstone(grid))
    }
}

impl ElevationSource for TileSet {
    fn elevation(&self, coord: Coord<C>) -> Option<C> {
        match self.get(coord) {
            Ok(tile) => tile.get(coord),
            Err(e) => {
                warn!("no tile for {coord:?}: {e}");
                None
            }
        }
    }

    fn pixel_size(&self) -> Option<(C, C)> {
        Some(self.pixel_size)
    }
}

/// How to handle tile.
///
/// The trade off between loading tile data into memory versus memory
/// mapping is not obvious, and you should measure both before
/// deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
    /// Parse tile and load into memory.
    InMem,

    /// Memory map file contents.
    MemMap,
}

/// Returns the southwest corner as integers for coord.
fn sw_corner(Coord { x, y }: Coord<C>) -> Coord<i16> {
    #[allow(clippy::cast_possible_truncation)]
    Coord {
        x: (x.floor() as i16),
        y: (y.floor() as i16),
    }
}

#[cfg(test)]
mod tests {
    use super::{sw_corner, TileMode, TileSet};
    use crate::{CotasError, ElevationSource};
    use byteorder::{BigEndian as BE, WriteBytesExt};
    use dem::hgt;
    use geo::Coord;
    use std::{
        fs::File,
        io::{BufWriter, Write},
    };

    /// Writes a 3 arcsecond tile where each sample holds its row index.
    fn write_hgt(dir: &tempfile::TempDir, name: &str) {
        let mut out = BufWriter::new(File::create(dir.path().join(name)).unwrap());
        for row in 0..1201_i16 {
            for _ in 0..1201 {
                out.write_i16::<BE>(row).unwrap();
            }
        }
        out.flush().unwrap();
    }

    #[test]
    fn test_sw_corner() {
        assert_eq!(sw_corner(Coord { x: -71.3, y: 44.2 }), Coord { x: -72, y: 44 });
        assert_eq!(
            hgt::file_name(sw_corner(Coord {
                x: 0.0 - f64::EPSILON,
                y: 0.0 - f64::EPSILON,
            })),
            "S01W001.hgt"
        );
    }

    #[test]
    fn test_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            TileSet::new(dir.path().to_owned(), TileMode::MemMap),
            Err(CotasError::Path(_))
        ));
    }

    #[test]
    fn test_get() {
        let dir = tempfile::tempdir().unwrap();
        write_hgt(&dir, "N44W072.hgt");
        for mode in [TileMode::InMem, TileMode::MemMap] {
            let tiles = TileSet::new(dir.path().to_owned(), mode).unwrap();
            assert_eq!(tiles.elevation(Coord { x: -71.5, y: 44.9999 }), Some(0.0));
            assert_eq!(tiles.elevation(Coord { x: -71.5, y: 44.5 }), Some(600.0));
            assert_eq!(tiles.loaded(), 1);
            let (px, py) = tiles.pixel_size().unwrap();
            assert!((px - 3.0 / 3600.0).abs() < 1e-12);
            assert!((py - 3.0 / 3600.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_missing_tile_is_nodata() {
        let dir = tempfile::tempdir().unwrap();
        write_hgt(&dir, "N44W072.hgt");
        let tiles = TileSet::new(dir.path().to_owned(), TileMode::MemMap).unwrap();
        let south_pole = Coord { x: 0.5, y: -89.5 };
        assert_eq!(tiles.elevation(south_pole), None);
        // The tombstone stays cached.
        assert_eq!(tiles.loaded(), 1);
        assert!(tiles.get(south_pole).is_ok());
        assert_eq!(tiles.loaded(), 1);
    }

    #[test]
    fn test_lowercase_file_name() {
        let dir = tempfile::tempdir().unwrap();
        write_hgt(&dir, "n44w072.hgt");
        let tiles = TileSet::new(dir.path().to_owned(), TileMode::MemMap).unwrap();
        assert_eq!(tiles.elevation(Coord { x: -71.5, y: 44.5 }), Some(600.0));
    }
}
