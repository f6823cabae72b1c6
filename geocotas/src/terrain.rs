use crate::options::TerrainArgs;
use anyhow::{anyhow, Result};
use cotas::{dem::Raster, ElevationSource, TileMode, TileSet, C};
use geo::geometry::Coord;
use log::debug;

/// A single raster or a directory of tiles.
pub enum Terrain {
    Raster(Raster),
    Tiles(TileSet),
}

impl Terrain {
    pub fn open(args: &TerrainArgs) -> Result<Self> {
        match (&args.raster, &args.tile_dir) {
            (Some(path), _) => {
                debug!("terrain from raster {path:?}");
                Ok(Self::Raster(Raster::open(path)?))
            }
            (None, Some(dir)) => {
                let mode = if args.in_mem {
                    TileMode::InMem
                } else {
                    TileMode::MemMap
                };
                debug!("terrain from tiles in {dir:?}, {mode:?}");
                Ok(Self::Tiles(TileSet::new(dir.clone(), mode)?))
            }
            (None, None) => Err(anyhow!("either --raster or --tile-dir is required")),
        }
    }

    /// Like [Terrain::open], but `None` when no terrain was given.
    pub fn open_optional(args: &TerrainArgs) -> Result<Option<Self>> {
        if args.raster.is_none() && args.tile_dir.is_none() {
            Ok(None)
        } else {
            Self::open(args).map(Some)
        }
    }

    /// Returns `spacing`, or the terrain's pixel size when absent.
    pub fn spacing(&self, spacing: Option<C>) -> Result<(C, C)> {
        spacing
            .map(|s| (s, s))
            .or_else(|| self.pixel_size())
            .ok_or_else(|| anyhow!("terrain has no pixel size, pass --spacing"))
    }
}

impl ElevationSource for Terrain {
    fn elevation(&self, coord: Coord<C>) -> Option<C> {
        match self {
            Self::Raster(raster) => raster.elevation(coord),
            Self::Tiles(tiles) => tiles.elevation(coord),
        }
    }

    fn pixel_size(&self) -> Option<(C, C)> {
        match self {
            Self::Raster(raster) => ElevationSource::pixel_size(raster),
            Self::Tiles(tiles) => tiles.pixel_size(),
        }
    }
}
