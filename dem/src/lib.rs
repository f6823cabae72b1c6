//! Raster digital terrain models (DTM).
//!
//! A [Raster] is a [PixelGrid] plus one elevation sample per pixel.
//! Samples equal to the raster's NoData value are never returned as
//! elevations: every lookup yields `None` for them instead.
//!
//! Supported sources:
//!
//! 1. SRTM/NASADEM `.hgt` tiles (big-endian `i16`, voids are `-32768`),
//!    either read into memory or memory mapped.
//! 1. ESRI ASCII grids (`.asc`).
//! 1. Samples already in memory ([Raster::from_samples]).

mod asc;
mod error;
mod grid;
pub mod hgt;

pub use crate::{
    error::DemError,
    grid::{Extent, PixelGrid},
};
use byteorder::{BigEndian as BE, ReadBytesExt};
use geo::geometry::{Coord, Polygon};
use log::debug;
use memmap2::Mmap;
use std::{
    ffi::OsStr,
    fs::File,
    io::BufReader,
    mem::size_of,
    path::Path,
    sync::OnceLock,
};

/// Base floating point type used for all coordinates and calculations.
pub type C = f64;

pub struct Raster {
    grid: PixelGrid,

    /// Samples equal to this value are treated as missing.
    nodata: Option<f32>,

    /// Lowest and highest valid samples, computed on first use.
    range: OnceLock<Option<ElevationRange>>,

    /// Elevation samples, row-major, top row first.
    samples: SampleStore,
}

enum SampleStore {
    /// Stands in for data which does not exist; every sample is
    /// NoData.
    Tombstone,
    InMem(Box<[f32]>),
    /// Raw big-endian `i16` samples.
    MemMap(Mmap),
}

impl SampleStore {
    fn get_unchecked(&self, index: usize) -> Option<f32> {
        match self {
            Self::Tombstone => None,
            Self::InMem(samples) => Some(samples[index]),
            Self::MemMap(raw) => {
                let start = index * size_of::<i16>();
                let bytes = &mut &raw.as_ref()[start..start + size_of::<i16>()];
                bytes.read_i16::<BE>().ok().map(f32::from)
            }
        }
    }
}

impl Raster {
    /// Returns a Raster over `grid` using `samples` (row-major, top
    /// row first).
    pub fn from_samples(
        grid: PixelGrid,
        samples: Vec<f32>,
        nodata: Option<f32>,
    ) -> Result<Self, DemError> {
        if samples.len() != grid.len() {
            return Err(DemError::Dimensions {
                expected: grid.len(),
                got: samples.len(),
            });
        }
        Ok(Self {
            grid,
            nodata,
            range: OnceLock::new(),
            samples: SampleStore::InMem(samples.into_boxed_slice()),
        })
    }

    /// Returns a Raster where every sample is NoData.
    pub fn tombstone(grid: PixelGrid) -> Self {
        Self {
            grid,
            nodata: None,
            range: OnceLock::new(),
            samples: SampleStore::Tombstone,
        }
    }

    /// Opens a raster, choosing the reader from the file extension.
    ///
    /// `.hgt` files are memory mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("hgt") => Self::memmap_hgt(path),
            Some("asc") => Self::load_asc(path),
            _ => Err(DemError::Format(path.as_ref().to_owned())),
        }
    }

    /// Returns a Raster read into memory from the HGT file at `path`.
    pub fn load_hgt<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let grid = hgt::grid(&path)?;
        let mut file = BufReader::new(File::open(&path)?);
        let mut samples = Vec::with_capacity(grid.len());
        for _ in 0..grid.len() {
            samples.push(f32::from(file.read_i16::<BE>()?));
        }
        debug!("loaded {:?}, {} samples", path.as_ref(), samples.len());
        Self::from_samples(grid, samples, Some(f32::from(hgt::VOID)))
    }

    /// Returns a Raster using the memory-mapped HGT file as storage.
    pub fn memmap_hgt<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let grid = hgt::grid(&path)?;
        let samples = {
            let file = File::open(&path)?;
            let mmap = unsafe { Mmap::map(&file)? };
            SampleStore::MemMap(mmap)
        };
        debug!("mapped {:?}", path.as_ref());
        Ok(Self {
            grid,
            nodata: Some(f32::from(hgt::VOID)),
            range: OnceLock::new(),
            samples,
        })
    }

    /// Returns a Raster read from the ESRI ASCII grid at `path`.
    pub fn load_asc<P: AsRef<Path>>(path: P) -> Result<Self, DemError> {
        let text = std::fs::read_to_string(&path)?;
        let (grid, samples, nodata) = asc::parse(&text)?;
        debug!(
            "loaded {:?}, {}x{} samples",
            path.as_ref(),
            grid.width(),
            grid.height()
        );
        Self::from_samples(grid, samples, nodata)
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// Returns (pixel width, pixel height) in world units.
    pub fn pixel_size(&self) -> (C, C) {
        self.grid.pixel_size()
    }

    pub fn nodata(&self) -> Option<f32> {
        self.nodata
    }

    /// Returns the number of samples in this raster.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Returns the elevation of pixel (`row`, `col`), or `None` if
    /// the pixel is outside the grid or holds NoData.
    pub fn get_rc(&self, row: usize, col: usize) -> Option<C> {
        if row < self.grid.height() && col < self.grid.width() {
            self.valid(self.grid.linear_index((row, col)))
        } else {
            None
        }
    }

    /// Returns the elevation of the pixel containing `coord`.
    pub fn get(&self, coord: Coord<C>) -> Option<C> {
        let (row, col) = self.grid.locate(coord)?;
        self.get_rc(row, col)
    }

    /// Returns the lowest and highest valid samples, or `None` if
    /// every sample is NoData.
    pub fn range(&self) -> Option<ElevationRange> {
        *self
            .range
            .get_or_init(|| ElevationRange::from_values(self.iter().map(|s| s.elevation())))
    }

    /// Returns a row-major iterator over this raster's pixels.
    pub fn iter(&self) -> impl Iterator<Item = Sample<'_>> + '_ {
        (0..self.grid.len()).map(|index| Sample {
            raster: self,
            index,
        })
    }
}

/// Private API
impl Raster {
    fn valid(&self, index: usize) -> Option<C> {
        let sample = self.samples.get_unchecked(index)?;
        match self.nodata {
            Some(nodata) if sample == nodata => None,
            _ if sample.is_nan() => None,
            _ => Some(C::from(sample)),
        }
    }
}

/// One raster pixel.
pub struct Sample<'a> {
    /// The parent [Raster] this pixel belongs to.
    raster: &'a Raster,
    /// Index into parent's elevation data.
    index: usize,
}

impl<'a> Sample<'a> {
    /// Returns (row, col).
    pub fn row_col(&self) -> (usize, usize) {
        self.raster.grid.row_col(self.index)
    }

    /// Returns this pixel's elevation, or `None` for NoData.
    pub fn elevation(&self) -> Option<C> {
        self.raster.valid(self.index)
    }

    pub fn center(&self) -> Coord<C> {
        let (row, col) = self.row_col();
        self.raster.grid.center(row, col)
    }

    pub fn polygon(&self) -> Polygon<C> {
        let (row, col) = self.row_col();
        self.raster.grid.cell_polygon(row, col)
    }
}

/// Lowest and highest elevation of a set of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRange {
    pub min: C,
    pub max: C,
}

impl ElevationRange {
    /// Returns the range of the valid values, ignoring `None` and NaN.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<C>>,
    {
        values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .fold(None, |range, v| match range {
                None => Some(Self { min: v, max: v }),
                Some(Self { min, max }) => Some(Self {
                    min: min.min(v),
                    max: max.max(v),
                }),
            })
    }

    /// Returns where `value` falls in this range, from 0 to 1.
    pub fn normalize(&self, value: C) -> C {
        let span = self.max - self.min;
        if span > 0.0 {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
