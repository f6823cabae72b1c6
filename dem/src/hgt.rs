//! SRTM/NASADEM height (`.hgt`) files.
//!
//! # References
//!
//! 1. [Archive Team](http://fileformats.archiveteam.org/index.php?title=HGT&oldid=17250)
//! 1. [SRTM Collection User Guide](https://lpdaac.usgs.gov/documents/179/SRTM_User_Guide_V3.pdf)

use crate::{DemError, Extent, PixelGrid, C};
use geo::geometry::Coord;
use std::{mem::size_of, path::Path};

const ARCSEC_PER_DEG: C = 3600.0;

/// Sample value marking a void in SRTM data.
pub const VOID: i16 = i16::MIN;

/// Returns the pixel grid described by an HGT file's name and size.
///
/// HGT samples are centered on whole arcsecond lines, so the grid's
/// extent reaches half a sample past the tile's integer degree
/// borders.
pub(crate) fn grid<P: AsRef<Path>>(path: P) -> Result<PixelGrid, DemError> {
    let (resolution, samples_per_side) = extract_resolution(&path)?;
    let sw_corner = parse_sw_corner(&path)?;
    tile_grid(sw_corner, resolution, samples_per_side)
}

/// Returns the pixel grid for the tile whose southwest sample is
/// centered on `sw_corner`.
pub fn tile_grid(
    sw_corner: Coord<i16>,
    resolution: u8,
    samples_per_side: usize,
) -> Result<PixelGrid, DemError> {
    let half_sample = C::from(resolution) / ARCSEC_PER_DEG / 2.0;
    let (x, y) = (C::from(sw_corner.x), C::from(sw_corner.y));
    let extent = Extent::new(
        x - half_sample,
        y - half_sample,
        x + 1.0 + half_sample,
        y + 1.0 + half_sample,
    );
    PixelGrid::new(extent, samples_per_side, samples_per_side)
}

/// Returns (arcseconds per sample, samples per side).
pub(crate) fn extract_resolution<P: AsRef<Path>>(path: P) -> Result<(u8, usize), DemError> {
    const RES_1_ARCSECONDS_FILE_LEN: u64 = 3601 * 3601 * size_of::<u16>() as u64;
    const RES_3_ARCSECONDS_FILE_LEN: u64 = 1201 * 1201 * size_of::<u16>() as u64;
    match path.as_ref().metadata().map(|m| m.len())? {
        RES_1_ARCSECONDS_FILE_LEN => Ok((1, 3601)),
        RES_3_ARCSECONDS_FILE_LEN => Ok((3, 1201)),
        invalid_len => Err(DemError::HgtLen(invalid_len, path.as_ref().to_owned())),
    }
}

/// Parses the southwest corner out of a name like `N44W072.hgt`.
pub fn parse_sw_corner<P: AsRef<Path>>(path: P) -> Result<Coord<i16>, DemError> {
    let mk_err = || DemError::HgtName(path.as_ref().to_owned());
    let name = path
        .as_ref()
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .ok_or_else(mk_err)?;
    if name.len() != 7 || !name.is_ascii() {
        return Err(mk_err());
    }
    let lat_sign = match &name[0..1] {
        "N" | "n" => 1,
        "S" | "s" => -1,
        _ => return Err(mk_err()),
    };
    let lat = lat_sign * name[1..3].parse::<i16>().map_err(|_| mk_err())?;
    let lon_sign = match &name[3..4] {
        "E" | "e" => 1,
        "W" | "w" => -1,
        _ => return Err(mk_err()),
    };
    let lon = lon_sign * name[4..7].parse::<i16>().map_err(|_| mk_err())?;
    Ok(Coord { x: lon, y: lat })
}

/// Returns the expected file name for the tile with the given
/// southwest corner.
pub fn file_name(Coord { x, y }: Coord<i16>) -> String {
    let n_s = if y.is_negative() { 'S' } else { 'N' };
    let e_w = if x.is_negative() { 'W' } else { 'E' };
    format!("{n_s}{:02}{e_w}{:03}.hgt", y.abs(), x.abs())
}

#[cfg(test)]
mod tests {
    use super::{file_name, parse_sw_corner, tile_grid, Coord};
    use approx::assert_relative_eq;
    use std::path::Path;

    #[test]
    fn test_parse_hgt_name() {
        assert_eq!(
            parse_sw_corner(Path::new("data/N44W072.hgt")).unwrap(),
            Coord { x: -72, y: 44 }
        );
        assert_eq!(
            parse_sw_corner(Path::new("s23e017.hgt")).unwrap(),
            Coord { x: 17, y: -23 }
        );
        assert!(parse_sw_corner(Path::new("X44W072.hgt")).is_err());
        assert!(parse_sw_corner(Path::new("N44W72.hgt")).is_err());
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Coord { x: -72, y: 44 }), "N44W072.hgt");
        assert_eq!(file_name(Coord { x: 0, y: 0 }), "N00E000.hgt");
        assert_eq!(file_name(Coord { x: 17, y: -23 }), "S23E017.hgt");
    }

    #[test]
    fn test_tile_grid_centers_on_degree_lines() {
        let grid = tile_grid(Coord { x: -72, y: 44 }, 3, 1201).unwrap();
        let sw = grid.center(1200, 0);
        let ne = grid.center(0, 1200);
        assert_relative_eq!(sw.x, -72.0, epsilon = 1e-9);
        assert_relative_eq!(sw.y, 44.0, epsilon = 1e-9);
        assert_relative_eq!(ne.x, -71.0, epsilon = 1e-9);
        assert_relative_eq!(ne.y, 45.0, epsilon = 1e-9);
    }
}
