//! Support points: a stake line densified at raster resolution.
//!
//! The terrain profile drawn under a structure is built from points
//! spaced one pixel apart along the stake line, sampled from the DTM.
//! The profile is extended a short distance past the first and last
//! stakes so the cut/fill faces have terrain to meet.
//!
//! Missing terrain is handled differently in the two parts:
//!
//! - the extensions stop at the first pixel with no value;
//! - along the stake line a missing value repeats the previous one,
//!   and a missing value at the very first stake is an error.

use crate::{
    math::{distance, TOLERANCE},
    CotasError, ElevationSource,
};
use dem::C;
use geo::geometry::Coord;
use itertools::Itertools;
use log::{debug, warn};

/// Longest extension past an end stake.
const MAX_EXTENSION: C = 2.0;

/// A stake to densify.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stake {
    pub coord: Coord<C>,

    /// Design elevation above terrain at this stake.
    pub altura: C,
}

/// Where a support point came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Extension before the first stake.
    Before,
    /// Segment starting at the stake with this index.
    Stake(usize),
    /// Extension after the last stake.
    After,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportPoint {
    /// Monotonically increasing, starting from 0.
    pub id: usize,
    pub origin: Origin,

    /// Distance along the profile, zero at the first stake and
    /// negative before it.
    pub distance: C,
    pub coord: Coord<C>,

    /// Terrain elevation.
    pub z: C,
}

/// Returns how far the profile extends past a stake with `altura`.
fn extension(altura: C) -> C {
    (altura.abs() + 2.0).min(MAX_EXTENSION)
}

/// Returns the unit vector from `from` towards `to`, or zero if they
/// coincide.
fn direction(from: Coord<C>, to: Coord<C>) -> Coord<C> {
    let len = distance(from, to);
    if len > TOLERANCE {
        (to - from) / len
    } else {
        Coord { x: 0.0, y: 0.0 }
    }
}

/// Returns how many whole `spacing` steps fit in `len`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn steps(len: C, spacing: C) -> usize {
    (len / spacing + TOLERANCE).floor() as usize
}

/// Walks from `from` along `dir`, one `spacing` at a time, for up to
/// `len`. Stops at the first location without terrain.
///
/// Returns (step, location, elevation) in walking order.
fn walk<S>(
    from: Coord<C>,
    dir: Coord<C>,
    len: C,
    spacing: C,
    source: &S,
) -> Vec<(usize, Coord<C>, C)>
where
    S: ElevationSource + ?Sized,
{
    if dir.x == 0.0 && dir.y == 0.0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for k in 1..=steps(len, spacing) {
        #[allow(clippy::cast_precision_loss)]
        let coord = from + dir * (k as C * spacing);
        match source.elevation(coord) {
            Some(z) => out.push((k, coord, z)),
            None => {
                debug!("extension stopped at {coord:?}, no terrain");
                break;
            }
        }
    }
    out
}

/// Densifies `stakes` at the finer of the two `pixel_size` axes.
pub fn resample<S>(
    stakes: &[Stake],
    (px, py): (C, C),
    source: &S,
) -> Result<Vec<SupportPoint>, CotasError>
where
    S: ElevationSource + ?Sized,
{
    let n = stakes.len();
    if n < 2 {
        return Err(CotasError::InsufficientPoints { needed: 2, got: n });
    }
    let (first, second) = (stakes[0], stakes[1]);
    let (penultimate, last) = (stakes[n - 2], stakes[n - 1]);

    let spacing = px.min(py);
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(CotasError::InvalidSpacing(spacing));
    }

    let mut support: Vec<SupportPoint> = Vec::new();
    let mut push = |origin: Origin, distance: C, coord: Coord<C>, z: C| {
        let id = support.len();
        support.push(SupportPoint {
            id,
            origin,
            distance,
            coord,
            z,
        });
    };

    // Leading extension, emitted farthest first.
    let leading = walk(
        first.coord,
        direction(second.coord, first.coord),
        extension(first.altura),
        spacing,
        source,
    );
    for (k, coord, z) in leading.into_iter().rev() {
        #[allow(clippy::cast_precision_loss)]
        push(Origin::Before, -(k as C) * spacing, coord, z);
    }

    // Stake line.
    let mut travelled: C = 0.0;
    let mut prev: Option<Coord<C>> = None;
    let mut last_valid: Option<C> = None;
    let mut filled = 0_usize;
    for (index, (a, b)) in stakes.iter().tuple_windows().enumerate() {
        let dir = direction(a.coord, b.coord);
        let count = steps(distance(a.coord, b.coord), spacing) + 1;
        for j in 0..count {
            #[allow(clippy::cast_precision_loss)]
            let coord = a.coord + dir * (j as C * spacing);
            if let Some(prev) = prev {
                travelled += distance(prev, coord);
            }
            prev = Some(coord);
            let z = match (source.elevation(coord), last_valid) {
                (Some(z), _) => z,
                (None, Some(z)) => {
                    filled += 1;
                    z
                }
                (None, None) => {
                    return Err(CotasError::NoDataAtAnchor {
                        x: coord.x,
                        y: coord.y,
                    })
                }
            };
            last_valid = Some(z);
            push(Origin::Stake(index), travelled, coord, z);
        }
    }
    if filled > 0 {
        warn!("{filled} support points without terrain, repeated previous elevation");
    }

    // Trailing extension.
    let trailing = walk(
        last.coord,
        direction(penultimate.coord, last.coord),
        extension(last.altura),
        spacing,
        source,
    );
    for (_, coord, z) in trailing {
        if let Some(prev) = prev {
            travelled += distance(prev, coord);
        }
        prev = Some(coord);
        push(Origin::After, travelled, coord, z);
    }

    debug!(
        "support; stakes: {}, spacing: {spacing}, points: {}",
        stakes.len(),
        support.len()
    );
    Ok(support)
}

#[cfg(test)]
mod tests {
    use super::{extension, resample, Origin, Stake};
    use crate::CotasError;
    use approx::assert_relative_eq;
    use geo::{coord, Coord};

    fn stake(x: f64, y: f64, altura: f64) -> Stake {
        Stake {
            coord: coord!(x: x, y: y),
            altura,
        }
    }

    fn flat(_: Coord) -> Option<f64> {
        Some(100.0)
    }

    #[test]
    fn test_extension_is_capped() {
        assert_eq!(extension(0.0), 2.0);
        assert_eq!(extension(-7.5), 2.0);
    }

    #[test]
    fn test_spacing_along_segment() {
        let stakes = [stake(0.0, 0.0, 0.0), stake(5.0, 0.0, 0.0)];
        let support = resample(&stakes, (1.0, 1.0), &flat).unwrap();
        let along: Vec<_> = support
            .iter()
            .filter(|p| matches!(p.origin, Origin::Stake(_)))
            .collect();
        assert_eq!(along.len(), 6);
        for (i, p) in along.iter().enumerate() {
            assert_relative_eq!(p.coord.x, i as f64);
            assert_relative_eq!(p.distance, i as f64);
        }
    }

    #[test]
    fn test_extensions() {
        let stakes = [stake(0.0, 0.0, 1.0), stake(5.0, 0.0, -1.0)];
        let support = resample(&stakes, (1.0, 0.5), &flat).unwrap();
        // spacing 0.5: four points on each extension, eleven along.
        assert_eq!(support.len(), 4 + 11 + 4);
        assert!(support.iter().enumerate().all(|(i, p)| p.id == i));
        assert_eq!(support[0].origin, Origin::Before);
        assert_relative_eq!(support[0].coord.x, -2.0);
        assert_relative_eq!(support[0].distance, -2.0);
        assert_relative_eq!(support[3].distance, -0.5);
        assert_eq!(support[4].origin, Origin::Stake(0));
        assert_eq!(support[4].distance, 0.0);
        let last = support.last().unwrap();
        assert_eq!(last.origin, Origin::After);
        assert_relative_eq!(last.coord.x, 7.0);
        assert_relative_eq!(last.distance, 7.0);
        assert!(support.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_extension_stops_at_nodata() {
        let stakes = [stake(0.0, 0.0, 0.0), stake(4.0, 0.0, 0.0)];
        let source = |c: Coord| if c.x < -1.5 || c.x > 4.5 { None } else { Some(1.0) };
        let support = resample(&stakes, (0.5, 0.5), &source).unwrap();
        let before = support.iter().filter(|p| p.origin == Origin::Before).count();
        let after = support.iter().filter(|p| p.origin == Origin::After).count();
        assert_eq!(before, 3);
        assert_eq!(after, 1);
    }

    #[test]
    fn test_nodata_forward_filled() {
        let stakes = [stake(0.0, 0.0, 0.0), stake(4.0, 0.0, 0.0)];
        let source = |c: Coord| {
            if c.x > 1.5 && c.x < 3.5 {
                None
            } else {
                Some(c.x)
            }
        };
        let support = resample(&stakes, (1.0, 1.0), &source).unwrap();
        let along: Vec<f64> = support
            .iter()
            .filter(|p| matches!(p.origin, Origin::Stake(_)))
            .map(|p| p.z)
            .collect();
        assert_eq!(along, vec![0.0, 1.0, 1.0, 1.0, 4.0]);
    }

    #[test]
    fn test_nodata_at_first_stake() {
        let stakes = [stake(0.0, 0.0, 0.0), stake(4.0, 0.0, 0.0)];
        let source = |c: Coord| if c.x < 0.5 { None } else { Some(1.0) };
        assert!(matches!(
            resample(&stakes, (1.0, 1.0), &source),
            Err(CotasError::NoDataAtAnchor { .. })
        ));
    }

    #[test]
    fn test_polyline_distance_accumulates() {
        let stakes = [
            stake(0.0, 0.0, 0.0),
            stake(3.0, 0.0, 0.0),
            stake(3.0, 4.0, 0.0),
        ];
        let support = resample(&stakes, (1.0, 1.0), &flat).unwrap();
        let along: Vec<_> = support
            .iter()
            .filter(|p| matches!(p.origin, Origin::Stake(_)))
            .collect();
        // Four points on the first segment, five on the second.
        assert_eq!(along.len(), 9);
        assert_eq!(along[4].origin, Origin::Stake(1));
        assert_relative_eq!(along.last().unwrap().distance, 7.0);
        // Trailing extension heads north, away from the last segment.
        let last = support.last().unwrap();
        assert_relative_eq!(last.coord.y, 6.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let stakes = [stake(0.0, 0.0, 0.0)];
        assert!(matches!(
            resample(&stakes, (1.0, 1.0), &flat),
            Err(CotasError::InsufficientPoints { .. })
        ));
        let stakes = [stake(0.0, 0.0, 0.0), stake(1.0, 0.0, 0.0)];
        assert!(matches!(
            resample(&stakes, (0.0, 1.0), &flat),
            Err(CotasError::InvalidSpacing(_))
        ));
    }
}
