//! Cut and fill faces ("taludes").
//!
//! At each end of a section the design line is continued by an
//! inclined face until it meets the terrain. A design point above the
//! terrain gets a fill face sloping down and outwards; one below gets
//! a cut face sloping up and outwards.

use crate::{
    math::{interpolate_clamped, intersect, TOLERANCE},
    CotasError,
};
use dem::C;
use geo::geometry::Coord;
use log::warn;

/// Default face inclination, in degrees.
pub const DEFAULT_ANGLE: C = 45.0;

/// Which end of the section a face starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left (lowest x) end; the face runs towards decreasing x.
    Start,
    /// Right (highest x) end; the face runs towards increasing x.
    End,
}

/// Where a face meets the terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaludeHit {
    pub coord: Coord<C>,

    /// Inclination of the face that was traced, in degrees.
    pub angle: C,

    /// True if the face never met the terrain and `coord` is the
    /// terrain's own end point.
    pub fallback: bool,
}

/// Returns the inclination of the face leaving `start` on `side`.
///
/// Fill on the start side and cut on the end side rise with x and use
/// `angle`; the other two use its supplement.
pub fn face_angle(start: Coord<C>, side: Side, terrain: &[Coord<C>], angle: C) -> C {
    let above = start.y >= interpolate_clamped(terrain, start.x);
    match (side, above) {
        (Side::Start, true) | (Side::End, false) => angle,
        (Side::Start, false) | (Side::End, true) => 180.0 - angle,
    }
}

/// Traces the face leaving `start` on `side` and returns where it
/// first meets `terrain`.
///
/// Terrain segments are scanned left to right for [Side::Start] and
/// right to left for [Side::End]. Hits on the inner side of `start`
/// are ignored.
pub fn find(
    start: Coord<C>,
    side: Side,
    terrain: &[Coord<C>],
    angle: C,
) -> Result<TaludeHit, CotasError> {
    if terrain.len() < 2 {
        return Err(CotasError::InsufficientPoints {
            needed: 2,
            got: terrain.len(),
        });
    }

    let angle = face_angle(start, side, terrain, angle);
    let m = angle.to_radians().tan();

    let outward = |hit: &Coord<C>| match side {
        Side::Start => hit.x <= start.x + TOLERANCE,
        Side::End => hit.x >= start.x - TOLERANCE,
    };
    let crossing = |(a, b): (&Coord<C>, &Coord<C>)| {
        intersect::line_segment(start, m, *a, *b).filter(|hit| outward(hit))
    };
    let segments = terrain.iter().zip(terrain.iter().skip(1));
    let hit = match side {
        Side::Start => segments.into_iter().find_map(crossing),
        Side::End => segments.rev().find_map(crossing),
    };

    Ok(match hit {
        Some(coord) => TaludeHit {
            coord,
            angle,
            fallback: false,
        },
        None => {
            // Length checked above.
            let coord = match side {
                Side::Start => terrain[0],
                Side::End => terrain[terrain.len() - 1],
            };
            warn!("{side:?} face at {angle}° never meets terrain, using {coord:?}");
            TaludeHit {
                coord,
                angle,
                fallback: true,
            }
        }
    })
}

/// Traces the faces at both ends of `corte`.
pub fn bounds(
    corte: &[Coord<C>],
    terrain: &[Coord<C>],
    angle: C,
) -> Result<(TaludeHit, TaludeHit), CotasError> {
    let (first, last) = match corte {
        [] => return Err(CotasError::EmptyGeometry),
        [first, .., last] => (*first, *last),
        [only] => (*only, *only),
    };
    Ok((
        find(first, Side::Start, terrain, angle)?,
        find(last, Side::End, terrain, angle)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::{bounds, face_angle, find, Side, DEFAULT_ANGLE};
    use crate::CotasError;
    use approx::assert_relative_eq;
    use geo::{coord, Coord};

    fn v_terrain() -> Vec<Coord> {
        vec![
            coord!(x: 0.0, y: 10.0),
            coord!(x: 5.0, y: 0.0),
            coord!(x: 10.0, y: 10.0),
        ]
    }

    fn on_segment(p: Coord, a: Coord, b: Coord) -> bool {
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        cross.abs() < 1e-9
            && p.x >= a.x.min(b.x) - 1e-9
            && p.x <= a.x.max(b.x) + 1e-9
    }

    #[test]
    fn test_face_angle() {
        let terrain = v_terrain();
        let above = coord!(x: 5.0, y: 4.0);
        let below = coord!(x: 5.0, y: -4.0);
        assert_eq!(face_angle(above, Side::Start, &terrain, 45.0), 45.0);
        assert_eq!(face_angle(above, Side::End, &terrain, 45.0), 135.0);
        assert_eq!(face_angle(below, Side::Start, &terrain, 45.0), 135.0);
        assert_eq!(face_angle(below, Side::End, &terrain, 45.0), 45.0);
    }

    #[test]
    fn test_v_shape_fill() {
        let terrain = v_terrain();
        let start = coord!(x: 5.0, y: 4.0);
        for side in [Side::Start, Side::End] {
            let hit = find(start, side, &terrain, DEFAULT_ANGLE).unwrap();
            assert!(!hit.fallback);
            let on_terrain = terrain
                .windows(2)
                .any(|w| on_segment(hit.coord, w[0], w[1]));
            assert!(on_terrain, "{hit:?} not on terrain");
            let m = hit.angle.to_radians().tan();
            assert_relative_eq!(
                hit.coord.y,
                start.y + m * (hit.coord.x - start.x),
                epsilon = 1e-9
            );
        }
        let left = find(start, Side::Start, &terrain, DEFAULT_ANGLE).unwrap();
        assert_relative_eq!(left.coord.x, 11.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(left.coord.y, 8.0 / 3.0, epsilon = 1e-9);
        let right = find(start, Side::End, &terrain, DEFAULT_ANGLE).unwrap();
        assert_relative_eq!(right.coord.x, 19.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(right.coord.y, 8.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cut_on_flat_terrain() {
        let terrain = vec![coord!(x: -10.0, y: 0.0), coord!(x: 10.0, y: 0.0)];
        let left = find(coord!(x: -2.0, y: -3.0), Side::Start, &terrain, 45.0).unwrap();
        assert_relative_eq!(left.coord.x, -5.0, epsilon = 1e-9);
        assert_relative_eq!(left.coord.y, 0.0, epsilon = 1e-9);
        let right = find(coord!(x: 2.0, y: -3.0), Side::End, &terrain, 45.0).unwrap();
        assert_relative_eq!(right.coord.x, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_terrain_segment() {
        let terrain = vec![
            coord!(x: 0.0, y: 0.0),
            coord!(x: 4.0, y: 0.0),
            coord!(x: 4.0, y: 10.0),
            coord!(x: 8.0, y: 10.0),
        ];
        // Cut from the right end. Scanning from the outer end, the
        // cliff is met before the flat ground nearer the start.
        let hit = find(coord!(x: 2.0, y: -1.0), Side::End, &terrain, 45.0).unwrap();
        assert_relative_eq!(hit.coord.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(hit.coord.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fallback_to_terrain_end() {
        // Terrain too short for the fill face to reach.
        let terrain = vec![coord!(x: 0.0, y: 0.0), coord!(x: 10.0, y: 0.0)];
        let hit = find(coord!(x: 1.0, y: 5.0), Side::Start, &terrain, 45.0).unwrap();
        assert!(hit.fallback);
        assert_eq!(hit.coord, coord!(x: 0.0, y: 0.0));
        let hit = find(coord!(x: 9.0, y: 5.0), Side::End, &terrain, 45.0).unwrap();
        assert!(hit.fallback);
        assert_eq!(hit.coord, coord!(x: 10.0, y: 0.0));
    }

    #[test]
    fn test_bounds() {
        let terrain = v_terrain();
        let corte = [coord!(x: 4.0, y: 3.0), coord!(x: 6.0, y: 3.0)];
        let (start, end) = bounds(&corte, &terrain, 45.0).unwrap();
        assert!(start.coord.x < 4.0);
        assert!(end.coord.x > 6.0);
        assert!(matches!(
            bounds(&[], &terrain, 45.0),
            Err(CotasError::EmptyGeometry)
        ));
        assert!(matches!(
            find(corte[0], Side::Start, &terrain[..1], 45.0),
            Err(CotasError::InsufficientPoints { .. })
        ));
    }
}
