//! Line and segment intersections in the plane.

use super::TOLERANCE;
use dem::C;
use geo::geometry::Coord;

/// Returns the slope of the line through `a` and `b`, or `None` if
/// the line is vertical.
pub fn slope(a: Coord<C>, b: Coord<C>) -> Option<C> {
    let dx = b.x - a.x;
    if dx == 0.0 {
        None
    } else {
        Some((b.y - a.y) / dx)
    }
}

/// Returns true if `p` lies inside the bounding box of segment
/// `a`-`b`, with [TOLERANCE] slack on every side.
pub fn in_bbox(p: Coord<C>, a: Coord<C>, b: Coord<C>) -> bool {
    p.x >= a.x.min(b.x) - TOLERANCE
        && p.x <= a.x.max(b.x) + TOLERANCE
        && p.y >= a.y.min(b.y) - TOLERANCE
        && p.y <= a.y.max(b.y) + TOLERANCE
}

/// Returns where the line through `origin` with slope `m` crosses
/// segment `a`-`b`, if it does.
///
/// Segments parallel to the line never cross it, even when they are
/// collinear.
pub fn line_segment(origin: Coord<C>, m: C, a: Coord<C>, b: Coord<C>) -> Option<Coord<C>> {
    let hit = match slope(a, b) {
        None => Coord {
            x: a.x,
            y: origin.y + m * (a.x - origin.x),
        },
        Some(m_seg) if m_seg == m => return None,
        Some(m_seg) => {
            let x = (m * origin.x - m_seg * a.x + a.y - origin.y) / (m - m_seg);
            Coord {
                x,
                y: origin.y + m * (x - origin.x),
            }
        }
    };
    in_bbox(hit, a, b).then_some(hit)
}

/// Returns the intersection of the infinite lines through `a0`-`a1`
/// and `b0`-`b1`, or `None` if they are parallel or degenerate.
pub fn lines(a0: Coord<C>, a1: Coord<C>, b0: Coord<C>, b1: Coord<C>) -> Option<Coord<C>> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() <= C::EPSILON * (r.x.hypot(r.y) * s.x.hypot(s.y)) {
        return None;
    }
    let q = b0 - a0;
    let t = (q.x * s.y - q.y * s.x) / denom;
    Some(a0 + r * t)
}

#[cfg(test)]
mod tests {
    use super::{in_bbox, line_segment, lines, slope};
    use approx::assert_relative_eq;
    use geo::coord;

    #[test]
    fn test_slope() {
        assert_eq!(slope(coord!(x: 0.0, y: 0.0), coord!(x: 2.0, y: 1.0)), Some(0.5));
        assert_eq!(slope(coord!(x: 1.0, y: 0.0), coord!(x: 1.0, y: 5.0)), None);
    }

    #[test]
    fn test_line_segment() {
        let hit = line_segment(
            coord!(x: 0.0, y: 0.0),
            1.0,
            coord!(x: 0.0, y: 4.0),
            coord!(x: 4.0, y: 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.x, 2.0);
        assert_relative_eq!(hit.y, 2.0);
    }

    #[test]
    fn test_line_vertical_segment() {
        let hit = line_segment(
            coord!(x: 0.0, y: 1.0),
            -1.0,
            coord!(x: 3.0, y: -5.0),
            coord!(x: 3.0, y: 5.0),
        )
        .unwrap();
        assert_relative_eq!(hit.x, 3.0);
        assert_relative_eq!(hit.y, -2.0);
    }

    #[test]
    fn test_line_segment_misses() {
        // Parallel.
        assert!(line_segment(
            coord!(x: 0.0, y: 0.0),
            1.0,
            coord!(x: 0.0, y: 1.0),
            coord!(x: 1.0, y: 2.0),
        )
        .is_none());
        // Crosses the line extension, outside the segment.
        assert!(line_segment(
            coord!(x: 0.0, y: 0.0),
            1.0,
            coord!(x: 5.0, y: 0.0),
            coord!(x: 6.0, y: -1.0),
        )
        .is_none());
    }

    #[test]
    fn test_lines() {
        let hit = lines(
            coord!(x: 0.0, y: 0.0),
            coord!(x: 2.0, y: 2.0),
            coord!(x: 0.0, y: 2.0),
            coord!(x: 2.0, y: 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.x, 1.0);
        assert_relative_eq!(hit.y, 1.0);
        assert!(lines(
            coord!(x: 0.0, y: 0.0),
            coord!(x: 1.0, y: 1.0),
            coord!(x: 0.0, y: 1.0),
            coord!(x: 1.0, y: 2.0),
        )
        .is_none());
    }

    #[test]
    fn test_in_bbox() {
        let (a, b) = (coord!(x: 0.0, y: 0.0), coord!(x: 1.0, y: 1.0));
        assert!(in_bbox(coord!(x: 0.5, y: 0.5), a, b));
        assert!(in_bbox(coord!(x: 1.0 + 1e-12, y: 1.0), a, b));
        assert!(!in_bbox(coord!(x: 1.1, y: 0.5), a, b));
    }
}
