use super::TOLERANCE;
use dem::C;
use geo::geometry::Coord;

/// Returns the y value of the piecewise linear `curve` at `x`, or
/// `None` when `x` lies outside the curve.
///
/// `curve` must be ordered by non-decreasing x.
pub fn interpolate_y(curve: &[Coord<C>], x: C) -> Option<C> {
    let first = curve.first()?;
    let last = curve.last()?;
    if x < first.x - TOLERANCE || x > last.x + TOLERANCE {
        return None;
    }
    Some(interpolate_clamped(curve, x))
}

/// Like [interpolate_y], but holds the end values outside the
/// curve's x range. An empty curve yields NaN.
pub fn interpolate_clamped(curve: &[Coord<C>], x: C) -> C {
    let (Some(first), Some(last)) = (curve.first(), curve.last()) else {
        return C::NAN;
    };
    if x <= first.x {
        return first.y;
    }
    if x >= last.x {
        return last.y;
    }
    // Index of the first vertex strictly right of `x`.
    let idx = curve.partition_point(|c| c.x <= x);
    let (a, b) = (curve[idx - 1], curve[idx]);
    let dx = b.x - a.x;
    if dx.abs() <= TOLERANCE {
        a.y
    } else {
        a.y + (x - a.x) * (b.y - a.y) / dx
    }
}
