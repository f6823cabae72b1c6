use super::Point3;
use geo::{geometry::Coord, CoordFloat};
use itertools::Itertools;

/// Returns the Euclidean distance between `a` and `b`.
pub fn distance<T: CoordFloat>(a: Coord<T>, b: Coord<T>) -> T {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Returns the running path length at each of `points`.
///
/// The first value is always zero and the sequence never decreases;
/// repeated points simply add nothing. An empty input yields an empty
/// output.
pub fn accumulated_distances<T: CoordFloat>(points: &[Coord<T>]) -> Vec<T> {
    let mut distances = Vec::with_capacity(points.len());
    if points.is_empty() {
        return distances;
    }
    let mut total = T::zero();
    distances.push(total);
    for (a, b) in points.iter().tuple_windows() {
        total = total + distance(*a, *b);
        distances.push(total);
    }
    distances
}

/// Like [accumulated_distances], but measures slope length in 3D.
pub fn accumulated_distances_3d(points: &[Point3]) -> Vec<f64> {
    let mut distances = Vec::with_capacity(points.len());
    if points.is_empty() {
        return distances;
    }
    let mut total = 0.0;
    distances.push(total);
    for (a, b) in points.iter().tuple_windows() {
        let dz = b.z - a.z;
        total += distance(a.xy(), b.xy()).hypot(dz);
        distances.push(total);
    }
    distances
}
