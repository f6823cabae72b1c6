mod distance;
pub mod intersect;
mod interp;
mod linspace;

pub use self::{
    distance::{accumulated_distances, accumulated_distances_3d, distance},
    interp::{interpolate_clamped, interpolate_y},
};
pub(crate) use linspace::linspace;

use dem::C;
use geo::geometry::Coord;

/// A planar location with an elevation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: C,
    pub y: C,
    pub z: C,
}

impl Point3 {
    pub fn new(x: C, y: C, z: C) -> Self {
        Self { x, y, z }
    }

    /// Returns the planar (x, y) part of this point.
    pub fn xy(&self) -> Coord<C> {
        Coord {
            x: self.x,
            y: self.y,
        }
    }
}

/// Absolute tolerance for comparing coordinates.
pub const TOLERANCE: C = 1e-9;
