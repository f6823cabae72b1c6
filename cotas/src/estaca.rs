//! Design elevations ("cotas") along a line of stakes ("estacas").
//!
//! The designer fixes a target elevation at the first and last stake,
//! each as an offset from the terrain there. Stakes in between get a
//! target proportional to their straight-line distance from the first
//! stake, measured against the chord from the first to the last stake.

use crate::{
    math::{distance, Point3, TOLERANCE},
    CotasError,
};
use dem::C;
use geo::geometry::Coord;
use log::debug;

/// An interpolated stake.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estaca {
    /// Planar location.
    pub coord: Coord<C>,

    /// Terrain elevation.
    pub z: C,

    /// Interpolated design elevation.
    pub cota: C,

    /// Design elevation above terrain, `cota - z`.
    pub altura: C,
}

/// Returns the elevation difference between `reference` and `z`.
pub fn desnivel(reference: C, z: C) -> C {
    reference - z
}

/// Interpolates design elevations for `points`.
///
/// The first target is `z_first + delta_first`, the last is
/// `z_last + delta_last`.
///
/// When the first and last points coincide every stake gets the first
/// target. If the two targets differ and some other stake lies
/// elsewhere, no single line can honor both and
/// [CotasError::CannotInterpolate] is returned.
pub fn interpolate(
    points: &[Point3],
    delta_first: C,
    delta_last: C,
) -> Result<Vec<Estaca>, CotasError> {
    let (first, last) = match points {
        [first, .., last] => (*first, *last),
        _ => {
            return Err(CotasError::InsufficientPoints {
                needed: 2,
                got: points.len(),
            })
        }
    };

    let cota_first = first.z + delta_first;
    let cota_last = last.z + delta_last;
    let total_distance = distance(first.xy(), last.xy());

    let estaca = |p: &Point3, cota: C| Estaca {
        coord: p.xy(),
        z: p.z,
        cota,
        altura: desnivel(cota, p.z),
    };

    if total_distance <= TOLERANCE {
        let distinct = points
            .iter()
            .any(|p| distance(first.xy(), p.xy()) > TOLERANCE);
        if distinct && (cota_last - cota_first).abs() > TOLERANCE {
            return Err(CotasError::CannotInterpolate);
        }
        debug!("first and last stakes coincide, holding cota {cota_first}");
        return Ok(points.iter().map(|p| estaca(p, cota_first)).collect());
    }

    let rise = cota_last - cota_first;
    Ok(points
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            // Ends get their targets verbatim.
            let cota = if idx == 0 {
                cota_first
            } else if idx == points.len() - 1 {
                cota_last
            } else {
                let fraction = distance(first.xy(), p.xy()) / total_distance;
                cota_first + fraction * rise
            };
            estaca(p, cota)
        })
        .collect())
}
