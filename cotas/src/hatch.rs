//! Cut and fill areas between a design line and the terrain.
//!
//! Both curves are profiles, (distance, elevation) ordered by
//! distance. Where the design ("corte") line is above the terrain the
//! region is fill ([HatchKind::Aterro]), below it is cut
//! ([HatchKind::Corte]).

use crate::{
    math::{interpolate_clamped, intersect, TOLERANCE},
    CotasError,
};
use dem::C;
use geo::geometry::{Coord, LineString, Polygon};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HatchKind {
    /// Fill, design above terrain.
    Aterro,
    /// Cut, design below terrain.
    Corte,
}

impl HatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aterro => "aterro",
            Self::Corte => "corte",
        }
    }
}

/// One maximal run where the design line stays on one side of the
/// terrain.
#[derive(Debug, Clone, PartialEq)]
pub struct HatchRegion {
    pub kind: HatchKind,
    pub area: C,

    /// Design line left to right, then terrain right to left.
    pub polygon: Polygon<C>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HatchAreas {
    /// Total fill area.
    pub aterro: C,
    /// Total cut area.
    pub corte: C,
    pub regions: Vec<HatchRegion>,
}

impl HatchAreas {
    /// Returns the regions of one kind.
    pub fn regions_of(&self, kind: HatchKind) -> impl Iterator<Item = &HatchRegion> {
        self.regions.iter().filter(move |r| r.kind == kind)
    }
}

/// Both curves evaluated at one x.
#[derive(Debug, Clone, Copy)]
struct Station {
    x: C,
    corte: C,
    terreno: C,
}

impl Station {
    fn diff(&self) -> C {
        self.corte - self.terreno
    }

    fn touches(&self) -> bool {
        self.diff().abs() <= TOLERANCE
    }
}

/// Computes the areas enclosed between `corte` and `terreno` over the
/// x range they share.
pub fn areas(corte: &[Coord<C>], terreno: &[Coord<C>]) -> Result<HatchAreas, CotasError> {
    for curve in [corte, terreno] {
        if curve.len() < 2 {
            return Err(CotasError::InsufficientPoints {
                needed: 2,
                got: curve.len(),
            });
        }
    }
    let lo = corte[0].x.max(terreno[0].x);
    let hi = corte[corte.len() - 1].x.min(terreno[terreno.len() - 1].x);
    if hi - lo <= TOLERANCE {
        return Err(CotasError::DisjointCurves);
    }

    let mut xs: Vec<C> = corte
        .iter()
        .chain(terreno)
        .map(|c| c.x)
        .filter(|x| *x > lo && *x < hi)
        .chain([lo, hi])
        .collect();
    xs.sort_by(C::total_cmp);
    xs.dedup_by(|a, b| (*a - *b).abs() <= TOLERANCE);

    let stations = with_crossings(xs.into_iter().map(|x| Station {
        x,
        corte: interpolate_clamped(corte, x),
        terreno: interpolate_clamped(terreno, x),
    }));

    let mut out = HatchAreas::default();
    let mut start = 0;
    for idx in 1..stations.len() {
        if stations[idx].touches() || idx == stations.len() - 1 {
            if let Some(region) = region(&stations[start..=idx]) {
                match region.kind {
                    HatchKind::Aterro => out.aterro += region.area,
                    HatchKind::Corte => out.corte += region.area,
                }
                out.regions.push(region);
            }
            start = idx;
        }
    }

    debug!(
        "hatch; stations: {}, regions: {}, aterro: {}, corte: {}",
        stations.len(),
        out.regions.len(),
        out.aterro,
        out.corte
    );
    Ok(out)
}

/// Inserts a station wherever the two curves cross between
/// consecutive stations.
fn with_crossings(stations: impl Iterator<Item = Station>) -> Vec<Station> {
    let mut out: Vec<Station> = Vec::new();
    for b in stations {
        if let Some(a) = out.last().copied() {
            let (da, db) = (a.diff(), b.diff());
            if !a.touches() && !b.touches() && da.signum() != db.signum() {
                let p = intersect::lines(
                    Coord { x: a.x, y: a.corte },
                    Coord { x: b.x, y: b.corte },
                    Coord { x: a.x, y: a.terreno },
                    Coord { x: b.x, y: b.terreno },
                )
                .filter(|p| p.x > a.x && p.x < b.x)
                .unwrap_or_else(|| {
                    let x = a.x + da / (da - db) * (b.x - a.x);
                    Coord {
                        x,
                        y: a.corte + (x - a.x) / (b.x - a.x) * (b.corte - a.corte),
                    }
                });
                out.push(Station {
                    x: p.x,
                    corte: p.y,
                    terreno: p.y,
                });
            }
        }
        out.push(b);
    }
    out
}

/// Builds the region spanned by `run`, or `None` if it encloses
/// nothing.
fn region(run: &[Station]) -> Option<HatchRegion> {
    let (signed, area) = run
        .windows(2)
        .map(|w| {
            let dx = w[1].x - w[0].x;
            let (d0, d1) = (w[0].diff(), w[1].diff());
            (0.5 * (d0 + d1) * dx, 0.5 * (d0.abs() + d1.abs()) * dx)
        })
        .fold((0.0, 0.0), |(s, a), (ds, da)| (s + ds, a + da));
    if area <= TOLERANCE {
        return None;
    }
    let kind = if signed >= 0.0 {
        HatchKind::Aterro
    } else {
        HatchKind::Corte
    };
    let outline: Vec<Coord<C>> = run
        .iter()
        .map(|s| Coord { x: s.x, y: s.corte })
        .chain(run.iter().rev().map(|s| Coord {
            x: s.x,
            y: s.terreno,
        }))
        .collect();
    Some(HatchRegion {
        kind,
        area,
        polygon: Polygon::new(LineString::from(outline), vec![]),
    })
}

#[cfg(test)]
mod tests {
    use super::{areas, HatchKind};
    use crate::CotasError;
    use approx::assert_relative_eq;
    use geo::{coord, Area, Coord};

    fn line(points: &[(f64, f64)]) -> Vec<Coord> {
        points.iter().map(|&(x, y)| coord!(x: x, y: y)).collect()
    }

    #[test]
    fn test_parallel_curves() {
        let corte = line(&[(0.0, 2.0), (10.0, 2.0)]);
        let terreno = line(&[(0.0, 0.0), (4.0, 0.0), (10.0, 0.0)]);
        let hatch = areas(&corte, &terreno).unwrap();
        assert_relative_eq!(hatch.aterro, 20.0);
        assert_eq!(hatch.corte, 0.0);
        assert_eq!(hatch.regions.len(), 1);
        assert_eq!(hatch.regions[0].kind, HatchKind::Aterro);

        // Swapped, everything is cut.
        let hatch = areas(&terreno, &corte).unwrap();
        assert_relative_eq!(hatch.corte, 20.0);
        assert_eq!(hatch.aterro, 0.0);
    }

    #[test]
    fn test_crossing() {
        let corte = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let terreno = line(&[(0.0, -5.0), (10.0, 5.0)]);
        let hatch = areas(&corte, &terreno).unwrap();
        assert_relative_eq!(hatch.aterro, 12.5, epsilon = 1e-9);
        assert_relative_eq!(hatch.corte, 12.5, epsilon = 1e-9);
        assert_eq!(hatch.regions.len(), 2);
        assert_eq!(hatch.regions[0].kind, HatchKind::Aterro);
        assert_eq!(hatch.regions[1].kind, HatchKind::Corte);
    }

    #[test]
    fn test_region_polygons_match_areas() {
        let corte = line(&[(0.0, 3.0), (3.0, 1.0), (7.0, 4.0), (10.0, 2.0)]);
        let terreno = line(&[(-2.0, 2.0), (2.0, 2.5), (6.0, 3.5), (12.0, 1.0)]);
        let hatch = areas(&corte, &terreno).unwrap();
        assert!(hatch.regions.len() >= 3);
        for region in &hatch.regions {
            assert_relative_eq!(region.polygon.unsigned_area(), region.area, epsilon = 1e-9);
        }
        let total: f64 = hatch.regions.iter().map(|r| r.area).sum();
        assert_relative_eq!(total, hatch.aterro + hatch.corte, epsilon = 1e-9);
        assert_eq!(
            hatch.regions_of(HatchKind::Aterro).count() + hatch.regions_of(HatchKind::Corte).count(),
            hatch.regions.len()
        );
    }

    #[test]
    fn test_touching_splits_regions() {
        let corte = line(&[(0.0, 0.0), (10.0, 0.0)]);
        let terreno = line(&[(0.0, -2.0), (5.0, 0.0), (10.0, -2.0)]);
        let hatch = areas(&corte, &terreno).unwrap();
        assert_eq!(hatch.regions.len(), 2);
        assert_relative_eq!(hatch.aterro, 10.0);
        assert_eq!(hatch.corte, 0.0);
    }

    #[test]
    fn test_identical_curves_enclose_nothing() {
        let curve = line(&[(0.0, 1.0), (5.0, 3.0), (10.0, 2.0)]);
        let hatch = areas(&curve, &curve).unwrap();
        assert!(hatch.regions.is_empty());
        assert_eq!(hatch.aterro + hatch.corte, 0.0);
    }

    #[test]
    fn test_bad_input() {
        let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
        let b = line(&[(2.0, 0.0), (3.0, 0.0)]);
        assert!(matches!(areas(&a, &b), Err(CotasError::DisjointCurves)));
        assert!(matches!(
            areas(&a[..1], &b),
            Err(CotasError::InsufficientPoints { .. })
        ));
    }
}
