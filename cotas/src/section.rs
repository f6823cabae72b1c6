//! Cross sections: a design line, its cut/fill faces, and the areas
//! enclosed against the terrain.

use crate::{
    hatch::{self, HatchAreas},
    math::{accumulated_distances, TOLERANCE},
    talude::{self, TaludeHit, DEFAULT_ANGLE},
    CotasError, Estaca, SupportPoint,
};
use dem::C;
use geo::geometry::Coord;
use log::debug;

/// A design line closed against the terrain.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    /// Design line as (distance, elevation), extended at both ends to
    /// where the faces meet the terrain.
    pub corte: Vec<Coord<C>>,

    /// Terrain as (distance, elevation).
    pub terreno: Vec<Coord<C>>,

    /// Faces at the start and end of the design line.
    pub talude: (TaludeHit, TaludeHit),

    pub areas: HatchAreas,
}

impl CrossSection {
    pub fn builder() -> CrossSectionBuilder {
        CrossSectionBuilder {
            corte: None,
            terreno: None,
            talude_angle: DEFAULT_ANGLE,
        }
    }
}

pub struct CrossSectionBuilder {
    /// Design line, ordered by distance (required).
    corte: Option<Vec<Coord<C>>>,

    /// Terrain line, ordered by distance (required).
    terreno: Option<Vec<Coord<C>>>,

    /// Face inclination (degrees, defaults to 45).
    talude_angle: C,
}

impl CrossSectionBuilder {
    /// Design line, ordered by distance (required).
    #[must_use]
    pub fn corte(mut self, line: Vec<Coord<C>>) -> Self {
        self.corte = Some(line);
        self
    }

    /// Terrain line, ordered by distance (required).
    #[must_use]
    pub fn terreno(mut self, line: Vec<Coord<C>>) -> Self {
        self.terreno = Some(line);
        self
    }

    /// Face inclination (degrees, defaults to 45).
    #[must_use]
    pub fn talude_angle(mut self, degrees: C) -> Self {
        self.talude_angle = degrees;
        self
    }

    pub fn build(&self) -> Result<CrossSection, CotasError> {
        let corte = self.corte.as_ref().ok_or(CotasError::Builder("corte"))?;
        let terreno = self.terreno.clone().ok_or(CotasError::Builder("terreno"))?;

        let (start, end) = talude::bounds(corte, &terreno, self.talude_angle)?;

        let mut extended = Vec::with_capacity(corte.len() + 2);
        // Bounds succeeded, so the design line is not empty.
        let (first, last) = (corte[0], corte[corte.len() - 1]);
        if start.coord.x < first.x - TOLERANCE {
            extended.push(start.coord);
        }
        extended.extend_from_slice(corte);
        if end.coord.x > last.x + TOLERANCE {
            extended.push(end.coord);
        }

        let areas = hatch::areas(&extended, &terreno)?;
        debug!(
            "section; corte: {}, terreno: {}, aterro: {}, corte: {}",
            extended.len(),
            terreno.len(),
            areas.aterro,
            areas.corte
        );

        Ok(CrossSection {
            corte: extended,
            terreno,
            talude: (start, end),
            areas,
        })
    }
}

/// Returns the design line of `estacas` as (distance along the
/// stakes, cota).
pub fn corte_line(estacas: &[Estaca]) -> Vec<Coord<C>> {
    let coords: Vec<Coord<C>> = estacas.iter().map(|e| e.coord).collect();
    accumulated_distances(&coords)
        .into_iter()
        .zip(estacas)
        .map(|(x, e)| Coord { x, y: e.cota })
        .collect()
}

/// Returns the terrain line of `support` as (distance, elevation).
pub fn terreno_line(support: &[SupportPoint]) -> Vec<Coord<C>> {
    support
        .iter()
        .map(|p| Coord {
            x: p.distance,
            y: p.z,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{corte_line, terreno_line, CrossSection};
    use crate::{estaca, hatch::HatchKind, support, CotasError, Point3, Stake};
    use approx::assert_relative_eq;
    use geo::{coord, Coord};

    fn terreno() -> Vec<Coord> {
        vec![
            coord!(x: -10.0, y: 10.0),
            coord!(x: 0.0, y: 10.0),
            coord!(x: 10.0, y: 8.0),
            coord!(x: 20.0, y: 12.0),
            coord!(x: 30.0, y: 12.0),
        ]
    }

    #[test]
    fn test_fill_section() {
        let points = [
            Point3::new(0.0, 0.0, 10.0),
            Point3::new(10.0, 0.0, 8.0),
            Point3::new(20.0, 0.0, 12.0),
        ];
        let estacas = estaca::interpolate(&points, 1.0, 2.0).unwrap();
        let corte = corte_line(&estacas);
        assert_eq!(corte[1], coord!(x: 10.0, y: 12.5));

        let section = CrossSection::builder()
            .corte(corte)
            .terreno(terreno())
            .build()
            .unwrap();

        let (start, end) = section.talude;
        assert_relative_eq!(start.coord.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(start.coord.y, 10.0, epsilon = 1e-9);
        assert_relative_eq!(end.coord.x, 22.0, epsilon = 1e-9);
        assert_relative_eq!(end.coord.y, 12.0, epsilon = 1e-9);
        assert_eq!(section.corte.len(), 5);
        assert_eq!(section.corte[0], start.coord);

        // 0.5 + 27.5 + 32.5 + 2.0
        assert_relative_eq!(section.areas.aterro, 62.5, epsilon = 1e-9);
        assert_eq!(section.areas.corte, 0.0);
        assert!(section
            .areas
            .regions
            .iter()
            .all(|r| r.kind == HatchKind::Aterro));
    }

    #[test]
    fn test_from_support_points() {
        let stakes = [
            Stake {
                coord: coord!(x: 0.0, y: 0.0),
                altura: -1.0,
            },
            Stake {
                coord: coord!(x: 6.0, y: 0.0),
                altura: -1.0,
            },
        ];
        let support = support::resample(&stakes, (1.0, 1.0), &|_: Coord| Some(5.0)).unwrap();
        let terreno = terreno_line(&support);
        assert_relative_eq!(terreno[0].x, -2.0);
        assert_relative_eq!(terreno.last().unwrap().x, 8.0);

        // Flat cut one unit deep over the stakes.
        let corte = vec![coord!(x: 0.0, y: 4.0), coord!(x: 6.0, y: 4.0)];
        let section = CrossSection::builder()
            .corte(corte)
            .terreno(terreno)
            .talude_angle(45.0)
            .build()
            .unwrap();
        assert_relative_eq!(section.talude.0.coord.x, -1.0, epsilon = 1e-9);
        assert_relative_eq!(section.talude.1.coord.x, 7.0, epsilon = 1e-9);
        // Trapezoid: 6 wide at the bottom, 8 at the top, 1 deep.
        assert_relative_eq!(section.areas.corte, 7.0, epsilon = 1e-9);
        assert_eq!(section.areas.aterro, 0.0);
    }

    #[test]
    fn test_builder_requires_lines() {
        assert!(matches!(
            CrossSection::builder().terreno(terreno()).build(),
            Err(CotasError::Builder("corte"))
        ));
        assert!(matches!(
            CrossSection::builder().corte(terreno()).build(),
            Err(CotasError::Builder("terreno"))
        ));
    }
}
