//! Serializable output records.
//!
//! Computations carry full precision; values are rounded only here,
//! as they are turned into records.

use crate::{
    extract::CotaPoint,
    hatch::HatchRegion,
    support::Origin,
    CrossSection, Estaca, SupportPoint,
};
use dem::C;
use serde::Serialize;

/// Default number of decimals kept in output values.
pub const DECIMALS: u32 = 3;

/// Attribute holding a stake's design elevation.
pub const COTA_ESTACA: &str = "CotaEstaca";

/// Attribute holding a stake's design height above terrain.
pub const ALTURA_ESTACA: &str = "AlturaEstaca";

/// Attribute holding the distance along a support profile.
pub const DISTANCIA: &str = "Distancia";

/// Rounds `value` to [DECIMALS] decimals.
pub fn round(value: C) -> C {
    round_to(value, DECIMALS)
}

/// Rounds `value` to `decimals` decimals, half away from zero.
pub fn round_to(value: C, decimals: u32) -> C {
    let scale = 10_f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    if scale.is_finite() {
        (value * scale).round() / scale
    } else {
        value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CotaRecord {
    pub id: usize,
    pub row: usize,
    pub col: usize,
    pub x: C,
    pub y: C,
    pub z: C,
}

impl CotaRecord {
    pub fn new(point: &CotaPoint, decimals: u32) -> Self {
        Self {
            id: point.id,
            row: point.row,
            col: point.col,
            x: point.coord.x,
            y: point.coord.y,
            z: round_to(point.z, decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstacaRecord {
    pub id: usize,
    pub x: C,
    pub y: C,
    pub z: C,
    #[serde(rename = "CotaEstaca")]
    pub cota: C,
    #[serde(rename = "AlturaEstaca")]
    pub altura: C,
}

impl EstacaRecord {
    pub fn new(id: usize, estaca: &Estaca, decimals: u32) -> Self {
        Self {
            id,
            x: estaca.coord.x,
            y: estaca.coord.y,
            z: round_to(estaca.z, decimals),
            cota: round_to(estaca.cota, decimals),
            altura: round_to(estaca.altura, decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportRecord {
    pub id: usize,

    /// Index of the stake starting the segment this point lies on;
    /// -1 before the first stake, -2 after the last.
    pub original_id: i64,
    #[serde(rename = "Distancia")]
    pub distance: C,
    pub x: C,
    pub y: C,
    pub z: C,
}

impl SupportRecord {
    pub fn new(point: &SupportPoint, decimals: u32) -> Self {
        let original_id = match point.origin {
            Origin::Before => -1,
            Origin::After => -2,
            Origin::Stake(idx) => i64::try_from(idx).unwrap_or(i64::MAX),
        };
        Self {
            id: point.id,
            original_id,
            distance: round_to(point.distance, decimals),
            x: point.coord.x,
            y: point.coord.y,
            z: round_to(point.z, decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionRecord {
    pub kind: &'static str,
    pub area: C,
    /// Outline as [distance, elevation] pairs.
    pub outline: Vec<[C; 2]>,
}

impl RegionRecord {
    pub fn new(region: &HatchRegion, decimals: u32) -> Self {
        Self {
            kind: region.kind.as_str(),
            area: round_to(region.area, decimals),
            outline: region
                .polygon
                .exterior()
                .coords()
                .map(|c| [round_to(c.x, decimals), round_to(c.y, decimals)])
                .collect(),
        }
    }
}

/// Where a face met the terrain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaludeRecord {
    pub distance: C,
    pub elevation: C,
    pub angle: C,
    pub fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub aterro: C,
    pub corte: C,
    pub talude_start: TaludeRecord,
    pub talude_end: TaludeRecord,
    pub regions: Vec<RegionRecord>,
}

impl SectionReport {
    pub fn new(section: &CrossSection, decimals: u32) -> Self {
        let talude = |hit: &crate::TaludeHit| TaludeRecord {
            distance: round_to(hit.coord.x, decimals),
            elevation: round_to(hit.coord.y, decimals),
            angle: hit.angle,
            fallback: hit.fallback,
        };
        Self {
            aterro: round_to(section.areas.aterro, decimals),
            corte: round_to(section.areas.corte, decimals),
            talude_start: talude(&section.talude.0),
            talude_end: talude(&section.talude.1),
            regions: section
                .areas
                .regions
                .iter()
                .map(|r| RegionRecord::new(r, decimals))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{round, round_to, EstacaRecord, SupportRecord, ALTURA_ESTACA, COTA_ESTACA};
    use crate::{
        support::{Origin, SupportPoint},
        Estaca,
    };
    use geo::coord;

    #[test]
    fn test_round() {
        assert_eq!(round(12.345_67), 12.346);
        assert_eq!(round(-4.499_9), -4.5);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
    }

    #[test]
    fn test_estaca_field_names() {
        let estaca = Estaca {
            coord: coord!(x: 10.0, y: 0.0),
            z: 8.0,
            cota: 12.500_04,
            altura: 4.500_04,
        };
        let json = serde_json::to_value(EstacaRecord::new(1, &estaca, 3)).unwrap();
        assert_eq!(json[COTA_ESTACA], 12.5);
        assert_eq!(json[ALTURA_ESTACA], 4.5);
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn test_support_original_id() {
        let point = |origin| SupportPoint {
            id: 0,
            origin,
            distance: -1.0,
            coord: coord!(x: 0.0, y: 0.0),
            z: 1.0,
        };
        assert_eq!(SupportRecord::new(&point(Origin::Before), 3).original_id, -1);
        assert_eq!(SupportRecord::new(&point(Origin::After), 3).original_id, -2);
        assert_eq!(SupportRecord::new(&point(Origin::Stake(4)), 3).original_id, 4);
        let json = serde_json::to_value(SupportRecord::new(&point(Origin::Before), 3)).unwrap();
        assert_eq!(json["Distancia"], -1.0);
    }
}
