//! GeoJSON vector layers.

use anyhow::{anyhow, Result};
use cotas::{CotasError, C};
use geo::geometry::{Coord, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};

/// A point read from a layer.
#[derive(Debug, Clone)]
pub struct PointFeature {
    pub coord: Coord<C>,

    /// Third coordinate, if the geometry has one.
    pub z: Option<C>,

    pub properties: JsonObject,
}

impl PointFeature {
    /// Returns the numeric property `name`.
    pub fn number(&self, name: &str) -> Result<C, CotasError> {
        self.properties
            .get(name)
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| CotasError::MissingField(name.to_owned()))
    }
}

fn open(path: &Path) -> Result<GeoJson> {
    let file = File::open(path)?;
    Ok(GeoJson::from_reader(file)?)
}

fn features(geojson: GeoJson) -> Vec<Feature> {
    match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => vec![Feature {
            geometry: Some(geometry),
            ..Default::default()
        }],
    }
}

/// Reads every point of the layer at `path`, in file order.
///
/// Features without a point geometry are skipped.
pub fn read_points(path: &Path) -> Result<Vec<PointFeature>> {
    let points: Vec<PointFeature> = features(open(path)?)
        .into_iter()
        .filter_map(|feature| {
            let position = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::Point(position)) => position.clone(),
                _ => return None,
            };
            let (x, y) = (*position.first()?, *position.get(1)?);
            Some(PointFeature {
                coord: Coord { x, y },
                z: position.get(2).copied(),
                properties: feature.properties.unwrap_or_default(),
            })
        })
        .collect();
    if points.is_empty() {
        return Err(CotasError::EmptyGeometry.into());
    }
    Ok(points)
}

/// Reads the first line of the layer at `path`.
pub fn read_line(path: &Path) -> Result<Vec<Coord<C>>> {
    features(open(path)?)
        .into_iter()
        .find_map(|feature| match feature.geometry.map(|g| g.value) {
            Some(Value::LineString(positions)) => Some(positions),
            Some(Value::MultiLineString(mut lines)) if !lines.is_empty() => Some(lines.remove(0)),
            _ => None,
        })
        .ok_or_else(|| anyhow!("no line in {path:?}"))?
        .into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(anyhow!("bad position {position:?} in {path:?}")),
        })
        .collect()
}

/// Turns `record` into a GeoJSON properties object.
fn properties<T: Serialize>(record: &T) -> Result<JsonObject> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected an object, got {other}")),
    }
}

/// Writes a feature collection with one feature per (geometry,
/// record) pair.
pub fn write<W, T, I>(out: W, features: I) -> Result<()>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = (Value, T)>,
{
    let features = features
        .into_iter()
        .map(|(value, record)| {
            Ok(Feature {
                geometry: Some(Geometry::new(value)),
                properties: Some(properties(&record)?),
                ..Default::default()
            })
        })
        .collect::<Result<Vec<Feature>>>()?;
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    serde_json::to_writer(out, &collection)?;
    Ok(())
}

pub fn point(coord: Coord<C>) -> Value {
    Value::Point(vec![coord.x, coord.y])
}

pub fn polygon(polygon: &Polygon<C>) -> Value {
    Value::from(polygon)
}

#[cfg(test)]
mod tests {
    use super::{point, read_line, read_points, write};
    use cotas::CotasError;
    use geo::coord;
    use serde::Serialize;
    use std::io::Write;

    const STAKES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 0.0, 10.0]},
             "properties": {"AlturaEstaca": 1.0}},
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]},
             "properties": null},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [10.0, 0.0]},
             "properties": {"name": "b"}}
        ]
    }"#;

    fn stakes_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(STAKES.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_points() {
        let file = stakes_file();
        let points = read_points(file.path()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].z, Some(10.0));
        assert_eq!(points[1].z, None);
        assert_eq!(points[0].number("AlturaEstaca").unwrap(), 1.0);
        assert!(matches!(
            points[1].number("AlturaEstaca"),
            Err(CotasError::MissingField(name)) if name == "AlturaEstaca"
        ));
    }

    #[test]
    fn test_read_line() {
        let file = stakes_file();
        let line = read_line(file.path()).unwrap();
        assert_eq!(line, vec![coord!(x: 0.0, y: 0.0), coord!(x: 1.0, y: 1.0)]);
    }

    #[test]
    fn test_write() {
        #[derive(Serialize)]
        struct Record {
            id: usize,
            z: f64,
        }
        let mut out = Vec::new();
        write(
            &mut out,
            [(point(coord!(x: 1.0, y: 2.0)), Record { id: 7, z: 3.5 })],
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["properties"]["id"], 7);
        assert_eq!(json["features"][0]["geometry"]["coordinates"][1], 2.0);
    }
}
