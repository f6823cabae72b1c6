//! KML output of elevation cells.

use anyhow::Result;
use cotas::{extract::CotaCell, output::round_to, ElevationRange, C};
use kml::{
    types::{AltitudeMode, Coord as KmlCoord, Element, Geometry, LinearRing, Placemark, Polygon},
    Kml, KmlWriter,
};
use std::{collections::HashMap, io::Write};

/// Cell colors, low to high, as KML `aabbggrr`.
const RAMP: [&str; 5] = ["ffb4771f", "ff2ca02c", "ff0ed8ff", "ff0e7fff", "ff2827d6"];

/// Fill opacity applied on top of the ramp.
const FILL_ALPHA: &str = "b3";

/// Returns the class of `z` among `classes` equal intervals of
/// `range`.
fn class(range: &ElevationRange, z: C, classes: usize) -> usize {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let class = (range.normalize(z) * classes as C).floor() as usize;
    class.min(classes.saturating_sub(1))
}

fn element(name: &str, content: Option<String>, children: Vec<Element>) -> Element {
    Element {
        name: name.to_owned(),
        content,
        children,
        ..Default::default()
    }
}

fn style(id: usize, classes: usize) -> Kml {
    let color = RAMP[id * RAMP.len() / classes.max(1)];
    let fill = format!("{FILL_ALPHA}{}", &color[2..]);
    let mut style = element(
        "Style",
        None,
        vec![
            element(
                "LineStyle",
                None,
                vec![
                    element("color", Some(color.to_owned()), vec![]),
                    element("width", Some("1".to_owned()), vec![]),
                ],
            ),
            element(
                "PolyStyle",
                None,
                vec![element("color", Some(fill), vec![])],
            ),
        ],
    );
    style.attrs = HashMap::from([("id".to_owned(), format!("class{id}"))]);
    Kml::Element(style)
}

/// Writes `cells` as polygon placemarks, one style per elevation
/// class.
///
/// Extruded cells are drawn at their elevation and extended down to
/// the ground.
pub fn write_cells<W: Write>(
    out: W,
    cells: &[CotaCell],
    range: &ElevationRange,
    classes: usize,
    extrude: bool,
    decimals: u32,
) -> Result<()> {
    let classes = classes.max(1);
    let mut elements: Vec<Kml> = (0..classes).map(|id| style(id, classes)).collect();
    elements.extend(cells.iter().map(|cell| {
        let z = round_to(cell.point.z, decimals);
        let coords = cell
            .polygon
            .exterior()
            .coords()
            .map(|c| KmlCoord::new(c.x, c.y, extrude.then_some(z)))
            .collect();
        let mut polygon = Polygon::new(
            LinearRing {
                coords,
                ..Default::default()
            },
            vec![],
        );
        if extrude {
            polygon.extrude = true;
            polygon.altitude_mode = AltitudeMode::Absolute;
        }
        let style_url = format!("#class{}", class(range, cell.point.z, classes));
        Kml::Placemark(Placemark {
            name: Some(cell.point.id.to_string()),
            description: Some(format!("z = {z}")),
            geometry: Some(Geometry::Polygon(polygon)),
            children: vec![element("styleUrl", Some(style_url), vec![])],
            ..Default::default()
        })
    }));

    let doc = Kml::Document {
        attrs: HashMap::new(),
        elements,
    };
    KmlWriter::<_, f64>::from_writer(out).write(&doc)?;
    Ok(())
}
