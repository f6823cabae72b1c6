use crate::{
    layer,
    options::{Estacas, Format},
    sink,
    terrain::Terrain,
};
use anyhow::{bail, Result};
use cotas::{estaca, output::EstacaRecord, CotasError, ElevationSource, Point3};
use log::debug;
use std::io::Write;

impl Estacas {
    pub fn run(&self) -> Result<()> {
        let features = layer::read_points(&self.input)?;
        let terrain = Terrain::open_optional(&self.terrain)?;

        // Every elevation is resolved before anything is written.
        let points = features
            .iter()
            .map(|feature| {
                let coord = feature.coord;
                let z = match (feature.z, &terrain) {
                    (Some(z), _) => z,
                    (None, Some(terrain)) => terrain.elevation(coord).ok_or(
                        CotasError::NoDataAtAnchor {
                            x: coord.x,
                            y: coord.y,
                        },
                    )?,
                    (None, None) => return Err(CotasError::MissingField("z".to_owned())),
                };
                Ok(Point3::new(coord.x, coord.y, z))
            })
            .collect::<Result<Vec<Point3>, CotasError>>()?;

        let estacas = estaca::interpolate(&points, self.delta_first, self.delta_last)?;
        debug!("estacas; count: {}", estacas.len());
        let records = estacas
            .iter()
            .enumerate()
            .map(|(id, estaca)| EstacaRecord::new(id, estaca, self.decimals));

        let mut out = sink::open(self.out.as_deref())?;
        match self.format {
            Format::Geojson => layer::write(
                &mut out,
                records.map(|r| (layer::point(geo::coord!(x: r.x, y: r.y)), r)),
            )?,
            Format::Csv => {
                writeln!(out, "id,x,y,z,CotaEstaca,AlturaEstaca")?;
                for r in records {
                    writeln!(out, "{},{},{},{},{},{}", r.id, r.x, r.y, r.z, r.cota, r.altura)?;
                }
            }
            Format::Json => {
                serde_json::to_writer(&mut out, &records.collect::<Vec<EstacaRecord>>())?;
            }
            Format::Kml => bail!("KML output is only available for extract"),
        }
        out.flush()?;
        Ok(())
    }
}
